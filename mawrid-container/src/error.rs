//! Error types for Mawrid container operations.
//!
//! Resolution fails in one of two ways: the identifier is something the
//! container can never produce ([`MawridError::NotFound`]), or it looked
//! buildable and construction broke ([`MawridError::BuildFailed`]).

use std::error::Error as StdError;
use std::fmt;

use mawrid_support::rendering::{render_alternatives, render_chain};

use crate::instance::BoxError;
use crate::introspect::IntrospectionError;
use crate::key::DependencyKey;

/// Main error type for all Mawrid operations.
#[derive(Debug, thiserror::Error)]
pub enum MawridError {
    /// The identifier is neither registered nor constructible.
    #[error(transparent)]
    NotFound(NotFoundError),

    /// Construction of a feasible identifier failed.
    #[error(transparent)]
    BuildFailed(BuildError),

    /// Resolution re-entered an identifier that was still being built.
    #[error("{}", .0)]
    CircularDependency(CircularDependencyError),

    /// A resolved instance was not of the requested Rust type.
    #[error("Type mismatch for {key}: expected {expected}, found {found}")]
    TypeMismatch {
        key: DependencyKey,
        expected: &'static str,
        found: &'static str,
    },
}

impl MawridError {
    pub fn is_not_found(&self) -> bool {
        matches!(self, MawridError::NotFound(_))
    }

    /// `true` for build failures, including not-found errors that refine one.
    ///
    /// A `NotFound` returned by `get` always follows a failed build attempt,
    /// so it counts as a build failure too; use [`is_not_found`](Self::is_not_found)
    /// to tell the two apart.
    pub fn is_build_failure(&self) -> bool {
        self.build_error().is_some()
    }

    /// The underlying build error, looking through a not-found cause.
    pub fn build_error(&self) -> Option<&BuildError> {
        match self {
            MawridError::BuildFailed(e) => Some(e),
            MawridError::NotFound(e) => match e.cause.as_deref() {
                Some(MawridError::BuildFailed(inner)) => Some(inner),
                _ => None,
            },
            _ => None,
        }
    }

    /// The identifier the error is about.
    pub fn key(&self) -> &DependencyKey {
        match self {
            MawridError::NotFound(e) => &e.requested,
            MawridError::BuildFailed(e) => &e.key,
            MawridError::CircularDependency(e) => e.chain.first().unwrap_or(&e.key),
            MawridError::TypeMismatch { key, .. } => key,
        }
    }
}

impl From<BuildError> for MawridError {
    fn from(err: BuildError) -> Self {
        MawridError::BuildFailed(err)
    }
}

/// Error when an identifier cannot be produced by the container.
///
/// Includes hints about what went wrong.
#[derive(Debug)]
pub struct NotFoundError {
    /// The identifier that was requested
    pub requested: DependencyKey,
    /// The identifier being built when the request was made
    pub required_by: Option<DependencyKey>,
    /// Similar identifiers that ARE known ("did you mean?")
    pub suggestions: Vec<String>,
    /// The failed build attempt that led here
    pub cause: Option<Box<MawridError>>,
}

impl fmt::Display for NotFoundError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Dependency not found: {}", self.requested)?;

        if let Some(ref parent) = self.required_by {
            write!(f, "\n  Required by: {parent}")?;
        }

        if !self.suggestions.is_empty() {
            write!(f, "\n  Did you mean one of:")?;
            for suggestion in &self.suggestions {
                write!(f, "\n    - {suggestion}")?;
            }
        }

        write!(
            f,
            "\n  Hint: register an instance of {} or derive Injectable for it",
            self.requested.short_name()
        )
    }
}

impl StdError for NotFoundError {
    fn source(&self) -> Option<&(dyn StdError + 'static)> {
        self.cause.as_deref().map(|e| e as &(dyn StdError + 'static))
    }
}

/// Error when building a feasible identifier fails.
#[derive(Debug, thiserror::Error)]
#[error("Failed to build {key}: {reason}")]
pub struct BuildError {
    pub key: DependencyKey,
    #[source]
    pub reason: BuildFailure,
}

impl BuildError {
    pub fn new(key: DependencyKey, reason: BuildFailure) -> Self {
        Self { key, reason }
    }
}

/// What went wrong while building.
#[derive(Debug, thiserror::Error)]
pub enum BuildFailure {
    #[error("type metadata unavailable")]
    Introspection(#[source] IntrospectionError),

    #[error("parameter `{parameter}` has no valid type set")]
    UntypedParameter { parameter: String },

    #[error("no types for parameter `{parameter}` can be built ({})", render_alternatives(.candidates))]
    NoViableAlternative {
        parameter: String,
        candidates: Vec<DependencyKey>,
    },

    #[error("dependency {key} could not be resolved")]
    Dependency {
        key: DependencyKey,
        #[source]
        source: Box<MawridError>,
    },

    #[error("constructor failed")]
    Constructor(#[source] BoxError),
}

/// Error when resolution runs into a cycle.
///
/// Shows the full dependency chain so you can see WHERE the cycle is.
#[derive(Debug)]
pub struct CircularDependencyError {
    /// The identifier that closed the cycle
    pub key: DependencyKey,
    /// The chain of identifiers forming the cycle, e.g. ["A", "B", "A"]
    pub chain: Vec<DependencyKey>,
}

impl fmt::Display for CircularDependencyError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Circular dependency detected:\n  ")?;

        let chain: Vec<String> = self.chain.iter().map(DependencyKey::short_name).collect();
        write!(f, "{}", render_chain(&chain))?;

        write!(
            f,
            "\n  Hint: register one of these instances up front to break the cycle"
        )
    }
}

/// Convenient Result type for Mawrid operations.
pub type Result<T> = std::result::Result<T, MawridError>;
