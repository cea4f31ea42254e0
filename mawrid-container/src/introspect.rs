//! Type introspection: what a type needs and how to construct it.
//!
//! The container never inspects Rust types directly. It asks an
//! [`Introspector`] for a [`TypeDescriptor`], which lists the constructor
//! parameters in declaration order and carries the construction primitive.
//! [`TypeCatalog`](crate::catalog::TypeCatalog) is the standard
//! implementation, filled by `#[derive(Injectable)]` or by hand.

use std::borrow::Cow;
use std::fmt;
use std::sync::Arc;

use mawrid_support::primitive::PrimitiveKind;

use crate::instance::{Arguments, BoxError, Instance};
use crate::key::DependencyKey;

/// Construction primitive: turns resolved arguments into a new instance.
pub type ConstructorFn = Arc<dyn Fn(Arguments) -> Result<Instance, BoxError> + Send + Sync>;

/// Declared type of a constructor parameter.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ParameterType {
    /// No declared type; the type cannot be built.
    Untyped,
    /// Exactly one required type.
    Single(DependencyKey),
    /// Alternatives in declaration order; the first resolvable one is used.
    Union(Vec<DependencyKey>),
}

/// One constructor parameter.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Parameter {
    name: Cow<'static, str>,
    ty: ParameterType,
}

impl Parameter {
    pub fn single(name: impl Into<Cow<'static, str>>, key: DependencyKey) -> Self {
        Self {
            name: name.into(),
            ty: ParameterType::Single(key),
        }
    }

    /// A union parameter. An empty alternative list declares no type at all.
    pub fn union(name: impl Into<Cow<'static, str>>, alternatives: Vec<DependencyKey>) -> Self {
        let ty = if alternatives.is_empty() {
            ParameterType::Untyped
        } else {
            ParameterType::Union(alternatives)
        };
        Self { name: name.into(), ty }
    }

    pub fn untyped(name: impl Into<Cow<'static, str>>) -> Self {
        Self {
            name: name.into(),
            ty: ParameterType::Untyped,
        }
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn ty(&self) -> &ParameterType {
        &self.ty
    }
}

/// Everything the container needs to build one type.
///
/// # Examples
/// ```
/// use mawrid_container::prelude::*;
///
/// struct Clock;
/// struct Scheduler { clock: std::sync::Arc<Clock> }
///
/// let descriptor = TypeDescriptor::of::<Scheduler>(|mut args| {
///     Ok(Instance::new(Scheduler { clock: args.shared::<Clock>()? }))
/// })
/// .with_parameter(Parameter::single("clock", DependencyKey::of::<Clock>()));
///
/// assert_eq!(descriptor.parameters().len(), 1);
/// ```
#[derive(Clone)]
pub struct TypeDescriptor {
    key: DependencyKey,
    parameters: Vec<Parameter>,
    constructor: ConstructorFn,
}

impl TypeDescriptor {
    /// Describes the type named `key`, built by `constructor`.
    pub fn new<F>(key: DependencyKey, constructor: F) -> Self
    where
        F: Fn(Arguments) -> Result<Instance, BoxError> + Send + Sync + 'static,
    {
        Self {
            key,
            parameters: Vec::new(),
            constructor: Arc::new(constructor),
        }
    }

    /// Describes `T`, keyed by [`DependencyKey::of`].
    pub fn of<T: ?Sized + 'static>(
        constructor: impl Fn(Arguments) -> Result<Instance, BoxError> + Send + Sync + 'static,
    ) -> Self {
        Self::new(DependencyKey::of::<T>(), constructor)
    }

    /// Appends the next constructor parameter.
    pub fn with_parameter(mut self, parameter: Parameter) -> Self {
        self.parameters.push(parameter);
        self
    }

    pub fn key(&self) -> &DependencyKey {
        &self.key
    }

    pub fn parameters(&self) -> &[Parameter] {
        &self.parameters
    }

    /// Invokes the construction primitive.
    pub fn construct(&self, arguments: Arguments) -> Result<Instance, BoxError> {
        (self.constructor)(arguments)
    }
}

impl fmt::Debug for TypeDescriptor {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("TypeDescriptor")
            .field("key", &self.key)
            .field("parameters", &self.parameters)
            .finish()
    }
}

/// Why a type could not be introspected.
#[derive(Debug, Clone, thiserror::Error)]
pub enum IntrospectionError {
    #[error("{0} is not a known type")]
    Unknown(DependencyKey),

    #[error("{key} is a {kind} primitive and cannot be constructed")]
    Primitive { key: DependencyKey, kind: PrimitiveKind },
}

/// Reports constructor metadata for type identifiers.
pub trait Introspector: Send + Sync {
    /// Describes `key`, or fails if the type is unknown or not constructible.
    fn describe(&self, key: &DependencyKey) -> Result<Arc<TypeDescriptor>, IntrospectionError>;

    /// Identifiers this introspector can describe, used for suggestions.
    fn known_keys(&self) -> Vec<DependencyKey> {
        Vec::new()
    }
}

impl<I: Introspector + ?Sized> Introspector for Arc<I> {
    fn describe(&self, key: &DependencyKey) -> Result<Arc<TypeDescriptor>, IntrospectionError> {
        (**self).describe(key)
    }

    fn known_keys(&self) -> Vec<DependencyKey> {
        (**self).known_keys()
    }
}
