//! Type identifiers.
//!
//! [`DependencyKey`] names a type the container can register or build.
//! It is a plain string: usually the fully qualified name reported by
//! [`std::any::type_name`], but any identifier works.

use std::any::type_name;
use std::borrow::Cow;
use std::fmt;

use mawrid_support::rendering::shorten_type_name;

/// Identifies a dependency in the container.
///
/// # Examples
/// ```
/// use mawrid_container::key::DependencyKey;
///
/// // Key derived from a Rust type
/// let key = DependencyKey::of::<String>();
/// assert_eq!(key.name(), "alloc::string::String");
///
/// // Key from an arbitrary identifier
/// let key = DependencyKey::new("app::Mailer");
/// assert_eq!(key.name(), "app::Mailer");
/// ```
#[derive(Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct DependencyKey {
    name: Cow<'static, str>,
}

impl DependencyKey {
    /// Creates the key for type `T`.
    #[inline]
    pub fn of<T: ?Sized + 'static>() -> Self {
        Self {
            name: Cow::Borrowed(type_name::<T>()),
        }
    }

    /// Creates a key from an identifier string.
    #[inline]
    pub fn new(name: impl Into<Cow<'static, str>>) -> Self {
        Self { name: name.into() }
    }

    /// Returns the full identifier.
    #[inline]
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Returns the identifier with module paths stripped, for messages.
    pub fn short_name(&self) -> String {
        shorten_type_name(&self.name)
    }
}

impl From<&'static str> for DependencyKey {
    fn from(name: &'static str) -> Self {
        Self::new(name)
    }
}

impl From<String> for DependencyKey {
    fn from(name: String) -> Self {
        Self::new(name)
    }
}

impl From<&DependencyKey> for DependencyKey {
    fn from(key: &DependencyKey) -> Self {
        key.clone()
    }
}

impl AsRef<str> for DependencyKey {
    fn as_ref(&self) -> &str {
        &self.name
    }
}

impl fmt::Debug for DependencyKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "DependencyKey({})", self.name)
    }
}

impl fmt::Display for DependencyKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.name)
    }
}
