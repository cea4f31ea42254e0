//! Type-erased instances and constructor arguments.
//!
//! Every value the container holds is an [`Instance`]: a cheap, clonable
//! handle to an `Arc<T>` with `T` erased. Storing the `Arc<T>` itself
//! (rather than `T`) lets trait objects such as `Arc<dyn Logger>` live in
//! the same registry as concrete types.

use std::any::{Any, type_name};
use std::fmt;
use std::sync::Arc;

use crate::key::DependencyKey;

/// Error type returned by constructors.
pub type BoxError = Box<dyn std::error::Error + Send + Sync>;

/// An owned, type-erased value held by the container.
///
/// Clones share the same underlying value; use [`Instance::ptr_eq`] to
/// check identity.
///
/// # Examples
/// ```
/// use mawrid_container::instance::Instance;
/// use std::sync::Arc;
///
/// let instance = Instance::new(42u32);
/// let value: Arc<u32> = instance.downcast().unwrap();
/// assert_eq!(*value, 42);
/// assert!(instance.downcast::<String>().is_none());
/// ```
#[derive(Clone)]
pub struct Instance {
    value: Arc<dyn Any + Send + Sync>,
    type_name: &'static str,
}

impl Instance {
    /// Wraps an owned value.
    pub fn new<T: Send + Sync + 'static>(value: T) -> Self {
        Self::from_arc(Arc::new(value))
    }

    /// Wraps an already shared value, including trait objects.
    pub fn from_arc<T: ?Sized + Send + Sync + 'static>(value: Arc<T>) -> Self {
        Self {
            value: Arc::new(value),
            type_name: type_name::<T>(),
        }
    }

    /// Returns the shared value if this instance holds a `T`.
    pub fn downcast<T: ?Sized + Send + Sync + 'static>(&self) -> Option<Arc<T>> {
        self.value.downcast_ref::<Arc<T>>().cloned()
    }

    /// Returns `true` if this instance holds a `T`.
    pub fn is<T: ?Sized + Send + Sync + 'static>(&self) -> bool {
        self.value.is::<Arc<T>>()
    }

    /// Returns `true` if both handles point at the same value.
    pub fn ptr_eq(&self, other: &Instance) -> bool {
        Arc::ptr_eq(&self.value, &other.value)
    }

    /// Name of the type this instance was created from.
    pub fn type_name(&self) -> &'static str {
        self.type_name
    }
}

impl fmt::Debug for Instance {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Instance")
            .field("type", &self.type_name)
            .finish()
    }
}

/// Failure to extract a constructor argument.
#[derive(Debug, thiserror::Error)]
pub enum ArgumentError {
    #[error("constructor of {key} asked for argument #{index}, but only {available} were resolved")]
    Missing {
        key: DependencyKey,
        index: usize,
        available: usize,
    },

    #[error("argument #{index} of {key} is {found}, expected {expected}")]
    TypeMismatch {
        key: DependencyKey,
        index: usize,
        expected: &'static str,
        found: &'static str,
    },
}

/// Resolved arguments for one constructor call, in parameter order.
///
/// Each successful extraction consumes the next argument.
pub struct Arguments {
    key: DependencyKey,
    values: Vec<(DependencyKey, Instance)>,
    position: usize,
}

impl Arguments {
    pub(crate) fn new(key: DependencyKey, values: Vec<(DependencyKey, Instance)>) -> Self {
        Self {
            key,
            values,
            position: 0,
        }
    }

    /// The identifier being constructed.
    pub fn key(&self) -> &DependencyKey {
        &self.key
    }

    /// Total number of resolved arguments.
    pub fn len(&self) -> usize {
        self.values.len()
    }

    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }

    /// Identifier the next argument was resolved from.
    pub fn peek_key(&self) -> Option<&DependencyKey> {
        self.values.get(self.position).map(|(key, _)| key)
    }

    /// Takes the next argument without inspecting its type.
    pub fn instance(&mut self) -> Result<Instance, ArgumentError> {
        let instance = self.current()?.clone();
        self.position += 1;
        Ok(instance)
    }

    /// Takes the next argument as a shared `Arc<T>`.
    ///
    /// On a type mismatch the argument is left in place.
    pub fn shared<T: ?Sized + Send + Sync + 'static>(&mut self) -> Result<Arc<T>, ArgumentError> {
        let instance = self.current()?;
        let value = instance.downcast::<T>().ok_or_else(|| ArgumentError::TypeMismatch {
            key: self.key.clone(),
            index: self.position,
            expected: type_name::<T>(),
            found: instance.type_name(),
        })?;
        self.position += 1;
        Ok(value)
    }

    fn current(&self) -> Result<&Instance, ArgumentError> {
        self.values
            .get(self.position)
            .map(|(_, instance)| instance)
            .ok_or_else(|| ArgumentError::Missing {
                key: self.key.clone(),
                index: self.position,
                available: self.values.len(),
            })
    }

    /// Takes the next argument as an owned clone of `T`.
    pub fn cloned<T: Clone + Send + Sync + 'static>(&mut self) -> Result<T, ArgumentError> {
        self.shared::<T>().map(|value| T::clone(&value))
    }
}

impl fmt::Debug for Arguments {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Arguments")
            .field("key", &self.key)
            .field("len", &self.values.len())
            .field("position", &self.position)
            .finish()
    }
}
