//! Provider trait: a module of related type descriptions.
//!
//! Providers group descriptors that belong together, typically for types
//! that cannot derive `Injectable` (foreign types, fallible constructors).
//!
//! # Examples
//! ```rust,ignore
//! struct StorageProvider;
//!
//! impl Provider for StorageProvider {
//!     fn register(&self, registry: &mut dyn ProviderRegistry) {
//!         registry.describe_type(TypeDescriptor::of::<Pool>(|_| {
//!             Ok(Instance::new(Pool::open("postgres://localhost")?))
//!         }));
//!     }
//! }
//!
//! let mut catalog = TypeCatalog::from_inventory();
//! catalog.add_provider(&StorageProvider);
//! ```

use crate::introspect::TypeDescriptor;

/// A module that describes related types to a catalog.
pub trait Provider: Send + Sync {
    /// Describe this module's types.
    fn register(&self, registry: &mut dyn ProviderRegistry);

    /// Human-readable name for logs.
    fn name(&self) -> &str {
        std::any::type_name::<Self>()
    }
}

/// Interface that providers use to describe types.
///
/// Implemented by [`TypeCatalog`](crate::catalog::TypeCatalog); kept
/// separate so providers can be tested against a mock.
pub trait ProviderRegistry {
    fn describe_type(&mut self, descriptor: TypeDescriptor);
}
