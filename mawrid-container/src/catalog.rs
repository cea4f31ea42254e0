//! The type catalog: a registration table of [`TypeDescriptor`]s.
//!
//! Types deriving `Injectable` submit themselves to a link-time
//! [`inventory`]; [`TypeCatalog::from_inventory`] collects them.
//! Descriptors can also be added by hand or through a [`Provider`].

use std::collections::HashMap;
use std::sync::Arc;

use once_cell::sync::Lazy;
use tracing::{debug, trace};

use mawrid_support::primitive::classify;

use crate::introspect::{IntrospectionError, Introspector, TypeDescriptor};
use crate::key::DependencyKey;
use crate::provider::{Provider, ProviderRegistry};

/// A type that can describe its own constructor.
///
/// Usually implemented with `#[derive(Injectable)]`.
pub trait Injectable: Send + Sync + 'static {
    fn descriptor() -> TypeDescriptor;
}

/// Link-time registration submitted by `#[derive(Injectable)]`.
pub struct TypeRegistration {
    describe: fn() -> TypeDescriptor,
}

impl TypeRegistration {
    pub const fn new(describe: fn() -> TypeDescriptor) -> Self {
        Self { describe }
    }

    pub fn descriptor(&self) -> TypeDescriptor {
        (self.describe)()
    }
}

inventory::collect!(TypeRegistration);

static GLOBAL: Lazy<Arc<TypeCatalog>> = Lazy::new(|| Arc::new(TypeCatalog::from_inventory()));

/// Maps type identifiers to their descriptors.
///
/// Primitive identifiers (numbers, text, collections, `dyn Any`) are
/// never described, even if a descriptor was inserted for them.
#[derive(Debug, Default, Clone)]
pub struct TypeCatalog {
    descriptors: HashMap<DependencyKey, Arc<TypeDescriptor>>,
}

impl TypeCatalog {
    /// Creates an empty catalog.
    pub fn new() -> Self {
        Self::default()
    }

    /// Collects every type registered through `#[derive(Injectable)]`.
    pub fn from_inventory() -> Self {
        let mut catalog = Self::new();
        for registration in inventory::iter::<TypeRegistration> {
            catalog.insert(registration.descriptor());
        }
        debug!(types = catalog.len(), "Collected type catalog from inventory");
        catalog
    }

    /// Shared catalog of all derived types, built on first use.
    pub fn global() -> Arc<TypeCatalog> {
        GLOBAL.clone()
    }

    /// Adds or replaces a descriptor.
    pub fn insert(&mut self, descriptor: TypeDescriptor) {
        trace!(key = %descriptor.key(), params = descriptor.parameters().len(), "Described type");
        self.descriptors
            .insert(descriptor.key().clone(), Arc::new(descriptor));
    }

    /// Adds the descriptor of an [`Injectable`] type.
    pub fn define<T: Injectable>(&mut self) -> &mut Self {
        self.insert(T::descriptor());
        self
    }

    /// Lets a [`Provider`] module describe its types.
    pub fn add_provider(&mut self, provider: &dyn Provider) -> &mut Self {
        debug!(provider = provider.name(), "Adding provider");
        provider.register(self);
        self
    }

    pub fn contains(&self, key: &DependencyKey) -> bool {
        self.descriptors.contains_key(key)
    }

    pub fn len(&self) -> usize {
        self.descriptors.len()
    }

    pub fn is_empty(&self) -> bool {
        self.descriptors.is_empty()
    }
}

impl Introspector for TypeCatalog {
    fn describe(&self, key: &DependencyKey) -> Result<Arc<TypeDescriptor>, IntrospectionError> {
        if let Some(kind) = classify(key.name()) {
            return Err(IntrospectionError::Primitive {
                key: key.clone(),
                kind,
            });
        }

        self.descriptors
            .get(key)
            .cloned()
            .ok_or_else(|| IntrospectionError::Unknown(key.clone()))
    }

    fn known_keys(&self) -> Vec<DependencyKey> {
        self.descriptors.keys().cloned().collect()
    }
}

impl ProviderRegistry for TypeCatalog {
    fn describe_type(&mut self, descriptor: TypeDescriptor) {
        self.insert(descriptor);
    }
}
