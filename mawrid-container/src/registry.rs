//! Instance registry: the container's cache of resolved values.
//!
//! Maps [`DependencyKey`] to the [`Instance`] produced for it, either
//! registered explicitly or built on first resolve.

use std::collections::HashMap;

use tracing::debug;

use crate::instance::Instance;
use crate::key::DependencyKey;

/// Where a registry entry came from.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum Origin {
    Registered,
    Built,
}

#[derive(Debug, Default)]
pub(crate) struct InstanceRegistry {
    instances: HashMap<DependencyKey, Instance>,
}

impl InstanceRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Stores `instance` under `key`, replacing any previous entry.
    pub fn insert(&mut self, key: DependencyKey, instance: Instance, origin: Origin) {
        debug!(key = %key, ty = instance.type_name(), ?origin, "Stored instance");
        self.instances.insert(key, instance);
    }

    pub fn get(&self, key: &DependencyKey) -> Option<&Instance> {
        self.instances.get(key)
    }

    pub fn contains(&self, key: &DependencyKey) -> bool {
        self.instances.contains_key(key)
    }

    /// Returns the number of cached instances.
    pub fn len(&self) -> usize {
        self.instances.len()
    }

    pub fn keys(&self) -> impl Iterator<Item = &DependencyKey> {
        self.instances.keys()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    struct Database;

    #[test]
    fn insert_and_get() {
        let mut reg = InstanceRegistry::new();
        let key = DependencyKey::of::<Database>();
        reg.insert(key.clone(), Instance::new(Database), Origin::Built);
        assert!(reg.contains(&key));
        assert!(reg.get(&key).unwrap().is::<Database>());
    }

    #[test]
    fn insert_overwrites() {
        let mut reg = InstanceRegistry::new();
        let key = DependencyKey::new("app::Port");
        let first = Instance::new(1u16);
        let second = Instance::new(2u16);

        reg.insert(key.clone(), first, Origin::Registered);
        reg.insert(key.clone(), second.clone(), Origin::Registered);

        assert_eq!(reg.len(), 1);
        assert!(reg.get(&key).unwrap().ptr_eq(&second));
    }
}
