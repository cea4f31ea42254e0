//! Core container implementation for Mawrid.

pub mod catalog;
pub mod config;
pub mod container;
pub mod error;
pub mod instance;
pub mod introspect;
pub mod key;
pub mod provider;
mod registry;

pub use catalog::{Injectable, TypeCatalog, TypeRegistration};
pub use config::ContainerSettings;
pub use container::{prelude, Container, ContainerBuilder, SharedContainer};
pub use error::{MawridError, Result};
pub use instance::{Arguments, BoxError, Instance};
pub use introspect::{Introspector, Parameter, ParameterType, TypeDescriptor};
pub use key::DependencyKey;
pub use provider::{Provider, ProviderRegistry};

#[doc(hidden)]
pub mod __private {
    pub use inventory;
}
