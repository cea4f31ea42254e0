//! # Mawrid — autowiring dependency container for Rust
//!
//! Ask for a type, get a fully constructed instance: Mawrid reads each
//! type's constructor description, resolves every dependency recursively,
//! and caches what it builds.
//!
//! ```rust
//! use mawrid::prelude::*;
//! use mawrid::Injectable;
//! use std::sync::Arc;
//!
//! #[derive(Injectable)]
//! struct Dependency;
//!
//! #[derive(Injectable)]
//! struct ClassWithDependency {
//!     dependency: Arc<Dependency>,
//! }
//!
//! let mut container = Container::new();
//! let class: Arc<ClassWithDependency> = container.resolve().unwrap();
//! let dependency: Arc<Dependency> = container.resolve().unwrap();
//! assert!(Arc::ptr_eq(&class.dependency, &dependency));
//! ```

extern crate self as mawrid;

pub use mawrid_container::*;
pub use mawrid_derive::*;
pub use mawrid_support::*;
