//! Derive macros for Mawrid.
//!
//! Re-exported by the `mawrid` facade; depend on that crate instead of
//! this one so the generated `::mawrid::` paths resolve.

pub use mawrid_macros::Injectable;
