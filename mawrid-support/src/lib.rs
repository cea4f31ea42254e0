//! # Mawrid Support
//!
//! Shared utilities for the Mawrid container crates.
//!
//! This crate provides:
//! - Text rendering for error messages
//! - Classification of primitive type names that the container never constructs

pub mod primitive;
pub mod rendering;
