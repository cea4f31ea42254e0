//! Classification of primitive and unstructured type names.
//!
//! The container only constructs structured types. Numbers, text,
//! booleans, collections and erased `Any` values carry no constructor
//! the container could satisfy, so they are recognised here by their
//! [`std::any::type_name`] rendering and reported as unsatisfiable.

use std::fmt;

/// Broad family of a primitive type.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum PrimitiveKind {
    Numeric,
    Text,
    Boolean,
    Collection,
    /// Erased or shapeless values: `dyn Any`, `()`, tuples, raw pointers.
    Untyped,
}

impl fmt::Display for PrimitiveKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            PrimitiveKind::Numeric => write!(f, "numeric"),
            PrimitiveKind::Text => write!(f, "text"),
            PrimitiveKind::Boolean => write!(f, "boolean"),
            PrimitiveKind::Collection => write!(f, "collection"),
            PrimitiveKind::Untyped => write!(f, "untyped"),
        }
    }
}

const NUMERIC: &[&str] = &[
    "i8", "i16", "i32", "i64", "i128", "isize",
    "u8", "u16", "u32", "u64", "u128", "usize",
    "f32", "f64",
];

const TEXT: &[&str] = &[
    "str",
    "char",
    "alloc::string::String",
    "alloc::borrow::Cow<str>",
    "alloc::boxed::Box<str>",
    "alloc::sync::Arc<str>",
    "alloc::rc::Rc<str>",
    "std::path::Path",
    "std::path::PathBuf",
];

const TEXT_PREFIXES: &[&str] = &["std::ffi::", "core::ffi::", "alloc::ffi::"];

const COLLECTION_PREFIXES: &[&str] = &[
    "alloc::vec::Vec<",
    "alloc::collections::",
    "std::collections::",
    "alloc::boxed::Box<[",
    "core::option::Option<",
];

const UNTYPED_PREFIXES: &[&str] = &[
    "dyn core::any::Any",
    "alloc::boxed::Box<dyn core::any::Any",
    "alloc::sync::Arc<dyn core::any::Any",
    "alloc::rc::Rc<dyn core::any::Any",
    "*const ",
    "*mut ",
];

/// Classifies a type name, returning `None` for structured types.
///
/// ```
/// use mawrid_support::primitive::{classify, PrimitiveKind};
///
/// assert_eq!(classify("i32"), Some(PrimitiveKind::Numeric));
/// assert_eq!(classify("alloc::string::String"), Some(PrimitiveKind::Text));
/// assert_eq!(classify("my_app::Database"), None);
/// ```
pub fn classify(type_name: &str) -> Option<PrimitiveKind> {
    let name = strip_references(type_name.trim());

    if NUMERIC.contains(&name) || name.starts_with("core::num::") {
        return Some(PrimitiveKind::Numeric);
    }
    if name == "bool" {
        return Some(PrimitiveKind::Boolean);
    }
    if TEXT.contains(&name) || TEXT_PREFIXES.iter().any(|p| name.starts_with(p)) {
        return Some(PrimitiveKind::Text);
    }
    if name.starts_with('[') || COLLECTION_PREFIXES.iter().any(|p| name.starts_with(p)) {
        return Some(PrimitiveKind::Collection);
    }
    if name.starts_with('(') || name == "!" || UNTYPED_PREFIXES.iter().any(|p| name.starts_with(p)) {
        return Some(PrimitiveKind::Untyped);
    }

    None
}

/// Returns `true` if the container must never try to construct `type_name`.
#[inline]
pub fn is_primitive(type_name: &str) -> bool {
    classify(type_name).is_some()
}

fn strip_references(mut name: &str) -> &str {
    loop {
        let stripped = name
            .strip_prefix('&')
            .map(|rest| rest.strip_prefix("mut ").unwrap_or(rest))
            .map(str::trim_start);

        match stripped {
            Some(rest) => name = rest,
            None => return name,
        }
    }
}
