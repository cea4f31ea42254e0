//! Procedural macros for Mawrid.
//!
//! Provides `#[derive(Injectable)]`, which describes a struct's
//! constructor to the container and registers it in the type catalog.

use proc_macro::TokenStream;

mod injectable;

/// Derives `mawrid::Injectable` and registers the type with the global
/// type catalog.
///
/// Every field is a constructor parameter, in declaration order:
/// * `Arc<T>` - requires `T`, shared with the container's cached instance
/// * `Instance` - no declared type; the struct cannot be built
/// * `#[inject(one_of(A, B))] field: Instance` - requires the first of
///   `A`, `B` the container can resolve
/// * any other `T: Clone` - requires `T` and stores a clone
///
/// ```ignore
/// #[derive(Injectable)]
/// struct Mailer {
///     transport: Arc<dyn Transport>,
///     config: MailerConfig,
/// }
/// ```
///
/// Generic structs are not supported.
#[proc_macro_derive(Injectable, attributes(inject))]
pub fn derive_injectable(input: TokenStream) -> TokenStream {
    injectable::derive_injectable(input)
}
