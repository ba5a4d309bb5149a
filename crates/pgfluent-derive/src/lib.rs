//! Derive macros for pgfluent
//!
//! Provides `#[derive(Tagged)]`.

use proc_macro::TokenStream;
use syn::{DeriveInput, parse_macro_input};

mod common;
mod tagged;

/// Derive the `Tagged` field descriptor table for a struct.
///
/// # Example
///
/// ```ignore
/// use pgfluent::Tagged;
///
/// #[derive(Debug, Default, Tagged)]
/// struct Test {
///     #[fluent(nested)]
///     meta: Option<Box<RowMeta>>,
///     #[fluent(column = "id")]
///     id: i64,
///     #[fluent(column = "name")]
///     name: String,
///     #[fluent(column = "is_active")]
///     is_active: Option<bool>,
///     #[fluent(column = "api_token", unsettable)]
///     token: String,
///     // no attribute: neither read from rows nor written
///     cache: Vec<u8>,
/// }
/// ```
///
/// # Attributes
///
/// - `#[fluent(column = "name")]` - Map the field to a column
/// - `#[fluent(column = "name", unsettable)]` - Extracted for writes, never set from rows
/// - `#[fluent(nested)]` - Populate a `Tagged + Default` struct (`U`, `Box<U>`,
///   `Option<U>` or `Option<Box<U>>`) from the same row
#[proc_macro_derive(Tagged, attributes(fluent))]
pub fn derive_tagged(input: TokenStream) -> TokenStream {
    let input = parse_macro_input!(input as DeriveInput);
    tagged::expand(input)
        .unwrap_or_else(|e| e.to_compile_error())
        .into()
}
