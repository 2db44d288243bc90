//! Derive macro for ormkit
//!
//! Provides `#[derive(Model)]`.

use proc_macro::TokenStream;
use syn::{DeriveInput, parse_macro_input};

mod model;

/// Derive the `Model` accessor table for a struct with named fields.
///
/// # Example
///
/// ```ignore
/// use ormkit::Model;
///
/// #[derive(Debug, Default, Model)]
/// #[orm(table = "users")]
/// struct User {
///     id: i64,
///     #[orm("column=user_name")]
///     name: String,
///     email: Option<String>,
/// }
/// ```
///
/// # Generated
///
/// - `fn type_name()` - the struct name
/// - `fn table_name()` - only when `#[orm(table = "...")]` is present
/// - `fn fields()` - getter, setter, tag and byte offset of every field
///
/// # Attributes
///
/// - `#[orm(table = "name")]` - Override the table name (default: snake-cased struct name)
/// - `#[orm("key=value,...")]` - Field tag; `column=name` overrides the column name
#[proc_macro_derive(Model, attributes(orm))]
pub fn derive_model(input: TokenStream) -> TokenStream {
    let input = parse_macro_input!(input as DeriveInput);
    model::expand(input)
        .unwrap_or_else(|e| e.to_compile_error())
        .into()
}
