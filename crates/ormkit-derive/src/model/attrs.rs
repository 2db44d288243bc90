//! Attribute parsing for Model derive macro.
//!
//! Handles parsing of struct-level and field-level `#[orm(...)]` attributes.

use syn::{DeriveInput, Result};

/// Extract table name from struct-level `#[orm(table = "...")]` attribute.
pub(super) fn get_table_name(input: &DeriveInput) -> Result<Option<syn::LitStr>> {
    for attr in &input.attrs {
        if !attr.path().is_ident("orm") {
            continue;
        }
        let nested = attr.parse_args::<syn::MetaNameValue>()?;
        if nested.path.is_ident("table") {
            if let syn::Expr::Lit(syn::ExprLit {
                lit: syn::Lit::Str(lit),
                ..
            }) = &nested.value
            {
                return Ok(Some(lit.clone()));
            }
        }
        return Err(syn::Error::new_spanned(
            attr,
            "expected #[orm(table = \"...\")]",
        ));
    }
    Ok(None)
}

/// Extract the raw tag string from a field-level `#[orm("key=value,...")]` attribute.
///
/// The string is passed through untouched; its pairs are validated when the model is
/// registered.
pub(super) fn get_field_tag(field: &syn::Field) -> Result<Option<syn::LitStr>> {
    let mut tag = None;
    for attr in &field.attrs {
        if !attr.path().is_ident("orm") {
            continue;
        }
        if tag.is_some() {
            return Err(syn::Error::new_spanned(attr, "duplicate #[orm(...)] attribute"));
        }
        let lit = attr.parse_args::<syn::LitStr>().map_err(|e| {
            syn::Error::new(e.span(), "expected a tag string, e.g. #[orm(\"column=name\")]")
        })?;
        tag = Some(lit);
    }
    Ok(tag)
}
