//! Derive macros for `dfe-serde`.
//!
//! - `#[derive(DfeObject)]` on a struct with named fields generates a static
//!   `TypeDescriptor`, reflective field access and a `FieldType` impl.
//! - `#[derive(DfeEnum)]` on a fieldless enum maps each variant to its wire
//!   code.
//!
//! Generated code refers to `::dfe_serde`, so these derives are meant to be
//! used through the `dfe-serde` re-exports.

mod attrs;
mod enum_;
mod object;

use proc_macro::TokenStream;
use syn::{DeriveInput, parse_macro_input};

/// Derives `DfeObject`, `DfeType` and `FieldType`.
///
/// Container attributes: `#[dfe(root)]`, `#[dfe(root = "CFe")]`,
/// `namespace = ".."`, `alternates("..", ..)`, `factory = "path::to::fn"`.
///
/// Field attributes: `element` / `element = "tag"`, `attribute = "tag"`,
/// `namespace`, `kind`, `id`, `description`, `min`, `max`, `occurrence`,
/// `order`, `ignore`, `should_serialize = "path::to::fn"`, and
/// `dictionary(tag, namespace, item, key(..), value(..))`.
///
/// Without `factory`, the type must implement `Default`.
#[proc_macro_derive(DfeObject, attributes(dfe))]
pub fn derive_dfe_object(input: TokenStream) -> TokenStream {
    let input = parse_macro_input!(input as DeriveInput);
    object::expand(&input)
        .unwrap_or_else(syn::Error::into_compile_error)
        .into()
}

/// Derives `FieldType` for a fieldless enum, mapped to text codes.
///
/// Each variant takes `#[dfe(value = "01")]`, defaulting to its name. The
/// variant marked `#[default]`, if any, stands in for empty text.
#[proc_macro_derive(DfeEnum, attributes(dfe))]
pub fn derive_dfe_enum(input: TokenStream) -> TokenStream {
    let input = parse_macro_input!(input as DeriveInput);
    enum_::expand(&input)
        .unwrap_or_else(syn::Error::into_compile_error)
        .into()
}
