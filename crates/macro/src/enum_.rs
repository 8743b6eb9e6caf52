use proc_macro2::TokenStream;
use quote::quote;
use syn::{Data, DeriveInput, Fields};

use crate::attrs::VariantAttrs;

pub fn expand(input: &DeriveInput) -> syn::Result<TokenStream> {
    let Data::Enum(data) = &input.data else {
        return Err(syn::Error::new_spanned(
            &input.ident,
            "DfeEnum can only be derived for enums",
        ));
    };
    if !input.generics.params.is_empty() {
        return Err(syn::Error::new_spanned(
            &input.generics,
            "DfeEnum cannot be derived for generic types",
        ));
    }

    let ident = &input.ident;
    let type_name = ident.to_string();

    let mut variants = Vec::with_capacity(data.variants.len());
    let mut default_variant = None;
    for variant in &data.variants {
        if !matches!(variant.fields, Fields::Unit) {
            return Err(syn::Error::new_spanned(
                variant,
                "DfeEnum variants cannot carry data",
            ));
        }
        let attrs = VariantAttrs::parse(&variant.attrs)?;
        let code = attrs.value.unwrap_or_else(|| variant.ident.to_string());
        if variant.attrs.iter().any(|attr| attr.path().is_ident("default")) {
            default_variant = Some(&variant.ident);
        }
        variants.push((&variant.ident, code));
    }

    let to_code = variants.iter().map(|(variant, code)| quote!(Self::#variant => #code,));
    let from_code = variants
        .iter()
        .map(|(variant, code)| quote!(#code => ::std::result::Result::Ok(Self::#variant),));
    let empty_arm = default_variant.map(|variant| {
        quote!("" => ::std::result::Result::Ok(Self::#variant),)
    });

    Ok(quote! {
        impl ::dfe_serde::FieldType for #ident {
            fn classification() -> ::dfe_serde::Classification {
                ::dfe_serde::Classification::Primitive
            }

            fn to_field_ref(&self) -> ::dfe_serde::FieldRef<'_> {
                let code: &'static str = match self {
                    #(#to_code)*
                };
                ::dfe_serde::FieldRef::Primitive(::dfe_serde::Primitive::Str(
                    ::std::string::ToString::to_string(code),
                ))
            }

            #[allow(unreachable_patterns)]
            fn from_field_value(
                value: ::dfe_serde::FieldValue,
            ) -> ::std::result::Result<Self, ::dfe_serde::ValueError> {
                let text = match value {
                    ::dfe_serde::FieldValue::Null => ::std::string::String::new(),
                    ::dfe_serde::FieldValue::Primitive(primitive) => {
                        ::std::string::ToString::to_string(&primitive)
                    }
                    other => {
                        return ::std::result::Result::Err(::dfe_serde::ValueError::Mismatch {
                            expected: #type_name,
                            found: other.describe(),
                        });
                    }
                };
                let code = text.trim();
                match code {
                    #(#from_code)*
                    #empty_arm
                    _ => ::std::result::Result::Err(::dfe_serde::ValueError::UnknownVariant {
                        target: #type_name,
                        value: ::std::string::ToString::to_string(code),
                    }),
                }
            }
        }
    })
}
