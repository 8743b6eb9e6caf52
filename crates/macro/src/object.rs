use heck::ToLowerCamelCase;
use proc_macro2::TokenStream;
use quote::quote;
use syn::ext::IdentExt;
use syn::{Data, DeriveInput, Fields, Ident, Type};

use crate::attrs::{ContainerAttrs, DictionaryAttrs, EntryAttrs, FieldAttrs, TagAttr};

struct MappedField<'a> {
    ident: &'a Ident,
    ty: &'a Type,
    name: String,
    attrs: FieldAttrs,
}

pub fn expand(input: &DeriveInput) -> syn::Result<TokenStream> {
    if !input.generics.params.is_empty() {
        return Err(syn::Error::new_spanned(
            &input.generics,
            "DfeObject cannot be derived for generic types",
        ));
    }

    let fields = match &input.data {
        Data::Struct(data) => match &data.fields {
            Fields::Named(named) => named.named.iter().collect::<Vec<_>>(),
            Fields::Unit => Vec::new(),
            Fields::Unnamed(_) => {
                return Err(syn::Error::new_spanned(
                    &input.ident,
                    "DfeObject requires named fields",
                ));
            }
        },
        _ => {
            return Err(syn::Error::new_spanned(
                &input.ident,
                "DfeObject can only be derived for structs; use DfeEnum for code lists",
            ));
        }
    };

    let container = ContainerAttrs::parse(&input.attrs)?;
    let mut mapped = Vec::with_capacity(fields.len());
    for field in fields {
        let Some(ident) = field.ident.as_ref() else {
            continue;
        };
        mapped.push(MappedField {
            ident,
            ty: &field.ty,
            name: ident.unraw().to_string(),
            attrs: FieldAttrs::parse(&field.attrs)?,
        });
    }

    let ident = &input.ident;
    let type_name = ident.to_string();
    let descriptors = mapped.iter().map(field_descriptor);
    let root = root_tag(&container);
    let factory = match &container.factory {
        Some(path) => quote!(#path()),
        None => quote!(<#ident as ::std::default::Default>::default()),
    };
    let classification = if container.root.is_some() {
        quote!(::dfe_serde::Classification::Root(<#ident as ::dfe_serde::DfeType>::type_descriptor))
    } else {
        quote!(::dfe_serde::Classification::Class(<#ident as ::dfe_serde::DfeType>::type_descriptor))
    };

    let active: Vec<_> = mapped.iter().filter(|field| !field.attrs.ignore).collect();
    let get_arms = active.iter().map(|field| {
        let name = &field.name;
        let member = field.ident;
        quote! {
            #name => ::std::option::Option::Some(::dfe_serde::FieldType::to_field_ref(&self.#member)),
        }
    });
    let set_arms = active.iter().map(|field| {
        let name = &field.name;
        let member = field.ident;
        let ty = field.ty;
        quote! {
            #name => {
                self.#member = <#ty as ::dfe_serde::FieldType>::from_field_value(value)?;
                ::std::result::Result::Ok(())
            }
        }
    });
    let should_arms = active.iter().filter_map(|field| {
        let name = &field.name;
        field
            .attrs
            .should_serialize
            .as_ref()
            .map(|path| quote!(#name => #path(self),))
    });

    Ok(quote! {
        impl ::dfe_serde::DfeType for #ident {
            fn type_descriptor() -> &'static ::dfe_serde::TypeDescriptor {
                fn __dfe_factory() -> ::std::boxed::Box<dyn ::dfe_serde::DfeObject> {
                    ::std::boxed::Box::new(#factory)
                }

                static DESCRIPTOR: ::dfe_serde::TypeDescriptor = ::dfe_serde::TypeDescriptor {
                    name: #type_name,
                    root: #root,
                    fields: &[#(#descriptors),*],
                    factory: __dfe_factory,
                };

                &DESCRIPTOR
            }
        }

        impl ::dfe_serde::DfeObject for #ident {
            fn descriptor(&self) -> &'static ::dfe_serde::TypeDescriptor {
                <Self as ::dfe_serde::DfeType>::type_descriptor()
            }

            fn field(&self, name: &str) -> ::std::option::Option<::dfe_serde::FieldRef<'_>> {
                match name {
                    #(#get_arms)*
                    _ => ::std::option::Option::None,
                }
            }

            fn set_field(
                &mut self,
                name: &str,
                value: ::dfe_serde::FieldValue,
            ) -> ::std::result::Result<(), ::dfe_serde::ValueError> {
                match name {
                    #(#set_arms)*
                    _ => {
                        let _ = value;
                        ::std::result::Result::Err(::dfe_serde::ValueError::UnknownField(
                            ::std::string::ToString::to_string(name),
                        ))
                    }
                }
            }

            fn should_serialize(&self, name: &str) -> bool {
                match name {
                    #(#should_arms)*
                    _ => true,
                }
            }

            fn as_any(&self) -> &dyn ::std::any::Any {
                self
            }

            fn into_any(self: ::std::boxed::Box<Self>) -> ::std::boxed::Box<dyn ::std::any::Any> {
                self
            }

            fn as_object(&self) -> &dyn ::dfe_serde::DfeObject {
                self
            }
        }

        impl ::dfe_serde::FieldType for #ident {
            fn classification() -> ::dfe_serde::Classification {
                #classification
            }

            fn to_field_ref(&self) -> ::dfe_serde::FieldRef<'_> {
                ::dfe_serde::FieldRef::Object(self)
            }

            fn from_field_value(
                value: ::dfe_serde::FieldValue,
            ) -> ::std::result::Result<Self, ::dfe_serde::ValueError> {
                ::dfe_serde::object::object_from_value::<Self>(value)
            }
        }
    })
}

fn option_str(value: Option<&str>) -> TokenStream {
    match value {
        Some(value) => quote!(::std::option::Option::Some(#value)),
        None => quote!(::std::option::Option::None),
    }
}

fn root_tag(container: &ContainerAttrs) -> TokenStream {
    let Some(name) = &container.root else {
        return quote!(::std::option::Option::None);
    };
    let name = option_str(name.as_deref());
    let namespace = option_str(container.namespace.as_deref());
    let alternates = &container.alternates;
    quote! {
        ::std::option::Option::Some(::dfe_serde::RootTag {
            name: #name,
            namespace: #namespace,
            alternates: &[#(#alternates),*],
        })
    }
}

fn kind_tokens(kind: Option<&Ident>) -> TokenStream {
    match kind {
        Some(kind) => quote!(::dfe_serde::FieldKind::#kind),
        None => quote!(::dfe_serde::FieldKind::Str),
    }
}

fn field_descriptor(field: &MappedField<'_>) -> TokenStream {
    let attrs = &field.attrs;
    let name = &field.name;
    let ty = field.ty;
    let default_tag = name.to_lower_camel_case();

    let namespace = option_str(attrs.namespace.as_deref());
    let tag = match &attrs.tag {
        Some(TagAttr::Element(tag)) => {
            let tag = tag.clone().unwrap_or_else(|| default_tag.clone());
            quote! {
                ::std::option::Option::Some(::dfe_serde::Tag {
                    name: #tag,
                    namespace: #namespace,
                    placement: ::dfe_serde::Placement::Element,
                })
            }
        }
        Some(TagAttr::Attribute(tag)) => {
            let tag = tag.clone().unwrap_or_else(|| default_tag.clone());
            quote! {
                ::std::option::Option::Some(::dfe_serde::Tag {
                    name: #tag,
                    namespace: #namespace,
                    placement: ::dfe_serde::Placement::Attribute,
                })
            }
        }
        None => quote!(::std::option::Option::None),
    };

    let kind = kind_tokens(attrs.kind.as_ref());
    let id = attrs.id.clone().unwrap_or_default();
    let description = attrs.description.clone().unwrap_or_default();
    let min = attrs.min.unwrap_or(0);
    let max = attrs.max.unwrap_or(0);
    let order = attrs.order.unwrap_or(0);
    let ignore = attrs.ignore;
    let occurrence = match &attrs.occurrence {
        Some(occurrence) => quote!(::dfe_serde::Occurrence::#occurrence),
        None => quote!(::dfe_serde::Occurrence::Required),
    };
    let dictionary = match &attrs.dictionary {
        Some(dictionary) => {
            let tag = match &attrs.tag {
                Some(TagAttr::Element(Some(tag))) => tag.clone(),
                _ => default_tag.clone(),
            };
            dictionary_tokens(dictionary, &tag, attrs.namespace.as_deref())
        }
        None => quote!(::std::option::Option::None),
    };

    let (optional, classification) = if ignore {
        (quote!(false), quote!(::dfe_serde::classify::ignored))
    } else {
        (
            quote!(<#ty as ::dfe_serde::FieldType>::OPTIONAL),
            quote!(<#ty as ::dfe_serde::FieldType>::classification),
        )
    };

    quote! {
        ::dfe_serde::FieldDescriptor {
            name: #name,
            tag: #tag,
            kind: #kind,
            id: #id,
            description: #description,
            min: #min,
            max: #max,
            occurrence: #occurrence,
            order: #order,
            ignore: #ignore,
            dictionary: #dictionary,
            optional: #optional,
            classification: #classification,
        }
    }
}

fn entry_tokens(entry: &EntryAttrs, default_tag: &str, namespace: Option<&str>) -> TokenStream {
    let kind = kind_tokens(entry.kind.as_ref());
    let tag = entry.tag.clone().unwrap_or_else(|| default_tag.to_string());
    let namespace = option_str(entry.namespace.as_deref().or(namespace));
    let as_attribute = entry.attribute;
    quote! {
        ::dfe_serde::EntryDescriptor {
            kind: #kind,
            tag: #tag,
            namespace: #namespace,
            as_attribute: #as_attribute,
        }
    }
}

fn dictionary_tokens(
    dictionary: &DictionaryAttrs,
    field_tag: &str,
    field_namespace: Option<&str>,
) -> TokenStream {
    let tag = dictionary.tag.clone().unwrap_or_else(|| field_tag.to_string());
    let namespace_value = dictionary.namespace.as_deref().or(field_namespace);
    let namespace = option_str(namespace_value);
    let item = dictionary.item.clone().unwrap_or_else(|| "item".to_string());
    let key = entry_tokens(&dictionary.key, "key", namespace_value);
    let value = entry_tokens(&dictionary.value, "value", namespace_value);
    quote! {
        ::std::option::Option::Some(::dfe_serde::DictionaryDescriptor {
            tag: #tag,
            namespace: #namespace,
            item_tag: #item,
            key: #key,
            value: #value,
        })
    }
}
