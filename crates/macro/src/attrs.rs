use syn::meta::ParseNestedMeta;
use syn::punctuated::Punctuated;
use syn::{Attribute, Ident, LitInt, LitStr, Path, Token};

/// `#[dfe(..)]` on the struct.
#[derive(Default)]
pub struct ContainerAttrs {
    /// `None` when not a root, `Some(None)` for a bare `root` flag.
    pub root: Option<Option<String>>,
    pub namespace: Option<String>,
    pub alternates: Vec<String>,
    pub factory: Option<Path>,
}

pub enum TagAttr {
    Element(Option<String>),
    Attribute(Option<String>),
}

#[derive(Default)]
pub struct EntryAttrs {
    pub kind: Option<Ident>,
    pub tag: Option<String>,
    pub namespace: Option<String>,
    pub attribute: bool,
}

#[derive(Default)]
pub struct DictionaryAttrs {
    pub tag: Option<String>,
    pub namespace: Option<String>,
    pub item: Option<String>,
    pub key: EntryAttrs,
    pub value: EntryAttrs,
}

/// `#[dfe(..)]` on a field.
#[derive(Default)]
pub struct FieldAttrs {
    pub tag: Option<TagAttr>,
    pub namespace: Option<String>,
    pub kind: Option<Ident>,
    pub id: Option<String>,
    pub description: Option<String>,
    pub min: Option<usize>,
    pub max: Option<usize>,
    pub occurrence: Option<Ident>,
    pub order: Option<i32>,
    pub ignore: bool,
    pub should_serialize: Option<Path>,
    pub dictionary: Option<DictionaryAttrs>,
}

/// `#[dfe(..)]` on an enum variant.
#[derive(Default)]
pub struct VariantAttrs {
    pub value: Option<String>,
}

fn dfe_attrs(attrs: &[Attribute]) -> impl Iterator<Item = &Attribute> {
    attrs.iter().filter(|attr| attr.path().is_ident("dfe"))
}

fn string(meta: &ParseNestedMeta) -> syn::Result<String> {
    let lit: LitStr = meta.value()?.parse()?;
    Ok(lit.value())
}

/// `name` alone or `name = "value"`.
fn optional_string(meta: &ParseNestedMeta) -> syn::Result<Option<String>> {
    if meta.input.peek(Token![=]) {
        string(meta).map(Some)
    } else {
        Ok(None)
    }
}

fn path(meta: &ParseNestedMeta) -> syn::Result<Path> {
    let lit: LitStr = meta.value()?.parse()?;
    lit.parse()
}

fn ident(meta: &ParseNestedMeta) -> syn::Result<Ident> {
    meta.value()?.parse()
}

fn int<N>(meta: &ParseNestedMeta) -> syn::Result<N>
where
    N: std::str::FromStr,
    N::Err: std::fmt::Display,
{
    let lit: LitInt = meta.value()?.parse()?;
    lit.base10_parse()
}

/// Parse a boolean value or treat standalone flag as true
fn flag(meta: &ParseNestedMeta) -> syn::Result<bool> {
    if meta.input.is_empty() || meta.input.peek(Token![,]) {
        Ok(true)
    } else {
        let lit: syn::LitBool = meta.value()?.parse()?;
        Ok(lit.value)
    }
}

impl ContainerAttrs {
    pub fn parse(attrs: &[Attribute]) -> syn::Result<Self> {
        let mut parsed = ContainerAttrs::default();
        for attr in dfe_attrs(attrs) {
            attr.parse_nested_meta(|meta| {
                if meta.path.is_ident("root") {
                    parsed.root = Some(optional_string(&meta)?);
                } else if meta.path.is_ident("namespace") {
                    parsed.namespace = Some(string(&meta)?);
                } else if meta.path.is_ident("alternates") {
                    let content;
                    syn::parenthesized!(content in meta.input);
                    let names = Punctuated::<LitStr, Token![,]>::parse_terminated(&content)?;
                    parsed.alternates.extend(names.iter().map(LitStr::value));
                } else if meta.path.is_ident("factory") {
                    parsed.factory = Some(path(&meta)?);
                } else {
                    return Err(meta.error("unknown dfe container attribute"));
                }
                Ok(())
            })?;
        }
        Ok(parsed)
    }
}

impl EntryAttrs {
    fn parse(meta: &ParseNestedMeta) -> syn::Result<Self> {
        let mut parsed = EntryAttrs::default();
        meta.parse_nested_meta(|inner| {
            if inner.path.is_ident("kind") {
                parsed.kind = Some(ident(&inner)?);
            } else if inner.path.is_ident("tag") {
                parsed.tag = Some(string(&inner)?);
            } else if inner.path.is_ident("namespace") {
                parsed.namespace = Some(string(&inner)?);
            } else if inner.path.is_ident("attribute") {
                parsed.attribute = flag(&inner)?;
            } else {
                return Err(inner.error("unknown dfe dictionary entry attribute"));
            }
            Ok(())
        })?;
        Ok(parsed)
    }
}

impl DictionaryAttrs {
    fn parse(meta: &ParseNestedMeta) -> syn::Result<Self> {
        let mut parsed = DictionaryAttrs::default();
        if !meta.input.peek(syn::token::Paren) {
            return Ok(parsed);
        }
        meta.parse_nested_meta(|inner| {
            if inner.path.is_ident("tag") {
                parsed.tag = Some(string(&inner)?);
            } else if inner.path.is_ident("namespace") {
                parsed.namespace = Some(string(&inner)?);
            } else if inner.path.is_ident("item") {
                parsed.item = Some(string(&inner)?);
            } else if inner.path.is_ident("key") {
                parsed.key = EntryAttrs::parse(&inner)?;
            } else if inner.path.is_ident("value") {
                parsed.value = EntryAttrs::parse(&inner)?;
            } else {
                return Err(inner.error("unknown dfe dictionary attribute"));
            }
            Ok(())
        })?;
        Ok(parsed)
    }
}

impl FieldAttrs {
    pub fn parse(attrs: &[Attribute]) -> syn::Result<Self> {
        let mut parsed = FieldAttrs::default();
        for attr in dfe_attrs(attrs) {
            attr.parse_nested_meta(|meta| {
                if meta.path.is_ident("element") {
                    parsed.tag = Some(TagAttr::Element(optional_string(&meta)?));
                } else if meta.path.is_ident("attribute") {
                    parsed.tag = Some(TagAttr::Attribute(optional_string(&meta)?));
                } else if meta.path.is_ident("namespace") {
                    parsed.namespace = Some(string(&meta)?);
                } else if meta.path.is_ident("kind") {
                    parsed.kind = Some(ident(&meta)?);
                } else if meta.path.is_ident("id") {
                    parsed.id = Some(string(&meta)?);
                } else if meta.path.is_ident("description") {
                    parsed.description = Some(string(&meta)?);
                } else if meta.path.is_ident("min") {
                    parsed.min = Some(int(&meta)?);
                } else if meta.path.is_ident("max") {
                    parsed.max = Some(int(&meta)?);
                } else if meta.path.is_ident("occurrence") {
                    parsed.occurrence = Some(ident(&meta)?);
                } else if meta.path.is_ident("order") {
                    parsed.order = Some(int(&meta)?);
                } else if meta.path.is_ident("ignore") {
                    parsed.ignore = flag(&meta)?;
                } else if meta.path.is_ident("should_serialize") {
                    parsed.should_serialize = Some(path(&meta)?);
                } else if meta.path.is_ident("dictionary") {
                    parsed.dictionary = Some(DictionaryAttrs::parse(&meta)?);
                } else {
                    return Err(meta.error("unknown dfe field attribute"));
                }
                Ok(())
            })?;
        }
        Ok(parsed)
    }
}

impl VariantAttrs {
    pub fn parse(attrs: &[Attribute]) -> syn::Result<Self> {
        let mut parsed = VariantAttrs::default();
        for attr in dfe_attrs(attrs) {
            attr.parse_nested_meta(|meta| {
                if meta.path.is_ident("value") {
                    parsed.value = Some(string(&meta)?);
                } else {
                    return Err(meta.error("unknown dfe variant attribute"));
                }
                Ok(())
            })?;
        }
        Ok(parsed)
    }
}
