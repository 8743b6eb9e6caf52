//! Static metadata describing how a type's fields map to XML nodes.
//!
//! Descriptors are normally generated by `#[derive(DfeObject)]` and live in
//! `static` items, so the engine never builds or caches them at runtime.

use crate::classify::Classification;
use crate::object::DfeObject;

pub use dfe_serde_support::FieldKind;

/// Rule deciding whether a leaf is emitted.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Occurrence {
    /// Always emitted, empty when the value is null.
    #[default]
    Required,
    /// Omitted when the value is null or empty text.
    OptionalIfNull,
    /// Omitted when the value is null or numerically zero.
    RequiredIfNonZero,
}

/// Whether a field is written as a child element or as an attribute.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Placement {
    Element,
    Attribute,
}

/// The XML name a field is written under.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Tag {
    pub name: &'static str,
    pub namespace: Option<&'static str>,
    pub placement: Placement,
}

impl Tag {
    pub const fn element(name: &'static str) -> Self {
        Tag {
            name,
            namespace: None,
            placement: Placement::Element,
        }
    }

    pub const fn attribute(name: &'static str) -> Self {
        Tag {
            name,
            namespace: None,
            placement: Placement::Attribute,
        }
    }
}

/// Key or value side of a dictionary entry.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct EntryDescriptor {
    pub kind: FieldKind,
    pub tag: &'static str,
    pub namespace: Option<&'static str>,
    /// Keys only: write the key as an attribute of the item element.
    pub as_attribute: bool,
}

/// Layout of a dictionary field: `<tag><item key=".."><value/></item>..</tag>`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct DictionaryDescriptor {
    pub tag: &'static str,
    pub namespace: Option<&'static str>,
    pub item_tag: &'static str,
    pub key: EntryDescriptor,
    pub value: EntryDescriptor,
}

/// Everything the engine knows about one field.
#[derive(Debug)]
pub struct FieldDescriptor {
    /// Rust field identifier, used with [`DfeObject::field`] and [`DfeObject::set_field`].
    pub name: &'static str,
    pub tag: Option<Tag>,
    pub kind: FieldKind,
    /// Identifier of the field in the fiscal layout manual, e.g. `Q07`.
    pub id: &'static str,
    pub description: &'static str,
    /// Minimum text length, or minimum element count for sequences.
    pub min: usize,
    /// Maximum text length, or maximum element count for sequences. `0` means unbounded.
    pub max: usize,
    pub occurrence: Occurrence,
    pub order: i32,
    pub ignore: bool,
    pub dictionary: Option<DictionaryDescriptor>,
    /// The Rust type admits absence (`Option<T>`).
    pub optional: bool,
    pub classification: fn() -> Classification,
}

impl FieldDescriptor {
    pub fn is_attribute(&self) -> bool {
        matches!(self.tag, Some(Tag { placement: Placement::Attribute, .. }))
    }

    /// True when the field names its own child element.
    pub fn has_element_tag(&self) -> bool {
        matches!(self.tag, Some(Tag { placement: Placement::Element, .. }))
    }
}

/// Root marking of a type.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RootTag {
    /// Element name; the type name is used when absent.
    pub name: Option<&'static str>,
    pub namespace: Option<&'static str>,
    /// Further element names accepted when reading.
    pub alternates: &'static [&'static str],
}

/// Everything the engine knows about one type.
#[derive(Debug)]
pub struct TypeDescriptor {
    pub name: &'static str,
    pub root: Option<RootTag>,
    pub fields: &'static [FieldDescriptor],
    pub factory: fn() -> Box<dyn DfeObject>,
}

impl TypeDescriptor {
    /// Builds a bare instance.
    pub fn create(&self) -> Box<dyn DfeObject> {
        (self.factory)()
    }

    pub fn field(&self, name: &str) -> Option<&'static FieldDescriptor> {
        self.fields.iter().find(|field| field.name == name)
    }

    pub fn is_root(&self) -> bool {
        self.root.is_some()
    }

    /// Element name the type is written under when no field tag applies.
    pub fn root_name(&self) -> &'static str {
        self.root.and_then(|root| root.name).unwrap_or(self.name)
    }

    pub fn root_namespace(&self) -> Option<&'static str> {
        self.root.and_then(|root| root.namespace)
    }

    /// Element names accepted for this type when reading.
    ///
    /// An explicit root name comes first, then any alternates, then the type name.
    pub fn root_names(&self) -> Vec<&'static str> {
        let mut names = Vec::new();
        if let Some(root) = self.root {
            names.extend(root.name);
            names.extend(root.alternates.iter().copied());
        }
        if !names.contains(&self.name) {
            names.push(self.name);
        }
        names
    }

    pub fn accepts(&self, element_name: &str) -> bool {
        self.root_names().contains(&element_name)
    }

    /// Mapped fields sorted by `order`, declaration order among ties.
    pub fn ordered_fields(&self) -> Vec<&'static FieldDescriptor> {
        let mut fields: Vec<_> = self.fields.iter().filter(|field| !field.ignore).collect();
        fields.sort_by_key(|field| field.order);
        fields
    }
}
