//! Structural classification of field types.
//!
//! Every field falls in exactly one bucket, which selects the mapper used for
//! it. Precedence is fixed by the [`FieldType`](crate::FieldType) impls:
//! maps are dictionaries before anything else, `Vec`/boxed slices/`VecDeque`
//! are sequences unless they hold bytes, trait objects are interfaces,
//! root-marked types are roots, other derived types are classes, and
//! everything else (byte buffers included) is a primitive.

use std::fmt;

use crate::metadata::{FieldDescriptor, TypeDescriptor};
use crate::value::FieldType;

/// The structural bucket of a field type.
#[derive(Clone)]
pub enum Classification {
    Primitive,
    /// `Vec<T>`.
    List(Box<Classification>),
    /// `Box<[T]>`.
    Array(Box<Classification>),
    /// Any other sequence, e.g. `VecDeque<T>`.
    Enumerable(Box<Classification>),
    /// `BTreeMap<K, V>` or `HashMap<K, V>`.
    Dictionary {
        key: Box<Classification>,
        value: Box<Classification>,
        /// `V` admits absence, e.g. `Option<i32>`.
        optional_values: bool,
    },
    Class(fn() -> &'static TypeDescriptor),
    /// A `Box<dyn Trait>` slot, by interface name.
    Interface(&'static str),
    Root(fn() -> &'static TypeDescriptor),
}

impl Classification {
    pub fn name(&self) -> &'static str {
        match self {
            Classification::Primitive => "primitive",
            Classification::List(_) => "list",
            Classification::Array(_) => "array",
            Classification::Enumerable(_) => "enumerable",
            Classification::Dictionary { .. } => "dictionary",
            Classification::Class(_) => "class",
            Classification::Interface(_) => "interface",
            Classification::Root(_) => "root",
        }
    }

    /// Element classification for sequences.
    pub fn item(&self) -> Option<&Classification> {
        match self {
            Classification::List(item)
            | Classification::Array(item)
            | Classification::Enumerable(item) => Some(item),
            _ => None,
        }
    }

    pub fn is_sequence(&self) -> bool {
        self.item().is_some()
    }
}

impl PartialEq for Classification {
    fn eq(&self, other: &Self) -> bool {
        use Classification::*;
        match (self, other) {
            (Primitive, Primitive) => true,
            (List(a), List(b)) | (Array(a), Array(b)) | (Enumerable(a), Enumerable(b)) => a == b,
            (
                Dictionary {
                    key: ka,
                    value: va,
                    optional_values: oa,
                },
                Dictionary {
                    key: kb,
                    value: vb,
                    optional_values: ob,
                },
            ) => ka == kb && va == vb && oa == ob,
            (Class(a), Class(b)) | (Root(a), Root(b)) => std::ptr::eq(a(), b()),
            (Interface(a), Interface(b)) => a == b,
            _ => false,
        }
    }
}

impl fmt::Debug for Classification {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Classification::Primitive => f.write_str("Primitive"),
            Classification::List(item) => f.debug_tuple("List").field(item).finish(),
            Classification::Array(item) => f.debug_tuple("Array").field(item).finish(),
            Classification::Enumerable(item) => f.debug_tuple("Enumerable").field(item).finish(),
            Classification::Dictionary {
                key,
                value,
                optional_values,
            } => f
                .debug_struct("Dictionary")
                .field("key", key)
                .field("value", value)
                .field("optional_values", optional_values)
                .finish(),
            Classification::Class(descriptor) => {
                f.debug_tuple("Class").field(&descriptor().name).finish()
            }
            Classification::Interface(name) => f.debug_tuple("Interface").field(name).finish(),
            Classification::Root(descriptor) => {
                f.debug_tuple("Root").field(&descriptor().name).finish()
            }
        }
    }
}

/// Classification of a field as seen by the engine.
///
/// A root-marked type held by a field that names its own element is mapped
/// as an ordinary class under that element.
pub fn classify(field: &FieldDescriptor) -> Classification {
    match (field.classification)() {
        Classification::Root(descriptor) if field.has_element_tag() => {
            Classification::Class(descriptor)
        }
        other => other,
    }
}

/// Classification of a Rust type.
pub fn classify_type<T: FieldType>() -> Classification {
    T::classification()
}

/// Placeholder classification for fields excluded from mapping.
pub fn ignored() -> Classification {
    Classification::Primitive
}
