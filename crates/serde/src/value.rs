//! Dynamic field access.
//!
//! The engine reads fields as borrowed [`FieldRef`]s and writes them back as
//! owned [`FieldValue`]s. [`FieldType`] converts between those and concrete
//! Rust types, leniently: a decimal field accepts an integer or numeric text,
//! a string field accepts any leaf rendered with `Display`.

use std::collections::{BTreeMap, HashMap, VecDeque};
use std::hash::Hash;

use chrono::{DateTime, FixedOffset, NaiveDate, NaiveDateTime, NaiveTime};
use rust_decimal::Decimal;
use rust_decimal::prelude::ToPrimitive;
use thiserror::Error;

use dfe_serde_support::{FieldKind, Primitive};

use crate::classify::Classification;
use crate::object::DfeObject;

/// A borrowed view of a field value.
#[derive(Debug)]
pub enum FieldRef<'a> {
    Null,
    Primitive(Primitive),
    Object(&'a dyn DfeObject),
    Sequence(Vec<FieldRef<'a>>),
    Map(Vec<(FieldRef<'a>, FieldRef<'a>)>),
}

impl FieldRef<'_> {
    pub fn describe(&self) -> &'static str {
        match self {
            FieldRef::Null => "null",
            FieldRef::Primitive(p) => p.type_name(),
            FieldRef::Object(_) => "object",
            FieldRef::Sequence(_) => "sequence",
            FieldRef::Map(_) => "map",
        }
    }

    pub fn is_null(&self) -> bool {
        matches!(self, FieldRef::Null)
    }
}

/// An owned field value produced while deserializing.
#[derive(Debug)]
pub enum FieldValue {
    Null,
    Primitive(Primitive),
    Object(Box<dyn DfeObject>),
    Sequence(Vec<FieldValue>),
    Map(Vec<(FieldValue, FieldValue)>),
}

impl FieldValue {
    pub fn describe(&self) -> &'static str {
        match self {
            FieldValue::Null => "null",
            FieldValue::Primitive(p) => p.type_name(),
            FieldValue::Object(_) => "object",
            FieldValue::Sequence(_) => "sequence",
            FieldValue::Map(_) => "map",
        }
    }
}

impl From<Primitive> for FieldValue {
    fn from(value: Primitive) -> Self {
        FieldValue::Primitive(value)
    }
}

/// Errors converting a [`FieldValue`] into a concrete field type.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ValueError {
    #[error("expected {expected}, found {found}")]
    Mismatch {
        expected: &'static str,
        found: &'static str,
    },

    #[error("`{text}` cannot be converted to {target}")]
    Convert { target: &'static str, text: String },

    #[error("{value} is out of range for {target}")]
    OutOfRange { target: &'static str, value: String },

    #[error("`{value}` is not a known value of {target}")]
    UnknownVariant { target: &'static str, value: String },

    #[error("no mapped field named `{0}`")]
    UnknownField(String),
}

/// A Rust type that can be held by a mapped field.
pub trait FieldType: Sized {
    /// The type admits absence.
    const OPTIONAL: bool = false;

    /// The type is a byte. Sequences of it are byte buffers, mapped as one leaf.
    #[doc(hidden)]
    const BYTE: bool = false;

    fn classification() -> Classification;

    fn to_field_ref(&self) -> FieldRef<'_>;

    fn from_field_value(value: FieldValue) -> Result<Self, ValueError>;

    #[doc(hidden)]
    fn to_byte(&self) -> Option<u8> {
        None
    }

    #[doc(hidden)]
    fn from_byte(_byte: u8) -> Option<Self> {
        None
    }
}

fn mismatch(expected: &'static str, found: &FieldValue) -> ValueError {
    ValueError::Mismatch {
        expected,
        found: found.describe(),
    }
}

fn integer(value: FieldValue, target: &'static str) -> Result<i64, ValueError> {
    match value {
        FieldValue::Null => Ok(0),
        FieldValue::Primitive(Primitive::Int(n)) => Ok(n),
        FieldValue::Primitive(Primitive::Bool(b)) => Ok(i64::from(b)),
        FieldValue::Primitive(Primitive::Decimal(d)) if d.fract().is_zero() => {
            d.to_i64().ok_or_else(|| ValueError::OutOfRange {
                target,
                value: d.to_string(),
            })
        }
        FieldValue::Primitive(Primitive::Str(s)) if s.trim().is_empty() => Ok(0),
        FieldValue::Primitive(Primitive::Str(s)) => {
            s.trim().parse().map_err(|_| ValueError::Convert { target, text: s })
        }
        FieldValue::Primitive(p) => Err(ValueError::Convert {
            target,
            text: p.to_string(),
        }),
        other => Err(mismatch(target, &other)),
    }
}

macro_rules! impl_integer {
    ($($ty:ty),* $(,)?) => {
        $(
            impl FieldType for $ty {
                fn classification() -> Classification {
                    Classification::Primitive
                }

                fn to_field_ref(&self) -> FieldRef<'_> {
                    FieldRef::Primitive(Primitive::Int(i64::from(*self)))
                }

                fn from_field_value(value: FieldValue) -> Result<Self, ValueError> {
                    let n = integer(value, stringify!($ty))?;
                    <$ty>::try_from(n).map_err(|_| ValueError::OutOfRange {
                        target: stringify!($ty),
                        value: n.to_string(),
                    })
                }
            }
        )*
    };
}

impl_integer!(i8, i16, i32, i64, u16, u32);

impl FieldType for u8 {
    const BYTE: bool = true;

    fn classification() -> Classification {
        Classification::Primitive
    }

    fn to_field_ref(&self) -> FieldRef<'_> {
        FieldRef::Primitive(Primitive::Int(i64::from(*self)))
    }

    fn from_field_value(value: FieldValue) -> Result<Self, ValueError> {
        let n = integer(value, "u8")?;
        u8::try_from(n).map_err(|_| ValueError::OutOfRange {
            target: "u8",
            value: n.to_string(),
        })
    }

    fn to_byte(&self) -> Option<u8> {
        Some(*self)
    }

    fn from_byte(byte: u8) -> Option<Self> {
        Some(byte)
    }
}

impl FieldType for String {
    fn classification() -> Classification {
        Classification::Primitive
    }

    fn to_field_ref(&self) -> FieldRef<'_> {
        FieldRef::Primitive(Primitive::Str(self.clone()))
    }

    fn from_field_value(value: FieldValue) -> Result<Self, ValueError> {
        match value {
            FieldValue::Null => Ok(String::new()),
            FieldValue::Primitive(Primitive::Str(s)) => Ok(s),
            FieldValue::Primitive(p) => Ok(p.to_string()),
            other => Err(mismatch("string", &other)),
        }
    }
}

impl FieldType for bool {
    fn classification() -> Classification {
        Classification::Primitive
    }

    fn to_field_ref(&self) -> FieldRef<'_> {
        FieldRef::Primitive(Primitive::Bool(*self))
    }

    fn from_field_value(value: FieldValue) -> Result<Self, ValueError> {
        match value {
            FieldValue::Null => Ok(false),
            FieldValue::Primitive(Primitive::Bool(b)) => Ok(b),
            FieldValue::Primitive(Primitive::Int(n)) => Ok(n != 0),
            FieldValue::Primitive(Primitive::Str(s)) => match s.trim() {
                "" | "0" | "false" => Ok(false),
                "1" | "true" => Ok(true),
                _ => Err(ValueError::Convert {
                    target: "bool",
                    text: s,
                }),
            },
            other => Err(mismatch("bool", &other)),
        }
    }
}

impl FieldType for Decimal {
    fn classification() -> Classification {
        Classification::Primitive
    }

    fn to_field_ref(&self) -> FieldRef<'_> {
        FieldRef::Primitive(Primitive::Decimal(*self))
    }

    fn from_field_value(value: FieldValue) -> Result<Self, ValueError> {
        match value {
            FieldValue::Null => Ok(Decimal::ZERO),
            FieldValue::Primitive(Primitive::Decimal(d)) => Ok(d),
            FieldValue::Primitive(Primitive::Int(n)) => Ok(Decimal::from(n)),
            FieldValue::Primitive(Primitive::Str(s)) if s.trim().is_empty() => Ok(Decimal::ZERO),
            FieldValue::Primitive(Primitive::Str(s)) => {
                s.trim().parse().map_err(|_| ValueError::Convert {
                    target: "Decimal",
                    text: s,
                })
            }
            other => Err(mismatch("Decimal", &other)),
        }
    }
}

impl FieldType for NaiveDate {
    fn classification() -> Classification {
        Classification::Primitive
    }

    fn to_field_ref(&self) -> FieldRef<'_> {
        FieldRef::Primitive(Primitive::Date(*self))
    }

    fn from_field_value(value: FieldValue) -> Result<Self, ValueError> {
        match value {
            FieldValue::Null => Ok(NaiveDate::default()),
            FieldValue::Primitive(Primitive::Date(d)) => Ok(d),
            FieldValue::Primitive(Primitive::DateTime(dt)) => Ok(dt.date()),
            FieldValue::Primitive(Primitive::DateTimeTz(dt)) => Ok(dt.date_naive()),
            other => Err(mismatch("NaiveDate", &other)),
        }
    }
}

impl FieldType for NaiveTime {
    fn classification() -> Classification {
        Classification::Primitive
    }

    fn to_field_ref(&self) -> FieldRef<'_> {
        FieldRef::Primitive(Primitive::Time(*self))
    }

    fn from_field_value(value: FieldValue) -> Result<Self, ValueError> {
        match value {
            FieldValue::Null => Ok(NaiveTime::MIN),
            FieldValue::Primitive(Primitive::Time(t)) => Ok(t),
            FieldValue::Primitive(Primitive::DateTime(dt)) => Ok(dt.time()),
            FieldValue::Primitive(Primitive::DateTimeTz(dt)) => Ok(dt.time()),
            other => Err(mismatch("NaiveTime", &other)),
        }
    }
}

impl FieldType for NaiveDateTime {
    fn classification() -> Classification {
        Classification::Primitive
    }

    fn to_field_ref(&self) -> FieldRef<'_> {
        FieldRef::Primitive(Primitive::DateTime(*self))
    }

    fn from_field_value(value: FieldValue) -> Result<Self, ValueError> {
        match value {
            FieldValue::Null => Ok(NaiveDateTime::default()),
            FieldValue::Primitive(Primitive::DateTime(dt)) => Ok(dt),
            FieldValue::Primitive(Primitive::DateTimeTz(dt)) => Ok(dt.naive_local()),
            FieldValue::Primitive(Primitive::Date(d)) => Ok(d.and_time(NaiveTime::MIN)),
            other => Err(mismatch("NaiveDateTime", &other)),
        }
    }
}

impl FieldType for DateTime<FixedOffset> {
    fn classification() -> Classification {
        Classification::Primitive
    }

    fn to_field_ref(&self) -> FieldRef<'_> {
        FieldRef::Primitive(Primitive::DateTimeTz(*self))
    }

    fn from_field_value(value: FieldValue) -> Result<Self, ValueError> {
        match value {
            FieldValue::Null => Ok(DateTime::<FixedOffset>::default()),
            FieldValue::Primitive(Primitive::DateTimeTz(dt)) => Ok(dt),
            other => Err(mismatch("DateTime<FixedOffset>", &other)),
        }
    }
}

impl<T: FieldType> FieldType for Option<T> {
    const OPTIONAL: bool = true;

    fn classification() -> Classification {
        T::classification()
    }

    fn to_field_ref(&self) -> FieldRef<'_> {
        match self {
            Some(value) => value.to_field_ref(),
            None => FieldRef::Null,
        }
    }

    fn from_field_value(value: FieldValue) -> Result<Self, ValueError> {
        match value {
            FieldValue::Null => Ok(None),
            other => T::from_field_value(other).map(Some),
        }
    }
}

fn sequence<T: FieldType>(value: FieldValue) -> Result<Vec<T>, ValueError> {
    if T::BYTE {
        return bytes(value);
    }
    match value {
        FieldValue::Null => Ok(Vec::new()),
        FieldValue::Sequence(items) => items.into_iter().map(T::from_field_value).collect(),
        other => Err(mismatch("sequence", &other)),
    }
}

fn sequence_class<T: FieldType>(
    wrap: fn(Box<Classification>) -> Classification,
) -> Classification {
    if T::BYTE {
        Classification::Primitive
    } else {
        wrap(Box::new(T::classification()))
    }
}

fn sequence_ref<'a, T: FieldType + 'a>(items: impl Iterator<Item = &'a T>) -> FieldRef<'a> {
    if T::BYTE {
        FieldRef::Primitive(Primitive::Bytes(items.filter_map(T::to_byte).collect()))
    } else {
        FieldRef::Sequence(items.map(T::to_field_ref).collect())
    }
}

/// Byte buffers accept raw bytes, or base64 text from a leaf not declared `Base64`.
fn bytes<T: FieldType>(value: FieldValue) -> Result<Vec<T>, ValueError> {
    let raw = match value {
        FieldValue::Null => Vec::new(),
        FieldValue::Primitive(Primitive::Bytes(raw)) => raw,
        FieldValue::Primitive(Primitive::Str(text)) => {
            match dfe_serde_support::parse(&text, FieldKind::Base64) {
                Ok(Primitive::Bytes(raw)) => raw,
                _ => {
                    return Err(ValueError::Convert {
                        target: "bytes",
                        text,
                    });
                }
            }
        }
        other => return Err(mismatch("bytes", &other)),
    };
    Ok(raw.into_iter().filter_map(T::from_byte).collect())
}

impl<T: FieldType> FieldType for Vec<T> {
    fn classification() -> Classification {
        sequence_class::<T>(Classification::List)
    }

    fn to_field_ref(&self) -> FieldRef<'_> {
        sequence_ref(self.iter())
    }

    fn from_field_value(value: FieldValue) -> Result<Self, ValueError> {
        sequence(value)
    }
}

impl<T: FieldType> FieldType for Box<[T]> {
    fn classification() -> Classification {
        sequence_class::<T>(Classification::Array)
    }

    fn to_field_ref(&self) -> FieldRef<'_> {
        sequence_ref(self.iter())
    }

    fn from_field_value(value: FieldValue) -> Result<Self, ValueError> {
        sequence(value).map(Vec::into_boxed_slice)
    }
}

impl<T: FieldType> FieldType for VecDeque<T> {
    fn classification() -> Classification {
        sequence_class::<T>(Classification::Enumerable)
    }

    fn to_field_ref(&self) -> FieldRef<'_> {
        sequence_ref(self.iter())
    }

    fn from_field_value(value: FieldValue) -> Result<Self, ValueError> {
        sequence(value).map(VecDeque::from)
    }
}

fn dictionary_class<K: FieldType, V: FieldType>() -> Classification {
    Classification::Dictionary {
        key: Box::new(K::classification()),
        value: Box::new(V::classification()),
        optional_values: V::OPTIONAL,
    }
}

fn entries<K: FieldType, V: FieldType>(value: FieldValue) -> Result<Vec<(K, V)>, ValueError> {
    match value {
        FieldValue::Null => Ok(Vec::new()),
        FieldValue::Map(entries) => entries
            .into_iter()
            .map(|(key, value)| Ok((K::from_field_value(key)?, V::from_field_value(value)?)))
            .collect(),
        other => Err(mismatch("map", &other)),
    }
}

impl<K: FieldType + Ord, V: FieldType> FieldType for BTreeMap<K, V> {
    fn classification() -> Classification {
        dictionary_class::<K, V>()
    }

    fn to_field_ref(&self) -> FieldRef<'_> {
        FieldRef::Map(
            self.iter()
                .map(|(key, value)| (key.to_field_ref(), value.to_field_ref()))
                .collect(),
        )
    }

    fn from_field_value(value: FieldValue) -> Result<Self, ValueError> {
        entries(value).map(|entries| entries.into_iter().collect())
    }
}

impl<K: FieldType + Eq + Hash, V: FieldType> FieldType for HashMap<K, V> {
    fn classification() -> Classification {
        dictionary_class::<K, V>()
    }

    fn to_field_ref(&self) -> FieldRef<'_> {
        FieldRef::Map(
            self.iter()
                .map(|(key, value)| (key.to_field_ref(), value.to_field_ref()))
                .collect(),
        )
    }

    fn from_field_value(value: FieldValue) -> Result<Self, ValueError> {
        entries(value).map(|entries| entries.into_iter().collect())
    }
}
