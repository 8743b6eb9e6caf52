//! # DFe Serde
//!
//! Metadata-driven mapping between Brazilian fiscal documents (CF-e SAT,
//! NF-e) and their XML trees.
//!
//! ## Features
//!
//! - **Declarative mapping**: `#[derive(DfeObject)]` attaches a static
//!   [`TypeDescriptor`] to a struct. Each field declares its tag, kind,
//!   length bounds, occurrence rule and order.
//! - **Structural dispatch**: fields are classified as primitives,
//!   sequences, dictionaries, classes, interfaces or roots, and each bucket
//!   has its own mapper.
//! - **Polymorphic slots**: `Box<dyn Trait>` fields are resolved by element
//!   name through a [`TypeRegistry`] filled by [`dfe_interface!`].
//! - **Error locality**: a [`MappingError`] names the innermost type and field
//!   together with the full path from the document root.
//! - **XML text** (`xml` feature): quick-xml for writing, roxmltree for reading.
//!
//! ## Field Kinds
//!
//! | Kind | Text |
//! |------|------|
//! | `Str` | trimmed, optionally without accents |
//! | `Int` | `42` |
//! | `De2` | `10.50` |
//! | `DatCFe` | `20240301` |
//! | `HorCFe` | `140500` |
//! | `DatHorTz` | `2024-03-01T14:05:00-03:00` |
//!
//! ## Example
//!
//! ```ignore
//! use dfe_serde::{DfeObject, DfeSerializer, FieldKind};
//! use rust_decimal::Decimal;
//!
//! #[derive(Debug, Default, DfeObject)]
//! #[dfe(root = "PISAliq")]
//! pub struct ImpostoPisAliq {
//!     #[dfe(element = "CST", id = "Q06", min = 2, max = 2)]
//!     pub cst: String,
//!     #[dfe(element = "vBC", id = "Q07", kind = De2, max = 15)]
//!     pub v_bc: Decimal,
//! }
//!
//! let serializer = DfeSerializer::default();
//! let xml = serializer.to_xml_string(&pis)?;
//! let back: ImpostoPisAliq = serializer.from_xml_str(&xml)?;
//! ```

extern crate self as dfe_serde;

pub mod alert;
pub mod classify;
pub mod codec;
pub mod engine;
pub mod error;
pub mod metadata;
pub mod object;
pub mod options;
pub mod resolver;
pub mod serializer;
pub mod tree;
pub mod value;

#[cfg(feature = "xml")]
pub mod xml;

pub use alert::{Alert, AlertKind};
pub use classify::{Classification, classify, classify_type};
pub use codec::{DefaultCodec, PrimitiveCodec};
pub use error::{Cause, DfeError, Direction, ErrorKind, Frame, MappingError, Result};
pub use metadata::{
    DictionaryDescriptor, EntryDescriptor, FieldDescriptor, FieldKind, Occurrence, Placement,
    RootTag, Tag, TypeDescriptor,
};
pub use object::{DfeInterface, DfeObject, DfeType};
pub use options::SerializerOptions;
pub use resolver::{TypeRegistry, TypeResolver};
pub use serializer::DfeSerializer;
pub use tree::{Attribute, Element, Node};
pub use value::{FieldRef, FieldType, FieldValue, ValueError};

pub use dfe_serde_support::{FormatError, Primitive};

#[cfg(feature = "derive")]
pub use dfe_macro::{DfeEnum, DfeObject};
