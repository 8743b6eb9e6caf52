//! Leaf-level helpers shared by the DFe mapping engine.
//!
//! The engine in `dfe-serde` only decides *whether* a field is a leaf and
//! *where* its text goes. Everything about what that text looks like lives
//! here:
//!
//! - [`FieldKind`]: the declared kind of a leaf field (`Str`, `Int`, `De2`, ...)
//! - [`Primitive`]: a leaf value detached from the Rust type that holds it
//! - [`format`]: kind-driven rendering, parsing and defaults
//! - [`text`]: text normalisation applied to string kinds

pub mod format;
pub mod kind;
pub mod primitive;
pub mod text;

pub use format::{FormatError, default_for, format, parse};
pub use kind::FieldKind;
pub use primitive::Primitive;
