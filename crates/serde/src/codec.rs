//! Primitive codec: leaf values to and from text.

use dfe_serde_support::{FieldKind, FormatError, Primitive, format, text};

use crate::options::SerializerOptions;

/// Renders and parses leaf values according to their declared kind.
pub trait PrimitiveCodec: Send + Sync {
    fn to_text(
        &self,
        value: &Primitive,
        kind: FieldKind,
        options: &SerializerOptions,
    ) -> Result<String, FormatError>;

    fn from_text(
        &self,
        text: &str,
        kind: FieldKind,
        options: &SerializerOptions,
    ) -> Result<Primitive, FormatError>;

    /// Value of a leaf whose node is absent.
    fn default_for(&self, kind: FieldKind) -> Primitive {
        format::default_for(kind)
    }
}

/// Codec built on the fixed kind formats, plus text normalisation from the options.
#[derive(Debug, Default, Clone, Copy)]
pub struct DefaultCodec;

impl PrimitiveCodec for DefaultCodec {
    fn to_text(
        &self,
        value: &Primitive,
        kind: FieldKind,
        options: &SerializerOptions,
    ) -> Result<String, FormatError> {
        let rendered = format::format(value, kind)?;
        if kind != FieldKind::Str {
            return Ok(rendered);
        }
        let rendered = if options.trim_text {
            rendered.trim().to_string()
        } else {
            rendered
        };
        Ok(if options.remove_accents {
            text::remove_accents(&rendered)
        } else {
            rendered
        })
    }

    fn from_text(
        &self,
        text: &str,
        kind: FieldKind,
        options: &SerializerOptions,
    ) -> Result<Primitive, FormatError> {
        if kind == FieldKind::Str && options.trim_text {
            return format::parse(text.trim(), kind);
        }
        format::parse(text, kind)
    }
}
