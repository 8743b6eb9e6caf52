//! Error types for DFe serialization and deserialization.
//!
//! Mapping failures carry the path from the document root to the failing
//! field. Each recursion level pushes a [`Frame`] on the way out, so the
//! innermost declaring type and field are always known:
//!
//! ```text
//! failed to serialize field `v_pis` of `ImpostoPisAliq` at Cfe.inf_cfe.det[1].imposto.pis.v_pis: ...
//! ```

use std::fmt;

use dfe_serde_support::FormatError;
use thiserror::Error;

use crate::value::ValueError;

/// Which walk produced the error.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Direction {
    Serialize,
    Deserialize,
}

impl fmt::Display for Direction {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Direction::Serialize => f.write_str("serialize"),
            Direction::Deserialize => f.write_str("deserialize"),
        }
    }
}

/// One step of the path from the document root to the failure.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Frame {
    /// An object of the given type was being mapped.
    Object { type_name: &'static str },
    /// A field of the given declaring type was being mapped.
    Field {
        type_name: &'static str,
        field: &'static str,
    },
    /// An element of a sequence.
    Index(usize),
    /// An entry of a dictionary, by its key text.
    Key(String),
}

/// Broad category of a [`MappingError`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorKind {
    /// A field's descriptor, shape or value is inconsistent with its classification.
    FieldMapping,
    /// An object failed outside of any single field.
    ObjectMapping,
    /// Structural nodes expected on deserialize are absent.
    ShapeMismatch,
}

/// The underlying reason of a mapping failure.
#[derive(Error, Debug)]
pub enum Cause {
    #[error("no element or attribute tag is declared")]
    MissingTag,

    #[error("field is classified as a dictionary but declares no dictionary metadata")]
    MissingDictionary,

    #[error("{0} cannot be an element of a sequence or dictionary")]
    UnsupportedItem(&'static str),

    #[error("required node <{tag}> is missing")]
    MissingNode { tag: String },

    #[error("no child element resolves to an implementation of {interface}")]
    Unresolved { interface: &'static str },

    #[error("element <{found}> is not a root of {type_name} (expected one of: {expected})")]
    RootMismatch {
        type_name: &'static str,
        found: String,
        expected: String,
    },

    #[error(transparent)]
    Format(#[from] FormatError),

    #[error(transparent)]
    Value(#[from] ValueError),
}

/// A failure while mapping an object graph, with the path to the failing field.
#[derive(Debug)]
pub struct MappingError {
    cause: Cause,
    direction: Option<Direction>,
    /// Innermost frame first.
    frames: Vec<Frame>,
    instance: Option<String>,
}

impl MappingError {
    pub fn new(cause: Cause) -> Self {
        Self {
            cause,
            direction: None,
            frames: Vec::new(),
            instance: None,
        }
    }

    /// Adds the declaring type and field that were being mapped.
    pub fn in_field(
        mut self,
        direction: Direction,
        type_name: &'static str,
        field: &'static str,
    ) -> Self {
        self.direction.get_or_insert(direction);
        self.frames.push(Frame::Field { type_name, field });
        self
    }

    /// Adds the containing object. `instance` is only kept for the innermost one.
    pub fn in_object(
        mut self,
        direction: Direction,
        type_name: &'static str,
        instance: impl FnOnce() -> String,
    ) -> Self {
        self.direction.get_or_insert(direction);
        if self.instance.is_none() {
            self.instance = Some(instance());
        }
        self.frames.push(Frame::Object { type_name });
        self
    }

    pub fn at_index(mut self, index: usize) -> Self {
        self.frames.push(Frame::Index(index));
        self
    }

    pub fn at_key(mut self, key: impl Into<String>) -> Self {
        self.frames.push(Frame::Key(key.into()));
        self
    }

    pub fn cause(&self) -> &Cause {
        &self.cause
    }

    pub fn direction(&self) -> Option<Direction> {
        self.direction
    }

    /// Frames from the innermost outwards.
    pub fn frames(&self) -> &[Frame] {
        &self.frames
    }

    /// Text representation of the innermost failing instance.
    pub fn instance(&self) -> Option<&str> {
        self.instance.as_deref()
    }

    pub fn kind(&self) -> ErrorKind {
        match self.cause {
            Cause::MissingNode { .. } | Cause::Unresolved { .. } | Cause::RootMismatch { .. } => {
                ErrorKind::ShapeMismatch
            }
            _ if self.innermost_field().is_some() => ErrorKind::FieldMapping,
            _ => ErrorKind::ObjectMapping,
        }
    }

    /// The declaring type and field closest to the failure.
    pub fn innermost_field(&self) -> Option<(&'static str, &'static str)> {
        self.frames.iter().find_map(|frame| match frame {
            Frame::Field { type_name, field } => Some((*type_name, *field)),
            _ => None,
        })
    }

    /// Dotted path from the outermost object, e.g. `Cfe.inf_cfe.det[0].prod`.
    pub fn path(&self) -> String {
        let mut path = String::new();
        for frame in self.frames.iter().rev() {
            match frame {
                Frame::Object { type_name } if path.is_empty() => path.push_str(type_name),
                Frame::Object { .. } => {}
                Frame::Field { type_name, field } => {
                    if path.is_empty() {
                        path.push_str(type_name);
                    }
                    path.push('.');
                    path.push_str(field);
                }
                Frame::Index(index) => path.push_str(&format!("[{}]", index)),
                Frame::Key(key) => path.push_str(&format!("[{:?}]", key)),
            }
        }
        path
    }
}

impl fmt::Display for MappingError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let direction = self.direction.unwrap_or(Direction::Serialize);
        match self.innermost_field() {
            Some((type_name, field)) => write!(
                f,
                "failed to {} field `{}` of `{}` at {}: {}",
                direction,
                field,
                type_name,
                self.path(),
                self.cause
            ),
            None => match self.frames.first() {
                Some(Frame::Object { type_name }) => write!(
                    f,
                    "failed to {} object `{}`: {}",
                    direction, type_name, self.cause
                ),
                _ => write!(f, "failed to {}: {}", direction, self.cause),
            },
        }
    }
}

impl std::error::Error for MappingError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        Some(&self.cause)
    }
}

impl From<Cause> for MappingError {
    fn from(cause: Cause) -> Self {
        MappingError::new(cause)
    }
}

impl From<ValueError> for MappingError {
    fn from(err: ValueError) -> Self {
        MappingError::new(Cause::Value(err))
    }
}

impl From<FormatError> for MappingError {
    fn from(err: FormatError) -> Self {
        MappingError::new(Cause::Format(err))
    }
}

/// Top-level error type for the crate.
#[derive(Error, Debug)]
pub enum DfeError {
    /// The object graph could not be mapped.
    #[error(transparent)]
    Mapping(#[from] MappingError),

    /// Writing XML text failed.
    #[cfg(feature = "xml")]
    #[error("XML write error: {0}")]
    Xml(#[from] quick_xml::Error),

    /// Parsing XML text failed.
    #[cfg(feature = "xml")]
    #[error("XML parse error: {0}")]
    Parse(#[from] roxmltree::Error),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("invalid UTF-8 in XML output: {0}")]
    Utf8(#[from] std::string::FromUtf8Error),

    /// Invalid configuration.
    #[error("invalid serializer options: {}", .0.join("; "))]
    Options(Vec<String>),
}

/// Result type alias for DFe serialization operations.
pub type Result<T> = std::result::Result<T, DfeError>;

#[cfg(test)]
mod tests {
    use super::*;

    fn nested_error() -> MappingError {
        MappingError::new(Cause::MissingTag)
            .in_field(Direction::Serialize, "Prod", "v_un_com")
            .in_object(Direction::Serialize, "Prod", || "Prod { .. }".to_string())
            .in_field(Direction::Serialize, "Det", "prod")
            .in_object(Direction::Serialize, "Det", || "Det { .. }".to_string())
            .at_index(1)
            .in_field(Direction::Serialize, "InfCfe", "det")
            .in_object(Direction::Serialize, "InfCfe", || "InfCfe { .. }".to_string())
    }

    #[test]
    fn test_path_and_innermost_field() {
        let err = nested_error();
        assert_eq!(err.innermost_field(), Some(("Prod", "v_un_com")));
        assert_eq!(err.path(), "InfCfe.det[1].prod.v_un_com");
        assert_eq!(err.instance(), Some("Prod { .. }"));
        assert_eq!(err.kind(), ErrorKind::FieldMapping);
    }

    #[test]
    fn test_display_names_innermost_field() {
        let message = nested_error().to_string();
        assert!(message.starts_with("failed to serialize field `v_un_com` of `Prod`"));
        assert!(message.contains("no element or attribute tag"));
    }

    #[test]
    fn test_shape_mismatch_kind() {
        let err = MappingError::new(Cause::MissingNode {
            tag: "CST".to_string(),
        })
        .in_field(Direction::Deserialize, "ImpostoPisAliq", "cst");
        assert_eq!(err.kind(), ErrorKind::ShapeMismatch);
        assert_eq!(err.direction(), Some(Direction::Deserialize));
    }

    #[test]
    fn test_object_only_failure() {
        let err = MappingError::new(Cause::RootMismatch {
            type_name: "Cfe",
            found: "NFe".to_string(),
            expected: "CFe".to_string(),
        })
        .in_object(Direction::Deserialize, "Cfe", || "<NFe>".to_string());
        assert_eq!(err.innermost_field(), None);
        assert!(err.to_string().starts_with("failed to deserialize object `Cfe`"));
    }

    #[test]
    fn test_source_chain() {
        use std::error::Error;
        let err = nested_error();
        assert!(err.source().is_some());
    }
}
