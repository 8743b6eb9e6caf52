//! Non-fatal findings recorded while serializing.

use std::fmt;

/// What an [`Alert`] is about.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum AlertKind {
    /// A required leaf rendered as empty text.
    RequiredEmpty,
    /// A required object or interface slot holds nothing.
    RequiredMissing,
    TooShort { length: usize, min: usize },
    TooLong { length: usize, max: usize },
    TooFew { count: usize, min: usize },
    TooMany { count: usize, max: usize },
}

impl fmt::Display for AlertKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            AlertKind::RequiredEmpty => f.write_str("required value is empty"),
            AlertKind::RequiredMissing => f.write_str("required value is missing"),
            AlertKind::TooShort { length, min } => {
                write!(f, "length {} is below the minimum of {}", length, min)
            }
            AlertKind::TooLong { length, max } => {
                write!(f, "length {} exceeds the maximum of {}", length, max)
            }
            AlertKind::TooFew { count, min } => {
                write!(f, "{} occurrences, at least {} expected", count, min)
            }
            AlertKind::TooMany { count, max } => {
                write!(f, "{} occurrences, at most {} allowed", count, max)
            }
        }
    }
}

/// A schema-level problem that does not stop serialization.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Alert {
    /// Layout identifier of the field, e.g. `Q07`.
    pub id: &'static str,
    pub tag: &'static str,
    pub type_name: &'static str,
    pub field: &'static str,
    pub kind: AlertKind,
}

impl fmt::Display for Alert {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.id.is_empty() {
            write!(f, "{}.{} <{}>: {}", self.type_name, self.field, self.tag, self.kind)
        } else {
            write!(
                f,
                "{} {}.{} <{}>: {}",
                self.id, self.type_name, self.field, self.tag, self.kind
            )
        }
    }
}
