use std::fmt;

use serde::{Deserialize, Serialize};

/// Declared kind of a leaf field.
///
/// The kind controls the textual representation only. A `Decimal` stored in a
/// field declared `De2` is written with exactly two fractional digits, the
/// same value declared `De4` gets four.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
pub enum FieldKind {
    /// Free text.
    #[default]
    Str,
    /// Text restricted to ASCII digits (CNPJ, CPF, CEP...).
    StrNumber,
    /// Integer.
    Int,
    /// Enumeration wire value.
    Enum,
    /// Opaque text produced by the field type itself.
    Custom,
    /// `yyyy-MM-dd`
    Dat,
    /// `yyyyMMdd`
    DatCFe,
    /// `HH:mm:ss`
    Hor,
    /// `HHmmss`
    HorCFe,
    /// `yyyy-MM-ddTHH:mm:ss`
    DatHor,
    /// `yyyy-MM-ddTHH:mm:sszzz`
    DatHorTz,
    De2,
    De3,
    De4,
    De6,
    De10,
    /// `base64Binary` text of a byte buffer.
    Base64,
}

impl FieldKind {
    /// Number of fractional digits for decimal kinds.
    pub fn scale(self) -> Option<u32> {
        match self {
            FieldKind::De2 => Some(2),
            FieldKind::De3 => Some(3),
            FieldKind::De4 => Some(4),
            FieldKind::De6 => Some(6),
            FieldKind::De10 => Some(10),
            _ => None,
        }
    }

    pub fn is_decimal(self) -> bool {
        self.scale().is_some()
    }

    pub fn is_numeric(self) -> bool {
        self == FieldKind::Int || self.is_decimal()
    }

    /// Kinds whose value is free text, subject to normalisation.
    pub fn is_text(self) -> bool {
        matches!(
            self,
            FieldKind::Str | FieldKind::StrNumber | FieldKind::Enum | FieldKind::Custom
        )
    }

    pub fn as_str(self) -> &'static str {
        match self {
            FieldKind::Str => "Str",
            FieldKind::StrNumber => "StrNumber",
            FieldKind::Int => "Int",
            FieldKind::Enum => "Enum",
            FieldKind::Custom => "Custom",
            FieldKind::Dat => "Dat",
            FieldKind::DatCFe => "DatCFe",
            FieldKind::Hor => "Hor",
            FieldKind::HorCFe => "HorCFe",
            FieldKind::DatHor => "DatHor",
            FieldKind::DatHorTz => "DatHorTz",
            FieldKind::De2 => "De2",
            FieldKind::De3 => "De3",
            FieldKind::De4 => "De4",
            FieldKind::De6 => "De6",
            FieldKind::De10 => "De10",
            FieldKind::Base64 => "Base64",
        }
    }
}

impl fmt::Display for FieldKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_decimal_scales() {
        assert_eq!(FieldKind::De2.scale(), Some(2));
        assert_eq!(FieldKind::De10.scale(), Some(10));
        assert_eq!(FieldKind::Int.scale(), None);
        assert!(FieldKind::De3.is_numeric());
        assert!(FieldKind::Int.is_numeric());
        assert!(!FieldKind::Dat.is_numeric());
    }

    #[test]
    fn test_text_kinds() {
        assert!(FieldKind::Str.is_text());
        assert!(FieldKind::StrNumber.is_text());
        assert!(!FieldKind::De2.is_text());
        assert!(!FieldKind::DatHor.is_text());
        assert!(!FieldKind::Base64.is_text());
    }
}
