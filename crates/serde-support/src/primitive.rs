use std::fmt;

use base64::Engine as _;
use base64::engine::general_purpose::STANDARD;
use chrono::{DateTime, FixedOffset, NaiveDate, NaiveDateTime, NaiveTime};
use rust_decimal::Decimal;

/// A leaf value, independent of the Rust type of the field holding it.
#[derive(Debug, Clone, PartialEq)]
pub enum Primitive {
    Str(String),
    Int(i64),
    Decimal(Decimal),
    Bool(bool),
    Date(NaiveDate),
    Time(NaiveTime),
    DateTime(NaiveDateTime),
    DateTimeTz(DateTime<FixedOffset>),
    /// A byte buffer, written as base64 text.
    Bytes(Vec<u8>),
}

impl Primitive {
    /// Short name of the variant, used in error messages.
    pub fn type_name(&self) -> &'static str {
        match self {
            Primitive::Str(_) => "string",
            Primitive::Int(_) => "integer",
            Primitive::Decimal(_) => "decimal",
            Primitive::Bool(_) => "boolean",
            Primitive::Date(_) => "date",
            Primitive::Time(_) => "time",
            Primitive::DateTime(_) => "date-time",
            Primitive::DateTimeTz(_) => "date-time with offset",
            Primitive::Bytes(_) => "bytes",
        }
    }

    /// True for strings that are empty or whitespace only, and for empty buffers.
    pub fn is_empty(&self) -> bool {
        match self {
            Primitive::Str(s) => s.trim().is_empty(),
            Primitive::Bytes(b) => b.is_empty(),
            _ => false,
        }
    }

    /// True for numeric zero, `false`, and empty strings.
    pub fn is_zero(&self) -> bool {
        match self {
            Primitive::Int(v) => *v == 0,
            Primitive::Decimal(v) => v.is_zero(),
            Primitive::Bool(v) => !*v,
            Primitive::Str(_) | Primitive::Bytes(_) => self.is_empty(),
            _ => false,
        }
    }
}

impl fmt::Display for Primitive {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Primitive::Str(v) => f.write_str(v),
            Primitive::Int(v) => write!(f, "{}", v),
            Primitive::Decimal(v) => write!(f, "{}", v.normalize()),
            Primitive::Bool(v) => write!(f, "{}", v),
            Primitive::Date(v) => write!(f, "{}", v.format("%Y-%m-%d")),
            Primitive::Time(v) => write!(f, "{}", v.format("%H:%M:%S")),
            Primitive::DateTime(v) => write!(f, "{}", v.format("%Y-%m-%dT%H:%M:%S")),
            Primitive::DateTimeTz(v) => write!(f, "{}", v.format("%Y-%m-%dT%H:%M:%S%:z")),
            Primitive::Bytes(v) => f.write_str(&STANDARD.encode(v)),
        }
    }
}

impl From<&str> for Primitive {
    fn from(value: &str) -> Self {
        Primitive::Str(value.to_string())
    }
}

impl From<String> for Primitive {
    fn from(value: String) -> Self {
        Primitive::Str(value)
    }
}

impl From<i64> for Primitive {
    fn from(value: i64) -> Self {
        Primitive::Int(value)
    }
}

impl From<Decimal> for Primitive {
    fn from(value: Decimal) -> Self {
        Primitive::Decimal(value)
    }
}

impl From<Vec<u8>> for Primitive {
    fn from(value: Vec<u8>) -> Self {
        Primitive::Bytes(value)
    }
}

impl From<bool> for Primitive {
    fn from(value: bool) -> Self {
        Primitive::Bool(value)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rust_decimal_macros::dec;

    #[test]
    fn test_is_zero() {
        assert!(Primitive::Int(0).is_zero());
        assert!(Primitive::Decimal(dec!(0.00)).is_zero());
        assert!(Primitive::Str("  ".to_string()).is_zero());
        assert!(!Primitive::Decimal(dec!(0.01)).is_zero());
        assert!(!Primitive::Date(NaiveDate::default()).is_zero());
    }

    #[test]
    fn test_display_normalizes_decimals() {
        assert_eq!(Primitive::Decimal(dec!(10.500)).to_string(), "10.5");
        assert_eq!(Primitive::Int(-3).to_string(), "-3");
    }

    #[test]
    fn test_bytes_display_as_base64() {
        assert_eq!(Primitive::Bytes(vec![1, 2, 3]).to_string(), "AQID");
        assert!(Primitive::Bytes(Vec::new()).is_empty());
        assert!(!Primitive::Bytes(vec![0]).is_zero());
    }
}
