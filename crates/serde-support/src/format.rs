//! Kind-driven text rendering and parsing for leaf values.
//!
//! | Kind | Text |
//! |------|------|
//! | `Dat` | `2024-03-01` |
//! | `DatCFe` | `20240301` |
//! | `Hor` | `14:05:00` |
//! | `HorCFe` | `140500` |
//! | `DatHor` | `2024-03-01T14:05:00` |
//! | `DatHorTz` | `2024-03-01T14:05:00-03:00` |
//! | `De2` .. `De10` | fixed scale, `.` separator, midpoint rounded away from zero |
//! | `Int` | plain integer, booleans as `1`/`0` |
//! | `Base64` | standard alphabet with padding |

use std::str::FromStr;

use base64::Engine as _;
use base64::engine::general_purpose::STANDARD;
use chrono::{DateTime, FixedOffset, NaiveDate, NaiveDateTime, NaiveTime};
use rust_decimal::{Decimal, RoundingStrategy};
use thiserror::Error;

use crate::kind::FieldKind;
use crate::primitive::Primitive;
use crate::text;

const DATE: &str = "%Y-%m-%d";
const DATE_CFE: &str = "%Y%m%d";
const TIME: &str = "%H:%M:%S";
const TIME_CFE: &str = "%H%M%S";
const DATE_TIME: &str = "%Y-%m-%dT%H:%M:%S";
const DATE_TIME_TZ: &str = "%Y-%m-%dT%H:%M:%S%:z";

/// Errors raised while converting between leaf values and text.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum FormatError {
    /// The value cannot be expressed in the declared kind.
    #[error("a {found} value cannot be written as {kind}")]
    Unrepresentable { kind: FieldKind, found: &'static str },

    /// The text is not valid for the declared kind.
    #[error("`{text}` is not a valid {kind} value: {reason}")]
    Parse {
        kind: FieldKind,
        text: String,
        reason: String,
    },
}

/// Renders `value` as text according to `kind`.
pub fn format(value: &Primitive, kind: FieldKind) -> Result<String, FormatError> {
    let unrepresentable = || FormatError::Unrepresentable {
        kind,
        found: value.type_name(),
    };

    match kind {
        FieldKind::Str | FieldKind::Enum | FieldKind::Custom => Ok(value.to_string()),
        FieldKind::StrNumber => Ok(text::only_digits(&value.to_string())),
        FieldKind::Int => match value {
            Primitive::Int(v) => Ok(v.to_string()),
            Primitive::Bool(v) => Ok(if *v { "1" } else { "0" }.to_string()),
            Primitive::Decimal(v) if v.fract().is_zero() => Ok(v.trunc().normalize().to_string()),
            Primitive::Str(v) => v
                .trim()
                .parse::<i64>()
                .map(|n| n.to_string())
                .map_err(|e| parse_error(kind, v, e)),
            _ => Err(unrepresentable()),
        },
        FieldKind::De2 | FieldKind::De3 | FieldKind::De4 | FieldKind::De6 | FieldKind::De10 => {
            let scale = kind.scale().unwrap_or_default();
            let decimal = match value {
                Primitive::Decimal(v) => *v,
                Primitive::Int(v) => Decimal::from(*v),
                Primitive::Str(v) => {
                    Decimal::from_str(v.trim()).map_err(|e| parse_error(kind, v, e))?
                }
                _ => return Err(unrepresentable()),
            };
            Ok(fixed_scale(decimal, scale).to_string())
        }
        FieldKind::Dat | FieldKind::DatCFe => {
            let pattern = if kind == FieldKind::Dat { DATE } else { DATE_CFE };
            match value {
                Primitive::Date(v) => Ok(v.format(pattern).to_string()),
                Primitive::DateTime(v) => Ok(v.date().format(pattern).to_string()),
                Primitive::DateTimeTz(v) => Ok(v.date_naive().format(pattern).to_string()),
                _ => Err(unrepresentable()),
            }
        }
        FieldKind::Hor | FieldKind::HorCFe => {
            let pattern = if kind == FieldKind::Hor { TIME } else { TIME_CFE };
            match value {
                Primitive::Time(v) => Ok(v.format(pattern).to_string()),
                Primitive::DateTime(v) => Ok(v.time().format(pattern).to_string()),
                Primitive::DateTimeTz(v) => Ok(v.time().format(pattern).to_string()),
                _ => Err(unrepresentable()),
            }
        }
        FieldKind::DatHor => match value {
            Primitive::DateTime(v) => Ok(v.format(DATE_TIME).to_string()),
            Primitive::DateTimeTz(v) => Ok(v.naive_local().format(DATE_TIME).to_string()),
            Primitive::Date(v) => Ok(v.and_time(NaiveTime::MIN).format(DATE_TIME).to_string()),
            _ => Err(unrepresentable()),
        },
        FieldKind::DatHorTz => match value {
            Primitive::DateTimeTz(v) => Ok(v.format(DATE_TIME_TZ).to_string()),
            _ => Err(unrepresentable()),
        },
        FieldKind::Base64 => match value {
            Primitive::Bytes(v) => Ok(STANDARD.encode(v)),
            Primitive::Str(v) => STANDARD
                .decode(v.trim())
                .map(|_| v.trim().to_string())
                .map_err(|e| parse_error(kind, v, e)),
            _ => Err(unrepresentable()),
        },
    }
}

/// Parses `text` as a value of `kind`.
///
/// Blank text for a non-text kind yields [`default_for`] that kind.
pub fn parse(text: &str, kind: FieldKind) -> Result<Primitive, FormatError> {
    if kind.is_text() {
        return Ok(Primitive::Str(text.to_string()));
    }

    let trimmed = text.trim();
    if trimmed.is_empty() {
        return Ok(default_for(kind));
    }

    match kind {
        FieldKind::Int => trimmed
            .parse::<i64>()
            .map(Primitive::Int)
            .map_err(|e| parse_error(kind, text, e)),
        FieldKind::De2 | FieldKind::De3 | FieldKind::De4 | FieldKind::De6 | FieldKind::De10 => {
            Decimal::from_str(trimmed)
                .map(Primitive::Decimal)
                .map_err(|e| parse_error(kind, text, e))
        }
        FieldKind::Dat => NaiveDate::parse_from_str(trimmed, DATE)
            .map(Primitive::Date)
            .map_err(|e| parse_error(kind, text, e)),
        FieldKind::DatCFe => NaiveDate::parse_from_str(trimmed, DATE_CFE)
            .map(Primitive::Date)
            .map_err(|e| parse_error(kind, text, e)),
        FieldKind::Hor => NaiveTime::parse_from_str(trimmed, TIME)
            .map(Primitive::Time)
            .map_err(|e| parse_error(kind, text, e)),
        FieldKind::HorCFe => NaiveTime::parse_from_str(trimmed, TIME_CFE)
            .map(Primitive::Time)
            .map_err(|e| parse_error(kind, text, e)),
        FieldKind::DatHor => NaiveDateTime::parse_from_str(trimmed, DATE_TIME)
            .map(Primitive::DateTime)
            .map_err(|e| parse_error(kind, text, e)),
        FieldKind::DatHorTz => DateTime::parse_from_str(trimmed, DATE_TIME_TZ)
            .or_else(|_| DateTime::parse_from_rfc3339(trimmed))
            .map(Primitive::DateTimeTz)
            .map_err(|e| parse_error(kind, text, e)),
        FieldKind::Base64 => STANDARD
            .decode(trimmed)
            .map(Primitive::Bytes)
            .map_err(|e| parse_error(kind, text, e)),
        FieldKind::Str | FieldKind::StrNumber | FieldKind::Enum | FieldKind::Custom => {
            Ok(Primitive::Str(text.to_string()))
        }
    }
}

/// The value a leaf of `kind` takes when its node is absent.
pub fn default_for(kind: FieldKind) -> Primitive {
    match kind {
        FieldKind::Str | FieldKind::StrNumber | FieldKind::Enum | FieldKind::Custom => {
            Primitive::Str(String::new())
        }
        FieldKind::Int => Primitive::Int(0),
        FieldKind::De2 | FieldKind::De3 | FieldKind::De4 | FieldKind::De6 | FieldKind::De10 => {
            Primitive::Decimal(Decimal::ZERO)
        }
        FieldKind::Dat | FieldKind::DatCFe => Primitive::Date(NaiveDate::default()),
        FieldKind::Hor | FieldKind::HorCFe => Primitive::Time(NaiveTime::MIN),
        FieldKind::DatHor => Primitive::DateTime(NaiveDateTime::default()),
        FieldKind::DatHorTz => Primitive::DateTimeTz(DateTime::<FixedOffset>::default()),
        FieldKind::Base64 => Primitive::Bytes(Vec::new()),
    }
}

fn fixed_scale(value: Decimal, scale: u32) -> Decimal {
    let mut rounded = value.round_dp_with_strategy(scale, RoundingStrategy::MidpointAwayFromZero);
    rounded.rescale(scale);
    rounded
}

fn parse_error(kind: FieldKind, text: &str, reason: impl std::fmt::Display) -> FormatError {
    FormatError::Parse {
        kind,
        text: text.to_string(),
        reason: reason.to_string(),
    }
}
