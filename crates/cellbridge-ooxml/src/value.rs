//! Tagged scalar values exchanged between structured data and cells

use std::fmt;

use base64::engine::general_purpose::STANDARD as BASE64;
use base64::Engine;
use chrono::{DateTime, SecondsFormat, Utc};

use crate::cell::{Cell, CellKind};

/// A scalar with an explicit type tag
#[derive(Debug, Clone, PartialEq)]
pub enum Value {
    String(String),
    Integer(i64),
    Real(f64),
    Boolean(bool),
    Timestamp(DateTime<Utc>),
    Binary(Vec<u8>),
    Null,
}

impl Value {
    /// Name of the tag, used in type-mismatch errors.
    pub fn type_name(&self) -> &'static str {
        match self {
            Value::String(_) => "string",
            Value::Integer(_) => "integer",
            Value::Real(_) => "real",
            Value::Boolean(_) => "boolean",
            Value::Timestamp(_) => "timestamp",
            Value::Binary(_) => "binary",
            Value::Null => "null",
        }
    }

    pub fn is_null(&self) -> bool {
        matches!(self, Value::Null)
    }

    /// Text written into a cell; `None` for `Null`, which leaves the cell unset.
    pub fn to_cell_text(&self) -> Option<String> {
        match self {
            Value::Null => None,
            other => Some(other.to_string()),
        }
    }

    /// Cell kind recording this value's tag.
    pub fn cell_kind(&self) -> CellKind {
        match self {
            Value::Integer(_) | Value::Real(_) => CellKind::NumericText,
            Value::Boolean(_) => CellKind::BooleanText,
            Value::Timestamp(_) => CellKind::DateText,
            _ => CellKind::SharedString,
        }
    }

    /// Interpret a cell according to its kind.
    ///
    /// Text kinds always give `String`; typed kinds fall back to `String`
    /// when the raw text does not parse.
    pub fn from_cell(cell: &Cell) -> Value {
        let raw = cell.value.as_str();
        match cell.kind {
            CellKind::SharedString | CellKind::InlineString => Value::String(raw.to_string()),
            CellKind::NumericText => {
                if let Ok(i) = raw.parse::<i64>() {
                    Value::Integer(i)
                } else if let Ok(f) = raw.parse::<f64>() {
                    Value::Real(f)
                } else {
                    Value::String(raw.to_string())
                }
            }
            CellKind::BooleanText => match raw {
                "1" | "true" | "TRUE" => Value::Boolean(true),
                "0" | "false" | "FALSE" => Value::Boolean(false),
                _ => Value::String(raw.to_string()),
            },
            CellKind::DateText => DateTime::parse_from_rfc3339(raw)
                .map(|dt| Value::Timestamp(dt.with_timezone(&Utc)))
                .unwrap_or_else(|_| Value::String(raw.to_string())),
        }
    }
}

impl fmt::Display for Value {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Value::String(s) => f.write_str(s),
            Value::Integer(i) => write!(f, "{i}"),
            Value::Real(r) => write!(f, "{r}"),
            Value::Boolean(b) => write!(f, "{b}"),
            Value::Timestamp(t) => f.write_str(&t.to_rfc3339_opts(SecondsFormat::AutoSi, true)),
            Value::Binary(bytes) => f.write_str(&BASE64.encode(bytes)),
            Value::Null => Ok(()),
        }
    }
}

impl From<&str> for Value {
    fn from(s: &str) -> Self {
        Value::String(s.to_string())
    }
}

impl From<String> for Value {
    fn from(s: String) -> Self {
        Value::String(s)
    }
}

impl From<i64> for Value {
    fn from(i: i64) -> Self {
        Value::Integer(i)
    }
}

impl From<f64> for Value {
    fn from(f: f64) -> Self {
        Value::Real(f)
    }
}

impl From<bool> for Value {
    fn from(b: bool) -> Self {
        Value::Boolean(b)
    }
}

impl From<DateTime<Utc>> for Value {
    fn from(t: DateTime<Utc>) -> Self {
        Value::Timestamp(t)
    }
}

impl From<Vec<u8>> for Value {
    fn from(bytes: Vec<u8>) -> Self {
        Value::Binary(bytes)
    }
}
