use std::fmt;

use chrono::{DateTime, SecondsFormat, Utc};
use serde::{Deserialize, Serialize};
use serde_json::Value as JsonValue;

use crate::table::column::ColumnType;

/// A single table cell. `Missing` is a first-class state, not an error:
/// readers emit it whenever the platform omits an optional field.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub enum Cell {
    Int(i64),
    Float(f64),
    Boolean(bool),
    String(String),
    Timestamp(DateTime<Utc>),
    Missing,
}

impl Cell {
    pub fn is_missing(&self) -> bool {
        matches!(self, Cell::Missing)
    }

    pub fn as_i64(&self) -> Option<i64> {
        match self {
            Cell::Int(value) => Some(*value),
            Cell::String(raw) => raw.trim().parse().ok(),
            _ => None,
        }
    }

    /// Numeric view of the cell. String cells are parsed so that rows read
    /// back from CSV behave like rows produced by a reader.
    pub fn as_f64(&self) -> Option<f64> {
        match self {
            Cell::Float(value) => Some(*value),
            Cell::Int(value) => Some(*value as f64),
            Cell::String(raw) => raw.trim().parse().ok(),
            _ => None,
        }
    }

    pub fn as_str(&self) -> Option<&str> {
        match self {
            Cell::String(value) => Some(value.as_str()),
            _ => None,
        }
    }

    pub fn as_timestamp(&self) -> Option<DateTime<Utc>> {
        match self {
            Cell::Timestamp(value) => Some(*value),
            Cell::String(raw) => DateTime::parse_from_rfc3339(raw.trim())
                .ok()
                .map(|parsed| parsed.with_timezone(&Utc)),
            _ => None,
        }
    }

    pub fn column_type(&self) -> Option<ColumnType> {
        match self {
            Cell::Int(_) => Some(ColumnType::Int),
            Cell::Float(_) => Some(ColumnType::Float),
            Cell::Boolean(_) => Some(ColumnType::Boolean),
            Cell::String(_) => Some(ColumnType::String),
            Cell::Timestamp(_) => Some(ColumnType::Timestamp),
            Cell::Missing => None,
        }
    }

    pub fn to_json(&self) -> JsonValue {
        match self {
            Cell::Int(value) => JsonValue::from(*value),
            Cell::Float(value) => serde_json::Number::from_f64(*value)
                .map(JsonValue::Number)
                .unwrap_or(JsonValue::Null),
            Cell::Boolean(value) => JsonValue::from(*value),
            Cell::String(value) => JsonValue::from(value.clone()),
            Cell::Timestamp(value) => {
                JsonValue::from(value.to_rfc3339_opts(SecondsFormat::Millis, true))
            }
            Cell::Missing => JsonValue::Null,
        }
    }
}

impl fmt::Display for Cell {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Cell::Int(value) => write!(f, "{value}"),
            Cell::Float(value) => write!(f, "{value}"),
            Cell::Boolean(value) => write!(f, "{value}"),
            Cell::String(value) => write!(f, "{value}"),
            Cell::Timestamp(value) => {
                write!(f, "{}", value.to_rfc3339_opts(SecondsFormat::Millis, true))
            }
            Cell::Missing => write!(f, "?"),
        }
    }
}

impl From<&str> for Cell {
    fn from(value: &str) -> Self {
        Cell::String(value.to_string())
    }
}

impl From<String> for Cell {
    fn from(value: String) -> Self {
        Cell::String(value)
    }
}

impl From<i64> for Cell {
    fn from(value: i64) -> Self {
        Cell::Int(value)
    }
}

impl From<f64> for Cell {
    fn from(value: f64) -> Self {
        Cell::Float(value)
    }
}

impl From<DateTime<Utc>> for Cell {
    fn from(value: DateTime<Utc>) -> Self {
        Cell::Timestamp(value)
    }
}
