//! Cell values and declared column types.

use std::cmp::Ordering;
use std::fmt;

use chrono::{NaiveDate, NaiveDateTime};
use serde::{Deserialize, Serialize};

/// Format used when a date-time cell is rendered.
pub const DISPLAY_DATETIME_FORMAT: &str = "%Y-%m-%d %H:%M";

const PARSE_DATETIME_FORMATS: &[&str] = &[
    "%Y-%m-%d %H:%M:%S",
    "%Y-%m-%d %H:%M",
    "%Y-%m-%dT%H:%M:%S",
];

/// Declared type of a column.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ColumnType {
    Text,
    Integer,
    Float,
    DateTime,
    Boolean,
}

impl ColumnType {
    /// Parse a type name (case-insensitive).
    pub fn parse(s: &str) -> Option<Self> {
        match s.trim().to_lowercase().as_str() {
            "text" | "string" | "char" => Some(Self::Text),
            "integer" | "int" => Some(Self::Integer),
            "float" | "double" | "num" => Some(Self::Float),
            "datetime" | "date" => Some(Self::DateTime),
            "boolean" | "bool" => Some(Self::Boolean),
            _ => None,
        }
    }

    pub fn label(&self) -> &'static str {
        match self {
            Self::Text => "text",
            Self::Integer => "integer",
            Self::Float => "float",
            Self::DateTime => "datetime",
            Self::Boolean => "boolean",
        }
    }
}

impl fmt::Display for ColumnType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

/// A single cell value.
///
/// `Null` is compatible with every column type. Equality is by value; two
/// NaN floats are equal so a cell holding one never reads as changed.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(tag = "kind", content = "value")]
pub enum CellValue {
    #[default]
    Null,
    Text(String),
    Integer(i64),
    Float(f64),
    DateTime(NaiveDateTime),
    Boolean(bool),
}

impl PartialEq for CellValue {
    fn eq(&self, other: &Self) -> bool {
        match (self, other) {
            (Self::Null, Self::Null) => true,
            (Self::Text(a), Self::Text(b)) => a == b,
            (Self::Integer(a), Self::Integer(b)) => a == b,
            (Self::Float(a), Self::Float(b)) => a == b || (a.is_nan() && b.is_nan()),
            (Self::DateTime(a), Self::DateTime(b)) => a == b,
            (Self::Boolean(a), Self::Boolean(b)) => a == b,
            _ => false,
        }
    }
}

impl CellValue {
    /// Short name of the value's kind, used in error messages.
    pub fn kind(&self) -> &'static str {
        match self {
            Self::Null => "null",
            Self::Text(_) => "text",
            Self::Integer(_) => "integer",
            Self::Float(_) => "float",
            Self::DateTime(_) => "datetime",
            Self::Boolean(_) => "boolean",
        }
    }

    pub fn is_null(&self) -> bool {
        matches!(self, Self::Null)
    }

    /// True for null values and whitespace-only text.
    pub fn is_blank(&self) -> bool {
        match self {
            Self::Null => true,
            Self::Text(text) => text.trim().is_empty(),
            _ => false,
        }
    }

    pub fn as_text(&self) -> Option<&str> {
        match self {
            Self::Text(text) => Some(text),
            _ => None,
        }
    }

    pub fn as_bool(&self) -> Option<bool> {
        match self {
            Self::Boolean(flag) => Some(*flag),
            _ => None,
        }
    }

    /// Convert the value so it fits a column of type `target`.
    ///
    /// Returns `None` when the value is incompatible. Integers widen into
    /// float columns; nothing else is converted.
    pub fn coerce_to(self, target: ColumnType) -> Option<Self> {
        match (self, target) {
            (Self::Null, _) => Some(Self::Null),
            (Self::Text(v), ColumnType::Text) => Some(Self::Text(v)),
            (Self::Integer(v), ColumnType::Integer) => Some(Self::Integer(v)),
            (Self::Integer(v), ColumnType::Float) => Some(Self::Float(v as f64)),
            (Self::Float(v), ColumnType::Float) => Some(Self::Float(v)),
            (Self::DateTime(v), ColumnType::DateTime) => Some(Self::DateTime(v)),
            (Self::Boolean(v), ColumnType::Boolean) => Some(Self::Boolean(v)),
            _ => None,
        }
    }

    /// Parse user input for a column of type `target`.
    ///
    /// Empty input parses to `Null` for every type.
    pub fn parse_for(target: ColumnType, raw: &str) -> Result<Self, String> {
        let trimmed = raw.trim();
        if trimmed.is_empty() {
            return Ok(Self::Null);
        }
        match target {
            ColumnType::Text => Ok(Self::Text(raw.to_string())),
            ColumnType::Integer => trimmed
                .parse::<i64>()
                .map(Self::Integer)
                .map_err(|e| format!("'{trimmed}' is not an integer: {e}")),
            ColumnType::Float => match trimmed.parse::<f64>() {
                Ok(number) if number.is_finite() => Ok(Self::Float(number)),
                Ok(_) => Err(format!("'{trimmed}' is not a finite number")),
                Err(e) => Err(format!("'{trimmed}' is not a number: {e}")),
            },
            ColumnType::DateTime => parse_datetime(trimmed)
                .map(Self::DateTime)
                .ok_or_else(|| format!("'{trimmed}' is not a date (expected YYYY-MM-DD HH:MM)")),
            ColumnType::Boolean => match trimmed.to_lowercase().as_str() {
                "true" | "yes" | "y" | "1" | "on" => Ok(Self::Boolean(true)),
                "false" | "no" | "n" | "0" | "off" => Ok(Self::Boolean(false)),
                _ => Err(format!("'{trimmed}' is not a boolean")),
            },
        }
    }

    /// Ordering used by sorted views: nulls first, then by value.
    ///
    /// Values of different kinds order by kind so the comparison is total.
    pub fn compare(&self, other: &Self) -> Ordering {
        match (self, other) {
            (Self::Text(a), Self::Text(b)) => a.cmp(b),
            (Self::Integer(a), Self::Integer(b)) => a.cmp(b),
            (Self::Float(a), Self::Float(b)) => a.total_cmp(b),
            (Self::Integer(a), Self::Float(b)) => (*a as f64).total_cmp(b),
            (Self::Float(a), Self::Integer(b)) => a.total_cmp(&(*b as f64)),
            (Self::DateTime(a), Self::DateTime(b)) => a.cmp(b),
            (Self::Boolean(a), Self::Boolean(b)) => a.cmp(b),
            _ => self.rank().cmp(&other.rank()),
        }
    }

    fn rank(&self) -> u8 {
        match self {
            Self::Null => 0,
            Self::Boolean(_) => 1,
            Self::Integer(_) | Self::Float(_) => 2,
            Self::DateTime(_) => 3,
            Self::Text(_) => 4,
        }
    }
}

fn parse_datetime(value: &str) -> Option<NaiveDateTime> {
    PARSE_DATETIME_FORMATS
        .iter()
        .find_map(|format| NaiveDateTime::parse_from_str(value, format).ok())
        .or_else(|| {
            NaiveDate::parse_from_str(value, "%Y-%m-%d")
                .ok()
                .and_then(|date| date.and_hms_opt(0, 0, 0))
        })
}

impl fmt::Display for CellValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Null => Ok(()),
            Self::Text(v) => f.write_str(v),
            Self::Integer(v) => write!(f, "{v}"),
            Self::Float(v) => write!(f, "{v}"),
            Self::DateTime(v) => write!(f, "{}", v.format(DISPLAY_DATETIME_FORMAT)),
            Self::Boolean(v) => write!(f, "{v}"),
        }
    }
}

impl From<&str> for CellValue {
    fn from(value: &str) -> Self {
        Self::Text(value.to_string())
    }
}

impl From<String> for CellValue {
    fn from(value: String) -> Self {
        Self::Text(value)
    }
}

impl From<i64> for CellValue {
    fn from(value: i64) -> Self {
        Self::Integer(value)
    }
}

impl From<f64> for CellValue {
    fn from(value: f64) -> Self {
        Self::Float(value)
    }
}

impl From<bool> for CellValue {
    fn from(value: bool) -> Self {
        Self::Boolean(value)
    }
}

impl From<NaiveDateTime> for CellValue {
    fn from(value: NaiveDateTime) -> Self {
        Self::DateTime(value)
    }
}

impl<T: Into<CellValue>> From<Option<T>> for CellValue {
    fn from(value: Option<T>) -> Self {
        value.map_or(Self::Null, Into::into)
    }
}
