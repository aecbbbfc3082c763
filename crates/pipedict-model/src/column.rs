use serde::{Deserialize, Serialize};

use crate::{CellValue, ColumnName, ColumnType, Result};

/// Column descriptor: name, declared type, required flag and optional default.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Column {
    pub name: ColumnName,
    pub data_type: ColumnType,
    #[serde(default)]
    pub required: bool,
    /// Value placed in this column when a row is added.
    #[serde(default)]
    pub default: Option<CellValue>,
}

impl Column {
    pub fn new(name: impl Into<String>, data_type: ColumnType) -> Result<Self> {
        Ok(Self {
            name: ColumnName::new(name)?,
            data_type,
            required: false,
            default: None,
        })
    }

    /// Shorthand for a required column.
    pub fn required(name: impl Into<String>, data_type: ColumnType) -> Result<Self> {
        Ok(Self::new(name, data_type)?.with_required(true))
    }

    #[must_use]
    pub fn with_required(mut self, required: bool) -> Self {
        self.required = required;
        self
    }

    #[must_use]
    pub fn with_default(mut self, value: impl Into<CellValue>) -> Self {
        self.default = Some(value.into());
        self
    }

    /// Value a freshly added row receives in this column.
    pub fn initial_value(&self) -> CellValue {
        self.default
            .clone()
            .and_then(|value| value.coerce_to(self.data_type))
            .unwrap_or_default()
    }
}
