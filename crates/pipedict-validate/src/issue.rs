//! Validation issue types.

use serde::{Deserialize, Serialize};
use thiserror::Error;

use pipedict_model::RowId;

/// Row-level marker set on rows that fail validation.
pub const ROW_ERROR_MESSAGE: &str = "row has required fields that are not filled in";

/// A violation of one column in one row.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub enum FieldError {
    /// Required column holds null, empty or whitespace-only text.
    RequiredEmpty { column: String },
}

impl FieldError {
    pub fn column(&self) -> &str {
        match self {
            FieldError::RequiredEmpty { column } => column,
        }
    }

    pub fn message(&self) -> String {
        match self {
            FieldError::RequiredEmpty { column } => format!("{column} must not be empty"),
        }
    }
}

impl std::fmt::Display for FieldError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(&self.message())
    }
}

/// First violation found in a table, in row order.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("row {position} failed validation: {reason}")]
pub struct ValidationError {
    /// 1-based position among non-deleted rows.
    pub position: usize,
    pub row: RowId,
    pub column: String,
    pub reason: String,
}

impl ValidationError {
    /// Message shown when a save is blocked.
    pub fn user_message(&self) -> String {
        format!(
            "Save failed:\nRow {} failed validation: {} ({})",
            self.position, ROW_ERROR_MESSAGE, self.reason
        )
    }
}
