//! Command and load results.

use serde::Serialize;

use pipedict_model::{CommitSummary, RowId};

/// Result of a table load.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "outcome", rename_all = "snake_case")]
pub enum LoadOutcome {
    Loaded { node: String, rows: usize },
    /// A newer selection started before this load finished.
    Superseded { node: String },
}

/// Result of an editing command.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "outcome", rename_all = "snake_case")]
pub enum CommandOutcome {
    /// The user declined or gave no input.
    Cancelled,
    RowAdded { row: RowId },
    ColumnAdded { name: String },
    RowsDeleted { count: usize },
    RowDuplicated { source: RowId, row: RowId },
    Saved { summary: CommitSummary },
    Info { message: String },
}

impl CommandOutcome {
    pub fn message(&self) -> String {
        match self {
            Self::Cancelled => "Cancelled.".to_string(),
            Self::RowAdded { .. } => "Row added.".to_string(),
            Self::ColumnAdded { name } => format!("Column '{name}' added."),
            Self::RowsDeleted { count: 0 } => "No checked rows to delete.".to_string(),
            Self::RowsDeleted { count } => format!("Deleted {count} rows."),
            Self::RowDuplicated { .. } => "Row duplicated.".to_string(),
            Self::Saved { summary } => format!("Saved. ({summary})"),
            Self::Info { message } => message.clone(),
        }
    }
}
