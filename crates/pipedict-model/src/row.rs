use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

use crate::{CellValue, RowId};

/// Lifecycle of a row relative to the last committed baseline.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum RowState {
    #[default]
    Unchanged,
    Added,
    Modified,
    Deleted,
}

impl RowState {
    pub fn is_deleted(&self) -> bool {
        matches!(self, Self::Deleted)
    }

    /// True for states that a commit would report.
    pub fn is_pending(&self) -> bool {
        !matches!(self, Self::Unchanged)
    }

    pub fn label(&self) -> &'static str {
        match self {
            Self::Unchanged => "unchanged",
            Self::Added => "added",
            Self::Modified => "modified",
            Self::Deleted => "deleted",
        }
    }
}

/// Validation marks attached to a row for display.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct RowMarks {
    /// Row-level message shown next to the row header.
    pub row_error: Option<String>,
    /// Per-column messages keyed by column name.
    pub column_errors: BTreeMap<String, String>,
}

impl RowMarks {
    pub fn is_empty(&self) -> bool {
        self.row_error.is_none() && self.column_errors.is_empty()
    }

    pub fn clear(&mut self) {
        self.row_error = None;
        self.column_errors.clear();
    }

    pub fn set_column_error(&mut self, column: impl Into<String>, message: impl Into<String>) {
        self.column_errors.insert(column.into(), message.into());
    }

    pub fn column_error(&self, column: &str) -> Option<&str> {
        self.column_errors.get(column).map(String::as_str)
    }
}

/// One table row.
///
/// Values are stored in the table's column order. Mutation of values goes
/// through [`crate::Table`] so lifecycle tracking cannot be bypassed; only
/// the validation marks are writable from outside.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Row {
    id: RowId,
    values: Vec<CellValue>,
    state: RowState,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    original: Option<Vec<CellValue>>,
    #[serde(default, skip_serializing_if = "RowMarks::is_empty")]
    marks: RowMarks,
}

impl Row {
    pub(crate) fn new(id: RowId, values: Vec<CellValue>, state: RowState) -> Self {
        Self {
            id,
            values,
            state,
            original: None,
            marks: RowMarks::default(),
        }
    }

    pub fn id(&self) -> RowId {
        self.id
    }

    pub fn state(&self) -> RowState {
        self.state
    }

    pub fn is_deleted(&self) -> bool {
        self.state.is_deleted()
    }

    pub fn values(&self) -> &[CellValue] {
        &self.values
    }

    pub fn value(&self, index: usize) -> Option<&CellValue> {
        self.values.get(index)
    }

    /// Snapshot taken at the first edit; present only while modified.
    pub fn original_values(&self) -> Option<&[CellValue]> {
        self.original.as_deref()
    }

    pub fn original(&self, index: usize) -> Option<&CellValue> {
        self.original.as_ref().and_then(|values| values.get(index))
    }

    pub fn marks(&self) -> &RowMarks {
        &self.marks
    }

    pub fn marks_mut(&mut self) -> &mut RowMarks {
        &mut self.marks
    }

    pub fn has_errors(&self) -> bool {
        !self.marks.is_empty()
    }

    pub(crate) fn values_mut(&mut self) -> &mut Vec<CellValue> {
        &mut self.values
    }

    pub(crate) fn original_mut(&mut self) -> Option<&mut Vec<CellValue>> {
        self.original.as_mut()
    }

    pub(crate) fn set_state(&mut self, state: RowState) {
        self.state = state;
    }

    /// Capture the current values as the original snapshot.
    pub(crate) fn snapshot(&mut self) {
        self.original = Some(self.values.clone());
    }

    /// Drop tracking so the row becomes part of the baseline.
    pub(crate) fn accept(&mut self) {
        self.state = RowState::Unchanged;
        self.original = None;
        self.marks.clear();
    }
}
