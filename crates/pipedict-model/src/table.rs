#![deny(unsafe_code)]

use std::fmt;

use chrono::Local;
use serde::{Deserialize, Serialize};
use tracing::{debug, info};

use crate::{CellValue, Column, Conventions, ModelError, Result, Row, RowId, RowState};

/// Row counts processed by a commit.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct CommitSummary {
    pub added: usize,
    pub modified: usize,
    pub deleted: usize,
}

impl CommitSummary {
    pub fn total(&self) -> usize {
        self.added + self.modified + self.deleted
    }

    pub fn is_empty(&self) -> bool {
        self.total() == 0
    }
}

impl fmt::Display for CommitSummary {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "added: {}, modified: {}, deleted: {}",
            self.added, self.modified, self.deleted
        )
    }
}

/// Cell-level comparison between the original snapshot and the current value.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "lowercase")]
pub enum CellDiff {
    Unchanged,
    Changed {
        original: CellValue,
        current: CellValue,
    },
}

impl CellDiff {
    pub fn is_changed(&self) -> bool {
        matches!(self, Self::Changed { .. })
    }
}

/// An editable table with per-row change tracking.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Table {
    name: String,
    columns: Vec<Column>,
    rows: Vec<Row>,
    next_id: u64,
}

impl Table {
    /// Create an empty table. Fails on duplicate column names.
    pub fn new(name: impl Into<String>, columns: Vec<Column>) -> Result<Self> {
        let mut table = Self {
            name: name.into(),
            columns: Vec::with_capacity(columns.len()),
            rows: Vec::new(),
            next_id: 1,
        };
        for column in columns {
            table.add_column(column)?;
        }
        Ok(table)
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn columns(&self) -> &[Column] {
        &self.columns
    }

    pub fn column(&self, name: &str) -> Option<&Column> {
        self.columns.iter().find(|column| column.name.matches(name))
    }

    pub fn column_index(&self, name: &str) -> Result<usize> {
        self.columns
            .iter()
            .position(|column| column.name.matches(name))
            .ok_or_else(|| ModelError::UnknownColumn(name.to_string()))
    }

    pub fn has_column(&self, name: &str) -> bool {
        self.column(name).is_some()
    }

    /// All rows in table order, deleted rows included.
    pub fn rows(&self) -> &[Row] {
        &self.rows
    }

    pub fn rows_mut(&mut self) -> impl Iterator<Item = &mut Row> {
        self.rows.iter_mut()
    }

    /// Rows that are not deleted, in table order.
    pub fn active_rows(&self) -> impl Iterator<Item = &Row> {
        self.rows.iter().filter(|row| !row.is_deleted())
    }

    pub fn len(&self) -> usize {
        self.rows.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }

    pub fn active_len(&self) -> usize {
        self.active_rows().count()
    }

    pub fn row(&self, id: RowId) -> Option<&Row> {
        self.rows.iter().find(|row| row.id() == id)
    }

    pub fn row_mut(&mut self, id: RowId) -> Option<&mut Row> {
        self.rows.iter_mut().find(|row| row.id() == id)
    }

    /// Zero-based position of the row in table order.
    pub fn position(&self, id: RowId) -> Option<usize> {
        self.rows.iter().position(|row| row.id() == id)
    }

    fn require_position(&self, id: RowId) -> Result<usize> {
        self.position(id).ok_or(ModelError::UnknownRow(id))
    }

    pub fn value(&self, id: RowId, column: &str) -> Result<&CellValue> {
        let index = self.column_index(column)?;
        let row = self.row(id).ok_or(ModelError::UnknownRow(id))?;
        Ok(&row.values()[index])
    }

    fn allocate_id(&mut self) -> RowId {
        let id = RowId::new(self.next_id);
        self.next_id += 1;
        id
    }

    fn coerce(&self, index: usize, value: CellValue) -> Result<CellValue> {
        let column = &self.columns[index];
        let found = value.kind();
        value
            .coerce_to(column.data_type)
            .ok_or_else(|| ModelError::TypeMismatch {
                column: column.name.to_string(),
                expected: column.data_type,
                found,
            })
    }

    /// Append a row in the added state, checking arity and types.
    ///
    /// Sources call this while building a table and then
    /// [`Table::accept_loaded`] to make the rows the baseline.
    pub fn push_row(&mut self, values: Vec<CellValue>) -> Result<RowId> {
        if values.len() != self.columns.len() {
            return Err(ModelError::ArityMismatch {
                expected: self.columns.len(),
                found: values.len(),
            });
        }
        let values = values
            .into_iter()
            .enumerate()
            .map(|(index, value)| self.coerce(index, value))
            .collect::<Result<Vec<_>>>()?;
        let id = self.allocate_id();
        self.rows.push(Row::new(id, values, RowState::Added));
        Ok(id)
    }

    /// Write a cell value, tracking the row lifecycle.
    ///
    /// Returns `false` when the value equals the current one and nothing
    /// changed. The first effective edit of an unchanged row captures the
    /// whole row as its original snapshot; later edits keep that snapshot.
    pub fn set_cell(
        &mut self,
        id: RowId,
        column: &str,
        value: impl Into<CellValue>,
    ) -> Result<bool> {
        let index = self.column_index(column)?;
        let value = self.coerce(index, value.into())?;
        let position = self.require_position(id)?;
        let row = &mut self.rows[position];
        match row.state() {
            RowState::Deleted => return Err(ModelError::RowDeleted(id)),
            _ if row.values()[index] == value => return Ok(false),
            RowState::Unchanged => {
                row.snapshot();
                row.set_state(RowState::Modified);
            }
            RowState::Added | RowState::Modified => {}
        }
        row.values_mut()[index] = value;
        debug!(row = %id, column, state = row.state().label(), "cell updated");
        Ok(true)
    }

    /// Set the selection flag of a row without touching its lifecycle.
    ///
    /// The selection column is editor state, so the write is mirrored into
    /// the original snapshot and never shows up as a change.
    pub fn set_selected(
        &mut self,
        id: RowId,
        conventions: &Conventions,
        selected: bool,
    ) -> Result<()> {
        let index = self.column_index(&conventions.selection_column)?;
        let position = self.require_position(id)?;
        let row = &mut self.rows[position];
        if row.is_deleted() {
            return Err(ModelError::RowDeleted(id));
        }
        row.values_mut()[index] = CellValue::Boolean(selected);
        if let Some(original) = row.original_mut() {
            original[index] = CellValue::Boolean(selected);
        }
        Ok(())
    }

    pub fn is_selected(&self, row: &Row, conventions: &Conventions) -> bool {
        self.column_index(&conventions.selection_column)
            .ok()
            .and_then(|index| row.value(index))
            .and_then(CellValue::as_bool)
            .unwrap_or(false)
    }

    /// True when the row's status column holds the disabled value.
    pub fn is_disabled(&self, row: &Row, conventions: &Conventions) -> bool {
        self.column_index(&conventions.status_column)
            .ok()
            .and_then(|index| row.value(index))
            .and_then(CellValue::as_text)
            .is_some_and(|status| status.trim() == conventions.disabled_value)
    }

    fn apply_convention(&self, values: &mut [CellValue], column: &str, value: CellValue) {
        let Ok(index) = self.column_index(column) else {
            return;
        };
        if let Some(value) = value.coerce_to(self.columns[index].data_type) {
            values[index] = value;
        }
    }

    /// Append a new row in the added state.
    ///
    /// Columns receive their declared default (or null); the selection flag
    /// is cleared, the status is enabled and the timestamp is set to now.
    pub fn add_row(&mut self, conventions: &Conventions) -> RowId {
        let mut values: Vec<CellValue> = self.columns.iter().map(Column::initial_value).collect();
        self.apply_convention(
            &mut values,
            &conventions.selection_column,
            CellValue::Boolean(false),
        );
        self.apply_convention(
            &mut values,
            &conventions.status_column,
            CellValue::Text(conventions.enabled_value.clone()),
        );
        self.apply_convention(
            &mut values,
            &conventions.timestamp_column,
            CellValue::DateTime(Local::now().naive_local()),
        );
        let id = self.allocate_id();
        self.rows.push(Row::new(id, values, RowState::Added));
        debug!(table = %self.name, row = %id, "row added");
        id
    }

    pub fn add_column(&mut self, column: Column) -> Result<()> {
        self.insert_column(self.columns.len(), column)
    }

    /// Insert a column at `index` (clamped to the column count).
    ///
    /// Existing rows receive the column's initial value in both their
    /// current values and their original snapshot, so the new column never
    /// reports as changed and no lifecycle state moves.
    pub fn insert_column(&mut self, index: usize, column: Column) -> Result<()> {
        if self.has_column(column.name.as_str()) {
            return Err(ModelError::DuplicateColumnName(column.name.to_string()));
        }
        let index = index.min(self.columns.len());
        let initial = column.initial_value();
        for row in &mut self.rows {
            row.values_mut().insert(index, initial.clone());
            if let Some(original) = row.original_mut() {
                original.insert(index, initial.clone());
            }
        }
        debug!(table = %self.name, column = %column.name, "column added");
        self.columns.insert(index, column);
        Ok(())
    }

    /// Delete a row.
    ///
    /// Rows that were added since the last commit are removed outright;
    /// other rows are marked deleted and removed by the next commit.
    pub fn delete_row(&mut self, id: RowId) -> Result<()> {
        let position = self.require_position(id)?;
        match self.rows[position].state() {
            RowState::Deleted => return Err(ModelError::AlreadyDeleted(id)),
            RowState::Added => {
                self.rows.remove(position);
            }
            RowState::Unchanged | RowState::Modified => {
                self.rows[position].set_state(RowState::Deleted);
            }
        }
        debug!(table = %self.name, row = %id, "row deleted");
        Ok(())
    }

    /// Delete every active row whose selection flag is set.
    pub fn delete_selected(&mut self, conventions: &Conventions) -> usize {
        if !self.has_column(&conventions.selection_column) {
            return 0;
        }
        let selected: Vec<RowId> = self
            .active_rows()
            .filter(|row| self.is_selected(row, conventions))
            .map(Row::id)
            .collect();
        let mut count = 0;
        for id in selected {
            if self.delete_row(id).is_ok() {
                count += 1;
            }
        }
        count
    }

    /// Set the selection flag on every active row. Returns the rows touched.
    pub fn set_all_selected(&mut self, conventions: &Conventions, selected: bool) -> usize {
        let ids: Vec<RowId> = self.active_rows().map(Row::id).collect();
        ids.into_iter()
            .filter(|id| self.set_selected(*id, conventions, selected).is_ok())
            .count()
    }

    /// Copy a row into a new added row placed right after it.
    ///
    /// The copy gets a cleared identity, a cleared selection flag and the
    /// enabled status.
    pub fn duplicate_row(&mut self, source: RowId, conventions: &Conventions) -> Result<RowId> {
        let position = self.require_position(source)?;
        let source_row = &self.rows[position];
        if source_row.is_deleted() {
            return Err(ModelError::RowDeleted(source));
        }
        let mut values = source_row.values().to_vec();
        self.apply_convention(&mut values, &conventions.identity_column, CellValue::Null);
        self.apply_convention(
            &mut values,
            &conventions.selection_column,
            CellValue::Boolean(false),
        );
        self.apply_convention(
            &mut values,
            &conventions.status_column,
            CellValue::Text(conventions.enabled_value.clone()),
        );
        let id = self.allocate_id();
        self.rows
            .insert(position + 1, Row::new(id, values, RowState::Added));
        debug!(table = %self.name, source = %source, row = %id, "row duplicated");
        Ok(id)
    }

    /// Counts a commit would report right now.
    pub fn pending_counts(&self) -> CommitSummary {
        let mut summary = CommitSummary::default();
        for row in &self.rows {
            match row.state() {
                RowState::Added => summary.added += 1,
                RowState::Modified => summary.modified += 1,
                RowState::Deleted => summary.deleted += 1,
                RowState::Unchanged => {}
            }
        }
        summary
    }

    pub fn has_changes(&self) -> bool {
        self.rows.iter().any(|row| row.state().is_pending())
    }

    /// Make the current values the new baseline.
    ///
    /// Deleted rows are removed; every other row becomes unchanged and drops
    /// its snapshot and validation marks.
    pub fn commit(&mut self) -> CommitSummary {
        let summary = self.pending_counts();
        self.rows.retain(|row| !row.is_deleted());
        for row in &mut self.rows {
            row.accept();
        }
        info!(
            table = %self.name,
            added = summary.added,
            modified = summary.modified,
            deleted = summary.deleted,
            "changes committed"
        );
        summary
    }

    /// Baseline a freshly built table without reporting counts.
    pub fn accept_loaded(&mut self) {
        self.rows.retain(|row| !row.is_deleted());
        for row in &mut self.rows {
            row.accept();
        }
    }

    /// Compare a cell against the row's original snapshot.
    ///
    /// Only modified rows can report a change; added rows are new as a
    /// whole and never carry cell-level differences.
    pub fn cell_diff(&self, id: RowId, column: &str) -> Result<CellDiff> {
        let index = self.column_index(column)?;
        let row = self.row(id).ok_or(ModelError::UnknownRow(id))?;
        if row.state() != RowState::Modified {
            return Ok(CellDiff::Unchanged);
        }
        match (row.original(index), row.value(index)) {
            (Some(original), Some(current)) if original != current => Ok(CellDiff::Changed {
                original: original.clone(),
                current: current.clone(),
            }),
            _ => Ok(CellDiff::Unchanged),
        }
    }
}
