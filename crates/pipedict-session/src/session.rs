use tracing::{debug, info, warn};

use pipedict_model::{CellDiff, CellValue, Column, ColumnType, Conventions, RowId, Table};
use pipedict_source::{DictionarySource, LoadSequencer, LoadTicket, SourceError};
use pipedict_validate::Validator;
use pipedict_view::{SortDirection, View, can_begin_edit};

use crate::{CommandOutcome, LoadOutcome, Result, SessionError};

const EDIT_HINT: &str =
    "Edit cells directly in the table.\nDisabled rows only accept changes to their status.";

/// The loaded table of the selected node and its view.
#[derive(Debug, Clone)]
pub struct ActiveTable {
    pub node: String,
    pub table: Table,
    pub view: View,
}

impl ActiveTable {
    /// Visible row ids in display order.
    pub fn visible_rows(&self) -> Vec<RowId> {
        self.view.rows(&self.table)
    }
}

/// Editor state for one user.
#[derive(Debug, Default)]
pub struct EditorSession {
    active: Option<ActiveTable>,
    selected: Option<RowId>,
    search: String,
    all_selected: bool,
    conventions: Conventions,
    validator: Validator,
    loads: LoadSequencer,
}

impl EditorSession {
    pub fn new(conventions: Conventions) -> Self {
        Self {
            conventions,
            ..Self::default()
        }
    }

    pub fn conventions(&self) -> &Conventions {
        &self.conventions
    }

    pub fn active(&self) -> Option<&ActiveTable> {
        self.active.as_ref()
    }

    pub fn table(&self) -> Option<&Table> {
        self.active.as_ref().map(|active| &active.table)
    }

    pub fn search(&self) -> &str {
        &self.search
    }

    pub fn all_selected(&self) -> bool {
        self.all_selected
    }

    pub fn selected_row(&self) -> Option<RowId> {
        self.selected
    }

    fn require_active(&self) -> Result<&ActiveTable> {
        self.active.as_ref().ok_or(SessionError::NoActiveTable)
    }

    fn require_active_mut(&mut self) -> Result<&mut ActiveTable> {
        self.active.as_mut().ok_or(SessionError::NoActiveTable)
    }

    // Loading

    /// Load the table of `node` and make it the active table.
    pub async fn select_node<S: DictionarySource>(
        &mut self,
        source: &S,
        node: &str,
    ) -> Result<LoadOutcome> {
        let ticket = self.begin_load(node);
        let result = source.fetch_table(node).await;
        self.finish_load(&ticket, result)
    }

    /// Start a load: clears the search and the select-all flag.
    ///
    /// Both resets apply to the current table right away, so a failed fetch
    /// leaves it unfiltered and unchecked. Pair with
    /// [`EditorSession::finish_load`] when the fetch is driven outside the
    /// session.
    pub fn begin_load(&mut self, node: &str) -> LoadTicket {
        self.set_search("");
        if self.all_selected
            && let Some(active) = &mut self.active
        {
            active.table.set_all_selected(&self.conventions, false);
        }
        self.all_selected = false;
        self.loads.begin(node)
    }

    /// Install a fetched table unless a newer load has started since.
    ///
    /// A failed fetch keeps the previous table.
    pub fn finish_load(
        &mut self,
        ticket: &LoadTicket,
        result: std::result::Result<Table, SourceError>,
    ) -> Result<LoadOutcome> {
        let Some(result) = self.loads.complete(ticket, result) else {
            return Ok(LoadOutcome::Superseded {
                node: ticket.node().to_string(),
            });
        };
        let mut table = result?;
        if !table.has_column(&self.conventions.selection_column) {
            let column = Column::new(&self.conventions.selection_column, ColumnType::Boolean)?
                .with_default(false);
            table.insert_column(0, column)?;
        }

        let mut view = View::new();
        view.apply_filter(&self.search);
        let rows = table.active_len();
        info!(node = ticket.node(), rows, "table loaded");
        self.active = Some(ActiveTable {
            node: ticket.node().to_string(),
            table,
            view,
        });
        self.selected = None;
        Ok(LoadOutcome::Loaded {
            node: ticket.node().to_string(),
            rows,
        })
    }

    // View

    pub fn set_search(&mut self, text: &str) {
        self.search = text.to_string();
        if let Some(active) = &mut self.active {
            active.view.apply_filter(text);
        }
    }

    pub fn sort_by(&mut self, column: &str, direction: SortDirection) -> Result<()> {
        let active = self.require_active_mut()?;
        active.view.sort_by(&active.table, column, direction)?;
        Ok(())
    }

    pub fn clear_sort(&mut self) -> Result<()> {
        self.require_active_mut()?.view.clear_sort();
        Ok(())
    }

    /// Row id at a 1-based position of the visible rows.
    pub fn row_at(&self, position: usize) -> Result<RowId> {
        let visible = self.require_active()?.visible_rows();
        position
            .checked_sub(1)
            .and_then(|index| visible.get(index).copied())
            .ok_or(SessionError::RowOutOfRange {
                position,
                visible: visible.len(),
            })
    }

    // Selection

    pub fn select_row(&mut self, row: RowId) -> Result<()> {
        let active = self.require_active()?;
        let target = active
            .table
            .row(row)
            .ok_or(pipedict_model::ModelError::UnknownRow(row))?;
        if target.is_deleted() {
            return Err(pipedict_model::ModelError::RowDeleted(row).into());
        }
        self.selected = Some(row);
        Ok(())
    }

    pub fn clear_selection(&mut self) {
        self.selected = None;
    }

    /// Set the selection flag of one row.
    ///
    /// Goes through the edit guard, so disabled rows stay unchecked.
    pub fn check_row(&mut self, row: RowId, checked: bool) -> Result<()> {
        let conventions = self.conventions.clone();
        self.begin_edit(row, &conventions.selection_column)?;
        let active = self.require_active_mut()?;
        active.table.set_selected(row, &conventions, checked)?;
        Ok(())
    }

    /// Set the selection flag of every active row.
    pub fn set_all_selected(&mut self, selected: bool) -> Result<usize> {
        let conventions = self.conventions.clone();
        let active = self.require_active_mut()?;
        let touched = active.table.set_all_selected(&conventions, selected);
        self.all_selected = selected;
        debug!(selected, touched, "select-all toggled");
        Ok(touched)
    }

    // Editing

    pub fn begin_edit(&self, row: RowId, column: &str) -> Result<()> {
        let active = self.require_active()?;
        can_begin_edit(&active.table, row, column, &self.conventions).inspect_err(|error| {
            warn!(row = %row, column, %error, "edit rejected");
        })?;
        Ok(())
    }

    /// Write a cell after passing the edit guard, then re-validate the row.
    ///
    /// Returns whether the value changed. Writes to the selection column pass
    /// the same guard but do not count as changes.
    pub fn edit_cell(
        &mut self,
        row: RowId,
        column: &str,
        value: impl Into<CellValue>,
    ) -> Result<bool> {
        self.begin_edit(row, column)?;
        let value = value.into();
        let conventions = self.conventions.clone();
        let active = self.active.as_mut().ok_or(SessionError::NoActiveTable)?;

        if conventions.is_selection_column(column) {
            let checked = value.as_bool().unwrap_or(false);
            active.table.set_selected(row, &conventions, checked)?;
            return Ok(false);
        }

        let changed = active.table.set_cell(row, column, value)?;
        let columns = active.table.columns().to_vec();
        // The outcome lands in the row marks.
        if let Some(target) = active.table.row_mut(row) {
            self.validator.validate_row(&columns, target).ok();
        }
        Ok(changed)
    }

    /// Parse `raw` for the column's type and write it.
    pub fn edit_cell_text(&mut self, row: RowId, column: &str, raw: &str) -> Result<bool> {
        let active = self.require_active()?;
        let data_type = active
            .table
            .column(column)
            .ok_or_else(|| pipedict_model::ModelError::UnknownColumn(column.to_string()))?
            .data_type;
        let value =
            CellValue::parse_for(data_type, raw).map_err(|reason| SessionError::InvalidValue {
                column: column.to_string(),
                reason,
            })?;
        self.edit_cell(row, column, value)
    }

    /// Cell differences of a row against its original snapshot.
    pub fn row_diff(&self, row: RowId) -> Result<Vec<(String, CellDiff)>> {
        let active = self.require_active()?;
        active
            .table
            .columns()
            .iter()
            .map(|column| {
                let name = column.name.as_str();
                Ok((name.to_string(), active.table.cell_diff(row, name)?))
            })
            .collect()
    }

    // Commands

    /// Append a new row and select it.
    pub fn add_row(&mut self) -> Result<CommandOutcome> {
        let conventions = self.conventions.clone();
        let active = self.require_active_mut()?;
        let row = active.table.add_row(&conventions);
        self.selected = Some(row);
        Ok(CommandOutcome::RowAdded { row })
    }

    /// Add an optional text column named by the user's input.
    ///
    /// Blank input cancels; a name already in use leaves the table as it
    /// was.
    pub fn add_column(&mut self, prompt: Option<&str>) -> Result<CommandOutcome> {
        let search = self.search.clone();
        let active = self.require_active_mut()?;
        let Some(name) = prompt.map(str::trim).filter(|name| !name.is_empty()) else {
            return Ok(CommandOutcome::Cancelled);
        };
        active
            .table
            .add_column(Column::new(name, ColumnType::Text)?)?;

        let mut view = View::new();
        view.apply_filter(&search);
        if let Some(key) = active.view.sort() {
            view.sort_by(&active.table, &key.column, key.direction)?;
        }
        active.view = view;
        Ok(CommandOutcome::ColumnAdded {
            name: name.to_string(),
        })
    }

    /// Delete every checked row once the user confirmed.
    pub fn delete_selected(&mut self, confirmed: bool) -> Result<CommandOutcome> {
        let active = self.active.as_mut().ok_or(SessionError::NoActiveTable)?;
        if !confirmed {
            return Ok(CommandOutcome::Cancelled);
        }
        let count = active.table.delete_selected(&self.conventions);
        if count > 0 {
            self.all_selected = false;
            let selected_gone = self.selected.is_some_and(|row| {
                active
                    .table
                    .row(row)
                    .is_none_or(pipedict_model::Row::is_deleted)
            });
            if selected_gone {
                self.selected = None;
            }
        }
        info!(count, "checked rows deleted");
        Ok(CommandOutcome::RowsDeleted { count })
    }

    /// Copy the selected row into a new row right after it.
    pub fn duplicate_row(&mut self) -> Result<CommandOutcome> {
        let conventions = self.conventions.clone();
        let selected = self.selected;
        let active = self.require_active_mut()?;
        let source = selected.ok_or(SessionError::NoRowSelected)?;
        let row = active.table.duplicate_row(source, &conventions)?;
        Ok(CommandOutcome::RowDuplicated { source, row })
    }

    /// Commit the table when every row passes validation.
    pub fn save(&mut self) -> Result<CommandOutcome> {
        let active = self.active.as_mut().ok_or(SessionError::NoActiveTable)?;
        let summary = self.validator.try_commit(&mut active.table)?;
        Ok(CommandOutcome::Saved { summary })
    }

    pub fn edit(&self) -> Result<CommandOutcome> {
        self.require_active()?;
        Ok(CommandOutcome::Info {
            message: EDIT_HINT.to_string(),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pipedict_source::CatalogSource;

    fn loaded(node: &str) -> EditorSession {
        let mut session = EditorSession::default();
        let ticket = session.begin_load(node);
        let table = CatalogSource::new().table(node);
        session.finish_load(&ticket, table).unwrap();
        session
    }

    #[test]
    fn selection_column_is_injected_first() {
        let session = loaded("B3-Grade");
        let table = session.table().unwrap();
        assert_eq!(table.columns()[0].name.as_str(), "IsSelected");
        assert!(!table.has_changes());
    }

    #[test]
    fn add_row_selects_new_row() {
        let mut session = loaded("B3-Grade");
        let CommandOutcome::RowAdded { row } = session.add_row().unwrap() else {
            panic!("expected a new row");
        };
        assert_eq!(session.selected_row(), Some(row));
    }

    #[test]
    fn selection_edits_are_untracked() {
        let mut session = loaded("B3-Grade");
        let row = session.row_at(1).unwrap();
        assert!(!session.edit_cell(row, "IsSelected", true).unwrap());
        let table = session.table().unwrap();
        assert!(!table.has_changes());
        assert!(table.is_selected(table.row(row).unwrap(), session.conventions()));
    }
}
