//! Edit-begin guard for disabled rows.

use thiserror::Error;
use tracing::debug;

use pipedict_model::{Conventions, ModelError, RowId, Table};

/// Why a cell may not enter edit mode.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum EditRejected {
    #[error("row {row} is disabled; only the {status_column} column can be edited")]
    RowDisabled { row: RowId, status_column: String },
    #[error("row {0} is deleted")]
    RowDeleted(RowId),
    #[error(transparent)]
    Model(#[from] ModelError),
}

/// Decide whether a cell may start editing.
///
/// Rows whose status holds the disabled value only accept edits of the
/// status column itself, so they can be re-enabled. Their selection
/// checkbox is locked as well.
pub fn can_begin_edit(
    table: &Table,
    row: RowId,
    column: &str,
    conventions: &Conventions,
) -> Result<(), EditRejected> {
    table.column_index(column)?;
    let target = table.row(row).ok_or(ModelError::UnknownRow(row))?;
    if target.is_deleted() {
        return Err(EditRejected::RowDeleted(row));
    }
    if conventions.is_status_column(column) {
        return Ok(());
    }
    if table.is_disabled(target, conventions) {
        debug!(row = %row, column, "edit rejected on disabled row");
        return Err(EditRejected::RowDisabled {
            row,
            status_column: conventions.status_column.clone(),
        });
    }
    Ok(())
}
