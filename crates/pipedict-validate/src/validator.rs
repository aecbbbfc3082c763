use tracing::{debug, info, warn};

use pipedict_model::{Column, CommitSummary, Row, Table};

use crate::checks::{Check, RequiredCheck};
use crate::{FieldError, ROW_ERROR_MESSAGE, ValidationError};

/// Runs a set of checks over rows and gates commits.
pub struct Validator {
    checks: Vec<Box<dyn Check>>,
}

impl Default for Validator {
    fn default() -> Self {
        Self::new()
    }
}

impl std::fmt::Debug for Validator {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let names: Vec<_> = self.checks.iter().map(|check| check.name()).collect();
        f.debug_struct("Validator").field("checks", &names).finish()
    }
}

impl Validator {
    /// Validator with the built-in required-field check.
    pub fn new() -> Self {
        Self {
            checks: vec![Box::new(RequiredCheck)],
        }
    }

    /// Validate one row and refresh its marks.
    ///
    /// Deleted rows always pass and keep no marks. Each violated column gets
    /// a column error, and the row gets [`ROW_ERROR_MESSAGE`] when anything
    /// failed.
    pub fn validate_row(&self, columns: &[Column], row: &mut Row) -> Result<(), Vec<FieldError>> {
        row.marks_mut().clear();
        if row.is_deleted() {
            return Ok(());
        }

        let errors: Vec<FieldError> = {
            let row: &Row = row;
            self.checks
                .iter()
                .flat_map(|check| check.check(columns, row))
                .collect()
        };
        if errors.is_empty() {
            return Ok(());
        }

        let marks = row.marks_mut();
        for error in &errors {
            marks.set_column_error(error.column(), error.message());
        }
        if marks.row_error.is_none() {
            marks.row_error = Some(ROW_ERROR_MESSAGE.to_string());
        }
        debug!(row = %row.id(), errors = errors.len(), "row failed validation");
        Err(errors)
    }

    /// Validate every active row, returning the first violation.
    ///
    /// All rows are checked so each one carries its own marks; only the
    /// first failure in table order is reported. Positions count active
    /// rows only and start at 1.
    pub fn validate_table(&self, table: &mut Table) -> Result<(), ValidationError> {
        let columns = table.columns().to_vec();
        let mut first: Option<ValidationError> = None;
        let mut position = 0;

        for row in table.rows_mut() {
            if row.is_deleted() {
                row.marks_mut().clear();
                continue;
            }
            position += 1;
            if let Err(errors) = self.validate_row(&columns, row)
                && first.is_none()
            {
                let error = &errors[0];
                first = Some(ValidationError {
                    position,
                    row: row.id(),
                    column: error.column().to_string(),
                    reason: error.message(),
                });
            }
        }

        match first {
            Some(error) => {
                warn!(
                    table = table.name(),
                    position = error.position,
                    column = %error.column,
                    "validation failed"
                );
                Err(error)
            }
            None => Ok(()),
        }
    }

    /// Commit the table if every active row passes validation.
    ///
    /// On failure the table keeps its pending changes so the user can fix
    /// the reported row and retry.
    pub fn try_commit(&self, table: &mut Table) -> Result<CommitSummary, ValidationError> {
        self.validate_table(table)?;
        let summary = table.commit();
        info!(table = table.name(), %summary, "table saved");
        Ok(summary)
    }
}
