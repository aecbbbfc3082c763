//! Change-tracked tabular model for dictionary reference data.
//!
//! A [`Table`] holds a typed column schema and rows that remember their
//! lifecycle relative to the last committed baseline:
//!
//! - rows loaded from a source start [`RowState::Unchanged`]
//! - rows inserted by the user are [`RowState::Added`]
//! - the first effective edit of an unchanged row snapshots the row and
//!   flips it to [`RowState::Modified`]
//! - deleted rows stay addressable as [`RowState::Deleted`] until
//!   [`Table::commit`] removes them
//!
//! Column naming conventions shared by the editing commands (identity,
//! selection, status and timestamp columns) live in [`Conventions`].

pub mod column;
pub mod conventions;
pub mod error;
pub mod ids;
pub mod row;
pub mod table;
pub mod value;

pub use column::Column;
pub use conventions::Conventions;
pub use error::{ModelError, Result};
pub use ids::{ColumnName, RowId};
pub use row::{Row, RowMarks, RowState};
pub use table::{CellDiff, CommitSummary, Table};
pub use value::{CellValue, ColumnType, DISPLAY_DATETIME_FORMAT};
