use thiserror::Error;

use crate::{ColumnType, RowId};

#[derive(Debug, Clone, PartialEq, Error)]
pub enum ModelError {
    #[error("unknown column: {0}")]
    UnknownColumn(String),
    #[error("unknown row: {0}")]
    UnknownRow(RowId),
    #[error("column {column} expects {expected} values, got {found}")]
    TypeMismatch {
        column: String,
        expected: ColumnType,
        found: &'static str,
    },
    #[error("column already exists: {0}")]
    DuplicateColumnName(String),
    #[error("invalid column name: {0:?}")]
    InvalidColumnName(String),
    #[error("row {0} is already deleted")]
    AlreadyDeleted(RowId),
    #[error("row {0} is deleted and cannot be changed")]
    RowDeleted(RowId),
    #[error("row has {found} values but the table has {expected} columns")]
    ArityMismatch { expected: usize, found: usize },
}

pub type Result<T> = std::result::Result<T, ModelError>;
