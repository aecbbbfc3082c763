//! Row checks.
//!
//! Each check inspects one row against the column schema and returns the
//! violations it finds. Deleted rows never reach a check.

mod required;

pub use required::RequiredCheck;

use pipedict_model::{Column, Row};

use crate::FieldError;

/// A validation rule evaluated per row.
pub trait Check: Send + Sync {
    /// Short name used in logs.
    fn name(&self) -> &'static str;

    fn check(&self, columns: &[Column], row: &Row) -> Vec<FieldError>;
}
