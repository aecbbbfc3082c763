//! Validation for dictionary tables.
//!
//! Checks run row by row against the column schema. Failing rows get
//! validation marks for display, the table-level pass reports only the
//! first violation, and [`Validator::try_commit`] refuses to commit while
//! any active row fails.

pub mod checks;
mod issue;
mod validator;

pub use checks::{Check, RequiredCheck};
pub use issue::{FieldError, ROW_ERROR_MESSAGE, ValidationError};
pub use validator::Validator;
