//! Required column checks.
//!
//! A required column fails when the row's current value is null, empty
//! or whitespace-only.

use pipedict_model::{Column, Row};

use super::Check;
use crate::FieldError;

#[derive(Debug, Clone, Copy, Default)]
pub struct RequiredCheck;

impl Check for RequiredCheck {
    fn name(&self) -> &'static str {
        "required"
    }

    fn check(&self, columns: &[Column], row: &Row) -> Vec<FieldError> {
        columns
            .iter()
            .enumerate()
            .filter(|(_, column)| column.required)
            .filter(|(index, _)| row.value(*index).is_none_or(|value| value.is_blank()))
            .map(|(_, column)| FieldError::RequiredEmpty {
                column: column.name.to_string(),
            })
            .collect()
    }
}
