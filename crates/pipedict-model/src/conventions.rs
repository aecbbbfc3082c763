//! Column naming conventions shared by the editing commands.

use serde::{Deserialize, Serialize};

/// Well-known column names and status values.
///
/// Dictionary tables share an identity column, a status column toggled
/// between an enabled and a disabled value, and optionally a last-update
/// timestamp. The editor adds a boolean selection column used by the
/// bulk-delete command.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct Conventions {
    pub identity_column: String,
    pub selection_column: String,
    pub status_column: String,
    pub timestamp_column: String,
    pub enabled_value: String,
    pub disabled_value: String,
}

impl Default for Conventions {
    fn default() -> Self {
        Self {
            identity_column: "ID".to_string(),
            selection_column: "IsSelected".to_string(),
            status_column: "Status".to_string(),
            timestamp_column: "UpdatedAt".to_string(),
            enabled_value: "Enabled".to_string(),
            disabled_value: "Disabled".to_string(),
        }
    }
}

impl Conventions {
    pub fn is_status_column(&self, column: &str) -> bool {
        self.status_column.eq_ignore_ascii_case(column.trim())
    }

    pub fn is_selection_column(&self, column: &str) -> bool {
        self.selection_column.eq_ignore_ascii_case(column.trim())
    }
}
