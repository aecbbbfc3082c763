//! Filtered and ordered projection of a table.

use serde::{Deserialize, Serialize};
use tracing::debug;

use pipedict_model::{CellValue, ColumnType, ModelError, Row, RowId, Table};

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SortDirection {
    #[default]
    Ascending,
    Descending,
}

impl SortDirection {
    pub fn parse(s: &str) -> Option<Self> {
        match s.trim().to_lowercase().as_str() {
            "asc" | "ascending" => Some(Self::Ascending),
            "desc" | "descending" => Some(Self::Descending),
            _ => None,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SortKey {
    pub column: String,
    pub direction: SortDirection,
}

/// Search keyword and ordering applied over a table's active rows.
///
/// A view owns no rows; [`View::rows`] projects row ids out of the table it
/// is given. Deleted rows are never visible.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct View {
    filter: Option<String>,
    sort: Option<SortKey>,
}

impl View {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn filter(&self) -> Option<&str> {
        self.filter.as_deref()
    }

    pub fn sort(&self) -> Option<&SortKey> {
        self.sort.as_ref()
    }

    /// Apply a search keyword; blank input clears the filter.
    ///
    /// The keyword is matched literally as a case-insensitive substring of
    /// any text column.
    pub fn apply_filter(&mut self, keyword: &str) {
        if keyword.trim().is_empty() {
            self.filter = None;
        } else {
            self.filter = Some(keyword.to_string());
        }
        debug!(filter = ?self.filter, "search filter applied");
    }

    pub fn sort_by(
        &mut self,
        table: &Table,
        column: &str,
        direction: SortDirection,
    ) -> Result<(), ModelError> {
        let column = table
            .column(column)
            .ok_or_else(|| ModelError::UnknownColumn(column.to_string()))?;
        self.sort = Some(SortKey {
            column: column.name.to_string(),
            direction,
        });
        Ok(())
    }

    pub fn clear_sort(&mut self) {
        self.sort = None;
    }

    /// True when `row` passes the current filter.
    ///
    /// Tables without text columns are never filtered.
    pub fn matches(&self, table: &Table, row: &Row) -> bool {
        let Some(keyword) = &self.filter else {
            return true;
        };
        let needle = keyword.to_lowercase();
        let mut text_columns = table
            .columns()
            .iter()
            .enumerate()
            .filter(|(_, column)| column.data_type == ColumnType::Text)
            .map(|(index, _)| index)
            .peekable();
        if text_columns.peek().is_none() {
            return true;
        }
        text_columns.any(|index| {
            row.value(index)
                .and_then(CellValue::as_text)
                .is_some_and(|text| text.to_lowercase().contains(&needle))
        })
    }

    /// Visible row ids in display order.
    pub fn rows(&self, table: &Table) -> Vec<RowId> {
        let mut rows: Vec<&Row> = table
            .active_rows()
            .filter(|row| self.matches(table, row))
            .collect();
        if let Some(key) = &self.sort
            && let Ok(index) = table.column_index(&key.column)
        {
            rows.sort_by(|a, b| {
                let (left, right) = match key.direction {
                    SortDirection::Ascending => (a, b),
                    SortDirection::Descending => (b, a),
                };
                match (left.value(index), right.value(index)) {
                    (Some(left), Some(right)) => left.compare(right),
                    _ => std::cmp::Ordering::Equal,
                }
            });
        }
        rows.into_iter().map(Row::id).collect()
    }

    pub fn count(&self, table: &Table) -> usize {
        table
            .active_rows()
            .filter(|row| self.matches(table, row))
            .count()
    }

    /// Last visible row, used to select a freshly added row.
    pub fn last(&self, table: &Table) -> Option<RowId> {
        self.rows(table).last().copied()
    }
}
