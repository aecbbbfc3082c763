//! Row and cell highlight classification.
//!
//! Everything here is a pure function of the row's lifecycle state, its
//! original snapshot, its current values and its status. Renderers call it
//! whenever a row is loaded, a cell edit ends or a row changes state; no
//! cached result needs invalidating.

use serde::{Deserialize, Serialize};

use pipedict_model::{CellValue, Conventions, Row, RowState, Table};

/// Row-level highlight derived from the lifecycle state.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum RowHighlight {
    #[default]
    None,
    Insertion,
    Update,
}

/// Cell-level highlight for modified rows.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum CellHighlight {
    #[default]
    None,
    Changed,
}

/// How a disabled row combines with its lifecycle highlight.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum DisabledPrecedence {
    /// Disabled rows always render neutral, hiding insert/update colours.
    #[default]
    DisabledWins,
    /// Insert/update colours stay visible; disabled rows only mute the text.
    LifecycleWins,
}

/// Full classification of one row, or one cell when a column was given.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Classification {
    pub row: RowHighlight,
    pub cell: CellHighlight,
    pub disabled: bool,
}

pub fn row_highlight(state: RowState) -> RowHighlight {
    match state {
        RowState::Added => RowHighlight::Insertion,
        RowState::Modified => RowHighlight::Update,
        RowState::Unchanged | RowState::Deleted => RowHighlight::None,
    }
}

/// Compare a cell's original and current value.
///
/// Only modified rows can highlight cells. Added rows are already marked as
/// a whole, so their cells stay plain.
pub fn cell_highlight(
    state: RowState,
    original: Option<&CellValue>,
    current: Option<&CellValue>,
) -> CellHighlight {
    if state != RowState::Modified {
        return CellHighlight::None;
    }
    match (original, current) {
        (Some(original), Some(current)) if original != current => CellHighlight::Changed,
        _ => CellHighlight::None,
    }
}

/// Classify a row, and a cell when `column` is given.
pub fn classify(
    state: RowState,
    column: Option<&str>,
    original: Option<&CellValue>,
    current: Option<&CellValue>,
    disabled: bool,
) -> Classification {
    let cell = match column {
        Some(_) => cell_highlight(state, original, current),
        None => CellHighlight::None,
    };
    Classification {
        row: row_highlight(state),
        cell,
        disabled,
    }
}

/// Row classification plus per-cell highlights, in column order.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RowPresentation {
    pub highlight: RowHighlight,
    pub disabled: bool,
    pub cells: Vec<CellHighlight>,
}

/// Classify a row of `table` for rendering.
pub fn row_presentation(table: &Table, row: &Row, conventions: &Conventions) -> RowPresentation {
    let cells = (0..table.columns().len())
        .map(|index| cell_highlight(row.state(), row.original(index), row.value(index)))
        .collect();
    RowPresentation {
        highlight: row_highlight(row.state()),
        disabled: table.is_disabled(row, conventions),
        cells,
    }
}

impl RowPresentation {
    /// Resolve the row's colours under the given precedence.
    pub fn row_style(&self, precedence: DisabledPrecedence, palette: &Palette) -> Style {
        let lifecycle = match self.highlight {
            RowHighlight::None => None,
            RowHighlight::Insertion => Some(palette.insertion),
            RowHighlight::Update => Some(palette.update),
        };
        if !self.disabled {
            return Style {
                background: lifecycle,
                foreground: None,
            };
        }
        let background = match precedence {
            DisabledPrecedence::DisabledWins => Some(palette.disabled_background),
            DisabledPrecedence::LifecycleWins => {
                lifecycle.or(Some(palette.disabled_background))
            }
        };
        Style {
            background,
            foreground: Some(palette.disabled_foreground),
        }
    }

    /// Colours for one cell: a changed cell paints over the row background.
    pub fn cell_style(
        &self,
        index: usize,
        precedence: DisabledPrecedence,
        palette: &Palette,
    ) -> Style {
        let mut style = self.row_style(precedence, palette);
        if self.cells.get(index) == Some(&CellHighlight::Changed) {
            style.background = Some(palette.changed);
        }
        style
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Rgb {
    pub r: u8,
    pub g: u8,
    pub b: u8,
}

impl Rgb {
    pub const fn new(r: u8, g: u8, b: u8) -> Self {
        Self { r, g, b }
    }

    pub fn hex(&self) -> String {
        format!("#{:02X}{:02X}{:02X}", self.r, self.g, self.b)
    }
}

/// Resolved colours for a row or cell. `None` keeps the renderer default.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct Style {
    pub background: Option<Rgb>,
    pub foreground: Option<Rgb>,
}

/// Highlight colours.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Palette {
    /// Added rows (light green).
    pub insertion: Rgb,
    /// Modified rows (light yellow).
    pub update: Rgb,
    /// Changed cells (orange).
    pub changed: Rgb,
    pub disabled_background: Rgb,
    pub disabled_foreground: Rgb,
}

impl Default for Palette {
    fn default() -> Self {
        Self {
            insertion: Rgb::new(0xDC, 0xF8, 0xC6),
            update: Rgb::new(0xFF, 0xF9, 0xC4),
            changed: Rgb::new(0xFF, 0xE0, 0x82),
            disabled_background: Rgb::new(0xF5, 0xF5, 0xF5),
            disabled_foreground: Rgb::new(0x80, 0x80, 0x80),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn row_classes_follow_state() {
        assert_eq!(row_highlight(RowState::Added), RowHighlight::Insertion);
        assert_eq!(row_highlight(RowState::Modified), RowHighlight::Update);
        assert_eq!(row_highlight(RowState::Unchanged), RowHighlight::None);
        assert_eq!(row_highlight(RowState::Deleted), RowHighlight::None);
    }

    #[test]
    fn cells_compare_by_value() {
        let cs = CellValue::from("CS");
        let ss = CellValue::from("SS");
        assert_eq!(
            cell_highlight(RowState::Modified, Some(&cs), Some(&ss)),
            CellHighlight::Changed
        );
        assert_eq!(
            cell_highlight(RowState::Modified, Some(&cs), Some(&CellValue::from("CS"))),
            CellHighlight::None
        );
        assert_eq!(
            cell_highlight(RowState::Added, Some(&cs), Some(&ss)),
            CellHighlight::None
        );
    }

    #[test]
    fn classify_without_column_skips_cell() {
        let cs = CellValue::from("CS");
        let ss = CellValue::from("SS");
        let classification = classify(RowState::Modified, None, Some(&cs), Some(&ss), true);
        assert_eq!(
            classification,
            Classification {
                row: RowHighlight::Update,
                cell: CellHighlight::None,
                disabled: true,
            }
        );
    }

    #[test]
    fn disabled_precedence_is_explicit() {
        let palette = Palette::default();
        let presentation = RowPresentation {
            highlight: RowHighlight::Update,
            disabled: true,
            cells: vec![CellHighlight::None, CellHighlight::Changed],
        };

        let wins = presentation.row_style(DisabledPrecedence::DisabledWins, &palette);
        assert_eq!(wins.background, Some(palette.disabled_background));
        assert_eq!(wins.foreground, Some(palette.disabled_foreground));

        let lifecycle = presentation.row_style(DisabledPrecedence::LifecycleWins, &palette);
        assert_eq!(lifecycle.background, Some(palette.update));
        assert_eq!(lifecycle.foreground, Some(palette.disabled_foreground));

        let cell = presentation.cell_style(1, DisabledPrecedence::DisabledWins, &palette);
        assert_eq!(cell.background, Some(palette.changed));
    }

    #[test]
    fn palette_hex() {
        assert_eq!(Palette::default().insertion.hex(), "#DCF8C6");
    }
}
