//! Presentation-side logic for dictionary tables.
//!
//! - [`highlight`]: maps row lifecycle and cell differences to highlight
//!   classes and colours
//! - [`view`]: keyword-filtered, optionally sorted projection of a table
//! - [`guard`]: decides whether a cell may enter edit mode

pub mod guard;
pub mod highlight;
pub mod view;

pub use guard::{EditRejected, can_begin_edit};
pub use highlight::{
    CellHighlight, Classification, DisabledPrecedence, Palette, Rgb, RowHighlight,
    RowPresentation, Style, cell_highlight, classify, row_highlight, row_presentation,
};
pub use view::{SortDirection, SortKey, View};
