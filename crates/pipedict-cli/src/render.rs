//! Terminal and JSON rendering of the active table.

use comfy_table::modifiers::{UTF8_ROUND_CORNERS, UTF8_SOLID_INNER_BORDERS};
use comfy_table::presets::{UTF8_FULL, UTF8_FULL_CONDENSED};
use comfy_table::{Attribute, Cell, CellAlignment, Color, ContentArrangement, Table};
use serde_json::{Value, json};

use pipedict_model::{CellDiff, CellValue, Conventions, RowId};
use pipedict_session::ActiveTable;
use pipedict_source::NodeTree;
use pipedict_view::{Palette, Rgb, Style, row_presentation};

use crate::settings::DisplaySettings;

/// Text shown for a cell.
pub fn format_cell(value: &CellValue, display: &DisplaySettings) -> String {
    match value {
        CellValue::Null => String::new(),
        CellValue::DateTime(at) => at.format(&display.datetime_format).to_string(),
        CellValue::Boolean(true) => "[x]".to_string(),
        CellValue::Boolean(false) => "[ ]".to_string(),
        other => other.to_string(),
    }
}

/// The visible rows of the active table.
///
/// The leading column holds the 1-based row position, `>` for the selected
/// row and `!` for rows that failed validation. Required columns carry a
/// `*` after their name.
pub fn render_table(
    active: &ActiveTable,
    conventions: &Conventions,
    display: &DisplaySettings,
    selected: Option<RowId>,
) -> Table {
    let palette = Palette::default();
    let source = &active.table;

    let mut table = Table::new();
    apply_table_style(&mut table);
    let mut header = vec![header_cell("#")];
    header.extend(source.columns().iter().map(|column| {
        if column.required {
            header_cell(&format!("{} *", column.name))
        } else {
            header_cell(column.name.as_str())
        }
    }));
    table.set_header(header);
    if let Some(column) = table.column_mut(0) {
        column.set_cell_alignment(CellAlignment::Right);
    }

    for (position, id) in active.visible_rows().into_iter().enumerate() {
        let Some(row) = source.row(id) else {
            continue;
        };
        let presentation = row_presentation(source, row, conventions);
        let mut marker = String::new();
        if selected == Some(id) {
            marker.push('>');
        }
        if row.has_errors() {
            marker.push('!');
        }
        marker.push_str(&(position + 1).to_string());

        let mut cells = vec![Cell::new(marker).add_attribute(Attribute::Bold)];
        cells.extend(row.values().iter().enumerate().map(|(index, value)| {
            let cell = Cell::new(format_cell(value, display));
            if display.color {
                styled(
                    cell,
                    presentation.cell_style(index, display.precedence, &palette),
                )
            } else {
                cell
            }
        }));
        table.add_row(cells);
    }
    table
}

/// One line per row carrying validation marks, by visible position.
pub fn error_lines(active: &ActiveTable) -> Vec<String> {
    let mut lines = Vec::new();
    for (position, id) in active.visible_rows().into_iter().enumerate() {
        let Some(row) = active.table.row(id) else {
            continue;
        };
        let marks = row.marks();
        if marks.is_empty() {
            continue;
        }
        let mut line = format!("row {}: ", position + 1);
        line.push_str(marks.row_error.as_deref().unwrap_or_default());
        for message in marks.column_errors.values() {
            line.push_str("; ");
            line.push_str(message);
        }
        lines.push(line);
    }
    lines
}

pub fn render_nodes(tree: &NodeTree) -> Table {
    let mut table = Table::new();
    table
        .load_preset(UTF8_FULL_CONDENSED)
        .apply_modifier(UTF8_ROUND_CORNERS)
        .set_content_arrangement(ContentArrangement::Dynamic);
    table.set_header(vec![header_cell("Group"), header_cell("Node")]);
    for root in &tree.roots {
        for child in &root.children {
            table.add_row(vec![
                Cell::new(&root.title).fg(Color::DarkGrey),
                Cell::new(&child.title).fg(Color::Blue),
            ]);
        }
    }
    table
}

pub fn render_diff(diffs: &[(String, CellDiff)], display: &DisplaySettings) -> Table {
    let mut table = Table::new();
    apply_table_style(&mut table);
    table.set_header(vec![
        header_cell("Column"),
        header_cell("Original"),
        header_cell("Current"),
    ]);
    for (column, diff) in diffs {
        if let CellDiff::Changed { original, current } = diff {
            table.add_row(vec![
                Cell::new(column).add_attribute(Attribute::Bold),
                Cell::new(format_cell(original, display)).fg(Color::DarkGrey),
                Cell::new(format_cell(current, display)).fg(Color::Yellow),
            ]);
        }
    }
    table
}

fn cell_json(value: &CellValue, display: &DisplaySettings) -> Value {
    match value {
        CellValue::Null => Value::Null,
        CellValue::Text(text) => json!(text),
        CellValue::Integer(number) => json!(number),
        CellValue::Float(number) => json!(number),
        CellValue::Boolean(flag) => json!(flag),
        CellValue::DateTime(_) => json!(format_cell(value, display)),
    }
}

/// The visible rows with their lifecycle state and highlight classes.
pub fn table_json(
    active: &ActiveTable,
    conventions: &Conventions,
    display: &DisplaySettings,
) -> Value {
    let source = &active.table;
    let columns: Vec<Value> = source
        .columns()
        .iter()
        .map(|column| {
            json!({
                "name": column.name,
                "type": column.data_type,
                "required": column.required,
            })
        })
        .collect();

    let rows: Vec<Value> = active
        .visible_rows()
        .into_iter()
        .enumerate()
        .filter_map(|(position, id)| {
            let row = source.row(id)?;
            let presentation = row_presentation(source, row, conventions);
            let values: serde_json::Map<String, Value> = source
                .columns()
                .iter()
                .zip(row.values())
                .map(|(column, value)| (column.name.to_string(), cell_json(value, display)))
                .collect();
            let changed: Vec<&str> = source
                .columns()
                .iter()
                .zip(&presentation.cells)
                .filter(|(_, cell)| **cell == pipedict_view::CellHighlight::Changed)
                .map(|(column, _)| column.name.as_str())
                .collect();
            Some(json!({
                "position": position + 1,
                "id": id,
                "state": row.state(),
                "highlight": presentation.highlight,
                "disabled": presentation.disabled,
                "changed": changed,
                "errors": row.marks(),
                "values": values,
            }))
        })
        .collect();

    json!({
        "node": active.node,
        "search": active.view.filter(),
        "pending": source.pending_counts(),
        "columns": columns,
        "rows": rows,
    })
}

fn apply_table_style(table: &mut Table) {
    table
        .load_preset(UTF8_FULL)
        .apply_modifier(UTF8_ROUND_CORNERS)
        .apply_modifier(UTF8_SOLID_INNER_BORDERS)
        .set_content_arrangement(ContentArrangement::Dynamic);
}

fn rgb(color: Rgb) -> Color {
    Color::Rgb {
        r: color.r,
        g: color.g,
        b: color.b,
    }
}

fn styled(mut cell: Cell, style: Style) -> Cell {
    if let Some(background) = style.background {
        cell = cell.bg(rgb(background));
    }
    if let Some(foreground) = style.foreground {
        cell = cell.fg(rgb(foreground));
    }
    cell
}

fn header_cell(label: &str) -> Cell {
    Cell::new(label)
        .fg(Color::Cyan)
        .add_attribute(Attribute::Bold)
}
