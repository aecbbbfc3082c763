//! Built-in pipe dictionary tables.

use std::future::Future;
use std::time::Duration;

use chrono::{NaiveDate, NaiveDateTime, TimeDelta};
use tracing::{debug, info};

use pipedict_model::{CellValue, Column, ColumnType, Conventions, Table};

use crate::{DictionarySource, Result};

/// Column of the placeholder table served for unknown nodes.
pub const NOTICE_COLUMN: &str = "Notice";

/// Deterministic source for the dictionary and basic-class nodes.
///
/// The identity, status and timestamp columns are named after the
/// configured [`Conventions`], and fixture rows carry its enabled value.
#[derive(Debug, Clone, Default)]
pub struct CatalogSource {
    latency: Duration,
    conventions: Conventions,
}

impl CatalogSource {
    pub fn new() -> Self {
        Self::default()
    }

    /// Delay every fetch, simulating a remote store.
    #[must_use]
    pub fn with_latency(mut self, latency: Duration) -> Self {
        self.latency = latency;
        self
    }

    #[must_use]
    pub fn with_conventions(mut self, conventions: Conventions) -> Self {
        self.conventions = conventions;
        self
    }

    pub fn latency(&self) -> Duration {
        self.latency
    }

    /// Build the table for `node` without waiting.
    pub fn table(&self, node: &str) -> Result<Table> {
        let names = &self.conventions;
        let table = match node {
            "Standard Series" => standard_series(node, names),
            "A-Pipe Standard" => pipe_standards(node, names),
            "B1-Main Material" => main_materials(node, names),
            "B3-Grade" => grades(node, names),
            "C1-Flange Standard" => flange_standards(node, names),
            "C2-Flange Pressure Rating" => pressure_ratings(node, names),
            "D-Wall Thickness Grade" => wall_thickness_grades(node, names),
            "Bend Data" => bend_data(node, names),
            "Wall Thickness Series" => wall_thickness_series(node, names),
            _ => {
                debug!(node, "no fixture for node, serving notice table");
                notice(node)
            }
        }?;
        Ok(table)
    }
}

impl DictionarySource for CatalogSource {
    fn fetch_table(&self, node: &str) -> impl Future<Output = Result<Table>> + Send {
        let source = self.clone();
        let node = node.to_string();
        async move {
            if !source.latency.is_zero() {
                tokio::time::sleep(source.latency).await;
            }
            let table = source.table(&node)?;
            info!(node = %node, rows = table.len(), "table fetched");
            Ok(table)
        }
    }
}

/// Build a baselined table from a schema and row values.
fn baseline(name: &str, columns: Vec<Column>, rows: Vec<Vec<CellValue>>) -> Result<Table> {
    let mut table = Table::new(name, columns)?;
    for values in rows {
        table.push_row(values)?;
    }
    table.accept_loaded();
    Ok(table)
}

fn id(names: &Conventions) -> pipedict_model::Result<Column> {
    Column::new(&names.identity_column, ColumnType::Integer)
}

fn text(name: &str) -> pipedict_model::Result<Column> {
    Column::new(name, ColumnType::Text)
}

fn required(name: &str) -> pipedict_model::Result<Column> {
    Column::required(name, ColumnType::Text)
}

fn status_column(names: &Conventions) -> pipedict_model::Result<Column> {
    required(&names.status_column)
}

/// Rows of `(code, name, ...)` text cells prefixed with a 1-based id and
/// suffixed with the status.
fn numbered<const N: usize>(rows: &[[&str; N]], status: &str) -> Vec<Vec<CellValue>> {
    rows.iter()
        .zip(1_i64..)
        .map(|(cells, id)| {
            let mut values = vec![CellValue::Integer(id)];
            values.extend(cells.iter().map(|cell| CellValue::from(*cell)));
            values.push(status.into());
            values
        })
        .collect()
}

fn standard_series(name: &str, names: &Conventions) -> Result<Table> {
    baseline(
        name,
        vec![
            id(names)?,
            required("SeriesName")?,
            text("SeriesDescription")?,
            status_column(names)?,
        ],
        numbered(
            &[
                ["ASME B36.10M", "Carbon steel pipe standard"],
                ["ASME B36.19M", "Stainless steel pipe standard"],
            ],
            &names.enabled_value,
        ),
    )
}

fn pipe_standards(name: &str, names: &Conventions) -> Result<Table> {
    baseline(
        name,
        vec![
            id(names)?,
            required("Standard")?,
            required("StandardCode")?,
            text("MainMaterial")?,
            text("SeriesName")?,
            status_column(names)?,
        ],
        numbered(
            &[
                ["API 5L", "STD_01", "CS", "ASME B36.10M"],
                ["ASTM A106", "STD_02", "CS", "ASME B36.10M"],
                ["ASTM A312", "STD_03", "SS", "ASME B36.19M"],
            ],
            &names.enabled_value,
        ),
    )
}

fn main_materials(name: &str, names: &Conventions) -> Result<Table> {
    let rows: Vec<[String; 2]> = ["CS", "SS", "LTCS", "LAS", "DSS"]
        .iter()
        .zip(100..)
        .map(|(material, code)| [(*material).to_string(), format!("M{code}")])
        .collect();
    let rows: Vec<[&str; 2]> = rows
        .iter()
        .map(|[material, code]| [material.as_str(), code.as_str()])
        .collect();
    baseline(
        name,
        vec![
            id(names)?,
            required("MainMaterial")?,
            required("MainMaterialCode")?,
            status_column(names)?,
        ],
        numbered(&rows, &names.enabled_value),
    )
}

fn grades(name: &str, names: &Conventions) -> Result<Table> {
    baseline(
        name,
        vec![
            id(names)?,
            required("GradeCode")?,
            required("PipeStandard")?,
            status_column(names)?,
        ],
        numbered(
            &[
                ["Gr.B", "ASTM A106"],
                ["TP304", "ASTM A312"],
                ["TP316L", "ASTM A312"],
            ],
            &names.enabled_value,
        ),
    )
}

fn flange_standards(name: &str, names: &Conventions) -> Result<Table> {
    baseline(
        name,
        vec![
            id(names)?,
            required("FlangeStandard")?,
            required("FlangeStandardCode")?,
            text("SeriesName")?,
            status_column(names)?,
        ],
        numbered(
            &[
                ["ASME B16.5", "FLG_STD_01", "ASME Series"],
                ["ASME B16.47 A", "FLG_STD_02", "ASME Series"],
                ["EN 1092-1", "FLG_STD_03", "DIN Series"],
            ],
            &names.enabled_value,
        ),
    )
}

fn pressure_ratings(name: &str, names: &Conventions) -> Result<Table> {
    let rows: Vec<[String; 2]> = ["150", "300", "600", "900", "1500", "2500"]
        .iter()
        .map(|rating| [format!("CL{rating}"), format!("R_{rating}")])
        .collect();
    let rows: Vec<[&str; 2]> = rows
        .iter()
        .map(|[rating, code]| [rating.as_str(), code.as_str()])
        .collect();
    baseline(
        name,
        vec![
            id(names)?,
            required("PressureRating")?,
            required("PressureRatingCode")?,
            status_column(names)?,
        ],
        numbered(&rows, &names.enabled_value),
    )
}

fn wall_thickness_grades(name: &str, names: &Conventions) -> Result<Table> {
    baseline(
        name,
        vec![
            id(names)?,
            required("WallThicknessStandard")?,
            required("WallThicknessCode")?,
            text("MainMaterial")?,
            status_column(names)?,
        ],
        numbered(
            &[
                ["SCH40", "WT_01", "CS"],
                ["SCH80", "WT_02", "CS"],
                ["SCH10S", "WT_03", "SS"],
                ["STD", "WT_04", ""],
            ],
            &names.enabled_value,
        ),
    )
}

fn bend_data(name: &str, names: &Conventions) -> Result<Table> {
    const ANGLES: [i64; 5] = [30, 45, 60, 90, 180];
    const RADII: [&str; 4] = ["1.0D", "1.5D", "3.0D", "5.0D"];
    const LENGTHS: [i64; 4] = [300, 500, 600, 1000];

    let first_update: Option<NaiveDateTime> =
        NaiveDate::from_ymd_opt(2025, 1, 6).and_then(|date| date.and_hms_opt(9, 30, 0));
    let rows: Vec<Vec<CellValue>> = (0..15_usize)
        .zip(1_i64..)
        .map(|(index, id)| {
            let updated = first_update.map(|start| start + TimeDelta::days(id * 3));
            vec![
                CellValue::Integer(id),
                CellValue::Integer(ANGLES[index % ANGLES.len()]),
                RADII[index % RADII.len()].into(),
                CellValue::Integer(LENGTHS[(index + 1) % LENGTHS.len()]),
                "ASME B16.9".into(),
                names.enabled_value.as_str().into(),
                updated.into(),
            ]
        })
        .collect();
    baseline(
        name,
        vec![
            id(names)?,
            Column::required("BendAngle", ColumnType::Integer)?,
            required("BendRadius")?,
            Column::new("StraightLength", ColumnType::Integer)?,
            required("ManufacturingStandard")?,
            status_column(names)?,
            Column::new(&names.timestamp_column, ColumnType::DateTime)?,
        ],
        rows,
    )
}

fn wall_thickness_series(name: &str, names: &Conventions) -> Result<Table> {
    let rows: Vec<Vec<CellValue>> = [
        ("1/2", "SCH40", 2.77, None),
        ("1/2", "SCH80", 3.73, None),
        ("1", "SCH40", 3.38, None),
        ("2", "SCH40", 3.91, None),
        ("4", "SCH40", 6.02, None),
        ("4", "SCH80", 8.56, Some("Heavy wall")),
    ]
    .into_iter()
    .map(|(nps, schedule, thickness, remark)| {
        vec![
            nps.into(),
            schedule.into(),
            CellValue::Float(thickness),
            names.enabled_value.as_str().into(),
            remark.into(),
        ]
    })
    .collect();
    baseline(
        name,
        vec![
            required("NPS")?,
            required("Schedule")?,
            Column::required("Thickness", ColumnType::Float)?,
            status_column(names)?,
            text("Remark")?,
        ],
        rows,
    )
}

fn notice(node: &str) -> Result<Table> {
    baseline(
        node,
        vec![text(NOTICE_COLUMN)?],
        vec![vec![format!("No data structure defined for {node}").into()]],
    )
}
