//! Change tracking tests for the dictionary table model.

use pipedict_model::{
    CellDiff, CellValue, Column, ColumnType, CommitSummary, Conventions, ModelError, RowId,
    RowState, Table,
};
use proptest::prelude::*;

fn pipe_standards() -> Table {
    let mut table = Table::new(
        "A-Pipe Standard",
        vec![
            Column::new("ID", ColumnType::Integer).unwrap(),
            Column::required("Standard", ColumnType::Text).unwrap(),
            Column::required("StandardCode", ColumnType::Text).unwrap(),
            Column::new("MainMaterial", ColumnType::Text).unwrap(),
            Column::required("Status", ColumnType::Text).unwrap(),
        ],
    )
    .unwrap();
    for (id, standard, code, material) in [
        (1, "API 5L", "STD_01", "CS"),
        (2, "ASTM A106", "STD_02", "CS"),
        (3, "ASTM A312", "STD_03", "SS"),
        (4, "ASTM A333", "STD_04", "LTCS"),
    ] {
        table
            .push_row(vec![
                CellValue::Integer(id),
                standard.into(),
                code.into(),
                material.into(),
                "Enabled".into(),
            ])
            .unwrap();
    }
    table.accept_loaded();
    table
}

fn row_id(table: &Table, position: usize) -> RowId {
    table.rows()[position].id()
}

#[test]
fn loaded_rows_are_unchanged() {
    let table = pipe_standards();
    assert!(table.rows().iter().all(|row| row.state() == RowState::Unchanged));
    assert!(!table.has_changes());
}

#[test]
fn first_edit_snapshots_the_whole_row_once() {
    let mut table = pipe_standards();
    let id = row_id(&table, 0);

    assert_eq!(table.set_cell(id, "Standard", "API 5L PSL2"), Ok(true));
    let row = table.row(id).unwrap();
    assert_eq!(row.state(), RowState::Modified);
    let snapshot = row.original_values().unwrap().to_vec();
    assert_eq!(snapshot[1], CellValue::from("API 5L"));
    assert_eq!(snapshot[2], CellValue::from("STD_01"));

    table.set_cell(id, "StandardCode", "STD_99").unwrap();
    let row = table.row(id).unwrap();
    assert_eq!(row.original_values().unwrap(), snapshot.as_slice());
    assert_eq!(row.state(), RowState::Modified);
}

#[test]
fn editing_back_keeps_modified_but_clears_cell_diff() {
    let mut table = pipe_standards();
    let id = row_id(&table, 1);

    table.set_cell(id, "MainMaterial", "SS").unwrap();
    assert_eq!(
        table.cell_diff(id, "MainMaterial"),
        Ok(CellDiff::Changed {
            original: "CS".into(),
            current: "SS".into(),
        })
    );
    assert_eq!(table.cell_diff(id, "Standard"), Ok(CellDiff::Unchanged));

    table.set_cell(id, "MainMaterial", "CS").unwrap();
    assert_eq!(table.cell_diff(id, "MainMaterial"), Ok(CellDiff::Unchanged));
    assert_eq!(table.row(id).unwrap().state(), RowState::Modified);
}

#[test]
fn set_cell_rejects_unknown_column_and_wrong_type() {
    let mut table = pipe_standards();
    let id = row_id(&table, 0);

    assert_eq!(
        table.set_cell(id, "Grade", "X"),
        Err(ModelError::UnknownColumn("Grade".to_string()))
    );
    assert!(matches!(
        table.set_cell(id, "ID", "not a number"),
        Err(ModelError::TypeMismatch { .. })
    ));
    assert_eq!(table.row(id).unwrap().state(), RowState::Unchanged);
}

#[test]
fn rewriting_nan_is_not_a_change() {
    let mut table = Table::new(
        "Wall Thickness Series",
        vec![
            Column::new("Thickness", ColumnType::Float).unwrap(),
            Column::new("Remark", ColumnType::Text).unwrap(),
        ],
    )
    .unwrap();
    table
        .push_row(vec![CellValue::Float(2.77), CellValue::Null])
        .unwrap();
    table.accept_loaded();
    let id = row_id(&table, 0);

    assert_eq!(table.set_cell(id, "Thickness", f64::NAN), Ok(true));
    assert_eq!(table.set_cell(id, "Thickness", f64::NAN), Ok(false));
    assert!(table.cell_diff(id, "Thickness").unwrap().is_changed());

    table.commit();
    table.set_cell(id, "Remark", "unmeasured").unwrap();
    assert_eq!(table.row(id).unwrap().state(), RowState::Modified);
    assert_eq!(table.cell_diff(id, "Thickness"), Ok(CellDiff::Unchanged));
}

#[test]
fn added_rows_report_no_cell_diff() {
    let mut table = pipe_standards();
    let id = table.add_row(&Conventions::default());
    table.set_cell(id, "Standard", "EN 10216").unwrap();
    assert_eq!(table.row(id).unwrap().state(), RowState::Added);
    assert_eq!(table.cell_diff(id, "Standard"), Ok(CellDiff::Unchanged));
}

#[test]
fn delete_twice_fails() {
    let mut table = pipe_standards();
    let id = row_id(&table, 2);
    table.delete_row(id).unwrap();
    assert_eq!(table.row(id).unwrap().state(), RowState::Deleted);
    assert_eq!(table.delete_row(id), Err(ModelError::AlreadyDeleted(id)));
    assert_eq!(
        table.set_cell(id, "Standard", "X"),
        Err(ModelError::RowDeleted(id))
    );
    assert_eq!(table.active_len(), 3);
}

#[test]
fn duplicate_inserts_after_source_with_reset_fields() {
    let mut table = pipe_standards();
    let conventions = Conventions::default();
    let source = row_id(&table, 1);
    table.set_cell(source, "Status", "Disabled").unwrap();

    let copy = table.duplicate_row(source, &conventions).unwrap();
    assert_eq!(table.position(copy), Some(2));
    assert_eq!(table.value(copy, "ID"), Ok(&CellValue::Null));
    assert_eq!(table.value(copy, "Standard"), Ok(&CellValue::from("ASTM A106")));
    assert_eq!(table.value(copy, "Status"), Ok(&CellValue::from("Enabled")));
    assert_eq!(table.row(copy).unwrap().state(), RowState::Added);
}

#[test]
fn duplicate_of_last_row_appends() {
    let mut table = pipe_standards();
    let last = row_id(&table, 3);
    let copy = table.duplicate_row(last, &Conventions::default()).unwrap();
    assert_eq!(table.position(copy), Some(4));
}

#[test]
fn pending_counts_match_commit_and_tracking_is_cleared() {
    let mut table = pipe_standards();
    let conventions = Conventions::default();
    let modified = row_id(&table, 0);
    let deleted = row_id(&table, 1);
    table.set_cell(modified, "Standard", "API 5L PSL1").unwrap();
    table.delete_row(deleted).unwrap();
    table.delete_row(row_id(&table, 2)).unwrap();
    table.add_row(&conventions);
    assert_eq!(
        table.pending_counts(),
        CommitSummary {
            added: 1,
            modified: 1,
            deleted: 2
        }
    );

    let summary = table.commit();
    assert_eq!(summary.deleted, 2);
    assert_eq!(table.len(), 3);
    assert!(table.rows().iter().all(|row| row.state() == RowState::Unchanged
        && row.original_values().is_none()));
}

#[test]
fn commit_with_one_row_per_state() {
    let mut table = Table::new(
        "B1-Main Material",
        vec![
            Column::required("Material", ColumnType::Text).unwrap(),
            Column::required("Status", ColumnType::Text).unwrap(),
        ],
    )
    .unwrap();
    for material in ["CS", "SS", "LTCS"] {
        table
            .push_row(vec![material.into(), "Enabled".into()])
            .unwrap();
    }
    table.accept_loaded();
    let modified = row_id(&table, 0);
    let deleted = row_id(&table, 1);
    table.set_cell(modified, "Material", "LAS").unwrap();
    table.delete_row(deleted).unwrap();
    table.add_row(&Conventions::default());

    let summary = table.commit();
    assert_eq!(
        summary,
        CommitSummary {
            added: 1,
            modified: 1,
            deleted: 1
        }
    );
    assert_eq!(table.len(), 3);
    assert!(table.row(deleted).is_none());
    assert!(table.rows().iter().all(|row| row.state() == RowState::Unchanged));
}

#[test]
fn add_column_is_rejected_when_name_exists() {
    let mut table = pipe_standards();
    let before = table.columns().len();
    let result = table.add_column(Column::new("standard", ColumnType::Text).unwrap());
    assert_eq!(
        result,
        Err(ModelError::DuplicateColumnName("standard".to_string()))
    );
    assert_eq!(table.columns().len(), before);
}

#[test]
fn new_column_does_not_change_row_state() {
    let mut table = pipe_standards();
    let id = row_id(&table, 0);
    table.set_cell(id, "Standard", "API 5CT").unwrap();
    table
        .add_column(Column::new("Remark", ColumnType::Text).unwrap())
        .unwrap();
    assert_eq!(table.value(id, "Remark"), Ok(&CellValue::Null));
    assert_eq!(table.cell_diff(id, "Remark"), Ok(CellDiff::Unchanged));
    assert_eq!(table.row(row_id(&table, 1)).unwrap().state(), RowState::Unchanged);
}

#[test]
fn selection_is_not_tracked_as_a_change() {
    let mut table = pipe_standards();
    let conventions = Conventions::default();
    table
        .insert_column(
            0,
            Column::new("IsSelected", ColumnType::Boolean)
                .unwrap()
                .with_default(false),
        )
        .unwrap();
    let id = row_id(&table, 0);
    table.set_selected(id, &conventions, true).unwrap();
    assert_eq!(table.row(id).unwrap().state(), RowState::Unchanged);
    assert!(table.is_selected(table.row(id).unwrap(), &conventions));

    assert_eq!(table.set_all_selected(&conventions, true), 4);
    assert_eq!(table.delete_selected(&conventions), 4);
    assert_eq!(table.active_len(), 0);
}

#[test]
fn delete_selected_without_selection_column_is_a_no_op() {
    let mut table = pipe_standards();
    assert_eq!(table.delete_selected(&Conventions::default()), 0);
    assert_eq!(table.active_len(), 4);
}

#[test]
fn table_serializes_states() {
    let mut table = pipe_standards();
    let id = row_id(&table, 0);
    table.set_cell(id, "Standard", "API 5L B").unwrap();
    let json = serde_json::to_value(&table).unwrap();
    assert_eq!(json["rows"][0]["state"], "modified");
    assert_eq!(json["rows"][1]["state"], "unchanged");
}

proptest! {
    #[test]
    fn round_trip_edit_leaves_no_cell_diff(value in "[A-Z]{1,3}-[0-9]{1,4}") {
        let mut table = pipe_standards();
        let id = row_id(&table, 0);
        let original = table.value(id, "StandardCode").unwrap().clone();

        table.set_cell(id, "StandardCode", value.as_str()).unwrap();
        let changed = table.cell_diff(id, "StandardCode").unwrap();
        prop_assert_eq!(changed.is_changed(), CellValue::from(value.as_str()) != original);

        table.set_cell(id, "StandardCode", original).unwrap();
        prop_assert_eq!(table.cell_diff(id, "StandardCode").unwrap(), CellDiff::Unchanged);
    }
}
