//! Session command behaviour against the built-in catalog.

use std::future::Future;

use pipedict_model::{
    CellDiff, CellValue, CommitSummary, Conventions, ModelError, RowState, Table,
};
use pipedict_session::{CommandOutcome, EditorSession, LoadOutcome, SessionError};
use pipedict_source::{CatalogSource, DictionarySource, SourceError};
use pipedict_view::{EditRejected, SortDirection};

/// A store that is never reachable.
struct Offline;

impl DictionarySource for Offline {
    fn fetch_table(
        &self,
        node: &str,
    ) -> impl Future<Output = pipedict_source::Result<Table>> + Send {
        let node = node.to_string();
        async move {
            Err(SourceError::Unavailable {
                node,
                reason: "connection refused".to_string(),
            })
        }
    }
}

async fn session_with(node: &str) -> EditorSession {
    let mut session = EditorSession::default();
    let outcome = session
        .select_node(&CatalogSource::new(), node)
        .await
        .unwrap();
    assert!(matches!(outcome, LoadOutcome::Loaded { .. }));
    session
}

#[test]
fn commands_need_a_table() {
    let mut session = EditorSession::default();
    assert_eq!(session.add_row(), Err(SessionError::NoActiveTable));
    assert_eq!(
        session.add_column(Some("Remark")),
        Err(SessionError::NoActiveTable)
    );
    assert_eq!(session.delete_selected(true), Err(SessionError::NoActiveTable));
    assert_eq!(session.duplicate_row(), Err(SessionError::NoActiveTable));
    assert_eq!(session.save(), Err(SessionError::NoActiveTable));
    assert_eq!(session.edit(), Err(SessionError::NoActiveTable));
    assert!(
        SessionError::NoActiveTable
            .user_message()
            .contains("load its data first")
    );
}

#[tokio::test]
async fn duplicate_needs_a_selected_row() {
    let mut session = session_with("B3-Grade").await;
    assert_eq!(session.duplicate_row(), Err(SessionError::NoRowSelected));
    assert_eq!(
        session.row_at(9),
        Err(SessionError::RowOutOfRange {
            position: 9,
            visible: 3
        })
    );
    assert!(session.row_at(0).is_err());

    let row = session.row_at(2).unwrap();
    session.select_row(row).unwrap();
    let CommandOutcome::RowDuplicated { source, row: copy } = session.duplicate_row().unwrap()
    else {
        panic!("expected a duplicated row");
    };
    assert_eq!(source, row);
    let table = session.table().unwrap();
    assert_eq!(table.position(copy), Some(table.position(row).unwrap() + 1));
    assert_eq!(table.value(copy, "ID").unwrap(), &CellValue::Null);
    assert_eq!(
        table.value(copy, "GradeCode").unwrap(),
        &CellValue::from("TP304")
    );
}

#[tokio::test]
async fn edit_add_delete_and_save() {
    let mut session = session_with("B1-Main Material").await;

    let edited = session.row_at(2).unwrap();
    assert!(session.edit_cell_text(edited, "MainMaterial", "SS-316").unwrap());

    let doomed = session.row_at(3).unwrap();
    session.check_row(doomed, true).unwrap();
    assert_eq!(
        session.delete_selected(true).unwrap(),
        CommandOutcome::RowsDeleted { count: 1 }
    );

    let CommandOutcome::RowAdded { row: added } = session.add_row().unwrap() else {
        panic!("expected a new row");
    };
    session.edit_cell(added, "MainMaterial", "CR-MO").unwrap();
    session.edit_cell(added, "MainMaterialCode", "M105").unwrap();

    let table = session.table().unwrap();
    assert_eq!(table.row(edited).unwrap().state(), RowState::Modified);
    assert_eq!(table.row(doomed).unwrap().state(), RowState::Deleted);
    assert_eq!(table.row(added).unwrap().state(), RowState::Added);

    let outcome = session.save().unwrap();
    assert_eq!(
        outcome,
        CommandOutcome::Saved {
            summary: CommitSummary {
                added: 1,
                modified: 1,
                deleted: 1
            }
        }
    );
    assert_eq!(
        outcome.message(),
        "Saved. (added: 1, modified: 1, deleted: 1)"
    );
    let table = session.table().unwrap();
    assert_eq!(table.len(), 5);
    assert!(!table.has_changes());
}

#[tokio::test]
async fn save_is_blocked_by_missing_required_fields() {
    let mut session = session_with("C1-Flange Standard").await;
    session.add_row().unwrap();

    let error = session.save().unwrap_err();
    let SessionError::Validation(validation) = &error else {
        panic!("expected a validation error, got {error:?}");
    };
    assert_eq!(validation.position, 4);
    assert_eq!(validation.column, "FlangeStandard");
    assert!(error.user_message().starts_with("Save failed:\nRow 4"));
    assert!(error.suggestion().is_some());
    assert!(session.table().unwrap().has_changes());
}

#[tokio::test]
async fn disabled_rows_only_edit_status() {
    let mut session = session_with("C2-Flange Pressure Rating").await;
    let row = session.row_at(1).unwrap();
    session.edit_cell(row, "Status", "Disabled").unwrap();

    let error = session
        .edit_cell(row, "PressureRating", "CL200")
        .unwrap_err();
    assert!(matches!(
        error,
        SessionError::EditRejected(EditRejected::RowDisabled { .. })
    ));
    assert_eq!(session.begin_edit(row, "Status"), Ok(()));

    session.edit_cell(row, "Status", "Enabled").unwrap();
    assert_eq!(session.begin_edit(row, "PressureRating"), Ok(()));
}

#[tokio::test]
async fn disabled_rows_lock_their_checkbox() {
    let mut session = session_with("B3-Grade").await;
    let row = session.row_at(1).unwrap();
    session.edit_cell(row, "Status", "Disabled").unwrap();

    let rejected = |result: Result<(), SessionError>| {
        matches!(
            result,
            Err(SessionError::EditRejected(EditRejected::RowDisabled { .. }))
        )
    };
    assert!(rejected(session.begin_edit(row, "IsSelected")));
    assert!(rejected(session.check_row(row, true)));
    assert!(rejected(session.edit_cell(row, "IsSelected", true).map(|_| ())));

    let table = session.table().unwrap();
    assert!(!table.is_selected(table.row(row).unwrap(), session.conventions()));
    let enabled = session.row_at(2).unwrap();
    session.check_row(enabled, true).unwrap();
}

#[tokio::test]
async fn failed_load_keeps_table_unfiltered() {
    let mut session = session_with("B1-Main Material").await;
    session.set_search("CS");
    session.set_all_selected(true).unwrap();
    assert_eq!(session.active().unwrap().visible_rows().len(), 2);

    let error = session
        .select_node(&Offline, "B3-Grade")
        .await
        .unwrap_err();
    assert!(matches!(
        error,
        SessionError::Source(SourceError::Unavailable { .. })
    ));

    let active = session.active().unwrap();
    assert_eq!(active.node, "B1-Main Material");
    assert_eq!(session.search(), "");
    assert_eq!(active.view.filter(), None);
    assert_eq!(active.visible_rows().len(), 5);
    assert!(!session.all_selected());
    assert!(
        active
            .table
            .active_rows()
            .all(|row| !active.table.is_selected(row, session.conventions()))
    );
}

#[tokio::test]
async fn configured_status_column_drives_the_guard() {
    let conventions = Conventions {
        status_column: "State".to_string(),
        enabled_value: "Active".to_string(),
        ..Conventions::default()
    };
    let source = CatalogSource::new().with_conventions(conventions.clone());
    let mut session = EditorSession::new(conventions);
    session.select_node(&source, "B3-Grade").await.unwrap();

    let row = session.row_at(1).unwrap();
    session.edit_cell(row, "State", "Disabled").unwrap();
    assert!(matches!(
        session.edit_cell(row, "GradeCode", "Gr.C"),
        Err(SessionError::EditRejected(EditRejected::RowDisabled { .. }))
    ));

    let CommandOutcome::RowAdded { row: added } = session.add_row().unwrap() else {
        panic!("expected a new row");
    };
    assert_eq!(
        session.table().unwrap().value(added, "State").unwrap(),
        &CellValue::from("Active")
    );
}

#[tokio::test]
async fn add_column_cancels_and_rejects_duplicates() {
    let mut session = session_with("Standard Series").await;
    let before = session.table().unwrap().columns().len();

    assert_eq!(session.add_column(None), Ok(CommandOutcome::Cancelled));
    assert_eq!(session.add_column(Some("  ")), Ok(CommandOutcome::Cancelled));

    let error = session.add_column(Some("SeriesName")).unwrap_err();
    assert_eq!(
        error,
        SessionError::Model(ModelError::DuplicateColumnName("SeriesName".to_string()))
    );
    assert_eq!(error.user_message(), "Column 'SeriesName' already exists.");
    assert_eq!(session.table().unwrap().columns().len(), before);

    assert_eq!(
        session.add_column(Some("Remark")),
        Ok(CommandOutcome::ColumnAdded {
            name: "Remark".to_string()
        })
    );
    let table = session.table().unwrap();
    assert_eq!(table.columns().len(), before + 1);
    assert!(!table.has_changes());
}

#[tokio::test]
async fn unconfirmed_delete_is_cancelled() {
    let mut session = session_with("B3-Grade").await;
    session.set_all_selected(true).unwrap();
    assert!(session.all_selected());
    assert_eq!(session.delete_selected(false), Ok(CommandOutcome::Cancelled));
    assert_eq!(session.table().unwrap().active_len(), 3);

    assert_eq!(
        session.delete_selected(true),
        Ok(CommandOutcome::RowsDeleted { count: 3 })
    );
    assert!(!session.all_selected());
    assert_eq!(session.table().unwrap().active_len(), 0);
}

#[tokio::test]
async fn loading_resets_search_and_select_all() {
    let mut session = session_with("B1-Main Material").await;
    session.set_search("CS");
    session.set_all_selected(true).unwrap();
    // CS and LTCS
    assert_eq!(session.active().unwrap().visible_rows().len(), 2);

    session
        .select_node(&CatalogSource::new(), "B3-Grade")
        .await
        .unwrap();
    assert_eq!(session.search(), "");
    assert!(!session.all_selected());
    assert_eq!(session.active().unwrap().visible_rows().len(), 3);
    assert_eq!(session.selected_row(), None);
}

#[tokio::test]
async fn superseded_load_keeps_newer_table() {
    let source = CatalogSource::new();
    let mut session = EditorSession::default();

    let first = session.begin_load("B1-Main Material");
    let second = session.begin_load("D-Wall Thickness Grade");
    let newer = source.fetch_table(second.node()).await;
    let older = source.fetch_table(first.node()).await;

    assert_eq!(
        session.finish_load(&second, newer).unwrap(),
        LoadOutcome::Loaded {
            node: "D-Wall Thickness Grade".to_string(),
            rows: 4
        }
    );
    assert_eq!(
        session.finish_load(&first, older).unwrap(),
        LoadOutcome::Superseded {
            node: "B1-Main Material".to_string()
        }
    );
    assert_eq!(session.active().unwrap().node, "D-Wall Thickness Grade");
}

#[tokio::test]
async fn diff_and_sort() {
    let mut session = session_with("B3-Grade").await;
    let row = session.row_at(1).unwrap();
    session.edit_cell(row, "GradeCode", "Gr.C").unwrap();

    let diffs = session.row_diff(row).unwrap();
    let changed: Vec<_> = diffs
        .iter()
        .filter(|(_, diff)| diff.is_changed())
        .collect();
    assert_eq!(changed.len(), 1);
    assert_eq!(
        changed[0].1,
        CellDiff::Changed {
            original: "Gr.B".into(),
            current: "Gr.C".into()
        }
    );

    session.sort_by("GradeCode", SortDirection::Descending).unwrap();
    assert_eq!(session.row_at(1).unwrap(), session.table().unwrap().rows()[2].id());
    assert!(matches!(
        session.sort_by("Nope", SortDirection::Ascending),
        Err(SessionError::Model(ModelError::UnknownColumn(_)))
    ));
}

#[tokio::test]
async fn typed_edits_are_parsed() {
    let mut session = session_with("Bend Data").await;
    let row = session.row_at(1).unwrap();
    assert!(session.edit_cell_text(row, "BendAngle", "135").unwrap());
    assert_eq!(
        session.table().unwrap().value(row, "BendAngle").unwrap(),
        &CellValue::Integer(135)
    );
    assert!(matches!(
        session.edit_cell_text(row, "BendAngle", "steep"),
        Err(SessionError::InvalidValue { .. })
    ));
}

#[tokio::test]
async fn unknown_node_loads_notice() {
    let session = session_with("Interface Table").await;
    let table = session.table().unwrap();
    assert_eq!(table.columns().len(), 2);
    assert_eq!(table.len(), 1);
}
