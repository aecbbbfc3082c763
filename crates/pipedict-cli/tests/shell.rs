//! Scripted shell sessions against the built-in catalog.

use std::io::Cursor;

use pipedict_cli::render::table_json;
use pipedict_cli::settings::DisplaySettings;
use pipedict_cli::shell::{Reply, Shell, ShellCommand};
use pipedict_model::{CellValue, Conventions};
use pipedict_session::EditorSession;
use pipedict_source::CatalogSource;

fn shell() -> Shell<CatalogSource> {
    let display = DisplaySettings {
        color: false,
        ..DisplaySettings::default()
    };
    Shell::new(EditorSession::default(), CatalogSource::new(), display)
}

async fn run_script(shell: &mut Shell<CatalogSource>, script: &str) -> (usize, String) {
    let mut output = Vec::new();
    let failures = shell
        .run(Cursor::new(script.to_string()), &mut output, false)
        .await
        .unwrap();
    (failures, String::from_utf8(output).unwrap())
}

#[tokio::test]
async fn edit_and_save_script() {
    let mut shell = shell();
    let script = "\
load B1-Main Material
set 1 MainMaterial \"CS-100\"
check 5
del --yes
add
set 5 MainMaterial CR-MO
set 5 MainMaterialCode M105
save
";
    let (failures, output) = run_script(&mut shell, script).await;
    assert_eq!(failures, 0, "{output}");
    assert!(output.contains("Loaded B1-Main Material: 5 rows."));
    assert!(output.contains("Deleted 1 rows."));
    assert!(output.contains("Saved. (added: 1, modified: 1, deleted: 1)"));

    let table = shell.session().table().unwrap();
    assert_eq!(table.active_len(), 5);
    assert!(!table.has_changes());
}

#[tokio::test]
async fn failures_are_reported_and_counted() {
    let mut shell = shell();
    let script = "\
add
load C1-Flange Standard
dup
add
save
bogus
quit
show
";
    let (failures, output) = run_script(&mut shell, script).await;
    assert_eq!(failures, 4, "{output}");
    assert!(output.contains("error: Select a node in the tree to load its data first."));
    assert!(output.contains("hint: Use 'select ROW' to pick a row."));
    assert!(output.contains("Save failed:\nRow 4 failed validation"));
    assert!(output.contains("unknown command 'bogus'"));
    // Nothing after quit runs.
    assert!(!output.contains("rows shown"));
}

#[tokio::test]
async fn disabled_rows_are_locked() {
    let mut shell = shell();
    let script = "\
load B3-Grade
set 2 Status Disabled
set 2 GradeCode TP347
set 2 Status Enabled
set 2 GradeCode TP347
";
    let (failures, output) = run_script(&mut shell, script).await;
    assert_eq!(failures, 1, "{output}");
    assert!(output.contains("only the Status column can be edited"));
    let table = shell.session().table().unwrap();
    let row = table.rows()[1].id();
    assert_eq!(table.value(row, "GradeCode").unwrap(), &CellValue::from("TP347"));
}

#[tokio::test]
async fn show_marks_rows() {
    let mut shell = shell();
    let script = "\
load C2-Flange Pressure Rating
search CL1
select 1
show
add
save
search
show
";
    let (failures, output) = run_script(&mut shell, script).await;
    assert_eq!(failures, 1, "{output}");
    assert!(output.contains("2 rows match."));
    assert!(output.contains(">1"));
    assert!(output.contains("PressureRating *"));
    assert!(output.contains("C2-Flange Pressure Rating: 2 of 6 rows shown"));
    assert!(output.contains("!7"));
    assert!(output.contains("row 7: row has required fields that are not filled in"));
}

#[tokio::test]
async fn bare_select_clears_the_selection() {
    let mut shell = shell();
    let script = "\
load B3-Grade
select 2
select
dup
";
    let (failures, output) = run_script(&mut shell, script).await;
    assert_eq!(failures, 1, "{output}");
    assert!(output.contains("Row 2 selected."));
    assert!(output.contains("Selection cleared."));
    assert!(output.contains("error: Select a row first."));
    assert_eq!(shell.session().selected_row(), None);
}

#[tokio::test]
async fn json_carries_highlight_classes() {
    let mut shell = shell();
    run_script(&mut shell, "load D-Wall Thickness Grade\nset 1 MainMaterial LTCS\nadd\n").await;

    let active = shell.session().active().unwrap();
    let value = table_json(active, &Conventions::default(), &DisplaySettings::default());
    let rows = value["rows"].as_array().unwrap();
    assert_eq!(rows.len(), 5);
    assert_eq!(rows[0]["state"], "modified");
    assert_eq!(rows[0]["highlight"], "update");
    assert_eq!(rows[0]["changed"][0], "MainMaterial");
    assert_eq!(rows[0]["values"]["MainMaterial"], "LTCS");
    assert_eq!(rows[4]["state"], "added");
    assert_eq!(rows[4]["highlight"], "insertion");
    assert_eq!(value["pending"]["modified"], 1);
}

#[tokio::test]
async fn quit_stops_the_shell() {
    let mut shell = shell();
    assert_eq!(shell.execute(ShellCommand::Quit).await, Reply::Quit);
}
