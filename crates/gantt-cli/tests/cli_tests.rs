use std::path::Path;

use assert_cmd::Command;
use predicates::prelude::*;
use tempfile::TempDir;

/// Helper function to create a temporary directory for CLI tests
fn create_cli_test_environment() -> TempDir {
    TempDir::new().expect("Failed to create temporary directory")
}

/// Helper function to create a Command with --no-color flag for testing
fn gantt_cmd() -> Command {
    let mut cmd = Command::cargo_bin("gantt").expect("Failed to find gantt binary");
    cmd.arg("--no-color");
    cmd
}

/// Runs a command against `db_path` and asserts success.
fn run_ok(db_path: &Path, args: &[&str]) -> assert_cmd::assert::Assert {
    gantt_cmd()
        .args(["--database-file", db_path.to_str().unwrap()])
        .args(args)
        .assert()
        .success()
}

/// Loads the demo dataset into a fresh database.
fn create_demo_database() -> (TempDir, std::path::PathBuf) {
    let temp_dir = create_cli_test_environment();
    let db_path = temp_dir.path().join("cli_test.db");
    run_ok(&db_path, &["demo"]);
    (temp_dir, db_path)
}

#[test]
fn test_cli_show_empty_chart() {
    let temp_dir = create_cli_test_environment();
    let db_path = temp_dir.path().join("cli_test.db");

    run_ok(&db_path, &[]).stdout(predicate::str::contains("No steps in chart."));
    run_ok(&db_path, &["show"]).stdout(predicate::str::contains("No steps in chart."));
}

#[test]
fn test_cli_demo_shows_roots_only() {
    let temp_dir = create_cli_test_environment();
    let db_path = temp_dir.path().join("cli_test.db");

    run_ok(&db_path, &["demo"])
        .stdout(predicate::str::contains("Loaded demo dataset with 26 steps."))
        .stdout(predicate::str::contains("▸ Base-Step-1"))
        .stdout(predicate::str::contains("▸ Base-Step-2"))
        .stdout(predicate::str::contains("2 of 26 steps visible"));

    run_ok(&db_path, &["show"])
        .stdout(predicate::str::contains("Base-Step-1"))
        .stdout(predicate::str::contains("Base-Step-1-1").not());
}

#[test]
fn test_cli_demo_replaces_unless_kept() {
    let (_temp_dir, db_path) = create_demo_database();

    run_ok(&db_path, &["demo"]).stdout(predicate::str::contains("2 of 26 steps visible"));
    run_ok(&db_path, &["demo", "--keep"])
        .stdout(predicate::str::contains("4 of 52 steps visible"));
}

#[test]
fn test_cli_expand_and_collapse_by_row() {
    let (_temp_dir, db_path) = create_demo_database();

    run_ok(&db_path, &["expand", "@0"])
        .stdout(predicate::str::contains("- Expanded **Base-Step-1**"))
        .stdout(predicate::str::contains("▾ Base-Step-1"))
        .stdout(predicate::str::contains("· ▸ Base-Step-1-1"))
        .stdout(predicate::str::contains("5 of 26 steps visible"));

    // Expand state survives between invocations.
    run_ok(&db_path, &["expand", "@1"])
        .stdout(predicate::str::contains("· · ").and(predicate::str::contains("Base-Step-1-1-3")))
        .stdout(predicate::str::contains("8 of 26 steps visible"));

    run_ok(&db_path, &["collapse", "@0"])
        .stdout(predicate::str::contains("- Collapsed **Base-Step-1**"))
        .stdout(predicate::str::contains("2 of 26 steps visible"));

    // Collapsing cleared the nested expand state.
    run_ok(&db_path, &["expand", "@0"]).stdout(predicate::str::contains("5 of 26 steps visible"));
}

#[test]
fn test_cli_toggle() {
    let (_temp_dir, db_path) = create_demo_database();

    run_ok(&db_path, &["toggle", "@1"])
        .stdout(predicate::str::contains("- Expanded **Base-Step-2**"));
    run_ok(&db_path, &["toggle", "@1"])
        .stdout(predicate::str::contains("- Collapsed **Base-Step-2**"));
}

#[test]
fn test_cli_expand_errors() {
    let (_temp_dir, db_path) = create_demo_database();

    gantt_cmd()
        .args(["--database-file", db_path.to_str().unwrap(), "expand", "@9"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("Index 9 is out of range for 2 visible rows"));

    gantt_cmd()
        .args(["--database-file", db_path.to_str().unwrap(), "expand", "zzz"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("Step with ID zzz not found"));
}

#[test]
fn test_cli_tree_ignores_expand_state() {
    let (_temp_dir, db_path) = create_demo_database();

    run_ok(&db_path, &["tree"])
        .stdout(predicate::str::contains("- Base-Step-1 ("))
        .stdout(predicate::str::contains("  - Base-Step-1-2 ("))
        .stdout(predicate::str::contains("    - Base-Step-2-3-3 ("));
}

#[test]
fn test_cli_step_add_and_show() {
    let temp_dir = create_cli_test_environment();
    let db_path = temp_dir.path().join("cli_test.db");

    run_ok(
        &db_path,
        &[
            "step",
            "add",
            "Kickoff",
            "--start",
            "2024-01-01T00:00:00Z",
            "--end",
            "2024-01-04T00:00:00Z",
            "--color",
            "#336699",
        ],
    )
    .stdout(predicate::str::contains("Created step with ID:"))
    .stdout(predicate::str::contains("### Kickoff"))
    .stdout(predicate::str::contains("- Duration: 3d"))
    .stdout(predicate::str::contains("- Color: #336699"))
    .stdout(predicate::str::contains("- Visible rows changed"));

    run_ok(&db_path, &["step", "show", "@0"])
        .stdout(predicate::str::contains("### Kickoff"))
        .stdout(predicate::str::contains("- Color: #336699"));
}

#[test]
fn test_cli_step_add_child_under_collapsed_parent() {
    let temp_dir = create_cli_test_environment();
    let db_path = temp_dir.path().join("cli_test.db");
    run_ok(&db_path, &["step", "add", "Design", "--start", "2024-01-01"]);

    run_ok(&db_path, &["step", "add", "Sketches", "--parent", "@0"])
        .stdout(predicate::str::contains("- Updated **Design**"))
        .stdout(predicate::str::contains("▸ Design"))
        .stdout(predicate::str::contains("1 of 2 steps visible"));

    run_ok(&db_path, &["expand", "@0"]).stdout(predicate::str::contains("· "));
}

#[test]
fn test_cli_step_add_rejects_inverted_span() {
    let temp_dir = create_cli_test_environment();
    let db_path = temp_dir.path().join("cli_test.db");

    gantt_cmd()
        .args([
            "--database-file",
            db_path.to_str().unwrap(),
            "step",
            "add",
            "Backwards",
            "--start",
            "2024-01-05T00:00:00Z",
            "--end",
            "2024-01-01T00:00:00Z",
        ])
        .assert()
        .failure()
        .stderr(predicate::str::contains("Invalid operation"));
}

#[test]
fn test_cli_step_remove_follows_policy() {
    let (_temp_dir, db_path) = create_demo_database();
    run_ok(&db_path, &["expand", "@0"]);

    run_ok(&db_path, &["config", "set", "--removal-policy", "subtree"])
        .stdout(predicate::str::contains("Changed settings: removal_policy"))
        .stdout(predicate::str::contains("- **removal_policy**: detach_subtree"));

    run_ok(&db_path, &["step", "remove", "@0"])
        .stdout(predicate::str::contains("Removed step 'Base-Step-1'"))
        .stdout(predicate::str::contains("Also removed 12 descendant steps:"))
        .stdout(predicate::str::contains("1 of 13 steps visible"));
}

#[test]
fn test_cli_step_move() {
    let (_temp_dir, db_path) = create_demo_database();

    run_ok(&db_path, &["step", "move", "@1", "0"])
        .stdout(predicate::str::contains("- Visible rows changed"));
    run_ok(&db_path, &["step", "show", "@0"]).stdout(predicate::str::contains("### Base-Step-2"));

    gantt_cmd()
        .args([
            "--database-file",
            db_path.to_str().unwrap(),
            "step",
            "move",
            "@0",
            "2",
        ])
        .assert()
        .failure()
        .stderr(predicate::str::contains("out of range"));
}

#[test]
fn test_cli_gesture_settings_gate_changes() {
    let (_temp_dir, db_path) = create_demo_database();
    run_ok(&db_path, &["config", "set", "--resizable-steps", "false"]);

    gantt_cmd()
        .args([
            "--database-file",
            db_path.to_str().unwrap(),
            "step",
            "resize",
            "@0",
            "--end",
            "2030-01-01T00:00:00Z",
        ])
        .assert()
        .failure()
        .stderr(predicate::str::contains("Invalid operation"));

    run_ok(&db_path, &["step", "reschedule", "@0", "2030-01-01T00:00:00Z"])
        .stdout(predicate::str::contains("- Updated **Base-Step-1**"))
        .stdout(predicate::str::contains("- Duration: 9d"));
}

#[test]
fn test_cli_step_reparent_and_detach() {
    let (_temp_dir, db_path) = create_demo_database();
    run_ok(&db_path, &["expand", "@0"]);

    run_ok(&db_path, &["step", "reparent", "@4", "@0"])
        .stdout(predicate::str::contains("▾ Base-Step-1"))
        .stdout(predicate::str::contains("· ▸ Base-Step-2"))
        .stdout(predicate::str::contains("5 of 26 steps visible"));

    run_ok(&db_path, &["step", "detach", "@4"])
        .stdout(predicate::str::contains("▸ Base-Step-2"))
        .stdout(predicate::str::contains("5 of 26 steps visible"));
}

#[test]
fn test_cli_step_predecessor_and_update() {
    let (_temp_dir, db_path) = create_demo_database();

    run_ok(&db_path, &["step", "predecessor", "@1"])
        .stdout(predicate::str::contains("Predecessor cleared"));

    run_ok(
        &db_path,
        &["step", "update", "@1", "--caption", "Launch", "--color", "#ff8800"],
    )
    .stdout(predicate::str::contains("Caption set to 'Launch'"))
    .stdout(predicate::str::contains("Color set to #ff8800"))
    .stdout(predicate::str::contains("▸ Launch"));

    gantt_cmd()
        .args(["--database-file", db_path.to_str().unwrap(), "step", "update", "@1"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("nothing to change"));
}

#[test]
fn test_cli_config_show_defaults() {
    let temp_dir = create_cli_test_environment();
    let db_path = temp_dir.path().join("cli_test.db");

    run_ok(&db_path, &["config", "show"])
        .stdout(predicate::str::contains("## Chart settings"))
        .stdout(predicate::str::contains("- **removal_policy**: detach_node"))
        .stdout(predicate::str::contains("- **movable_steps**: enabled"));
}

#[test]
fn test_cli_export_json() {
    let (_temp_dir, db_path) = create_demo_database();
    run_ok(&db_path, &["expand", "@0"]);

    let output = gantt_cmd()
        .args(["--database-file", db_path.to_str().unwrap(), "export"])
        .output()
        .expect("Failed to run export");
    assert!(output.status.success());

    let json: serde_json::Value =
        serde_json::from_slice(&output.stdout).expect("export should print JSON");
    assert_eq!(json["steps"].as_array().map(Vec::len), Some(26));
    assert_eq!(json["visible_rows"].as_array().map(Vec::len), Some(5));
    assert_eq!(json["expanded"].as_array().map(Vec::len), Some(1));
    assert_eq!(json["config"]["removal_policy"], "detach_node");
}

#[test]
fn test_cli_invalid_date() {
    let temp_dir = create_cli_test_environment();
    let db_path = temp_dir.path().join("cli_test.db");

    gantt_cmd()
        .args([
            "--database-file",
            db_path.to_str().unwrap(),
            "step",
            "add",
            "Later",
            "--start",
            "next week",
        ])
        .assert()
        .failure()
        .stderr(predicate::str::contains("is not a timestamp, date time or date"));
}
