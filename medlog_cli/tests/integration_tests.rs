//! Integration tests for the medlog binary.
//!
//! These tests verify end-to-end behavior including:
//! - Snapshot loading from a data directory
//! - Report and day views (text and JSON)
//! - CSV export to file and stdout
//! - Configuration overrides

use assert_cmd::Command;
use predicates::prelude::*;
use std::fs;
use std::path::Path;
use tempfile::TempDir;

const PATIENTS: &str = r#"[
  {"id": 1, "name": "Alice", "age": 70},
  {"id": 2, "name": "Bob", "age": 64}
]"#;

const MEDICATIONS: &str = r#"[
  {"id": 10, "patientId": 1, "patientName": "Alice", "medicationName": "Aspirin",
   "dosage": "81mg", "scheduledTime": "08:00"},
  {"id": 11, "patientId": 1, "patientName": "Alice", "medicationName": "Metformin"},
  {"id": 12, "patientId": 2, "patientName": "Bob", "medicationName": "Aspirin",
   "startDate": "2024-06-01"}
]"#;

const LOGS: &str = r#"[
  {"id": 100, "medicationId": 10, "patientName": "Alice", "medicationName": "Aspirin",
   "status": "taken", "date": "2024-02-26", "actualTime": "08:01"},
  {"id": 101, "medicationId": 11, "patientName": "Alice", "medicationName": "Metformin",
   "status": "taken", "date": "2024-03-04"},
  {"id": 102, "medicationId": 10, "patientName": "Alice", "medicationName": "Aspirin",
   "status": "missed", "date": "2024-03-05", "notes": "He said \"ok\""},
  {"id": 103, "medicationId": 12, "patientName": "Bob", "medicationName": "Aspirin",
   "status": "taken", "date": "2024-03-05"}
]"#;

/// Helper to create a populated data directory
fn setup_test_dir() -> TempDir {
    let temp_dir = tempfile::tempdir().expect("Failed to create temp dir");
    let data = temp_dir.path().join("data");
    fs::create_dir_all(&data).unwrap();
    fs::write(data.join("patients.json"), PATIENTS).unwrap();
    fs::write(data.join("medications.json"), MEDICATIONS).unwrap();
    fs::write(data.join("logs.json"), LOGS).unwrap();
    temp_dir
}

/// Helper to get the CLI binary, isolated from the user's config
fn cli(temp_dir: &Path) -> Command {
    let mut cmd = Command::new(assert_cmd::cargo::cargo_bin!("medlog"));
    cmd.env("XDG_CONFIG_HOME", temp_dir.join("config"))
        .env_remove("RUST_LOG")
        .arg("--data-dir")
        .arg(temp_dir.join("data"));
    cmd
}

fn json_output(cmd: &mut Command) -> serde_json::Value {
    let output = cmd.output().expect("Failed to run medlog");
    assert!(output.status.success());
    serde_json::from_slice(&output.stdout).expect("Output is not JSON")
}

#[test]
fn test_cli_help() {
    let temp_dir = setup_test_dir();
    cli(temp_dir.path())
        .arg("--help")
        .assert()
        .success()
        .stdout(predicate::str::contains("Medication adherence reports"));
}

#[test]
fn test_default_command_prints_report() {
    let temp_dir = setup_test_dir();

    cli(temp_dir.path())
        .assert()
        .success()
        .stdout(predicate::str::contains("Patient Adherence"))
        .stdout(predicate::str::contains("Alice"))
        .stdout(predicate::str::contains("Medication Performance"))
        .stdout(predicate::str::contains("Weekly Adherence Trends"));
}

#[test]
fn test_report_json() {
    let temp_dir = setup_test_dir();

    let report = json_output(
        cli(temp_dir.path())
            .arg("report")
            .arg("--json")
            .arg("--today")
            .arg("2024-03-05"),
    );

    assert_eq!(report["generatedFor"], "2024-03-05");

    // Alice: 2 medications, 2 taken, 1 missed
    assert_eq!(report["patients"][0]["patient"], "Alice");
    assert_eq!(report["patients"][0]["totalMeds"], 2);
    assert_eq!(report["patients"][0]["taken"], 2);
    assert_eq!(report["patients"][0]["missed"], 1);
    assert_eq!(report["patients"][0]["adherenceRate"], 100);

    // Bob: 1 medication, 1 taken
    assert_eq!(report["patients"][1]["adherenceRate"], 100);

    // Aspirin is prescribed twice with two taken logs
    assert_eq!(report["medications"][0]["medication"], "Aspirin");
    assert_eq!(report["medications"][0]["prescribed"], 2);
    assert_eq!(report["medications"][0]["taken"], 2);
    assert_eq!(report["medications"][1]["medication"], "Metformin");

    // W9 and W10 in lexical order
    let weeks: Vec<_> = report["weeklyTrends"]
        .as_array()
        .unwrap()
        .iter()
        .map(|w| w["week"].as_str().unwrap().to_string())
        .collect();
    assert_eq!(weeks, vec!["2024-W10", "2024-W9"]);

    // Bob's medication only starts in June
    assert_eq!(report["today"]["medicationsToday"], 2);
    assert_eq!(report["today"]["completedToday"], 1);
    assert_eq!(report["today"]["missedToday"], 1);
}

#[test]
fn test_config_selects_chronological_weeks() {
    let temp_dir = setup_test_dir();
    let config_path = temp_dir.path().join("medlog.toml");
    fs::write(&config_path, "[report]\nweek_ordering = \"chronological\"\n").unwrap();

    let report = json_output(
        cli(temp_dir.path())
            .arg("--config")
            .arg(&config_path)
            .arg("report")
            .arg("--json")
            .arg("--today")
            .arg("2024-03-05"),
    );

    assert_eq!(report["weeklyTrends"][0]["week"], "2024-W9");
    assert_eq!(report["weeklyTrends"][1]["week"], "2024-W10");
}

#[test]
fn test_today_view() {
    let temp_dir = setup_test_dir();

    let view = json_output(
        cli(temp_dir.path())
            .arg("today")
            .arg("--today")
            .arg("2024-03-05")
            .arg("--json"),
    );

    assert_eq!(view["summary"]["adherenceRate"], 50);
    assert_eq!(view["recent"].as_array().unwrap().len(), 4);
    assert_eq!(view["upcoming"][0]["medication"], "Aspirin 81mg");
}

#[test]
fn test_export_to_file() {
    let temp_dir = setup_test_dir();
    let out = temp_dir.path().join("exports").join("medication-logs.csv");

    cli(temp_dir.path())
        .arg("export")
        .arg("--output")
        .arg(&out)
        .assert()
        .success()
        .stdout(predicate::str::contains("Exported 4 logs"));

    let csv = fs::read_to_string(&out).expect("Failed to read export");
    let lines: Vec<_> = csv.split("\r\n").collect();
    assert_eq!(lines.len(), 5);
    assert_eq!(
        lines[0],
        "id,patientName,medicationName,scheduledTime,actualTime,status,date,notes"
    );
    assert_eq!(
        lines[1],
        r#""100","Alice","Aspirin","","08:01","taken","2024-02-26","""#
    );
    assert!(lines[3].ends_with(r#""He said ""ok""""#));
    assert!(!csv.ends_with("\r\n"));
}

#[test]
fn test_export_to_stdout() {
    let temp_dir = setup_test_dir();

    cli(temp_dir.path())
        .arg("export")
        .arg("--stdout")
        .assert()
        .success()
        .stdout(predicate::str::starts_with("id,patientName,medicationName"))
        .stdout(predicate::str::contains(r#""103","Bob","Aspirin""#));
}

#[test]
fn test_export_output_conflicts_with_stdout() {
    let temp_dir = setup_test_dir();

    cli(temp_dir.path())
        .arg("export")
        .arg("--stdout")
        .arg("--output")
        .arg("x.csv")
        .assert()
        .failure();
}

#[test]
fn test_invalid_today_rejected() {
    let temp_dir = setup_test_dir();

    cli(temp_dir.path())
        .arg("report")
        .arg("--today")
        .arg("yesterday")
        .assert()
        .failure();
}
