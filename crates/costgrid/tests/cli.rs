use assert_cmd::Command;
use predicates::prelude::*;

const FIXTURE: &str = concat!(
    env!("CARGO_MANIFEST_DIR"),
    "/../costgrid-scenario/tests/fixtures/hr_hk_2025.yaml"
);

fn costgrid() -> Command {
    let mut cmd = Command::cargo_bin("costgrid").expect("binary should build");
    cmd.env_remove("RUST_LOG");
    cmd
}

#[test]
fn grid_prints_seeded_totals() {
    costgrid()
        .arg("grid")
        .assert()
        .success()
        .stdout(predicate::str::contains("154,500"))
        .stdout(predicate::str::contains("216.5k"))
        .stdout(predicate::str::contains("2,698,000"));
}

#[test]
fn grid_applies_driver_updates() {
    costgrid()
        .args(["grid", "--set", "headcount=20", "--set", "travel=high"])
        .assert()
        .success()
        .stdout(predicate::str::contains("257,500"))
        .stdout(predicate::str::contains("12,000"));
}

#[test]
fn locked_edit_is_reported_and_ignored() {
    costgrid()
        .args(["grid", "--edit", "c1:jan=1"])
        .assert()
        .success()
        .stdout(predicate::str::contains("154,500"))
        .stderr(predicate::str::contains("row is locked"));
}

#[test]
fn edit_to_unknown_item_warns_once() {
    let output = costgrid()
        .args(["grid", "--edit", "zz:jan=1"])
        .output()
        .unwrap();
    assert!(output.status.success());
    let stderr = String::from_utf8(output.stderr).unwrap();
    assert_eq!(stderr.matches("no such cost item").count(), 1);
    assert!(String::from_utf8(output.stdout).unwrap().contains("154,500"));
}

#[test]
fn grid_json_reflects_edits() {
    let output = costgrid()
        .args(["grid", "--edit", "c3:feb=1,000", "--format", "json"])
        .output()
        .unwrap();
    assert!(output.status.success());
    let value: serde_json::Value = serde_json::from_slice(&output.stdout).unwrap();
    let rows = value["grid"]["rows"].as_array().unwrap();
    let rental = rows.iter().find(|r| r["id"] == "c3").unwrap();
    assert_eq!(rental["values"][1].as_f64(), Some(1_000.0));
    assert_eq!(value["grid"]["grand_total"].as_f64(), Some(2_654_000.0));
    assert_eq!(value["drivers"]["headcount"].as_u64(), Some(12));
}

#[test]
fn malformed_driver_update_is_rejected() {
    costgrid()
        .args(["grid", "--set", "headcount=lots"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("headcount"));
}

#[test]
fn scenario_file_drives_the_grid() {
    costgrid()
        .args(["grid", "--scenario", FIXTURE])
        .assert()
        .success()
        .stdout(predicate::str::contains("195,938"));
}

#[test]
fn bridge_lists_steps() {
    costgrid()
        .arg("bridge")
        .assert()
        .success()
        .stdout(predicate::str::contains("2024 Actuals"))
        .stdout(predicate::str::contains("$-0.5M"));
}

#[test]
fn departments_csv_to_stdout() {
    let output = costgrid().arg("departments").output().unwrap();
    assert!(output.status.success());
    let text = String::from_utf8(output.stdout).unwrap();
    let lines: Vec<&str> = text.lines().collect();
    assert_eq!(lines.len(), 6);
    assert_eq!(
        lines[0],
        "\"Department\",\"Head\",\"Status\",\"Total Budget\",\"Last Year Actuals\",\"YoY Change (%)\""
    );
    assert_eq!(
        lines[1],
        "\"Human Resources\",\"Alice Wong\",\"Submitted\",2500000,2300000,8.7"
    );
}

#[test]
fn departments_csv_to_file() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("departments.csv");
    costgrid()
        .args(["departments", "--scenario", FIXTURE, "--out"])
        .arg(&path)
        .assert()
        .success()
        .stdout(predicate::str::is_empty());
    let text = std::fs::read_to_string(&path).unwrap();
    assert_eq!(text.lines().count(), 4);
    assert!(text.contains("\"Marketing\",\"Sarah Lee\",\"Review\",1800000,1900000,-5.3"));
}

#[test]
fn kpis_show_dashboard_figures() {
    costgrid()
        .args(["kpis", "--set", "inflation=5"])
        .assert()
        .success()
        .stdout(predicate::str::contains("$13.2M"))
        .stdout(predicate::str::contains("+3.00M (over budget"));
}

#[test]
fn lint_accepts_fixture() {
    costgrid()
        .args(["lint", FIXTURE])
        .assert()
        .success()
        .stdout(predicate::str::starts_with("ok"));
}

#[test]
fn lint_reports_issues_and_fails() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("bad.yaml");
    std::fs::write(
        &path,
        "spec: fio\nspec_version: \"0.1.0\"\nscenario:\n  id: x\n  name: Bad\n",
    )
    .unwrap();
    costgrid()
        .arg("lint")
        .arg(&path)
        .assert()
        .failure()
        .stdout(predicate::str::contains("spec: expected spec identifier"))
        .stdout(predicate::str::contains("scenario.id"))
        .stderr(predicate::str::contains("1 of 1 manifest(s) failed validation"));
}

#[test]
fn schema_is_json() {
    let output = costgrid().arg("schema").output().unwrap();
    assert!(output.status.success());
    let value: serde_json::Value = serde_json::from_slice(&output.stdout).unwrap();
    assert!(value["properties"]["cost_items"].is_object());
}
