// Drives the compiled binary against a throwaway database and config file,
// one process per request, the way a sideline laptop would use it.

use assert_cmd::Command;
use std::path::Path;
use tempfile::tempdir;

fn kicklog(dir: &Path) -> Command {
    let mut cmd = Command::cargo_bin("kicklog").unwrap();
    cmd.arg("--db")
        .arg(dir.join("sessions.db"))
        .arg("--config")
        .arg(dir.join("config.json"))
        .env_remove("RUST_LOG");
    cmd
}

fn stdout_of(cmd: &mut Command) -> String {
    let output = cmd.output().unwrap();
    assert!(output.status.success(), "command failed: {output:?}");
    String::from_utf8(output.stdout).unwrap()
}

#[test]
fn session_survives_between_invocations() {
    let dir = tempdir().unwrap();

    let started = stdout_of(kicklog(dir.path()).args(["start", "--date", "2026-10-19"]));
    assert_eq!(started.trim(), "Session started for 2026-10-19.");

    let saved = stdout_of(kicklog(dir.path()).args([
        "save",
        "field-goal",
        "--kicker",
        "Smith",
        "--yard-line",
        "-25",
        "--hash",
        "L",
        "--result",
        "Good",
        "--op-time",
        "1.30",
    ]));
    assert_eq!(saved.trim(), "Kick saved. #1 Field Goal 43");

    let saved = stdout_of(kicklog(dir.path()).args([
        "save",
        "kickoff",
        "--yard-line",
        "-35",
        "--result-yard-line",
        "20",
    ]));
    assert_eq!(saved.trim(), "Kick saved. #2 Kickoff 45");

    let listed = stdout_of(kicklog(dir.path()).arg("list"));
    assert_eq!(listed.lines().count(), 2);

    let updated =
        stdout_of(kicklog(dir.path()).args(["update", "1", "--set", "YardLine=30"]));
    assert_eq!(updated.trim(), "Kick updated. #1 Field Goal 48");

    let defaults = stdout_of(kicklog(dir.path()).arg("defaults"));
    assert!(defaults.lines().any(|l| l == "kicker=Smith"));
    assert!(defaults.lines().any(|l| l == "fg_yard_line=30"));
    assert!(!defaults.contains("fg_op_time"));

    let report = stdout_of(kicklog(dir.path()).args(["export", "--format", "csv"]));
    let lines: Vec<&str> = report.lines().collect();
    assert_eq!(lines[0], "Practice Results \u{2014} 2026-10-19");
    assert_eq!(lines[1], "Field Goal");
    assert_eq!(lines[3], "1,Smith,,,30,L,48,Good,1.30");
    assert_eq!(lines[4], "Kickoff");
}

#[test]
fn unknown_kick_id_fails() {
    let dir = tempdir().unwrap();
    kicklog(dir.path())
        .args(["show", "7"])
        .assert()
        .failure();
}

#[test]
fn empty_export_is_not_an_error() {
    let dir = tempdir().unwrap();
    stdout_of(kicklog(dir.path()).arg("start"));
    let out = stdout_of(kicklog(dir.path()).arg("export"));
    assert_eq!(out.trim(), "No data to export.");
}

#[test]
fn configured_report_dir_receives_export() {
    let dir = tempdir().unwrap();
    let reports = dir.path().join("reports");

    stdout_of(kicklog(dir.path()).args(["configure", "--report-format", "json", "--report-dir"]).arg(&reports));
    stdout_of(kicklog(dir.path()).args(["save", "punt", "--yard-line", "-40", "--landed-yard-line", "10"]));
    let out = stdout_of(kicklog(dir.path()).arg("export"));
    assert!(out.starts_with("Report written to"));

    let written = std::fs::read_to_string(reports.join("practice_results.json")).unwrap();
    let value: serde_json::Value = serde_json::from_str(&written).unwrap();
    assert_eq!(value["sections"][0]["heading"], "Punt");
    assert_eq!(value["sections"][0]["rows"][0][5], "50");
}

#[test]
fn end_discards_session() {
    let dir = tempdir().unwrap();
    stdout_of(kicklog(dir.path()).args(["save", "punt", "--kicker", "Brown"]));
    stdout_of(kicklog(dir.path()).arg("end"));
    assert_eq!(stdout_of(kicklog(dir.path()).arg("list")), "");
    assert_eq!(stdout_of(kicklog(dir.path()).arg("defaults")), "");
}
