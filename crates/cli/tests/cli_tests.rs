//! CLI integration tests

use std::io::Write;
use std::process::{Command, Output};

fn datawatchdog(args: &[&str]) -> Output {
    Command::new(env!("CARGO_BIN_EXE_datawatchdog"))
        .args(args)
        .env_remove("WATCHDOG_WEBHOOK_URL")
        .env_remove("WATCHDOG_THRESHOLD")
        .env_remove("WATCHDOG_ALERT_CHANNEL")
        .env_remove("WATCHDOG_TIMEOUT_SECS")
        .env("NO_COLOR", "1")
        .output()
        .expect("Failed to execute command")
}

fn csv_file(contents: &str) -> tempfile::NamedTempFile {
    let mut file = tempfile::Builder::new().suffix(".csv").tempfile().unwrap();
    file.write_all(contents.as_bytes()).unwrap();
    file
}

/// Test that the CLI shows help
#[test]
fn test_cli_help() {
    let output = datawatchdog(&["--help"]);
    let stdout = String::from_utf8_lossy(&output.stdout);

    assert!(output.status.success(), "CLI help should succeed");
    assert!(stdout.contains("DataWatchdog"), "Should show app name");
    assert!(stdout.contains("check"), "Should show check command");
    assert!(stdout.contains("demo"), "Should show demo command");
}

/// Test that the CLI shows version
#[test]
fn test_cli_version() {
    let output = datawatchdog(&["--version"]);
    let stdout = String::from_utf8_lossy(&output.stdout);

    assert!(output.status.success(), "CLI version should succeed");
    assert!(stdout.contains("datawatchdog"), "Should show binary name");
}

/// Test check subcommand help
#[test]
fn test_check_help() {
    let output = datawatchdog(&["check", "--help"]);
    let stdout = String::from_utf8_lossy(&output.stdout);

    assert!(output.status.success(), "Check help should succeed");
    assert!(stdout.contains("--old"), "Should show old option");
    assert!(stdout.contains("--new"), "Should show new option");
    assert!(stdout.contains("--threshold"), "Should show threshold option");
    assert!(stdout.contains("--webhook-url"), "Should show webhook option");
}

/// Test the demo reports drift as JSON
#[test]
fn test_demo_json() {
    let output = datawatchdog(&["demo", "--format", "json"]);
    assert!(output.status.success(), "Demo should succeed");

    let value: serde_json::Value = serde_json::from_slice(&output.stdout).unwrap();
    assert_eq!(value["report"]["schema_changes"]["added"][0], "C");
    assert_eq!(value["report"]["columns"]["A"]["old_mean"], 2.0);
    assert!(value["report"]["columns"].get("B").is_none());
    assert_eq!(value["dispatch"]["status"], "skipped_no_target");
}

/// Test fail-on-drift exit code
#[test]
fn test_fail_on_drift_exit_code() {
    let output = datawatchdog(&["demo", "--fail-on-drift", "--no-alert"]);
    assert_eq!(output.status.code(), Some(2));
}

/// Test comparing identical CSV files
#[test]
fn test_check_identical_files() {
    let old = csv_file("price,qty,label\n1.5,3,a\n2.5,4,b\n");
    let new = csv_file("price,qty,label\n1.5,3,a\n2.5,4,b\n");

    let output = datawatchdog(&[
        "check",
        "--old",
        old.path().to_str().unwrap(),
        "--new",
        new.path().to_str().unwrap(),
        "--fail-on-drift",
    ]);
    let stdout = String::from_utf8_lossy(&output.stdout);

    assert!(output.status.success(), "Identical files should not drift");
    assert!(stdout.contains("No drift detected"));
}

/// Test comparing CSV files with a removed column
#[test]
fn test_check_removed_column() {
    let old = csv_file("a,b\n1,2\n");
    let new = csv_file("a\n1\n");

    let output = datawatchdog(&[
        "check",
        "--old",
        old.path().to_str().unwrap(),
        "--new",
        new.path().to_str().unwrap(),
        "--format",
        "json",
    ]);
    assert!(output.status.success());

    let value: serde_json::Value = serde_json::from_slice(&output.stdout).unwrap();
    assert_eq!(value["report"]["schema_changes"]["removed"][0], "b");
}

/// Test that an unreachable webhook does not fail the check
#[test]
fn test_unreachable_webhook_reported() {
    let output = datawatchdog(&[
        "demo",
        "--format",
        "json",
        "--webhook-url",
        "http://127.0.0.1:1/hook",
    ]);
    assert!(output.status.success(), "Dispatch failure must not fail the run");

    let value: serde_json::Value = serde_json::from_slice(&output.stdout).unwrap();
    assert_eq!(value["dispatch"]["status"], "failed");
}

/// Test that an invalid webhook URL is rejected
#[test]
fn test_invalid_webhook_url() {
    let output = datawatchdog(&["demo", "--webhook-url", "not a url"]);
    assert!(!output.status.success());
}

/// Test configuration file loading
#[test]
fn test_config_file_threshold() {
    let mut config = tempfile::Builder::new().suffix(".toml").tempfile().unwrap();
    writeln!(config, "threshold = 1000000000000.0").unwrap();

    let output = datawatchdog(&[
        "demo",
        "--config",
        config.path().to_str().unwrap(),
        "--format",
        "json",
        "--no-alert",
    ]);
    assert!(output.status.success());

    let value: serde_json::Value = serde_json::from_slice(&output.stdout).unwrap();
    assert!(value["report"].get("columns").is_none());
    assert_eq!(value["report"]["schema_changes"]["added"][0], "C");
}
