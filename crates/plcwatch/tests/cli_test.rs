//! Integration tests for the `plcwatch` CLI binary.
//!
//! These tests validate argument parsing, help output, and error
//! handling — all without requiring a live powerline device.
#![allow(clippy::unwrap_used)]

use std::io::Write;

use assert_cmd::cargo::cargo_bin_cmd;
use predicates::prelude::*;

// ── Helpers ─────────────────────────────────────────────────────────

/// Build a [`Command`] for the `plcwatch` binary with env isolation.
///
/// Clears `PLCWATCH_*` env vars and points config directories at a
/// nonexistent path so tests never touch the user's real configuration.
fn plcwatch_cmd() -> assert_cmd::Command {
    let mut cmd = cargo_bin_cmd!("plcwatch");
    cmd.env("HOME", "/tmp/plcwatch-cli-test-nonexistent")
        .env("XDG_CONFIG_HOME", "/tmp/plcwatch-cli-test-nonexistent")
        .env("NO_COLOR", "1")
        .env_remove("PLCWATCH_CONFIG")
        .env_remove("PLCWATCH_DEFAULTS__POLL_INTERVAL")
        .env_remove("PLCWATCH_DEFAULTS__COOLDOWN")
        .env_remove("PLCWATCH_DEFAULTS__TIMEOUT");
    cmd
}

/// Write a config file into a temp dir and return the (dir, path) pair.
/// The dir must stay alive for the duration of the test.
fn temp_config(contents: &str) -> (tempfile::TempDir, std::path::PathBuf) {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("config.toml");
    let mut file = std::fs::File::create(&path).unwrap();
    file.write_all(contents.as_bytes()).unwrap();
    (dir, path)
}

/// Concatenate stdout + stderr from a command output for flexible matching.
fn combined_output(output: &std::process::Output) -> String {
    let stdout = String::from_utf8_lossy(&output.stdout);
    let stderr = String::from_utf8_lossy(&output.stderr);
    format!("{stdout}{stderr}")
}

// ── Basic invocation ────────────────────────────────────────────────

#[test]
fn test_no_args_shows_help() {
    let output = plcwatch_cmd().output().unwrap();
    assert_eq!(output.status.code(), Some(2), "Expected exit code 2");
    let text = combined_output(&output);
    assert!(text.contains("Usage"), "Expected 'Usage' in output:\n{text}");
}

#[test]
fn test_help_flag_lists_subcommands() {
    plcwatch_cmd().arg("--help").assert().success().stdout(
        predicate::str::contains("check")
            .and(predicate::str::contains("monitor"))
            .and(predicate::str::contains("restart")),
    );
}

#[test]
fn test_version_flag() {
    plcwatch_cmd()
        .arg("--version")
        .assert()
        .success()
        .stdout(predicate::str::contains("plcwatch"));
}

#[test]
fn test_invalid_subcommand() {
    let output = plcwatch_cmd().arg("foobar").output().unwrap();
    assert!(
        !output.status.success(),
        "Expected failure for invalid subcommand"
    );
    let text = combined_output(&output);
    assert!(
        text.contains("invalid") || text.contains("unrecognized") || text.contains("foobar"),
        "Expected error mentioning invalid subcommand:\n{text}"
    );
}

#[test]
fn test_invalid_output_format() {
    let output = plcwatch_cmd()
        .args(["--output", "xml", "check"])
        .output()
        .unwrap();
    assert!(
        !output.status.success(),
        "Expected failure for invalid output format"
    );
    let text = combined_output(&output);
    assert!(
        text.contains("invalid") || text.contains("possible values"),
        "Expected error about valid output formats:\n{text}"
    );
}

// ── Configuration errors ────────────────────────────────────────────

#[test]
fn test_check_without_config_exits_one() {
    let output = plcwatch_cmd().arg("check").output().unwrap();
    assert_eq!(output.status.code(), Some(1), "Expected exit code 1");
    let stderr = String::from_utf8_lossy(&output.stderr);
    assert!(
        stderr.contains("No devices"),
        "Expected 'No devices' on stderr:\n{stderr}"
    );
}

#[test]
fn test_check_with_empty_device_table_exits_one() {
    let (_dir, path) = temp_config("[defaults]\npoll_interval = 30\n");
    plcwatch_cmd()
        .args(["--config", path.to_str().unwrap(), "check"])
        .assert()
        .code(1)
        .stderr(predicate::str::contains("No devices"));
}

#[test]
fn test_monitor_without_config_exits_one() {
    plcwatch_cmd()
        .arg("monitor")
        .assert()
        .code(1)
        .stderr(predicate::str::contains("No devices"));
}

#[test]
fn test_device_without_password_names_the_host() {
    let (_dir, path) = temp_config("[devices.\"plc-attic\"]\n");
    plcwatch_cmd()
        .args(["--config", path.to_str().unwrap(), "check"])
        .assert()
        .code(1)
        .stderr(predicate::str::contains("plc-attic"));
}

// ── Restart command ─────────────────────────────────────────────────

#[test]
fn test_restart_unknown_host_exits_not_found() {
    // One configured device; restarting a different host fails before
    // any network traffic and lists what is configured.
    let (_dir, path) = temp_config(
        "[devices.\"192.168.1.10\"]\npassword = \"secret\"\n",
    );
    plcwatch_cmd()
        .args([
            "--config",
            path.to_str().unwrap(),
            "--yes",
            "restart",
            "192.168.1.99",
        ])
        .assert()
        .code(4)
        .stderr(
            predicate::str::contains("192.168.1.99")
                .and(predicate::str::contains("192.168.1.10")),
        );
}

#[test]
fn test_restart_requires_host_argument() {
    let output = plcwatch_cmd().arg("restart").output().unwrap();
    assert_eq!(output.status.code(), Some(2), "Expected usage error");
}

// ── Flag parsing ────────────────────────────────────────────────────

#[test]
fn test_monitor_flags_parse() {
    // Flags parse; failure is about configuration, not arguments.
    plcwatch_cmd()
        .args(["monitor", "--interval", "10", "--cooldown", "60"])
        .assert()
        .code(1)
        .stderr(predicate::str::contains("No devices"));
}

#[test]
fn test_monitor_alias() {
    plcwatch_cmd()
        .arg("mon")
        .assert()
        .code(1)
        .stderr(predicate::str::contains("No devices"));
}
