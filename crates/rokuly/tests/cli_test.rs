//! Integration tests for the `rokuly` CLI binary.
//!
//! These tests validate argument parsing, help output, shell completions,
//! and error handling without a Roku on the network.
#![allow(clippy::unwrap_used)]

use assert_cmd::cargo::cargo_bin_cmd;
use predicates::prelude::*;

// ── Helpers ─────────────────────────────────────────────────────────

/// Build a [`Command`] for the `rokuly` binary with env isolation.
///
/// Clears all `ROKU_*` / `ROKULY_*` env vars and points config directories
/// at a nonexistent path so tests never touch the user's configuration.
fn rokuly_cmd() -> assert_cmd::Command {
    let mut cmd = cargo_bin_cmd!("rokuly");
    cmd.env("HOME", "/tmp/rokuly-cli-test-nonexistent")
        .env("XDG_CONFIG_HOME", "/tmp/rokuly-cli-test-nonexistent")
        .env("NO_COLOR", "1")
        .env_remove("ROKU_IP")
        .env_remove("ROKU_USER")
        .env_remove("ROKU_PW")
        .env_remove("ROKU_CHANNEL_ID")
        .env_remove("ROKU_APP_PATH")
        .env_remove("ROKU_TARGET_CHANNEL")
        .env_remove("ROKULY_PROFILE")
        .env_remove("ROKULY_OUTPUT")
        .env_remove("ROKULY_TIMEOUT")
        .env_remove("RUST_LOG");
    cmd
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
    let output = rokuly_cmd().output().unwrap();
    assert_eq!(output.status.code(), Some(2), "Expected exit code 2");
    let text = combined_output(&output);
    assert!(text.contains("Usage"), "Expected 'Usage' in output:\n{text}");
}

#[test]
fn test_help_flag() {
    rokuly_cmd().arg("--help").assert().success().stdout(
        predicate::str::contains("Roku")
            .and(predicate::str::contains("key"))
            .and(predicate::str::contains("screenshot"))
            .and(predicate::str::contains("ui")),
    );
}

#[test]
fn test_version_flag() {
    rokuly_cmd()
        .arg("--version")
        .assert()
        .success()
        .stdout(predicate::str::contains("rokuly"));
}

// ── Shell completions ───────────────────────────────────────────────

#[test]
fn test_completions_bash() {
    rokuly_cmd()
        .args(["completions", "bash"])
        .assert()
        .success()
        .stdout(predicate::str::is_empty().not());
}

#[test]
fn test_completions_zsh() {
    rokuly_cmd()
        .args(["completions", "zsh"])
        .assert()
        .success()
        .stdout(predicate::str::contains("#compdef"));
}

#[test]
fn test_completions_fish() {
    rokuly_cmd()
        .args(["completions", "fish"])
        .assert()
        .success()
        .stdout(predicate::str::is_empty().not());
}

// ── Local commands ──────────────────────────────────────────────────

#[test]
fn test_keys_lists_remote_buttons() {
    rokuly_cmd().arg("keys").assert().success().stdout(
        predicate::str::contains("Home")
            .and(predicate::str::contains("InstantReplay"))
            .and(predicate::str::contains("VolumeMute")),
    );
}

#[test]
fn test_keys_plain_one_per_line() {
    let output = rokuly_cmd().args(["keys", "-o", "plain"]).output().unwrap();
    assert!(output.status.success());
    let stdout = String::from_utf8_lossy(&output.stdout);
    assert_eq!(stdout.lines().count(), 21, "unexpected key list:\n{stdout}");
    assert_eq!(stdout.lines().next(), Some("Home"));
}

#[test]
fn test_keys_json() {
    rokuly_cmd()
        .args(["keys", "-o", "json-compact"])
        .assert()
        .success()
        .stdout(predicate::str::starts_with(r#"[{"name":"Home"}"#));
}

#[test]
fn test_config_show_without_file() {
    rokuly_cmd()
        .args(["config", "show"])
        .assert()
        .success()
        .stdout(predicate::str::contains("[defaults]").and(predicate::str::contains("timeout = 30")));
}

#[test]
fn test_config_path() {
    rokuly_cmd()
        .args(["config", "path"])
        .assert()
        .success()
        .stdout(predicate::str::contains("config.toml"));
}

#[test]
fn test_config_use_unknown_profile() {
    let output = rokuly_cmd()
        .args(["config", "use", "attic"])
        .output()
        .unwrap();
    assert_eq!(output.status.code(), Some(4));
    let text = combined_output(&output);
    assert!(text.contains("attic"), "Expected profile name in error:\n{text}");
}

// ── Error cases ─────────────────────────────────────────────────────

#[test]
fn test_invalid_subcommand() {
    let output = rokuly_cmd().arg("foobar").output().unwrap();
    assert!(!output.status.success(), "Expected failure for invalid subcommand");
    let text = combined_output(&output);
    assert!(
        text.contains("unrecognized") || text.contains("foobar"),
        "Expected error mentioning invalid subcommand:\n{text}"
    );
}

#[test]
fn test_invalid_output_format() {
    let output = rokuly_cmd()
        .args(["keys", "--output", "xml"])
        .output()
        .unwrap();
    assert_eq!(output.status.code(), Some(2));
}

#[test]
fn test_missing_host_is_usage_error() {
    let output = rokuly_cmd().args(["key", "press", "Home"]).output().unwrap();
    assert_eq!(output.status.code(), Some(2));
    let text = combined_output(&output);
    assert!(text.contains("ROKU_IP"), "Expected ROKU_IP hint:\n{text}");
}

#[test]
fn test_host_with_scheme_rejected() {
    let output = rokuly_cmd()
        .args(["--host", "http://192.0.2.1", "query", "apps"])
        .output()
        .unwrap();
    assert_eq!(output.status.code(), Some(2));
    let text = combined_output(&output);
    assert!(text.contains("host"), "Expected host validation error:\n{text}");
}

#[test]
fn test_invalid_selector_fails_before_request() {
    let output = rokuly_cmd()
        .args(["--host", "192.0.2.1", "ui", "find", "["])
        .output()
        .unwrap();
    assert_eq!(output.status.code(), Some(2));
    let text = combined_output(&output);
    assert!(text.contains("Invalid selector"), "Expected selector error:\n{text}");
}

#[test]
fn test_unknown_key_fails_before_request() {
    let output = rokuly_cmd()
        .args(["--host", "192.0.2.1", "key", "press", "Home", "Teleport"])
        .output()
        .unwrap();
    assert_eq!(output.status.code(), Some(2));
    let text = combined_output(&output);
    assert!(text.contains("Teleport"), "Expected unknown key in error:\n{text}");
}

#[test]
fn test_launch_needs_a_channel() {
    let output = rokuly_cmd()
        .args(["--host", "192.0.2.1", "launch"])
        .output()
        .unwrap();
    assert_eq!(output.status.code(), Some(2));
    let text = combined_output(&output);
    assert!(text.contains("target_channel"), "Expected channel hint:\n{text}");
}

#[test]
fn test_input_param_needs_equals() {
    let output = rokuly_cmd()
        .args(["--host", "192.0.2.1", "input", "--param", "start"])
        .output()
        .unwrap();
    assert_eq!(output.status.code(), Some(2));
    let text = combined_output(&output);
    assert!(text.contains("KEY=VALUE"), "Expected param format hint:\n{text}");
}

#[test]
fn test_wait_rejects_bad_duration() {
    rokuly_cmd()
        .args(["--host", "192.0.2.1", "ui", "wait", "Label", "--max-wait", "soon"])
        .assert()
        .failure()
        .code(2);
}
