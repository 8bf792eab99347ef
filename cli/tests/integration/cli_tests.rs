//! Integration tests for argument parsing, exit codes, and error output.

#![allow(clippy::expect_used)]

use std::path::Path;

use assert_cmd::Command;
use predicates::prelude::*;
use tempfile::TempDir;

/// Binary under test with colours off and configuration pinned to `config`.
fn siteup(config: &Path) -> Command {
    let mut cmd = Command::new(assert_cmd::cargo::cargo_bin!("siteup"));
    cmd.env("NO_COLOR", "1");
    cmd.env("SITEUP_CONFIG", config);
    cmd.env_remove("SITEUP_LOG");
    cmd
}

/// Temp dir holding a config whose every host path points inside it.
fn sandbox() -> (TempDir, std::path::PathBuf) {
    let dir = tempfile::tempdir().expect("tempdir");
    let root = dir.path();
    let config = root.join("config.yaml");
    let yaml = format!(
        "serving_root: {}\nsites_available_dir: {}\nhosts_file: {}\n",
        root.join("www").display(),
        root.join("sites").display(),
        root.join("hosts").display(),
    );
    std::fs::write(&config, yaml).expect("write config");
    (dir, config)
}

// --- Help and version tests ---

#[test]
fn test_cli_no_args_shows_help_and_exits_two() {
    let (_dir, config) = sandbox();
    // clap with arg_required_else_help shows help on stderr and exits 2
    siteup(&config).assert().code(2).stderr(predicate::str::contains(
        "Install a web server and deploy a site onto it",
    ));
}

#[test]
fn test_cli_help_flag_shows_help() {
    let (_dir, config) = sandbox();
    siteup(&config)
        .arg("--help")
        .assert()
        .success()
        .stdout(predicate::str::contains("Usage:"))
        .stdout(predicate::str::contains("<SOURCE>"))
        .stdout(predicate::str::contains("--name"))
        .stdout(predicate::str::contains("--json"));
}

#[test]
fn test_cli_version_flag_shows_version() {
    let (_dir, config) = sandbox();
    siteup(&config)
        .arg("--version")
        .assert()
        .success()
        .stdout(predicate::str::contains("siteup 0.1.0"));
}

#[test]
fn test_cli_unknown_flag_is_usage_error() {
    let (_dir, config) = sandbox();
    siteup(&config)
        .args(["--frobnicate", "site"])
        .assert()
        .code(2)
        .stderr(predicate::str::contains("unexpected argument"));
}

// --- Fatal failures ---

#[test]
fn test_missing_source_fails_without_touching_serving_root() {
    let (dir, config) = sandbox();
    let missing = dir.path().join("does-not-exist");

    // Non-root runs stop at the privilege check, root runs at the source
    // check. Either way nothing is staged.
    siteup(&config)
        .arg(&missing)
        .assert()
        .code(1)
        .stderr(predicate::str::contains("Error:"));

    assert!(!dir.path().join("www").exists());
    assert!(!dir.path().join("hosts").exists());
}

#[test]
fn test_invalid_name_fails() {
    let (dir, config) = sandbox();
    let source = dir.path().join("site");
    std::fs::create_dir_all(&source).expect("mkdir");

    siteup(&config)
        .arg(&source)
        .args(["--name", "bad name"])
        .assert()
        .code(1);

    assert!(!dir.path().join("www").exists());
}

#[test]
fn test_malformed_config_is_reported() {
    let (dir, config) = sandbox();
    std::fs::write(&config, "listen_port: [not, a, port]\n").expect("write");

    siteup(&config)
        .arg(dir.path())
        .assert()
        .code(1)
        .stderr(predicate::str::contains("cannot parse"));
}

#[test]
fn test_explicit_config_flag_overrides_env() {
    let (dir, config) = sandbox();
    let broken = dir.path().join("broken.yaml");
    std::fs::write(&broken, "listen_port: nope\n").expect("write");

    siteup(&config)
        .arg("--config")
        .arg(&broken)
        .arg(dir.path())
        .assert()
        .code(1)
        .stderr(predicate::str::contains("broken.yaml"));
}

// --- JSON output ---

#[test]
fn test_json_error_is_machine_readable() {
    let (dir, config) = sandbox();
    let missing = dir.path().join("does-not-exist");

    let output = siteup(&config)
        .arg("--json")
        .arg(&missing)
        .output()
        .expect("run");

    assert_eq!(output.status.code(), Some(1));
    let value: serde_json::Value =
        serde_json::from_slice(&output.stdout).expect("stdout is JSON");
    assert_eq!(value["error"], true);
    let code = value["code"].as_str().expect("code");
    assert!(
        code == "INSUFFICIENT_PRIVILEGE" || code == "SOURCE_NOT_FOUND",
        "got: {code}"
    );
    assert!(value["state"].is_string());
}

#[test]
fn test_json_config_error_is_machine_readable() {
    let (dir, config) = sandbox();
    std::fs::write(&config, "listen_port: nope\n").expect("write");

    let output = siteup(&config)
        .arg("--json")
        .arg(dir.path())
        .output()
        .expect("run");

    assert_eq!(output.status.code(), Some(1));
    let value: serde_json::Value =
        serde_json::from_slice(&output.stdout).expect("stdout is JSON");
    assert_eq!(value["code"], "CONFIG_INVALID");
}
