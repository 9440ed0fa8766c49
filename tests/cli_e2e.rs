//! End-to-end CLI tests for the addon-installer binary.

mod support;

use std::fs::File;
use std::path::Path;
use std::process::Stdio;
use std::time::Duration;

use assert_cmd::Command;
use assert_cmd::assert::OutputAssertExt;
use predicates::prelude::*;
use tempfile::TempDir;
use wiremock::MockServer;

use support::{addon_zip, mount_bytes, mount_delayed_bytes, mount_status};

fn installer_cmd() -> Command {
    let mut cmd = Command::cargo_bin("addon-installer").unwrap();
    cmd.env_remove("RUST_LOG");
    cmd
}

fn write_config(dir: &Path, json: &str) -> std::path::PathBuf {
    let path = dir.join("conf.json");
    std::fs::write(&path, json).unwrap();
    path
}

/// Test that --help displays usage information and exits with code 0.
#[test]
fn test_binary_help_displays_usage() {
    installer_cmd()
        .arg("--help")
        .assert()
        .success()
        .stdout(predicate::str::contains("Concurrently download"))
        .stdout(predicate::str::contains("--noop"))
        .stdout(predicate::str::contains("--conf"));
}

/// Test that --version displays version and exits with code 0.
#[test]
fn test_binary_version_displays_version() {
    installer_cmd()
        .arg("--version")
        .assert()
        .success()
        .stdout(predicate::str::contains("addon-installer"));
}

/// Test that invalid flags cause non-zero exit.
#[test]
fn test_binary_invalid_flag_returns_error() {
    installer_cmd()
        .arg("--invalid-flag")
        .assert()
        .failure()
        .stderr(predicate::str::contains("error"));
}

#[test]
fn test_binary_missing_config_fails_before_any_output() {
    let temp_dir = TempDir::new().unwrap();
    let missing = temp_dir.path().join("nope.json");

    installer_cmd()
        .arg("--conf")
        .arg(&missing)
        .assert()
        .failure()
        .stdout(predicate::str::is_empty())
        .stderr(predicate::str::contains("Failed to read config file"));
}

#[test]
fn test_binary_malformed_config_fails() {
    let temp_dir = TempDir::new().unwrap();
    let conf = write_config(temp_dir.path(), r#"{"addons": ["Bagnon""#);

    installer_cmd()
        .arg("-c")
        .arg(&conf)
        .assert()
        .failure()
        .stdout(predicate::str::is_empty())
        .stderr(predicate::str::contains("Failed to parse config file"));
}

#[test]
fn test_binary_duplicate_addon_in_config_fails() {
    let temp_dir = TempDir::new().unwrap();
    let conf = write_config(
        temp_dir.path(),
        r#"{"addons_path": "/tmp/addons", "addons": ["Bagnon", "Bagnon"]}"#,
    );

    installer_cmd()
        .arg("-c")
        .arg(&conf)
        .assert()
        .failure()
        .stderr(predicate::str::contains("listed more than once"));
}

#[test]
fn test_binary_empty_addon_list_prints_source_and_succeeds() {
    let temp_dir = TempDir::new().unwrap();
    let conf = write_config(
        temp_dir.path(),
        r#"{"addons_path": "/tmp/addons", "addons": []}"#,
    );

    installer_cmd()
        .arg("-c")
        .arg(&conf)
        .assert()
        .success()
        .stdout(predicate::str::starts_with(
            "From https://wow.curseforge.com/projects",
        ));
}

#[tokio::test(flavor = "multi_thread", worker_threads = 2)]
async fn test_binary_noop_run_against_mock_service_exits_zero() {
    let server = MockServer::start().await;
    mount_bytes(&server, "/projects/Bagnon/files/latest", addon_zip("Bagnon")).await;
    mount_status(&server, "/projects/Missing/files/latest", 404).await;

    let temp_dir = TempDir::new().unwrap();
    let target = temp_dir.path().join("AddOns");
    let base_url = format!("{}/projects", server.uri());
    let conf = write_config(
        temp_dir.path(),
        &format!(
            r#"{{"addons_path": "{}", "addons": ["Bagnon", "Missing"], "base_url": "{base_url}"}}"#,
            target.display()
        ),
    );

    let output = tokio::task::spawn_blocking(move || {
        installer_cmd()
            .arg("--noop")
            .arg("--conf")
            .arg(&conf)
            .output()
            .unwrap()
    })
    .await
    .unwrap();

    output
        .assert()
        .success()
        .stdout(predicate::str::contains(format!("From {base_url}")))
        .stdout(predicate::str::contains("Installing Bagnon ... done"))
        .stdout(predicate::str::contains("Installing Missing ... not found"));
    assert!(!target.exists(), "noop run must not create the target");
}

#[tokio::test(flavor = "multi_thread", worker_threads = 2)]
async fn test_binary_log_file_receives_item_failures() {
    let server = MockServer::start().await;
    mount_status(&server, "/projects/Missing/files/latest", 404).await;

    let temp_dir = TempDir::new().unwrap();
    let log_path = temp_dir.path().join("run.log");
    let conf = write_config(
        temp_dir.path(),
        &format!(
            r#"{{"addons_path": "{}", "addons": ["Missing"], "base_url": "{}/projects"}}"#,
            temp_dir.path().join("AddOns").display(),
            server.uri()
        ),
    );

    let log_arg = log_path.clone();
    let output = tokio::task::spawn_blocking(move || {
        installer_cmd()
            .arg("--conf")
            .arg(&conf)
            .arg("--log-file")
            .arg(&log_arg)
            .output()
            .unwrap()
    })
    .await
    .unwrap();

    output.assert().success().stderr(predicate::str::is_empty());
    let log = std::fs::read_to_string(&log_path).unwrap();
    assert!(log.contains("add-on not found"), "log was: {log}");
    assert!(log.contains("Missing"));
}

#[tokio::test(flavor = "multi_thread", worker_threads = 2)]
async fn test_binary_terminal_logs_wait_until_progress_lines_are_final() {
    // Setup: the 404 settles first, the two archives arrive later.
    let server = MockServer::start().await;
    let delay = Duration::from_millis(300);
    mount_delayed_bytes(&server, "/projects/A/files/latest", addon_zip("A"), delay).await;
    mount_status(&server, "/projects/Missing/files/latest", 404).await;
    mount_delayed_bytes(&server, "/projects/Z/files/latest", addon_zip("Z"), delay).await;

    let temp_dir = TempDir::new().unwrap();
    let conf = write_config(
        temp_dir.path(),
        &format!(
            r#"{{"addons_path": "{}", "addons": ["A", "Missing", "Z"], "base_url": "{}/projects"}}"#,
            temp_dir.path().join("AddOns").display(),
            server.uri()
        ),
    );

    // stdout and stderr share one file, as they share one terminal.
    let screen_path = temp_dir.path().join("screen.txt");
    let screen = File::create(&screen_path).unwrap();
    let screen_err = screen.try_clone().unwrap();

    // Execute
    let status = tokio::task::spawn_blocking(move || {
        std::process::Command::new(env!("CARGO_BIN_EXE_addon-installer"))
            .env_remove("RUST_LOG")
            .arg("--noop")
            .arg("--conf")
            .arg(&conf)
            .stdin(Stdio::null())
            .stdout(Stdio::from(screen))
            .stderr(Stdio::from(screen_err))
            .status()
            .unwrap()
    })
    .await
    .unwrap();

    // Verify
    assert!(status.success());
    let combined = std::fs::read_to_string(&screen_path).unwrap();
    assert!(combined.contains("Installing A ... done\r"), "screen: {combined:?}");
    assert!(combined.contains("Installing Z ... done\r"), "screen: {combined:?}");

    let last_redraw = combined.rfind("\r\x1b[").expect("progress redraws");
    let log_at = combined.find("add-on not found").expect("failure is logged");
    assert!(
        log_at > last_redraw,
        "log line was written while progress lines were live: {combined:?}"
    );
}
