//! Integration tests for CLI commands

use assert_cmd::{assert::OutputAssertExt, cargo::CommandCargoExt};
use predicates::prelude::*;
use std::process::Command;
use tempfile::TempDir;

#[test]
fn test_help_lists_commands() {
    let mut cmd = Command::cargo_bin("oia").unwrap();
    cmd.arg("--help");

    cmd.assert()
        .success()
        .stdout(predicate::str::contains("Admin console"))
        .stdout(predicate::str::contains("list"))
        .stdout(predicate::str::contains("search"))
        .stdout(predicate::str::contains("upload"));
}

#[test]
fn test_list_help_names_resources() {
    let mut cmd = Command::cargo_bin("oia").unwrap();
    cmd.arg("list").arg("--help");

    cmd.assert()
        .success()
        .stdout(predicate::str::contains("programs"))
        .stdout(predicate::str::contains("gallery"));
}

#[test]
fn test_create_with_missing_fields_fails_locally() {
    let tmp = TempDir::new().unwrap();

    let mut cmd = Command::cargo_bin("oia").unwrap();
    cmd.arg("--session-dir")
        .arg(tmp.path())
        // Dead endpoint: proves validation failed before any network call
        .arg("--base-url")
        .arg("http://127.0.0.1:1")
        .arg("create")
        .arg("programs")
        .arg("--set")
        .arg("title=Exchange MIT");

    cmd.assert()
        .failure()
        .stderr(predicate::str::contains("Application Link is required"))
        .stderr(predicate::str::contains("validation failed"));
}

#[test]
fn test_upload_rejects_file_and_url_together() {
    let tmp = TempDir::new().unwrap();

    let mut cmd = Command::cargo_bin("oia").unwrap();
    cmd.arg("--session-dir")
        .arg(tmp.path())
        .arg("--base-url")
        .arg("http://127.0.0.1:1")
        .arg("upload")
        .arg("--title")
        .arg("Campus")
        .arg("--file")
        .arg("photo.jpg")
        .arg("--url")
        .arg("https://cdn.example.edu/photo.jpg");

    cmd.assert()
        .failure()
        .stderr(predicate::str::contains("not both"));
}

#[test]
fn test_logout_clears_session() {
    let tmp = TempDir::new().unwrap();
    std::fs::write(tmp.path().join("session_token"), "stale-token").unwrap();

    let mut cmd = Command::cargo_bin("oia").unwrap();
    cmd.arg("--session-dir").arg(tmp.path()).arg("logout");

    cmd.assert()
        .success()
        .stdout(predicate::str::contains("Logged out"));
    assert!(!tmp.path().join("session_token").exists());
}

#[test]
fn test_unknown_resource_is_rejected() {
    let mut cmd = Command::cargo_bin("oia").unwrap();
    cmd.arg("list").arg("widgets");

    cmd.assert()
        .failure()
        .stderr(predicate::str::contains("unknown resource"));
}
