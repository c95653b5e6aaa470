//! End-to-end tests for the `publisher` binary

use assert_cmd::Command;
use predicates::prelude::*;
use std::fs;
use std::os::unix::fs::PermissionsExt;
use std::path::PathBuf;
use tempfile::TempDir;

const MARKER: &str = "SDIST_PUBLISHER_CONTAINER";

fn publisher() -> Command {
    let mut cmd = Command::cargo_bin("publisher").unwrap();
    cmd.env_remove(MARKER);
    cmd
}

/// Stub engine script logging each subcommand it receives
fn create_stub_engine(dir: &TempDir, body: &str) -> PathBuf {
    let path = dir.path().join("engine");
    let log = dir.path().join("engine.log");
    let script = format!("#!/bin/sh\necho \"$1\" >> {}\n{}\n", log.display(), body);
    fs::write(&path, script).unwrap();
    fs::set_permissions(&path, fs::Permissions::from_mode(0o755)).unwrap();
    path
}

fn engine_calls(dir: &TempDir) -> Vec<String> {
    fs::read_to_string(dir.path().join("engine.log"))
        .unwrap_or_default()
        .lines()
        .map(str::to_string)
        .collect()
}

fn create_build_file(dir: &TempDir) -> PathBuf {
    let path = dir.path().join("Dockerfile.publish");
    fs::write(&path, "FROM scratch\n").unwrap();
    path
}

#[test]
fn help_lists_both_phases() {
    publisher()
        .arg("--help")
        .assert()
        .success()
        .stdout(predicate::str::contains("bootstrap"))
        .stdout(predicate::str::contains("publish"));
}

#[test]
fn publish_refuses_to_run_on_host() {
    publisher()
        .arg("publish")
        .assert()
        .failure()
        .stderr(predicate::str::contains("Refusing to package on the host"));
}

#[test]
fn bootstrap_refuses_to_run_inside_container() {
    let dir = TempDir::new().unwrap();
    let engine = create_stub_engine(&dir, "exit 0");
    let build_file = create_build_file(&dir);

    publisher()
        .env(MARKER, "1")
        .current_dir(dir.path())
        .args(["bootstrap", "--engine"])
        .arg(&engine)
        .arg("--build-file")
        .arg(&build_file)
        .assert()
        .failure()
        .stderr(predicate::str::contains(
            "Already inside the ephemeral build environment",
        ));

    assert!(engine_calls(&dir).is_empty());
}

#[test]
fn bootstrap_full_run_builds_runs_and_removes() {
    let dir = TempDir::new().unwrap();
    let engine = create_stub_engine(&dir, "exit 0");
    let build_file = create_build_file(&dir);

    publisher()
        .current_dir(dir.path())
        .args(["bootstrap", "--engine"])
        .arg(&engine)
        .arg("--build-file")
        .arg(&build_file)
        .assert()
        .success();

    assert_eq!(engine_calls(&dir), vec!["build", "run", "rmi"]);
}

#[test]
fn bootstrap_propagates_publish_failure_after_cleanup() {
    let dir = TempDir::new().unwrap();
    let engine = create_stub_engine(&dir, "[ \"$1\" = run ] && exit 5\nexit 0");
    let build_file = create_build_file(&dir);

    publisher()
        .current_dir(dir.path())
        .args(["bootstrap", "--engine"])
        .arg(&engine)
        .arg("--build-file")
        .arg(&build_file)
        .assert()
        .failure()
        .stderr(predicate::str::contains("exit code 5"));

    assert_eq!(engine_calls(&dir), vec!["build", "run", "rmi"]);
}

#[test]
fn bootstrap_fails_fast_on_image_build_failure() {
    let dir = TempDir::new().unwrap();
    let engine = create_stub_engine(&dir, "[ \"$1\" = build ] && exit 1\nexit 0");
    let build_file = create_build_file(&dir);

    publisher()
        .current_dir(dir.path())
        .args(["bootstrap", "--engine"])
        .arg(&engine)
        .arg("--build-file")
        .arg(&build_file)
        .assert()
        .failure()
        .stderr(predicate::str::contains("Environment construction error"));

    // No container started, nothing removed
    assert_eq!(engine_calls(&dir), vec!["build"]);
}

#[test]
fn bootstrap_reports_missing_engine() {
    let dir = TempDir::new().unwrap();
    create_build_file(&dir);

    publisher()
        .current_dir(dir.path())
        .args(["bootstrap", "--engine", "nonexistent_engine_12345"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("Container engine not available"));
}

#[test]
fn rejects_zero_timeout() {
    let dir = TempDir::new().unwrap();
    create_build_file(&dir);

    publisher()
        .current_dir(dir.path())
        .args(["bootstrap", "--timeout-secs", "0"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("Timeout must be at least"));
}
