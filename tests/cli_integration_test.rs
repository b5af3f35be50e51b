//! Runs the `stubmerge` binary against files in a temporary directory.

use assert_cmd::prelude::*;
use pretty_assertions::assert_eq;
use std::fs;
use std::path::Path;
use std::process::Command;
use tempfile::TempDir;

fn stubmerge() -> Command {
    Command::new(env!("CARGO_BIN_EXE_stubmerge"))
}

fn write_pair(dir: &Path, source: &str, stub: &str) {
    fs::write(dir.join("app.py"), source).unwrap();
    fs::write(dir.join("app.pyi"), stub).unwrap();
}

#[test]
fn test_merge_file_to_stdout() {
    let temp_dir = TempDir::new().unwrap();
    write_pair(
        temp_dir.path(),
        "def run(x, y=1) -> Any:\n    return x\n",
        "def run(x: str, y: int = ...) -> bool: ...\n",
    );

    let output = stubmerge()
        .current_dir(temp_dir.path())
        .args(["merge", "app.py", "app.pyi", "--report", "none"])
        .assert()
        .success()
        .get_output()
        .clone();

    assert_eq!(
        String::from_utf8(output.stdout).unwrap(),
        "def run(x: str, y: int = 1) -> bool:\n    return x\n"
    );
}

#[test]
fn test_json_report_goes_to_stderr_when_stdout_has_source() {
    let temp_dir = TempDir::new().unwrap();
    write_pair(temp_dir.path(), "def run(x): ...\n", "def run(x: int): ...\n");

    let output = stubmerge()
        .current_dir(temp_dir.path())
        .args(["merge", "app.py", "app.pyi", "--report", "json"])
        .assert()
        .success()
        .get_output()
        .clone();

    assert_eq!(
        String::from_utf8(output.stdout).unwrap(),
        "def run(x: int): ...\n"
    );
    let report: serde_json::Value = serde_json::from_slice(&output.stderr).unwrap();
    assert_eq!(report["files"][0]["changes"][0]["after"], "int");
}

#[test]
fn test_check_fails_when_annotations_would_change() {
    let temp_dir = TempDir::new().unwrap();
    write_pair(temp_dir.path(), "def run(x): ...\n", "def run(x: int): ...\n");

    stubmerge()
        .current_dir(temp_dir.path())
        .args(["merge", "app.py", "app.pyi", "--check"])
        .assert()
        .failure();

    assert_eq!(
        fs::read_to_string(temp_dir.path().join("app.py")).unwrap(),
        "def run(x): ...\n"
    );
}

#[test]
fn test_check_passes_after_in_place_merge() {
    let temp_dir = TempDir::new().unwrap();
    write_pair(temp_dir.path(), "def run(x): ...\n", "def run(x: int): ...\n");

    stubmerge()
        .current_dir(temp_dir.path())
        .args(["merge", "app.py", "app.pyi", "--in-place"])
        .assert()
        .success();

    stubmerge()
        .current_dir(temp_dir.path())
        .args(["merge", "app.py", "app.pyi", "--check"])
        .assert()
        .success();
}

#[test]
fn test_placeholder_flag_replaces_defaults() {
    let temp_dir = TempDir::new().unwrap();
    write_pair(
        temp_dir.path(),
        "def run(x: Unknown) -> int: ...\n",
        "def run(x: Any) -> Unknown: ...\n",
    );

    let output = stubmerge()
        .current_dir(temp_dir.path())
        .args([
            "merge",
            "app.py",
            "app.pyi",
            "--placeholder",
            "Unknown",
            "--report",
            "none",
        ])
        .assert()
        .success()
        .get_output()
        .clone();

    assert_eq!(
        String::from_utf8(output.stdout).unwrap(),
        "def run(x: Any) -> int: ...\n"
    );
}

#[test]
fn test_parse_error_is_reported() {
    let temp_dir = TempDir::new().unwrap();
    write_pair(temp_dir.path(), "def run(x:\n", "def run(x: int): ...\n");

    stubmerge()
        .current_dir(temp_dir.path())
        .args(["merge", "app.py", "app.pyi"])
        .assert()
        .failure();
}

#[test]
fn test_init_refuses_to_overwrite() {
    let temp_dir = TempDir::new().unwrap();

    stubmerge()
        .current_dir(temp_dir.path())
        .arg("init")
        .assert()
        .success();
    assert!(temp_dir.path().join(".stubmerge.toml").exists());

    stubmerge()
        .current_dir(temp_dir.path())
        .arg("init")
        .assert()
        .failure();

    stubmerge()
        .current_dir(temp_dir.path())
        .args(["init", "--force"])
        .assert()
        .success();
}
