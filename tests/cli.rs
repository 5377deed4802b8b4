#![cfg(unix)]
#![allow(deprecated)]
use assert_cmd::Command;
use predicates::prelude::*;
use tempfile::TempDir;

fn script_runner(dir: &TempDir, context: &str) -> Command {
    let mut cmd = Command::cargo_bin("script_runner").unwrap();
    cmd.current_dir(dir.path())
        .env_remove("SCRIPT_RUNNER_CONTEXT")
        .env_remove("SCRIPT_RUNNER_RUN_IMMEDIATELY")
        .env_remove("SCRIPT_RUNNER_BREAK_ON_ALL_ERRORS")
        .env_remove("SCRIPT_RUNNER_LOG_FILE")
        .args(["--context", context, "-d"])
        .arg(dir.path());
    cmd
}

#[test]
fn interactive_runs_the_command() {
    let dir = TempDir::new().unwrap();
    script_runner(&dir, "interactive")
        .args(["-c", "greet", "echo", "hi", "&&", "echo", "bye"])
        .assert()
        .success()
        .stdout(predicate::str::contains("# greet"))
        .stdout(predicate::str::contains("\x1b[0;34mhi\x1b[0m"))
        .stdout(predicate::str::contains("\x1b[0;34mbye\x1b[0m"))
        .stdout(predicate::str::contains("✔✔✔"));
}

#[test]
fn document_only_renders() {
    let dir = TempDir::new().unwrap();
    script_runner(&dir, "document")
        .args(["-c", "make a file", "touch", "made.txt"])
        .assert()
        .success()
        .stdout(predicate::str::starts_with("\n<!DOCTYPE html>"))
        .stdout(predicate::str::contains("tput setaf 33"))
        .stdout(predicate::str::contains("touch made.txt"))
        .stdout(predicate::str::contains("</html>"));
    assert!(!dir.path().join("made.txt").exists());
}

#[test]
fn document_with_run_executes() {
    let dir = TempDir::new().unwrap();
    script_runner(&dir, "document")
        .args(["--run", "touch", "made.txt"])
        .assert()
        .success()
        .stdout(predicate::str::contains("tput setaf").not());
    assert!(dir.path().join("made.txt").exists());
}

#[test]
fn failure_without_break_still_succeeds() {
    let dir = TempDir::new().unwrap();
    script_runner(&dir, "interactive")
        .args(["--error-message", "look at the build", "ls", "missing-file"])
        .assert()
        .success()
        .stdout(predicate::str::contains("\x1b[0;31m"))
        .stdout(predicate::str::contains("look at the build"));
}

#[test]
fn break_on_error_stops_with_status_one() {
    let dir = TempDir::new().unwrap();
    script_runner(&dir, "interactive")
        .args(["--break-on-error", "false"])
        .assert()
        .code(1)
        .stdout(predicate::str::ends_with("------ STOPPED -----"));
}

#[test]
fn missing_directory_is_fatal() {
    let dir = TempDir::new().unwrap();
    let mut cmd = Command::cargo_bin("script_runner").unwrap();
    cmd.current_dir(dir.path())
        .env_remove("SCRIPT_RUNNER_CONTEXT")
        .args(["--context", "interactive", "-d", "/nonexistent/for/sure", "echo", "hi"])
        .assert()
        .code(2)
        .stderr(predicate::str::contains("Could not find /nonexistent/for/sure"));
}

#[test]
fn quiet_still_shows_errors() {
    let dir = TempDir::new().unwrap();
    script_runner(&dir, "interactive")
        .args(["-q", "sh", "-c", "'echo nope; exit 4'"])
        .assert()
        .success()
        .stdout(predicate::str::contains("[0] => nope"))
        .stdout(predicate::str::contains("✔✔✔").not());
}

#[test]
fn log_file_gets_a_copy() {
    let dir = TempDir::new().unwrap();
    let log = dir.path().join("logs/run.log");
    script_runner(&dir, "interactive")
        .arg("--log-file")
        .arg(&log)
        .args(["-c", "note", "echo", "logged"])
        .assert()
        .success();

    let content = std::fs::read_to_string(&log).unwrap();
    assert!(content.contains("\n\n# note"));
    assert!(content.contains("\nlogged"));
    assert!(!content.contains("\x1b["));
}
