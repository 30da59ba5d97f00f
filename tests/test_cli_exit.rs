// ABOUTME: Exit codes and messages of the ckl binary when it never reaches the TUI
// This is also what the container's default command (`ckl` with no arguments) does

use std::process::{Command, Output};
use tempfile::TempDir;

fn run_ckl(workdir: &TempDir, args: &[&str]) -> Output {
    Command::new(env!("CARGO_BIN_EXE_ckl"))
        .current_dir(workdir.path())
        .args(args)
        .env("RUST_LOG", "error")
        .output()
        .unwrap()
}

#[test]
fn test_no_arguments_prints_usage_and_exits_2() {
    let workdir = TempDir::new().unwrap();
    let output = run_ckl(&workdir, &[]);

    assert_eq!(output.status.code(), Some(2));
    let stderr = String::from_utf8_lossy(&output.stderr);
    assert!(stderr.contains("Usage:"), "stderr was: {stderr}");
    assert!(stderr.contains("<PATH_TO_CHECKLIST>"), "stderr was: {stderr}");
}

#[test]
fn test_no_arguments_leaves_no_log_file() {
    let workdir = TempDir::new().unwrap();
    run_ckl(&workdir, &[]);

    assert!(!workdir.path().join("ckl.log").exists());
}

#[test]
fn test_missing_list_exits_1_without_terminal() {
    let workdir = TempDir::new().unwrap();
    let output = run_ckl(&workdir, &["lists/nope.ckl"]);

    assert_eq!(output.status.code(), Some(1));
    let stderr = String::from_utf8_lossy(&output.stderr);
    assert!(stderr.contains("Error:"), "stderr was: {stderr}");
    assert!(stderr.contains("lists/nope.ckl"), "stderr was: {stderr}");
}
