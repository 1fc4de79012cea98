//! Integration tests for the vshare binary
//!
//! Full runs sleep for minutes, so only argument handling is exercised here.

use std::io::{BufRead, BufReader};
use std::process::{Command, Stdio};

/// Helper to run the vshare binary built for this test
fn vshare(args: &[&str]) -> std::process::Output {
    Command::new(env!("CARGO_BIN_EXE_vshare"))
        .args(args)
        .env_remove("ROLE")
        .env_remove("VSHARE_SHARED_FILE")
        .output()
        .expect("Failed to execute vshare")
}

#[test]
fn test_help_lists_flags() {
    let output = vshare(&["--help"]);
    let stdout = String::from_utf8_lossy(&output.stdout);

    assert!(output.status.success());
    assert!(stdout.contains("--role"));
    assert!(stdout.contains("--shared-file"));
}

#[test]
fn test_version() {
    let output = vshare(&["--version"]);
    let stdout = String::from_utf8_lossy(&output.stdout);

    assert!(output.status.success());
    assert!(stdout.contains("vshare"));
}

#[test]
fn test_invalid_shared_file_fails_before_running() {
    let output = vshare(&["--role", "reader", "--shared-file", "/"]);
    let stderr = String::from_utf8_lossy(&output.stderr);

    assert!(!output.status.success());
    assert!(stderr.contains("shared file path has no file name"));
    assert!(output.stdout.is_empty());
}

#[test]
fn test_invalid_env_shared_file_is_rejected() {
    let output = Command::new(env!("CARGO_BIN_EXE_vshare"))
        .env_remove("ROLE")
        .env("VSHARE_SHARED_FILE", "/")
        .output()
        .expect("Failed to execute vshare");
    let stderr = String::from_utf8_lossy(&output.stderr);

    assert!(!output.status.success());
    assert!(stderr.contains("shared file path has no file name"));
}

#[test]
fn test_shared_file_flag_overrides_invalid_env() {
    let temp = tempfile::tempdir().unwrap();
    let flag_path = temp.path().join("out.txt");

    let mut child = Command::new(env!("CARGO_BIN_EXE_vshare"))
        .args(["--role", "reader", "--shared-file"])
        .arg(&flag_path)
        .env("VSHARE_SHARED_FILE", "/")
        .stdout(Stdio::piped())
        .stderr(Stdio::null())
        .spawn()
        .expect("Failed to spawn vshare");

    // The reader announces its path before the first tick; stop it there
    let stdout = child.stdout.take().unwrap();
    let announced = BufReader::new(stdout)
        .lines()
        .map_while(Result::ok)
        .find(|line| line.starts_with("Will read from "));
    let _ = child.kill();
    let _ = child.wait();

    let announced = announced.expect("reader exited before announcing its path");
    assert!(announced.contains(&flag_path.display().to_string()));
}

#[test]
fn test_unknown_flag_is_rejected() {
    let output = vshare(&["--iterations", "3"]);
    assert!(!output.status.success());
}
