//! Integration tests for the CLI
//!
//! Drives the real binary for the fix and check commands against
//! throwaway files.

use std::fs;
use std::path::PathBuf;
use std::process::Command;
use tempfile::TempDir;

/// Helper to create a target file with duplicate error codes
fn setup_target(content: &str) -> (TempDir, PathBuf) {
    let dir = TempDir::new().unwrap();
    let file = dir.path().join("errors.rs");
    fs::write(&file, content).unwrap();
    (dir, file)
}

fn run(args: &[&str]) -> std::process::Output {
    Command::new("cargo")
        .args(["run", "--quiet", "--"])
        .args(args)
        .output()
        .unwrap()
}

#[test]
fn test_fix_help() {
    let output = run(&["fix", "--help"]);

    assert!(output.status.success());
    let stdout = String::from_utf8_lossy(&output.stdout);
    assert!(stdout.contains("rewriting the file in place"));
    assert!(stdout.contains("--threshold"));
}

#[test]
fn test_fix_renumbers_duplicates() {
    let (_dir, file) = setup_target("A = 2134,\nB = 2134,\n");

    let output = run(&["fix", file.to_str().unwrap()]);

    assert!(output.status.success());
    let stdout = String::from_utf8_lossy(&output.stdout);
    assert!(stdout.contains("Next available code: 2136"));

    let content = fs::read_to_string(&file).unwrap();
    assert_eq!(content, "A = 2134,\nB = 2135,\n");
}

#[test]
fn test_fix_zero_matches_still_reports_start_code() {
    let (_dir, file) = setup_target("fn main() {}\n");

    let output = run(&["fix", file.to_str().unwrap()]);

    assert!(output.status.success());
    let stdout = String::from_utf8_lossy(&output.stdout);
    assert!(stdout.contains("Next available code: 2135"));

    // File left byte-identical
    assert_eq!(fs::read_to_string(&file).unwrap(), "fn main() {}\n");
}

#[test]
fn test_fix_dry_run_leaves_file_alone() {
    let original = "A = 2134,\nB = 2134,\n";
    let (_dir, file) = setup_target(original);

    let output = run(&["fix", "--dry-run", file.to_str().unwrap()]);

    assert!(output.status.success());
    let stdout = String::from_utf8_lossy(&output.stdout);
    assert!(stdout.contains("DRY RUN"));
    assert!(stdout.contains("would be renumbered"));

    assert_eq!(fs::read_to_string(&file).unwrap(), original);
}

#[test]
fn test_fix_diff_matches_written_text() {
    let (_dir, file) = setup_target("A = 2134,\nB = 2134,\n");

    let output = run(&["fix", "--diff", file.to_str().unwrap()]);

    assert!(output.status.success());
    let stdout = String::from_utf8_lossy(&output.stdout);
    assert!(stdout.contains("-B = 2134,"));
    assert!(stdout.contains("+B = 2135,"));

    // The file holds exactly the text the diff promised
    assert_eq!(
        fs::read_to_string(&file).unwrap(),
        "A = 2134,\nB = 2135,\n"
    );
}

#[test]
fn test_fix_idempotent() {
    let (_dir, file) = setup_target("A = 2134,\nB = 2134,\n");

    let output1 = run(&["fix", file.to_str().unwrap()]);
    assert!(output1.status.success());
    let after_first = fs::read_to_string(&file).unwrap();

    let output2 = run(&["fix", file.to_str().unwrap()]);
    assert!(output2.status.success());
    let stdout = String::from_utf8_lossy(&output2.stdout);
    assert!(stdout.contains("already unique"));

    assert_eq!(fs::read_to_string(&file).unwrap(), after_first);
}

#[test]
fn test_fix_custom_threshold_and_start_code() {
    let (_dir, file) = setup_target("A = 100,\nB = 100,\n");

    let output = run(&[
        "fix",
        "--threshold",
        "100",
        "--start-code",
        "101",
        file.to_str().unwrap(),
    ]);

    assert!(output.status.success());
    assert_eq!(fs::read_to_string(&file).unwrap(), "A = 100,\nB = 101,\n");
}

#[test]
fn test_fix_full_scan_resolves_forward_collision() {
    let (_dir, file) = setup_target("A = 2134,\nB = 2134,\nC = 2135,\n");

    let output = run(&["fix", "--full-scan", file.to_str().unwrap()]);

    assert!(output.status.success());
    assert_eq!(
        fs::read_to_string(&file).unwrap(),
        "A = 2134,\nB = 2136,\nC = 2135,\n"
    );
}

#[test]
fn test_fix_missing_file_fails() {
    let dir = TempDir::new().unwrap();
    let missing = dir.path().join("nope.rs");

    let output = run(&["fix", missing.to_str().unwrap()]);

    assert!(!output.status.success());
}

#[test]
fn test_check_clean_file_exits_zero() {
    let (_dir, file) = setup_target("A = 2134,\nB = 2135,\n");

    let output = run(&["check", file.to_str().unwrap()]);

    assert!(output.status.success());
    let stdout = String::from_utf8_lossy(&output.stdout);
    assert!(stdout.contains("No duplicate codes"));
}

#[test]
fn test_check_duplicates_exits_nonzero() {
    let original = "A = 2134,\nB = 2134,\n";
    let (_dir, file) = setup_target(original);

    let output = run(&["check", file.to_str().unwrap()]);

    assert!(!output.status.success());
    let stdout = String::from_utf8_lossy(&output.stdout);
    assert!(stdout.contains("DUPLICATES"));
    assert!(stdout.contains("2134 (2 occurrences)"));

    // check never modifies the file
    assert_eq!(fs::read_to_string(&file).unwrap(), original);
}
