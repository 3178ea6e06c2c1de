use assert_cmd::prelude::*;
use predicates::prelude::*;
use predicates::str::contains;
use std::io::Write;
use std::process::Command;
use tempfile::NamedTempFile;

fn config_file(xml: &str) -> NamedTempFile {
    let mut tmp = NamedTempFile::new().expect("temp config");
    tmp.write_all(xml.as_bytes()).expect("write config");
    tmp
}

fn shape_lines(stdout: &[u8]) -> usize {
    String::from_utf8_lossy(stdout)
        .lines()
        .filter(|line| line.starts_with(" - #"))
        .count()
}

#[test]
fn summary_lists_twenty_shapes_by_default() {
    let mut cmd = Command::cargo_bin("shape-room").expect("binary exists");
    let output = cmd
        .args(["--seed", "7", "--summary-only"])
        .output()
        .expect("run binary");
    assert!(output.status.success());
    assert_eq!(shape_lines(&output.stdout), 20);

    let stdout = String::from_utf8_lossy(&output.stdout);
    assert!(stdout.contains("Generated room with 20 shapes (seed 7)"));
    assert!(stdout.contains("Center ray from start: "));
}

#[test]
fn same_seed_prints_the_same_room() {
    let run = || {
        Command::cargo_bin("shape-room")
            .expect("binary exists")
            .args(["--seed", "99", "--summary-only"])
            .output()
            .expect("run binary")
            .stdout
    };
    assert_eq!(run(), run());
}

#[test]
fn config_file_sets_the_shape_count() {
    let config = config_file("<room><shapes>3</shapes><seed>11</seed></room>");
    let mut cmd = Command::cargo_bin("shape-room").expect("binary exists");
    let output = cmd
        .arg("--config")
        .arg(config.path())
        .arg("--summary-only")
        .output()
        .expect("run binary");
    assert!(output.status.success());
    assert_eq!(shape_lines(&output.stdout), 3);
    assert!(String::from_utf8_lossy(&output.stdout).contains("(seed 11)"));
}

#[test]
fn shapes_flag_overrides_the_config_file() {
    let config = config_file("<room><shapes>3</shapes></room>");
    let mut cmd = Command::cargo_bin("shape-room").expect("binary exists");
    cmd.arg("--config")
        .arg(config.path())
        .args(["--shapes", "5", "--seed", "1", "--summary-only"]);
    cmd.assert()
        .success()
        .stdout(contains("Generated room with 5 shapes (seed 1)"))
        .stdout(contains(" - #05 "))
        .stdout(contains(" - #06 ").not());
}

#[test]
fn malformed_config_is_rejected() {
    let config = config_file("<room><size>big</size></room>");
    let mut cmd = Command::cargo_bin("shape-room").expect("binary exists");
    cmd.arg("--config").arg(config.path()).arg("--summary-only");
    cmd.assert()
        .failure()
        .stderr(contains("failed to parse config"));
}

#[test]
fn missing_config_file_is_reported() {
    let mut cmd = Command::cargo_bin("shape-room").expect("binary exists");
    cmd.args(["--config", "/nonexistent/room.xml", "--summary-only"]);
    cmd.assert()
        .failure()
        .stderr(contains("failed to read config"));
}

#[test]
fn unknown_arguments_fail() {
    let mut cmd = Command::cargo_bin("shape-room").expect("binary exists");
    cmd.arg("--run-scripts");
    cmd.assert().failure();
}
