//! Integration tests for the `qcc` compiler CLI.
//!
//! Spawns the compiled binary and checks its behavior through stdout,
//! stderr, and exit code, mirroring the teacher's `inference-cli` suite.
//!
//! Test data lives at `<workspace_root>/tests/test_data/qx/`.

use assert_cmd::prelude::*;
use predicates::prelude::*;
use std::process::Command;

/// Resolves a test data file under `<workspace_root>/tests/test_data/qx/`.
fn example_file(name: &str) -> std::path::PathBuf {
    std::path::PathBuf::from(env!("CARGO_MANIFEST_DIR")) // core/cli/
        .parent()
        .unwrap() // core/
        .parent()
        .unwrap() // workspace root
        .join("tests")
        .join("test_data")
        .join("qx")
        .join(name)
}

#[test]
fn fails_when_file_missing() {
    let mut cmd = Command::new(assert_cmd::cargo::cargo_bin!("qcc"));
    cmd.arg("this-file-does-not-exist.qx").arg("--dump-ast");
    cmd.assert()
        .failure()
        .stderr(predicate::str::contains("path not found"));
}

#[test]
fn fails_when_no_flag_selected() {
    let mut cmd = Command::new(assert_cmd::cargo::cargo_bin!("qcc"));
    cmd.arg(example_file("example.qx"));
    cmd.assert()
        .failure()
        .stderr(predicate::str::contains("at least one of --dump-ast"));
}

#[test]
fn dump_ast_succeeds() {
    let mut cmd = Command::new(assert_cmd::cargo::cargo_bin!("qcc"));
    cmd.arg(example_file("example.qx")).arg("--dump-ast");
    cmd.assert()
        .success()
        .stdout(predicate::str::contains("CompositeDef"))
        .stdout(predicate::str::contains("Point"));
}

#[test]
fn dump_ir_succeeds() {
    let mut cmd = Command::new(assert_cmd::cargo::cargo_bin!("qcc"));
    cmd.arg(example_file("example.qx")).arg("--dump-ir");
    cmd.assert()
        .success()
        .stdout(predicate::str::contains("Function"))
        .stdout(predicate::str::contains("add"));
}

#[test]
fn mangle_prints_one_name_per_top_level_item() {
    let mut cmd = Command::new(assert_cmd::cargo::cargo_bin!("qcc"));
    cmd.arg(example_file("example.qx")).arg("--mangle");
    cmd.assert()
        .success()
        .stdout(predicate::str::contains("add"))
        .stdout(predicate::str::contains("distance_squared"));
}

#[test]
fn reading_from_stdin_with_dash_works() {
    let mut cmd = Command::new(assert_cmd::cargo::cargo_bin!("qcc"));
    cmd.arg("-")
        .arg("--dump-ast")
        .write_stdin("fn id(x: u32) -> u32 { return x; }");
    cmd.assert().success().stdout(predicate::str::contains("id"));
}

#[test]
fn shows_version() {
    let mut cmd = Command::new(assert_cmd::cargo::cargo_bin!("qcc"));
    cmd.arg("--version");
    cmd.assert()
        .success()
        .stdout(predicate::str::contains(env!("CARGO_PKG_VERSION")));
}
