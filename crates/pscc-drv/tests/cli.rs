//! End-to-end CLI tests for the `pscc` binary.

use assert_cmd::Command;
use predicates::prelude::*;
use std::io::Write;
use tempfile::NamedTempFile;

fn pscc_bin() -> std::path::PathBuf {
    std::path::PathBuf::from(env!("CARGO_BIN_EXE_pscc"))
}

fn write_source(contents: &str) -> NamedTempFile {
    let mut file = NamedTempFile::with_suffix(".pas").expect("create temp source file");
    file.write_all(contents.as_bytes()).expect("write temp source file");
    file
}

const STAR_LOOP: &str = "program p(output); var i,lim:integer; \
    begin lim:=7; for i:=0 to lim do writeln('*') end.";

#[test]
fn missing_file_exits_nonzero_with_path_in_diagnostic() {
    let mut cmd = Command::new(pscc_bin());
    cmd.arg("compile").arg("definitely_missing.pas");

    cmd.assert()
        .failure()
        .stderr(predicate::str::contains("definitely_missing.pas"));
}

#[test]
fn no_arguments_exits_nonzero() {
    let mut cmd = Command::new(pscc_bin());
    cmd.assert().failure();
}

#[test]
fn compiles_star_loop_to_asm() {
    let source = write_source(STAR_LOOP);

    let mut cmd = Command::new(pscc_bin());
    cmd.arg("compile").arg(source.path());

    cmd.assert()
        .success()
        .stdout(predicate::str::contains("segment .text"))
        .stdout(predicate::str::contains("_asm_main"));
}

/// Testable property: `-d` adds only comment banners, never changes the
/// instruction stream.
#[test]
fn debug_flag_adds_banners_without_changing_instructions() {
    let source = write_source(STAR_LOOP);

    let plain = Command::new(pscc_bin())
        .arg("compile")
        .arg(source.path())
        .output()
        .expect("run pscc");
    let debug = Command::new(pscc_bin())
        .arg("compile")
        .arg(source.path())
        .arg("-d")
        .output()
        .expect("run pscc -d");

    assert!(plain.status.success());
    assert!(debug.status.success());

    let debug_stdout = String::from_utf8(debug.stdout).unwrap();
    assert!(debug_stdout.contains("; AST"));
    assert!(debug_stdout.contains("; symbols"));

    let strip_comments = |s: &str| -> Vec<&str> {
        s.lines().filter(|l| !l.trim_start().starts_with(';')).collect()
    };
    let plain_stdout = String::from_utf8(plain.stdout).unwrap();
    assert_eq!(strip_comments(&plain_stdout), strip_comments(&debug_stdout));
}
