#![allow(clippy::unwrap_used, clippy::expect_used)]

use std::{
    path::Path,
    process::{Command, Output},
};

fn varsubst(args: &[&str], cwd: &Path) -> Output {
    Command::new(env!("CARGO_BIN_EXE_varsubst"))
        .args(args)
        .current_dir(cwd)
        .env_remove("RUST_LOG")
        .output()
        .expect("failed to run varsubst")
}

fn stdout(out: &Output) -> String {
    String::from_utf8_lossy(&out.stdout).into_owned()
}

fn fixture(dir: &Path) {
    std::fs::write(
        dir.join("template.yaml"),
        "name: ${name}\nport: ${port}\nunused: ${missing}",
    )
    .unwrap();
    std::fs::write(dir.join("values.yaml"), "name: svc\nport: 8080\n").unwrap();
}

#[test]
fn prints_substituted_text() {
    let dir = tempfile::tempdir().unwrap();
    fixture(dir.path());

    let out = varsubst(&["-t", "template.yaml", "-v", "values.yaml"], dir.path());

    assert_eq!(out.status.code(), Some(0));
    assert_eq!(stdout(&out), "name: svc\nport: 8080\nunused: ${missing}\n");
}

#[test]
fn writes_output_file() {
    let dir = tempfile::tempdir().unwrap();
    fixture(dir.path());

    let out = varsubst(
        &[
            "--template=template.yaml",
            "--values=values.yaml",
            "--output=out.yaml",
        ],
        dir.path(),
    );

    assert_eq!(out.status.code(), Some(0));
    assert_eq!(
        std::fs::read_to_string(dir.path().join("out.yaml")).unwrap(),
        "name: svc\nport: 8080\nunused: ${missing}"
    );
    assert_eq!(stdout(&out), "Data has been written to out.yaml\n");
}

#[test]
fn missing_values_flag_prints_usage() {
    let dir = tempfile::tempdir().unwrap();
    fixture(dir.path());

    let out = varsubst(&["-t", "template.yaml", "-o", "out.yaml"], dir.path());

    assert_eq!(out.status.code(), Some(1));
    assert!(stdout(&out).starts_with("Usage:"));
    assert!(!dir.path().join("out.yaml").exists());
}

#[test]
fn missing_template_flag_prints_usage() {
    let dir = tempfile::tempdir().unwrap();

    let out = varsubst(&["--values", "values.yaml"], dir.path());

    assert_eq!(out.status.code(), Some(1));
    assert!(stdout(&out).starts_with("Usage:"));
}

#[test]
fn empty_flag_counts_as_missing() {
    let dir = tempfile::tempdir().unwrap();
    fixture(dir.path());

    let out = varsubst(&["--template=", "--values=values.yaml"], dir.path());

    assert_eq!(out.status.code(), Some(1));
    assert!(stdout(&out).starts_with("Usage:"));
}

#[test]
fn nested_values_fail_to_deserialize() {
    let dir = tempfile::tempdir().unwrap();
    fixture(dir.path());
    std::fs::write(dir.path().join("values.yaml"), "name:\n  first: svc\n").unwrap();

    let out = varsubst(
        &["-t", "template.yaml", "-v", "values.yaml", "-o", "out.yaml"],
        dir.path(),
    );

    assert_eq!(out.status.code(), Some(1));
    assert!(stdout(&out).starts_with("Error unmarshaling values file"));
    assert!(!dir.path().join("out.yaml").exists());
}

#[test]
fn unreadable_template_is_reported() {
    let dir = tempfile::tempdir().unwrap();
    fixture(dir.path());

    let out = varsubst(&["-t", "absent.yaml", "-v", "values.yaml"], dir.path());

    assert_eq!(out.status.code(), Some(1));
    assert!(stdout(&out).starts_with("Error reading template file absent.yaml"));
}

#[test]
fn unwritable_output_is_reported() {
    let dir = tempfile::tempdir().unwrap();
    fixture(dir.path());

    let out = varsubst(
        &["-t", "template.yaml", "-v", "values.yaml", "-o", "missing-dir/out.yaml"],
        dir.path(),
    );

    assert_eq!(out.status.code(), Some(1));
    assert!(stdout(&out).starts_with("Error writing to the output file"));
}

#[test]
fn json_values_by_extension() {
    let dir = tempfile::tempdir().unwrap();
    fixture(dir.path());
    std::fs::write(dir.path().join("values.json"), r#"{"name": "svc", "port": 9090}"#).unwrap();

    let out = varsubst(&["-t", "template.yaml", "-v", "values.json"], dir.path());

    assert_eq!(out.status.code(), Some(0));
    assert_eq!(stdout(&out), "name: svc\nport: 9090\nunused: ${missing}\n");
}

#[test]
fn non_utf8_template_passes_through() {
    let dir = tempfile::tempdir().unwrap();
    fixture(dir.path());
    std::fs::write(dir.path().join("latin1.yaml"), b"caf\xe9: ${name}\n").unwrap();

    let out = varsubst(
        &["-t", "latin1.yaml", "-v", "values.yaml", "-o", "out.yaml"],
        dir.path(),
    );

    assert_eq!(out.status.code(), Some(0));
    assert_eq!(
        std::fs::read(dir.path().join("out.yaml")).unwrap(),
        b"caf\xe9: svc\n"
    );
}

#[test]
fn numeric_values_are_not_reformatted() {
    let dir = tempfile::tempdir().unwrap();
    std::fs::write(dir.path().join("t.yaml"), "version: ${version}").unwrap();
    std::fs::write(dir.path().join("values.yaml"), "version: 1.10\n").unwrap();

    let out = varsubst(&["-t", "t.yaml", "-v", "values.yaml"], dir.path());

    assert_eq!(out.status.code(), Some(0));
    assert_eq!(stdout(&out), "version: 1.10\n");
}

#[test]
fn logs_stay_off_stdout() {
    let dir = tempfile::tempdir().unwrap();
    fixture(dir.path());

    let out = varsubst(
        &["-t", "template.yaml", "-v", "values.yaml", "--log-level", "debug"],
        dir.path(),
    );

    assert_eq!(out.status.code(), Some(0));
    assert_eq!(stdout(&out), "name: svc\nport: 8080\nunused: ${missing}\n");
    assert!(String::from_utf8_lossy(&out.stderr).contains("missing"));
}

#[test]
fn help_exits_zero() {
    let dir = tempfile::tempdir().unwrap();
    let out = varsubst(&["--help"], dir.path());
    assert!(out.status.success());
    assert!(stdout(&out).contains("--template"));
}
