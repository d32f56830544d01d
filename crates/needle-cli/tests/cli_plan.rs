//! End-to-end tests for the `needle` binary against a generated project on disk.

use needle_test_utils::{APPLICATION_PROPERTIES_PATH, APPLICATION_PROPERTIES_TEMPLATE};
use std::path::Path;
use std::process::{Command, Output};

fn project() -> tempfile::TempDir {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join(APPLICATION_PROPERTIES_PATH);
    std::fs::create_dir_all(path.parent().unwrap()).unwrap();
    std::fs::write(&path, APPLICATION_PROPERTIES_TEMPLATE).unwrap();
    dir
}

fn needle(root: &Path, args: &[&str]) -> Output {
    Command::new(env!("CARGO_BIN_EXE_needle"))
        .args(args)
        .arg("--root")
        .arg(root)
        .output()
        .unwrap()
}

fn target(root: &Path) -> String {
    std::fs::read_to_string(root.join(APPLICATION_PROPERTIES_PATH)).unwrap()
}

/// Tenet: running the same insert twice changes the file once.
#[test]
fn insert_is_idempotent_across_runs() {
    let dir = project();

    let first = needle(dir.path(), &["insert", "property=private Foo foo;"]);
    assert!(first.status.success());
    let after_first = target(dir.path());

    let second = needle(dir.path(), &["insert", "property=private   Foo foo;"]);
    assert!(second.status.success());
    assert!(String::from_utf8_lossy(&second.stdout).contains("present   property"));
    assert_eq!(target(dir.path()), after_first);
}

/// Tenet: an unknown needle key fails the process and names the needle.
#[test]
fn unknown_needle_fails() {
    let dir = project();

    let output = needle(dir.path(), &["insert", "foo=foo"]);

    assert!(!output.status.success());
    assert!(String::from_utf8_lossy(&output.stderr).contains(&format!(
        "Missing required jhipster-needle application-properties-foo not found at {APPLICATION_PROPERTIES_PATH}"
    )));
    assert_eq!(target(dir.path()), APPLICATION_PROPERTIES_TEMPLATE);
}

/// Tenet: `locate` gates on template drift.
#[test]
fn locate_fails_on_missing_marker() {
    let dir = project();
    assert!(needle(dir.path(), &["locate"]).status.success());

    let drifted = APPLICATION_PROPERTIES_TEMPLATE
        .replace("    // jhipster-needle-application-properties-property\n", "");
    std::fs::write(dir.path().join(APPLICATION_PROPERTIES_PATH), drifted).unwrap();

    let output = needle(dir.path(), &["locate"]);
    assert!(!output.status.success());
    assert!(String::from_utf8_lossy(&output.stdout).contains("missing"));
}

/// Tenet: a configured marker prefix changes which markers are recognised.
#[test]
fn config_prefix_is_honoured() {
    let dir = project();
    let config = dir.path().join("needle.toml");
    std::fs::write(&config, "marker_prefix = \"acme-needle\"\n").unwrap();

    let output = Command::new(env!("CARGO_BIN_EXE_needle"))
        .arg("--config")
        .arg(&config)
        .args(["locate", "--root"])
        .arg(dir.path())
        .output()
        .unwrap();

    assert!(!output.status.success());
}
