//! End-to-end tests for the `ktpoet` binary.

use std::{fs, path::Path, process::Command};

use tempfile::TempDir;

const MANIFEST: &str = r#"
[file]
package = "com.squareup.tacos"
name = "Taco"
default_imports = ["kotlin"]

[[types]]
kind = "class"
name = "Taco"
modifiers = ["data"]

[[types.constructor]]
name = "cheese"
type = "kotlin.String?"
"#;

fn ktpoet(args: &[&str], dir: &Path) -> std::process::Output {
    Command::new(env!("CARGO_BIN_EXE_ktpoet"))
        .args(args)
        .current_dir(dir)
        .env_remove("KTPOET_LOG")
        .output()
        .expect("failed to run ktpoet")
}

fn workspace() -> TempDir {
    let dir = TempDir::new().expect("temp dir");
    fs::write(dir.path().join("ktpoet.toml"), MANIFEST).expect("write manifest");
    dir
}

const EXPECTED: &str =
    "package com.squareup.tacos\n\npublic data class Taco(\n  public val cheese: String?,\n)\n";

#[test]
fn test_render_to_stdout() {
    let dir = workspace();
    let output = ktpoet(&["render"], dir.path());
    assert!(output.status.success());
    assert_eq!(String::from_utf8_lossy(&output.stdout), EXPECTED);
}

#[test]
fn test_render_to_directory() {
    let dir = workspace();
    let output = ktpoet(&["render", "-o", "out"], dir.path());
    assert!(output.status.success());

    let written = dir.path().join("out/com/squareup/tacos/Taco.kt");
    assert_eq!(fs::read_to_string(written).expect("rendered file"), EXPECTED);

    fs::write(dir.path().join("out/com/squareup/tacos/Taco.kt"), "edited").expect("edit");
    let output = ktpoet(&["render", "-o", "out", "--skip-existing"], dir.path());
    assert!(output.status.success());
    assert!(String::from_utf8_lossy(&output.stdout).contains("skipped"));
    assert_eq!(
        fs::read_to_string(dir.path().join("out/com/squareup/tacos/Taco.kt")).expect("file"),
        "edited"
    );
}

#[test]
fn test_check_json() {
    let dir = workspace();
    let output = ktpoet(&["check", "--json"], dir.path());
    assert!(output.status.success());
    let report: serde_json::Value =
        serde_json::from_slice(&output.stdout).expect("check prints JSON");
    assert_eq!(report["imports"][0]["path"], "kotlin.String");
    assert_eq!(report["lines"], 5);
}

#[test]
fn test_manifest_error_exits_with_status_1() {
    let dir = TempDir::new().expect("temp dir");
    fs::write(dir.path().join("ktpoet.toml"), "[file\n").expect("write manifest");
    let output = ktpoet(&["check"], dir.path());
    assert_eq!(output.status.code(), Some(1));
    assert!(String::from_utf8_lossy(&output.stderr).contains("failed to parse manifest"));
}
