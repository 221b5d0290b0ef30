//! CLI tests for the `gcode-settings payload` subcommand.

use std::fs;
use std::process::Command;

use assert_cmd::cargo;

fn gs_cmd() -> Command {
    Command::new(cargo::cargo_bin!("gcode-settings"))
}

fn write_temp(name: &str, content: &str) -> (tempfile::TempDir, String) {
    let dir = tempfile::tempdir().expect("tempdir");
    let path = dir.path().join(name);
    fs::write(&path, content).expect("write temp file");
    (dir, path.to_string_lossy().to_string())
}

#[test]
fn payload_concatenates_and_unescapes() {
    let (_dir, path) = write_temp(
        "a.gcode",
        ";SETTING_2 line1\\n\nG28\n;SETTING_1 skipped\n;SETTING_2 line2\\\\x\n",
    );
    let output = gs_cmd()
        .args(["payload", &path, "--output", "json"])
        .output()
        .expect("run payload");

    assert!(output.status.success());
    let stdout = String::from_utf8_lossy(&output.stdout);
    let json: serde_json::Value = serde_json::from_str(&stdout).expect("valid json");
    assert_eq!(json["payload"], "line1\nline2\\x");
}

#[test]
fn payload_pretty_is_raw_text() {
    let (_dir, path) = write_temp("a.gcode", ";SETTING_2 a\\nb\n");
    let output = gs_cmd()
        .args(["payload", &path, "--output", "pretty"])
        .output()
        .expect("run payload");

    assert!(output.status.success());
    assert_eq!(String::from_utf8_lossy(&output.stdout), "a\nb");
}

#[test]
fn payload_rejects_other_extension() {
    let (_dir, path) = write_temp("a.txt", ";SETTING_2 a\n");
    let output = gs_cmd()
        .args(["payload", &path])
        .output()
        .expect("run payload");

    assert_eq!(output.status.code(), Some(1));
    let stderr = String::from_utf8_lossy(&output.stderr);
    assert!(stderr.contains("is not a .gcode file"), "stderr={stderr}");
}

#[test]
fn payload_missing_file_fails() {
    let output = gs_cmd()
        .args(["payload", "/nonexistent/a.gcode"])
        .output()
        .expect("run payload");

    assert!(!output.status.success());
    let stderr = String::from_utf8_lossy(&output.stderr);
    assert!(stderr.contains("unable to open file"), "stderr={stderr}");
}
