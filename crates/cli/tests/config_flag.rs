//! CLI tests for the global `--config` flag.

use std::fs;
use std::path::Path;
use std::process::Command;

use assert_cmd::cargo;

fn gs_cmd() -> Command {
    Command::new(cargo::cargo_bin!("gcode-settings"))
}

fn write_file(dir: &Path, name: &str, content: &str) -> String {
    let path = dir.join(name);
    fs::write(&path, content).expect("write temp file");
    path.to_string_lossy().to_string()
}

#[test]
fn config_changes_extension_and_line_width() {
    let dir = tempfile::tempdir().expect("tempdir");
    let config = write_file(
        dir.path(),
        "settings.json",
        r#"{ "reader": { "extension": "gco" }, "writer": { "line_width": 40 } }"#,
    );
    let gcode = write_file(dir.path(), "part.gco", "G28\n");
    let profile = write_file(
        dir.path(),
        "p.cfg",
        "[general]\nversion = 2\nname = Long Profile Name\ndefinition = fdmprinter\n",
    );

    let output = gs_cmd()
        .args(["--config", &config, "embed", &gcode, "--profile", &profile, "--write"])
        .output()
        .expect("run embed");
    assert!(output.status.success());
    let written = fs::read_to_string(&gcode).unwrap();
    assert!(written.lines().count() > 3, "{written}");
    assert!(written.lines().all(|l| l.chars().count() <= 40), "{written}");

    let output = gs_cmd()
        .args(["--config", &config, "read", &gcode, "--output", "json"])
        .output()
        .expect("run read");
    assert!(output.status.success());
    let json: serde_json::Value =
        serde_json::from_str(&String::from_utf8_lossy(&output.stdout)).expect("valid json");
    assert_eq!(json["profile"]["name"], "Long Profile Name");
}

#[test]
fn invalid_config_is_reported() {
    let dir = tempfile::tempdir().expect("tempdir");
    let config = write_file(
        dir.path(),
        "settings.json",
        r#"{ "writer": { "line_width": 5 } }"#,
    );

    let output = gs_cmd()
        .args(["--config", &config, "payload", "/nonexistent/a.gcode"])
        .output()
        .expect("run payload");

    assert!(!output.status.success());
    let stderr = String::from_utf8_lossy(&output.stderr);
    assert!(stderr.contains("invalid config file"), "stderr={stderr}");
    assert!(stderr.contains("writer.line_width"), "stderr={stderr}");
}
