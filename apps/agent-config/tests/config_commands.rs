//! Integration tests for agent-config commands.

use assert_cmd::Command;
use assert_cmd::cargo::cargo_bin_cmd;
use predicates::prelude::*;
use std::path::Path;
use tempfile::TempDir;

const BASE: &str = r#"
agent:
  templates:
    system_template: Base Template
  tools:
    bundles:
      - path: tools/base_bundle
  history_processors:
    - type: cache_control
"#;

const CHILD: &str = r#"
extends: base.yaml
agent:
  tools:
    bundles:
      - +path: tools/child_bundle
"#;

fn agent_config_cmd() -> Command {
    cargo_bin_cmd!("agent-config")
}

fn write_fixtures(dir: &Path) {
    std::fs::write(dir.join("base.yaml"), BASE).unwrap();
    std::fs::write(dir.join("child.yaml"), CHILD).unwrap();
}

#[test]
fn test_validate_succeeds_on_valid_chain() {
    let temp = TempDir::new().unwrap();
    write_fixtures(temp.path());

    agent_config_cmd()
        .args(["validate", "--config"])
        .arg(temp.path().join("child.yaml"))
        .assert()
        .success()
        .stdout(predicate::str::contains("is valid"));
}

#[test]
fn test_validate_fails_on_cycle() {
    let temp = TempDir::new().unwrap();
    std::fs::write(temp.path().join("a.yaml"), "extends: b.yaml\n").unwrap();
    std::fs::write(temp.path().join("b.yaml"), "extends: a.yaml\n").unwrap();

    agent_config_cmd()
        .args(["validate", "--config"])
        .arg(temp.path().join("a.yaml"))
        .assert()
        .failure()
        .stderr(predicate::str::contains(
            "Config validation failed: Circular config inheritance detected",
        ))
        .stderr(predicate::str::contains("Caused by").not());
}

#[test]
fn test_validate_fails_on_schema_error() {
    let temp = TempDir::new().unwrap();
    std::fs::write(temp.path().join("bare.yaml"), "custom: 1\n").unwrap();

    agent_config_cmd()
        .args(["validate", "--config"])
        .arg(temp.path().join("bare.yaml"))
        .assert()
        .failure()
        .stderr(predicate::str::contains(
            "Config validation failed: Config missing top-level \"agent\" section",
        ));
}

#[test]
fn test_validate_fails_on_missing_file() {
    let temp = TempDir::new().unwrap();

    agent_config_cmd()
        .current_dir(temp.path())
        .args(["validate", "--config", "missing.yaml", "--base-dir"])
        .arg(temp.path())
        .assert()
        .failure()
        .stderr(predicate::str::contains("not found"));
}

#[test]
fn test_base_dir_is_searched_for_bare_names() {
    let configs = TempDir::new().unwrap();
    let work = TempDir::new().unwrap();
    write_fixtures(configs.path());

    agent_config_cmd()
        .current_dir(work.path())
        .env("AGENT_CONFIG_DIR", configs.path())
        .args(["validate", "--config", "child.yaml"])
        .assert()
        .success();
}

#[test]
fn test_show_prints_merged_yaml() {
    let temp = TempDir::new().unwrap();
    write_fixtures(temp.path());

    agent_config_cmd()
        .args(["show", "--config"])
        .arg(temp.path().join("child.yaml"))
        .assert()
        .success()
        .stdout(predicate::str::contains("tools/base_bundle"))
        .stdout(predicate::str::contains("tools/child_bundle"))
        .stdout(predicate::str::contains("extends").not());
}

#[test]
fn test_show_json_is_parseable() {
    let temp = TempDir::new().unwrap();
    write_fixtures(temp.path());

    let output = agent_config_cmd()
        .args(["show", "--json", "--config"])
        .arg(temp.path().join("child.yaml"))
        .output()
        .unwrap();
    assert!(output.status.success());

    let value: serde_json::Value = serde_json::from_slice(&output.stdout).unwrap();
    assert_eq!(
        value["agent"]["tools"]["bundles"],
        serde_json::json!([{"path": "tools/base_bundle"}, {"path": "tools/child_bundle"}])
    );
}

#[test]
fn test_render_writes_standalone_file() {
    let temp = TempDir::new().unwrap();
    write_fixtures(temp.path());
    let output = temp.path().join("out").join("flat.json");

    agent_config_cmd()
        .args(["render", "--config"])
        .arg(temp.path().join("child.yaml"))
        .arg("--output")
        .arg(&output)
        .assert()
        .success()
        .stdout(predicate::str::contains("Rendered"));

    let content = std::fs::read_to_string(&output).unwrap();
    let value: serde_json::Value = serde_json::from_str(&content).unwrap();
    assert!(value.get("extends").is_none());
    assert_eq!(value["agent"]["tools"]["bundles"].as_array().unwrap().len(), 2);

    // The flattened file is itself a valid config.
    agent_config_cmd()
        .args(["validate", "--config"])
        .arg(&output)
        .assert()
        .success();
}

#[test]
fn test_version_flag() {
    agent_config_cmd()
        .arg("--version")
        .assert()
        .success()
        .stdout(predicate::str::contains("agent-config"));
}

#[test]
fn test_help_flag() {
    agent_config_cmd()
        .arg("--help")
        .assert()
        .success()
        .stdout(predicate::str::contains("validate"))
        .stdout(predicate::str::contains("render"));
}
