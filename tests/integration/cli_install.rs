use std::fs;

use predicates::prelude::*;
use serde_json::json;

use crate::common::TestEnv;

#[test]
fn install_creates_global_layout() {
    let env = TestEnv::new();

    env.cmd()
        .arg("install")
        .assert()
        .success()
        .stdout(predicate::str::contains("AgCel installed successfully"));

    let global = env.global_dir();
    assert!(global.join("skills/code-review/SKILL.md").is_file());
    assert!(global.join("skills/write-tests/SKILL.md").is_file());
    assert!(global.join("workflows/feature.md").is_file());
    assert!(
        global
            .join(format!("dist/agc{}", std::env::consts::EXE_SUFFIX))
            .is_file()
    );

    let record: serde_json::Value =
        serde_json::from_str(&fs::read_to_string(global.join("install.json")).unwrap()).unwrap();
    assert_eq!(record["version"], env!("CARGO_PKG_VERSION"));
    assert!(record["installedAt"].is_string());

    // global copies are verbatim
    assert_eq!(
        fs::read_to_string(global.join("skills/code-review/SKILL.md")).unwrap(),
        "# Code Review\nRead the whole diff.\n"
    );
}

#[test]
fn install_registers_server() {
    let env = TestEnv::new();
    env.install();

    let config = env.read_mcp_config();
    let entry = &config["mcpServers"]["agcel"];
    assert_eq!(entry["args"], json!(["serve"]));
    assert_eq!(
        entry["env"]["AGCEL_GLOBAL_DIR"],
        json!(env.global_dir().display().to_string())
    );
    assert!(entry["command"].as_str().unwrap().contains("dist"));
}

#[test]
fn install_preserves_other_servers() {
    let env = TestEnv::new();
    fs::create_dir_all(env.mcp_config().parent().unwrap()).unwrap();
    fs::write(
        env.mcp_config(),
        r#"{"theme":"dark","mcpServers":{"other":{"command":"x","args":[]}}}"#,
    )
    .unwrap();

    env.install();

    let config = env.read_mcp_config();
    assert_eq!(config["theme"], "dark");
    assert_eq!(config["mcpServers"]["other"]["command"], "x");
    assert!(config["mcpServers"]["agcel"].is_object());
}

#[test]
fn install_recovers_from_invalid_host_config() {
    let env = TestEnv::new();
    fs::create_dir_all(env.mcp_config().parent().unwrap()).unwrap();
    fs::write(env.mcp_config(), "not json {").unwrap();

    env.cmd()
        .arg("install")
        .assert()
        .success()
        .stderr(predicate::str::contains("existing MCP config is invalid"));

    let config = env.read_mcp_config();
    assert!(config["mcpServers"]["agcel"].is_object());
}

#[test]
fn reinstall_replaces_payload() {
    let env = TestEnv::new();
    env.install();
    fs::create_dir_all(env.global_dir().join("skills/stale")).unwrap();
    fs::write(env.global_dir().join("skills/stale/SKILL.md"), "old").unwrap();

    env.cmd()
        .arg("install")
        .assert()
        .success()
        .stdout(predicate::str::contains("already exists"));

    assert!(!env.global_dir().join("skills/stale").exists());
    assert!(env.global_dir().join("skills/code-review/SKILL.md").is_file());
}

#[test]
fn install_refuses_global_dir_as_package_root() {
    let env = TestEnv::new();
    env.install();

    env.cmd()
        .arg("install")
        .env("AGCEL_PACKAGE_ROOT", env.global_dir())
        .assert()
        .failure()
        .stderr(predicate::str::contains("global directory"));
}

#[test]
fn uninstall_removes_entry_and_global_dir() {
    let env = TestEnv::new();
    fs::create_dir_all(env.mcp_config().parent().unwrap()).unwrap();
    fs::write(
        env.mcp_config(),
        r#"{"mcpServers":{"other":{"command":"x"}}}"#,
    )
    .unwrap();
    env.install();

    env.cmd()
        .arg("uninstall")
        .assert()
        .success()
        .stdout(predicate::str::contains("Removed AgCel from"))
        .stdout(predicate::str::contains("Removed global directory"));

    assert!(!env.global_dir().exists());
    let config = env.read_mcp_config();
    assert!(config["mcpServers"].get("agcel").is_none());
    assert_eq!(config["mcpServers"]["other"]["command"], "x");
}

#[test]
fn uninstall_without_install_is_a_noop() {
    let env = TestEnv::new();

    env.cmd()
        .arg("uninstall")
        .assert()
        .success()
        .stdout(predicate::str::contains("MCP config not found"))
        .stdout(predicate::str::contains("Global directory not found"))
        .stdout(predicate::str::contains("uninstallation complete"));
}
