use std::fs;

use predicates::prelude::*;

use crate::common::TestEnv;

#[test]
fn config_show_defaults() {
    let env = TestEnv::new();
    env.init_project();

    env.cmd()
        .args(["config", "show"])
        .assert()
        .success()
        .stdout(predicate::str::contains("(project)"))
        .stdout(predicate::str::contains("Port:          3000"))
        .stdout(predicate::str::contains("./skills"));
}

#[test]
fn config_set_port() {
    let env = TestEnv::new();
    env.init_project();

    env.cmd()
        .args(["config", "set", "port", "4000"])
        .assert()
        .success()
        .stdout(predicate::str::contains("Set port = 4000"));

    env.cmd()
        .args(["config", "get", "port"])
        .assert()
        .success()
        .stdout("4000\n");

    let content = fs::read_to_string(env.agc_dir().join("config.json")).unwrap();
    assert!(content.contains("\"port\": 4000"));
    assert!(content.contains("\"workflowsDir\": \"./workflows\""));
}

#[test]
fn config_set_skills_dir_changes_listing() {
    let env = TestEnv::new();
    env.init_project();
    fs::create_dir_all(env.agc_dir().join("mine/solo")).unwrap();
    fs::write(env.agc_dir().join("mine/solo/SKILL.md"), "# Solo").unwrap();

    env.cmd()
        .args(["config", "set", "skills_dir", "./mine"])
        .assert()
        .success();

    env.cmd()
        .args(["skills", "list"])
        .assert()
        .success()
        .stdout(predicate::str::contains("- solo"))
        .stdout(predicate::str::contains("code-review").not());
}

#[test]
fn config_rejects_bad_input() {
    let env = TestEnv::new();
    env.init_project();

    env.cmd()
        .args(["config", "set", "port", "http"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("invalid port value"));

    env.cmd()
        .args(["config", "set", "color", "blue"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("unknown config key: color"));

    env.cmd()
        .args(["config", "get", "color"])
        .assert()
        .failure();
}

#[test]
fn config_set_keeps_unmanaged_keys() {
    let env = TestEnv::new();
    env.init_project();
    fs::write(
        env.agc_dir().join("config.json"),
        r#"{ "port": 3000, "personasDir": "./personas" }"#,
    )
    .unwrap();

    env.cmd()
        .args(["config", "set", "port", "4000"])
        .assert()
        .success();

    let content = fs::read_to_string(env.agc_dir().join("config.json")).unwrap();
    assert!(content.contains("\"port\": 4000"));
    assert!(content.contains("\"personasDir\": \"./personas\""));
}
