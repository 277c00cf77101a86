use std::fs;

use predicates::prelude::*;

use crate::common::TestEnv;

#[test]
fn lists_project_skills_and_workflows() {
    let env = TestEnv::new();
    env.init_project();

    env.cmd()
        .args(["skills", "list"])
        .assert()
        .success()
        .stdout(predicate::str::contains("- code-review"))
        .stdout(predicate::str::contains("- write-tests"))
        .stdout(predicate::str::contains("global install").not());

    env.cmd()
        .args(["workflows", "list"])
        .assert()
        .success()
        .stdout(predicate::str::contains("- feature"));
}

#[test]
fn falls_back_to_global_install() {
    let env = TestEnv::new();
    env.install();

    env.cmd()
        .args(["skills", "list"])
        .assert()
        .success()
        .stdout(predicate::str::contains("using global install"))
        .stdout(predicate::str::contains("- code-review"));
}

#[test]
fn directories_without_skill_file_are_ignored() {
    let env = TestEnv::new();
    env.init_project();
    fs::create_dir_all(env.agc_dir().join("skills/draft")).unwrap();

    env.cmd()
        .args(["skills", "list"])
        .assert()
        .success()
        .stdout(predicate::str::contains("draft").not());
}

#[test]
fn empty_skills_dir() {
    let env = TestEnv::new();
    env.init_project();
    fs::remove_dir_all(env.agc_dir().join("skills")).unwrap();

    env.cmd()
        .args(["skills", "list"])
        .assert()
        .success()
        .stdout(predicate::str::contains("No skills found."));
}

#[test]
fn list_without_any_install_fails() {
    let env = TestEnv::new();

    env.cmd()
        .args(["skills", "list"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("not initialized"));
}
