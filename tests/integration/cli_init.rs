use std::fs;

use predicates::prelude::*;

use crate::common::TestEnv;

#[test]
fn init_requires_global_install() {
    let env = TestEnv::new();

    env.cmd()
        .arg("init")
        .assert()
        .failure()
        .stderr(predicate::str::contains("agc install"));

    assert!(!env.agc_dir().exists());
}

#[test]
fn init_copies_skills_with_titles() {
    let env = TestEnv::new();
    env.install();

    env.cmd()
        .arg("init")
        .assert()
        .success()
        .stdout(predicate::str::contains("Successfully initialized AgCel"));

    let agc = env.agc_dir();
    let config: serde_json::Value =
        serde_json::from_str(&fs::read_to_string(agc.join("config.json")).unwrap()).unwrap();
    assert_eq!(config["port"], 3000);
    assert_eq!(config["skillsDir"], "./skills");

    let skill = fs::read_to_string(agc.join("skills/code-review/SKILL.md")).unwrap();
    assert!(skill.starts_with("---\ntitle: code-review\n---\n"));
    assert!(skill.ends_with("# Code Review\nRead the whole diff.\n"));

    let workflow = fs::read_to_string(agc.join("workflows/feature.md")).unwrap();
    assert!(workflow.starts_with("---\ntitle: feature\n---\n"));
}

#[test]
fn init_updates_gitignore_once() {
    let env = TestEnv::new();
    env.install();
    fs::write(env.project_dir.path().join(".gitignore"), "target\n").unwrap();

    env.cmd().arg("init").assert().success();
    env.cmd().arg("init").assert().success();

    let gitignore = fs::read_to_string(env.project_dir.path().join(".gitignore")).unwrap();
    assert_eq!(gitignore, "target\n.agc/\n.agent/workflows\n");
}

#[test]
fn reinit_is_idempotent() {
    let env = TestEnv::new();
    env.install();
    env.cmd().arg("init").assert().success();
    fs::write(env.agc_dir().join("config.json"), "{\"port\": 4100}\n").unwrap();

    env.cmd()
        .arg("init")
        .write_stdin("")
        .assert()
        .success()
        .stdout(predicate::str::contains("already exists"))
        .stdout(predicate::str::contains("0 added, 0 updated, 2 unchanged"));

    // config is never rewritten once present
    assert_eq!(
        fs::read_to_string(env.agc_dir().join("config.json")).unwrap(),
        "{\"port\": 4100}\n"
    );
}

#[test]
fn declined_conflicts_keep_local_edits() {
    let env = TestEnv::new();
    env.init_project();
    let skill = env.agc_dir().join("skills/code-review/SKILL.md");
    fs::write(&skill, "my notes\n").unwrap();

    env.cmd()
        .arg("init")
        .write_stdin("n\n")
        .assert()
        .success()
        .stderr(predicate::str::contains("Overwrite?"));
    assert_eq!(fs::read_to_string(&skill).unwrap(), "my notes\n");

    // empty answer defaults to no
    env.cmd().arg("init").write_stdin("\n").assert().success();
    assert_eq!(fs::read_to_string(&skill).unwrap(), "my notes\n");
}

#[test]
fn accepted_conflicts_overwrite() {
    let env = TestEnv::new();
    env.init_project();
    let skill = env.agc_dir().join("skills/code-review/SKILL.md");
    fs::write(&skill, "my notes\n").unwrap();

    env.cmd().arg("init").write_stdin("y\n").assert().success();
    assert!(fs::read_to_string(&skill).unwrap().contains("# Code Review"));

    fs::write(&skill, "my notes again\n").unwrap();
    env.cmd().args(["init", "--yes"]).assert().success();
    assert!(fs::read_to_string(&skill).unwrap().contains("# Code Review"));
}

#[test]
fn init_at_explicit_path() {
    let env = TestEnv::new();
    env.install();
    let target = env.project_dir.path().join("nested");
    fs::create_dir_all(&target).unwrap();

    env.cmd()
        .args(["init", "--path"])
        .arg(&target)
        .assert()
        .success();

    assert!(target.join(".agc/config.json").is_file());
    assert!(target.join(".agc/skills/write-tests/SKILL.md").is_file());
}

#[cfg(unix)]
#[test]
fn link_mode_tracks_global_install() {
    let env = TestEnv::new();
    env.install();

    env.cmd()
        .args(["init", "--link"])
        .assert()
        .success()
        .stdout(predicate::str::contains("skills: linked"));

    let skills = env.agc_dir().join("skills");
    assert!(fs::symlink_metadata(&skills).unwrap().file_type().is_symlink());

    fs::write(
        env.global_dir().join("skills/code-review/SKILL.md"),
        "# Updated\n",
    )
    .unwrap();
    assert_eq!(
        fs::read_to_string(skills.join("code-review/SKILL.md")).unwrap(),
        "# Updated\n"
    );

    env.cmd()
        .args(["init", "--link"])
        .assert()
        .success()
        .stdout(predicate::str::contains("skills: already linked"));
}

#[cfg(unix)]
#[test]
fn agent_workflows_point_at_project_workflows() {
    let env = TestEnv::new();
    env.init_project();

    let link = env.project_dir.path().join(".agent/workflows");
    assert!(fs::symlink_metadata(&link).unwrap().file_type().is_symlink());
    assert!(link.join("feature.md").is_file());
}
