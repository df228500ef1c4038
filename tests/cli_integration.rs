//! CLI integration tests.
//!
//! These drive the `ff` binary end-to-end for the offline commands
//! (init, validate, completion) and the offline failure paths of the
//! networked ones. No test here talks to a real forge.

use assert_cmd::Command;
use assert_fs::prelude::*;
use assert_fs::TempDir;
use predicates::prelude::*;

fn ff() -> Command {
    Command::cargo_bin("ff").unwrap()
}

const GOOD_MANIFEST: &str = r#"
[forge]
owner = "dzik-darek-org"

[repository]
name = "infrastructure-repository"

[branch]
default = "main"

[protection]
name = "master-branch-protection"
required_approving_review_count = 1
required_status_checks = ["Compile and test"]

[[labels]]
name = "Critical"
color = "FF0000"
"#;

#[test]
fn init_writes_a_loadable_manifest() {
    let dir = TempDir::new().unwrap();

    ff().current_dir(&dir)
        .args(["init", "--owner", "someorg", "--repository", "example"])
        .assert()
        .success()
        .stdout(predicate::str::contains("forgeform.toml"));

    dir.child("forgeform.toml")
        .assert(predicate::str::contains("owner = \"someorg\""));

    // the generated manifest validates as-is
    ff().current_dir(&dir)
        .arg("validate")
        .assert()
        .success()
        .stdout(predicate::str::contains("Manifest OK: 4 resources"));
}

#[test]
fn init_refuses_to_overwrite_without_force() {
    let dir = TempDir::new().unwrap();

    ff().current_dir(&dir).arg("init").assert().success();
    ff().current_dir(&dir)
        .arg("init")
        .assert()
        .failure()
        .stderr(predicate::str::contains("already exists"));
    ff().current_dir(&dir)
        .args(["init", "--force"])
        .assert()
        .success();
}

#[test]
fn validate_shows_dependency_order() {
    let dir = TempDir::new().unwrap();
    dir.child("forgeform.toml").write_str(GOOD_MANIFEST).unwrap();

    ff().current_dir(&dir)
        .arg("validate")
        .assert()
        .success()
        .stdout(
            predicate::str::contains("1. repository 'infrastructure-repository'")
                .and(predicate::str::contains("2. default branch 'main'"))
                .and(predicate::str::contains(
                    "3. branch protection 'master-branch-protection'",
                ))
                .and(predicate::str::contains("4. issue label 'Critical'")),
        );
}

#[test]
fn validate_emits_json() {
    let dir = TempDir::new().unwrap();
    dir.child("forgeform.toml").write_str(GOOD_MANIFEST).unwrap();

    let output = ff()
        .current_dir(&dir)
        .args(["validate", "--json"])
        .assert()
        .success()
        .get_output()
        .stdout
        .clone();

    let parsed: serde_json::Value = serde_json::from_slice(&output).unwrap();
    assert_eq!(parsed["resources"].as_array().unwrap().len(), 4);
    assert_eq!(parsed["resources"][0]["kind"], "repository");
}

#[test]
fn validate_rejects_bad_label_color() {
    let dir = TempDir::new().unwrap();
    dir.child("forgeform.toml")
        .write_str(
            r#"
[forge]
owner = "o"

[repository]
name = "r"

[[labels]]
name = "Critical"
color = "red"
"#,
        )
        .unwrap();

    ff().current_dir(&dir)
        .arg("validate")
        .assert()
        .failure()
        .stderr(predicate::str::contains("invalid label color"));
}

#[test]
fn validate_rejects_negative_review_count() {
    let dir = TempDir::new().unwrap();
    dir.child("forgeform.toml")
        .write_str(
            r#"
[forge]
owner = "o"

[repository]
name = "r"

[protection]
name = "rule"
required_approving_review_count = -1
"#,
        )
        .unwrap();

    ff().current_dir(&dir)
        .arg("validate")
        .assert()
        .failure()
        .stderr(predicate::str::contains("invalid review count"));
}

#[test]
fn missing_manifest_is_a_clear_error() {
    let dir = TempDir::new().unwrap();

    ff().current_dir(&dir)
        .arg("validate")
        .assert()
        .failure()
        .stderr(predicate::str::contains("Failed to load manifest"));
}

#[test]
fn manifest_flag_overrides_default_location() {
    let dir = TempDir::new().unwrap();
    dir.child("infra/custom.toml").write_str(GOOD_MANIFEST).unwrap();

    ff().current_dir(&dir)
        .args(["validate", "--manifest", "infra/custom.toml"])
        .assert()
        .success();
}

#[test]
fn plan_without_token_asks_for_one() {
    let dir = TempDir::new().unwrap();
    dir.child("forgeform.toml").write_str(GOOD_MANIFEST).unwrap();

    ff().current_dir(&dir)
        .env_remove("GITHUB_TOKEN")
        .arg("plan")
        .assert()
        .failure()
        .stderr(predicate::str::contains("GITHUB_TOKEN"));
}

#[test]
fn completion_generates_a_script() {
    ff().args(["completion", "bash"])
        .assert()
        .success()
        .stdout(predicate::str::contains("ff"));
}
