// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 repairflow contributors

use assert_cmd::Command;
use predicates::prelude::*;
use std::path::Path;
use tempfile::TempDir;

const PIPELINE: &str = r#"
workspace: ./workspace
pipeline:
  prefix:
    - name: CloneRepository
      command: mkdir -p "$REPAIRFLOW_REPO_PATH"
      workdir: workspace
    - name: TestProject
      command: exit 1
      expect: fail
      marks: reproduced_as_fail
  final:
    - name: ComputeMetrics
      command: echo "$REPAIRFLOW_BUGGY_BUILD_ID" > metrics.txt
    - name: PushBuild
      command: "true"
      requires_push: true
"#;

fn repairflow(dir: &Path) -> Command {
    let mut cmd = Command::cargo_bin("repairflow").unwrap();
    cmd.current_dir(dir).env("NO_COLOR", "1");
    cmd
}

fn project(config: &str) -> TempDir {
    let temp = TempDir::new().unwrap();
    std::fs::write(temp.path().join(".repairflow.yaml"), config).unwrap();
    temp
}

#[test]
fn validate_accepts_pipeline() {
    let temp = project(PIPELINE);

    repairflow(temp.path())
        .arg("validate")
        .assert()
        .success()
        .stdout(predicate::str::contains("Configuration is valid"));
}

#[test]
fn validate_rejects_empty_command() {
    let temp = project(
        r#"
pipeline:
  prefix:
    - name: CloneRepository
      command: ""
"#,
    );

    repairflow(temp.path())
        .arg("validate")
        .assert()
        .failure()
        .stdout(predicate::str::contains("command is empty"));
}

#[test]
fn plan_lists_chain_without_running_it() {
    let temp = project(PIPELINE);

    repairflow(temp.path())
        .args(["plan", "--tool", "NpeFix"])
        .assert()
        .success()
        .stdout(predicate::str::contains("CloneRepository"))
        .stdout(predicate::str::contains("-- final segment --"))
        .stdout(predicate::str::contains("NpeFix").and(predicate::str::contains("not defined")));

    assert!(!temp.path().join("workspace").exists());
}

#[test]
fn run_then_report() {
    let temp = project(PIPELINE);

    repairflow(temp.path())
        .args([
            "run",
            "--slug",
            "surli/failingProject",
            "--buggy-build",
            "42",
            "--buggy-finished-at",
            "2017-03-02T14:05:09Z",
        ])
        .assert()
        .success()
        .stdout(predicate::str::contains("PushBuild"))
        .stdout(predicate::str::contains("SKIPPED"))
        .stdout(predicate::str::contains("TEST FAILURE"));

    let repo = temp.path().join("workspace/surli/failingProject/42");
    assert_eq!(
        std::fs::read_to_string(repo.join("metrics.txt")).unwrap().trim(),
        "42"
    );

    let document = temp
        .path()
        .join("workspace/reports/repairflow-surli-failingProject-42.json");
    assert!(document.exists());

    repairflow(temp.path())
        .arg("report")
        .arg(&document)
        .assert()
        .success()
        .stdout(predicate::str::contains("surli/failingProject build 42"))
        .stdout(predicate::str::contains("TEST FAILURE"));
}

#[test]
fn run_skips_passing_builds() {
    let temp = project(PIPELINE);

    repairflow(temp.path())
        .args([
            "run",
            "--slug",
            "surli/failingProject",
            "--buggy-build",
            "42",
            "--status",
            "passing_passing",
        ])
        .assert()
        .success()
        .stdout(predicate::str::contains("nothing to inspect"));

    assert!(!temp.path().join("workspace/reports").exists());
}

#[test]
fn run_fails_on_fatal_fault() {
    let temp = project(
        r#"
shell: repairflow-no-such-shell
pipeline:
  prefix:
    - name: CloneRepository
      command: "true"
      workdir: workspace
  final:
    - name: ComputeMetrics
      command: "true"
      workdir: workspace
"#,
    );

    repairflow(temp.path())
        .args(["run", "--slug", "surli/failingProject", "--buggy-build", "7"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("Pipeline aborted"));

    assert!(temp
        .path()
        .join("workspace/reports/repairflow-surli-failingProject-7.json")
        .exists());
}

#[test]
fn report_missing_file() {
    let temp = TempDir::new().unwrap();

    repairflow(temp.path())
        .args(["report", "missing.json"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("Run document not found"));
}

#[test]
fn run_refuses_invalid_config() {
    let temp = project(
        r#"
pipeline:
  prefix:
    - name: CloneRepository
      command: ""
"#,
    );

    repairflow(temp.path())
        .args(["run", "--slug", "surli/failingProject", "--buggy-build", "7"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("Invalid configuration"));

    assert!(!temp.path().join("workspace").exists());
}
