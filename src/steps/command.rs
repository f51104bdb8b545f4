// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 repairflow contributors

//! Shell command step
//!
//! Runs a configured command with the run context exported as environment
//! variables, and maps its exit status to a step outcome.

use async_trait::async_trait;
use std::path::{Path, PathBuf};
use std::process::Output;
use std::time::Duration;
use tokio::process::Command;
use tracing::{debug, warn};

use crate::config::{ConfigProvider, Expectation, FailurePolicy, JobFlag, StepSpec, WorkDir};
use crate::errors::{RepairflowError, RepairflowResult};
use crate::inspector::RunContext;
use crate::pipeline::{JobStatus, Step, StepContext, StepOutcome};

/// A step backed by a shell command
pub struct CommandStep {
    spec: StepSpec,
    shell: String,
}

impl CommandStep {
    pub fn new(spec: StepSpec, shell: impl Into<String>) -> Self {
        Self {
            spec,
            shell: shell.into(),
        }
    }

    pub fn boxed(spec: StepSpec, shell: impl Into<String>) -> Box<dyn Step> {
        Box::new(Self::new(spec, shell))
    }

    fn working_dir<'a>(&self, run: &'a RunContext) -> &'a Path {
        match self.spec.workdir {
            WorkDir::Workspace => run.workspace(),
            WorkDir::Repo => run.repo_local_path(),
            WorkDir::PushRepo => run.repo_to_push_local_path(),
        }
    }

    /// Log file name, e.g. `repairflow.buildproject.log`
    pub fn log_file_name(&self) -> String {
        format!("repairflow.{}.log", self.spec.name.to_lowercase())
    }

    fn failed(&self, default: String) -> StepOutcome {
        let outcome = StepOutcome::failure(self.spec.diagnostic.clone().unwrap_or(default));
        match self.spec.on_failure {
            FailurePolicy::Continue => outcome.continuing(),
            FailurePolicy::Halt => outcome,
        }
    }

    async fn write_log(&self, run: &RunContext, output: &Output) -> Option<PathBuf> {
        let path = run.log_dir().join(self.log_file_name());
        let mut content = format!("$ {}\n", self.spec.command);
        content.push_str(&String::from_utf8_lossy(&output.stdout));
        content.push_str(&String::from_utf8_lossy(&output.stderr));

        let written = async {
            tokio::fs::create_dir_all(run.log_dir()).await?;
            tokio::fs::write(&path, content).await
        }
        .await;

        match written {
            Ok(()) => Some(path),
            Err(e) => {
                warn!("Cannot write log file {}: {}", path.display(), e);
                None
            }
        }
    }

    fn apply_mark(&self, job_status: &mut JobStatus) {
        match self.spec.marks {
            Some(JobFlag::ReproducedAsFail) => job_status.mark_reproduced_as_fail(),
            Some(JobFlag::Patched) => job_status.mark_patched(),
            None => {}
        }
    }
}

#[async_trait]
impl Step for CommandStep {
    fn name(&self) -> &str {
        &self.spec.name
    }

    fn skip_reason(&self, config: &dyn ConfigProvider) -> Option<String> {
        (self.spec.requires_push && !config.is_push())
            .then(|| "configured NOT to push".to_string())
    }

    async fn execute(&self, ctx: &mut StepContext<'_>) -> RepairflowResult<StepOutcome> {
        let dir = self.working_dir(ctx.run);

        if self.spec.workdir == WorkDir::Workspace {
            tokio::fs::create_dir_all(dir).await.map_err(|e| {
                RepairflowError::FileWriteError {
                    path: dir.to_path_buf(),
                    error: e.to_string(),
                }
            })?;
        } else if !dir.is_dir() {
            return Ok(self.failed(format!(
                "working directory {} does not exist",
                dir.display()
            )));
        }

        debug!("Step {}: {} -c '{}'", self.spec.name, self.shell, self.spec.command);

        let mut cmd = Command::new(&self.shell);
        cmd.arg("-c")
            .arg(&self.spec.command)
            .current_dir(dir)
            .envs(ctx.run.env_vars())
            .kill_on_drop(true);

        let output = match self.spec.timeout_secs {
            Some(secs) => {
                match tokio::time::timeout(Duration::from_secs(secs), cmd.output()).await {
                    Ok(output) => output,
                    Err(_) => return Ok(self.failed(format!("timed out after {}s", secs))),
                }
            }
            None => cmd.output().await,
        }
        .map_err(|e| RepairflowError::step_spawn_failed(&self.spec.name, &self.shell, &e))?;

        if let Some(path) = self.write_log(ctx.run, &output).await {
            ctx.job_status.add_log_file(path);
        }

        let passed = output.status.success() == (self.spec.expect == Expectation::Pass);
        if passed {
            self.apply_mark(ctx.job_status);
            return Ok(StepOutcome::success());
        }

        let default = match self.spec.expect {
            Expectation::Fail => format!("{}: build did not fail", self.spec.name),
            Expectation::Pass => match output.status.code() {
                Some(code) => format!("{} exited with code {}", self.spec.name, code),
                None => format!("{} was terminated by a signal", self.spec.name),
            },
        };
        Ok(self.failed(default))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::RepairConfig;
    use crate::inspector::ScannedBuildStatus;
    use crate::pipeline::StepStatus;
    use crate::testutil::sample_build;
    use tempfile::TempDir;

    fn spec(name: &str, command: &str) -> StepSpec {
        StepSpec {
            name: name.into(),
            command: command.into(),
            on_failure: FailurePolicy::Halt,
            expect: Expectation::Pass,
            marks: None,
            requires_push: false,
            timeout_secs: None,
            workdir: WorkDir::Workspace,
            diagnostic: None,
        }
    }

    async fn run_step(step: &CommandStep, workspace: &Path) -> (StepOutcome, JobStatus) {
        let run = RunContext::new(
            sample_build(ScannedBuildStatus::FailingAndPassing),
            workspace.to_path_buf(),
        );
        let config = RepairConfig::default();
        let mut status = JobStatus::new();
        let outcome = {
            let mut ctx = StepContext {
                run: &run,
                config: &config,
                job_status: &mut status,
            };
            step.execute(&mut ctx).await.unwrap()
        };
        (outcome, status)
    }

    #[tokio::test]
    async fn test_successful_command_writes_log() {
        let temp = TempDir::new().unwrap();
        let step = CommandStep::new(spec("Echo", "echo $REPAIRFLOW_REPO_SLUG"), "bash");

        let (outcome, status) = run_step(&step, temp.path()).await;

        assert_eq!(outcome.status, StepStatus::Success);
        let log = std::fs::read_to_string(&status.log_files()[0]).unwrap();
        assert!(log.contains("surli/failingProject"));
        assert!(status.log_files()[0].ends_with("repairflow.echo.log"));
    }

    #[tokio::test]
    async fn test_failing_command_halts_by_default() {
        let temp = TempDir::new().unwrap();
        let step = CommandStep::new(spec("Build", "exit 3"), "bash");

        let (outcome, _) = run_step(&step, temp.path()).await;

        assert!(outcome.halts());
        assert_eq!(outcome.diagnostic.as_deref(), Some("Build exited with code 3"));
    }

    #[tokio::test]
    async fn test_expected_failure_marks_reproduced() {
        let temp = TempDir::new().unwrap();
        let mut s = spec("TestProject", "exit 1");
        s.expect = Expectation::Fail;
        s.marks = Some(JobFlag::ReproducedAsFail);
        let step = CommandStep::new(s, "bash");

        let (outcome, status) = run_step(&step, temp.path()).await;

        assert_eq!(outcome.status, StepStatus::Success);
        assert!(status.is_reproduced_as_fail());
    }

    #[tokio::test]
    async fn test_passing_build_when_failure_expected() {
        let temp = TempDir::new().unwrap();
        let mut s = spec("TestProject", "true");
        s.expect = Expectation::Fail;
        s.on_failure = FailurePolicy::Continue;
        let step = CommandStep::new(s, "bash");

        let (outcome, status) = run_step(&step, temp.path()).await;

        assert_eq!(outcome.status, StepStatus::Failure);
        assert!(!outcome.halts());
        assert!(!status.is_reproduced_as_fail());
        assert_eq!(
            outcome.diagnostic.as_deref(),
            Some("TestProject: build did not fail")
        );
    }

    #[tokio::test]
    async fn test_timeout_is_a_failure() {
        let temp = TempDir::new().unwrap();
        let mut s = spec("Slow", "sleep 5");
        s.timeout_secs = Some(1);
        s.diagnostic = None;
        let step = CommandStep::new(s, "bash");

        let (outcome, _) = run_step(&step, temp.path()).await;

        assert_eq!(outcome.diagnostic.as_deref(), Some("timed out after 1s"));
    }

    #[tokio::test]
    async fn test_missing_repo_dir_is_a_failure() {
        let temp = TempDir::new().unwrap();
        let mut s = spec("BuildProject", "mvn compile");
        s.workdir = WorkDir::Repo;
        let step = CommandStep::new(s, "bash");

        let (outcome, _) = run_step(&step, temp.path()).await;

        assert!(outcome.halts());
        assert!(outcome.diagnostic.unwrap().contains("does not exist"));
    }

    #[test]
    fn test_push_steps_skip_without_push() {
        let mut s = spec("PushProcessEnd", "git push");
        s.requires_push = true;
        let step = CommandStep::new(s, "bash");

        assert!(step.skip_reason(&RepairConfig::default()).is_some());
        assert!(step
            .skip_reason(&RepairConfig::default().with_overrides(true, vec![]))
            .is_none());
    }
}
