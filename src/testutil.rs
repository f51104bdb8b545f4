// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 repairflow contributors

//! Shared test utilities
//!
//! Scripted steps and recording collaborators. Only compiled in test builds.

use async_trait::async_trait;
use chrono::{TimeZone, Utc};
use std::collections::HashSet;
use std::path::PathBuf;
use std::sync::{Arc, Mutex};

use crate::config::ConfigProvider;
use crate::errors::{RepairflowError, RepairflowResult};
use crate::inspector::{BuildInfo, BuildToInspect, RunContext, ScannedBuildStatus};
use crate::output::{Notifier, RunDocument, Serializer};
use crate::pipeline::{
    JobStatus, MemoryProbe, Step, StepContext, StepOutcome, StepResolver,
};

#[derive(Debug, Clone)]
enum Script {
    Outcome(StepOutcome),
    Fault(String),
    Panic,
    PushOnly,
    MarkReproduced,
    MarkPatched,
    RequireReproduced,
}

/// A step whose behavior is fixed up front
pub struct ScriptedStep {
    name: String,
    script: Script,
}

impl ScriptedStep {
    fn boxed(name: &str, script: Script) -> Box<dyn Step> {
        Box::new(Self {
            name: name.to_string(),
            script,
        })
    }

    pub fn ok(name: &str) -> Box<dyn Step> {
        Self::boxed(name, Script::Outcome(StepOutcome::success()))
    }

    pub fn halt(name: &str, diagnostic: &str) -> Box<dyn Step> {
        Self::boxed(name, Script::Outcome(StepOutcome::failure(diagnostic)))
    }

    pub fn soft_fail(name: &str, diagnostic: &str) -> Box<dyn Step> {
        Self::boxed(
            name,
            Script::Outcome(StepOutcome::failure(diagnostic).continuing()),
        )
    }

    pub fn fault(name: &str, message: &str) -> Box<dyn Step> {
        Self::boxed(name, Script::Fault(message.to_string()))
    }

    /// Panics with an out-of-bounds index
    pub fn panics(name: &str) -> Box<dyn Step> {
        Self::boxed(name, Script::Panic)
    }

    pub fn push_only(name: &str) -> Box<dyn Step> {
        Self::boxed(name, Script::PushOnly)
    }

    pub fn marks_reproduced(name: &str) -> Box<dyn Step> {
        Self::boxed(name, Script::MarkReproduced)
    }

    pub fn marks_patched(name: &str) -> Box<dyn Step> {
        Self::boxed(name, Script::MarkPatched)
    }

    pub fn requires_reproduced(name: &str) -> Box<dyn Step> {
        Self::boxed(name, Script::RequireReproduced)
    }
}

#[async_trait]
impl Step for ScriptedStep {
    fn name(&self) -> &str {
        &self.name
    }

    fn skip_reason(&self, config: &dyn ConfigProvider) -> Option<String> {
        match self.script {
            Script::PushOnly if !config.is_push() => Some("push is disabled".into()),
            _ => None,
        }
    }

    async fn execute(&self, ctx: &mut StepContext<'_>) -> RepairflowResult<StepOutcome> {
        match &self.script {
            Script::Outcome(outcome) => Ok(outcome.clone()),
            Script::Fault(message) => Err(RepairflowError::StepExecutionFailed {
                step: self.name.clone(),
                error: message.clone(),
                help: None,
            }),
            Script::Panic => {
                let artifacts: Vec<usize> = Vec::new();
                let first = artifacts.iter().position(|a| *a == 0).unwrap_or(3);
                Ok(StepOutcome::failure(format!("artifact {}", artifacts[first])))
            }
            Script::PushOnly => Ok(StepOutcome::success()),
            Script::MarkReproduced => {
                ctx.job_status.mark_reproduced_as_fail();
                Ok(StepOutcome::success())
            }
            Script::MarkPatched => {
                ctx.job_status.mark_patched();
                Ok(StepOutcome::success())
            }
            Script::RequireReproduced => {
                if ctx.job_status.is_reproduced_as_fail() {
                    Ok(StepOutcome::success())
                } else {
                    Ok(StepOutcome::failure("failure was not reproduced"))
                }
            }
        }
    }
}

/// Resolves only the names it was created with
pub struct MapResolver {
    known: HashSet<String>,
}

impl MapResolver {
    pub fn new(names: &[&str]) -> Self {
        Self {
            known: names.iter().map(|n| n.to_string()).collect(),
        }
    }
}

impl StepResolver for MapResolver {
    fn resolve(&self, name: &str) -> Option<Box<dyn Step>> {
        self.known.contains(name).then(|| ScriptedStep::ok(name))
    }
}

/// Always reports the same free memory
pub struct FixedMemoryProbe(pub u64);

impl MemoryProbe for FixedMemoryProbe {
    fn free_memory(&self) -> Option<u64> {
        Some(self.0)
    }
}

pub fn sample_build(status: ScannedBuildStatus) -> BuildToInspect {
    BuildToInspect {
        repo_slug: "surli/failingProject".into(),
        buggy_build: BuildInfo {
            id: 207924136,
            finished_at: Utc.with_ymd_and_hms(2017, 3, 2, 14, 5, 9).unwrap(),
            pull_request: None,
        },
        patched_build: Some(BuildInfo {
            id: 207932548,
            finished_at: Utc.with_ymd_and_hms(2017, 3, 2, 15, 0, 0).unwrap(),
            pull_request: None,
        }),
        status,
    }
}

pub fn sample_context() -> RunContext {
    RunContext::new(
        sample_build(ScannedBuildStatus::FailingAndPassing),
        PathBuf::from("/tmp/repairflow-tests"),
    )
}

/// Everything a recording collaborator saw
#[derive(Debug, Default)]
pub struct Recorded {
    pub calls: Vec<JobStatus>,
}

/// Serializer that stores each job status it receives
pub struct RecordingSerializer {
    pub seen: Arc<Mutex<Recorded>>,
    pub fail: bool,
}

impl RecordingSerializer {
    pub fn new(fail: bool) -> (Self, Arc<Mutex<Recorded>>) {
        let seen = Arc::new(Mutex::new(Recorded::default()));
        (
            Self {
                seen: Arc::clone(&seen),
                fail,
            },
            seen,
        )
    }
}

impl Serializer for RecordingSerializer {
    fn name(&self) -> &str {
        "recording"
    }

    fn serialize(&self, document: &RunDocument) -> RepairflowResult<()> {
        self.seen.lock().unwrap().calls.push(document.job_status.clone());
        if self.fail {
            return Err(RepairflowError::SerializerFailed {
                serializer: "recording".into(),
                message: "disk full".into(),
            });
        }
        Ok(())
    }
}

/// Notifier that stores each job status it observes
pub struct RecordingNotifier {
    pub seen: Arc<Mutex<Recorded>>,
    pub fail: bool,
}

impl RecordingNotifier {
    pub fn new() -> (Self, Arc<Mutex<Recorded>>) {
        Self::with_failure(false)
    }

    /// Records the call, then reports an error
    pub fn failing() -> (Self, Arc<Mutex<Recorded>>) {
        Self::with_failure(true)
    }

    fn with_failure(fail: bool) -> (Self, Arc<Mutex<Recorded>>) {
        let seen = Arc::new(Mutex::new(Recorded::default()));
        (
            Self {
                seen: Arc::clone(&seen),
                fail,
            },
            seen,
        )
    }
}

impl Notifier for RecordingNotifier {
    fn name(&self) -> &str {
        "recording"
    }

    fn observe(&self, _run: &RunContext, job_status: &JobStatus) -> RepairflowResult<()> {
        self.seen.lock().unwrap().calls.push(job_status.clone());
        if self.fail {
            return Err(RepairflowError::NotifierFailed {
                notifier: "recording".into(),
                message: "mail server unreachable".into(),
            });
        }
        Ok(())
    }
}
