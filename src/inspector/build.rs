// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 repairflow contributors

//! Inspected build and run context

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

use crate::errors::{RepairflowError, RepairflowResult};
use crate::pipeline::RunProperties;

/// How the scanner classified the build pair
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum ScannedBuildStatus {
    /// Failing build with no passing successor
    #[serde(rename = "only_fail")]
    OnlyFail,
    /// Failing build followed by a passing one
    #[serde(rename = "failing_passing")]
    FailingAndPassing,
    /// Passing build followed by a passing one with test changes
    #[serde(rename = "passing_passing")]
    PassingAndPassingWithTestChanges,
}

impl ScannedBuildStatus {
    pub fn label(&self) -> &'static str {
        match self {
            Self::OnlyFail => "only_fail",
            Self::FailingAndPassing => "failing_passing",
            Self::PassingAndPassingWithTestChanges => "passing_passing",
        }
    }

    /// Repair runs only inspect builds that actually failed
    pub fn is_inspectable(&self) -> bool {
        !matches!(self, Self::PassingAndPassingWithTestChanges)
    }
}

impl std::str::FromStr for ScannedBuildStatus {
    type Err = RepairflowError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "only_fail" => Ok(Self::OnlyFail),
            "failing_passing" => Ok(Self::FailingAndPassing),
            "passing_passing" => Ok(Self::PassingAndPassingWithTestChanges),
            _ => Err(RepairflowError::UnknownBuildStatus {
                value: s.to_string(),
            }),
        }
    }
}

impl std::fmt::Display for ScannedBuildStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.label())
    }
}

/// One CI build
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct BuildInfo {
    pub id: u64,
    pub finished_at: DateTime<Utc>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub pull_request: Option<u64>,
}

/// The build pair handed to the inspector
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct BuildToInspect {
    /// `owner/name`
    pub repo_slug: String,
    pub buggy_build: BuildInfo,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub patched_build: Option<BuildInfo>,
    pub status: ScannedBuildStatus,
}

impl BuildToInspect {
    /// Check the slug has the `owner/name` shape
    pub fn validate(&self) -> RepairflowResult<()> {
        match self.repo_slug.split_once('/') {
            Some((owner, name)) if !owner.is_empty() && !name.is_empty() && !name.contains('/') => {
                Ok(())
            }
            _ => Err(RepairflowError::InvalidSlug {
                slug: self.repo_slug.clone(),
            }),
        }
    }
}

/// Immutable facts about one run, shared with steps and collaborators
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RunContext {
    build: BuildToInspect,
    workspace: PathBuf,
    repo_local_path: PathBuf,
    repo_to_push_local_path: PathBuf,
    m2_local_path: PathBuf,
    log_dir: PathBuf,
}

impl RunContext {
    pub fn new(build: BuildToInspect, workspace: PathBuf) -> Self {
        let repo_local_path = workspace
            .join(&build.repo_slug)
            .join(build.buggy_build.id.to_string());

        let mut push_path = repo_local_path.clone().into_os_string();
        push_path.push("_topush");

        let m2_local_path = repo_local_path.join(".m2");
        let log_dir = workspace.join("logs").join(format!(
            "{}-{}",
            build.repo_slug.replace('/', "-"),
            build.buggy_build.id
        ));

        Self {
            build,
            workspace,
            repo_local_path,
            repo_to_push_local_path: PathBuf::from(push_path),
            m2_local_path,
            log_dir,
        }
    }

    pub fn build(&self) -> &BuildToInspect {
        &self.build
    }

    pub fn repo_slug(&self) -> &str {
        &self.build.repo_slug
    }

    pub fn buggy_build(&self) -> &BuildInfo {
        &self.build.buggy_build
    }

    pub fn patched_build(&self) -> Option<&BuildInfo> {
        self.build.patched_build.as_ref()
    }

    pub fn workspace(&self) -> &Path {
        &self.workspace
    }

    pub fn repo_local_path(&self) -> &Path {
        &self.repo_local_path
    }

    pub fn repo_to_push_local_path(&self) -> &Path {
        &self.repo_to_push_local_path
    }

    pub fn m2_local_path(&self) -> &Path {
        &self.m2_local_path
    }

    /// Where steps write their output logs
    pub fn log_dir(&self) -> &Path {
        &self.log_dir
    }

    /// Branch name used when pushing results
    pub fn remote_branch_name(&self) -> String {
        format!(
            "{}-{}-{}",
            self.build.repo_slug.replace('/', "-"),
            self.build.buggy_build.id,
            self.build.buggy_build.finished_at.format("%Y%m%d-%H%M%S")
        )
    }

    /// Properties recorded in the job status when the run starts
    pub fn properties(&self, host_name: Option<String>) -> RunProperties {
        RunProperties {
            build_type: self.build.status.label().to_string(),
            repository: self.build.repo_slug.clone(),
            buggy_build_id: self.build.buggy_build.id,
            patched_build_id: self.build.patched_build.as_ref().map(|b| b.id),
            pull_request: self.build.buggy_build.pull_request,
            host_name,
        }
    }

    /// Environment variables exposing this context to external commands
    pub fn env_vars(&self) -> Vec<(&'static str, String)> {
        let display = |p: &Path| p.display().to_string();
        vec![
            ("REPAIRFLOW_REPO_SLUG", self.build.repo_slug.clone()),
            ("REPAIRFLOW_WORKSPACE", display(&self.workspace)),
            ("REPAIRFLOW_REPO_PATH", display(&self.repo_local_path)),
            ("REPAIRFLOW_PUSH_REPO_PATH", display(&self.repo_to_push_local_path)),
            ("REPAIRFLOW_M2_PATH", display(&self.m2_local_path)),
            ("REPAIRFLOW_BUGGY_BUILD_ID", self.build.buggy_build.id.to_string()),
            (
                "REPAIRFLOW_PATCHED_BUILD_ID",
                self.build
                    .patched_build
                    .as_ref()
                    .map(|b| b.id.to_string())
                    .unwrap_or_default(),
            ),
            ("REPAIRFLOW_BRANCH", self.remote_branch_name()),
        ]
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::testutil::{sample_build, sample_context};

    #[test]
    fn test_paths_derive_from_slug_and_build() {
        let ctx = sample_context();

        assert_eq!(
            ctx.repo_local_path(),
            Path::new("/tmp/repairflow-tests/surli/failingProject/207924136")
        );
        assert_eq!(
            ctx.repo_to_push_local_path(),
            Path::new("/tmp/repairflow-tests/surli/failingProject/207924136_topush")
        );
        assert_eq!(
            ctx.m2_local_path(),
            Path::new("/tmp/repairflow-tests/surli/failingProject/207924136/.m2")
        );
    }

    #[test]
    fn test_remote_branch_name() {
        let ctx = sample_context();
        assert_eq!(
            ctx.remote_branch_name(),
            "surli-failingProject-207924136-20170302-140509"
        );
    }

    #[test]
    fn test_status_parsing() {
        assert_eq!(
            "failing_passing".parse::<ScannedBuildStatus>().unwrap(),
            ScannedBuildStatus::FailingAndPassing
        );
        assert!("flaky".parse::<ScannedBuildStatus>().is_err());
        assert!(!ScannedBuildStatus::PassingAndPassingWithTestChanges.is_inspectable());
    }

    #[test]
    fn test_slug_validation() {
        let mut build = sample_build(ScannedBuildStatus::OnlyFail);
        assert!(build.validate().is_ok());

        build.repo_slug = "no-owner".into();
        assert!(matches!(
            build.validate(),
            Err(RepairflowError::InvalidSlug { .. })
        ));
    }

    #[test]
    fn test_properties_capture_build_pair() {
        let props = sample_context().properties(Some("ci-runner".into()));
        assert_eq!(props.build_type, "failing_passing");
        assert_eq!(props.patched_build_id, Some(207932548));
        assert_eq!(props.host_name.as_deref(), Some("ci-runner"));
    }
}
