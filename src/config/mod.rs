// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 repairflow contributors

//! Configuration
//!
//! Defines the schema for `.repairflow.yaml` files: where the workspace
//! lives, whether results are pushed, which repair tools run, and the shell
//! commands behind every pipeline step.

mod validation;

pub use validation::{ConfigValidator, ValidationResult};

use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::path::{Path, PathBuf};

use crate::errors::{RepairflowError, RepairflowResult};

/// Default configuration file name
pub const DEFAULT_CONFIG_FILE: &str = ".repairflow.yaml";

/// Settings queried while the chain is built
pub trait ConfigProvider: Send + Sync {
    /// Whether results are pushed to a remote
    fn is_push(&self) -> bool;

    /// Repair tools to insert, in order
    fn repair_tools(&self) -> &[String];
}

/// Top-level configuration document
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RepairConfig {
    /// Root directory for checkouts and logs
    #[serde(default = "default_workspace")]
    pub workspace: PathBuf,

    /// Push results (enables steps marked `requires_push`)
    #[serde(default)]
    pub push: bool,

    /// Shell used to run step commands
    #[serde(default = "default_shell")]
    pub shell: String,

    /// Repair tools to run, by name
    #[serde(default)]
    pub repair_tools: Vec<String>,

    /// Fixed pipeline steps
    #[serde(default)]
    pub pipeline: PipelineLayout,

    /// Repair tool definitions, keyed by name
    #[serde(default)]
    pub tools: BTreeMap<String, StepSpec>,
}

impl Default for RepairConfig {
    fn default() -> Self {
        Self {
            workspace: default_workspace(),
            push: false,
            shell: default_shell(),
            repair_tools: Vec::new(),
            pipeline: PipelineLayout::default(),
            tools: BTreeMap::new(),
        }
    }
}

fn default_workspace() -> PathBuf {
    PathBuf::from("./workspace")
}

fn default_shell() -> String {
    "bash".to_string()
}

impl RepairConfig {
    /// Load configuration, choosing the parser from the file extension
    pub fn from_file(path: &Path) -> RepairflowResult<Self> {
        if !path.exists() {
            return Err(RepairflowError::ConfigNotFound {
                path: path.to_path_buf(),
            });
        }

        let content = std::fs::read_to_string(path).map_err(|e| RepairflowError::FileReadError {
            path: path.to_path_buf(),
            error: e.to_string(),
        })?;

        match path.extension().and_then(|e| e.to_str()) {
            Some("yaml") | Some("yml") => Self::from_yaml(&content),
            Some("toml") => Self::from_toml(&content),
            Some("json") => serde_json::from_str(&content).map_err(Into::into),
            _ => Err(RepairflowError::UnsupportedFormat {
                path: path.to_path_buf(),
            }),
        }
    }

    /// Parse configuration from YAML
    pub fn from_yaml(yaml: &str) -> RepairflowResult<Self> {
        serde_yaml::from_str(yaml).map_err(Into::into)
    }

    /// Parse configuration from TOML
    pub fn from_toml(content: &str) -> RepairflowResult<Self> {
        toml::from_str(content).map_err(Into::into)
    }

    /// Serialize configuration to YAML
    pub fn to_yaml(&self) -> RepairflowResult<String> {
        serde_yaml::to_string(self).map_err(Into::into)
    }

    /// Apply command-line overrides
    pub fn with_overrides(mut self, push: bool, tools: Vec<String>) -> Self {
        if push {
            self.push = true;
        }
        if !tools.is_empty() {
            self.repair_tools = tools;
        }
        self
    }

    /// Definition of a repair tool, named after its map key
    pub fn tool(&self, name: &str) -> Option<StepSpec> {
        self.tools.get(name).map(|spec| StepSpec {
            name: name.to_string(),
            ..spec.clone()
        })
    }
}

impl ConfigProvider for RepairConfig {
    fn is_push(&self) -> bool {
        self.push
    }

    fn repair_tools(&self) -> &[String] {
        &self.repair_tools
    }
}

/// The fixed parts of the chain around the repair tools
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct PipelineLayout {
    /// Steps before the repair tools (clone, reproduce, ...)
    #[serde(default)]
    pub prefix: Vec<StepSpec>,

    /// Steps after the repair tools (check the human patch, ...)
    #[serde(default)]
    pub suffix: Vec<StepSpec>,

    /// Steps that always run once a failure has been classified
    #[serde(default, rename = "final")]
    pub final_segment: Vec<StepSpec>,
}

impl PipelineLayout {
    pub fn is_empty(&self) -> bool {
        self.prefix.is_empty() && self.suffix.is_empty() && self.final_segment.is_empty()
    }

    /// All fixed steps in chain order
    pub fn all(&self) -> impl Iterator<Item = &StepSpec> {
        self.prefix
            .iter()
            .chain(self.suffix.iter())
            .chain(self.final_segment.iter())
    }
}

/// A shell-command step
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct StepSpec {
    /// Step name (taken from the map key for tools)
    #[serde(default)]
    pub name: String,

    /// Command passed to `<shell> -c`
    pub command: String,

    /// What happens to the chain when the step fails
    #[serde(default)]
    pub on_failure: FailurePolicy,

    /// Exit status that counts as success
    #[serde(default)]
    pub expect: Expectation,

    /// Job flag set when the step succeeds
    #[serde(default)]
    pub marks: Option<JobFlag>,

    /// Skip unless pushing is enabled
    #[serde(default)]
    pub requires_push: bool,

    /// Kill the command after this many seconds
    #[serde(default)]
    pub timeout_secs: Option<u64>,

    /// Directory the command runs in
    #[serde(default)]
    pub workdir: WorkDir,

    /// Failure text reported instead of the default one
    #[serde(default)]
    pub diagnostic: Option<String>,
}

/// Chain behavior after a failed step
#[derive(Debug, Clone, Copy, Default, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum FailurePolicy {
    /// Stop the regular chain and jump to the final segment
    #[default]
    Halt,
    /// Proceed to the next step
    Continue,
}

/// Which exit status counts as success
#[derive(Debug, Clone, Copy, Default, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum Expectation {
    #[default]
    Pass,
    /// Used to reproduce a failing build
    Fail,
}

/// Job status flags a step may set
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "snake_case")]
pub enum JobFlag {
    ReproducedAsFail,
    Patched,
}

/// Working directory of a command step
#[derive(Debug, Clone, Copy, Default, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "snake_case")]
pub enum WorkDir {
    Workspace,
    #[default]
    Repo,
    PushRepo,
}
