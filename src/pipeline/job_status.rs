// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 repairflow contributors

//! Run-scoped job status
//!
//! Append-only record of what happened during one run. Serializable so the
//! execution summary can be rebuilt from a persisted copy.

use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::path::PathBuf;
use std::time::Duration;

use crate::pipeline::{StepOutcome, StepStatus};

/// Step name used for faults raised outside any step
pub const UNKNOWN_STEP: &str = "Unknown";

/// Outcome of one executed step
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct StepRecord {
    /// Position in the chain
    pub index: usize,
    pub name: String,
    pub status: StepStatus,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub diagnostic: Option<String>,
    /// Absent for skipped steps
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub duration_ms: Option<u64>,
}

impl StepRecord {
    pub fn from_outcome(
        index: usize,
        name: &str,
        outcome: &StepOutcome,
        duration: Option<Duration>,
    ) -> Self {
        Self {
            index,
            name: name.to_string(),
            status: outcome.status,
            diagnostic: outcome.diagnostic.clone(),
            duration_ms: duration.map(|d| d.as_millis() as u64),
        }
    }

    /// Whole seconds, as shown in the summary
    pub fn duration_secs(&self) -> Option<u64> {
        self.duration_ms.map(|ms| ms / 1000)
    }
}

/// The single unexpected fault of a run
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FatalError {
    /// Originating step, or [`UNKNOWN_STEP`]
    pub step: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub index: Option<usize>,
    pub message: String,
}

/// Facts about the inspected build gathered when the run starts
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct RunProperties {
    /// `only_fail`, `failing_passing` or `passing_passing`
    pub build_type: String,
    pub repository: String,
    pub buggy_build_id: u64,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub patched_build_id: Option<u64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub pull_request: Option<u64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub host_name: Option<String>,
}

/// Shared, append-only state of one run
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct JobStatus {
    #[serde(default)]
    steps: Vec<StepRecord>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    fatal_error: Option<FatalError>,
    #[serde(default)]
    free_memory_by_step: BTreeMap<String, u64>,
    #[serde(default)]
    has_been_patched: bool,
    #[serde(default)]
    reproduced_as_fail: bool,
    #[serde(default)]
    log_files: Vec<PathBuf>,
    #[serde(default)]
    properties: RunProperties,
}

impl JobStatus {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_properties(properties: RunProperties) -> Self {
        Self {
            properties,
            ..Self::default()
        }
    }

    /// Append a step record (execution order)
    pub fn record(&mut self, record: StepRecord) {
        self.steps.push(record);
    }

    pub fn steps(&self) -> &[StepRecord] {
        &self.steps
    }

    /// Record of the step at chain position `index`, if it ran
    pub fn step_at(&self, index: usize) -> Option<&StepRecord> {
        self.steps.iter().find(|s| s.index == index)
    }

    /// Record the run's fatal error; only the first one is kept
    ///
    /// Returns false if a fatal error was already recorded.
    pub fn set_fatal_error(&mut self, error: FatalError) -> bool {
        if self.fatal_error.is_some() {
            return false;
        }
        self.fatal_error = Some(error);
        true
    }

    pub fn fatal_error(&self) -> Option<&FatalError> {
        self.fatal_error.as_ref()
    }

    pub fn record_free_memory(&mut self, step: &str, bytes: u64) {
        self.free_memory_by_step.insert(step.to_string(), bytes);
    }

    pub fn free_memory_by_step(&self) -> &BTreeMap<String, u64> {
        &self.free_memory_by_step
    }

    pub fn mark_patched(&mut self) {
        self.has_been_patched = true;
    }

    pub fn has_been_patched(&self) -> bool {
        self.has_been_patched
    }

    pub fn mark_reproduced_as_fail(&mut self) {
        self.reproduced_as_fail = true;
    }

    pub fn is_reproduced_as_fail(&self) -> bool {
        self.reproduced_as_fail
    }

    pub fn add_log_file(&mut self, path: PathBuf) {
        if !self.log_files.contains(&path) {
            self.log_files.push(path);
        }
    }

    pub fn log_files(&self) -> &[PathBuf] {
        &self.log_files
    }

    pub fn properties(&self) -> &RunProperties {
        &self.properties
    }
}
