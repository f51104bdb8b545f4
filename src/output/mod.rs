// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 repairflow contributors

//! Reporting collaborators
//!
//! Serializers persist every run. Notifiers are told about runs they are
//! interested in, by default only runs that ended in a fatal error.

mod json;
mod notifier;

pub use json::JsonSerializer;
pub use notifier::LogNotifier;

use serde::{Deserialize, Serialize};
use std::path::Path;

use crate::errors::{RepairflowError, RepairflowResult};
use crate::inspector::RunContext;
use crate::pipeline::JobStatus;

/// Everything known about a finished run
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RunDocument {
    pub context: RunContext,
    /// Step names in chain order
    pub plan: Vec<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub final_segment_start: Option<usize>,
    pub job_status: JobStatus,
    pub finding: String,
}

impl RunDocument {
    /// Load a document written by [`JsonSerializer`]
    pub fn from_file(path: &Path) -> RepairflowResult<Self> {
        let content = std::fs::read_to_string(path).map_err(|e| RepairflowError::FileReadError {
            path: path.to_path_buf(),
            error: e.to_string(),
        })?;
        serde_json::from_str(&content).map_err(Into::into)
    }
}

/// Persists the outcome of a run
pub trait Serializer: Send + Sync {
    fn name(&self) -> &str;

    fn serialize(&self, document: &RunDocument) -> RepairflowResult<()>;
}

/// Reacts to the outcome of a run
pub trait Notifier: Send + Sync {
    fn name(&self) -> &str;

    /// Whether this run should be observed
    fn wants(&self, job_status: &JobStatus) -> bool {
        job_status.fatal_error().is_some()
    }

    fn observe(&self, run: &RunContext, job_status: &JobStatus) -> RepairflowResult<()>;
}
