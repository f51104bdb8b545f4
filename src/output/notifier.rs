// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 repairflow contributors

//! Log-based notifier

use tracing::error;

use super::Notifier;
use crate::errors::RepairflowResult;
use crate::inspector::RunContext;
use crate::pipeline::{JobStatus, UNKNOWN_STEP};

/// Reports fatal errors through the logger
#[derive(Debug, Default)]
pub struct LogNotifier;

impl Notifier for LogNotifier {
    fn name(&self) -> &str {
        "log"
    }

    fn observe(&self, run: &RunContext, job_status: &JobStatus) -> RepairflowResult<()> {
        if let Some(fatal) = job_status.fatal_error() {
            let step = if fatal.step.is_empty() {
                UNKNOWN_STEP
            } else {
                fatal.step.as_str()
            };
            error!(
                "Inspection of build {} ({}) aborted in step {}: {}",
                run.buggy_build().id,
                run.repo_slug(),
                step,
                fatal.message
            );
        }
        Ok(())
    }
}
