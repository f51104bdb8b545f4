// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 repairflow contributors

//! Step contract
//!
//! A step is one unit of pipeline work. It receives the run context and the
//! shared job status, and returns an outcome. Returning `Err` is reserved for
//! faults that the step did not model as a failure.

use async_trait::async_trait;
use serde::{Deserialize, Serialize};

use crate::config::ConfigProvider;
use crate::errors::RepairflowResult;
use crate::inspector::RunContext;
use crate::pipeline::JobStatus;

/// Lifecycle of a step within one run
///
/// `NotRun -> Running -> {Success, Failure, Skipped}`. Terminal states are
/// never left.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum StepStatus {
    NotRun,
    Running,
    Success,
    Failure,
    Skipped,
}

impl StepStatus {
    /// Label used in the execution summary
    pub fn label(&self) -> &'static str {
        match self {
            Self::NotRun => "NOT RUN",
            Self::Running => "RUNNING",
            Self::Success => "SUCCESS",
            Self::Failure => "FAILURE",
            Self::Skipped => "SKIPPED",
        }
    }

    pub fn is_terminal(&self) -> bool {
        matches!(self, Self::Success | Self::Failure | Self::Skipped)
    }

    /// Whether `self -> next` is a legal transition
    pub fn can_transition_to(&self, next: StepStatus) -> bool {
        match self {
            Self::NotRun => next == Self::Running,
            Self::Running => next.is_terminal(),
            _ => false,
        }
    }
}

impl std::fmt::Display for StepStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.label())
    }
}

/// What a step reports back to the executor
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StepOutcome {
    /// Terminal status
    pub status: StepStatus,
    /// Free-text explanation, shown verbatim as the run finding on failure
    pub diagnostic: Option<String>,
    /// Whether the pipeline proceeds to the successor after a failure
    pub continuable: bool,
}

impl StepOutcome {
    pub fn success() -> Self {
        Self {
            status: StepStatus::Success,
            diagnostic: None,
            continuable: true,
        }
    }

    /// A failure that halts the chain (the final segment still runs)
    pub fn failure(diagnostic: impl Into<String>) -> Self {
        Self {
            status: StepStatus::Failure,
            diagnostic: Some(diagnostic.into()),
            continuable: false,
        }
    }

    pub fn skipped() -> Self {
        Self {
            status: StepStatus::Skipped,
            diagnostic: None,
            continuable: true,
        }
    }

    /// Let the pipeline proceed past this failure
    pub fn continuing(mut self) -> Self {
        self.continuable = true;
        self
    }

    /// True when the executor must stop walking the regular chain
    pub fn halts(&self) -> bool {
        self.status == StepStatus::Failure && !self.continuable
    }
}

/// Everything a step may read or mutate while it runs
pub struct StepContext<'a> {
    /// Immutable description of the inspected build
    pub run: &'a RunContext,
    /// Configuration provider
    pub config: &'a dyn ConfigProvider,
    /// Run-scoped shared state
    pub job_status: &'a mut JobStatus,
}

/// Trait for pipeline steps
#[async_trait]
pub trait Step: Send + Sync {
    /// Stable identifier used in logs and reports
    fn name(&self) -> &str;

    /// Reason to skip without running business logic, if any
    fn skip_reason(&self, _config: &dyn ConfigProvider) -> Option<String> {
        None
    }

    /// Run the step's business logic
    async fn execute(&self, ctx: &mut StepContext<'_>) -> RepairflowResult<StepOutcome>;
}
