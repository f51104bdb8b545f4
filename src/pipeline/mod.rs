// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 repairflow contributors

//! Pipeline core
//!
//! The step contract, the chain it is assembled into, the shared job status
//! and the executor that walks a chain.

mod chain;
mod executor;
mod job_status;
mod step;

pub use chain::{Chain, StepResolver};
pub use executor::{ExecutionSummary, MemoryProbe, PipelineExecutor, SystemMemoryProbe};
pub use job_status::{FatalError, JobStatus, RunProperties, StepRecord, UNKNOWN_STEP};
pub use step::{Step, StepContext, StepOutcome, StepStatus};
