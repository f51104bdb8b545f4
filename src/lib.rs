// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 repairflow contributors

//! # repairflow - Build-Repair Pipeline Orchestrator
//!
//! `repairflow` inspects one failing CI build at a time: it reproduces the
//! failure, runs pluggable repair tools, validates the human patch and writes
//! a report of every step.
//!
//! ## Features
//!
//! - **Step chains** - fixed prefix, repair tools resolved by name, fixed suffix
//! - **Final segment** - end-of-run steps that still run after a halting failure
//! - **Run report** - aligned per-step summary and a one-line finding
//! - **Pluggable reporting** - serializers and notifiers per run
//!
//! ## Quick Start
//!
//! ```bash
//! # Check the configuration
//! repairflow validate
//!
//! # Show the chain
//! repairflow plan
//!
//! # Inspect a failing build
//! repairflow run --slug owner/repo --buggy-build 207924136
//! ```

pub mod cli;
pub mod config;
pub mod errors;
pub mod inspector;
pub mod output;
pub mod pipeline;
pub mod report;
pub mod steps;
pub mod utils;

#[cfg(test)]
mod testutil;

// Re-export commonly used types
pub use config::{ConfigProvider, RepairConfig};
pub use errors::{RepairflowError, RepairflowResult};
pub use inspector::{InspectionOutcome, Inspector, RunContext};
pub use pipeline::{Chain, JobStatus, PipelineExecutor, Step, StepOutcome, StepStatus};

/// Library version
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
