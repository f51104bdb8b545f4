// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 repairflow contributors

//! Pipeline executor
//!
//! Walks a chain head to tail, strictly sequentially. A halting failure jumps
//! to the final segment; a fault ends the walk without running it.

use std::any::Any;
use std::panic::AssertUnwindSafe;
use std::time::{Duration, Instant};

use futures::FutureExt;
use sysinfo::System;
use tracing::{error, info, warn};

use crate::config::ConfigProvider;
use crate::inspector::RunContext;
use crate::pipeline::{
    Chain, FatalError, JobStatus, StepContext, StepOutcome, StepRecord, StepStatus, UNKNOWN_STEP,
};

/// Source of free-memory samples taken after each step
pub trait MemoryProbe: Send + Sync {
    /// Free memory in bytes, if it can be determined
    fn free_memory(&self) -> Option<u64>;
}

/// Reads free memory from the operating system
#[derive(Debug, Default)]
pub struct SystemMemoryProbe;

impl MemoryProbe for SystemMemoryProbe {
    fn free_memory(&self) -> Option<u64> {
        let mut system = System::new();
        system.refresh_memory();
        Some(system.free_memory())
    }
}

/// What happened while walking one chain
#[derive(Debug, Clone)]
pub struct ExecutionSummary {
    /// Final state of every chain position
    pub states: Vec<StepStatus>,
    /// Position of the step whose failure halted the regular chain
    pub halted_at: Option<usize>,
    /// Position of the step that raised a fault
    pub fatal_at: Option<usize>,
    /// Whether the final segment was entered after a halt
    pub jumped_to_final: bool,
    /// Total wall time
    pub duration: Duration,
}

impl ExecutionSummary {
    fn new(len: usize) -> Self {
        Self {
            states: vec![StepStatus::NotRun; len],
            halted_at: None,
            fatal_at: None,
            jumped_to_final: false,
            duration: Duration::ZERO,
        }
    }

    fn transition(&mut self, index: usize, next: StepStatus) {
        debug_assert!(
            self.states[index].can_transition_to(next),
            "illegal step transition {:?} -> {:?}",
            self.states[index],
            next
        );
        self.states[index] = next;
    }

    pub fn is_fatal(&self) -> bool {
        self.fatal_at.is_some()
    }

    /// No fault, no halt and no failed step
    pub fn success(&self) -> bool {
        !self.is_fatal()
            && self.halted_at.is_none()
            && !self.states.contains(&StepStatus::Failure)
    }
}

/// Pipeline executor
pub struct PipelineExecutor {
    memory: Box<dyn MemoryProbe>,
}

impl PipelineExecutor {
    /// Create an executor sampling system memory
    pub fn new() -> Self {
        Self {
            memory: Box::new(SystemMemoryProbe),
        }
    }

    /// Replace the memory probe
    pub fn with_memory_probe(mut self, probe: Box<dyn MemoryProbe>) -> Self {
        self.memory = probe;
        self
    }

    /// Execute a chain, recording every step in `job_status`
    pub async fn run(
        &self,
        chain: &Chain,
        run: &RunContext,
        config: &dyn ConfigProvider,
        job_status: &mut JobStatus,
    ) -> ExecutionSummary {
        let start = Instant::now();
        let mut summary = ExecutionSummary::new(chain.len());
        let mut index = 0;

        while let Some(step) = chain.get(index) {
            let name = step.name().to_string();
            summary.transition(index, StepStatus::Running);

            let (outcome, duration) = if let Some(reason) = step.skip_reason(config) {
                info!("Step {} skipped: {}", name, reason);
                (StepOutcome::skipped(), None)
            } else {
                let step_start = Instant::now();
                let mut ctx = StepContext {
                    run,
                    config,
                    job_status: &mut *job_status,
                };

                let result = match AssertUnwindSafe(step.execute(&mut ctx)).catch_unwind().await {
                    Ok(result) => result.map_err(|e| e.to_string()),
                    Err(panic) => Err(format!("step panicked: {}", panic_message(panic.as_ref()))),
                };

                match result {
                    Ok(outcome) => (outcome, Some(step_start.elapsed())),
                    Err(message) => {
                        let step = if name.is_empty() {
                            UNKNOWN_STEP.to_string()
                        } else {
                            name.clone()
                        };
                        error!("Exception caught while executing step {}: {}", step, message);
                        job_status.set_fatal_error(FatalError {
                            step,
                            index: Some(index),
                            message,
                        });
                        summary.fatal_at = Some(index);
                        break;
                    }
                }
            };

            let outcome = Self::terminal(outcome, &name);
            summary.transition(index, outcome.status);
            job_status.record(StepRecord::from_outcome(index, &name, &outcome, duration));
            self.sample_memory(&name, job_status);

            match outcome.status {
                StepStatus::Failure => warn!(
                    "Step {} failed: {}",
                    name,
                    outcome.diagnostic.as_deref().unwrap_or("no diagnostic")
                ),
                StepStatus::Success => info!(
                    "Step {} succeeded in {}s",
                    name,
                    duration.map(|d| d.as_secs()).unwrap_or_default()
                ),
                _ => {}
            }

            if outcome.halts() {
                summary.halted_at.get_or_insert(index);
                match chain.final_segment_start() {
                    Some(start) if start > index => {
                        info!("Pipeline halted at {}; running final segment", name);
                        summary.jumped_to_final = true;
                        index = start;
                        continue;
                    }
                    _ => {
                        info!("Pipeline halted at {}", name);
                        break;
                    }
                }
            }

            index += 1;
        }

        summary.duration = start.elapsed();
        summary
    }

    /// Steps must report a terminal status; anything else counts as a failure
    fn terminal(outcome: StepOutcome, name: &str) -> StepOutcome {
        if outcome.status.is_terminal() {
            outcome
        } else {
            warn!("Step {} returned non-terminal status {}", name, outcome.status);
            StepOutcome::failure(format!(
                "step returned non-terminal status {}",
                outcome.status
            ))
        }
    }

    fn sample_memory(&self, name: &str, job_status: &mut JobStatus) {
        if let Some(bytes) = self.memory.free_memory() {
            job_status.record_free_memory(name, bytes);
        }
    }
}

fn panic_message(panic: &(dyn Any + Send)) -> String {
    if let Some(s) = panic.downcast_ref::<&str>() {
        s.to_string()
    } else if let Some(s) = panic.downcast_ref::<String>() {
        s.clone()
    } else {
        "unknown panic payload".to_string()
    }
}

impl Default for PipelineExecutor {
    fn default() -> Self {
        Self::new()
    }
}
