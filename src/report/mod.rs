// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 repairflow contributors

//! Run report
//!
//! Everything here is a pure function of a [`JobStatus`] and the planned step
//! names, so a persisted run renders exactly like a live one.

mod classifier;

pub use classifier::{BugClassifier, BuildPairClassifier};

use tracing::info;

use crate::pipeline::{JobStatus, StepStatus};

/// Width of the summary table
pub const SUMMARY_WIDTH: usize = 70;

/// Finding when nothing more specific is known
pub const UNKNOWN_FINDING: &str = "UNKNOWN";

/// Characters around the duration value: `" [ "` and `" s ]"`
const DURATION_DECORATION: usize = 7;

fn rule() -> String {
    "-".repeat(SUMMARY_WIDTH)
}

fn framed(title: &str) -> Vec<String> {
    vec![rule(), title.to_string(), rule()]
}

/// One aligned line per planned step, in registration order
pub fn summary_lines(job_status: &JobStatus, steps: &[String]) -> Vec<String> {
    let longest = steps
        .iter()
        .enumerate()
        .filter_map(|(i, _)| job_status.step_at(i).and_then(|r| r.duration_secs()))
        .max()
        .unwrap_or(0);
    let width = longest.to_string().len();

    steps
        .iter()
        .enumerate()
        .map(|(i, name)| {
            let record = job_status.step_at(i);
            let status = record.map(|r| r.status).unwrap_or(StepStatus::NotRun);
            let label = status.label();

            let duration = match (status, record.and_then(|r| r.duration_secs())) {
                (StepStatus::Success | StepStatus::Failure, Some(secs)) => {
                    format!(" [ {:>width$} s ]", secs, width = width)
                }
                _ => " ".repeat(width + DURATION_DECORATION),
            };

            let used = name.chars().count() + label.len() + duration.len();
            let dots = ".".repeat(SUMMARY_WIDTH.saturating_sub(used));
            format!("{}{}{}{}", name, dots, label, duration)
        })
        .collect()
}

/// Classify the run in one string
///
/// First match wins: classifier verdict, patched, reproduced failure, the
/// diagnostic of the latest failed step, then [`UNKNOWN_FINDING`].
pub fn overall_finding(job_status: &JobStatus, classifier: Option<&dyn BugClassifier>) -> String {
    if let Some(classifier) = classifier {
        if classifier.is_bug(job_status) {
            return classifier.bug_type(job_status);
        }
        if classifier.is_reproduced_as_fail(job_status) {
            return "BUG REPRODUCED".to_string();
        }
    }

    if job_status.has_been_patched() {
        return "PATCHED".to_string();
    }

    if job_status.is_reproduced_as_fail() {
        return "test failure".to_string();
    }

    job_status
        .steps()
        .iter()
        .rev()
        .find(|s| s.status == StepStatus::Failure)
        .map(|s| s.diagnostic.clone().unwrap_or_else(|| s.name.clone()))
        .unwrap_or_else(|| UNKNOWN_FINDING.to_string())
}

/// Finding as printed on the summary's last line
pub fn display_finding(finding: &str) -> String {
    let upper = finding.to_uppercase();
    if upper == UNKNOWN_FINDING {
        "-".to_string()
    } else {
        upper
    }
}

/// Framed list of planned steps
pub fn pipeline_lines(steps: &[String]) -> Vec<String> {
    let mut lines = framed("PIPELINE STEPS");
    lines.extend(steps.iter().cloned());
    lines
}

/// Framed execution summary followed by the finding
pub fn execution_summary(
    job_status: &JobStatus,
    steps: &[String],
    classifier: Option<&dyn BugClassifier>,
) -> Vec<String> {
    let mut lines = framed("PIPELINE EXECUTION SUMMARY");
    lines.extend(summary_lines(job_status, steps));

    if let Some(fatal) = job_status.fatal_error() {
        lines.push(format!("FATAL ERROR in {}: {}", fatal.step, fatal.message));
    }

    lines.push(rule());
    lines.push(format!(
        "PIPELINE FINDING: {}",
        display_finding(&overall_finding(job_status, classifier))
    ));
    lines.push(rule());
    lines
}

/// Emit report lines through the logger
pub fn log_lines(lines: &[String]) {
    for line in lines {
        info!("{}", line);
    }
}
