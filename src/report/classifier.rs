// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 repairflow contributors

//! Bug classification for build-pair inspections

use crate::pipeline::JobStatus;

/// Optional classifier consulted first when computing the run finding
pub trait BugClassifier: Send + Sync {
    /// Whether the run identified a bug
    fn is_bug(&self, job_status: &JobStatus) -> bool;

    /// Label of the identified bug
    fn bug_type(&self, job_status: &JobStatus) -> String;

    fn is_reproduced_as_fail(&self, job_status: &JobStatus) -> bool {
        job_status.is_reproduced_as_fail()
    }
}

/// A bug is a reproduced failure whose human patch was validated
///
/// The bug type is the scanned build-pair type (`failing_passing`, ...).
#[derive(Debug, Default, Clone, Copy)]
pub struct BuildPairClassifier;

impl BugClassifier for BuildPairClassifier {
    fn is_bug(&self, job_status: &JobStatus) -> bool {
        job_status.is_reproduced_as_fail() && job_status.has_been_patched()
    }

    fn bug_type(&self, job_status: &JobStatus) -> String {
        job_status.properties().build_type.clone()
    }
}
