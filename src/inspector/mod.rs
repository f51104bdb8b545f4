// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 repairflow contributors

//! Build inspection
//!
//! The [`Inspector`] is the composition root of one run: it assembles the
//! chain, drives the executor and hands the outcome to every reporting
//! collaborator.

mod build;

pub use build::{BuildInfo, BuildToInspect, RunContext, ScannedBuildStatus};

use std::sync::Arc;
use sysinfo::System;
use tracing::{debug, warn};

use crate::config::ConfigProvider;
use crate::output::{Notifier, RunDocument, Serializer};
use crate::pipeline::{Chain, ExecutionSummary, JobStatus, PipelineExecutor, StepResolver};
use crate::report::{self, BugClassifier};
use crate::steps::StepCatalog;

/// Result of [`Inspector::run`]
#[derive(Debug)]
pub enum InspectionOutcome {
    /// The build is not worth inspecting; nothing was built or executed
    OutOfScope,
    Completed(InspectionReport),
}

impl InspectionOutcome {
    pub fn report(&self) -> Option<&InspectionReport> {
        match self {
            Self::OutOfScope => None,
            Self::Completed(report) => Some(report),
        }
    }
}

/// A finished run
#[derive(Debug)]
pub struct InspectionReport {
    pub document: RunDocument,
    pub summary: ExecutionSummary,
}

/// Assemble the chain: prefix, repair tools, suffix, then the final segment
///
/// Repair tools that cannot be resolved are logged and left out.
pub fn build_chain(
    catalog: &dyn StepCatalog,
    resolver: &dyn StepResolver,
    config: &dyn ConfigProvider,
) -> Chain {
    let mut chain = Chain::new()
        .append_all(catalog.prefix())
        .append_dynamic(resolver, config.repair_tools())
        .append_all(catalog.suffix());

    let mut finals = catalog.final_segment().into_iter();
    if let Some(first) = finals.next() {
        chain = chain.mark_final_segment(first).append_all(finals);
    }
    chain
}

/// Inspects one build
pub struct Inspector {
    context: RunContext,
    config: Arc<dyn ConfigProvider>,
    executor: PipelineExecutor,
    serializers: Vec<Box<dyn Serializer>>,
    notifiers: Vec<Box<dyn Notifier>>,
    classifier: Option<Box<dyn BugClassifier>>,
}

impl Inspector {
    pub fn new(context: RunContext, config: Arc<dyn ConfigProvider>) -> Self {
        Self {
            context,
            config,
            executor: PipelineExecutor::new(),
            serializers: Vec::new(),
            notifiers: Vec::new(),
            classifier: None,
        }
    }

    pub fn with_executor(mut self, executor: PipelineExecutor) -> Self {
        self.executor = executor;
        self
    }

    pub fn with_serializer(mut self, serializer: Box<dyn Serializer>) -> Self {
        self.serializers.push(serializer);
        self
    }

    pub fn with_notifier(mut self, notifier: Box<dyn Notifier>) -> Self {
        self.notifiers.push(notifier);
        self
    }

    pub fn with_classifier(mut self, classifier: Box<dyn BugClassifier>) -> Self {
        self.classifier = Some(classifier);
        self
    }

    pub fn context(&self) -> &RunContext {
        &self.context
    }

    /// Run the inspection
    pub async fn run(
        &self,
        catalog: &dyn StepCatalog,
        resolver: &dyn StepResolver,
    ) -> InspectionOutcome {
        let build = self.context.build();
        if !build.status.is_inspectable() {
            debug!("Build {} is not a failing build.", build.buggy_build.id);
            return InspectionOutcome::OutOfScope;
        }

        let mut job_status =
            JobStatus::with_properties(self.context.properties(System::host_name()));

        let chain = build_chain(catalog, resolver, self.config.as_ref());
        let plan = chain.names();
        report::log_lines(&report::pipeline_lines(&plan));

        let summary = self
            .executor
            .run(&chain, &self.context, self.config.as_ref(), &mut job_status)
            .await;

        let classifier = self.classifier.as_deref();
        report::log_lines(&report::execution_summary(&job_status, &plan, classifier));

        let document = RunDocument {
            context: self.context.clone(),
            plan,
            final_segment_start: chain.final_segment_start(),
            finding: report::overall_finding(&job_status, classifier),
            job_status,
        };

        self.dispatch(&document);

        InspectionOutcome::Completed(InspectionReport { document, summary })
    }

    /// Hand the outcome to every collaborator; their failures stay isolated
    fn dispatch(&self, document: &RunDocument) {
        for notifier in &self.notifiers {
            if !notifier.wants(&document.job_status) {
                continue;
            }
            if let Err(e) = notifier.observe(&self.context, &document.job_status) {
                warn!("Notifier {} failed: {}", notifier.name(), e);
            }
        }

        for serializer in &self.serializers {
            if let Err(e) = serializer.serialize(document) {
                warn!("Serializer {} failed: {}", serializer.name(), e);
            }
        }
    }
}
