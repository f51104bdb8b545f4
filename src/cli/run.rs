// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 repairflow contributors

//! Run command - inspect one build

use chrono::Utc;
use colored::Colorize;
use miette::Result;
use std::path::PathBuf;
use std::sync::Arc;

use super::report::print_summary;
use super::RunArgs;
use crate::config::{ConfigValidator, RepairConfig};
use crate::inspector::{
    BuildInfo, BuildToInspect, InspectionOutcome, Inspector, RunContext, ScannedBuildStatus,
};
use crate::output::{JsonSerializer, LogNotifier};
use crate::report::{BugClassifier, BuildPairClassifier};
use crate::steps::ConfiguredCatalog;
use crate::utils::{print_error, print_info, print_warning};

impl RunArgs {
    /// The build pair described by the flags
    ///
    /// Without an explicit status, a patched build implies `failing_passing`.
    pub fn build_to_inspect(&self) -> BuildToInspect {
        let finished_at = self.buggy_finished_at.unwrap_or_else(Utc::now);
        let status = self.status.unwrap_or(if self.patched_build.is_some() {
            ScannedBuildStatus::FailingAndPassing
        } else {
            ScannedBuildStatus::OnlyFail
        });

        BuildToInspect {
            repo_slug: self.slug.clone(),
            buggy_build: BuildInfo {
                id: self.buggy_build,
                finished_at,
                pull_request: self.pull_request,
            },
            patched_build: self.patched_build.map(|id| BuildInfo {
                id,
                finished_at,
                pull_request: self.pull_request,
            }),
            status,
        }
    }
}

/// Run the inspection
pub async fn run(config_path: PathBuf, args: RunArgs, verbose: bool) -> Result<()> {
    let config = RepairConfig::from_file(&config_path)?
        .with_overrides(args.push, args.tools.clone());

    let validation = ConfigValidator::ensure_valid(&config)?;

    if validation.has_warnings() && verbose {
        eprintln!("{}", "Configuration warnings:".yellow().bold());
        for warning in &validation.warnings {
            eprintln!("  {} {}", "⚠".yellow(), warning);
        }
        eprintln!();
    }

    let build = args.build_to_inspect();
    build.validate()?;

    let context = RunContext::new(build, config.workspace.clone());
    let catalog = ConfiguredCatalog::new(&config);
    let output_dir = args
        .output
        .clone()
        .unwrap_or_else(|| config.workspace.join("reports"));

    let mut inspector = Inspector::new(context, Arc::new(config))
        .with_serializer(Box::new(JsonSerializer::new(output_dir.clone())))
        .with_notifier(Box::new(LogNotifier));
    if args.classify {
        inspector = inspector.with_classifier(Box::new(BuildPairClassifier));
    }

    let report = match inspector.run(&catalog, &catalog).await {
        InspectionOutcome::OutOfScope => {
            println!(
                "Build {} is not a failing build; nothing to inspect.",
                args.buggy_build
            );
            return Ok(());
        }
        InspectionOutcome::Completed(report) => report,
    };

    let classifier = args
        .classify
        .then_some(&BuildPairClassifier as &dyn BugClassifier);
    print_summary(&report.document.job_status, &report.document.plan, classifier);

    println!();
    let document_path = JsonSerializer::new(output_dir).path_for(&report.document);
    print_info(&format!("Run document: {}", document_path.display()));
    if verbose {
        for log in report.document.job_status.log_files() {
            print_info(&format!("Log: {}", log.display()));
        }
    }
    if report.summary.jumped_to_final {
        print_warning("Pipeline halted early; the final segment ran");
    }

    if let Some(fatal) = report.document.job_status.fatal_error() {
        print_error(&format!("Aborted in {}", fatal.step));
        return Err(miette::miette!("Pipeline aborted: {}", fatal.message));
    }

    println!(
        "{} in {:.1}s",
        "Inspection finished".green().bold(),
        report.summary.duration.as_secs_f64()
    );
    Ok(())
}
