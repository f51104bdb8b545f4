// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 repairflow contributors

//! Report command - re-render a persisted run

use colored::Colorize;
use miette::Result;
use std::path::PathBuf;

use crate::output::RunDocument;
use crate::pipeline::{JobStatus, StepStatus};
use crate::report::{self, BugClassifier, BuildPairClassifier};
use crate::utils::{self, print_header, print_section};

/// Print the execution summary and finding of a run
pub fn print_summary(
    job_status: &JobStatus,
    plan: &[String],
    classifier: Option<&dyn BugClassifier>,
) {
    println!();
    print_header("Pipeline execution summary");

    for (index, line) in report::summary_lines(job_status, plan).iter().enumerate() {
        let status = job_status
            .step_at(index)
            .map(|r| r.status)
            .unwrap_or(StepStatus::NotRun);
        println!("{}", utils::status(status, line));
    }

    if let Some(fatal) = job_status.fatal_error() {
        println!();
        println!("{} {}: {}", "FATAL ERROR in".red().bold(), fatal.step, fatal.message);
    }

    println!();
    let finding = report::display_finding(&report::overall_finding(job_status, classifier));
    println!("{} {}", "Finding:".bold(), finding.cyan());
}

/// Run the report command
pub async fn run(file: PathBuf, classify: bool, verbose: bool) -> Result<()> {
    if !file.exists() {
        return Err(miette::miette!(
            "Run document not found: {}\n\n\
             Run documents are written by 'repairflow run'.",
            file.display()
        ));
    }

    let document = RunDocument::from_file(&file)?;
    let properties = document.job_status.properties();

    println!(
        "{} {} build {}",
        "Run of".bold(),
        properties.repository,
        properties.buggy_build_id
    );
    if let Some(patched) = properties.patched_build_id {
        println!("  Patched build: {}", patched);
    }
    println!("  Type: {}", properties.build_type);

    let classifier = classify.then_some(&BuildPairClassifier as &dyn BugClassifier);
    print_summary(&document.job_status, &document.plan, classifier);

    if verbose {
        let memory = document.job_status.free_memory_by_step();
        if !memory.is_empty() {
            print_section("Free memory after step");
            for (step, bytes) in memory {
                println!("  {:<40} {:>8} MiB", step, bytes / (1024 * 1024));
            }
        }

        if !document.job_status.log_files().is_empty() {
            print_section("Logs");
            for log in document.job_status.log_files() {
                println!("  - {}", log.display());
            }
        }
    }

    Ok(())
}
