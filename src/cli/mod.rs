// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 repairflow contributors

//! CLI command definitions and handlers
//!
//! Defines the command-line interface for repairflow.

pub mod plan;
pub mod report;
pub mod run;
pub mod validate;

use chrono::{DateTime, Utc};
use clap::{Args, Parser, Subcommand};
use std::path::PathBuf;

use crate::config::DEFAULT_CONFIG_FILE;
use crate::inspector::ScannedBuildStatus;

/// Build-repair pipeline orchestrator
///
/// Reproduce a failing CI build, run repair tools against it and validate
/// the human patch.
#[derive(Parser, Debug)]
#[clap(
    name = "repairflow",
    version,
    about = "Build-repair pipeline orchestrator",
    long_about = None,
    after_help = "Examples:\n\
        repairflow validate                                   Check the configuration\n\
        repairflow plan                                       Show the chain that would run\n\
        repairflow run --slug owner/repo --buggy-build 42     Inspect a failing build\n\
        repairflow report reports/repairflow-owner-repo-42.json\n\n\
        See 'repairflow <command> --help' for more information on a specific command."
)]
pub struct Cli {
    #[clap(subcommand)]
    pub command: Commands,

    /// Configuration file
    #[clap(short, long, global = true, default_value = DEFAULT_CONFIG_FILE)]
    pub config: PathBuf,

    /// Enable verbose output
    #[clap(short, long, global = true)]
    pub verbose: bool,

    /// Change to directory before executing
    #[clap(short = 'C', long, global = true, value_name = "DIR")]
    pub directory: Option<PathBuf>,
}

#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Inspect one build
    Run(RunArgs),

    /// Show the chain that would run, without executing it
    Plan {
        /// Override the configured repair tools
        #[clap(long = "tool", value_name = "NAME")]
        tools: Vec<String>,

        /// Enable push steps
        #[clap(long)]
        push: bool,
    },

    /// Re-render the summary of a persisted run
    Report {
        /// Run document written by `repairflow run`
        file: PathBuf,

        /// Classify the run as a build-pair bug
        #[clap(long)]
        classify: bool,
    },

    /// Validate the configuration
    Validate,
}

/// Arguments of `repairflow run`
#[derive(Args, Debug, Clone)]
pub struct RunArgs {
    /// Repository slug (owner/name)
    #[clap(long)]
    pub slug: String,

    /// Id of the failing build
    #[clap(long, value_name = "ID")]
    pub buggy_build: u64,

    /// Finish time of the failing build (RFC 3339, defaults to now)
    #[clap(long, value_name = "TIME")]
    pub buggy_finished_at: Option<DateTime<Utc>>,

    /// Id of the build carrying the human patch
    #[clap(long, value_name = "ID")]
    pub patched_build: Option<u64>,

    /// Scanned status (only_fail, failing_passing, passing_passing)
    #[clap(long)]
    pub status: Option<ScannedBuildStatus>,

    /// Pull request of the failing build
    #[clap(long, value_name = "NUMBER")]
    pub pull_request: Option<u64>,

    /// Enable push steps
    #[clap(long)]
    pub push: bool,

    /// Override the configured repair tools
    #[clap(long = "tool", value_name = "NAME")]
    pub tools: Vec<String>,

    /// Directory for run documents (defaults to <workspace>/reports)
    #[clap(short, long, value_name = "DIR")]
    pub output: Option<PathBuf>,

    /// Classify the run as a build-pair bug
    #[clap(long)]
    pub classify: bool,
}
