// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 repairflow contributors

//! repairflow - build-repair pipeline orchestrator
//!
//! Reproduce a failing CI build, run repair tools and validate the human patch.

use clap::Parser;
use miette::Result;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use repairflow::cli::{Cli, Commands};

#[tokio::main]
async fn main() -> Result<()> {
    // Logs go to stderr so summaries on stdout stay clean
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "repairflow=info".into()),
        )
        .with(
            tracing_subscriber::fmt::layer()
                .with_target(false)
                .with_writer(std::io::stderr),
        )
        .init();

    let cli = Cli::parse();

    if let Some(ref dir) = cli.directory {
        std::env::set_current_dir(dir).map_err(|e| {
            miette::miette!("Failed to change to directory '{}': {}", dir.display(), e)
        })?;
    }

    match cli.command {
        Commands::Run(args) => repairflow::cli::run::run(cli.config, args, cli.verbose).await,
        Commands::Plan { tools, push } => {
            repairflow::cli::plan::run(cli.config, tools, push, cli.verbose).await
        }
        Commands::Report { file, classify } => {
            repairflow::cli::report::run(file, classify, cli.verbose).await
        }
        Commands::Validate => repairflow::cli::validate::run(cli.config, cli.verbose).await,
    }
}
