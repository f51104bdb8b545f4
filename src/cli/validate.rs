// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 repairflow contributors

//! Validate command - check the configuration

use colored::Colorize;
use miette::Result;
use std::path::PathBuf;

use crate::config::{ConfigValidator, RepairConfig};

/// Run the validate command
pub async fn run(config_path: PathBuf, verbose: bool) -> Result<()> {
    println!("{}", "Validating configuration...".bold());
    println!();

    if !config_path.exists() {
        return Err(miette::miette!(
            "Configuration file not found: {}",
            config_path.display()
        ));
    }

    let config = match RepairConfig::from_file(&config_path) {
        Ok(c) => c,
        Err(e) => {
            eprintln!("  {} Failed to parse configuration", "✗".red());
            eprintln!();
            return Err(e.into());
        }
    };

    println!("  {} Configuration file parses", "✓".green());

    let validation = ConfigValidator::validate(&config);

    if !validation.errors.is_empty() {
        println!();
        println!("{}:", "Errors".red().bold());
        for error in &validation.errors {
            println!("  {} {}", "✗".red(), error);
        }
    }

    if !validation.warnings.is_empty() {
        println!();
        println!("{}:", "Warnings".yellow().bold());
        for warning in &validation.warnings {
            println!("  {} {}", "⚠".yellow(), warning);
        }
    }

    if verbose {
        println!();
        println!("{}:", "Configuration summary".bold());
        println!("  Workspace: {}", config.workspace.display());
        println!("  Shell: {}", config.shell);
        println!("  Push: {}", config.push);
        for (section, steps) in [
            ("prefix", &config.pipeline.prefix),
            ("suffix", &config.pipeline.suffix),
            ("final", &config.pipeline.final_segment),
        ] {
            println!("  {}:", section);
            for step in steps {
                let policy = format!(" [on_failure: {:?}]", step.on_failure).to_lowercase();
                println!("    - {}{}", step.name, policy.dimmed());
            }
        }
        println!("  Repair tools: {}", config.repair_tools.join(", "));
    }

    println!();

    if !validation.is_valid() {
        Err(miette::miette!("Configuration validation failed"))
    } else if validation.has_warnings() {
        println!("{}", "Configuration is valid but has warnings.".yellow().bold());
        Ok(())
    } else {
        println!("{}", "Configuration is valid!".green().bold());
        Ok(())
    }
}
