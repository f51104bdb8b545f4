// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 repairflow contributors

//! Plan command - show the chain without running it

use colored::Colorize;
use miette::Result;
use std::path::PathBuf;

use crate::config::{ConfigProvider, RepairConfig};
use crate::inspector::build_chain;
use crate::steps::ConfiguredCatalog;
use crate::utils::{print_header, print_warning};

/// Run the plan command
pub async fn run(
    config_path: PathBuf,
    tools: Vec<String>,
    push: bool,
    verbose: bool,
) -> Result<()> {
    let config = RepairConfig::from_file(&config_path)?.with_overrides(push, tools);
    let catalog = ConfiguredCatalog::new(&config);
    let chain = build_chain(&catalog, &catalog, &config);

    print_header("Pipeline steps");

    for (index, step) in chain.iter().enumerate() {
        if chain.final_segment_start() == Some(index) {
            println!("{}", "-- final segment --".dimmed());
        }

        let skipped = step.skip_reason(&config);
        match skipped {
            Some(reason) if verbose => println!(
                "{:>3}. {} {}",
                index + 1,
                step.name().dimmed(),
                format!("(skipped: {})", reason).dimmed()
            ),
            Some(_) => println!("{:>3}. {}", index + 1, step.name().dimmed()),
            None => println!("{:>3}. {}", index + 1, step.name()),
        }
    }

    let missing: Vec<&String> = config
        .repair_tools()
        .iter()
        .filter(|name| !config.tools.contains_key(name.as_str()))
        .collect();
    if !missing.is_empty() {
        println!();
        for name in missing {
            print_warning(&format!("Repair tool '{}' is not defined and will not run", name));
        }
    }

    println!();
    println!("{} steps", chain.len());
    Ok(())
}
