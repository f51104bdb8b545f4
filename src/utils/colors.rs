// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 repairflow contributors

//! Terminal color utilities
//!
//! Keeps step statuses and messages styled the same way in every command.

use colored::{ColoredString, Colorize};

use crate::pipeline::StepStatus;

/// Style text after the status it describes
pub fn status(status: StepStatus, text: &str) -> ColoredString {
    match status {
        StepStatus::Success => text.green(),
        StepStatus::Failure => text.red(),
        StepStatus::Running => text.blue(),
        StepStatus::Skipped | StepStatus::NotRun => text.dimmed(),
    }
}

/// Print a styled header
pub fn print_header(title: &str) {
    println!("{}", title.bold());
    println!("{}", "═".repeat(title.len().max(40)));
}

/// Print a styled section
pub fn print_section(title: &str) {
    println!();
    println!("{}:", title.bold());
}

pub fn print_success(msg: &str) {
    println!("  {} {}", "✓".green(), msg);
}

pub fn print_error(msg: &str) {
    println!("  {} {}", "✗".red(), msg);
}

pub fn print_warning(msg: &str) {
    println!("  {} {}", "⚠".yellow(), msg);
}

pub fn print_info(msg: &str) {
    println!("  {} {}", "→".blue(), msg);
}
