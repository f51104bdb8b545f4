// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 repairflow contributors

//! Utility modules
//!
//! Terminal helpers shared by the CLI commands.

pub mod colors;

pub use colors::*;
