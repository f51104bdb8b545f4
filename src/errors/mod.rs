// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 repairflow contributors

//! Error types
//!
//! Modeled step failures are not errors: a step that fails its business check
//! returns a FAILURE outcome. A `RepairflowError` escaping a step is a fatal
//! fault and stops the run.

use miette::Diagnostic;
use std::path::PathBuf;
use thiserror::Error;

/// Result type for repairflow operations
pub type RepairflowResult<T> = Result<T, RepairflowError>;

/// Main error type for repairflow
#[derive(Error, Debug, Diagnostic)]
pub enum RepairflowError {
    // ─────────────────────────────────────────────────────────────────────────
    // Configuration Errors
    // ─────────────────────────────────────────────────────────────────────────
    #[error("Configuration file not found: {path}")]
    #[diagnostic(
        code(repairflow::config_not_found),
        help("Create a .repairflow.yaml or pass --config <file>")
    )]
    ConfigNotFound { path: PathBuf },

    #[error("Failed to read file '{path}': {error}")]
    #[diagnostic(code(repairflow::file_read_error))]
    FileReadError { path: PathBuf, error: String },

    #[error("Failed to write file '{path}': {error}")]
    #[diagnostic(code(repairflow::file_write_error))]
    FileWriteError { path: PathBuf, error: String },

    #[error("Invalid configuration: {reason}")]
    #[diagnostic(code(repairflow::invalid_config))]
    InvalidConfig {
        reason: String,
        #[help]
        help: Option<String>,
    },

    #[error("Unsupported configuration format: {path}")]
    #[diagnostic(
        code(repairflow::unsupported_format),
        help("Supported extensions: .yaml, .yml, .toml, .json")
    )]
    UnsupportedFormat { path: PathBuf },

    // ─────────────────────────────────────────────────────────────────────────
    // Build Descriptor Errors
    // ─────────────────────────────────────────────────────────────────────────
    #[error("Unknown build status: {value}")]
    #[diagnostic(
        code(repairflow::unknown_build_status),
        help("Expected one of: only_fail, failing_passing, passing_passing")
    )]
    UnknownBuildStatus { value: String },

    #[error("Invalid repository slug: {slug}")]
    #[diagnostic(
        code(repairflow::invalid_slug),
        help("Repository slugs look like 'owner/name'")
    )]
    InvalidSlug { slug: String },

    // ─────────────────────────────────────────────────────────────────────────
    // Execution Errors
    // ─────────────────────────────────────────────────────────────────────────
    #[error("Step '{step}' could not run: {error}")]
    #[diagnostic(code(repairflow::step_execution_failed))]
    StepExecutionFailed {
        step: String,
        error: String,
        #[help]
        help: Option<String>,
    },

    #[error("Serializer '{serializer}' failed: {message}")]
    #[diagnostic(code(repairflow::serializer_failed))]
    SerializerFailed { serializer: String, message: String },

    #[error("Notifier '{notifier}' failed: {message}")]
    #[diagnostic(code(repairflow::notifier_failed))]
    NotifierFailed { notifier: String, message: String },

    // ─────────────────────────────────────────────────────────────────────────
    // IO/System Errors
    // ─────────────────────────────────────────────────────────────────────────
    #[error("IO error: {message}")]
    #[diagnostic(code(repairflow::io_error))]
    Io { message: String },

    #[error("YAML parsing error: {message}")]
    #[diagnostic(code(repairflow::yaml_error))]
    Yaml { message: String },

    #[error("JSON error: {message}")]
    #[diagnostic(code(repairflow::json_error))]
    Json { message: String },

    #[error("TOML parsing error: {message}")]
    #[diagnostic(code(repairflow::toml_error))]
    Toml { message: String },
}

impl From<std::io::Error> for RepairflowError {
    fn from(e: std::io::Error) -> Self {
        Self::Io { message: e.to_string() }
    }
}

impl From<serde_yaml::Error> for RepairflowError {
    fn from(e: serde_yaml::Error) -> Self {
        Self::Yaml { message: e.to_string() }
    }
}

impl From<serde_json::Error> for RepairflowError {
    fn from(e: serde_json::Error) -> Self {
        Self::Json { message: e.to_string() }
    }
}

impl From<toml::de::Error> for RepairflowError {
    fn from(e: toml::de::Error) -> Self {
        Self::Toml { message: e.to_string() }
    }
}

impl RepairflowError {
    /// Create a step execution error with a hint derived from the OS error
    pub fn step_spawn_failed(step: &str, shell: &str, error: &std::io::Error) -> Self {
        let help = match error.kind() {
            std::io::ErrorKind::NotFound => Some(format!(
                "Shell '{}' or the step working directory does not exist",
                shell
            )),
            std::io::ErrorKind::PermissionDenied => {
                Some("Check permissions on the workspace directory".to_string())
            }
            _ => None,
        };

        Self::StepExecutionFailed {
            step: step.to_string(),
            error: error.to_string(),
            help,
        }
    }
}
