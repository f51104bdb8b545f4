// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 repairflow contributors

//! Configuration validation
//!
//! Checks a configuration before any chain is built. Unknown repair tools are
//! only warnings: the chain builder drops them and carries on.

use std::collections::HashSet;

use crate::config::{RepairConfig, StepSpec};
use crate::errors::{RepairflowError, RepairflowResult};

/// Configuration validator
pub struct ConfigValidator;

impl ConfigValidator {
    /// Validate a configuration
    pub fn validate(config: &RepairConfig) -> ValidationResult {
        let mut result = ValidationResult::new();

        if config.pipeline.is_empty() && config.repair_tools.is_empty() {
            result.add_error("Pipeline has no steps defined");
        }

        if config.pipeline.final_segment.is_empty() && !config.pipeline.is_empty() {
            result.add_warning(
                "No final steps defined - nothing is guaranteed to run after a halting failure",
            );
        }

        let mut seen_names = HashSet::new();
        for step in config.pipeline.all() {
            if step.name.trim().is_empty() {
                result.add_error("A pipeline step has no name");
                continue;
            }
            if !seen_names.insert(step.name.as_str()) {
                result.add_warning(&format!(
                    "Duplicate step name: '{}' - free memory samples will overwrite each other",
                    step.name
                ));
            }
            Self::validate_step(&step.name, step, &mut result);
        }

        for (name, tool) in &config.tools {
            Self::validate_step(name, tool, &mut result);
        }

        for name in &config.repair_tools {
            if !config.tools.contains_key(name) {
                result.add_warning(&format!(
                    "Repair tool '{}' has no definition and will be left out of the chain",
                    name
                ));
            }
        }

        for name in config.tools.keys() {
            if !config.repair_tools.contains(name) {
                result.add_warning(&format!("Tool '{}' is defined but not enabled", name));
            }
        }

        if which::which(&config.shell).is_err() {
            result.add_warning(&format!("Shell '{}' was not found in PATH", config.shell));
        }

        result
    }

    /// Validate, turning any error into [`RepairflowError::InvalidConfig`]
    pub fn ensure_valid(config: &RepairConfig) -> RepairflowResult<ValidationResult> {
        let result = Self::validate(config);
        if result.is_valid() {
            return Ok(result);
        }
        Err(RepairflowError::InvalidConfig {
            reason: result.errors.join("; "),
            help: Some("Run 'repairflow validate' for the full report".to_string()),
        })
    }

    /// Validate a single step definition
    fn validate_step(name: &str, step: &StepSpec, result: &mut ValidationResult) {
        if step.command.trim().is_empty() {
            result.add_error(&format!("Step '{}': command is empty", name));
        }

        if step.timeout_secs == Some(0) {
            result.add_error(&format!("Step '{}': timeout_secs must be positive", name));
        }
    }
}

/// Result of configuration validation
#[derive(Debug, Default)]
pub struct ValidationResult {
    pub errors: Vec<String>,
    pub warnings: Vec<String>,
}

impl ValidationResult {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn add_error(&mut self, message: &str) {
        self.errors.push(message.to_string());
    }

    pub fn add_warning(&mut self, message: &str) {
        self.warnings.push(message.to_string());
    }

    pub fn is_valid(&self) -> bool {
        self.errors.is_empty()
    }

    pub fn has_warnings(&self) -> bool {
        !self.warnings.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_validate_empty_config() {
        let result = ConfigValidator::validate(&RepairConfig::default());
        assert!(!result.is_valid());
        assert!(result.errors[0].contains("no steps"));
    }

    #[test]
    fn test_ensure_valid_reports_invalid_config() {
        let err = ConfigValidator::ensure_valid(&RepairConfig::default()).unwrap_err();
        match err {
            RepairflowError::InvalidConfig { reason, help } => {
                assert!(reason.contains("no steps"));
                assert!(help.is_some());
            }
            other => panic!("unexpected error: {}", other),
        }
    }

    #[test]
    fn test_unknown_tool_is_only_a_warning() {
        let config = RepairConfig::from_yaml(
            r#"
repair_tools: [ToolA, MissingTool]
pipeline:
  prefix:
    - name: Clone
      command: git clone x
  final:
    - name: Metrics
      command: ./metrics.sh
tools:
  ToolA:
    command: run-tool-a
"#,
        )
        .unwrap();

        let result = ConfigValidator::validate(&config);
        assert!(result.is_valid());
        assert!(result.warnings.iter().any(|w| w.contains("MissingTool")));
    }

    #[test]
    fn test_empty_command_and_zero_timeout() {
        let config = RepairConfig::from_yaml(
            r#"
pipeline:
  prefix:
    - name: Build
      command: ""
    - name: Test
      command: mvn test
      timeout_secs: 0
"#,
        )
        .unwrap();

        let result = ConfigValidator::validate(&config);
        assert!(!result.is_valid());
        assert!(result.errors.iter().any(|e| e.contains("command is empty")));
        assert!(result.errors.iter().any(|e| e.contains("timeout_secs")));
        assert!(result.warnings.iter().any(|w| w.contains("No final steps")));
    }

    #[test]
    fn test_duplicate_names_warn() {
        let config = RepairConfig::from_yaml(
            r#"
pipeline:
  prefix:
    - name: BuildProject
      command: mvn compile
  suffix:
    - name: BuildProject
      command: mvn compile
  final:
    - name: Metrics
      command: ./metrics.sh
"#,
        )
        .unwrap();

        let result = ConfigValidator::validate(&config);
        assert!(result.is_valid());
        assert!(result.warnings.iter().any(|w| w.contains("Duplicate")));
    }
}
