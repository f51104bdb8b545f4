// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 repairflow contributors

//! Step implementations
//!
//! The orchestrator only knows the [`Step`] trait. This module supplies the
//! concrete steps a configuration describes.

mod command;

pub use command::CommandStep;

use std::collections::BTreeMap;

use crate::config::{PipelineLayout, RepairConfig, StepSpec};
use crate::pipeline::{Step, StepResolver};

/// Supplies the fixed steps around the repair tools
pub trait StepCatalog: Send + Sync {
    /// Steps before the repair tools
    fn prefix(&self) -> Vec<Box<dyn Step>>;

    /// Steps after the repair tools
    fn suffix(&self) -> Vec<Box<dyn Step>>;

    /// Steps that always run once a failure has been classified
    fn final_segment(&self) -> Vec<Box<dyn Step>>;
}

/// Catalog and resolver built from a [`RepairConfig`]
#[derive(Debug, Clone)]
pub struct ConfiguredCatalog {
    shell: String,
    layout: PipelineLayout,
    tools: BTreeMap<String, StepSpec>,
}

impl ConfiguredCatalog {
    pub fn new(config: &RepairConfig) -> Self {
        let tools = config
            .tools
            .keys()
            .filter_map(|name| config.tool(name).map(|spec| (name.clone(), spec)))
            .collect();

        Self {
            shell: config.shell.clone(),
            layout: config.pipeline.clone(),
            tools,
        }
    }

    fn build(&self, specs: &[StepSpec]) -> Vec<Box<dyn Step>> {
        specs
            .iter()
            .map(|spec| CommandStep::boxed(spec.clone(), self.shell.clone()))
            .collect()
    }
}

impl StepCatalog for ConfiguredCatalog {
    fn prefix(&self) -> Vec<Box<dyn Step>> {
        self.build(&self.layout.prefix)
    }

    fn suffix(&self) -> Vec<Box<dyn Step>> {
        self.build(&self.layout.suffix)
    }

    fn final_segment(&self) -> Vec<Box<dyn Step>> {
        self.build(&self.layout.final_segment)
    }
}

impl StepResolver for ConfiguredCatalog {
    fn resolve(&self, name: &str) -> Option<Box<dyn Step>> {
        self.tools
            .get(name)
            .map(|spec| CommandStep::boxed(spec.clone(), self.shell.clone()))
    }
}
