// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 repairflow contributors

//! Step chain builder
//!
//! A chain is an ordered list of steps plus the index where the final
//! segment starts. Building never executes anything.

use tracing::{error, warn};

use crate::pipeline::Step;

/// Resolves a configured step name (e.g. a repair tool) to a step
pub trait StepResolver: Send + Sync {
    fn resolve(&self, name: &str) -> Option<Box<dyn Step>>;
}

/// Ordered, linear sequence of steps for one run
#[derive(Default)]
pub struct Chain {
    steps: Vec<Box<dyn Step>>,
    final_start: Option<usize>,
}

impl Chain {
    pub fn new() -> Self {
        Self::default()
    }

    /// Link `step` after the current tail
    pub fn append(mut self, step: Box<dyn Step>) -> Self {
        self.steps.push(step);
        self
    }

    /// Append several steps in order
    pub fn append_all(self, steps: impl IntoIterator<Item = Box<dyn Step>>) -> Self {
        steps.into_iter().fold(self, Chain::append)
    }

    /// Append one step per name, skipping names the resolver does not know
    pub fn append_dynamic<S: AsRef<str>>(
        mut self,
        resolver: &dyn StepResolver,
        names: &[S],
    ) -> Self {
        for name in names {
            let name = name.as_ref();
            match resolver.resolve(name) {
                Some(step) => self.steps.push(step),
                None => error!("Error while getting repair step for the following name: {}", name),
            }
        }
        self
    }

    /// Append `step` and mark it as the start of the final segment
    pub fn mark_final_segment(mut self, step: Box<dyn Step>) -> Self {
        if let Some(start) = self.final_start {
            warn!(
                "Final segment already starts at '{}'; '{}' appended as a regular step",
                self.steps[start].name(),
                step.name()
            );
        } else {
            self.final_start = Some(self.steps.len());
        }
        self.steps.push(step);
        self
    }

    pub fn head(&self) -> Option<&dyn Step> {
        self.steps.first().map(|s| s.as_ref())
    }

    pub fn get(&self, index: usize) -> Option<&dyn Step> {
        self.steps.get(index).map(|s| s.as_ref())
    }

    pub fn len(&self) -> usize {
        self.steps.len()
    }

    pub fn is_empty(&self) -> bool {
        self.steps.is_empty()
    }

    /// Index of the first final-segment step
    pub fn final_segment_start(&self) -> Option<usize> {
        self.final_start
    }

    pub fn is_final(&self, index: usize) -> bool {
        self.final_start.is_some_and(|start| index >= start)
    }

    /// Step names in registration order
    pub fn names(&self) -> Vec<String> {
        self.steps.iter().map(|s| s.name().to_string()).collect()
    }

    pub fn iter(&self) -> impl Iterator<Item = &dyn Step> {
        self.steps.iter().map(|s| s.as_ref())
    }
}

impl std::fmt::Debug for Chain {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Chain")
            .field("steps", &self.names())
            .field("final_start", &self.final_start)
            .finish()
    }
}
