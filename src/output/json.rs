// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 repairflow contributors

//! JSON run serializer

use std::path::PathBuf;
use tracing::info;

use super::{RunDocument, Serializer};
use crate::errors::{RepairflowError, RepairflowResult};

/// Writes one pretty-printed JSON document per run
pub struct JsonSerializer {
    output_dir: PathBuf,
}

impl JsonSerializer {
    pub fn new(output_dir: PathBuf) -> Self {
        Self { output_dir }
    }

    /// Target file for a document
    pub fn path_for(&self, document: &RunDocument) -> PathBuf {
        self.output_dir.join(format!(
            "repairflow-{}-{}.json",
            document.context.repo_slug().replace('/', "-"),
            document.context.buggy_build().id
        ))
    }
}

impl Serializer for JsonSerializer {
    fn name(&self) -> &str {
        "json"
    }

    fn serialize(&self, document: &RunDocument) -> RepairflowResult<()> {
        let path = self.path_for(document);
        let write_error = |e: std::io::Error| RepairflowError::FileWriteError {
            path: path.clone(),
            error: e.to_string(),
        };

        std::fs::create_dir_all(&self.output_dir).map_err(write_error)?;
        let json = serde_json::to_string_pretty(document)?;
        std::fs::write(&path, json).map_err(write_error)?;

        info!("Run document written to {}", path.display());
        Ok(())
    }
}
