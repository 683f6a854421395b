// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Subprocess-backed processor resolution.
//!
//! Stage name `N` maps to `<processors_dir>/<prefix><N><ext>`, invoked as a
//! subprocess with the working-file path as its sole argument. This is the
//! closest in-spirit replacement for the original's dynamically-imported
//! per-stage Python module (spec §9, Design Note: "a plugin interface
//! implemented by sibling binaries invoked over a pipe").

use crate::error::RegistryError;
use crate::processor::{Processor, ProcessorOutcome};
use crate::registry::ProcessorRegistry;
use async_trait::async_trait;
use parking_lot::Mutex;
use pf_core::StageId;
use std::collections::HashMap;
use std::path::{Path, PathBuf};
use std::sync::Arc;

pub struct ExternalProcessRegistry {
    processors_dir: PathBuf,
    prefix: String,
    ext: String,
    cache: Mutex<HashMap<StageId, Arc<dyn Processor>>>,
}

impl ExternalProcessRegistry {
    pub fn new(processors_dir: impl Into<PathBuf>, prefix: impl Into<String>) -> Self {
        Self {
            processors_dir: processors_dir.into(),
            prefix: prefix.into(),
            ext: String::new(),
            cache: Mutex::new(HashMap::new()),
        }
    }

    pub fn with_extension(mut self, ext: impl Into<String>) -> Self {
        self.ext = ext.into();
        self
    }

    fn module_path(&self, stage: &StageId) -> PathBuf {
        self.processors_dir.join(format!("{}{}{}", self.prefix, stage, self.ext))
    }
}

#[cfg(unix)]
fn is_executable(metadata: &std::fs::Metadata) -> bool {
    use std::os::unix::fs::PermissionsExt;
    metadata.permissions().mode() & 0o111 != 0
}

#[cfg(not(unix))]
fn is_executable(_metadata: &std::fs::Metadata) -> bool {
    true
}

#[async_trait]
impl ProcessorRegistry for ExternalProcessRegistry {
    async fn resolve(&self, stage: &StageId) -> Result<Arc<dyn Processor>, RegistryError> {
        if let Some(cached) = self.cache.lock().get(stage).cloned() {
            return Ok(cached);
        }

        let path = self.module_path(stage);
        let metadata = std::fs::metadata(&path)
            .map_err(|_| RegistryError::StageNotFound(stage.clone()))?;

        if !metadata.is_file() {
            return Err(RegistryError::ProcessorNotFound(stage.clone()));
        }
        if !is_executable(&metadata) {
            return Err(RegistryError::ProcessorNotCallable(stage.clone()));
        }

        let processor: Arc<dyn Processor> = Arc::new(ExternalProcessor { path });
        self.cache.lock().insert(stage.clone(), Arc::clone(&processor));
        Ok(processor)
    }

    fn reload(&self) {
        self.cache.lock().clear();
    }
}

struct ExternalProcessor {
    path: PathBuf,
}

#[async_trait]
impl Processor for ExternalProcessor {
    async fn process(&self, working_file: &Path) -> ProcessorOutcome {
        tracing::info!(processor = %self.path.display(), file = %working_file.display(), "invoking processor");
        let result = tokio::process::Command::new(&self.path).arg(working_file).output().await;

        match result {
            Ok(output) if output.status.success() => ProcessorOutcome::success(),
            Ok(output) => {
                let stderr = String::from_utf8_lossy(&output.stderr).trim().to_string();
                let message = if stderr.is_empty() {
                    format!("processor exited with {}", output.status)
                } else {
                    stderr
                };
                ProcessorOutcome::failure(message)
            }
            Err(e) => ProcessorOutcome::failure(format!("failed to spawn processor: {e}")),
        }
    }
}

#[cfg(test)]
#[path = "external_tests.rs"]
mod tests;
