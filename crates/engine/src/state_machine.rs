// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Stage State Machine (spec §4.M): drives one file through one stage.

use crate::dashboard_sink::DashboardSink;
use crate::error::ProcessError;
use crate::outcome::ProcessOutcome;
use pf_audit::AuditStore;
use pf_core::{Clock, PipelineStatus, PipelineUpdate, StageId, SystemClock};
use pf_registry::{ProcessorOutcome, ProcessorRegistry};
use std::path::{Path, PathBuf};
use std::sync::Arc;

pub struct StateMachine<C: Clock = SystemClock> {
    stage_id: StageId,
    stage_dir: PathBuf,
    next_stage_dir: Option<PathBuf>,
    registry: Arc<dyn ProcessorRegistry>,
    audit: Arc<AuditStore<C>>,
    dashboard: Arc<dyn DashboardSink>,
}

impl<C: Clock> StateMachine<C> {
    pub fn new(
        stage_id: StageId,
        stage_dir: PathBuf,
        next_stage_dir: Option<PathBuf>,
        registry: Arc<dyn ProcessorRegistry>,
        audit: Arc<AuditStore<C>>,
        dashboard: Arc<dyn DashboardSink>,
    ) -> Self {
        Self { stage_id, stage_dir, next_stage_dir, registry, audit, dashboard }
    }

    /// Drive `file_name`, which must currently sit at the stage root, through
    /// working → processed → next (or → error). See spec §4.M for the
    /// numbered steps this follows.
    pub async fn process(&self, file_name: &str) -> Result<ProcessOutcome, ProcessError> {
        let file_path = self.stage_dir.join(file_name);

        // 1. Guard
        if !file_path.exists() {
            return Err(ProcessError::InputMissing(file_path));
        }

        // 2. Prepare
        let working_dir = self.stage_dir.join("working");
        let processed_dir = self.stage_dir.join("processed");
        let error_dir = self.stage_dir.join("error");
        pf_fileops::ensure_dir(&working_dir)?;
        pf_fileops::ensure_dir(&processed_dir)?;
        pf_fileops::ensure_dir(&error_dir)?;

        // 3. Stage
        let working_path = pf_fileops::copy_file(&file_path, &working_dir)?;

        // 4. Dispatch
        let outcome = match self.registry.resolve(&self.stage_id).await {
            Ok(processor) => processor.process(&working_path).await,
            Err(e) => ProcessorOutcome::failure(e.to_string()),
        };

        // 5. Mirror input
        if let Err(e) = self.audit.mirror(&self.stage_id, &file_path, "") {
            tracing::warn!(stage = %self.stage_id, file = %file_path.display(), error = %e, "failed to mirror input");
        }

        // 6 & 7. Branch and finalize
        let process_outcome = if outcome.success {
            let result = self.advance(file_name, &working_path, &processed_dir);
            if result.is_ok() {
                std::fs::remove_file(&file_path)
                    .map_err(|e| ProcessError::Io(pf_fileops::FileOpsError::io(file_path.clone(), e)))?;
            }
            result?
        } else {
            self.fail(file_name, &file_path, &working_path, &error_dir, outcome.error_message)?
        };

        self.emit_dashboard_event(file_name, &process_outcome).await;
        Ok(process_outcome)
    }

    fn advance(
        &self,
        file_name: &str,
        working_path: &Path,
        processed_dir: &Path,
    ) -> Result<ProcessOutcome, ProcessError> {
        let processed_path = processed_dir.join(file_name);
        let final_processed = if processed_path.exists() {
            processed_path
        } else {
            // Open Question (a): a success with no distinct output file is a
            // pass-through move of the working copy (spec §4.M step 6).
            pf_fileops::move_file(working_path, processed_dir)?
        };

        if let Err(e) = self.audit.mirror(&self.stage_id, &final_processed, "processed") {
            tracing::warn!(stage = %self.stage_id, error = %e, "failed to mirror processed output");
        }

        match &self.next_stage_dir {
            Some(next_dir) => {
                let destination = move_with_collision_suffix(&final_processed, next_dir)?;
                Ok(ProcessOutcome::Advanced { destination })
            }
            None => Ok(ProcessOutcome::Parked { destination: final_processed }),
        }
    }

    fn fail(
        &self,
        file_name: &str,
        file_path: &Path,
        working_path: &Path,
        error_dir: &Path,
        error_message: Option<String>,
    ) -> Result<ProcessOutcome, ProcessError> {
        let err_name = format!("{file_name}.err");
        let moved_working = pf_fileops::move_file(working_path, error_dir)?;
        pf_fileops::rename_file(&moved_working, &err_name)?;

        if let Err(e) = self.audit.mirror(&self.stage_id, file_path, "causing_error") {
            tracing::warn!(stage = %self.stage_id, error = %e, "failed to mirror causing_error input");
        }

        let destination = pf_fileops::move_file(file_path, error_dir)?;
        Ok(ProcessOutcome::Errored { destination, reason: error_message.unwrap_or_default() })
    }

    async fn emit_dashboard_event(&self, file_name: &str, outcome: &ProcessOutcome) {
        let (status, error_message) = match outcome {
            ProcessOutcome::Advanced { .. } | ProcessOutcome::Parked { .. } => (PipelineStatus::Completed, None),
            ProcessOutcome::Errored { reason, .. } => (PipelineStatus::Failed, Some(reason.clone())),
        };

        let mut update = PipelineUpdate::new(self.stage_id.to_string(), status)
            .with_metadata("file", serde_json::Value::String(file_name.to_string()));
        if let Some(message) = error_message {
            update = update.with_error(message);
        }
        self.dashboard.emit(update).await;
    }
}

/// Move `src` into `dst_dir`, appending a numeric suffix before the
/// extension if the destination name already exists (spec §4.M edge case).
fn move_with_collision_suffix(src: &Path, dst_dir: &Path) -> Result<PathBuf, ProcessError> {
    pf_fileops::ensure_dir(dst_dir)?;

    let file_name = src.file_name().ok_or_else(|| {
        ProcessError::Io(pf_fileops::FileOpsError::io(
            src,
            std::io::Error::new(std::io::ErrorKind::InvalidInput, "source path has no file name"),
        ))
    })?;

    if !dst_dir.join(file_name).exists() {
        return Ok(pf_fileops::move_file(src, dst_dir)?);
    }

    let stem = src.file_stem().and_then(|s| s.to_str()).unwrap_or("file");
    let ext = src.extension().and_then(|e| e.to_str()).map(|e| format!(".{e}")).unwrap_or_default();

    let mut k = 1u32;
    loop {
        let candidate_name = format!("{stem}_{k}{ext}");
        if !dst_dir.join(&candidate_name).exists() {
            let moved = pf_fileops::move_file(src, dst_dir)?;
            return Ok(pf_fileops::rename_file(&moved, &candidate_name)?);
        }
        k += 1;
    }
}

#[cfg(test)]
#[path = "state_machine_tests.rs"]
mod tests;
