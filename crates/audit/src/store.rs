// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Append-only mirrors of files that pass through a stage (spec §4.S).

use crate::error::{AuditError, PurgeIncomplete};
use parking_lot::Mutex;
use pf_core::{AuditRecord, Clock, StageId, SystemClock};
use std::collections::HashMap;
use std::path::{Path, PathBuf};
use std::sync::Arc;

pub struct AuditStore<C: Clock = SystemClock> {
    audit_root: PathBuf,
    clock: C,
    stage_locks: Mutex<HashMap<StageId, Arc<Mutex<()>>>>,
}

impl AuditStore<SystemClock> {
    pub fn new(audit_root: impl Into<PathBuf>) -> Self {
        Self::with_clock(audit_root, SystemClock)
    }
}

impl<C: Clock> AuditStore<C> {
    pub fn with_clock(audit_root: impl Into<PathBuf>, clock: C) -> Self {
        Self { audit_root: audit_root.into(), clock, stage_locks: Mutex::new(HashMap::new()) }
    }

    fn stage_lock(&self, stage: &StageId) -> Arc<Mutex<()>> {
        Arc::clone(
            self.stage_locks
                .lock()
                .entry(stage.clone())
                .or_insert_with(|| Arc::new(Mutex::new(()))),
        )
    }

    /// Copy `source_path` into `<audit_root>/<stage>/`, then rename it to
    /// `<stem>_<tag>_<timestamp>[_<k>]<ext>`. The copy happens outside the
    /// per-stage lock; only the name-collision check and rename are
    /// serialized, so two stages never block each other.
    pub fn mirror(&self, stage: &StageId, source_path: &Path, tag: &str) -> Result<PathBuf, AuditError> {
        let stage_dir = self.audit_root.join(stage.as_str());
        pf_fileops::ensure_dir(&stage_dir)?;
        let temp_path = pf_fileops::copy_file(source_path, &stage_dir)?;

        let stem = source_path
            .file_stem()
            .and_then(|s| s.to_str())
            .ok_or_else(|| AuditError::InvalidSource(source_path.to_path_buf()))?;
        let ext = source_path
            .extension()
            .and_then(|e| e.to_str())
            .map(|e| format!(".{e}"))
            .unwrap_or_default();

        let _guard = self.stage_lock(stage).lock();

        let mut record = AuditRecord::new(stage.clone(), stem, tag, self.clock.now(), ext.clone());
        let mut candidate = stage_dir.join(record.file_name());
        let mut counter = 1u32;
        while candidate.exists() {
            record = record.with_counter(counter);
            candidate = stage_dir.join(record.file_name());
            counter += 1;
        }

        pf_fileops::rename_file(&temp_path, record.file_name())?;
        tracing::info!(stage = %stage, record = %candidate.display(), "mirrored audit record");
        Ok(candidate)
    }

    /// Remove every file and subdirectory under the audit root, leaving the
    /// root itself in place. Partial failures are aggregated rather than
    /// aborting the sweep (spec §4.S).
    pub fn purge(&self) -> Result<(), PurgeIncomplete> {
        let entries = match std::fs::read_dir(&self.audit_root) {
            Ok(entries) => entries,
            Err(_) => return Ok(()),
        };

        let mut remaining = Vec::new();
        for entry in entries.flatten() {
            let path = entry.path();
            let result = if path.is_dir() { std::fs::remove_dir_all(&path) } else { std::fs::remove_file(&path) };
            if let Err(e) = result {
                tracing::warn!(path = %path.display(), error = %e, "failed to purge audit path");
                remaining.push(path);
            }
        }

        if remaining.is_empty() {
            Ok(())
        } else {
            Err(PurgeIncomplete { remaining })
        }
    }
}

#[cfg(test)]
#[path = "store_tests.rs"]
mod tests;
