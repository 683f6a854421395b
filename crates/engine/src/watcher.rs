// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Per-Stage Watcher (spec §4.W): polls one stage directory, detects
//! new/modified files, and hands each stable one to the State Machine.

use crate::state_machine::StateMachine;
use pf_core::Clock;
use std::collections::HashMap;
use std::path::{Path, PathBuf};
use std::time::{Duration, SystemTime};
use tokio_util::sync::CancellationToken;

const RESERVED_SUBDIRS: [&str; 3] = ["working", "processed", "error"];

pub struct Watcher<C: Clock> {
    stage_dir: PathBuf,
    state_machine: StateMachine<C>,
    poll_interval: Duration,
    stability_checks: u32,
    stability_interval: Duration,
    stability_timeout: Duration,
}

impl<C: Clock> Watcher<C> {
    pub fn new(
        stage_dir: PathBuf,
        state_machine: StateMachine<C>,
        poll_interval: Duration,
        stability_checks: u32,
        stability_interval: Duration,
        stability_timeout: Duration,
    ) -> Self {
        Self { stage_dir, state_machine, poll_interval, stability_checks, stability_interval, stability_timeout }
    }

    /// Poll until `cancel` fires. Cancellation is only observed between
    /// iterations, never mid-move (spec §5).
    pub async fn run(&self, cancel: CancellationToken) {
        let mut snapshot: HashMap<String, SystemTime> = HashMap::new();
        let mut first_iteration = true;

        loop {
            if cancel.is_cancelled() {
                return;
            }

            if let Err(e) = self.poll_once(&mut snapshot, first_iteration).await {
                tracing::error!(stage_dir = %self.stage_dir.display(), error = %e, "watcher poll failed");
            }
            first_iteration = false;

            tokio::select! {
                _ = cancel.cancelled() => return,
                _ = tokio::time::sleep(self.poll_interval) => {}
            }
        }
    }

    async fn poll_once(
        &self,
        snapshot: &mut HashMap<String, SystemTime>,
        first_iteration: bool,
    ) -> std::io::Result<()> {
        let mut entries = list_candidates(&self.stage_dir)?;
        entries.sort_by(|a, b| a.0.cmp(&b.0));

        for (name, mtime) in entries {
            let emit = first_iteration
                || match snapshot.get(&name) {
                    None => true,
                    Some(prev) => mtime > *prev,
                };
            snapshot.insert(name.clone(), mtime);

            if emit {
                self.handle_candidate(&name).await;
            }
        }

        Ok(())
    }

    async fn handle_candidate(&self, file_name: &str) {
        let path = self.stage_dir.join(file_name);
        let stable = pf_fileops::wait_until_stable(
            &path,
            self.stability_checks,
            self.stability_interval,
            self.stability_timeout,
        )
        .await;

        if !stable {
            tracing::debug!(file = %path.display(), "file not yet stable, will re-check next poll");
            return;
        }

        match self.state_machine.process(file_name).await {
            Ok(outcome) => tracing::info!(file = %path.display(), outcome = ?outcome, "processed file"),
            Err(e) => tracing::error!(file = %path.display(), error = %e, "state machine failed"),
        }
    }
}

fn list_candidates(stage_dir: &Path) -> std::io::Result<Vec<(String, SystemTime)>> {
    let mut out = Vec::new();
    let read_dir = match std::fs::read_dir(stage_dir) {
        Ok(rd) => rd,
        Err(e) if e.kind() == std::io::ErrorKind::NotFound => return Ok(out),
        Err(e) => return Err(e),
    };

    for entry in read_dir {
        let entry = entry?;
        let name = entry.file_name();
        let Some(name) = name.to_str() else { continue };

        if name.starts_with('.') || RESERVED_SUBDIRS.contains(&name) {
            continue;
        }

        let metadata = entry.metadata()?;
        if !metadata.is_file() {
            continue;
        }

        out.push((name.to_string(), metadata.modified()?));
    }

    Ok(out)
}

#[cfg(test)]
#[path = "watcher_tests.rs"]
mod tests;
