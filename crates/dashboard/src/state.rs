// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! The Dashboard's pipeline map (spec §4.D): guarded by a single mutex held
//! only for mutation and snapshot construction, never across socket I/O.

use chrono::{DateTime, Duration, Utc};
use parking_lot::Mutex;
use pf_core::{PipelineState, PipelineStatus, PipelineUpdate};
use std::collections::HashMap;

#[derive(Default)]
pub struct SharedState {
    pipelines: Mutex<HashMap<String, PipelineState>>,
}

impl SharedState {
    pub fn new() -> Self {
        Self::default()
    }

    /// Upsert a pipeline from an inbound `pipeline_update` (spec §4.D).
    pub fn apply_update(&self, payload: PipelineUpdate, now: DateTime<Utc>) {
        let mut pipelines = self.pipelines.lock();
        let entry = pipelines
            .entry(payload.id.clone())
            .or_insert_with(|| PipelineState::new(payload.id.clone(), String::new(), now));

        if now < entry.last_update {
            tracing::warn!(id = %payload.id, "dropping out-of-order pipeline_update");
            return;
        }

        if let Some(name) = payload.name {
            entry.name = name;
        }
        entry.status = payload.status;
        entry.metadata = payload.metadata;
        entry.error_message = payload.error_message;
        entry.last_update = now;
    }

    /// A `pipeline_heartbeat` only refreshes `last_update` (spec §4.D).
    pub fn apply_heartbeat(&self, id: &str, now: DateTime<Utc>) {
        let mut pipelines = self.pipelines.lock();
        if let Some(entry) = pipelines.get_mut(id) {
            if now >= entry.last_update {
                entry.last_update = now;
            }
        }
    }

    pub fn get(&self, id: &str) -> Option<PipelineState> {
        self.pipelines.lock().get(id).cloned()
    }

    pub fn snapshot(&self) -> HashMap<String, PipelineState> {
        self.pipelines.lock().clone()
    }

    /// Flip any `running` pipeline whose `last_update` is older than
    /// `timeout` to `failed` (spec §4.D sweeper). Returns whether anything
    /// changed, so the caller knows whether to broadcast.
    pub fn sweep_stale_running(&self, now: DateTime<Utc>, timeout: Duration) -> bool {
        let mut pipelines = self.pipelines.lock();
        let mut changed = false;
        for state in pipelines.values_mut() {
            if state.status == PipelineStatus::Running && now - state.last_update > timeout {
                state.status = PipelineStatus::Failed;
                state.error_message = Some("Pipeline timeout - no updates received".to_string());
                changed = true;
            }
        }
        changed
    }
}
