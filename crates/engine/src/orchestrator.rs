// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Orchestrator (spec §4.O): discovers stages once at startup, spawns one
//! Watcher per stage, and supervises them until cancelled.

use crate::dashboard_sink::DashboardSink;
use crate::state_machine::StateMachine;
use crate::watcher::Watcher;
use pf_audit::AuditStore;
use pf_core::{Clock, StageId};
use pf_registry::ProcessorRegistry;
use std::path::{Path, PathBuf};
use std::sync::Arc;
use std::time::Duration;
use tokio_util::sync::CancellationToken;

pub struct Orchestrator<C: Clock> {
    watchers: Vec<Arc<Watcher<C>>>,
}

impl<C: Clock> Orchestrator<C> {
    /// Enumerate leaf stage directories under `pipeline_dir`, lexicographically
    /// ordered by base name (spec §3). Hot-add/remove after this call is not
    /// supported (spec §9).
    pub fn discover_stages(pipeline_dir: &Path) -> std::io::Result<Vec<StageId>> {
        let mut stages = Vec::new();
        for entry in std::fs::read_dir(pipeline_dir)? {
            let entry = entry?;
            if entry.file_type()?.is_dir() {
                if let Some(name) = entry.file_name().to_str() {
                    stages.push(StageId::new(name));
                }
            }
        }
        stages.sort();
        Ok(stages)
    }

    #[allow(clippy::too_many_arguments)]
    pub fn new(
        pipeline_dir: PathBuf,
        stages: Vec<StageId>,
        registry: Arc<dyn ProcessorRegistry>,
        audit: Arc<AuditStore<C>>,
        dashboard: Arc<dyn DashboardSink>,
        poll_interval: Duration,
        stability_checks: u32,
        stability_interval: Duration,
        stability_timeout: Duration,
    ) -> Self {
        let watchers = stages
            .iter()
            .enumerate()
            .map(|(i, stage_id)| {
                let stage_dir = pipeline_dir.join(stage_id.as_str());
                let next_stage_dir = stages.get(i + 1).map(|next| pipeline_dir.join(next.as_str()));
                let state_machine = StateMachine::new(
                    stage_id.clone(),
                    stage_dir.clone(),
                    next_stage_dir,
                    Arc::clone(&registry),
                    Arc::clone(&audit),
                    Arc::clone(&dashboard),
                );
                Arc::new(Watcher::new(
                    stage_dir,
                    state_machine,
                    poll_interval,
                    stability_checks,
                    stability_interval,
                    stability_timeout,
                ))
            })
            .collect();

        Self { watchers }
    }

    pub fn stage_count(&self) -> usize {
        self.watchers.len()
    }

    /// Spawn one background task per stage and wait for all of them to
    /// return. A Watcher only returns once `cancel` fires and it has
    /// finished whatever file it was mid-move on (spec §5).
    pub async fn run(&self, cancel: CancellationToken) {
        let handles: Vec<_> = self
            .watchers
            .iter()
            .cloned()
            .map(|watcher| {
                let cancel = cancel.clone();
                tokio::spawn(async move { watcher.run(cancel).await })
            })
            .collect();

        for handle in handles {
            if let Err(e) = handle.await {
                tracing::error!(error = %e, "watcher task panicked");
            }
        }
    }
}
