// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! `pf launch-watcher` — runs the Orchestrator: discovers stages under
//! `pipeline_dir` and watches each one until cancelled (spec §4.O).

use crate::commands::error::CliError;
use crate::commands::{relay, shutdown};
use pf_audit::AuditStore;
use pf_core::PipelineConfig;
use pf_engine::{ChannelDashboardSink, DashboardSink, Orchestrator};
use pf_registry::{ExternalProcessRegistry, ProcessorRegistry};
use std::path::Path;
use std::sync::Arc;
use std::time::Duration;
use tokio::signal::unix::{signal, SignalKind};
use tokio::sync::mpsc;
use tokio_util::sync::CancellationToken;

pub async fn run(config_path: &Path) -> Result<(), CliError> {
    let config = PipelineConfig::load(config_path)?;

    let stages = Orchestrator::<pf_core::SystemClock>::discover_stages(&config.pipeline_dir)
        .map_err(|source| CliError::StageDiscovery { path: config.pipeline_dir.clone(), source })?;
    tracing::info!(stage_count = stages.len(), pipeline_dir = %config.pipeline_dir.display(), "discovered stages");

    let registry: Arc<dyn ProcessorRegistry> = Arc::new(
        ExternalProcessRegistry::new(config.processes_dir.clone(), config.process_file_prefix.clone()),
    );
    let audit = Arc::new(AuditStore::new(config.pipeline_storage_dir.clone()));

    let (dashboard_tx, dashboard_rx) = mpsc::unbounded_channel();
    let dashboard: Arc<dyn DashboardSink> = Arc::new(ChannelDashboardSink::new(dashboard_tx));
    tokio::spawn(relay::run(config.dashboard_socket_path.clone(), dashboard_rx));

    let orchestrator = Orchestrator::new(
        config.pipeline_dir.clone(),
        stages,
        registry,
        audit,
        dashboard,
        Duration::from_secs(config.poll_frequency),
        config.stability_checks,
        Duration::from_millis(config.stability_interval_ms),
        stability_timeout(&config),
    );

    let cancel = CancellationToken::new();
    let mut sigterm = signal(SignalKind::terminate()).map_err(CliError::Signal)?;

    let run_fut = orchestrator.run(cancel.clone());
    tokio::pin!(run_fut);

    loop {
        tokio::select! {
            _ = &mut run_fut => return Ok(()),
            _ = shutdown::wait_for_shutdown_signal(&mut sigterm) => cancel.cancel(),
        }
    }
}

/// Overall budget for a single stability probe: enough intervals for
/// `stability_checks` consecutive stable samples, plus a two-interval margin
/// for scheduling jitter.
fn stability_timeout(config: &PipelineConfig) -> Duration {
    Duration::from_millis(config.stability_interval_ms * (config.stability_checks as u64 + 2))
}
