// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! `pf launch-dashboard` — runs the Dashboard Server (spec §4.D).

use crate::commands::error::CliError;
use crate::commands::shutdown;
use pf_core::{PipelineConfig, SystemClock};
use pf_dashboard::DashboardServer;
use std::path::Path;
use tokio::signal::unix::{signal, SignalKind};
use tokio_util::sync::CancellationToken;

pub async fn run(config_path: &Path) -> Result<(), CliError> {
    let config = PipelineConfig::load(config_path)?;

    let server = DashboardServer::new(
        config.dashboard_socket_path.clone(),
        SystemClock,
        config.sweep_interval_secs,
        config.timeout_secs,
    );

    let cancel = CancellationToken::new();
    let mut sigterm = signal(SignalKind::terminate()).map_err(CliError::Signal)?;

    tracing::info!(socket = %config.dashboard_socket_path.display(), "starting dashboard server");

    let run_fut = server.run(cancel.clone());
    tokio::pin!(run_fut);

    loop {
        tokio::select! {
            result = &mut run_fut => return result.map_err(CliError::from),
            _ = shutdown::wait_for_shutdown_signal(&mut sigterm) => cancel.cancel(),
        }
    }
}
