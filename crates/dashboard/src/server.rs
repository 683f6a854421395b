// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Dashboard Server (spec §4.D): accepts connections on a Unix domain
//! socket, upserts pipeline state, and broadcasts `dashboard_update`
//! snapshots to every connected client.

use crate::client::handle_client;
use crate::error::DashboardError;
use crate::state::SharedState;
use crate::sweeper;
use chrono::Duration as ChronoDuration;
use pf_core::{Clock, SystemClock};
use pf_wire::OutboundMessage;
use std::path::PathBuf;
use std::sync::Arc;
use std::time::Duration;
use tokio::net::UnixListener;
use tokio::sync::broadcast;
use tokio_util::sync::CancellationToken;

pub struct DashboardServer<C: Clock = SystemClock> {
    socket_path: PathBuf,
    state: Arc<SharedState>,
    clock: C,
    sweep_interval: Duration,
    timeout: ChronoDuration,
}

impl<C: Clock> DashboardServer<C> {
    pub fn new(socket_path: impl Into<PathBuf>, clock: C, sweep_interval_secs: u64, timeout_secs: u64) -> Self {
        Self {
            socket_path: socket_path.into(),
            state: Arc::new(SharedState::new()),
            clock,
            sweep_interval: Duration::from_secs(sweep_interval_secs),
            timeout: ChronoDuration::seconds(timeout_secs as i64),
        }
    }

    /// Current pipeline map, for callers that want to inspect state without
    /// going through the socket (tests, in-process admin hooks).
    pub fn state(&self) -> Arc<SharedState> {
        Arc::clone(&self.state)
    }

    pub async fn run(&self, cancel: CancellationToken) -> Result<(), DashboardError> {
        if self.socket_path.exists() {
            let _ = std::fs::remove_file(&self.socket_path);
        }
        let listener = UnixListener::bind(&self.socket_path)
            .map_err(|source| DashboardError::Bind { path: self.socket_path.clone(), source })?;

        let (tx, _rx) = broadcast::channel::<OutboundMessage>(128);

        let sweeper_handle = tokio::spawn(sweeper::run(
            Arc::clone(&self.state),
            self.clock.clone(),
            tx.clone(),
            self.sweep_interval,
            self.timeout,
            cancel.clone(),
        ));

        loop {
            tokio::select! {
                _ = cancel.cancelled() => break,
                accepted = listener.accept() => {
                    match accepted {
                        Ok((stream, _addr)) => {
                            let state = Arc::clone(&self.state);
                            let clock = self.clock.clone();
                            let client_tx = tx.clone();
                            tokio::spawn(async move { handle_client(stream, state, clock, client_tx).await; });
                        }
                        Err(e) => tracing::error!(error = %e, "dashboard accept failed"),
                    }
                }
            }
        }

        sweeper_handle.abort();
        let _ = std::fs::remove_file(&self.socket_path);
        Ok(())
    }
}

#[cfg(test)]
#[path = "server_tests.rs"]
mod tests;
