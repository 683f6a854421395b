// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Forwards the Orchestrator's `PipelineUpdate` events to the Dashboard
//! Server's Unix socket as `pipeline_update` frames (spec §4.D, §6).
//!
//! `launch-watcher` and `launch-dashboard` are independent processes; this
//! is the client half of that conversation. Best-effort: if the dashboard
//! isn't up, or goes away, updates are dropped rather than blocking the
//! Orchestrator.

use pf_core::PipelineUpdate;
use pf_wire::InboundMessage;
use std::path::PathBuf;
use std::time::Duration;
use tokio::net::UnixStream;
use tokio::sync::mpsc::UnboundedReceiver;

const CONNECT_RETRY_INTERVAL: Duration = Duration::from_secs(2);
const CONNECT_RETRIES: u32 = 5;

pub async fn run(socket_path: PathBuf, mut updates: UnboundedReceiver<PipelineUpdate>) {
    let mut stream = match connect_with_retry(&socket_path).await {
        Some(stream) => stream,
        None => {
            tracing::warn!(
                path = %socket_path.display(),
                "dashboard socket unreachable, pipeline updates will not be relayed"
            );
            while updates.recv().await.is_some() {}
            return;
        }
    };

    while let Some(update) = updates.recv().await {
        let message = InboundMessage::PipelineUpdate { payload: update };
        if let Err(e) = pf_wire::write_inbound(&mut stream, &message).await {
            tracing::warn!(error = %e, "lost connection to dashboard, dropping further updates");
            break;
        }
    }
}

async fn connect_with_retry(socket_path: &PathBuf) -> Option<UnixStream> {
    for attempt in 0..CONNECT_RETRIES {
        match UnixStream::connect(socket_path).await {
            Ok(stream) => return Some(stream),
            Err(e) => {
                tracing::debug!(attempt, error = %e, "dashboard socket not ready yet");
                tokio::time::sleep(CONNECT_RETRY_INTERVAL).await;
            }
        }
    }
    None
}
