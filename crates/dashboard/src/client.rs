// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Per-client connection handling (spec §4.D): one task per client, a
//! broadcast subscription for `dashboard_update` fan-out, and a direct
//! channel for replies that only that client should see.

use crate::state::SharedState;
use pf_core::Clock;
use pf_wire::{read_inbound, write_outbound, InboundMessage, OutboundMessage, WireError};
use std::collections::HashMap;
use std::sync::Arc;
use tokio::net::UnixStream;
use tokio::sync::{broadcast, mpsc};

pub async fn handle_client<C: Clock>(stream: UnixStream, state: Arc<SharedState>, clock: C, tx: broadcast::Sender<OutboundMessage>) {
    let (mut read_half, write_half) = stream.into_split();
    let broadcast_rx = tx.subscribe();
    let (direct_tx, direct_rx) = mpsc::unbounded_channel::<OutboundMessage>();

    let writer = tokio::spawn(writer_task(write_half, broadcast_rx, direct_rx));

    loop {
        match read_inbound(&mut read_half).await {
            Ok(Some(InboundMessage::PipelineUpdate { payload })) => {
                let now = clock.now();
                state.apply_update(payload, now);
                let snapshot = state.snapshot();
                let _ = tx.send(OutboundMessage::dashboard_update(now, &snapshot));
            }
            Ok(Some(InboundMessage::PipelineHeartbeat { payload })) => {
                state.apply_heartbeat(&payload.id, clock.now());
            }
            Ok(Some(InboundMessage::GetPipelineStatus { pipeline_id })) => {
                let mut snapshot = HashMap::new();
                if let Some(p) = state.get(&pipeline_id) {
                    snapshot.insert(pipeline_id, p);
                }
                let message = OutboundMessage::dashboard_update(clock.now(), &snapshot);
                if direct_tx.send(message).is_err() {
                    break;
                }
            }
            Ok(None) => break,
            Err(WireError::Malformed(e)) => {
                tracing::warn!(error = %e, "malformed dashboard message, keeping connection open");
                if direct_tx.send(OutboundMessage::Error { message: e.to_string() }).is_err() {
                    break;
                }
            }
            Err(e) => {
                tracing::warn!(error = %e, "dashboard client connection error");
                break;
            }
        }
    }

    writer.abort();
}

async fn writer_task(
    mut write_half: tokio::net::unix::OwnedWriteHalf,
    mut broadcast_rx: broadcast::Receiver<OutboundMessage>,
    mut direct_rx: mpsc::UnboundedReceiver<OutboundMessage>,
) {
    loop {
        tokio::select! {
            msg = broadcast_rx.recv() => {
                match msg {
                    Ok(m) => {
                        if write_outbound(&mut write_half, &m).await.is_err() {
                            return;
                        }
                    }
                    Err(broadcast::error::RecvError::Lagged(_)) => continue,
                    Err(broadcast::error::RecvError::Closed) => return,
                }
            }
            msg = direct_rx.recv() => {
                match msg {
                    Some(m) => {
                        if write_outbound(&mut write_half, &m).await.is_err() {
                            return;
                        }
                    }
                    None => return,
                }
            }
        }
    }
}
