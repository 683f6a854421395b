// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Background sweeper: flips stale `running` pipelines to `failed` every
//! `sweep_interval` (spec §4.D, §8: "failed by t+360s").

use crate::state::SharedState;
use chrono::Duration;
use pf_core::Clock;
use pf_wire::OutboundMessage;
use std::sync::Arc;
use tokio::sync::broadcast;
use tokio_util::sync::CancellationToken;

pub async fn run<C: Clock>(
    state: Arc<SharedState>,
    clock: C,
    tx: broadcast::Sender<OutboundMessage>,
    sweep_interval: std::time::Duration,
    timeout: Duration,
    cancel: CancellationToken,
) {
    loop {
        tokio::select! {
            _ = cancel.cancelled() => return,
            _ = tokio::time::sleep(sweep_interval) => {}
        }

        let now = clock.now();
        if state.sweep_stale_running(now, timeout) {
            let snapshot = state.snapshot();
            let _ = tx.send(OutboundMessage::dashboard_update(now, &snapshot));
        }
    }
}
