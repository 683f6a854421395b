// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Where the State Machine and Watcher send dashboard events. Kept as a
//! trait so the engine doesn't depend on the wire transport directly — the
//! CLI wires a real socket-backed sink at startup.

use async_trait::async_trait;
use pf_core::PipelineUpdate;
use tokio::sync::mpsc::UnboundedSender;

#[async_trait]
pub trait DashboardSink: Send + Sync {
    async fn emit(&self, update: PipelineUpdate);
}

/// Drops every event. Used where no dashboard is wired up (`launch-watcher`
/// without `launch-dashboard`).
pub struct NullDashboardSink;

#[async_trait]
impl DashboardSink for NullDashboardSink {
    async fn emit(&self, _update: PipelineUpdate) {}
}

/// Forwards events over an in-process channel, e.g. to a task that relays
/// them to the Dashboard Server over its socket.
pub struct ChannelDashboardSink {
    sender: UnboundedSender<PipelineUpdate>,
}

impl ChannelDashboardSink {
    pub fn new(sender: UnboundedSender<PipelineUpdate>) -> Self {
        Self { sender }
    }
}

#[async_trait]
impl DashboardSink for ChannelDashboardSink {
    async fn emit(&self, update: PipelineUpdate) {
        if self.sender.send(update).is_err() {
            tracing::debug!("dashboard sink channel closed, dropping update");
        }
    }
}
