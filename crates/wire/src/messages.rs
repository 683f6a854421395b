// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Message kinds carried over the Dashboard socket (spec §4.D, §6).

use chrono::{DateTime, Utc};
use pf_core::{GlobalStats, PipelineState, PipelineStatus, PipelineUpdate};
use serde::{Deserialize, Serialize};
use std::collections::HashMap;

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct HeartbeatPayload {
    pub id: String,
}

/// An inbound message recognized by the Dashboard Server (spec §4.D, §6).
///
/// Also serialized by producers (the Orchestrator's dashboard relay, test
/// harnesses) that speak this protocol as a client rather than a server.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum InboundMessage {
    PipelineUpdate { payload: PipelineUpdate },
    PipelineHeartbeat { payload: HeartbeatPayload },
    GetPipelineStatus { pipeline_id: String },
}

/// A pipeline's state as it appears in a `dashboard_update` snapshot, keyed
/// by id in the surrounding map (so `id` itself is not repeated here).
#[derive(Debug, Clone, Serialize)]
pub struct PipelineSnapshot {
    pub name: String,
    pub status: PipelineStatus,
    pub last_update: DateTime<Utc>,
    pub metadata: HashMap<String, serde_json::Value>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error_message: Option<String>,
}

impl From<&PipelineState> for PipelineSnapshot {
    fn from(state: &PipelineState) -> Self {
        Self {
            name: state.name.clone(),
            status: state.status,
            last_update: state.last_update,
            metadata: state.metadata.clone(),
            error_message: state.error_message.clone(),
        }
    }
}

/// An outbound message broadcast by the Dashboard Server to every connected
/// client (spec §6).
#[derive(Debug, Clone, Serialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum OutboundMessage {
    DashboardUpdate {
        timestamp: DateTime<Utc>,
        global_stats: GlobalStats,
        pipelines: HashMap<String, PipelineSnapshot>,
    },
    Error {
        message: String,
    },
}

impl OutboundMessage {
    pub fn dashboard_update(timestamp: DateTime<Utc>, pipelines: &HashMap<String, PipelineState>) -> Self {
        let global_stats = GlobalStats::compute(pipelines.values());
        let pipelines =
            pipelines.iter().map(|(id, state)| (id.clone(), PipelineSnapshot::from(state))).collect();
        OutboundMessage::DashboardUpdate { timestamp, global_stats, pipelines }
    }
}
