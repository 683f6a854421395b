// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Dashboard pipeline state (spec §3, §4.D).

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::collections::HashMap;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum PipelineStatus {
    Idle,
    Running,
    Completed,
    Failed,
    Paused,
}

impl PipelineStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Idle => "idle",
            Self::Running => "running",
            Self::Completed => "completed",
            Self::Failed => "failed",
            Self::Paused => "paused",
        }
    }
}

impl std::fmt::Display for PipelineStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// A pipeline's aggregated status as tracked by the Dashboard (spec §3).
///
/// Invariant: `last_update` is monotonically non-decreasing per `id` — the
/// Dashboard must reject (or simply not apply) any update carrying an older
/// timestamp than what it already has.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PipelineState {
    pub id: String,
    pub name: String,
    pub status: PipelineStatus,
    pub last_update: DateTime<Utc>,
    #[serde(default)]
    pub metadata: HashMap<String, serde_json::Value>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub error_message: Option<String>,
}

impl PipelineState {
    pub fn new(id: impl Into<String>, name: impl Into<String>, now: DateTime<Utc>) -> Self {
        Self {
            id: id.into(),
            name: name.into(),
            status: PipelineStatus::Idle,
            last_update: now,
            metadata: HashMap::new(),
            error_message: None,
        }
    }
}

/// Payload of an inbound `pipeline_update` message (spec §6): the fields a
/// producer supplies when upserting a pipeline's state. `name` is optional so
/// a heartbeat-style update need not repeat it.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PipelineUpdate {
    pub id: String,
    #[serde(default)]
    pub name: Option<String>,
    pub status: PipelineStatus,
    #[serde(default)]
    pub metadata: HashMap<String, serde_json::Value>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub error_message: Option<String>,
}

impl PipelineUpdate {
    pub fn new(id: impl Into<String>, status: PipelineStatus) -> Self {
        Self { id: id.into(), name: None, status, metadata: HashMap::new(), error_message: None }
    }

    pub fn with_error(mut self, message: impl Into<String>) -> Self {
        self.error_message = Some(message.into());
        self
    }

    pub fn with_metadata(mut self, key: impl Into<String>, value: serde_json::Value) -> Self {
        self.metadata.insert(key.into(), value);
        self
    }
}

/// Aggregate counts across all tracked pipelines (spec §4.D).
///
/// `paused` pipelines are counted in `total` but not in any other bucket —
/// this matches the original implementation verbatim (spec §9, Open Question c).
#[derive(Debug, Clone, Copy, Default, Serialize, Deserialize)]
pub struct GlobalStats {
    pub total: usize,
    pub active: usize,
    pub failed: usize,
    pub completed: usize,
    pub idle: usize,
}

impl GlobalStats {
    pub fn compute<'a>(pipelines: impl Iterator<Item = &'a PipelineState>) -> Self {
        let mut stats = GlobalStats::default();
        for pipeline in pipelines {
            stats.total += 1;
            match pipeline.status {
                PipelineStatus::Running => stats.active += 1,
                PipelineStatus::Failed => stats.failed += 1,
                PipelineStatus::Completed => stats.completed += 1,
                PipelineStatus::Idle => stats.idle += 1,
                PipelineStatus::Paused => {}
            }
        }
        stats
    }
}
