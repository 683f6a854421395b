// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Typed configuration for the `PIPELINE` namespace (spec §6).
//!
//! Loaded once at startup into an explicit value threaded through component
//! constructors — no module-level config state (spec §9, "Global
//! configuration and loggers").

use serde::Deserialize;
use std::path::{Path, PathBuf};
use thiserror::Error;

fn default_poll_frequency() -> u64 {
    30
}

fn default_prefix() -> String {
    "pipeline_step_".to_string()
}

fn default_entry_point() -> String {
    "process_this".to_string()
}

fn default_sweep_interval() -> u64 {
    60
}

fn default_timeout() -> u64 {
    300
}

fn default_stability_checks() -> u32 {
    3
}

fn default_stability_interval_ms() -> u64 {
    500
}

/// Deserialized `[pipeline]` table plus dashboard-only extensions.
#[derive(Debug, Clone, Deserialize)]
pub struct PipelineConfig {
    pub pipeline_dir: PathBuf,
    pub pipeline_storage_dir: PathBuf,
    pub processes_dir: PathBuf,
    pub success_dir: PathBuf,
    pub error_dir: PathBuf,
    #[serde(default = "default_poll_frequency")]
    pub poll_frequency: u64,
    #[serde(default = "default_prefix")]
    pub process_file_prefix: String,
    #[serde(default = "default_entry_point")]
    pub process_file_function_name: String,
    /// Socket path the Dashboard binds/connects to. Not part of the
    /// original `PIPELINE` namespace (spec has no dashboard transport key);
    /// added here since a real dashboard needs one.
    #[serde(default = "default_socket_path")]
    pub dashboard_socket_path: PathBuf,
    #[serde(default = "default_sweep_interval")]
    pub sweep_interval_secs: u64,
    #[serde(default = "default_timeout")]
    pub timeout_secs: u64,
    #[serde(default = "default_stability_checks")]
    pub stability_checks: u32,
    #[serde(default = "default_stability_interval_ms")]
    pub stability_interval_ms: u64,
}

fn default_socket_path() -> PathBuf {
    PathBuf::from("pipeline-dashboard.sock")
}

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("failed to read config file {path}: {source}")]
    Read { path: PathBuf, #[source] source: std::io::Error },

    #[error("failed to parse config file {path}: {source}")]
    Parse { path: PathBuf, #[source] source: toml::de::Error },

    #[error("config key `{0}` is missing or invalid")]
    MissingKey(String),
}

impl PipelineConfig {
    pub fn load(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        let path = path.as_ref();
        let raw = std::fs::read_to_string(path)
            .map_err(|source| ConfigError::Read { path: path.to_path_buf(), source })?;
        Self::parse(&raw, path)
    }

    fn parse(raw: &str, path: &Path) -> Result<Self, ConfigError> {
        #[derive(Deserialize)]
        struct Wrapper {
            pipeline: PipelineConfig,
        }
        let wrapper: Wrapper = toml::from_str(raw)
            .map_err(|source| ConfigError::Parse { path: path.to_path_buf(), source })?;
        Ok(wrapper.pipeline)
    }
}
