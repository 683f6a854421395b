// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

use std::path::PathBuf;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum CliError {
    #[error(transparent)]
    Config(#[from] pf_core::ConfigError),

    #[error(transparent)]
    Dashboard(#[from] pf_dashboard::DashboardError),

    #[error("failed to discover stages under {path}: {source}")]
    StageDiscovery { path: PathBuf, source: std::io::Error },

    #[error("failed to install signal handler: {0}")]
    Signal(std::io::Error),
}
