// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

use std::path::PathBuf;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum DashboardError {
    #[error("failed to bind dashboard socket {path}: {source}")]
    Bind { path: PathBuf, #[source] source: std::io::Error },
}
