// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

use std::path::PathBuf;
use thiserror::Error;

/// Errors from file operations. Carries the path that was being operated on
/// so callers can log without re-deriving it, and surfaces the original OS
/// error kind per spec §4.F.
#[derive(Debug, Error)]
pub enum FileOpsError {
    #[error("I/O failure on {path}: {source}")]
    Io { path: PathBuf, #[source] source: std::io::Error },
}

impl FileOpsError {
    pub fn io(path: impl Into<PathBuf>, source: std::io::Error) -> Self {
        Self::Io { path: path.into(), source }
    }

    /// The underlying `std::io::ErrorKind`, for callers that branch on it.
    pub fn kind(&self) -> std::io::ErrorKind {
        match self {
            Self::Io { source, .. } => source.kind(),
        }
    }
}
