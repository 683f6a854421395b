// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

use std::path::PathBuf;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum AuditError {
    #[error("source path has no file name: {0}")]
    InvalidSource(PathBuf),

    #[error(transparent)]
    Io(#[from] pf_fileops::FileOpsError),
}

/// Returned by [`crate::AuditStore::purge`] when some paths under the audit
/// root could not be removed. Carries what remained so callers can decide
/// whether to retry (spec §4.S).
#[derive(Debug, Error)]
#[error("purge left {} path(s) behind: {remaining:?}", remaining.len())]
pub struct PurgeIncomplete {
    pub remaining: Vec<PathBuf>,
}
