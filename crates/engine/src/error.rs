// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

use std::path::PathBuf;
use thiserror::Error;

/// Failure modes from [`crate::StateMachine::process`] (spec §4.M, §7).
///
/// Only guard failures (step 1) and genuine I/O errors propagate here.
/// Processor failures and registry resolution failures are not errors —
/// they route to the `Errored` branch of [`crate::ProcessOutcome`].
#[derive(Debug, Error)]
pub enum ProcessError {
    #[error("input file missing: {0}")]
    InputMissing(PathBuf),

    #[error(transparent)]
    Io(#[from] pf_fileops::FileOpsError),
}
