// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

use pf_core::StageId;
use thiserror::Error;

/// Failure modes from resolving a stage to a processor (spec §4.R).
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum RegistryError {
    #[error("no processor module found for stage `{0}`")]
    StageNotFound(StageId),

    #[error("processor for stage `{0}` was not found at its expected entry point")]
    ProcessorNotFound(StageId),

    #[error("processor for stage `{0}` exists but cannot be invoked")]
    ProcessorNotCallable(StageId),
}
