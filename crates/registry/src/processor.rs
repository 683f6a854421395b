// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! The processor contract (spec §3: "Processor").

use async_trait::async_trait;
use std::path::Path;

/// Outcome of invoking a processor on a working-file path.
///
/// `success` is the processor's Boolean result. `error_message` is populated
/// when the processor raised or exited non-zero; conventionally the
/// processor also writes or leaves an output file on success, but the
/// contract does not require it (spec §3, §4.M edge case: "If the processor
/// writes no output file, success still advances...").
#[derive(Debug, Clone)]
pub struct ProcessorOutcome {
    pub success: bool,
    pub error_message: Option<String>,
}

impl ProcessorOutcome {
    pub fn success() -> Self {
        Self { success: true, error_message: None }
    }

    pub fn failure(message: impl Into<String>) -> Self {
        Self { success: false, error_message: Some(message.into()) }
    }
}

/// An externally-provided callable bound to a stage.
///
/// Invariant (spec §3): must not mutate files outside the stage's
/// `working/` or `processed/` directories — that invariant is on the
/// implementor, not enforceable by this trait.
#[async_trait]
pub trait Processor: Send + Sync {
    async fn process(&self, working_file: &Path) -> ProcessorOutcome;
}
