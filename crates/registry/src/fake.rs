// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

use crate::processor::{Processor, ProcessorOutcome};
use async_trait::async_trait;
use parking_lot::Mutex;
use std::path::{Path, PathBuf};
use std::sync::Arc;

/// Fake processor for tests: returns a fixed outcome and records every path
/// it was invoked with.
pub struct FakeProcessor {
    outcome: ProcessorOutcome,
    calls: Arc<Mutex<Vec<PathBuf>>>,
}

impl FakeProcessor {
    pub fn succeeding() -> Self {
        Self { outcome: ProcessorOutcome::success(), calls: Arc::new(Mutex::new(Vec::new())) }
    }

    pub fn failing(message: impl Into<String>) -> Self {
        Self { outcome: ProcessorOutcome::failure(message), calls: Arc::new(Mutex::new(Vec::new())) }
    }

    pub fn calls(&self) -> Vec<PathBuf> {
        self.calls.lock().clone()
    }
}

#[async_trait]
impl Processor for FakeProcessor {
    async fn process(&self, working_file: &Path) -> ProcessorOutcome {
        self.calls.lock().push(working_file.to_path_buf());
        self.outcome.clone()
    }
}
