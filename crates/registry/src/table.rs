// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! In-process processor table: a compile-time/startup-populated map from
//! stage name to a handle, for processors implemented as Rust code in the
//! same binary (spec §9, "a plugin interface implemented by sibling
//! binaries" is the other strategy — see [`crate::external`]).

use crate::error::RegistryError;
use crate::processor::Processor;
use crate::registry::ProcessorRegistry;
use async_trait::async_trait;
use pf_core::StageId;
use std::collections::HashMap;
use std::sync::Arc;

/// Builder for a [`TableRegistry`].
#[derive(Default)]
pub struct TableRegistryBuilder {
    processors: HashMap<StageId, Arc<dyn Processor>>,
}

impl TableRegistryBuilder {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn register(mut self, stage: impl Into<StageId>, processor: Arc<dyn Processor>) -> Self {
        self.processors.insert(stage.into(), processor);
        self
    }

    pub fn build(self) -> TableRegistry {
        TableRegistry { processors: self.processors }
    }
}

/// A registry whose table is fully known at construction time. Since the
/// table never changes after construction, `reload()` is a no-op — there is
/// nothing to invalidate.
pub struct TableRegistry {
    processors: HashMap<StageId, Arc<dyn Processor>>,
}

impl TableRegistry {
    pub fn builder() -> TableRegistryBuilder {
        TableRegistryBuilder::new()
    }
}

#[async_trait]
impl ProcessorRegistry for TableRegistry {
    async fn resolve(&self, stage: &StageId) -> Result<Arc<dyn Processor>, RegistryError> {
        self.processors
            .get(stage)
            .cloned()
            .ok_or_else(|| RegistryError::StageNotFound(stage.clone()))
    }

    fn reload(&self) {}
}

#[cfg(test)]
#[path = "table_tests.rs"]
mod tests;
