// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

use crate::error::RegistryError;
use crate::processor::Processor;
use async_trait::async_trait;
use pf_core::StageId;
use std::sync::Arc;

/// Resolves a stage name to a processor (spec §4.R).
///
/// Lookups are cached keyed by stage name; cache invalidation only on
/// explicit `reload()`. The State Machine depends only on this trait, not on
/// how a given deployment wires stages to code (spec §9, Design Note:
/// "Dynamic processor loading").
#[async_trait]
pub trait ProcessorRegistry: Send + Sync {
    async fn resolve(&self, stage: &StageId) -> Result<Arc<dyn Processor>, RegistryError>;

    /// Drop all cached handles so the next `resolve` re-discovers them.
    fn reload(&self);
}
