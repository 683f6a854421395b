// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! `AuditRecord`: the naming rule for a mirrored file under `<audit_root>/<stage>/`
//! (spec §3, §4.S): `<stem>_<tag>_<timestamp>[_<counter>]<ext>`.

use crate::stage::StageId;
use chrono::{DateTime, Utc};

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AuditRecord {
    pub stage: StageId,
    pub stem: String,
    pub tag: String,
    pub timestamp: DateTime<Utc>,
    pub ext: String,
    pub counter: Option<u32>,
}

impl AuditRecord {
    pub fn new(
        stage: impl Into<StageId>,
        stem: impl Into<String>,
        tag: impl Into<String>,
        timestamp: DateTime<Utc>,
        ext: impl Into<String>,
    ) -> Self {
        Self { stage: stage.into(), stem: stem.into(), tag: tag.into(), timestamp, ext: ext.into(), counter: None }
    }

    pub fn with_counter(mut self, counter: u32) -> Self {
        self.counter = Some(counter);
        self
    }

    /// The file name this record resolves to, e.g. `doc__20260727_120000.txt`
    /// for an empty tag, or `doc_processed_20260727_120000_1.txt` once a
    /// collision bumps the counter.
    pub fn file_name(&self) -> String {
        let ts = self.timestamp.format("%Y%m%d_%H%M%S");
        match self.counter {
            Some(k) => format!("{}_{}_{}_{}{}", self.stem, self.tag, ts, k, self.ext),
            None => format!("{}_{}_{}{}", self.stem, self.tag, ts, self.ext),
        }
    }
}
