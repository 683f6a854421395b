// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Stage identity.
//!
//! A stage's identity is its directory's base name (spec §3); stages are
//! discovered from the filesystem, never minted, so this is a thin newtype
//! rather than a generated ID like the teacher's `define_id!` types.

use serde::{Deserialize, Serialize};
use std::fmt;

#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct StageId(String);

impl StageId {
    pub fn new(name: impl Into<String>) -> Self {
        Self(name.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for StageId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl From<&str> for StageId {
    fn from(s: &str) -> Self {
        Self::new(s)
    }
}

impl From<String> for StageId {
    fn from(s: String) -> Self {
        Self::new(s)
    }
}

impl AsRef<str> for StageId {
    fn as_ref(&self) -> &str {
        &self.0
    }
}

impl std::borrow::Borrow<str> for StageId {
    fn borrow(&self) -> &str {
        &self.0
    }
}
