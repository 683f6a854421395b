// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

use thiserror::Error;

#[derive(Debug, Error)]
pub enum WireError {
    #[error(transparent)]
    Io(#[from] std::io::Error),

    #[error("frame length {len} exceeds max {max}")]
    FrameTooLarge { len: u32, max: u32 },

    #[error("malformed message: {0}")]
    Malformed(#[from] serde_json::Error),
}
