// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Scoped move/copy/rename/mkdir and the file-stability probe (spec §4.F).
//!
//! All operations here are synchronous and best-effort atomic within a
//! single filesystem, per spec: "All operations are synchronous." Callers
//! running on the async runtime wrap these in `spawn_blocking` themselves.

use crate::error::FileOpsError;
use std::path::{Path, PathBuf};

/// Ensure `path` exists as a directory, creating parents as needed.
pub fn ensure_dir(path: impl AsRef<Path>) -> Result<(), FileOpsError> {
    let path = path.as_ref();
    std::fs::create_dir_all(path).map_err(|e| FileOpsError::io(path, e))?;
    tracing::debug!(path = %path.display(), "ensured directory exists");
    Ok(())
}

/// Move `src` into `dst_dir`, keeping `src`'s file name. Returns the final path.
pub fn move_file(src: impl AsRef<Path>, dst_dir: impl AsRef<Path>) -> Result<PathBuf, FileOpsError> {
    let src = src.as_ref();
    let dst_dir = dst_dir.as_ref();
    ensure_dir(dst_dir)?;

    let file_name = src
        .file_name()
        .ok_or_else(|| FileOpsError::io(src, invalid_input("source path has no file name")))?;
    let dst = dst_dir.join(file_name);

    std::fs::rename(src, &dst).map_err(|e| FileOpsError::io(src, e))?;
    tracing::info!(from = %src.display(), to = %dst.display(), "moved file");
    Ok(dst)
}

/// Copy `src` into `dst_dir`, keeping `src`'s file name. Returns the final path.
pub fn copy_file(src: impl AsRef<Path>, dst_dir: impl AsRef<Path>) -> Result<PathBuf, FileOpsError> {
    let src = src.as_ref();
    let dst_dir = dst_dir.as_ref();
    ensure_dir(dst_dir)?;

    let file_name = src
        .file_name()
        .ok_or_else(|| FileOpsError::io(src, invalid_input("source path has no file name")))?;
    let dst = dst_dir.join(file_name);

    std::fs::copy(src, &dst).map_err(|e| FileOpsError::io(src, e))?;
    tracing::info!(from = %src.display(), to = %dst.display(), "copied file");
    Ok(dst)
}

/// Rename `path` in place to `new_name`, keeping its parent directory.
pub fn rename_file(path: impl AsRef<Path>, new_name: impl AsRef<str>) -> Result<PathBuf, FileOpsError> {
    let path = path.as_ref();
    let new_path = path.with_file_name(new_name.as_ref());
    std::fs::rename(path, &new_path).map_err(|e| FileOpsError::io(path, e))?;
    tracing::info!(from = %path.display(), to = %new_path.display(), "renamed file");
    Ok(new_path)
}

fn invalid_input(msg: &str) -> std::io::Error {
    std::io::Error::new(std::io::ErrorKind::InvalidInput, msg.to_string())
}

/// Probe `path`'s size at `interval` cadence; declare it stable after
/// `checks` consecutive equal samples. Gives up with `false` on `timeout`
/// expiry or if the path vanishes mid-probe (spec §4.F).
///
/// Network shares and scanners open files for write before they're
/// complete — stability is the only portable readiness signal.
pub async fn wait_until_stable(
    path: impl AsRef<Path>,
    checks: u32,
    interval: std::time::Duration,
    timeout: std::time::Duration,
) -> bool {
    let path = path.as_ref();
    let deadline = tokio::time::Instant::now() + timeout;
    let mut last_size: Option<u64> = None;
    let mut consecutive = 0u32;

    loop {
        if tokio::time::Instant::now() >= deadline {
            tracing::debug!(path = %path.display(), "stability probe timed out");
            return false;
        }

        let size = match std::fs::metadata(path) {
            Ok(meta) => meta.len(),
            Err(_) => {
                tracing::debug!(path = %path.display(), "stability probe: path vanished");
                return false;
            }
        };

        match last_size {
            Some(prev) if prev == size => consecutive += 1,
            _ => consecutive = 1,
        }
        last_size = Some(size);

        if consecutive >= checks {
            return true;
        }

        tokio::time::sleep(interval).await;
    }
}

#[cfg(test)]
#[path = "ops_tests.rs"]
mod tests;
