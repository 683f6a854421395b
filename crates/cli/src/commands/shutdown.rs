// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Shared SIGINT/SIGTERM handling: both long-running subcommands cancel
//! cooperatively on either signal and wait for the in-flight work to notice
//! (spec §5, §6 — exit 0 on a clean stop).

use tokio::signal::unix::Signal;

pub async fn wait_for_shutdown_signal(sigterm: &mut Signal) {
    tokio::select! {
        _ = tokio::signal::ctrl_c() => tracing::info!("received SIGINT, shutting down"),
        _ = sigterm.recv() => tracing::info!("received SIGTERM, shutting down"),
    }
}
