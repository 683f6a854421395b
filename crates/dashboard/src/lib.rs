// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Dashboard Server (spec §4.D): a Unix-domain-socket service that accepts
//! `pipeline_update`/`pipeline_heartbeat`/`get_pipeline_status` frames and
//! broadcasts `dashboard_update` snapshots to every connected client.

#![cfg_attr(test, allow(clippy::panic, clippy::unwrap_used, clippy::expect_used))]

mod client;
mod error;
mod server;
mod state;
mod sweeper;

pub use error::DashboardError;
pub use server::DashboardServer;
pub use state::SharedState;
