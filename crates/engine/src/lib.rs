// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

#![cfg_attr(test, allow(clippy::panic, clippy::unwrap_used, clippy::expect_used))]

//! pf-engine: Stage State Machine, Per-Stage Watcher, and Orchestrator
//! (spec §4.M, §4.W, §4.O).

mod dashboard_sink;
mod error;
mod orchestrator;
mod outcome;
mod state_machine;
mod watcher;

pub use dashboard_sink::{ChannelDashboardSink, DashboardSink, NullDashboardSink};
pub use error::ProcessError;
pub use orchestrator::Orchestrator;
pub use outcome::ProcessOutcome;
pub use state_machine::StateMachine;
pub use watcher::Watcher;
