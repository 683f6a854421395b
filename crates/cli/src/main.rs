// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! pf — folder-based staged processing pipeline orchestrator.
//!
//! Two long-running subcommands: `launch-watcher` runs the Orchestrator
//! (spec §4.O), `launch-dashboard` runs the Dashboard Server (spec §4.D).
//! Each is typically its own process, coordinating over the Dashboard's
//! Unix socket rather than in-process state (spec §6, §9).

// Allow panic!/unwrap/expect in test code
#![cfg_attr(test, allow(clippy::panic))]
#![cfg_attr(test, allow(clippy::unwrap_used))]
#![cfg_attr(test, allow(clippy::expect_used))]

mod commands;

use clap::{Parser, Subcommand};
use std::path::PathBuf;

#[derive(Parser)]
#[command(name = "pf", version, about = "Folder-based staged processing pipeline orchestrator")]
struct Cli {
    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand)]
enum Command {
    /// Discover pipeline stages and watch each one for work.
    LaunchWatcher {
        /// Path to the pipeline's TOML config file.
        #[arg(long, default_value = "pipeline.toml")]
        config: PathBuf,
    },
    /// Accept pipeline status updates over a Unix socket.
    LaunchDashboard {
        /// Path to the pipeline's TOML config file.
        #[arg(long, default_value = "pipeline.toml")]
        config: PathBuf,
    },
}

#[tokio::main]
async fn main() {
    setup_logging();

    let cli = Cli::parse();
    let result = match cli.command {
        Command::LaunchWatcher { config } => commands::launch_watcher::run(&config).await,
        Command::LaunchDashboard { config } => commands::launch_dashboard::run(&config).await,
    };

    if let Err(e) = result {
        tracing::error!(error = %e, "pf exited with error");
        eprintln!("error: {e}");
        std::process::exit(1);
    }
}

fn setup_logging() {
    use tracing_subscriber::EnvFilter;

    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
    tracing_subscriber::fmt().with_env_filter(filter).init();
}
