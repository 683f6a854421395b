// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Scenario 3: a file still being written (growing size) is never handed
//! to a processor until it stops changing.

use crate::prelude::*;
use std::io::Write;
use std::time::{Duration, Instant};

#[test]
fn growing_file_is_not_processed_until_it_stabilizes() {
    let mut pipeline = Pipeline::new();
    pipeline.stage("01_ingest");
    let invoked_marker = pipeline.path().join("invoked.marker");
    pipeline.processor("01_ingest", &format!("echo invoked >> {}", invoked_marker.display()));

    pipeline.spawn_dashboard();
    pipeline.spawn_watcher();

    let target = pipeline.drop_file("01_ingest", "growing.log", b"start\n");

    // Keep appending faster than the stability window so every probe the
    // watcher runs observes a changing size.
    let deadline = Instant::now() + Duration::from_millis(1500);
    while Instant::now() < deadline {
        let mut file = std::fs::OpenOptions::new().append(true).open(&target).unwrap();
        writeln!(file, "more data").unwrap();
        std::thread::sleep(Duration::from_millis(80));
    }

    assert!(!invoked_marker.exists(), "processor ran on a file that was still growing");

    assert!(
        wait_for(SPEC_WAIT_MAX_MS, || invoked_marker.exists()),
        "file was never processed once it stopped growing"
    );

    let processed = pipeline.pipeline_dir().join("01_ingest").join("processed").join("growing.log");
    assert!(wait_for(SPEC_WAIT_MAX_MS, || processed.exists()));
}

#[test]
fn empty_stage_directory_produces_zero_events() {
    let mut pipeline = Pipeline::new();
    pipeline.stage("empty_stage");
    pipeline.processor("empty_stage", "exit 0");

    pipeline.spawn_dashboard();
    pipeline.spawn_watcher();

    // Give the watcher several poll cycles to (not) do anything.
    std::thread::sleep(Duration::from_millis(2500));

    assert!(pipeline.query_status("empty_stage").map(|v| v.is_null()).unwrap_or(true));
    let working = pipeline.pipeline_dir().join("empty_stage").join("working");
    assert!(!working.exists() || std::fs::read_dir(&working).unwrap().next().is_none());
}
