// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Scenario 6: ten files dropped into each of three stages process
//! sequentially within a stage but concurrently across stages, so total
//! wall time tracks the slowest stage rather than the sum of all three.

use crate::prelude::*;
use std::path::PathBuf;
use std::time::{Duration, Instant};

const FILES_PER_STAGE: usize = 10;
const PROCESSOR_SLEEP_SECS: f64 = 0.1;

struct Fixture {
    pipeline: Pipeline,
    log: PathBuf,
    processed_dir: PathBuf,
}

#[test]
fn stages_run_concurrently_but_each_stays_sequential_within_itself() {
    let mut fixtures = Vec::new();

    for stage in ["stage_a", "stage_b", "stage_c"] {
        let mut pipeline = Pipeline::new();
        let stage_dir = pipeline.stage(stage);
        let log = pipeline.path().join("events.log");
        pipeline.processor(
            stage,
            &format!(
                "printf 'start %s\\n' \"$(date +%s%N)\" >> {log}; sleep {sleep}; printf 'end %s\\n' \"$(date +%s%N)\" >> {log}",
                log = log.display(),
                sleep = PROCESSOR_SLEEP_SECS,
            ),
        );
        pipeline.spawn_watcher();
        for i in 0..FILES_PER_STAGE {
            pipeline.drop_file(stage, &format!("f{i}.txt"), b"x");
        }
        fixtures.push(Fixture { pipeline, log, processed_dir: stage_dir.join("processed") });
    }

    let start = Instant::now();
    for fixture in &fixtures {
        let processed = fixture.processed_dir.clone();
        assert!(
            wait_for(SPEC_WAIT_MAX_MS, || dir_file_count(&processed) >= FILES_PER_STAGE),
            "stage never finished processing all {FILES_PER_STAGE} of its files"
        );
    }
    let elapsed = start.elapsed();

    // Run serially, three stages of ten 0.1s invocations would take ~3s.
    // Run concurrently, total wall time should track one stage's ~1s, with
    // slack for polling cadence -- well under the serial sum.
    let serial_sum = Duration::from_secs_f64(PROCESSOR_SLEEP_SECS * FILES_PER_STAGE as f64 * 3.0);
    assert!(
        elapsed < serial_sum,
        "stages did not appear to run concurrently: took {elapsed:?}, serial sum would be {serial_sum:?}"
    );

    for fixture in &fixtures {
        assert_invocations_never_overlap(&fixture.log);
    }
}

fn dir_file_count(dir: &std::path::Path) -> usize {
    std::fs::read_dir(dir).map(|d| d.filter_map(|e| e.ok()).filter(|e| e.path().is_file()).count()).unwrap_or(0)
}

/// Parse `start <ms>`/`end <ms>` pairs out of a stage's event log and
/// assert no two invocations overlap in time -- two concurrent State
/// Machine runs on the same stage must never coexist.
fn assert_invocations_never_overlap(log: &std::path::Path) {
    let contents = std::fs::read_to_string(log).unwrap_or_default();
    let mut intervals = Vec::new();
    let mut pending_start: Option<i64> = None;

    for line in contents.lines() {
        let mut parts = line.split_whitespace();
        match (parts.next(), parts.next()) {
            (Some("start"), Some(ts)) => pending_start = ts.parse().ok(),
            (Some("end"), Some(ts)) => {
                if let (Some(start), Ok(end)) = (pending_start.take(), ts.parse::<i64>()) {
                    intervals.push((start, end));
                }
            }
            _ => {}
        }
    }

    assert_eq!(intervals.len(), FILES_PER_STAGE, "expected one interval per file in {}", log.display());
    intervals.sort_unstable();
    for pair in intervals.windows(2) {
        let (_, prev_end) = pair[0];
        let (next_start, _) = pair[1];
        assert!(
            next_start >= prev_end,
            "two processor invocations overlapped in {}: {:?}",
            log.display(),
            pair
        );
    }
}
