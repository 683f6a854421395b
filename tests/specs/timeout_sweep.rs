// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Scenario 5: a pipeline left in `running` with no further updates is
//! swept to `failed` once it's older than the dashboard's timeout.

use crate::prelude::*;

#[test]
fn stale_running_pipeline_is_swept_to_failed() {
    let mut pipeline = Pipeline::new().with_timeout_secs(1).with_sweep_interval_secs(1);
    pipeline.spawn_dashboard();

    let mut stream = pipeline.connect_dashboard();
    write_frame(
        &mut stream,
        &serde_json::json!({
            "type": "pipeline_update",
            "payload": {"id": "stuck", "status": "running"},
        }),
    );
    // Drain the dashboard_update broadcast reflecting our own write.
    let _ = read_frame(&mut stream);

    assert!(pipeline.status_is("stuck", "running"));
    assert!(
        wait_for(SPEC_WAIT_MAX_MS, || pipeline.status_is("stuck", "failed")),
        "stale running pipeline was never swept to failed"
    );

    let status = pipeline.query_status("stuck").unwrap();
    assert_eq!(status["error_message"], "Pipeline timeout - no updates received");
}

#[test]
fn heartbeats_keep_a_running_pipeline_from_going_stale() {
    let mut pipeline = Pipeline::new().with_timeout_secs(1).with_sweep_interval_secs(1);
    pipeline.spawn_dashboard();

    let mut stream = pipeline.connect_dashboard();
    write_frame(
        &mut stream,
        &serde_json::json!({
            "type": "pipeline_update",
            "payload": {"id": "alive", "status": "running"},
        }),
    );
    let _ = read_frame(&mut stream);

    let deadline = std::time::Instant::now() + std::time::Duration::from_millis(2500);
    while std::time::Instant::now() < deadline {
        write_frame(
            &mut stream,
            &serde_json::json!({"type": "pipeline_heartbeat", "payload": {"id": "alive"}}),
        );
        std::thread::sleep(std::time::Duration::from_millis(200));
    }

    assert!(pipeline.status_is("alive", "running"), "heartbeats should have kept the pipeline fresh");
}
