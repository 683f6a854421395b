// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Dashboard broadcast fan-out boundary behaviors: one client vanishing
//! must never block delivery to the clients that remain.

use crate::prelude::*;

#[test]
fn a_disconnected_client_does_not_block_broadcast_to_others() {
    let mut pipeline = Pipeline::new();
    pipeline.spawn_dashboard();

    let doomed = pipeline.connect_dashboard();
    let mut survivor = pipeline.connect_dashboard();
    drop(doomed);

    let mut producer = pipeline.connect_dashboard();
    write_frame(
        &mut producer,
        &serde_json::json!({
            "type": "pipeline_update",
            "payload": {"id": "p1", "status": "running"},
        }),
    );

    let reply = read_frame(&mut survivor).expect("survivor never received the broadcast");
    assert_eq!(reply["type"], "dashboard_update");
    assert_eq!(reply["pipelines"]["p1"]["status"], "running");
}

#[test]
fn every_connected_client_receives_the_same_broadcast() {
    let mut pipeline = Pipeline::new();
    pipeline.spawn_dashboard();

    let mut a = pipeline.connect_dashboard();
    let mut b = pipeline.connect_dashboard();

    write_frame(
        &mut a,
        &serde_json::json!({
            "type": "pipeline_update",
            "payload": {"id": "p1", "status": "completed"},
        }),
    );

    let reply_a = read_frame(&mut a).expect("producer did not see its own broadcast");
    let reply_b = read_frame(&mut b).expect("second client did not receive the broadcast");
    assert_eq!(reply_a["pipelines"]["p1"]["status"], "completed");
    assert_eq!(reply_b["pipelines"]["p1"]["status"], "completed");
}
