// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Wire framing specs
//!
//! Messages crossing the boundary frame as JSON objects with a `type` field
//! and an optional `message` field.

use crate::prelude::*;
use serde_json::json;
use similar_asserts::assert_eq;

#[tokio::test]
async fn supervisor_frames_round_trip_through_a_handshake() {
    let sup = Supervisor::launch(Coordinator::new(
        ScriptedComponent::participant(),
        recorded("resource", &Journal::new()),
    ));

    let startup: Message = serde_json::from_str(r#"{"type": "lifespan.startup"}"#).unwrap();
    sup.send(startup).await;
    let reply = serde_json::to_value(sup.next().await).unwrap();
    assert_eq!(reply, json!({"type": "lifespan.startup.complete"}));

    let shutdown: Message = serde_json::from_value(json!({"type": "lifespan.shutdown"})).unwrap();
    sup.send(shutdown).await;
    let reply = serde_json::to_value(sup.next().await).unwrap();
    assert_eq!(reply, json!({"type": "lifespan.shutdown.complete"}));

    sup.finish().await.unwrap();
}

#[tokio::test]
async fn failure_frames_carry_the_message() {
    let scope = FakeScope::new("resource", Journal::new()).failing_enter("db down");
    let coordinator = Coordinator::new(ScriptedComponent::silent(), fixed(scope))
        .with_config(CoordinatorConfig::new().with_fault_detail(FaultDetail::Message));
    let sup = Supervisor::launch(coordinator);

    sup.send(Message::startup_request()).await;
    let reply = serde_json::to_value(sup.next().await).unwrap();

    assert_eq!(
        reply,
        json!({"type": "lifespan.startup.failed", "message": "db down"})
    );
    sup.finish().await.unwrap_err();
}
