// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Fault specs
//!
//! Each fault produces exactly one failure message for the phase the
//! supervisor is in, and the fault comes back out of the handshake.

use crate::prelude::*;
use similar_asserts::assert_eq;

#[tokio::test]
async fn resource_setup_failure_is_startup_failed() {
    let journal = Journal::new();
    let scope = FakeScope::new("resource", journal.clone()).failing_enter("db down");
    let component = ScriptedComponent::participant().with_journal(journal.clone());
    let sup = Supervisor::launch(Coordinator::new(component, fixed(scope)));

    sup.send(Message::startup_request()).await;
    let reply = sup.next().await;

    assert_eq!(reply.kind, MessageKind::StartupFailed);
    assert!(reply.message.unwrap().contains("db down"));
    assert_eq!(journal.entries(), vec!["resource.enter"]);

    let err = sup.finish().await.unwrap_err();
    assert_eq!(err.phase(), Some(Phase::Startup));
    assert_eq!(err.as_label(), "lifespan_startup_failed");
}

#[tokio::test]
async fn component_startup_failure_is_forwarded_once() {
    let component = ScriptedComponent::new([
        Step::Receive,
        Step::Send(Message::startup_failed("missing DATABASE_URL")),
        Step::Raise("missing DATABASE_URL".to_string()),
    ]);
    let sup = Supervisor::launch(Coordinator::new(component, fixed(FakeScope::new(
        "resource",
        Journal::new(),
    ))));

    sup.send(Message::startup_request()).await;

    assert_eq!(
        sup.next().await,
        Message::startup_failed("missing DATABASE_URL")
    );
    assert!(sup.stays_quiet(Duration::from_millis(100)).await);

    let err = sup.finish().await.unwrap_err();
    assert_eq!(err.fault().unwrap().origin(), FaultOrigin::Component);
}

#[tokio::test]
async fn component_failing_during_shutdown_is_shutdown_failed() {
    let journal = Journal::new();
    let component = ScriptedComponent::new([
        Step::Receive,
        Step::Send(Message::startup_complete()),
        Step::Receive,
        Step::Raise("flush failed".to_string()),
    ]);
    let sup = Supervisor::launch(Coordinator::new(component, recorded("resource", &journal)));

    sup.send(Message::startup_request()).await;
    assert_eq!(sup.next().await, Message::startup_complete());
    sup.send(Message::shutdown_request()).await;

    let reply = sup.next().await;
    assert_eq!(reply.kind, MessageKind::ShutdownFailed);
    assert!(reply.message.unwrap().contains("flush failed"));
    assert_eq!(journal.count("resource.exit"), 1);

    let err = sup.finish().await.unwrap_err();
    assert!(matches!(err, LifespanError::Shutdown(_)));
}

#[tokio::test]
async fn resource_teardown_failure_is_shutdown_failed() {
    let journal = Journal::new();
    let scope = FakeScope::new("resource", journal.clone()).failing_exit("pool leaked");
    let sup = Supervisor::launch(Coordinator::new(
        ScriptedComponent::participant(),
        fixed(scope),
    ));

    sup.send(Message::startup_request()).await;
    assert_eq!(sup.next().await, Message::startup_complete());
    sup.send(Message::shutdown_request()).await;

    assert_eq!(sup.next().await.kind, MessageKind::ShutdownFailed);
    assert_eq!(journal.entries(), vec!["resource.enter", "resource.exit"]);

    let err = sup.finish().await.unwrap_err();
    assert_eq!(
        err.fault().unwrap().downcast_ref::<FakeError>(),
        Some(&FakeError("pool leaked".to_string()))
    );
}

#[tokio::test]
async fn message_detail_sends_only_the_raised_text() {
    let scope = FakeScope::new("resource", Journal::new()).failing_enter("db down");
    let coordinator = Coordinator::new(ScriptedComponent::silent(), fixed(scope)).with_config(
        CoordinatorConfig::from_toml(
            r#"
            name = "api"
            fault_detail = "message"
            "#,
        )
        .unwrap(),
    );
    let sup = Supervisor::launch(coordinator);

    sup.send(Message::startup_request()).await;

    assert_eq!(sup.next().await, Message::startup_failed("db down"));
    sup.finish().await.unwrap_err();
}

#[tokio::test]
async fn supervisor_hanging_up_after_startup_is_a_shutdown_fault() {
    let journal = Journal::new();
    let sup = Supervisor::launch(Coordinator::new(
        ScriptedComponent::silent(),
        recorded("resource", &journal),
    ));

    sup.send(Message::startup_request()).await;
    assert_eq!(sup.next().await, Message::startup_complete());

    let err = sup.finish().await.unwrap_err();

    assert_eq!(err.phase(), Some(Phase::Shutdown));
    assert_eq!(err.fault().unwrap().origin(), FaultOrigin::Channel);
    assert_eq!(journal.count("resource.exit"), 1);
}
