// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Participant specs
//!
//! A component that speaks the handshake itself: its startup answer reaches
//! the supervisor directly, its shutdown answer is replaced by the
//! coordinator's once scopes are torn down.

use crate::prelude::*;
use similar_asserts::assert_eq;

#[tokio::test]
async fn participant_startup_reaches_supervisor_after_resource_setup() {
    let journal = Journal::new();
    let component = ScriptedComponent::participant().with_journal(journal.clone());
    let sup = Supervisor::launch(Coordinator::new(component, recorded("resource", &journal)));

    sup.send(Message::startup_request()).await;

    assert_eq!(sup.next().await, Message::startup_complete());
    assert_eq!(journal.entries(), vec!["resource.enter", "component.setup"]);

    sup.send(Message::shutdown_request()).await;
    sup.next().await;
    sup.finish().await.unwrap();
}

#[tokio::test]
async fn shutdown_complete_follows_resource_teardown() {
    let journal = Journal::new();
    let component = ScriptedComponent::participant().with_journal(journal.clone());
    let sup = Supervisor::launch(Coordinator::new(component, recorded("resource", &journal)));

    sup.send(Message::startup_request()).await;
    sup.next().await;
    sup.send(Message::shutdown_request()).await;

    assert_eq!(sup.next().await, Message::shutdown_complete());
    assert_eq!(
        journal.entries(),
        vec![
            "resource.enter",
            "component.setup",
            "component.shutdown",
            "resource.exit",
        ]
    );
    sup.finish().await.unwrap();
}

#[tokio::test]
async fn resources_are_held_while_the_supervisor_runs() {
    let journal = Journal::new();
    let sup = Supervisor::launch(Coordinator::new(
        ScriptedComponent::participant(),
        recorded("resource", &journal),
    ));

    sup.send(Message::startup_request()).await;
    sup.next().await;

    assert!(sup.stays_quiet(Duration::from_millis(100)).await);
    assert_eq!(journal.count("resource.exit"), 0);

    sup.send(Message::shutdown_request()).await;
    assert_eq!(sup.next().await, Message::shutdown_complete());
    assert_eq!(journal.count("resource.exit"), 1);
    sup.finish().await.unwrap();
}

#[tokio::test]
async fn lifecycle_scope_nests_inside_resource_scope() {
    let journal = Journal::new();
    let component = ScriptedComponent::participant().with_journal(journal.clone());
    let coordinator = Coordinator::new(component, recorded("resource", &journal))
        .with_inner_scope(recorded("lifecycle", &journal));
    let sup = Supervisor::launch(coordinator);

    sup.send(Message::startup_request()).await;
    sup.next().await;
    sup.send(Message::shutdown_request()).await;
    sup.next().await;

    assert_eq!(
        journal.entries(),
        vec![
            "resource.enter",
            "lifecycle.enter",
            "component.setup",
            "component.shutdown",
            "lifecycle.exit",
            "resource.exit",
        ]
    );
    sup.finish().await.unwrap();
}

#[tokio::test]
async fn supervisor_sees_one_terminal_per_phase() {
    let component = ScriptedComponent::new([
        Step::Receive,
        Step::Send(Message::startup_complete()),
        Step::Send(Message::startup_complete()),
        Step::Receive,
        Step::Send(Message::shutdown_complete()),
        Step::Send(Message::shutdown_complete()),
    ]);
    let sup = Supervisor::launch(Coordinator::new(component, |_: &ScriptedComponent| {
        lifespan_core::NoopScope
    }));

    sup.send(Message::startup_request()).await;
    assert_eq!(sup.next().await, Message::startup_complete());
    sup.send(Message::shutdown_request()).await;
    assert_eq!(sup.next().await, Message::shutdown_complete());

    sup.finish().await.unwrap();
}
