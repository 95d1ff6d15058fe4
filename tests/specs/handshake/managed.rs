// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Managed scope specs
//!
//! A component with its own handshake runs as the coordinator's lifecycle
//! scope: started after the resource scope, stopped before it. The managed
//! component is either a second one or the coordinator's own.

use crate::prelude::*;
use similar_asserts::assert_eq;

fn managed(
    nested: Arc<ScriptedComponent>,
    config: ManagerConfig,
) -> impl Fn(&ScriptedComponent) -> TracedScope<ManagedScope<ScriptedComponent>> {
    move |_: &ScriptedComponent| {
        let manager = LifespanManager::new(Arc::clone(&nested)).with_config(config.clone());
        TracedScope::new("managed", ManagedScope::new(manager))
    }
}

#[tokio::test]
async fn managed_component_lives_inside_the_resource_scope() {
    let journal = Journal::new();
    let nested = Arc::new(ScriptedComponent::participant().with_journal(journal.clone()));
    let config = ManagerConfig::from_toml(
        r#"
        startup_timeout = "1s"
        shutdown_timeout = "1s"
        "#,
    )
    .unwrap();
    let coordinator = Coordinator::new(ScriptedComponent::silent(), recorded("resource", &journal))
        .with_inner_scope(managed(nested, config));
    let sup = Supervisor::launch(coordinator);

    sup.send(Message::startup_request()).await;
    assert_eq!(sup.next().await, Message::startup_complete());
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
async fn managed_component_timing_out_fails_startup() {
    let journal = Journal::new();
    let nested = Arc::new(ScriptedComponent::new([Step::Receive, Step::Receive]));
    let config = ManagerConfig::new().with_startup_timeout(Duration::from_millis(50));
    let coordinator = Coordinator::new(ScriptedComponent::silent(), recorded("resource", &journal))
        .with_inner_scope(managed(nested, config));
    let sup = Supervisor::launch(coordinator);

    sup.send(Message::startup_request()).await;
    let reply = sup.next().await;

    assert_eq!(reply.kind, MessageKind::StartupFailed);
    assert!(reply.message.unwrap().contains("startup timed out"));
    assert_eq!(journal.entries(), vec!["resource.enter", "resource.exit"]);
    sup.finish().await.unwrap_err();
}

#[tokio::test]
async fn owned_component_managed_as_lifecycle_runs_once() {
    let journal = Journal::new();
    let app = Arc::new(ScriptedComponent::participant().with_journal(journal.clone()));
    let resource = {
        let journal = journal.clone();
        move |_: &Arc<ScriptedComponent>| FakeScope::new("resource", journal.clone())
    };
    let coordinator = Coordinator::new(Arc::clone(&app), resource)
        .with_managed_lifecycle(lifecycle::<ScriptedComponent>(ManagerConfig::new()));
    let sup = Supervisor::launch(coordinator);

    sup.send(Message::startup_request()).await;
    assert_eq!(sup.next().await, Message::startup_complete());
    sup.send(Message::shutdown_request()).await;
    assert_eq!(sup.next().await, Message::shutdown_complete());
    sup.finish().await.unwrap();

    assert_eq!(app.invocations(), 1);
    assert_eq!(
        journal.entries(),
        vec![
            "resource.enter",
            "component.setup",
            "component.shutdown",
            "resource.exit",
        ]
    );
}

#[tokio::test]
async fn owned_component_without_lifespan_support_is_answered_for() {
    let app = Arc::new(ScriptedComponent::silent());
    let coordinator = Coordinator::new(Arc::clone(&app), |_: &Arc<ScriptedComponent>| {
        FakeScope::new("resource", Journal::new())
    })
    .with_managed_lifecycle(lifecycle::<ScriptedComponent>(ManagerConfig::new()));
    let sup = Supervisor::launch(coordinator);

    sup.send(Message::startup_request()).await;
    assert_eq!(sup.next().await, Message::startup_complete());
    sup.send(Message::shutdown_request()).await;
    assert_eq!(sup.next().await, Message::shutdown_complete());
    sup.finish().await.unwrap();

    assert_eq!(app.invocations(), 1);
}
