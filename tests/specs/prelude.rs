// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Shared harness: a hand-driven supervisor in front of a spawned coordinator

#![allow(dead_code, unused_imports)]

pub use lifespan_adapters::{
    lifecycle, pipe, LifespanManager, ManagedScope, ManagerConfig, ManagerError, MpscInbound, MpscOutbound,
    TracedInbound, TracedOutbound, TracedScope,
};
pub use lifespan_core::fake::{FakeError, FakeScope, Journal, ScriptedComponent, Step};
pub use lifespan_core::{
    Component, Coordinator, CoordinatorConfig, FaultDetail, FaultOrigin, Inbound, LifespanError,
    Message, MessageKind, Outbound, Phase, ScopeFactory,
};
pub use std::sync::Arc;
pub use std::time::Duration;

use tokio::task::JoinHandle;

const WAIT: Duration = Duration::from_secs(2);

/// The supervisor's end of a running handshake
pub struct Supervisor {
    tx: MpscOutbound,
    rx: MpscInbound,
    task: JoinHandle<Result<(), LifespanError>>,
}

impl Supervisor {
    /// Spawn `coordinator.handshake` behind a pair of pipes
    pub fn launch<C, F>(coordinator: Coordinator<C, F>) -> Self
    where
        C: Component + 'static,
        F: ScopeFactory<C> + 'static,
    {
        let (tx, component_rx) = pipe(8);
        let (component_tx, rx) = pipe(8);
        let coordinator = Arc::new(coordinator);
        let task = tokio::spawn(async move {
            let inbound = TracedInbound::new(component_rx);
            let outbound = TracedOutbound::new(component_tx);
            coordinator.handshake(&inbound, &outbound).await
        });
        Self { tx, rx, task }
    }

    pub async fn send(&self, message: Message) {
        self.tx.send(message).await.unwrap();
    }

    /// Next message from the coordinator; fails the test after a short wait
    pub async fn next(&self) -> Message {
        tokio::time::timeout(WAIT, self.rx.recv())
            .await
            .expect("coordinator did not answer")
            .expect("coordinator closed its side")
    }

    /// True if no message arrives within `within`
    pub async fn stays_quiet(&self, within: Duration) -> bool {
        !matches!(tokio::time::timeout(within, self.rx.recv()).await, Ok(Ok(_)))
    }

    /// Wait for the handshake task to return
    pub async fn finish(self) -> Result<(), LifespanError> {
        drop(self.tx);
        tokio::time::timeout(WAIT, self.task)
            .await
            .expect("handshake did not return")
            .expect("handshake task panicked")
    }
}

/// Scope factory recording `<name>.enter` / `<name>.exit` in `journal`
pub fn recorded(
    name: &'static str,
    journal: &Journal,
) -> impl Fn(&ScriptedComponent) -> FakeScope {
    let journal = journal.clone();
    move |_: &ScriptedComponent| FakeScope::new(name, journal.clone())
}

/// Scope factory handing out clones of a preconfigured scope
pub fn fixed(scope: FakeScope) -> impl Fn(&ScriptedComponent) -> FakeScope {
    move |_: &ScriptedComponent| scope.clone()
}
