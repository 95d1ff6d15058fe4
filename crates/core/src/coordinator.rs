// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Lifecycle coordinator
//!
//! Wraps an owned component and a caller-supplied resource scope, and keeps
//! the supervisor's view of the handshake consistent whatever the component
//! does.
//!
//! ## Flow of one handshake instance
//!
//! 1. Enter the resource scope, then the optional lifecycle scope.
//! 2. Run the component with relay endpoints that record every message. A
//!    panic is caught and treated as a fault. With a managed lifecycle the
//!    lifecycle scope runs the component instead, and the coordinator answers
//!    the supervisor itself.
//! 3. Reconcile: a component that never sent a startup terminal is answered
//!    for (startup request consumed, `startup-complete` sent, shutdown request
//!    awaited); a participant is held until the supervisor asks for shutdown.
//! 4. Unwind the scopes, innermost first.
//! 5. Send the single shutdown terminal, or classify the fault, send the
//!    matching `*-failed` (unless already sent) and return it.

use crate::channel::{ChannelError, Inbound, Outbound};
use crate::classify::{classify, Decision};
use crate::component::{BoxError, Component};
use crate::config::CoordinatorConfig;
use crate::error::{ComponentPanic, Fault, FaultOrigin, LifespanError};
use crate::ledger::{EventLedger, Terminal};
use crate::message::{Message, MessageKind, Phase};
use crate::relay::{lock, RelayInbound, RelayOutbound};
use crate::scope::{ScopeFactory, ScopeRole, ScopeStack};
use async_trait::async_trait;
use futures::FutureExt;
use std::panic::AssertUnwindSafe;
use std::sync::{Mutex, MutexGuard};
use tracing::Instrument;

/// Who runs the owned component
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Drive {
    /// The coordinator, through the relay endpoints
    Relay,
    /// The lifecycle scope
    LifecycleScope,
}

/// Runs an owned component inside a resource scope and mediates its handshake
pub struct Coordinator<C, F> {
    component: C,
    scope: F,
    inner_scope: Option<Box<dyn ScopeFactory<C>>>,
    drive: Drive,
    config: CoordinatorConfig,
}

impl<C, F> Coordinator<C, F>
where
    C: Component,
    F: ScopeFactory<C>,
{
    pub fn new(component: C, scope: F) -> Self {
        Self {
            component,
            scope,
            inner_scope: None,
            drive: Drive::Relay,
            config: CoordinatorConfig::default(),
        }
    }

    /// Nest a second scope inside the resource scope, entered after it and
    /// exited before it
    pub fn with_inner_scope(mut self, factory: impl ScopeFactory<C> + 'static) -> Self {
        self.inner_scope = Some(Box::new(factory));
        self.drive = Drive::Relay;
        self
    }

    /// Hand the component's lifecycle to an inner scope that runs it, such
    /// as one driving it through its own handshake.
    ///
    /// The coordinator then never calls the component and answers the
    /// supervisor on its behalf once both scopes are entered.
    pub fn with_managed_lifecycle(mut self, factory: impl ScopeFactory<C> + 'static) -> Self {
        self.inner_scope = Some(Box::new(factory));
        self.drive = Drive::LifecycleScope;
        self
    }

    pub fn with_config(mut self, config: CoordinatorConfig) -> Self {
        self.config = config;
        self
    }

    pub fn component(&self) -> &C {
        &self.component
    }

    pub fn config(&self) -> &CoordinatorConfig {
        &self.config
    }

    /// Run one full handshake instance.
    ///
    /// Returns once the supervisor has been sent the shutdown terminal, or
    /// the startup terminal on failure. Stays pending for as long as the
    /// supervisor does not request shutdown.
    pub async fn handshake(
        &self,
        inbound: &dyn Inbound,
        outbound: &dyn Outbound,
    ) -> Result<(), LifespanError> {
        let span = tracing::info_span!("lifespan", name = %self.config.name);
        self.handshake_inner(inbound, outbound)
            .instrument(span)
            .await
    }

    async fn handshake_inner(
        &self,
        inbound: &dyn Inbound,
        outbound: &dyn Outbound,
    ) -> Result<(), LifespanError> {
        tracing::info!("handshake started");

        let instance = HandshakeInstance {
            coordinator: self,
            inbound,
            outbound,
            ledger: Mutex::new(EventLedger::new()),
        };
        let mut scopes = ScopeStack::new();

        let body = instance.enter_and_relay(&mut scopes).await;
        let teardown = scopes.unwind().await;

        let outcome = match (body, teardown) {
            (Ok(()), Ok(())) => Ok(()),
            (Err(fault), Ok(())) | (Ok(()), Err(fault)) => Err(fault),
            (Err(fault), Err(secondary)) => {
                tracing::warn!(error = %secondary, "teardown failed after an earlier fault");
                Err(fault)
            }
        };

        instance.conclude(outcome).await
    }
}

#[async_trait]
impl<C, F> Component for Coordinator<C, F>
where
    C: Component,
    F: ScopeFactory<C>,
{
    async fn run(&self, inbound: &dyn Inbound, outbound: &dyn Outbound) -> Result<(), BoxError> {
        self.handshake(inbound, outbound)
            .await
            .map_err(BoxError::from)
    }
}

/// State of one startup-through-shutdown cycle
struct HandshakeInstance<'a, C, F> {
    coordinator: &'a Coordinator<C, F>,
    inbound: &'a dyn Inbound,
    outbound: &'a dyn Outbound,
    ledger: Mutex<EventLedger>,
}

impl<'a, C, F> HandshakeInstance<'a, C, F>
where
    C: Component,
    F: ScopeFactory<C>,
{
    fn ledger(&self) -> MutexGuard<'_, EventLedger> {
        lock(&self.ledger)
    }

    async fn enter_and_relay(&self, scopes: &mut ScopeStack) -> Result<(), Fault> {
        let coordinator = self.coordinator;
        let component = &coordinator.component;

        scopes
            .enter(ScopeRole::Resource, coordinator.scope.create(component))
            .await?;
        if let Some(factory) = &coordinator.inner_scope {
            scopes
                .enter(ScopeRole::Lifecycle, factory.create(component))
                .await?;
        }

        if coordinator.drive == Drive::LifecycleScope {
            tracing::debug!("component runs in its lifecycle scope, answering supervisor");
            return self.impersonate().await;
        }

        let inbound = RelayInbound::new(self.inbound, &self.ledger);
        let outbound = RelayOutbound::new(self.outbound, &self.ledger);
        let run = AssertUnwindSafe(component.run(&inbound, &outbound))
            .catch_unwind()
            .await;

        match run {
            Ok(result) => self.reconcile(result).await,
            Err(payload) => {
                let panic = ComponentPanic::from_payload(payload);
                let fault = Fault::new(FaultOrigin::Panicked, panic);
                tracing::error!(error = %fault, "component panicked");
                Err(fault)
            }
        }
    }

    /// Decide which of the four outcomes the component's run amounts to
    async fn reconcile(&self, result: Result<(), BoxError>) -> Result<(), Fault> {
        if let Err(e) = result {
            let fault = Fault::new(FaultOrigin::Component, e);
            let decision = classify(&self.ledger(), fault.origin());
            return match decision {
                Decision::SuppressAndImpersonate => {
                    tracing::warn!(
                        error = %fault,
                        "component raised without joining the handshake, suppressing"
                    );
                    self.impersonate().await
                }
                Decision::Propagate { .. } => Err(fault),
            };
        }

        let (startup, component_shutdown) = {
            let ledger = self.ledger();
            (
                ledger.startup().cloned(),
                ledger.component_shutdown().cloned(),
            )
        };

        match startup {
            None => {
                tracing::info!("component did not join the handshake, answering for it");
                self.impersonate().await
            }
            Some(Terminal::Failed(message)) => Err(Fault::reported(Phase::Startup, message)),
            Some(Terminal::Complete) => {
                if let Some(Terminal::Failed(message)) = component_shutdown {
                    return Err(Fault::reported(Phase::Shutdown, message));
                }
                self.await_request(MessageKind::ShutdownRequest).await
            }
        }
    }

    /// Play the participant's part toward the supervisor
    async fn impersonate(&self) -> Result<(), Fault> {
        self.ledger().mark_non_participant();
        self.await_request(MessageKind::StartupRequest).await?;
        self.emit(Message::startup_complete())
            .await
            .map_err(|e| Fault::new(FaultOrigin::Channel, e))?;
        self.await_request(MessageKind::ShutdownRequest).await
    }

    /// Receive a supervisor request unless the component already consumed it.
    /// Other messages arriving first are recorded and skipped.
    async fn await_request(&self, kind: MessageKind) -> Result<(), Fault> {
        tracing::debug!(expected = %kind, "waiting for supervisor");

        while !self.ledger().has_received(kind) {
            let message = self
                .inbound
                .recv()
                .await
                .map_err(|e| Fault::new(FaultOrigin::Channel, e))?;
            self.ledger().observe_inbound(message.kind);

            if message.kind != kind {
                tracing::warn!(
                    expected = %kind,
                    received = %message.kind,
                    "skipping unexpected message from supervisor"
                );
            }
        }
        Ok(())
    }

    /// Send a coordinator-originated message to the supervisor
    async fn emit(&self, message: Message) -> Result<(), ChannelError> {
        let record = message.clone();
        tracing::info!(kind = %message.kind, "sending to supervisor");
        self.outbound.send(message).await?;
        self.ledger().record_emitted(&record);
        Ok(())
    }

    /// Send the final terminal message and settle what the caller gets back
    async fn conclude(&self, outcome: Result<(), Fault>) -> Result<(), LifespanError> {
        let fault = match outcome {
            Ok(()) => {
                self.emit(Message::shutdown_complete()).await?;
                tracing::info!("handshake complete");
                return Ok(());
            }
            Err(fault) => fault,
        };

        let decision = classify(&self.ledger(), fault.origin());
        debug_assert!(
            !decision.is_suppressed(),
            "component faults are settled by reconcile before teardown"
        );
        let (phase, emit) = match decision {
            Decision::Propagate { phase, emit } => (phase, emit),
            Decision::SuppressAndImpersonate => {
                tracing::error!(error = %fault, "unsettled component fault at conclusion");
                (Phase::Startup, Some(MessageKind::StartupFailed))
            }
        };

        tracing::error!(%phase, error = %fault, "handshake failed");

        if let Some(kind) = emit {
            let text = fault.describe(self.coordinator.config.fault_detail);
            if let Err(e) = self.emit(Message::new(kind).with_message(text)).await {
                tracing::warn!(error = %e, "could not report failure to supervisor");
            }
        }

        Err(LifespanError::in_phase(phase, fault))
    }
}

#[cfg(test)]
#[path = "coordinator_tests.rs"]
mod tests;
