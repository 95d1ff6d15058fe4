// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Channel wrappers handed to the owned component
//!
//! Every message crossing them is recorded in the instance's ledger. Inbound
//! messages pass through untouched; outbound messages are forwarded or held
//! back according to [`EventLedger::observe_outbound`].

use crate::channel::{ChannelError, Inbound, Outbound};
use crate::ledger::{EventLedger, Routing};
use crate::message::Message;
use async_trait::async_trait;
use std::sync::{Mutex, MutexGuard};

pub(crate) fn lock(ledger: &Mutex<EventLedger>) -> MutexGuard<'_, EventLedger> {
    ledger.lock().unwrap_or_else(|e| e.into_inner())
}

/// Supervisor → component side
pub struct RelayInbound<'a> {
    inner: &'a dyn Inbound,
    ledger: &'a Mutex<EventLedger>,
}

impl<'a> RelayInbound<'a> {
    pub fn new(inner: &'a dyn Inbound, ledger: &'a Mutex<EventLedger>) -> Self {
        Self { inner, ledger }
    }
}

#[async_trait]
impl<'a> Inbound for RelayInbound<'a> {
    async fn recv(&self) -> Result<Message, ChannelError> {
        let message = self.inner.recv().await?;
        lock(self.ledger).observe_inbound(message.kind);
        tracing::debug!(kind = %message.kind, "relayed to component");
        Ok(message)
    }
}

/// Component → supervisor side
pub struct RelayOutbound<'a> {
    inner: &'a dyn Outbound,
    ledger: &'a Mutex<EventLedger>,
}

impl<'a> RelayOutbound<'a> {
    pub fn new(inner: &'a dyn Outbound, ledger: &'a Mutex<EventLedger>) -> Self {
        Self { inner, ledger }
    }
}

#[async_trait]
impl<'a> Outbound for RelayOutbound<'a> {
    async fn send(&self, message: Message) -> Result<(), ChannelError> {
        let routing = lock(self.ledger).observe_outbound(&message);
        match routing {
            Routing::Forward => {
                tracing::debug!(kind = %message.kind, "relayed to supervisor");
                self.inner.send(message).await
            }
            Routing::Suppress => {
                tracing::debug!(kind = %message.kind, "held back from supervisor");
                Ok(())
            }
        }
    }
}

#[cfg(test)]
#[path = "relay_tests.rs"]
mod tests;
