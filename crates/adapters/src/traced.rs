// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Traced channel and scope wrappers for consistent observability

use async_trait::async_trait;
use lifespan_core::{BoxError, ChannelError, Inbound, Message, Outbound, ResourceScope};
use std::time::Instant;
use tracing::Instrument;

/// Wrapper that adds tracing to any Inbound channel
#[derive(Clone)]
pub struct TracedInbound<I> {
    inner: I,
}

impl<I> TracedInbound<I> {
    pub fn new(inner: I) -> Self {
        Self { inner }
    }

    pub fn into_inner(self) -> I {
        self.inner
    }
}

#[async_trait]
impl<I: Inbound> Inbound for TracedInbound<I> {
    async fn recv(&self) -> Result<Message, ChannelError> {
        let span = tracing::debug_span!("channel.recv");

        async {
            let start = Instant::now();
            let result = self.inner.recv().await;
            let elapsed_ms = start.elapsed().as_millis() as u64;

            match &result {
                Ok(message) => tracing::info!(kind = %message.kind, elapsed_ms, "received"),
                Err(ChannelError::Closed) => tracing::warn!(elapsed_ms, "channel closed"),
                Err(e) => tracing::error!(error = %e, elapsed_ms, "receive failed"),
            }

            result
        }
        .instrument(span)
        .await
    }
}

/// Wrapper that adds tracing to any Outbound channel
#[derive(Clone)]
pub struct TracedOutbound<O> {
    inner: O,
}

impl<O> TracedOutbound<O> {
    pub fn new(inner: O) -> Self {
        Self { inner }
    }

    pub fn into_inner(self) -> O {
        self.inner
    }
}

#[async_trait]
impl<O: Outbound> Outbound for TracedOutbound<O> {
    async fn send(&self, message: Message) -> Result<(), ChannelError> {
        let span = tracing::debug_span!("channel.send", kind = %message.kind);

        async {
            if let Some(text) = &message.message {
                tracing::debug!(message_len = text.len(), "sending");
            }

            let result = self.inner.send(message).await;
            match &result {
                Ok(()) => tracing::info!("sent"),
                Err(e) => tracing::error!(error = %e, "send failed"),
            }

            result
        }
        .instrument(span)
        .await
    }
}

/// Wrapper that adds tracing to any ResourceScope
pub struct TracedScope<S> {
    name: String,
    inner: S,
}

impl<S> TracedScope<S> {
    pub fn new(name: impl Into<String>, inner: S) -> Self {
        Self {
            name: name.into(),
            inner,
        }
    }

    pub fn name(&self) -> &str {
        &self.name
    }
}

#[async_trait]
impl<S: ResourceScope> ResourceScope for TracedScope<S> {
    async fn enter(&mut self) -> Result<(), BoxError> {
        let span = tracing::info_span!("scope.enter", scope = %self.name);
        let inner = &mut self.inner;

        async move {
            tracing::info!("entering");

            let start = Instant::now();
            let result = inner.enter().await;
            let elapsed_ms = start.elapsed().as_millis() as u64;

            match &result {
                Ok(()) => tracing::info!(elapsed_ms, "entered"),
                Err(e) => tracing::error!(elapsed_ms, error = %e, "enter failed"),
            }

            result
        }
        .instrument(span)
        .await
    }

    async fn exit(&mut self) -> Result<(), BoxError> {
        let span = tracing::info_span!("scope.exit", scope = %self.name);
        let inner = &mut self.inner;

        async move {
            let start = Instant::now();
            let result = inner.exit().await;
            let elapsed_ms = start.elapsed().as_millis() as u64;

            match &result {
                Ok(()) => tracing::info!(elapsed_ms, "exited"),
                Err(e) => tracing::error!(elapsed_ms, error = %e, "exit failed"),
            }

            result
        }
        .instrument(span)
        .await
    }
}

#[cfg(test)]
#[path = "traced_tests.rs"]
mod tests;
