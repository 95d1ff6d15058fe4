// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Channel endpoints the handshake is exchanged over
//!
//! Framing and transport are left to implementors; the coordinator only
//! needs to receive one message at a time and to hand one message at a time
//! downstream.

use crate::message::Message;
use async_trait::async_trait;
use std::sync::Arc;
use thiserror::Error;

/// Errors from channel operations
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ChannelError {
    #[error("channel closed")]
    Closed,
    #[error("transport error: {0}")]
    Transport(String),
}

/// Receiving side of a handshake channel (supervisor → coordinator → component)
#[async_trait]
pub trait Inbound: Send + Sync {
    /// Wait for the next message
    async fn recv(&self) -> Result<Message, ChannelError>;
}

/// Sending side of a handshake channel (component → coordinator → supervisor)
#[async_trait]
pub trait Outbound: Send + Sync {
    /// Hand a message downstream
    async fn send(&self, message: Message) -> Result<(), ChannelError>;
}

#[async_trait]
impl<T: Inbound + ?Sized> Inbound for &T {
    async fn recv(&self) -> Result<Message, ChannelError> {
        (**self).recv().await
    }
}

#[async_trait]
impl<T: Inbound + ?Sized> Inbound for Arc<T> {
    async fn recv(&self) -> Result<Message, ChannelError> {
        (**self).recv().await
    }
}

#[async_trait]
impl<T: Outbound + ?Sized> Outbound for &T {
    async fn send(&self, message: Message) -> Result<(), ChannelError> {
        (**self).send(message).await
    }
}

#[async_trait]
impl<T: Outbound + ?Sized> Outbound for Arc<T> {
    async fn send(&self, message: Message) -> Result<(), ChannelError> {
        (**self).send(message).await
    }
}
