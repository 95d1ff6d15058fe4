// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! The owned component contract

use crate::channel::{Inbound, Outbound};
use async_trait::async_trait;
use std::sync::Arc;

/// Boxed error raised by components and resource scopes
pub type BoxError = Box<dyn std::error::Error + Send + Sync + 'static>;

/// A component whose lifecycle is driven over a handshake channel pair.
///
/// A component may implement the handshake fully (participant), or ignore
/// both endpoints and return (non-participant). It may also raise at any
/// point by returning an error.
#[async_trait]
pub trait Component: Send + Sync {
    async fn run(&self, inbound: &dyn Inbound, outbound: &dyn Outbound) -> Result<(), BoxError>;
}

#[async_trait]
impl<C: Component + ?Sized> Component for Arc<C> {
    async fn run(&self, inbound: &dyn Inbound, outbound: &dyn Outbound) -> Result<(), BoxError> {
        (**self).run(inbound, outbound).await
    }
}

#[async_trait]
impl<C: Component + ?Sized> Component for Box<C> {
    async fn run(&self, inbound: &dyn Inbound, outbound: &dyn Outbound) -> Result<(), BoxError> {
        (**self).run(inbound, outbound).await
    }
}
