// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! In-process handshake channels over tokio `mpsc`

use async_trait::async_trait;
use lifespan_core::{ChannelError, Inbound, Message, Outbound};
use tokio::sync::{mpsc, Mutex};

/// Sending half of a pipe
#[derive(Clone)]
pub struct MpscOutbound {
    tx: mpsc::Sender<Message>,
}

/// Receiving half of a pipe
pub struct MpscInbound {
    // Inbound::recv takes &self; the lock is only contended by misuse
    rx: Mutex<mpsc::Receiver<Message>>,
}

/// Create a bounded one-way pipe. A capacity of zero is raised to one.
pub fn pipe(capacity: usize) -> (MpscOutbound, MpscInbound) {
    let (tx, rx) = mpsc::channel(capacity.max(1));
    (
        MpscOutbound { tx },
        MpscInbound {
            rx: Mutex::new(rx),
        },
    )
}

impl MpscOutbound {
    /// True once the receiving half has been dropped
    pub fn is_closed(&self) -> bool {
        self.tx.is_closed()
    }
}

#[async_trait]
impl Outbound for MpscOutbound {
    async fn send(&self, message: Message) -> Result<(), ChannelError> {
        self.tx
            .send(message)
            .await
            .map_err(|_| ChannelError::Closed)
    }
}

impl MpscInbound {
    /// Take a message if one is already queued
    pub async fn try_recv(&self) -> Option<Message> {
        self.rx.lock().await.try_recv().ok()
    }
}

#[async_trait]
impl Inbound for MpscInbound {
    async fn recv(&self) -> Result<Message, ChannelError> {
        self.rx.lock().await.recv().await.ok_or(ChannelError::Closed)
    }
}

#[cfg(test)]
#[path = "mpsc_tests.rs"]
mod tests;
