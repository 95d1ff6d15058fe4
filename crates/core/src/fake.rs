// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Scripted channels, scopes and components for testing
#![cfg_attr(coverage_nightly, coverage(off))]

use crate::channel::{ChannelError, Inbound, Outbound};
use crate::component::{BoxError, Component};
use crate::message::{Message, MessageKind};
use crate::scope::ResourceScope;
use async_trait::async_trait;
use std::collections::VecDeque;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};
use thiserror::Error;

/// Error raised by fakes on request
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("{0}")]
pub struct FakeError(pub String);

/// Shared, ordered log of everything the fakes observed
#[derive(Clone, Default)]
pub struct Journal {
    entries: Arc<Mutex<Vec<String>>>,
}

impl Journal {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn record(&self, entry: impl Into<String>) {
        self.entries
            .lock()
            .unwrap_or_else(|e| e.into_inner())
            .push(entry.into());
    }

    /// All entries in the order they were recorded
    pub fn entries(&self) -> Vec<String> {
        self.entries
            .lock()
            .unwrap_or_else(|e| e.into_inner())
            .clone()
    }

    /// How many times an entry was recorded
    pub fn count(&self, entry: &str) -> usize {
        self.entries
            .lock()
            .unwrap_or_else(|e| e.into_inner())
            .iter()
            .filter(|e| e.as_str() == entry)
            .count()
    }

    /// Index of the first occurrence of an entry
    pub fn position(&self, entry: &str) -> Option<usize> {
        self.entries
            .lock()
            .unwrap_or_else(|e| e.into_inner())
            .iter()
            .position(|e| e.as_str() == entry)
    }
}

// =============================================================================
// Channels
// =============================================================================

/// Inbound channel that yields a fixed script of supervisor messages
pub struct ScriptedInbound {
    messages: Mutex<VecDeque<Message>>,
    journal: Journal,
    hang_when_empty: bool,
}

impl ScriptedInbound {
    pub fn new(messages: impl IntoIterator<Item = Message>) -> Self {
        Self {
            messages: Mutex::new(messages.into_iter().collect()),
            journal: Journal::new(),
            hang_when_empty: false,
        }
    }

    /// Supervisor that sends startup then shutdown
    pub fn full_cycle() -> Self {
        Self::new([Message::startup_request(), Message::shutdown_request()])
    }

    pub fn with_journal(mut self, journal: Journal) -> Self {
        self.journal = journal;
        self
    }

    /// Block forever once the script runs out instead of reporting closure,
    /// like a supervisor that never initiates shutdown
    pub fn hang_when_empty(mut self) -> Self {
        self.hang_when_empty = true;
        self
    }

    /// Messages not yet received
    pub fn remaining(&self) -> usize {
        self.messages
            .lock()
            .unwrap_or_else(|e| e.into_inner())
            .len()
    }
}

#[async_trait]
impl Inbound for ScriptedInbound {
    async fn recv(&self) -> Result<Message, ChannelError> {
        let next = self
            .messages
            .lock()
            .unwrap_or_else(|e| e.into_inner())
            .pop_front();

        match next {
            Some(message) => {
                self.journal.record(format!("recv {}", message.kind));
                Ok(message)
            }
            None if self.hang_when_empty => std::future::pending().await,
            None => Err(ChannelError::Closed),
        }
    }
}

/// Outbound channel that records what reached the supervisor
#[derive(Default)]
pub struct RecordingOutbound {
    sent: Mutex<Vec<Message>>,
    journal: Journal,
    closed: bool,
}

impl RecordingOutbound {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_journal(mut self, journal: Journal) -> Self {
        self.journal = journal;
        self
    }

    /// Reject every send, like a supervisor that went away
    pub fn closed() -> Self {
        Self {
            closed: true,
            ..Self::default()
        }
    }

    pub fn sent(&self) -> Vec<Message> {
        self.sent.lock().unwrap_or_else(|e| e.into_inner()).clone()
    }

    pub fn kinds(&self) -> Vec<MessageKind> {
        self.sent().into_iter().map(|m| m.kind).collect()
    }
}

#[async_trait]
impl Outbound for RecordingOutbound {
    async fn send(&self, message: Message) -> Result<(), ChannelError> {
        if self.closed {
            return Err(ChannelError::Closed);
        }
        self.journal.record(format!("sent {}", message.kind));
        self.sent
            .lock()
            .unwrap_or_else(|e| e.into_inner())
            .push(message);
        Ok(())
    }
}

// =============================================================================
// Scopes
// =============================================================================

/// Scope that records `<name>.enter` / `<name>.exit` and can be told to fail
#[derive(Clone)]
pub struct FakeScope {
    name: String,
    journal: Journal,
    fail_enter: Option<String>,
    fail_exit: Option<String>,
}

impl FakeScope {
    pub fn new(name: impl Into<String>, journal: Journal) -> Self {
        Self {
            name: name.into(),
            journal,
            fail_enter: None,
            fail_exit: None,
        }
    }

    pub fn failing_enter(mut self, message: impl Into<String>) -> Self {
        self.fail_enter = Some(message.into());
        self
    }

    pub fn failing_exit(mut self, message: impl Into<String>) -> Self {
        self.fail_exit = Some(message.into());
        self
    }
}

#[async_trait]
impl ResourceScope for FakeScope {
    async fn enter(&mut self) -> Result<(), BoxError> {
        self.journal.record(format!("{}.enter", self.name));
        match &self.fail_enter {
            Some(message) => Err(Box::new(FakeError(message.clone()))),
            None => Ok(()),
        }
    }

    async fn exit(&mut self) -> Result<(), BoxError> {
        self.journal.record(format!("{}.exit", self.name));
        match &self.fail_exit {
            Some(message) => Err(Box::new(FakeError(message.clone()))),
            None => Ok(()),
        }
    }
}

// =============================================================================
// Components
// =============================================================================

/// One step of a scripted component
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Step {
    /// Wait for the next inbound message
    Receive,
    /// Send a message outbound
    Send(Message),
    /// Write an entry to the journal
    Record(String),
    /// Return an error
    Raise(String),
}

/// Component that plays back a list of steps
pub struct ScriptedComponent {
    steps: Vec<Step>,
    journal: Journal,
    invocations: AtomicUsize,
}

impl ScriptedComponent {
    pub fn new(steps: impl IntoIterator<Item = Step>) -> Self {
        Self {
            steps: steps.into_iter().collect(),
            journal: Journal::new(),
            invocations: AtomicUsize::new(0),
        }
    }

    /// Component that ignores the handshake and returns
    pub fn silent() -> Self {
        Self::new([])
    }

    /// Component that ignores the handshake and raises
    pub fn raising(message: impl Into<String>) -> Self {
        Self::new([Step::Raise(message.into())])
    }

    /// Component implementing the handshake, recording its own setup and shutdown
    pub fn participant() -> Self {
        Self::new([
            Step::Receive,
            Step::Record("component.setup".to_string()),
            Step::Send(Message::startup_complete()),
            Step::Receive,
            Step::Record("component.shutdown".to_string()),
            Step::Send(Message::shutdown_complete()),
        ])
    }

    pub fn with_journal(mut self, journal: Journal) -> Self {
        self.journal = journal;
        self
    }

    /// Number of times `run` was called
    pub fn invocations(&self) -> usize {
        self.invocations.load(Ordering::SeqCst)
    }
}

#[async_trait]
impl Component for ScriptedComponent {
    async fn run(&self, inbound: &dyn Inbound, outbound: &dyn Outbound) -> Result<(), BoxError> {
        self.invocations.fetch_add(1, Ordering::SeqCst);

        for step in &self.steps {
            match step {
                Step::Receive => {
                    inbound.recv().await?;
                }
                Step::Send(message) => outbound.send(message.clone()).await?,
                Step::Record(entry) => self.journal.record(entry.clone()),
                Step::Raise(message) => return Err(Box::new(FakeError(message.clone()))),
            }
        }

        Ok(())
    }
}

#[cfg(test)]
#[path = "fake_tests.rs"]
mod tests;
