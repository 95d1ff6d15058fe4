// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Per-instance record of what crossed the handshake channels
//!
//! The ledger is the single source of truth for two decisions:
//! whether the component participates in the handshake (inferred from the
//! first startup terminal it sends) and which phase a fault belongs to
//! (whether the supervisor has already been told `startup-complete`).

use crate::message::{Message, MessageKind, Phase};
use std::collections::HashSet;

/// Whether the owned component takes part in the handshake
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Participation {
    /// No startup terminal seen from the component yet
    Unknown,
    /// The component sent `startup-complete` or `startup-failed`
    Participant,
    /// The component finished without touching the handshake; the
    /// coordinator answers the supervisor on its behalf
    NonParticipant,
}

/// Outcome of a phase as told to the supervisor
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Terminal {
    Complete,
    Failed(Option<String>),
}

impl Terminal {
    fn from_message(message: &Message) -> Option<Self> {
        if !message.kind.is_terminal() {
            return None;
        }
        Some(if message.kind.is_failure() {
            Terminal::Failed(message.message.clone())
        } else {
            Terminal::Complete
        })
    }

    pub fn is_complete(&self) -> bool {
        matches!(self, Terminal::Complete)
    }
}

/// What to do with a message the component sent
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Routing {
    /// Pass it to the supervisor unchanged
    Forward,
    /// Keep it from the supervisor
    Suppress,
}

#[derive(Debug, Clone)]
pub struct EventLedger {
    received: HashSet<MessageKind>,
    participation: Participation,
    startup: Option<Terminal>,
    shutdown: Option<Terminal>,
    component_shutdown: Option<Terminal>,
}

impl Default for EventLedger {
    fn default() -> Self {
        Self::new()
    }
}

impl EventLedger {
    pub fn new() -> Self {
        Self {
            received: HashSet::new(),
            participation: Participation::Unknown,
            startup: None,
            shutdown: None,
            component_shutdown: None,
        }
    }

    /// Record a message received from the supervisor
    pub fn observe_inbound(&mut self, kind: MessageKind) {
        self.received.insert(kind);
    }

    /// Record a message sent by the component and decide its routing.
    ///
    /// Startup terminals pass through once; duplicates are suppressed.
    /// Shutdown terminals are always held back: the coordinator sends the
    /// one the supervisor sees, after its own teardown.
    pub fn observe_outbound(&mut self, message: &Message) -> Routing {
        let Some(terminal) = Terminal::from_message(message) else {
            return Routing::Forward;
        };

        match message.kind.phase() {
            Phase::Startup => {
                if self.startup.is_some() {
                    return Routing::Suppress;
                }
                self.startup = Some(terminal);
                if self.participation == Participation::Unknown {
                    self.participation = Participation::Participant;
                }
                Routing::Forward
            }
            Phase::Shutdown => {
                if self.component_shutdown.is_none() {
                    self.component_shutdown = Some(terminal);
                }
                Routing::Suppress
            }
        }
    }

    /// Record a terminal message the coordinator sent itself
    pub fn record_emitted(&mut self, message: &Message) {
        let Some(terminal) = Terminal::from_message(message) else {
            return;
        };
        match message.kind.phase() {
            Phase::Startup => self.startup = Some(terminal),
            Phase::Shutdown => self.shutdown = Some(terminal),
        }
    }

    pub fn mark_non_participant(&mut self) {
        self.participation = Participation::NonParticipant;
    }

    pub fn has_received(&self, kind: MessageKind) -> bool {
        self.received.contains(&kind)
    }

    pub fn participation(&self) -> Participation {
        self.participation
    }

    /// Startup terminal the supervisor has seen, from either side
    pub fn startup(&self) -> Option<&Terminal> {
        self.startup.as_ref()
    }

    /// Shutdown terminal the coordinator has sent
    pub fn shutdown(&self) -> Option<&Terminal> {
        self.shutdown.as_ref()
    }

    /// Shutdown terminal the component tried to send (suppressed)
    pub fn component_shutdown(&self) -> Option<&Terminal> {
        self.component_shutdown.as_ref()
    }

    pub fn startup_completed(&self) -> bool {
        self.startup.as_ref().is_some_and(Terminal::is_complete)
    }

    /// Phase the handshake is in, as far as the supervisor knows
    pub fn phase(&self) -> Phase {
        if self.startup_completed() {
            Phase::Shutdown
        } else {
            Phase::Startup
        }
    }
}

#[cfg(test)]
#[path = "ledger_tests.rs"]
mod tests;
