// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Handshake messages exchanged between supervisor, coordinator and component

use serde::{Deserialize, Serialize};

/// Lifecycle phase a message belongs to
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Phase {
    Startup,
    Shutdown,
}

impl std::fmt::Display for Phase {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Phase::Startup => write!(f, "startup"),
            Phase::Shutdown => write!(f, "shutdown"),
        }
    }
}

/// Kind of a handshake message
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub enum MessageKind {
    #[serde(rename = "lifespan.startup")]
    StartupRequest,
    #[serde(rename = "lifespan.startup.complete")]
    StartupComplete,
    #[serde(rename = "lifespan.startup.failed")]
    StartupFailed,
    #[serde(rename = "lifespan.shutdown")]
    ShutdownRequest,
    #[serde(rename = "lifespan.shutdown.complete")]
    ShutdownComplete,
    #[serde(rename = "lifespan.shutdown.failed")]
    ShutdownFailed,
}

impl MessageKind {
    pub const ALL: [MessageKind; 6] = [
        MessageKind::StartupRequest,
        MessageKind::StartupComplete,
        MessageKind::StartupFailed,
        MessageKind::ShutdownRequest,
        MessageKind::ShutdownComplete,
        MessageKind::ShutdownFailed,
    ];

    pub fn phase(self) -> Phase {
        match self {
            MessageKind::StartupRequest
            | MessageKind::StartupComplete
            | MessageKind::StartupFailed => Phase::Startup,
            MessageKind::ShutdownRequest
            | MessageKind::ShutdownComplete
            | MessageKind::ShutdownFailed => Phase::Shutdown,
        }
    }

    /// Supervisor → component requests
    pub fn is_request(self) -> bool {
        matches!(
            self,
            MessageKind::StartupRequest | MessageKind::ShutdownRequest
        )
    }

    /// Messages that end a phase (`*-complete` or `*-failed`)
    pub fn is_terminal(self) -> bool {
        !self.is_request()
    }

    pub fn is_failure(self) -> bool {
        matches!(
            self,
            MessageKind::StartupFailed | MessageKind::ShutdownFailed
        )
    }

    /// Wire type name, as carried in the `type` field of a framed message
    pub fn as_str(self) -> &'static str {
        match self {
            MessageKind::StartupRequest => "lifespan.startup",
            MessageKind::StartupComplete => "lifespan.startup.complete",
            MessageKind::StartupFailed => "lifespan.startup.failed",
            MessageKind::ShutdownRequest => "lifespan.shutdown",
            MessageKind::ShutdownComplete => "lifespan.shutdown.complete",
            MessageKind::ShutdownFailed => "lifespan.shutdown.failed",
        }
    }
}

impl std::fmt::Display for MessageKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let name = match self {
            MessageKind::StartupRequest => "startup-request",
            MessageKind::StartupComplete => "startup-complete",
            MessageKind::StartupFailed => "startup-failed",
            MessageKind::ShutdownRequest => "shutdown-request",
            MessageKind::ShutdownComplete => "shutdown-complete",
            MessageKind::ShutdownFailed => "shutdown-failed",
        };
        write!(f, "{}", name)
    }
}

/// A single handshake message with an optional diagnostic payload
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Message {
    #[serde(rename = "type")]
    pub kind: MessageKind,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub message: Option<String>,
}

impl Message {
    pub fn new(kind: MessageKind) -> Self {
        Self {
            kind,
            message: None,
        }
    }

    pub fn with_message(mut self, message: impl Into<String>) -> Self {
        self.message = Some(message.into());
        self
    }

    pub fn startup_request() -> Self {
        Self::new(MessageKind::StartupRequest)
    }

    pub fn startup_complete() -> Self {
        Self::new(MessageKind::StartupComplete)
    }

    pub fn startup_failed(message: impl Into<String>) -> Self {
        Self::new(MessageKind::StartupFailed).with_message(message)
    }

    pub fn shutdown_request() -> Self {
        Self::new(MessageKind::ShutdownRequest)
    }

    pub fn shutdown_complete() -> Self {
        Self::new(MessageKind::ShutdownComplete)
    }

    pub fn shutdown_failed(message: impl Into<String>) -> Self {
        Self::new(MessageKind::ShutdownFailed).with_message(message)
    }

    /// Successful terminal message for a phase
    pub fn complete(phase: Phase) -> Self {
        match phase {
            Phase::Startup => Self::startup_complete(),
            Phase::Shutdown => Self::shutdown_complete(),
        }
    }

    /// Failed terminal message for a phase
    pub fn failed(phase: Phase, message: impl Into<String>) -> Self {
        match phase {
            Phase::Startup => Self::startup_failed(message),
            Phase::Shutdown => Self::shutdown_failed(message),
        }
    }
}

impl From<MessageKind> for Message {
    fn from(kind: MessageKind) -> Self {
        Self::new(kind)
    }
}

#[cfg(test)]
#[path = "message_tests.rs"]
mod tests;
