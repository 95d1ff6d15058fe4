// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Faults raised during a handshake instance and the errors surfaced to callers

use crate::channel::ChannelError;
use crate::component::BoxError;
use crate::config::FaultDetail;
use crate::message::Phase;
use crate::scope::ScopeRole;
use thiserror::Error;

/// Where a fault came from
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FaultOrigin {
    /// A scope failed to enter
    ScopeEnter(ScopeRole),
    /// A scope failed to exit
    ScopeExit(ScopeRole),
    /// The owned component raised
    Component,
    /// The owned component panicked
    Panicked,
    /// The owned component sent a `*-failed` message without raising
    Reported(Phase),
    /// The supervisor side of the channel went away
    Channel,
}

impl std::fmt::Display for FaultOrigin {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            FaultOrigin::ScopeEnter(role) => write!(f, "{} scope setup failed", role),
            FaultOrigin::ScopeExit(role) => write!(f, "{} scope teardown failed", role),
            FaultOrigin::Component => write!(f, "component raised"),
            FaultOrigin::Panicked => write!(f, "component panicked"),
            FaultOrigin::Reported(phase) => write!(f, "component reported {} failure", phase),
            FaultOrigin::Channel => write!(f, "handshake channel failed"),
        }
    }
}

/// Failure text a component put in its own `*-failed` message
#[derive(Debug, Error)]
#[error("{}", .0.as_deref().unwrap_or("no diagnostic given"))]
pub struct ReportedFailure(pub Option<String>);

/// Panic payload of a component, as text
#[derive(Debug, Error)]
#[error("{0}")]
pub struct ComponentPanic(pub String);

impl ComponentPanic {
    pub fn from_payload(payload: Box<dyn std::any::Any + Send>) -> Self {
        let text = match payload.downcast::<String>() {
            Ok(text) => *text,
            Err(payload) => match payload.downcast::<&'static str>() {
                Ok(text) => (*text).to_string(),
                Err(_) => "non-string panic payload".to_string(),
            },
        };
        Self(text)
    }
}

/// A classified fault: its origin plus the underlying error
#[derive(Debug, Error)]
#[error("{origin}: {source}")]
pub struct Fault {
    origin: FaultOrigin,
    #[source]
    source: BoxError,
}

impl Fault {
    pub fn new(origin: FaultOrigin, source: impl Into<BoxError>) -> Self {
        Self {
            origin,
            source: source.into(),
        }
    }

    /// Fault for a `*-failed` message the component sent itself
    pub fn reported(phase: Phase, message: Option<String>) -> Self {
        Self::new(FaultOrigin::Reported(phase), ReportedFailure(message))
    }

    pub fn origin(&self) -> FaultOrigin {
        self.origin
    }

    /// The underlying error, as raised
    pub fn cause(&self) -> &(dyn std::error::Error + Send + Sync + 'static) {
        self.source.as_ref()
    }

    pub fn downcast_ref<E: std::error::Error + 'static>(&self) -> Option<&E> {
        self.source.downcast_ref::<E>()
    }

    pub fn into_cause(self) -> BoxError {
        self.source
    }

    /// Diagnostic text for the terminal message sent to the supervisor
    pub fn describe(&self, detail: FaultDetail) -> String {
        match detail {
            FaultDetail::Message => self.source.to_string(),
            FaultDetail::Chain => {
                let mut text = self.to_string();
                let mut next = self.source.source();
                while let Some(cause) = next {
                    text.push_str("\ncaused by: ");
                    text.push_str(&cause.to_string());
                    next = cause.source();
                }
                text
            }
        }
    }
}

/// Errors returned to the caller of a handshake
#[derive(Debug, Error)]
pub enum LifespanError {
    /// Fault before startup completed; the supervisor was told `startup-failed`
    #[error("startup failed: {0}")]
    Startup(#[source] Fault),
    /// Fault after startup completed; the supervisor was told `shutdown-failed`
    #[error("shutdown failed: {0}")]
    Shutdown(#[source] Fault),
    /// The final `shutdown-complete` could not be delivered
    #[error("handshake channel error: {0}")]
    Channel(#[from] ChannelError),
}

impl LifespanError {
    pub(crate) fn in_phase(phase: Phase, fault: Fault) -> Self {
        match phase {
            Phase::Startup => LifespanError::Startup(fault),
            Phase::Shutdown => LifespanError::Shutdown(fault),
        }
    }

    pub fn fault(&self) -> Option<&Fault> {
        match self {
            LifespanError::Startup(fault) | LifespanError::Shutdown(fault) => Some(fault),
            LifespanError::Channel(_) => None,
        }
    }

    pub fn phase(&self) -> Option<Phase> {
        match self {
            LifespanError::Startup(_) => Some(Phase::Startup),
            LifespanError::Shutdown(_) => Some(Phase::Shutdown),
            LifespanError::Channel(_) => None,
        }
    }

    /// Short stable label (snake_case) for logs
    pub fn as_label(&self) -> &'static str {
        match self {
            LifespanError::Startup(_) => "lifespan_startup_failed",
            LifespanError::Shutdown(_) => "lifespan_shutdown_failed",
            LifespanError::Channel(_) => "lifespan_channel_error",
        }
    }
}

#[cfg(test)]
#[path = "error_tests.rs"]
mod tests;
