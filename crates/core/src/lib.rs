// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

// Allow panic!/unwrap/expect in test code
#![cfg_attr(test, allow(clippy::panic))]
#![cfg_attr(test, allow(clippy::unwrap_used))]
#![cfg_attr(test, allow(clippy::expect_used))]
// Enable coverage(off) attribute for excluding test infrastructure
#![cfg_attr(coverage_nightly, feature(coverage_attribute))]

//! lifespan-core: startup/shutdown handshake coordination
//!
//! This crate provides:
//! - The handshake message model and the channel traits it travels over
//! - The per-instance event ledger and fault classification
//! - Resource scopes entered before and exited after an owned component
//! - [`Coordinator`], which keeps the supervisor's view consistent whether
//!   or not the component takes part in the handshake

pub mod channel;
pub mod component;
pub mod config;
pub mod error;
pub mod message;
pub mod scope;

// Coordination (order matters for dependencies)
pub mod ledger;
pub mod classify;
pub mod relay;
pub mod coordinator;

// Test support - only compiled for tests or when explicitly requested
#[cfg(any(test, feature = "test-support"))]
pub mod fake;

// Re-exports
pub use channel::{ChannelError, Inbound, Outbound};
pub use classify::{classify, Decision};
pub use component::{BoxError, Component};
pub use config::{ConfigError, CoordinatorConfig, FaultDetail};
pub use coordinator::Coordinator;
pub use error::{ComponentPanic, Fault, FaultOrigin, LifespanError, ReportedFailure};
pub use ledger::{EventLedger, Participation, Routing, Terminal};
pub use message::{Message, MessageKind, Phase};
pub use relay::{RelayInbound, RelayOutbound};
pub use scope::{NoopScope, ResourceScope, ScopeFactory, ScopeRole, ScopeStack};
