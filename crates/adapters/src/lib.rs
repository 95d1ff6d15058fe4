// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

// Allow panic!/unwrap/expect in test code
#![cfg_attr(test, allow(clippy::panic))]
#![cfg_attr(test, allow(clippy::unwrap_used))]
#![cfg_attr(test, allow(clippy::expect_used))]
// Enable coverage(off) attribute for excluding test infrastructure
#![cfg_attr(coverage_nightly, feature(coverage_attribute))]

//! Concrete channels, tracing wrappers and the supervisor-side driver

pub mod config;
pub mod managed;
pub mod manager;
pub mod mpsc;
pub mod traced;

pub use config::ManagerConfig;
pub use managed::{lifecycle, ManagedScope};
pub use manager::{LifespanManager, ManagerError, RunningLifespan};
pub use mpsc::{pipe, MpscInbound, MpscOutbound};
pub use traced::{TracedInbound, TracedOutbound, TracedScope};
