// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Supervisor-side configuration

use lifespan_core::ConfigError;
use serde::{Deserialize, Serialize};
use std::time::Duration;

/// Configuration for a [`LifespanManager`](crate::LifespanManager)
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ManagerConfig {
    /// How long to wait for the startup terminal
    #[serde(with = "humantime_serde")]
    pub startup_timeout: Duration,
    /// How long to wait for the shutdown terminal
    #[serde(with = "humantime_serde")]
    pub shutdown_timeout: Duration,
    /// Buffered messages per direction
    pub channel_capacity: usize,
}

impl Default for ManagerConfig {
    fn default() -> Self {
        Self {
            startup_timeout: Duration::from_secs(5),
            shutdown_timeout: Duration::from_secs(5),
            channel_capacity: 16,
        }
    }
}

impl ManagerConfig {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_startup_timeout(mut self, timeout: Duration) -> Self {
        self.startup_timeout = timeout;
        self
    }

    pub fn with_shutdown_timeout(mut self, timeout: Duration) -> Self {
        self.shutdown_timeout = timeout;
        self
    }

    pub fn with_channel_capacity(mut self, capacity: usize) -> Self {
        self.channel_capacity = capacity;
        self
    }

    /// Parse from TOML; durations are humantime strings such as `"500ms"`
    pub fn from_toml(content: &str) -> Result<Self, ConfigError> {
        Ok(toml::from_str(content)?)
    }
}

#[cfg(test)]
#[path = "config_tests.rs"]
mod tests;
