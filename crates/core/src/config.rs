// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Coordinator configuration

use serde::{Deserialize, Serialize};
use thiserror::Error;

/// How much of a fault goes into a `*-failed` message
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum FaultDetail {
    /// Only the raised error's own message
    Message,
    /// Origin plus the full chain of error sources
    #[default]
    Chain,
}

/// Errors loading configuration
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("invalid config: {0}")]
    Parse(#[from] toml::de::Error),
}

/// Configuration for a [`Coordinator`](crate::Coordinator)
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct CoordinatorConfig {
    /// Name attached to the handshake's tracing span
    pub name: String,
    /// Diagnostic text included in failure messages
    pub fault_detail: FaultDetail,
}

impl Default for CoordinatorConfig {
    fn default() -> Self {
        Self {
            name: "lifespan".to_string(),
            fault_detail: FaultDetail::default(),
        }
    }
}

impl CoordinatorConfig {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_name(mut self, name: impl Into<String>) -> Self {
        self.name = name.into();
        self
    }

    pub fn with_fault_detail(mut self, detail: FaultDetail) -> Self {
        self.fault_detail = detail;
        self
    }

    /// Parse from TOML; missing keys keep their defaults
    pub fn from_toml(content: &str) -> Result<Self, ConfigError> {
        Ok(toml::from_str(content)?)
    }
}

#[cfg(test)]
#[path = "config_tests.rs"]
mod tests;
