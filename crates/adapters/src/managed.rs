// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! A component's own handshake, run as a resource scope

use crate::config::ManagerConfig;
use crate::manager::{LifespanManager, ManagerError, RunningLifespan};
use async_trait::async_trait;
use lifespan_core::{BoxError, Component, ResourceScope};
use std::sync::Arc;

/// Scope factory that manages the coordinator's own component.
///
/// Pass it to `Coordinator::with_managed_lifecycle` so the component is run
/// once, by its manager.
pub fn lifecycle<C: Component + 'static>(
    config: ManagerConfig,
) -> impl Fn(&Arc<C>) -> ManagedScope<C> + Send + Sync + 'static {
    move |component: &Arc<C>| {
        ManagedScope::new(LifespanManager::new(Arc::clone(component)).with_config(config.clone()))
    }
}

/// Starts a component on enter and shuts it down on exit.
///
/// A component that does not support the handshake is treated as having
/// nothing to start or stop.
pub struct ManagedScope<C> {
    manager: LifespanManager<C>,
    running: Option<RunningLifespan>,
}

impl<C: Component + 'static> ManagedScope<C> {
    pub fn new(manager: LifespanManager<C>) -> Self {
        Self {
            manager,
            running: None,
        }
    }

    /// True between a successful enter and exit of a participating component
    pub fn is_running(&self) -> bool {
        self.running.is_some()
    }
}

#[async_trait]
impl<C: Component + 'static> ResourceScope for ManagedScope<C> {
    async fn enter(&mut self) -> Result<(), BoxError> {
        match self.manager.start().await {
            Ok(running) => {
                self.running = Some(running);
                Ok(())
            }
            Err(ManagerError::Unsupported) => {
                tracing::debug!("managed component has no lifespan, skipping");
                Ok(())
            }
            Err(e) => Err(Box::new(e)),
        }
    }

    async fn exit(&mut self) -> Result<(), BoxError> {
        match self.running.take() {
            Some(running) => running.shutdown().await.map_err(BoxError::from),
            None => Ok(()),
        }
    }
}

#[cfg(test)]
#[path = "managed_tests.rs"]
mod tests;
