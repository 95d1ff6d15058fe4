// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Supervisor-side driver for a component's handshake
//!
//! [`LifespanManager::start`] spawns the component on a tokio task wired to
//! two `mpsc` pipes, sends `startup-request` and waits for the startup
//! terminal. The returned [`RunningLifespan`] sends `shutdown-request`, waits
//! for the shutdown terminal and joins the task.

use crate::config::ManagerConfig;
use crate::mpsc::{pipe, MpscInbound, MpscOutbound};
use async_trait::async_trait;
use lifespan_core::{
    BoxError, ChannelError, Component, Inbound, Message, MessageKind, Outbound, Phase,
};
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use std::time::Duration;
use thiserror::Error;
use tokio::task::JoinHandle;
use tracing::Instrument;

/// Errors seen by the supervisor side
#[derive(Debug, Error)]
pub enum ManagerError {
    #[error("startup failed: {}", .message.as_deref().unwrap_or("no diagnostic given"))]
    StartupFailed { message: Option<String> },

    #[error("shutdown failed: {}", .message.as_deref().unwrap_or("no diagnostic given"))]
    ShutdownFailed { message: Option<String> },

    #[error("{phase} timed out after {after:?}")]
    Timeout { phase: Phase, after: Duration },

    /// The component stopped before taking part in the handshake
    #[error("component does not support the lifespan handshake")]
    Unsupported,

    #[error("component failed: {0}")]
    Component(#[source] BoxError),

    #[error("component task panicked: {0}")]
    Panicked(String),

    #[error("channel error: {0}")]
    Channel(#[from] ChannelError),
}

impl ManagerError {
    /// Short stable label (snake_case) for logs
    pub fn as_label(&self) -> &'static str {
        match self {
            ManagerError::StartupFailed { .. } => "startup_failed",
            ManagerError::ShutdownFailed { .. } => "shutdown_failed",
            ManagerError::Timeout { .. } => "timeout",
            ManagerError::Unsupported => "unsupported",
            ManagerError::Component(_) => "component_failed",
            ManagerError::Panicked(_) => "panicked",
            ManagerError::Channel(_) => "channel_error",
        }
    }
}

type ComponentTask = JoinHandle<Result<(), BoxError>>;

/// Inbound end handed to the component; remembers whether it was ever read
struct ComponentInbound {
    inner: MpscInbound,
    received: Arc<AtomicBool>,
}

#[async_trait]
impl Inbound for ComponentInbound {
    async fn recv(&self) -> Result<Message, ChannelError> {
        let message = self.inner.recv().await?;
        self.received.store(true, Ordering::SeqCst);
        Ok(message)
    }
}

/// Starts a component and drives its startup phase
pub struct LifespanManager<C> {
    component: Arc<C>,
    config: ManagerConfig,
}

impl<C: Component + 'static> LifespanManager<C> {
    pub fn new(component: Arc<C>) -> Self {
        Self {
            component,
            config: ManagerConfig::default(),
        }
    }

    pub fn with_config(mut self, config: ManagerConfig) -> Self {
        self.config = config;
        self
    }

    pub fn config(&self) -> &ManagerConfig {
        &self.config
    }

    /// Spawn the component and complete the startup phase
    pub async fn start(&self) -> Result<RunningLifespan, ManagerError> {
        let capacity = self.config.channel_capacity;
        let (to_component, component_rx) = pipe(capacity);
        let (component_tx, from_component) = pipe(capacity);
        let received = Arc::new(AtomicBool::new(false));

        let inbound = ComponentInbound {
            inner: component_rx,
            received: Arc::clone(&received),
        };
        let component = Arc::clone(&self.component);
        let task: ComponentTask = tokio::spawn(
            async move { component.run(&inbound, &component_tx).await }
                .instrument(tracing::info_span!("lifespan.component")),
        );

        tracing::info!("sending startup request");
        if let Err(e) = to_component.send(Message::startup_request()).await {
            tracing::debug!(error = %e, "component stopped before startup request");
        }

        let after = self.config.startup_timeout;
        let terminal = match tokio::time::timeout(
            after,
            await_terminal(&from_component, Phase::Startup),
        )
        .await
        {
            Ok(terminal) => terminal,
            Err(_) => {
                tracing::error!(?after, "startup timed out");
                task.abort();
                return Err(ManagerError::Timeout {
                    phase: Phase::Startup,
                    after,
                });
            }
        };

        match terminal {
            Some(message) if message.kind == MessageKind::StartupComplete => {
                tracing::info!("startup complete");
                Ok(RunningLifespan {
                    to_component,
                    from_component,
                    task,
                    config: self.config.clone(),
                })
            }
            Some(message) => {
                tracing::error!(message = ?message.message, "startup failed");
                if let Err(e) = join(task, self.config.shutdown_timeout).await {
                    tracing::debug!(error = %e, "component ended after reporting startup failure");
                }
                Err(ManagerError::StartupFailed {
                    message: message.message,
                })
            }
            None => {
                let outcome = join(task, self.config.shutdown_timeout).await;
                match outcome {
                    Err(ManagerError::Component(e)) if received.load(Ordering::SeqCst) => {
                        tracing::error!(error = %e, "component failed during startup");
                        Err(ManagerError::Component(e))
                    }
                    Err(ManagerError::Component(e)) => {
                        tracing::info!(error = %e, "component does not support the handshake");
                        Err(ManagerError::Unsupported)
                    }
                    Err(other) => Err(other),
                    Ok(()) => {
                        tracing::info!("component returned without answering startup");
                        Err(ManagerError::Unsupported)
                    }
                }
            }
        }
    }
}

/// A component that completed startup and has not yet been shut down
pub struct RunningLifespan {
    to_component: MpscOutbound,
    from_component: MpscInbound,
    task: ComponentTask,
    config: ManagerConfig,
}

impl RunningLifespan {
    /// True if the component task already ended
    pub fn is_finished(&self) -> bool {
        self.task.is_finished()
    }

    /// Run the shutdown phase and join the component task
    pub async fn shutdown(self) -> Result<(), ManagerError> {
        let Self {
            to_component,
            from_component,
            task,
            config,
        } = self;

        tracing::info!("sending shutdown request");
        if let Err(e) = to_component.send(Message::shutdown_request()).await {
            tracing::debug!(error = %e, "component stopped before shutdown request");
        }

        let after = config.shutdown_timeout;
        let terminal = match tokio::time::timeout(
            after,
            await_terminal(&from_component, Phase::Shutdown),
        )
        .await
        {
            Ok(terminal) => terminal,
            Err(_) => {
                tracing::error!(?after, "shutdown timed out");
                task.abort();
                return Err(ManagerError::Timeout {
                    phase: Phase::Shutdown,
                    after,
                });
            }
        };

        let outcome = join(task, after).await;
        match terminal {
            Some(message) if message.kind == MessageKind::ShutdownComplete => {
                tracing::info!("shutdown complete");
                outcome
            }
            Some(message) => {
                tracing::error!(message = ?message.message, "shutdown failed");
                if let Err(e) = outcome {
                    tracing::debug!(error = %e, "component ended after reporting shutdown failure");
                }
                Err(ManagerError::ShutdownFailed {
                    message: message.message,
                })
            }
            None => {
                outcome?;
                tracing::warn!("component returned without answering shutdown");
                Err(ManagerError::Channel(ChannelError::Closed))
            }
        }
    }
}

/// Wait for the first terminal of `phase`. `None` once the component's
/// sending side is gone.
async fn await_terminal(inbound: &MpscInbound, phase: Phase) -> Option<Message> {
    loop {
        match inbound.recv().await {
            Ok(message) if message.kind.is_terminal() && message.kind.phase() == phase => {
                return Some(message);
            }
            Ok(message) => {
                tracing::warn!(kind = %message.kind, %phase, "ignoring unexpected message");
            }
            Err(_) => return None,
        }
    }
}

/// Wait for the component task to end, aborting it after `after`
async fn join(mut task: ComponentTask, after: Duration) -> Result<(), ManagerError> {
    match tokio::time::timeout(after, &mut task).await {
        Ok(Ok(Ok(()))) => Ok(()),
        Ok(Ok(Err(e))) => Err(ManagerError::Component(e)),
        Ok(Err(e)) => Err(ManagerError::Panicked(e.to_string())),
        Err(_) => {
            task.abort();
            tracing::warn!(?after, "component task did not end, aborted");
            Ok(())
        }
    }
}

#[cfg(test)]
#[path = "manager_tests.rs"]
mod tests;
