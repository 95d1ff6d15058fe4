// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Resource scopes and the stack that unwinds them
//!
//! Scopes are entered outermost first. A scope is pushed onto the
//! [`ScopeStack`] only once its `enter` succeeded, and [`ScopeStack::unwind`]
//! pops every entered scope in reverse order, so each one is exited exactly
//! once and inner scopes always exit before the scopes around them.

use crate::component::BoxError;
use crate::error::{Fault, FaultOrigin};
use async_trait::async_trait;

/// Which layer of the onion a scope belongs to
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ScopeRole {
    /// The caller's resource scope (outer)
    Resource,
    /// The component's own lifecycle scope (inner)
    Lifecycle,
}

impl std::fmt::Display for ScopeRole {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            ScopeRole::Resource => write!(f, "resource"),
            ScopeRole::Lifecycle => write!(f, "lifecycle"),
        }
    }
}

/// A setup/teardown pair owning arbitrary state
#[async_trait]
pub trait ResourceScope: Send {
    /// Acquire the resource
    async fn enter(&mut self) -> Result<(), BoxError>;

    /// Release the resource. Only called after a successful `enter`.
    async fn exit(&mut self) -> Result<(), BoxError>;
}

#[async_trait]
impl<S: ResourceScope + ?Sized> ResourceScope for Box<S> {
    async fn enter(&mut self) -> Result<(), BoxError> {
        (**self).enter().await
    }

    async fn exit(&mut self) -> Result<(), BoxError> {
        (**self).exit().await
    }
}

/// Scope that acquires nothing.
#[derive(Clone, Copy, Debug, Default)]
pub struct NoopScope;

#[async_trait]
impl ResourceScope for NoopScope {
    async fn enter(&mut self) -> Result<(), BoxError> {
        Ok(())
    }

    async fn exit(&mut self) -> Result<(), BoxError> {
        Ok(())
    }
}

/// Builds a fresh scope for a component, once per handshake instance
pub trait ScopeFactory<C: ?Sized>: Send + Sync {
    fn create(&self, component: &C) -> Box<dyn ResourceScope>;
}

impl<C, F, S> ScopeFactory<C> for F
where
    C: ?Sized,
    F: Fn(&C) -> S + Send + Sync,
    S: ResourceScope + 'static,
{
    fn create(&self, component: &C) -> Box<dyn ResourceScope> {
        Box::new(self(component))
    }
}

/// Entered scopes, in acquisition order
#[derive(Default)]
pub struct ScopeStack {
    entered: Vec<(ScopeRole, Box<dyn ResourceScope>)>,
}

impl ScopeStack {
    pub fn new() -> Self {
        Self::default()
    }

    /// Enter a scope and push it on success. Nothing is pushed on failure.
    pub async fn enter(
        &mut self,
        role: ScopeRole,
        mut scope: Box<dyn ResourceScope>,
    ) -> Result<(), Fault> {
        scope
            .enter()
            .await
            .map_err(|e| Fault::new(FaultOrigin::ScopeEnter(role), e))?;
        tracing::debug!(%role, depth = self.entered.len() + 1, "scope entered");
        self.entered.push((role, scope));
        Ok(())
    }

    /// Exit every entered scope, innermost first.
    ///
    /// All scopes are exited even when one fails; the first failure is
    /// returned and later ones are logged.
    pub async fn unwind(&mut self) -> Result<(), Fault> {
        let mut first: Option<Fault> = None;

        while let Some((role, mut scope)) = self.entered.pop() {
            match scope.exit().await {
                Ok(()) => tracing::debug!(%role, "scope exited"),
                Err(e) => {
                    let fault = Fault::new(FaultOrigin::ScopeExit(role), e);
                    match first {
                        None => first = Some(fault),
                        Some(_) => tracing::warn!(error = %fault, "additional teardown failure"),
                    }
                }
            }
        }

        match first {
            Some(fault) => Err(fault),
            None => Ok(()),
        }
    }

    /// Number of scopes currently entered
    pub fn depth(&self) -> usize {
        self.entered.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entered.is_empty()
    }
}

impl Drop for ScopeStack {
    fn drop(&mut self) {
        // exit() is async and cannot run here
        if !self.entered.is_empty() {
            tracing::warn!(
                depth = self.entered.len(),
                "scope stack dropped before unwind; scopes were not exited"
            );
        }
    }
}

#[cfg(test)]
#[path = "scope_tests.rs"]
mod tests;
