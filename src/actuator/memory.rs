// Copyright (c) 2025 Erick Bourgeois, firestoned
// SPDX-License-Identifier: MIT

//! In-memory actuator.
//!
//! Keeps the set of "external" objects in process, keyed by
//! [`ManagedResource::external_name`]. The controller binary uses it as a
//! dry-run backend; tests use its call log and failure injection.

use super::{Actuator, Operation};
use crate::resource::ManagedResource;
use anyhow::{anyhow, Result};
use std::collections::{BTreeMap, BTreeSet};
use std::marker::PhantomData;
use std::sync::{Mutex, MutexGuard};
use tracing::info;

#[derive(Default)]
struct State {
    objects: BTreeSet<String>,
    calls: Vec<(Operation, String)>,
    failures: BTreeMap<Operation, String>,
    exists_override: Option<bool>,
}

/// [`Actuator`] holding external objects in memory.
pub struct InMemoryActuator<R> {
    state: Mutex<State>,
    _kind: PhantomData<fn(&R)>,
}

impl<R: ManagedResource> Default for InMemoryActuator<R> {
    fn default() -> Self {
        Self::new()
    }
}

impl<R: ManagedResource> InMemoryActuator<R> {
    /// Create an actuator with no external objects.
    #[must_use]
    pub fn new() -> Self {
        Self {
            state: Mutex::new(State::default()),
            _kind: PhantomData,
        }
    }

    fn state(&self) -> MutexGuard<'_, State> {
        // Poisoning is ignored: every update touches a single field.
        self.state
            .lock()
            .unwrap_or_else(std::sync::PoisonError::into_inner)
    }

    /// Make every future call of `operation` fail with `message`.
    pub fn fail_on(&self, operation: Operation, message: impl Into<String>) {
        self.state().failures.insert(operation, message.into());
    }

    /// Stop injecting failures for `operation`.
    pub fn clear_failure(&self, operation: Operation) {
        self.state().failures.remove(&operation);
    }

    /// Force `exists` to report `value` regardless of the stored objects.
    pub fn set_exists(&self, value: bool) {
        self.state().exists_override = Some(value);
    }

    /// Add an external object directly, as if it had been created out of band.
    pub fn seed(&self, external_name: impl Into<String>) {
        self.state().objects.insert(external_name.into());
    }

    /// Returns true if an external object with this name exists.
    #[must_use]
    pub fn contains(&self, external_name: &str) -> bool {
        self.state().objects.contains(external_name)
    }

    /// Names of all external objects, sorted.
    #[must_use]
    pub fn objects(&self) -> Vec<String> {
        self.state().objects.iter().cloned().collect()
    }

    /// Every call received so far, in order, with the external name it targeted.
    #[must_use]
    pub fn calls(&self) -> Vec<(Operation, String)> {
        self.state().calls.clone()
    }

    /// Total number of calls received.
    #[must_use]
    pub fn call_count(&self) -> usize {
        self.state().calls.len()
    }

    /// Number of calls received for one operation.
    #[must_use]
    pub fn count(&self, operation: Operation) -> usize {
        self.state()
            .calls
            .iter()
            .filter(|(op, _)| *op == operation)
            .count()
    }

    /// Returns true if `operation` was called at least once.
    #[must_use]
    pub fn called(&self, operation: Operation) -> bool {
        self.count(operation) > 0
    }

    /// Log the call and return the injected failure, if any.
    fn begin(&self, operation: Operation, resource: &R) -> Result<(String, MutexGuard<'_, State>)> {
        let name = resource.external_name();
        let mut state = self.state();
        state.calls.push((operation, name.clone()));
        if let Some(message) = state.failures.get(&operation) {
            return Err(anyhow!("{message}"));
        }
        Ok((name, state))
    }
}

#[async_trait::async_trait]
impl<R: ManagedResource> Actuator<R> for InMemoryActuator<R> {
    async fn create(&self, resource: &R) -> Result<()> {
        let (name, mut state) = self.begin(Operation::Create, resource)?;
        state.objects.insert(name.clone());
        info!(kind = R::KIND, external = %name, "Created external object");
        Ok(())
    }

    async fn update(&self, resource: &R) -> Result<()> {
        let (name, mut state) = self.begin(Operation::Update, resource)?;
        state.objects.insert(name.clone());
        info!(kind = R::KIND, external = %name, "Updated external object");
        Ok(())
    }

    async fn delete(&self, resource: &R) -> Result<()> {
        let (name, mut state) = self.begin(Operation::Delete, resource)?;
        if state.objects.remove(&name) {
            info!(kind = R::KIND, external = %name, "Deleted external object");
        } else {
            info!(kind = R::KIND, external = %name, "External object already absent");
        }
        Ok(())
    }

    async fn exists(&self, resource: &R) -> Result<bool> {
        let (name, state) = self.begin(Operation::Exists, resource)?;
        Ok(state
            .exists_override
            .unwrap_or_else(|| state.objects.contains(&name)))
    }
}

#[cfg(test)]
#[path = "memory_tests.rs"]
mod memory_tests;
