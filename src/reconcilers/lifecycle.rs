// Copyright (c) 2025 Erick Bourgeois, firestoned
// SPDX-License-Identifier: MIT

//! The finalizer lifecycle state machine.
//!
//! One [`Reconciler`] pass loads a resource by key and performs exactly one of:
//!
//! | Resource state                            | Action                                   |
//! |-------------------------------------------|------------------------------------------|
//! | not found                                 | nothing                                  |
//! | active, finalizer missing                 | add finalizer, persist                   |
//! | deleting, finalizer missing               | nothing                                  |
//! | deleting, finalizer present               | actuator `delete`, then remove finalizer |
//! | active, finalizer present, object exists  | actuator `update`                        |
//! | active, finalizer present, object missing | actuator `create`                        |
//!
//! The finalizer is added in a pass of its own, before any actuator call, and
//! removed only right after a successful `delete`. A failing `delete` therefore
//! keeps the resource from being purged until the external object is gone.
//!
//! The reconciler holds no state between passes and never retries. Every
//! error is returned to the caller, which decides when to run again.

use crate::actuator::{Actuator, Operation};
use crate::errors::{ReconcileError, StoreError};
use crate::metrics;
use crate::reconcilers::finalizers::{clear_finalizer, ensure_finalizer, has_finalizer, is_deleting};
use crate::resource::{ManagedResource, ResourceKey};
use crate::store::ResourceStore;
use std::fmt;
use std::marker::PhantomData;
use std::sync::Arc;
use std::time::Duration;
use tracing::{debug, error, info, warn};

/// What a reconciliation pass did.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Outcome {
    /// The resource no longer exists
    NotFound,
    /// The finalizer was added; no actuator call was made
    FinalizerAdded,
    /// The resource is being deleted and carries no finalizer
    NoOp,
    /// The external object was deleted and the finalizer removed
    Deleted,
    /// The external object did not exist and was created
    Created,
    /// The external object existed and was updated
    Updated,
}

impl Outcome {
    /// Lowercase name, used in logs.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::NotFound => "not_found",
            Self::FinalizerAdded => "finalizer_added",
            Self::NoOp => "no_op",
            Self::Deleted => "deleted",
            Self::Created => "created",
            Self::Updated => "updated",
        }
    }

    /// Delay before the resource should be reconciled again, if any.
    ///
    /// Only converged resources are resynced periodically. Every other
    /// outcome either wrote to the resource, which triggers a new pass on
    /// its own, or left nothing to do.
    #[must_use]
    pub fn requeue_after(self, resync_interval: Option<Duration>) -> Option<Duration> {
        match self {
            Self::Created | Self::Updated => resync_interval,
            Self::NotFound | Self::FinalizerAdded | Self::NoOp | Self::Deleted => None,
        }
    }
}

impl fmt::Display for Outcome {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Drives resources of kind `R` through the finalizer lifecycle.
///
/// `A` manages the external objects and `S` stores the resources.
pub struct Reconciler<R, A: ?Sized, S: ?Sized> {
    store: Arc<S>,
    actuator: Arc<A>,
    _kind: PhantomData<fn() -> R>,
}

impl<R, A: ?Sized, S: ?Sized> Clone for Reconciler<R, A, S> {
    fn clone(&self) -> Self {
        Self {
            store: Arc::clone(&self.store),
            actuator: Arc::clone(&self.actuator),
            _kind: PhantomData,
        }
    }
}

impl<R, A, S> Reconciler<R, A, S>
where
    R: ManagedResource,
    A: Actuator<R> + ?Sized,
    S: ResourceStore<R> + ?Sized,
{
    /// Create a reconciler over a store and an actuator.
    pub fn new(store: Arc<S>, actuator: Arc<A>) -> Self {
        Self {
            store,
            actuator,
            _kind: PhantomData,
        }
    }

    /// Run one reconciliation pass for the resource identified by `key`.
    ///
    /// # Errors
    ///
    /// Returns [`ReconcileError::Store`] if loading (other than not found) or
    /// persisting the resource fails, and [`ReconcileError::Actuator`] with the
    /// actuator's own error if any actuator call fails.
    pub async fn reconcile(&self, key: &ResourceKey) -> Result<Outcome, ReconcileError> {
        debug!(kind = R::KIND, key = %key, "Syncing resource");

        let resource = match self.store.get(key).await {
            Ok(resource) => resource,
            Err(StoreError::NotFound { .. }) => {
                // Removed after this pass was scheduled. Cleanup already ran
                // when the finalizer was cleared.
                warn!(kind = R::KIND, key = %key, "Resource was not found, nothing to do");
                return Ok(Outcome::NotFound);
            }
            Err(e) => {
                error!(kind = R::KIND, key = %key, error = %e, "Error retrieving resource");
                return Err(e.into());
            }
        };

        let deleting = is_deleting(&resource);
        let finalized = has_finalizer(&resource, R::FINALIZER);

        if !deleting && !finalized {
            if let Err(e) = ensure_finalizer(self.store.as_ref(), &resource, R::FINALIZER).await {
                error!(kind = R::KIND, key = %key, error = %e, "Error adding finalizer");
                return Err(e.into());
            }
            debug!(kind = R::KIND, key = %key, "Finalizer added");
            return Ok(Outcome::FinalizerAdded);
        }

        if deleting {
            return self.finalize(key, &resource, finalized).await;
        }

        let exists = self.call(key, Operation::Exists, self.actuator.exists(&resource)).await?;
        if exists {
            debug!(kind = R::KIND, key = %key, "External object exists, calling idempotent update");
            self.call(key, Operation::Update, self.actuator.update(&resource)).await?;
            debug!(kind = R::KIND, key = %key, "External object updated successfully");
            return Ok(Outcome::Updated);
        }

        debug!(kind = R::KIND, key = %key, "External object does not exist, calling create");
        self.call(key, Operation::Create, self.actuator.create(&resource)).await?;
        info!(kind = R::KIND, key = %key, "External object created successfully");
        Ok(Outcome::Created)
    }

    /// Deletion branch: delete the external object, then release the resource.
    async fn finalize(
        &self,
        key: &ResourceKey,
        resource: &R,
        finalized: bool,
    ) -> Result<Outcome, ReconcileError> {
        if !finalized {
            debug!(kind = R::KIND, key = %key, "Deleted resource with no finalizer present, nothing to do");
            return Ok(Outcome::NoOp);
        }

        debug!(kind = R::KIND, key = %key, "Resource is being deleted, calling actuator delete");
        self.call(key, Operation::Delete, self.actuator.delete(resource)).await?;

        debug!(kind = R::KIND, key = %key, "External object deleted, removing finalizer");
        if let Err(e) = clear_finalizer(self.store.as_ref(), resource, R::FINALIZER).await {
            error!(kind = R::KIND, key = %key, error = %e, "Error removing finalizer");
            return Err(e.into());
        }
        info!(kind = R::KIND, key = %key, "External object deleted and finalizer removed");
        Ok(Outcome::Deleted)
    }

    /// Await one actuator call, recording its outcome.
    async fn call<T>(
        &self,
        key: &ResourceKey,
        operation: Operation,
        call: impl std::future::Future<Output = anyhow::Result<T>>,
    ) -> Result<T, ReconcileError> {
        match call.await {
            Ok(value) => {
                metrics::record_actuator_operation(R::KIND, operation.as_str(), true);
                Ok(value)
            }
            Err(e) => {
                metrics::record_actuator_operation(R::KIND, operation.as_str(), false);
                error!(
                    kind = R::KIND,
                    key = %key,
                    operation = %operation,
                    error = %e,
                    "Actuator call failed"
                );
                Err(ReconcileError::Actuator(e))
            }
        }
    }
}

#[cfg(test)]
#[path = "lifecycle_tests.rs"]
mod lifecycle_tests;
