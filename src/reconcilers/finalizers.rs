// Copyright (c) 2025 Erick Bourgeois, firestoned
// SPDX-License-Identifier: MIT

//! Generic finalizer management for custom resources.
//!
//! The pure helpers ([`has_finalizer`], [`add_finalizer`], [`remove_finalizer`])
//! edit a resource's metadata in place. [`ensure_finalizer`] and
//! [`clear_finalizer`] apply the same edit and persist it through a
//! [`ResourceStore`], so the write is subject to optimistic concurrency.
//!
//! # Example
//!
//! ```rust,ignore
//! use cloudkit::reconcilers::finalizers::{ensure_finalizer, is_deleting};
//! use cloudkit::resource::ManagedResource;
//!
//! async fn reconcile<R: ManagedResource, S: ResourceStore<R>>(store: &S, resource: R) {
//!     if !is_deleting(&resource) {
//!         ensure_finalizer(store, &resource, R::FINALIZER).await?;
//!     }
//! }
//! ```

use crate::errors::StoreError;
use crate::metrics;
use crate::resource::ManagedResource;
use crate::store::ResourceStore;
use kube::Resource;
use tracing::info;

/// Returns true if deletion of the resource has been requested.
#[must_use]
pub fn is_deleting<R: Resource>(resource: &R) -> bool {
    resource.meta().deletion_timestamp.is_some()
}

/// Returns true if the resource carries `finalizer`.
#[must_use]
pub fn has_finalizer<R: Resource>(resource: &R, finalizer: &str) -> bool {
    resource
        .meta()
        .finalizers
        .as_ref()
        .is_some_and(|f| f.iter().any(|existing| existing == finalizer))
}

/// Add `finalizer` to the resource metadata.
///
/// Returns `false` without changing anything if it was already present.
pub fn add_finalizer<R: Resource>(resource: &mut R, finalizer: &str) -> bool {
    if has_finalizer(resource, finalizer) {
        return false;
    }
    resource
        .meta_mut()
        .finalizers
        .get_or_insert_with(Vec::new)
        .push(finalizer.to_string());
    true
}

/// Remove every occurrence of `finalizer` from the resource metadata.
///
/// Returns `false` without changing anything if it was not present.
pub fn remove_finalizer<R: Resource>(resource: &mut R, finalizer: &str) -> bool {
    if !has_finalizer(resource, finalizer) {
        return false;
    }
    if let Some(finalizers) = resource.meta_mut().finalizers.as_mut() {
        finalizers.retain(|f| f != finalizer);
    }
    true
}

/// Add a finalizer to a resource and persist it if not already present.
///
/// Returns the stored resource when an update was written, `None` when the
/// finalizer was already there.
///
/// # Errors
///
/// Returns the store error if the update is rejected, including
/// [`StoreError::Conflict`] when `resource` is stale.
pub async fn ensure_finalizer<R, S>(
    store: &S,
    resource: &R,
    finalizer: &str,
) -> Result<Option<R>, StoreError>
where
    R: ManagedResource,
    S: ResourceStore<R> + ?Sized,
{
    let mut updated = resource.clone();
    if !add_finalizer(&mut updated, finalizer) {
        return Ok(None);
    }

    let namespace = resource.namespace().unwrap_or_default();
    let name = resource.name_any();
    info!(
        "Adding finalizer {} to {}/{} {}",
        finalizer,
        namespace,
        name,
        R::KIND
    );

    let stored = store.update(&updated).await?;
    metrics::record_finalizer_operation(R::KIND, "add");

    info!(
        "Successfully added finalizer {} to {}/{} {}",
        finalizer,
        namespace,
        name,
        R::KIND
    );
    Ok(Some(stored))
}

/// Remove a finalizer from a resource and persist it if present.
///
/// Returns the stored resource when an update was written, `None` when the
/// finalizer was already absent. Once the last finalizer of a deleting
/// resource is removed the store is free to purge it.
///
/// # Errors
///
/// Returns the store error if the update is rejected, including
/// [`StoreError::Conflict`] when `resource` is stale.
pub async fn clear_finalizer<R, S>(
    store: &S,
    resource: &R,
    finalizer: &str,
) -> Result<Option<R>, StoreError>
where
    R: ManagedResource,
    S: ResourceStore<R> + ?Sized,
{
    let mut updated = resource.clone();
    if !remove_finalizer(&mut updated, finalizer) {
        return Ok(None);
    }

    let namespace = resource.namespace().unwrap_or_default();
    let name = resource.name_any();
    info!(
        "Removing finalizer {} from {}/{} {}",
        finalizer,
        namespace,
        name,
        R::KIND
    );

    let stored = store.update(&updated).await?;
    metrics::record_finalizer_operation(R::KIND, "remove");

    info!(
        "Successfully removed finalizer {} from {}/{} {}",
        finalizer,
        namespace,
        name,
        R::KIND
    );
    Ok(Some(stored))
}

#[cfg(test)]
#[path = "finalizers_tests.rs"]
mod finalizers_tests;
