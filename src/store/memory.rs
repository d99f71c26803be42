// Copyright (c) 2025 Erick Bourgeois, firestoned
// SPDX-License-Identifier: MIT

//! In-process resource store.
//!
//! `MemoryStore` follows the API server rules the reconciler depends on:
//!
//! - every write bumps `metadata.resourceVersion`, and an update carrying a
//!   stale version is rejected with [`StoreError::Conflict`]
//! - deleting a resource that carries finalizers only sets
//!   `metadata.deletionTimestamp`; the resource is purged once its last
//!   finalizer is removed
//! - every create, update and delete is announced on a change feed, which
//!   plays the role of the watch that triggers reconciliation

use super::ResourceStore;
use crate::constants::MEMORY_STORE_FEED_CAPACITY;
use crate::errors::StoreError;
use crate::resource::{ManagedResource, ResourceKey};
use k8s_openapi::apimachinery::pkg::apis::meta::v1::Time;
use k8s_openapi::jiff::Timestamp;
use std::collections::BTreeMap;
use std::sync::atomic::{AtomicUsize, Ordering};
use tokio::sync::{broadcast, Mutex};
use tracing::debug;

struct State<R> {
    objects: BTreeMap<ResourceKey, R>,
    last_version: u64,
}

impl<R> State<R> {
    fn next_version(&mut self) -> String {
        self.last_version += 1;
        self.last_version.to_string()
    }
}

/// In-memory [`ResourceStore`] with optimistic concurrency and a change feed.
pub struct MemoryStore<R> {
    state: Mutex<State<R>>,
    updates: AtomicUsize,
    feed: broadcast::Sender<ResourceKey>,
}

impl<R: ManagedResource> Default for MemoryStore<R> {
    fn default() -> Self {
        Self::new()
    }
}

impl<R: ManagedResource> MemoryStore<R> {
    /// Create an empty store.
    #[must_use]
    pub fn new() -> Self {
        let (feed, _) = broadcast::channel(MEMORY_STORE_FEED_CAPACITY);
        Self {
            state: Mutex::new(State {
                objects: BTreeMap::new(),
                last_version: 0,
            }),
            updates: AtomicUsize::new(0),
            feed,
        }
    }

    /// Subscribe to the change feed.
    ///
    /// The key of every created, updated or deleted resource is sent to all
    /// subscribers.
    #[must_use]
    pub fn subscribe(&self) -> broadcast::Receiver<ResourceKey> {
        self.feed.subscribe()
    }

    /// Number of successful [`ResourceStore::update`] calls so far.
    #[must_use]
    pub fn update_count(&self) -> usize {
        self.updates.load(Ordering::SeqCst)
    }

    /// Create a resource, as an external actor would.
    ///
    /// An existing resource under the same key is replaced. The stored copy is
    /// returned with a fresh `resourceVersion`.
    ///
    /// # Errors
    ///
    /// Returns [`StoreError::MissingMetadata`] if the resource has no name or
    /// namespace.
    pub async fn insert(&self, mut resource: R) -> Result<R, StoreError> {
        let key = ResourceKey::from_resource(&resource)
            .ok_or(StoreError::MissingMetadata { kind: R::KIND })?;

        let mut state = self.state.lock().await;
        resource.meta_mut().resource_version = Some(state.next_version());
        state.objects.insert(key.clone(), resource.clone());
        drop(state);

        debug!(kind = R::KIND, key = %key, "Stored resource");
        self.notify(key);
        Ok(resource)
    }

    /// Request deletion of a resource, as an external actor would.
    ///
    /// A resource without finalizers is purged immediately. Otherwise its
    /// deletion timestamp is set (once) and it stays until the finalizers are
    /// cleared.
    ///
    /// # Errors
    ///
    /// Returns [`StoreError::NotFound`] if the resource does not exist.
    pub async fn request_deletion(&self, key: &ResourceKey) -> Result<(), StoreError> {
        let mut state = self.state.lock().await;
        let Some(resource) = state.objects.get(key).cloned() else {
            return Err(StoreError::NotFound {
                kind: R::KIND,
                key: key.clone(),
            });
        };

        if resource.finalizers().is_empty() {
            state.objects.remove(key);
            debug!(kind = R::KIND, key = %key, "Purged resource without finalizers");
        } else if resource.meta().deletion_timestamp.is_none() {
            let mut resource = resource;
            resource.meta_mut().deletion_timestamp = Some(Time(Timestamp::now()));
            resource.meta_mut().resource_version = Some(state.next_version());
            state.objects.insert(key.clone(), resource);
            debug!(kind = R::KIND, key = %key, "Marked resource for deletion");
        } else {
            return Ok(());
        }
        drop(state);

        self.notify(key.clone());
        Ok(())
    }

    /// Current stored copy of a resource, if any.
    pub async fn snapshot(&self, key: &ResourceKey) -> Option<R> {
        self.state.lock().await.objects.get(key).cloned()
    }

    /// Returns true if a resource is stored under `key`.
    pub async fn contains(&self, key: &ResourceKey) -> bool {
        self.state.lock().await.objects.contains_key(key)
    }

    fn notify(&self, key: ResourceKey) {
        // No subscribers is not an error; the feed is optional.
        let _ = self.feed.send(key);
    }
}

#[async_trait::async_trait]
impl<R: ManagedResource> ResourceStore<R> for MemoryStore<R> {
    async fn get(&self, key: &ResourceKey) -> Result<R, StoreError> {
        self.snapshot(key).await.ok_or_else(|| StoreError::NotFound {
            kind: R::KIND,
            key: key.clone(),
        })
    }

    async fn update(&self, resource: &R) -> Result<R, StoreError> {
        let key = ResourceKey::from_resource(resource)
            .ok_or(StoreError::MissingMetadata { kind: R::KIND })?;

        let mut state = self.state.lock().await;
        let Some(current) = state.objects.get(&key) else {
            return Err(StoreError::NotFound { kind: R::KIND, key });
        };

        if current.resource_version() != resource.resource_version() {
            return Err(StoreError::Conflict {
                kind: R::KIND,
                reason: format!(
                    "resourceVersion {} is stale, current is {}",
                    resource.resource_version().unwrap_or_default(),
                    current.resource_version().unwrap_or_default()
                ),
                key,
            });
        }

        // The deletion timestamp is owned by the store, not by writers.
        let deletion_timestamp = current.meta().deletion_timestamp.clone();
        let mut stored = resource.clone();
        stored.meta_mut().deletion_timestamp = deletion_timestamp;
        stored.meta_mut().resource_version = Some(state.next_version());

        if stored.meta().deletion_timestamp.is_some() && stored.finalizers().is_empty() {
            state.objects.remove(&key);
            debug!(kind = R::KIND, key = %key, "Last finalizer removed, purged resource");
        } else {
            state.objects.insert(key.clone(), stored.clone());
        }
        drop(state);

        self.updates.fetch_add(1, Ordering::SeqCst);
        self.notify(key);
        Ok(stored)
    }
}

#[cfg(test)]
#[path = "memory_tests.rs"]
mod memory_tests;
