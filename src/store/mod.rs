// Copyright (c) 2025 Erick Bourgeois, firestoned
// SPDX-License-Identifier: MIT

//! Resource stores: where the reconciler loads resources from and persists
//! finalizer changes to.
//!
//! - [`KubeStore`] - the Kubernetes API server, used by the controller binary
//! - [`MemoryStore`] - an in-process store with the same concurrency rules,
//!   used for embedding and tests

pub mod kubernetes;
pub mod memory;

pub use kubernetes::KubeStore;
pub use memory::MemoryStore;

use crate::errors::StoreError;
use crate::resource::ResourceKey;

/// Storage for resources of kind `R`.
///
/// Implementations must enforce optimistic concurrency on `update`: if the
/// resource was modified after the caller loaded it, the update fails with
/// [`StoreError::Conflict`] and nothing is written.
#[async_trait::async_trait]
pub trait ResourceStore<R>: Send + Sync {
    /// Load the current version of a resource.
    ///
    /// # Errors
    ///
    /// Returns [`StoreError::NotFound`] if no resource exists under `key`, or
    /// another [`StoreError`] if the store cannot be reached.
    async fn get(&self, key: &ResourceKey) -> Result<R, StoreError>;

    /// Persist a modified resource and return the stored version.
    ///
    /// # Errors
    ///
    /// Returns [`StoreError::Conflict`] if `resource` is stale,
    /// [`StoreError::NotFound`] if it no longer exists, or another
    /// [`StoreError`] if the write fails.
    async fn update(&self, resource: &R) -> Result<R, StoreError>;
}
