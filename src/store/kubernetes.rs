// Copyright (c) 2025 Erick Bourgeois, firestoned
// SPDX-License-Identifier: MIT

//! Resource store backed by the Kubernetes API server.

use super::ResourceStore;
use crate::errors::StoreError;
use crate::resource::{ManagedResource, ResourceKey};
use kube::api::PostParams;
use kube::{Api, Client};
use std::marker::PhantomData;
use tracing::debug;

/// [`ResourceStore`] over the Kubernetes API.
///
/// Updates use `replace`, which sends the loaded `resourceVersion` back to the
/// API server. A stale version is rejected with HTTP 409 and surfaces as
/// [`StoreError::Conflict`].
#[derive(Clone)]
pub struct KubeStore<R> {
    client: Client,
    _kind: PhantomData<fn() -> R>,
}

impl<R: ManagedResource> KubeStore<R> {
    /// Create a store using the given Kubernetes client.
    #[must_use]
    pub fn new(client: Client) -> Self {
        Self {
            client,
            _kind: PhantomData,
        }
    }

    fn api(&self, namespace: &str) -> Api<R> {
        Api::namespaced(self.client.clone(), namespace)
    }
}

/// Map a Kubernetes API error onto the store error taxonomy.
fn map_api_error(kind: &'static str, key: &ResourceKey, err: kube::Error) -> StoreError {
    match err {
        kube::Error::Api(ae) if ae.code == 404 => StoreError::NotFound {
            kind,
            key: key.clone(),
        },
        kube::Error::Api(ae) if ae.code == 409 => StoreError::Conflict {
            kind,
            key: key.clone(),
            reason: ae.message.clone(),
        },
        other => StoreError::Api(other),
    }
}

#[async_trait::async_trait]
impl<R: ManagedResource> ResourceStore<R> for KubeStore<R> {
    async fn get(&self, key: &ResourceKey) -> Result<R, StoreError> {
        debug!(kind = R::KIND, key = %key, "Fetching resource");
        self.api(&key.namespace)
            .get(&key.name)
            .await
            .map_err(|e| map_api_error(R::KIND, key, e))
    }

    async fn update(&self, resource: &R) -> Result<R, StoreError> {
        let key = ResourceKey::from_resource(resource)
            .ok_or(StoreError::MissingMetadata { kind: R::KIND })?;
        debug!(
            kind = R::KIND,
            key = %key,
            resource_version = ?resource.resource_version(),
            "Replacing resource"
        );
        self.api(&key.namespace)
            .replace(&key.name, &PostParams::default(), resource)
            .await
            .map_err(|e| map_api_error(R::KIND, &key, e))
    }
}
