// Copyright (c) 2025 Erick Bourgeois, firestoned
// SPDX-License-Identifier: MIT

//! Error types for resource stores and reconciliation.
//!
//! The reconciler distinguishes three kinds of failure:
//! - **Not found** - the resource is gone; reconciliation is a benign no-op
//! - **Conflict** - a finalizer update raced a concurrent write; reload and retry
//! - **Actuator errors** - opaque failures from the external system, always retryable
//!
//! Errors are returned to the caller unchanged. Nothing here retries or
//! suppresses an error; the controller's error policy decides when to run again.

use crate::resource::ResourceKey;
use thiserror::Error;

/// Errors returned by a [`ResourceStore`](crate::store::ResourceStore).
#[derive(Error, Debug)]
pub enum StoreError {
    /// The resource does not exist (HTTP 404 from the API server)
    #[error("{kind} {key} not found")]
    NotFound {
        /// Kind of the missing resource
        kind: &'static str,
        /// Key that was looked up
        key: ResourceKey,
    },

    /// The resource was modified since it was loaded (HTTP 409 from the API server)
    ///
    /// The update was rejected because the `resourceVersion` sent with it is stale.
    /// The caller must reload the resource and run again.
    #[error("{kind} {key} was modified concurrently: {reason}")]
    Conflict {
        /// Kind of the conflicting resource
        kind: &'static str,
        /// Key of the conflicting resource
        key: ResourceKey,
        /// Message reported by the store
        reason: String,
    },

    /// The resource has no name or namespace and cannot be addressed
    #[error("{kind} has no name or namespace")]
    MissingMetadata {
        /// Kind of the unaddressable resource
        kind: &'static str,
    },

    /// Any other Kubernetes API failure
    #[error(transparent)]
    Api(#[from] kube::Error),
}

impl StoreError {
    /// Returns true if this error reports a missing resource.
    #[must_use]
    pub fn is_not_found(&self) -> bool {
        matches!(self, Self::NotFound { .. })
    }

    /// Returns true if this error reports an optimistic concurrency conflict.
    #[must_use]
    pub fn is_conflict(&self) -> bool {
        matches!(self, Self::Conflict { .. })
    }
}

/// Errors returned by a reconciliation pass.
#[derive(Error, Debug)]
pub enum ReconcileError {
    /// Loading or persisting the resource failed
    #[error(transparent)]
    Store(#[from] StoreError),

    /// The actuator failed; the error is passed through untouched
    #[error(transparent)]
    Actuator(anyhow::Error),
}

impl ReconcileError {
    /// Returns true if running the reconciliation again may succeed.
    ///
    /// Conflicts and every actuator error are retryable. Store failures other
    /// than conflicts are retryable only when the API server reported a
    /// transient condition (429 or 5xx) or the connection failed.
    #[must_use]
    pub fn is_retryable(&self) -> bool {
        match self {
            Self::Actuator(_) => true,
            Self::Store(StoreError::Conflict { .. }) => true,
            Self::Store(StoreError::Api(kube::Error::Api(api_err))) => {
                api_err.code == 429 || (api_err.code >= 500 && api_err.code < 600)
            }
            Self::Store(StoreError::Api(kube::Error::Service(_))) => true,
            Self::Store(_) => false,
        }
    }

    /// Short label used for the error metric (e.g., `conflict`, `actuator`).
    #[must_use]
    pub fn metric_label(&self) -> &'static str {
        match self {
            Self::Actuator(_) => "actuator",
            Self::Store(StoreError::Conflict { .. }) => "conflict",
            Self::Store(StoreError::NotFound { .. }) => "not_found",
            Self::Store(_) => "store",
        }
    }
}

/// Errors from generating or installing CRD manifests.
#[derive(Error, Debug)]
pub enum SchemeError {
    /// Failed to render a CRD as YAML
    #[error("Failed to serialize CRD {name}: {source}")]
    Serialize {
        /// Name of the CRD (e.g., `dnszones.cloudkit.openshift.io`)
        name: String,
        /// Underlying serializer error
        #[source]
        source: serde_yaml::Error,
    },

    /// Failed to write a manifest file
    #[error("Failed to write {path}: {source}")]
    Io {
        /// File that could not be written
        path: String,
        /// Underlying I/O error
        #[source]
        source: std::io::Error,
    },

    /// The API server rejected the CRD
    #[error("Failed to install CRD {name}: {source}")]
    Install {
        /// Name of the CRD
        name: String,
        /// Underlying API error
        #[source]
        source: kube::Error,
    },
}

#[cfg(test)]
#[path = "errors_tests.rs"]
mod errors_tests;
