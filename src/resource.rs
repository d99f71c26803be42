// Copyright (c) 2025 Erick Bourgeois, firestoned
// SPDX-License-Identifier: MIT

//! Resource kinds managed by the reconciler and the keys that identify them.
//!
//! The reconciliation state machine is written once and instantiated per kind.
//! [`ManagedResource`] carries everything that differs between kinds: the kind
//! name, the finalizer token owned by the controller, and how to name the
//! external object an actuator manages for a given resource.

use crate::constants::{DNS_RECORD_FINALIZER, DNS_ZONE_FINALIZER, KIND_DNS_RECORD, KIND_DNS_ZONE};
use crate::crd::{DNSRecord, DNSZone};
use kube::core::NamespaceResourceScope;
use kube::{Resource, ResourceExt};
use serde::de::DeserializeOwned;
use serde::Serialize;
use std::fmt;
use std::fmt::Debug;

/// Namespace-scoped name identifying one resource.
#[derive(Clone, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct ResourceKey {
    /// Namespace of the resource
    pub namespace: String,
    /// Name of the resource
    pub name: String,
}

impl ResourceKey {
    /// Create a key from a namespace and a name.
    pub fn new(namespace: impl Into<String>, name: impl Into<String>) -> Self {
        Self {
            namespace: namespace.into(),
            name: name.into(),
        }
    }

    /// Build the key of an existing resource from its metadata.
    ///
    /// Returns `None` for resources without a name or namespace.
    pub fn from_resource<R: Resource>(resource: &R) -> Option<Self> {
        let meta = resource.meta();
        Some(Self {
            namespace: meta.namespace.clone()?,
            name: meta.name.clone()?,
        })
    }
}

impl fmt::Display for ResourceKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}/{}", self.namespace, self.name)
    }
}

/// A custom resource kind driven through the finalizer lifecycle.
pub trait ManagedResource:
    Resource<DynamicType = (), Scope = NamespaceResourceScope>
    + ResourceExt
    + Clone
    + Debug
    + DeserializeOwned
    + Serialize
    + Send
    + Sync
    + 'static
{
    /// The resource kind (e.g., `DNSZone`), used in logs and metric labels
    const KIND: &'static str;

    /// The finalizer token owned by this controller for the kind
    const FINALIZER: &'static str;

    /// Name of the external object this resource describes.
    ///
    /// Adapters use it to find the object in the external system.
    fn external_name(&self) -> String;
}

impl ManagedResource for DNSZone {
    const KIND: &'static str = KIND_DNS_ZONE;
    const FINALIZER: &'static str = DNS_ZONE_FINALIZER;

    fn external_name(&self) -> String {
        self.spec.zone_name.clone()
    }
}

impl ManagedResource for DNSRecord {
    const KIND: &'static str = KIND_DNS_RECORD;
    const FINALIZER: &'static str = DNS_RECORD_FINALIZER;

    fn external_name(&self) -> String {
        format!(
            "{}.{}/{}",
            self.spec.record_name, self.spec.zone_name, self.spec.record_type
        )
    }
}

#[cfg(test)]
#[path = "resource_tests.rs"]
mod resource_tests;
