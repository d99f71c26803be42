// Copyright (c) 2025 Erick Bourgeois, firestoned
// SPDX-License-Identifier: MIT

//! Actuators: adapters that manage the external object behind a resource.
//!
//! An actuator is implemented once per external system (a cloud DNS provider,
//! a DNS server API, ...) and per resource kind. The reconciler decides *which*
//! operation to run; the actuator only knows *how* to run it.
//!
//! # Example
//!
//! ```rust,no_run
//! use cloudkit::actuator::Actuator;
//! use cloudkit::crd::DNSZone;
//! use anyhow::Result;
//!
//! struct ProviderZones;
//!
//! #[async_trait::async_trait]
//! impl Actuator<DNSZone> for ProviderZones {
//!     async fn create(&self, zone: &DNSZone) -> Result<()> {
//!         // Call the provider API to create `zone.spec.zone_name`
//!         Ok(())
//!     }
//!
//!     async fn update(&self, _zone: &DNSZone) -> Result<()> {
//!         Ok(())
//!     }
//!
//!     async fn delete(&self, _zone: &DNSZone) -> Result<()> {
//!         Ok(())
//!     }
//!
//!     async fn exists(&self, _zone: &DNSZone) -> Result<bool> {
//!         Ok(false)
//!     }
//! }
//! ```

pub mod memory;

pub use memory::InMemoryActuator;

use anyhow::Result;
use std::fmt;

/// Operations an actuator performs against the external system.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum Operation {
    Create,
    Update,
    Delete,
    Exists,
}

impl Operation {
    /// Lowercase name, used in logs and metric labels.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Create => "create",
            Self::Update => "update",
            Self::Delete => "delete",
            Self::Exists => "exists",
        }
    }
}

impl fmt::Display for Operation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Adapter managing the external object for resources of kind `R`.
///
/// Errors are opaque to the reconciler. Any error is returned to the
/// controller as-is and the resource is reconciled again later.
#[async_trait::async_trait]
pub trait Actuator<R>: Send + Sync {
    /// Create the external object.
    async fn create(&self, resource: &R) -> Result<()>;

    /// Bring the external object in line with the resource spec.
    ///
    /// Called on every reconciliation of an existing object, whether or not
    /// the resource spec changed, so it must be idempotent.
    async fn update(&self, resource: &R) -> Result<()>;

    /// Delete the external object.
    ///
    /// May be called more than once for the same resource when removing the
    /// finalizer afterwards fails, so it must be idempotent.
    async fn delete(&self, resource: &R) -> Result<()>;

    /// Check whether the external object currently exists.
    async fn exists(&self, resource: &R) -> Result<bool>;
}
