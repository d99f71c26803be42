// Copyright (c) 2025 Erick Bourgeois, firestoned
// SPDX-License-Identifier: MIT

//! Reconciliation logic for DNS resources.
//!
//! A single generic state machine ([`Reconciler`]) handles both resource kinds.
//! It is instantiated once per kind with that kind's actuator:
//!
//! - [`DNSZoneReconciler`] - drives `DNSZone` resources
//! - [`DNSRecordReconciler`] - drives `DNSRecord` resources
//!
//! # Reconciliation Architecture
//!
//! 1. **Trigger** - A store change (watch event) schedules a pass for a key
//! 2. **Load** - The current resource is read from the store
//! 3. **Finalize** - The finalizer is attached, or the deletion path runs
//! 4. **Actuate** - The external object is created or updated
//!
//! # Example: Using a Reconciler
//!
//! ```rust,no_run
//! use cloudkit::actuator::InMemoryActuator;
//! use cloudkit::crd::DNSZone;
//! use cloudkit::reconcilers::Reconciler;
//! use cloudkit::resource::ResourceKey;
//! use cloudkit::store::MemoryStore;
//! use std::sync::Arc;
//!
//! async fn reconcile_zone() -> anyhow::Result<()> {
//!     let store = Arc::new(MemoryStore::<DNSZone>::new());
//!     let actuator = Arc::new(InMemoryActuator::<DNSZone>::new());
//!     let reconciler = Reconciler::new(store, actuator);
//!
//!     let outcome = reconciler
//!         .reconcile(&ResourceKey::new("default", "example-com"))
//!         .await?;
//!     println!("{outcome}");
//!     Ok(())
//! }
//! ```

pub mod finalizers;
pub mod lifecycle;

pub use lifecycle::{Outcome, Reconciler};

use crate::actuator::Actuator;
use crate::crd::{DNSRecord, DNSZone};
use crate::store::ResourceStore;

/// Reconciler for `DNSZone` resources, with a type-erased actuator and store.
pub type DNSZoneReconciler =
    Reconciler<DNSZone, dyn Actuator<DNSZone>, dyn ResourceStore<DNSZone>>;

/// Reconciler for `DNSRecord` resources, with a type-erased actuator and store.
pub type DNSRecordReconciler =
    Reconciler<DNSRecord, dyn Actuator<DNSRecord>, dyn ResourceStore<DNSRecord>>;
