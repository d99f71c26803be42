// Copyright (c) 2025 Erick Bourgeois, firestoned
// SPDX-License-Identifier: MIT

//! # cloudkit - finalizer-driven DNS controller for Kubernetes
//!
//! cloudkit keeps DNS zones and records in an external DNS provider in step
//! with `DNSZone` and `DNSRecord` custom resources. It never talks to a
//! provider itself: every external side effect goes through an
//! [`Actuator`](actuator::Actuator), and every read or write of the custom
//! resource goes through a [`ResourceStore`](store::ResourceStore).
//!
//! ## Lifecycle
//!
//! Each reconciliation pass performs exactly one step:
//!
//! 1. Attach the kind's finalizer to a new resource
//! 2. Create or update the external object for an active resource
//! 3. Delete the external object, then remove the finalizer, for a resource
//!    that is being deleted
//!
//! See [`reconcilers::lifecycle`] for the full state machine.
//!
//! ## Modules
//!
//! - [`crd`] - Custom Resource Definition types for DNS resources
//! - [`resource`] - Resource keys and the per-kind [`ManagedResource`](resource::ManagedResource) trait
//! - [`actuator`] - The external system interface and an in-memory implementation
//! - [`store`] - Resource persistence backed by the Kubernetes API or memory
//! - [`reconcilers`] - The lifecycle state machine and finalizer helpers
//! - [`controller`] - kube-runtime controller wiring
//! - [`scheme`] - CRD registration, generation and installation
//! - [`metrics`] / [`server`] - Prometheus metrics and health endpoints
//!
//! ## Example
//!
//! ```rust
//! use cloudkit::scheme::{add_to_scheme, Scheme};
//!
//! let mut scheme = Scheme::new();
//! add_to_scheme(&mut scheme);
//!
//! let yaml = scheme.to_yaml().expect("CRDs render as YAML");
//! assert!(yaml.contains("kind: CustomResourceDefinition"));
//! ```
//!
//! See [`reconcilers`] for driving resources through the lifecycle.

pub mod actuator;
pub mod constants;
pub mod controller;
pub mod crd;
pub mod errors;
pub mod metrics;
pub mod reconcilers;
pub mod resource;
pub mod scheme;
pub mod server;
pub mod store;
