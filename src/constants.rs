// Copyright (c) 2025 Erick Bourgeois, firestoned
// SPDX-License-Identifier: MIT

//! Global constants for the cloudkit DNS controller.
//!
//! Constants are organized by category for easy maintenance.

// ============================================================================
// API Constants
// ============================================================================

/// API group for all cloudkit DNS CRDs
pub const API_GROUP: &str = "cloudkit.openshift.io";

/// API version for all cloudkit DNS CRDs
pub const API_VERSION: &str = "v1alpha1";

/// Fully qualified API version (group/version)
pub const API_GROUP_VERSION: &str = "cloudkit.openshift.io/v1alpha1";

/// Kind name for `DNSZone` resource
pub const KIND_DNS_ZONE: &str = "DNSZone";

/// Kind name for `DNSRecord` resource
pub const KIND_DNS_RECORD: &str = "DNSRecord";

// ============================================================================
// Finalizers
// ============================================================================

/// Finalizer set on `DNSZone` resources so their actuator `delete` runs before removal
pub const DNS_ZONE_FINALIZER: &str = "dnszone.cloudkit.openshift.io";

/// Finalizer set on `DNSRecord` resources so their actuator `delete` runs before removal
pub const DNS_RECORD_FINALIZER: &str = "dnsrecord.cloudkit.openshift.io";

// ============================================================================
// Controller Constants
// ============================================================================

/// Field manager used for server-side apply of CRDs
pub const FIELD_MANAGER: &str = "cloudkit-controller";

/// Default periodic resync after a successful create/update (5 minutes)
pub const DEFAULT_RESYNC_INTERVAL_SECS: u64 = 300;

/// Default requeue delay after a failed reconciliation (30 seconds)
pub const DEFAULT_ERROR_REQUEUE_SECS: u64 = 30;

/// Default listen address for the metrics and health endpoints
pub const DEFAULT_METRICS_ADDR: &str = "0.0.0.0:8080";

/// Number of Tokio worker threads for the controller runtime
pub const TOKIO_WORKER_THREADS: usize = 4;

/// Capacity of the in-memory store change feed
pub const MEMORY_STORE_FEED_CAPACITY: usize = 256;
