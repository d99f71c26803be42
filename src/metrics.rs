// Copyright (c) 2025 Erick Bourgeois, firestoned
// SPDX-License-Identifier: MIT

//! Prometheus metrics for the cloudkit DNS controller.
//!
//! All metrics use the namespace prefix `cloudkit_openshift_io_`
//! (prometheus-safe version of "cloudkit.openshift.io").
//!
//! # Metrics Categories
//!
//! - **Reconciliation Metrics** - Reconciliation passes and their outcomes
//! - **Actuator Metrics** - Calls made to the external system
//! - **Finalizer Metrics** - Finalizers added and removed
//!
//! # Example
//!
//! ```rust,no_run
//! use cloudkit::metrics::record_reconciliation_success;
//!
//! record_reconciliation_success("DNSZone", std::time::Duration::from_secs(1));
//! ```

use prometheus::{CounterVec, Encoder, HistogramOpts, HistogramVec, Opts, Registry, TextEncoder};
use std::sync::LazyLock;
use std::time::Duration;

/// Namespace prefix for all metrics (prometheus-safe)
const METRICS_NAMESPACE: &str = "cloudkit_openshift_io";

/// Global Prometheus metrics registry
///
/// All metrics are registered in this registry and exposed via `/metrics` endpoint.
pub static METRICS_REGISTRY: LazyLock<Registry> = LazyLock::new(Registry::new);

// ============================================================================
// Reconciliation Metrics
// ============================================================================

/// Total number of reconciliations by resource type and status
///
/// Labels:
/// - `resource_type`: Kind of resource (e.g., `DNSZone`, `DNSRecord`)
/// - `status`: Outcome (`success`, `error`)
pub static RECONCILIATION_TOTAL: LazyLock<CounterVec> = LazyLock::new(|| {
    let opts = Opts::new(
        format!("{METRICS_NAMESPACE}_reconciliations_total"),
        "Total number of reconciliations by resource type and status",
    );
    let counter = CounterVec::new(opts, &["resource_type", "status"]).unwrap();
    METRICS_REGISTRY
        .register(Box::new(counter.clone()))
        .unwrap();
    counter
});

/// Duration of reconciliations in seconds
///
/// Labels:
/// - `resource_type`: Kind of resource
pub static RECONCILIATION_DURATION_SECONDS: LazyLock<HistogramVec> = LazyLock::new(|| {
    let opts = HistogramOpts::new(
        format!("{METRICS_NAMESPACE}_reconciliation_duration_seconds"),
        "Duration of reconciliations in seconds by resource type",
    )
    .buckets(vec![0.001, 0.01, 0.1, 0.5, 1.0, 2.0, 5.0, 10.0, 30.0, 60.0]);
    let histogram = HistogramVec::new(opts, &["resource_type"]).unwrap();
    METRICS_REGISTRY
        .register(Box::new(histogram.clone()))
        .unwrap();
    histogram
});

/// Total number of reconciliation errors by resource type and error type
///
/// Labels:
/// - `resource_type`: Kind of resource
/// - `error_type`: `actuator`, `conflict`, `not_found` or `store`
pub static ERRORS_TOTAL: LazyLock<CounterVec> = LazyLock::new(|| {
    let opts = Opts::new(
        format!("{METRICS_NAMESPACE}_errors_total"),
        "Total number of reconciliation errors by resource type and error type",
    );
    let counter = CounterVec::new(opts, &["resource_type", "error_type"]).unwrap();
    METRICS_REGISTRY
        .register(Box::new(counter.clone()))
        .unwrap();
    counter
});

// ============================================================================
// Actuator Metrics
// ============================================================================

/// Total number of actuator calls
///
/// Labels:
/// - `resource_type`: Kind of resource
/// - `operation`: `create`, `update`, `delete` or `exists`
/// - `status`: `success` or `error`
pub static ACTUATOR_OPERATIONS_TOTAL: LazyLock<CounterVec> = LazyLock::new(|| {
    let opts = Opts::new(
        format!("{METRICS_NAMESPACE}_actuator_operations_total"),
        "Total number of actuator calls by resource type, operation and status",
    );
    let counter = CounterVec::new(opts, &["resource_type", "operation", "status"]).unwrap();
    METRICS_REGISTRY
        .register(Box::new(counter.clone()))
        .unwrap();
    counter
});

// ============================================================================
// Finalizer Metrics
// ============================================================================

/// Total number of finalizer updates persisted
///
/// Labels:
/// - `resource_type`: Kind of resource
/// - `operation`: `add` or `remove`
pub static FINALIZER_OPERATIONS_TOTAL: LazyLock<CounterVec> = LazyLock::new(|| {
    let opts = Opts::new(
        format!("{METRICS_NAMESPACE}_finalizer_operations_total"),
        "Total number of finalizers added and removed by resource type",
    );
    let counter = CounterVec::new(opts, &["resource_type", "operation"]).unwrap();
    METRICS_REGISTRY
        .register(Box::new(counter.clone()))
        .unwrap();
    counter
});

// ============================================================================
// Helper Functions
// ============================================================================

/// Record a successful reconciliation
///
/// # Arguments
/// * `resource_type` - The kind of resource reconciled (e.g., `DNSZone`)
/// * `duration` - Duration of the reconciliation
pub fn record_reconciliation_success(resource_type: &str, duration: Duration) {
    RECONCILIATION_TOTAL
        .with_label_values(&[resource_type, "success"])
        .inc();
    RECONCILIATION_DURATION_SECONDS
        .with_label_values(&[resource_type])
        .observe(duration.as_secs_f64());
}

/// Record a failed reconciliation
///
/// # Arguments
/// * `resource_type` - The kind of resource reconciled
/// * `error_type` - Error label from `ReconcileError::metric_label`
/// * `duration` - Duration of the reconciliation before failure
pub fn record_reconciliation_error(resource_type: &str, error_type: &str, duration: Duration) {
    RECONCILIATION_TOTAL
        .with_label_values(&[resource_type, "error"])
        .inc();
    ERRORS_TOTAL
        .with_label_values(&[resource_type, error_type])
        .inc();
    RECONCILIATION_DURATION_SECONDS
        .with_label_values(&[resource_type])
        .observe(duration.as_secs_f64());
}

/// Record an actuator call
pub fn record_actuator_operation(resource_type: &str, operation: &str, success: bool) {
    let status = if success { "success" } else { "error" };
    ACTUATOR_OPERATIONS_TOTAL
        .with_label_values(&[resource_type, operation, status])
        .inc();
}

/// Record a persisted finalizer change
pub fn record_finalizer_operation(resource_type: &str, operation: &str) {
    FINALIZER_OPERATIONS_TOTAL
        .with_label_values(&[resource_type, operation])
        .inc();
}

/// Gather all metrics in Prometheus text format.
///
/// # Errors
///
/// Returns an error if encoding fails.
pub fn gather_metrics() -> Result<String, prometheus::Error> {
    let encoder = TextEncoder::new();
    let metric_families = METRICS_REGISTRY.gather();
    let mut buffer = Vec::new();
    encoder.encode(&metric_families, &mut buffer)?;
    String::from_utf8(buffer).map_err(|e| prometheus::Error::Msg(format!("UTF-8 error: {e}")))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_record_reconciliation_success() {
        let resource_type = "TestResource";
        let duration = Duration::from_millis(500);

        record_reconciliation_success(resource_type, duration);

        let counter = RECONCILIATION_TOTAL.with_label_values(&[resource_type, "success"]);
        assert!(counter.get() > 0.0);

        let histogram = RECONCILIATION_DURATION_SECONDS.with_label_values(&[resource_type]);
        assert!(histogram.get_sample_count() > 0);
    }

    #[test]
    fn test_record_reconciliation_error() {
        let resource_type = "TestResourceError";

        record_reconciliation_error(resource_type, "actuator", Duration::from_millis(250));

        let counter = RECONCILIATION_TOTAL.with_label_values(&[resource_type, "error"]);
        assert!(counter.get() > 0.0);

        let errors = ERRORS_TOTAL.with_label_values(&[resource_type, "actuator"]);
        assert!(errors.get() > 0.0);
    }

    #[test]
    fn test_record_actuator_operation() {
        let resource_type = "TestActuator";

        record_actuator_operation(resource_type, "delete", false);
        record_actuator_operation(resource_type, "delete", true);
        record_actuator_operation(resource_type, "delete", true);

        let failed = ACTUATOR_OPERATIONS_TOTAL.with_label_values(&[resource_type, "delete", "error"]);
        let succeeded =
            ACTUATOR_OPERATIONS_TOTAL.with_label_values(&[resource_type, "delete", "success"]);
        assert!(failed.get() >= 1.0);
        assert!(succeeded.get() >= 2.0);
    }

    #[test]
    fn test_gather_metrics() {
        record_reconciliation_success("GatherTest", Duration::from_millis(100));
        record_finalizer_operation("GatherTest", "add");

        let result = gather_metrics();
        assert!(result.is_ok(), "Gathering metrics should succeed");

        let metrics_text = result.unwrap();
        assert!(
            metrics_text.contains("cloudkit_openshift_io"),
            "Metrics should contain namespace prefix"
        );
        assert!(
            metrics_text.contains("reconciliations_total"),
            "Metrics should contain reconciliation counter"
        );
        assert!(
            metrics_text.contains("finalizer_operations_total"),
            "Metrics should contain finalizer counter"
        );
    }
}
