// Copyright (c) 2025 Erick Bourgeois, firestoned
// SPDX-License-Identifier: MIT

//! Generic controller wiring on top of `kube::runtime`.
//!
//! The kube-runtime [`Controller`] is the trigger mechanism: it watches a
//! resource kind and schedules one reconciliation per changed object, never
//! running two passes for the same object at once. Each pass re-loads the
//! object through [`KubeStore`] and runs the [`Reconciler`] state machine.

use crate::actuator::Actuator;
use crate::constants::{DEFAULT_ERROR_REQUEUE_SECS, DEFAULT_RESYNC_INTERVAL_SECS};
use crate::crd::{DNSRecord, DNSZone};
use crate::errors::{ReconcileError, StoreError};
use crate::metrics;
use crate::reconcilers::{DNSRecordReconciler, DNSZoneReconciler, Reconciler};
use crate::resource::{ManagedResource, ResourceKey};
use crate::store::{KubeStore, ResourceStore};
use anyhow::Result;
use futures::StreamExt;
use kube::api::Api;
use kube::runtime::controller::Action;
use kube::runtime::watcher::Config as WatcherConfig;
use kube::runtime::Controller;
use kube::Client;
use std::sync::Arc;
use std::time::{Duration, Instant};
use tracing::{debug, error, info};

/// Runtime settings shared by all controllers.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct ControllerConfig {
    /// Watch a single namespace instead of the whole cluster
    pub namespace: Option<String>,
    /// Requeue converged resources after this long; `None` waits for changes
    pub resync_interval: Option<Duration>,
    /// Requeue failed resources after this long
    pub error_requeue: Duration,
}

impl Default for ControllerConfig {
    fn default() -> Self {
        Self {
            namespace: None,
            resync_interval: Some(Duration::from_secs(DEFAULT_RESYNC_INTERVAL_SECS)),
            error_requeue: Duration::from_secs(DEFAULT_ERROR_REQUEUE_SECS),
        }
    }
}

/// Reconciler with a type-erased actuator and store.
pub type DynReconciler<R> = Reconciler<R, dyn Actuator<R>, dyn ResourceStore<R>>;

struct Context<R: ManagedResource> {
    reconciler: DynReconciler<R>,
    config: ControllerConfig,
}

/// Error policy for all controllers.
///
/// Returns an action to requeue the resource after a delay when reconciliation fails.
#[allow(clippy::needless_pass_by_value)] // Signature required by kube::runtime::Controller
fn error_policy<R: ManagedResource>(
    resource: Arc<R>,
    err: &ReconcileError,
    ctx: Arc<Context<R>>,
) -> Action {
    let key = ResourceKey::from_resource(resource.as_ref())
        .map_or_else(|| resource.name_any(), |k| k.to_string());
    error!(
        kind = R::KIND,
        key = %key,
        retryable = err.is_retryable(),
        error = %err,
        "Reconciliation error - will retry in {}s",
        ctx.config.error_requeue.as_secs()
    );
    Action::requeue(ctx.config.error_requeue)
}

/// Reconcile wrapper: resolve the key, run one pass, record metrics.
async fn reconcile_wrapper<R: ManagedResource>(
    resource: Arc<R>,
    ctx: Arc<Context<R>>,
) -> Result<Action, ReconcileError> {
    let start = Instant::now();
    let key = ResourceKey::from_resource(resource.as_ref())
        .ok_or(StoreError::MissingMetadata { kind: R::KIND })?;

    let result = ctx.reconciler.reconcile(&key).await;
    let duration = start.elapsed();

    match result {
        Ok(outcome) => {
            metrics::record_reconciliation_success(R::KIND, duration);
            debug!(kind = R::KIND, key = %key, outcome = %outcome, "Reconciled");
            Ok(outcome
                .requeue_after(ctx.config.resync_interval)
                .map_or_else(Action::await_change, Action::requeue))
        }
        Err(e) => {
            metrics::record_reconciliation_error(R::KIND, e.metric_label(), duration);
            Err(e)
        }
    }
}

/// Run a controller for resources of kind `R` until the watch stream ends.
///
/// # Errors
///
/// Returns an error if the controller cannot be started.
pub async fn run_controller<R: ManagedResource>(
    client: Client,
    reconciler: DynReconciler<R>,
    config: ControllerConfig,
) -> Result<()> {
    info!("Starting {} controller", R::KIND);

    let api: Api<R> = match &config.namespace {
        Some(namespace) => {
            debug!("Watching {} in namespace {}", R::KIND, namespace);
            Api::namespaced(client, namespace)
        }
        None => {
            debug!("Watching {} cluster-wide", R::KIND);
            Api::all(client)
        }
    };

    let ctx = Arc::new(Context { reconciler, config });

    Controller::new(api, WatcherConfig::default())
        .run(reconcile_wrapper::<R>, error_policy::<R>, ctx)
        .for_each(|_| futures::future::ready(()))
        .await;

    Ok(())
}

/// Run the `DNSZone` controller against the Kubernetes API.
///
/// # Errors
///
/// Returns an error if the controller cannot be started.
pub async fn run_dnszone_controller(
    client: Client,
    actuator: Arc<dyn Actuator<DNSZone>>,
    config: ControllerConfig,
) -> Result<()> {
    let store: Arc<dyn ResourceStore<DNSZone>> =
        Arc::new(KubeStore::<DNSZone>::new(client.clone()));
    run_controller(client, DNSZoneReconciler::new(store, actuator), config).await
}

/// Run the `DNSRecord` controller against the Kubernetes API.
///
/// # Errors
///
/// Returns an error if the controller cannot be started.
pub async fn run_dnsrecord_controller(
    client: Client,
    actuator: Arc<dyn Actuator<DNSRecord>>,
    config: ControllerConfig,
) -> Result<()> {
    let store: Arc<dyn ResourceStore<DNSRecord>> =
        Arc::new(KubeStore::<DNSRecord>::new(client.clone()));
    run_controller(client, DNSRecordReconciler::new(store, actuator), config).await
}

#[cfg(test)]
#[path = "controller_tests.rs"]
mod controller_tests;
