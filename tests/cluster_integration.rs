// Copyright (c) 2025 Erick Bourgeois, firestoned
// SPDX-License-Identifier: MIT

//! Integration tests against a live Kubernetes cluster.
//!
//! The CRDs are installed with server-side apply and resources are driven
//! through [`KubeStore`] with the in-memory actuator.
//!
//! Run with: cargo test --test cluster_integration -- --ignored

mod common;

use cloudkit::actuator::InMemoryActuator;
use cloudkit::constants::DNS_ZONE_FINALIZER;
use cloudkit::crd::DNSZone;
use cloudkit::reconcilers::{Outcome, Reconciler};
use cloudkit::resource::ResourceKey;
use cloudkit::scheme::{add_to_scheme, Scheme};
use cloudkit::store::{KubeStore, ResourceStore};
use common::{cleanup_test_namespace, create_test_namespace, get_kube_client_or_skip, zone};
use kube::api::{Api, DeleteParams, PostParams};
use kube::ResourceExt;
use std::sync::Arc;
use std::time::Duration;

const NAMESPACE: &str = "cloudkit-integration";

#[tokio::test]
#[ignore = "requires a Kubernetes cluster"]
async fn test_zone_lifecycle_in_cluster() {
    let Some(client) = get_kube_client_or_skip().await else {
        return;
    };

    let mut scheme = Scheme::new();
    add_to_scheme(&mut scheme);
    scheme.install(&client).await.expect("CRDs should install");
    // Give the API server a moment to serve the new kinds.
    tokio::time::sleep(Duration::from_secs(2)).await;

    create_test_namespace(&client, NAMESPACE)
        .await
        .expect("namespace should be created");

    let api: Api<DNSZone> = Api::namespaced(client.clone(), NAMESPACE);
    api.create(
        &PostParams::default(),
        &zone(NAMESPACE, "integration-example-com", "integration.example.com"),
    )
    .await
    .expect("zone should be created");

    let store = Arc::new(KubeStore::<DNSZone>::new(client.clone()));
    let actuator = Arc::new(InMemoryActuator::<DNSZone>::new());
    let reconciler = Reconciler::new(Arc::clone(&store), Arc::clone(&actuator));
    let key = ResourceKey::new(NAMESPACE, "integration-example-com");

    assert_eq!(
        reconciler.reconcile(&key).await.unwrap(),
        Outcome::FinalizerAdded
    );
    let stored = store.get(&key).await.unwrap();
    assert!(stored.finalizers().contains(&DNS_ZONE_FINALIZER.to_string()));

    assert_eq!(reconciler.reconcile(&key).await.unwrap(), Outcome::Created);
    assert!(actuator.contains("integration.example.com"));

    api.delete("integration-example-com", &DeleteParams::default())
        .await
        .expect("delete should be accepted");

    assert_eq!(reconciler.reconcile(&key).await.unwrap(), Outcome::Deleted);
    assert!(!actuator.contains("integration.example.com"));

    tokio::time::sleep(Duration::from_secs(1)).await;
    assert_eq!(reconciler.reconcile(&key).await.unwrap(), Outcome::NotFound);

    cleanup_test_namespace(&client, NAMESPACE)
        .await
        .expect("namespace should be cleaned up");
}

#[tokio::test]
#[ignore = "requires a Kubernetes cluster"]
async fn test_stale_update_conflicts_in_cluster() {
    let Some(client) = get_kube_client_or_skip().await else {
        return;
    };

    create_test_namespace(&client, NAMESPACE)
        .await
        .expect("namespace should be created");

    let api: Api<DNSZone> = Api::namespaced(client.clone(), NAMESPACE);
    let created = api
        .create(
            &PostParams::default(),
            &zone(NAMESPACE, "conflict-example-com", "conflict.example.com"),
        )
        .await
        .expect("zone should be created");

    let store = KubeStore::<DNSZone>::new(client.clone());
    store.update(&created).await.expect("first update succeeds");

    let err = store.update(&created).await.unwrap_err();
    assert!(err.is_conflict(), "stale resourceVersion must conflict: {err}");

    let missing = store
        .get(&ResourceKey::new(NAMESPACE, "does-not-exist"))
        .await
        .unwrap_err();
    assert!(missing.is_not_found());

    let _ = api
        .delete("conflict-example-com", &DeleteParams::default())
        .await;
    cleanup_test_namespace(&client, NAMESPACE)
        .await
        .expect("namespace should be cleaned up");
}
