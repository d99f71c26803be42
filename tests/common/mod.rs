// Copyright (c) 2025 Erick Bourgeois, firestoned
// SPDX-License-Identifier: MIT

//! Common test utilities for integration tests

#![allow(dead_code)]

use cloudkit::actuator::Actuator;
use cloudkit::crd::{DNSRecord, DNSRecordSpec, DNSRecordType, DNSZone, DNSZoneSpec};
use cloudkit::errors::ReconcileError;
use cloudkit::reconcilers::{Outcome, Reconciler};
use cloudkit::resource::{ManagedResource, ResourceKey};
use cloudkit::store::MemoryStore;
use kube::api::{Api, DeleteParams, PostParams};
use kube::client::Client;
use serde_json::json;
use tokio::sync::broadcast::{self, error::TryRecvError};

pub const TEST_NAMESPACE: &str = "dns";

/// Get a Kubernetes client or skip the test if not in a cluster
pub async fn get_kube_client_or_skip() -> Option<Client> {
    match Client::try_default().await {
        Ok(client) => Some(client),
        Err(e) => {
            eprintln!("Skipping integration test: not running in Kubernetes cluster: {e}");
            None
        }
    }
}

/// Create a test namespace
pub async fn create_test_namespace(
    client: &Client,
    name: &str,
) -> Result<(), Box<dyn std::error::Error>> {
    let namespaces: Api<k8s_openapi::api::core::v1::Namespace> = Api::all(client.clone());

    let ns = serde_json::from_value(json!({
        "apiVersion": "v1",
        "kind": "Namespace",
        "metadata": {
            "name": name,
            "labels": {
                "test": "integration",
                "managed-by": "cloudkit-test"
            }
        }
    }))?;

    match namespaces.create(&PostParams::default(), &ns).await {
        Ok(_) => {
            println!("Created test namespace: {name}");
            Ok(())
        }
        Err(kube::Error::Api(ae)) if ae.code == 409 => {
            println!("Test namespace already exists: {name}");
            Ok(())
        }
        Err(e) => Err(Box::new(e)),
    }
}

/// Cleanup test namespace
pub async fn cleanup_test_namespace(
    client: &Client,
    name: &str,
) -> Result<(), Box<dyn std::error::Error>> {
    let namespaces: Api<k8s_openapi::api::core::v1::Namespace> = Api::all(client.clone());

    match namespaces.delete(name, &DeleteParams::default()).await {
        Ok(_) => {
            println!("Deleted test namespace: {name}");
            Ok(())
        }
        Err(kube::Error::Api(ae)) if ae.code == 404 => {
            println!("Test namespace already deleted: {name}");
            Ok(())
        }
        Err(e) => Err(Box::new(e)),
    }
}

/// Build a `DNSZone` in `namespace`
pub fn zone(namespace: &str, name: &str, zone_name: &str) -> DNSZone {
    let mut zone = DNSZone::new(
        name,
        DNSZoneSpec {
            zone_name: zone_name.into(),
            provider_spec: Some(json!({"region": "us-east-1"})),
        },
    );
    zone.metadata.namespace = Some(namespace.into());
    zone
}

/// Build a `DNSRecord` in `namespace`
pub fn record(namespace: &str, name: &str, record_type: DNSRecordType, value: &str) -> DNSRecord {
    let mut record = DNSRecord::new(
        name,
        DNSRecordSpec {
            zone_name: "example.com".into(),
            record_name: name.into(),
            record_type,
            value: Some(value.into()),
            provider_spec: None,
        },
    );
    record.metadata.namespace = Some(namespace.into());
    record
}

/// Reconcile every key announced on `feed` until no more changes arrive.
///
/// Each pass may write to the store, which announces the key again, so this
/// plays the watch-driven controller loop deterministically. Errors stop the
/// loop and are returned together with the outcomes seen so far.
pub async fn drain<R, A>(
    reconciler: &Reconciler<R, A, MemoryStore<R>>,
    feed: &mut broadcast::Receiver<ResourceKey>,
) -> (Vec<(ResourceKey, Outcome)>, Option<ReconcileError>)
where
    R: ManagedResource,
    A: Actuator<R> + ?Sized,
{
    let mut outcomes = Vec::new();
    loop {
        let key = match feed.try_recv() {
            Ok(key) => key,
            Err(TryRecvError::Empty | TryRecvError::Closed) => return (outcomes, None),
            Err(TryRecvError::Lagged(n)) => panic!("feed lagged by {n} events"),
        };
        match reconciler.reconcile(&key).await {
            Ok(outcome) => outcomes.push((key, outcome)),
            Err(e) => return (outcomes, Some(e)),
        }
    }
}
