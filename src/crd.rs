// Copyright (c) 2025 Erick Bourgeois, firestoned
// SPDX-License-Identifier: MIT

//! Custom Resource Definitions (CRDs) for DNS management.
//!
//! This module defines the Kubernetes Custom Resource Definitions reconciled by
//! the cloudkit DNS controller.
//!
//! # Resource Types
//!
//! - [`DNSZone`] - A DNS zone hosted by an external DNS provider
//! - [`DNSRecord`] - A single DNS record inside a zone
//!
//! Both kinds carry an opaque `providerSpec` in their spec and an opaque
//! `providerStatus` in their status. The controller never interprets either;
//! they are passed through to the actuator that talks to the provider.
//!
//! # Example: Creating a DNS Record
//!
//! ```rust,no_run
//! use cloudkit::crd::{DNSRecordSpec, DNSRecordType};
//!
//! let spec = DNSRecordSpec {
//!     zone_name: "example.com".to_string(),
//!     record_name: "www".to_string(),
//!     record_type: DNSRecordType::A,
//!     value: Some("192.0.2.1".to_string()),
//!     provider_spec: None,
//! };
//! ```

use kube::CustomResource;
use schemars::JsonSchema;
use serde::{Deserialize, Serialize};
use std::fmt;

/// Schema for opaque provider payloads.
///
/// Structural schemas reject free-form objects unless they are explicitly
/// marked with `x-kubernetes-preserve-unknown-fields`.
fn preserve_unknown_fields(_: &mut schemars::SchemaGenerator) -> schemars::Schema {
    schemars::json_schema!({
        "type": "object",
        "nullable": true,
        "x-kubernetes-preserve-unknown-fields": true
    })
}

/// `DNSZone` is a DNS zone managed in an external DNS provider.
///
/// # Example
///
/// ```yaml
/// apiVersion: cloudkit.openshift.io/v1alpha1
/// kind: DNSZone
/// metadata:
///   name: example-com
///   namespace: default
/// spec:
///   zoneName: example.com
///   providerSpec:
///     region: us-east-1
/// ```
#[derive(CustomResource, Clone, Debug, Serialize, Deserialize, JsonSchema)]
#[kube(
    group = "cloudkit.openshift.io",
    version = "v1alpha1",
    kind = "DNSZone",
    namespaced,
    shortname = "dz",
    doc = "DNSZone is a DNS zone hosted by an external DNS provider. The zone is created in the provider when the resource is created and removed from the provider before the resource is deleted."
)]
#[kube(status = "DNSZoneStatus")]
#[kube(printcolumn = r#"{"name":"Zone","type":"string","jsonPath":".spec.zoneName"}"#)]
#[serde(rename_all = "camelCase")]
pub struct DNSZoneSpec {
    /// DNS name of the zone (e.g., "example.com").
    pub zone_name: String,

    /// Provider-specific settings, passed unchanged to the actuator.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    #[schemars(schema_with = "preserve_unknown_fields")]
    pub provider_spec: Option<serde_json::Value>,
}

/// Observed state of a `DNSZone`.
#[derive(Clone, Debug, Serialize, Deserialize, Default, JsonSchema, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct DNSZoneStatus {
    /// Provider-specific status written back by the actuator.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    #[schemars(schema_with = "preserve_unknown_fields")]
    pub provider_status: Option<serde_json::Value>,
}

/// Type of a DNS record.
#[derive(Clone, Copy, Debug, Serialize, Deserialize, JsonSchema, PartialEq, Eq, Hash)]
pub enum DNSRecordType {
    A,
    #[serde(rename = "CNAME")]
    Cname,
    #[serde(rename = "MX")]
    Mx,
    #[serde(rename = "AAAA")]
    Aaaa,
    #[serde(rename = "TXT")]
    Txt,
    #[serde(rename = "PTR")]
    Ptr,
    #[serde(rename = "SRV")]
    Srv,
    #[serde(rename = "SPF")]
    Spf,
    #[serde(rename = "NAPTR")]
    Naptr,
    #[serde(rename = "CAA")]
    Caa,
    #[serde(rename = "NS")]
    Ns,
    #[serde(rename = "SOA")]
    Soa,
}

impl DNSRecordType {
    /// Wire name of the record type as used in zone files and provider APIs.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::A => "A",
            Self::Cname => "CNAME",
            Self::Mx => "MX",
            Self::Aaaa => "AAAA",
            Self::Txt => "TXT",
            Self::Ptr => "PTR",
            Self::Srv => "SRV",
            Self::Spf => "SPF",
            Self::Naptr => "NAPTR",
            Self::Caa => "CAA",
            Self::Ns => "NS",
            Self::Soa => "SOA",
        }
    }
}

impl fmt::Display for DNSRecordType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// `DNSRecord` is a single DNS record inside a provider-hosted zone.
///
/// # Example
///
/// ```yaml
/// apiVersion: cloudkit.openshift.io/v1alpha1
/// kind: DNSRecord
/// metadata:
///   name: www-example-com
///   namespace: default
/// spec:
///   zoneName: example.com
///   recordName: www
///   recordType: A
///   value: 192.0.2.1
/// ```
#[derive(CustomResource, Clone, Debug, Serialize, Deserialize, JsonSchema)]
#[kube(
    group = "cloudkit.openshift.io",
    version = "v1alpha1",
    kind = "DNSRecord",
    namespaced,
    shortname = "dr",
    doc = "DNSRecord is a DNS record in a zone hosted by an external DNS provider. The record is removed from the provider before the resource is deleted."
)]
#[kube(status = "DNSRecordStatus")]
#[kube(printcolumn = r#"{"name":"Zone","type":"string","jsonPath":".spec.zoneName"}"#)]
#[kube(printcolumn = r#"{"name":"Name","type":"string","jsonPath":".spec.recordName"}"#)]
#[kube(printcolumn = r#"{"name":"Type","type":"string","jsonPath":".spec.recordType"}"#)]
#[serde(rename_all = "camelCase")]
pub struct DNSRecordSpec {
    /// Name of the zone this record lives in.
    ///
    /// Depending on the provider this may not be enough to identify the zone,
    /// in which case additional information goes in `providerSpec`.
    pub zone_name: String,

    /// Name of the record. Must be a valid DNS name or wildcard.
    pub record_name: String,

    /// Type of the record.
    pub record_type: DNSRecordType,

    /// Value of the record. The format depends on the record type. If empty,
    /// the provider may populate it from the live record when one exists.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub value: Option<String>,

    /// Provider-specific settings, passed unchanged to the actuator.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    #[schemars(schema_with = "preserve_unknown_fields")]
    pub provider_spec: Option<serde_json::Value>,
}

/// Observed state of a `DNSRecord`.
#[derive(Clone, Debug, Serialize, Deserialize, Default, JsonSchema, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct DNSRecordStatus {
    /// Provider-specific status written back by the actuator.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    #[schemars(schema_with = "preserve_unknown_fields")]
    pub provider_status: Option<serde_json::Value>,
}

#[cfg(test)]
#[path = "crd_tests.rs"]
mod crd_tests;
