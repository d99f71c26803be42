// Copyright (c) 2025 Erick Bourgeois, firestoned
// SPDX-License-Identifier: MIT

//! Unit tests for `resource.rs`

#[cfg(test)]
mod tests {
    use crate::crd::{DNSRecord, DNSRecordSpec, DNSRecordType, DNSZone, DNSZoneSpec};
    use crate::resource::{ManagedResource, ResourceKey};

    fn zone() -> DNSZone {
        DNSZone::new(
            "example-com",
            DNSZoneSpec {
                zone_name: "example.com".into(),
                provider_spec: None,
            },
        )
    }

    #[test]
    fn test_key_display() {
        let key = ResourceKey::new("dns", "www");
        assert_eq!(key.to_string(), "dns/www");
    }

    #[test]
    fn test_key_from_resource() {
        let mut zone = zone();
        assert_eq!(ResourceKey::from_resource(&zone), None, "namespace is required");

        zone.metadata.namespace = Some("dns".into());
        assert_eq!(
            ResourceKey::from_resource(&zone),
            Some(ResourceKey::new("dns", "example-com"))
        );
    }

    #[test]
    fn test_keys_order_by_namespace_then_name() {
        let mut keys = vec![
            ResourceKey::new("b", "a"),
            ResourceKey::new("a", "z"),
            ResourceKey::new("a", "b"),
        ];
        keys.sort();
        assert_eq!(
            keys,
            vec![
                ResourceKey::new("a", "b"),
                ResourceKey::new("a", "z"),
                ResourceKey::new("b", "a"),
            ]
        );
    }

    #[test]
    fn test_zone_external_name() {
        assert_eq!(zone().external_name(), "example.com");
    }

    #[test]
    fn test_record_external_name() {
        let record = DNSRecord::new(
            "mail",
            DNSRecordSpec {
                zone_name: "example.com".into(),
                record_name: "mail".into(),
                record_type: DNSRecordType::Mx,
                value: None,
                provider_spec: None,
            },
        );
        assert_eq!(record.external_name(), "mail.example.com/MX");
    }

    #[test]
    fn test_kind_and_finalizer() {
        assert_eq!(DNSZone::KIND, "DNSZone");
        assert_eq!(DNSZone::FINALIZER, "dnszone.cloudkit.openshift.io");
        assert_eq!(DNSRecord::KIND, "DNSRecord");
        assert_eq!(DNSRecord::FINALIZER, "dnsrecord.cloudkit.openshift.io");
    }
}
