// Copyright (c) 2025 Erick Bourgeois, firestoned
// SPDX-License-Identifier: MIT

//! Unit tests for `scheme.rs`

#[cfg(test)]
mod tests {
    use crate::crd::{DNSRecord, DNSZone};
    use crate::errors::SchemeError;
    use crate::scheme::{add_to_scheme, Scheme};
    use k8s_openapi::apiextensions_apiserver::pkg::apis::apiextensions::v1::CustomResourceDefinition;
    use std::fs;

    fn scheme() -> Scheme {
        let mut scheme = Scheme::new();
        add_to_scheme(&mut scheme);
        scheme
    }

    #[test]
    fn test_new_scheme_is_empty() {
        let scheme = Scheme::new();
        assert!(scheme.names().is_empty());
        assert_eq!(scheme.to_yaml().unwrap(), "");
    }

    #[test]
    fn test_add_to_scheme_registers_both_kinds() {
        assert_eq!(
            scheme().names(),
            vec![
                "dnsrecords.cloudkit.openshift.io",
                "dnszones.cloudkit.openshift.io"
            ]
        );
    }

    #[test]
    fn test_register_twice_is_noop() {
        let mut scheme = scheme();
        scheme.register::<DNSZone>().register::<DNSRecord>();
        assert_eq!(scheme.names().len(), 2);
        assert_eq!(scheme.crds().count(), 2);
    }

    #[test]
    fn test_to_yaml_renders_every_crd() {
        let yaml = scheme().to_yaml().unwrap();

        let documents = yaml.split("---\n").collect::<Vec<_>>();
        assert_eq!(documents.len(), 2);

        let kinds = documents
            .iter()
            .map(|doc| {
                let crd: CustomResourceDefinition = serde_yaml::from_str(doc).unwrap();
                crd.spec.names.kind
            })
            .collect::<Vec<_>>();
        assert_eq!(kinds, vec!["DNSRecord", "DNSZone"]);
    }

    #[test]
    fn test_write_yaml_creates_one_file_per_crd() {
        let dir = tempfile::tempdir().unwrap();
        let output = dir.path().join("deploy").join("crds");

        let written = scheme().write_yaml(&output).unwrap();

        assert_eq!(
            written,
            vec![
                output.join("dnsrecords.crd.yaml"),
                output.join("dnszones.crd.yaml")
            ]
        );
        let content = fs::read_to_string(output.join("dnszones.crd.yaml")).unwrap();
        assert!(content.starts_with("# Copyright (c) 2025 Erick Bourgeois, firestoned"));
        assert!(content.contains("DO NOT EDIT MANUALLY"));

        let crd: CustomResourceDefinition = serde_yaml::from_str(&content).unwrap();
        assert_eq!(crd.metadata.name.as_deref(), Some("dnszones.cloudkit.openshift.io"));
        assert_eq!(crd.spec.group, "cloudkit.openshift.io");
    }

    #[test]
    fn test_write_yaml_reports_unwritable_directory() {
        let dir = tempfile::tempdir().unwrap();
        let blocker = dir.path().join("not-a-dir");
        fs::write(&blocker, "").unwrap();

        let err = scheme().write_yaml(&blocker.join("crds")).unwrap_err();

        assert!(matches!(err, SchemeError::Io { .. }));
    }
}
