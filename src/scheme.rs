// Copyright (c) 2025 Erick Bourgeois, firestoned
// SPDX-License-Identifier: MIT

//! Registry of the custom resource kinds served by this controller.
//!
//! Kinds are registered explicitly, once, at process startup:
//!
//! ```rust
//! use cloudkit::scheme::{add_to_scheme, Scheme};
//!
//! let mut scheme = Scheme::new();
//! add_to_scheme(&mut scheme);
//! assert_eq!(
//!     scheme.names(),
//!     vec!["dnsrecords.cloudkit.openshift.io", "dnszones.cloudkit.openshift.io"]
//! );
//! ```
//!
//! The scheme renders the CRD manifests (see the `crdgen` binary) and can
//! install them into a cluster with server-side apply.

use crate::constants::FIELD_MANAGER;
use crate::crd::{DNSRecord, DNSZone};
use crate::errors::SchemeError;
use k8s_openapi::apiextensions_apiserver::pkg::apis::apiextensions::v1::CustomResourceDefinition;
use kube::api::{Patch, PatchParams};
use kube::{Api, Client, CustomResourceExt};
use std::collections::BTreeMap;
use std::fs;
use std::path::{Path, PathBuf};
use tracing::info;

const COPYRIGHT_HEADER: &str = "# Copyright (c) 2025 Erick Bourgeois, firestoned
# SPDX-License-Identifier: MIT
#
# This file is AUTO-GENERATED from src/crd.rs
# DO NOT EDIT MANUALLY - Run `cargo run --bin crdgen` to regenerate
#
";

struct Registration {
    plural: String,
    crd: CustomResourceDefinition,
}

/// Set of registered custom resource definitions, keyed by CRD name.
#[derive(Default)]
pub struct Scheme {
    kinds: BTreeMap<&'static str, Registration>,
}

impl Scheme {
    /// Create an empty scheme.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Register a custom resource kind. Registering a kind twice is a no-op.
    pub fn register<K: CustomResourceExt>(&mut self) -> &mut Self {
        self.kinds.entry(K::crd_name()).or_insert_with(|| Registration {
            plural: K::api_resource().plural,
            crd: K::crd(),
        });
        self
    }

    /// Names of the registered CRDs, sorted.
    #[must_use]
    pub fn names(&self) -> Vec<&'static str> {
        self.kinds.keys().copied().collect()
    }

    /// The registered CRDs, sorted by name.
    pub fn crds(&self) -> impl Iterator<Item = &CustomResourceDefinition> {
        self.kinds.values().map(|r| &r.crd)
    }

    /// Render all CRDs as a multi-document YAML stream.
    ///
    /// # Errors
    ///
    /// Returns [`SchemeError::Serialize`] if a CRD cannot be rendered.
    pub fn to_yaml(&self) -> Result<String, SchemeError> {
        let documents = self
            .kinds
            .iter()
            .map(|(name, registration)| render(name, &registration.crd))
            .collect::<Result<Vec<_>, _>>()?;
        Ok(documents.join("---\n"))
    }

    /// Write one `<plural>.crd.yaml` file per CRD into `output_dir`.
    ///
    /// The directory is created if needed. Returns the written paths.
    ///
    /// # Errors
    ///
    /// Returns [`SchemeError::Io`] if the directory or a file cannot be
    /// written, or [`SchemeError::Serialize`] if a CRD cannot be rendered.
    pub fn write_yaml(&self, output_dir: &Path) -> Result<Vec<PathBuf>, SchemeError> {
        fs::create_dir_all(output_dir).map_err(|source| SchemeError::Io {
            path: output_dir.display().to_string(),
            source,
        })?;

        let mut written = Vec::with_capacity(self.kinds.len());
        for (name, registration) in &self.kinds {
            let content = format!("{COPYRIGHT_HEADER}{}", render(name, &registration.crd)?);
            let path = output_dir.join(format!("{}.crd.yaml", registration.plural));
            fs::write(&path, content).map_err(|source| SchemeError::Io {
                path: path.display().to_string(),
                source,
            })?;
            written.push(path);
        }
        Ok(written)
    }

    /// Install or update every CRD in the cluster using server-side apply.
    ///
    /// # Errors
    ///
    /// Returns [`SchemeError::Install`] for the first CRD the API server rejects.
    pub async fn install(&self, client: &Client) -> Result<(), SchemeError> {
        let api: Api<CustomResourceDefinition> = Api::all(client.clone());
        let params = PatchParams::apply(FIELD_MANAGER).force();

        for (name, registration) in &self.kinds {
            info!("Installing CRD {}", name);
            api.patch(name, &params, &Patch::Apply(&registration.crd))
                .await
                .map_err(|source| SchemeError::Install {
                    name: (*name).to_string(),
                    source,
                })?;
        }

        info!("All CRDs installed/updated");
        Ok(())
    }
}

fn render(name: &str, crd: &CustomResourceDefinition) -> Result<String, SchemeError> {
    serde_yaml::to_string(crd).map_err(|source| SchemeError::Serialize {
        name: name.to_string(),
        source,
    })
}

/// Register every kind reconciled by this controller.
pub fn add_to_scheme(scheme: &mut Scheme) {
    scheme.register::<DNSZone>().register::<DNSRecord>();
}

#[cfg(test)]
#[path = "scheme_tests.rs"]
mod scheme_tests;
