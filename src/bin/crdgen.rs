// Copyright (c) 2025 Erick Bourgeois, firestoned
// SPDX-License-Identifier: MIT

//! CRD YAML Generator
//!
//! Generates Kubernetes CRD YAML files from the kinds registered by
//! `cloudkit::scheme::add_to_scheme`, so deploy/crds/ stays in sync with src/crd.rs.
//!
//! Usage:
//!   cargo run --bin crdgen [OUTPUT_DIR]
//!
//! Files are written to deploy/crds/ unless another directory is given.

use cloudkit::scheme::{add_to_scheme, Scheme};
use std::path::PathBuf;

fn main() -> Result<(), Box<dyn std::error::Error>> {
    let output_dir = std::env::args_os()
        .nth(1)
        .map_or_else(|| PathBuf::from("deploy/crds"), PathBuf::from);

    let mut scheme = Scheme::new();
    add_to_scheme(&mut scheme);

    println!("Generating CRD YAML files from src/crd.rs...");

    for path in scheme.write_yaml(&output_dir)? {
        println!("  ✓ Generated {}", path.display());
    }

    println!("✓ Successfully generated CRD YAML files in {}", output_dir.display());
    println!("\nNext steps:");
    println!("  1. Review the generated files");
    println!("  2. Deploy with: kubectl apply -f {}", output_dir.display());

    Ok(())
}
