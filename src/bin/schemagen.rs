// Copyright (c) 2025 Erick Bourgeois, firestoned
// SPDX-License-Identifier: MIT

//! Solver config JSON Schema generator
//!
//! Generates the JSON Schema of the Issuer `config` block from the Rust types
//! in src/provider_config.rs, so documentation and Helm values validation stay
//! in sync with the code.
//!
//! Usage:
//!   cargo run --bin schemagen
//!
//! The schema is written to deploy/schema/solver-config.schema.json.

use cert_manager_webhook_wedos::provider_config::WedosProviderConfig;
use std::fs;
use std::path::Path;

fn main() -> Result<(), Box<dyn std::error::Error>> {
    let output_dir = Path::new("deploy/schema");

    // Ensure output directory exists
    fs::create_dir_all(output_dir)?;

    println!("Generating solver config schema from src/provider_config.rs...");

    let schema = schemars::schema_for!(WedosProviderConfig);
    let json = serde_json::to_string_pretty(&schema)?;

    let output_path = output_dir.join("solver-config.schema.json");
    fs::write(&output_path, format!("{json}\n"))?;

    println!("  ✓ Generated {}", output_path.display());

    Ok(())
}
