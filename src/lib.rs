// Copyright (c) 2025 Erick Bourgeois, firestoned
// SPDX-License-Identifier: MIT

#![allow(unexpected_cfgs)]

//! # cert-manager-webhook-wedos - DNS-01 solver for WEDOS
//!
//! A cert-manager webhook that answers ACME DNS-01 challenges by publishing
//! `_acme-challenge` TXT records through the WEDOS WAPI.
//!
//! ## Overview
//!
//! For every challenge cert-manager sends, the solver:
//!
//! 1. Decodes the Issuer's solver `config` ([`provider_config`])
//! 2. Reads the WAPI password from the referenced Kubernetes Secret
//! 3. Builds a WEDOS provider for that account ([`wedos`])
//! 4. Creates or removes the TXT row and commits the domain
//!
//! ## Modules
//!
//! - [`challenge`] - `ChallengePayload` wire types exchanged with cert-manager
//! - [`provider_config`] - Issuer config decoding and validation
//! - [`solver`] - The solver contract the server is generic over
//! - [`wedos_solver`] - The WEDOS solver
//! - [`wedos`] - WEDOS WAPI client and DNS provider
//! - [`server`] - Aggregated API HTTP server
//! - [`options`] - Process configuration
//! - [`metrics`] - Prometheus metrics
//!
//! ## Example
//!
//! ```rust
//! use cert_manager_webhook_wedos::provider_config::load_config;
//!
//! let raw = serde_json::json!({
//!     "apiUsername": "admin@example.com",
//!     "apiKeySecretRef": { "name": "wedos-credentials", "key": "password" }
//! });
//!
//! let config = load_config(Some(&raw)).unwrap();
//! assert_eq!(config.api_key_secret_ref.name, "wedos-credentials");
//! ```

pub mod challenge;
pub mod constants;
pub mod errors;
pub mod metrics;
pub mod options;
pub mod provider_config;
pub mod server;
pub mod solver;
pub mod wedos;
pub mod wedos_solver;

#[cfg(test)]
mod challenge_tests;
#[cfg(test)]
mod options_tests;
