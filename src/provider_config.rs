// Copyright (c) 2025 Erick Bourgeois, firestoned
// SPDX-License-Identifier: MIT

//! Solver configuration attached to an Issuer or `ClusterIssuer`.
//!
//! The `config` block of a webhook solver is opaque to cert-manager and is
//! forwarded with every challenge. For this solver it looks like:
//!
//! ```yaml
//! solvers:
//!   - dns01:
//!       webhook:
//!         groupName: acme.example.com
//!         solverName: wedos
//!         config:
//!           apiUsername: admin@example.com
//!           apiKeySecretRef:
//!             name: wedos-credentials
//!             key: password
//! ```
//!
//! # Example
//!
//! ```rust
//! use cert_manager_webhook_wedos::provider_config::load_config;
//!
//! let raw = serde_json::json!({
//!     "apiUsername": "bob",
//!     "apiKeySecretRef": { "name": "wedos-cred", "key": "password" }
//! });
//! let config = load_config(Some(&raw)).unwrap();
//! assert!(config.validate().is_ok());
//! ```

use crate::errors::SolverError;
use schemars::JsonSchema;
use serde::{Deserialize, Serialize};

/// Reference to a key within a Secret in the challenge's namespace.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize, JsonSchema)]
#[serde(default)]
pub struct SecretKeyRef {
    /// Name of the Secret
    pub name: String,
    /// Key within the Secret's `data`
    pub key: String,
}

/// WEDOS solver configuration.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize, JsonSchema)]
#[serde(rename_all = "camelCase", default)]
pub struct WedosProviderConfig {
    /// WEDOS account login (WAPI user)
    pub api_username: String,

    /// Secret key holding the WAPI password
    pub api_key_secret_ref: SecretKeyRef,
}

impl WedosProviderConfig {
    /// Check that a credential secret is referenced.
    ///
    /// Only the secret name is required; an empty username or key is passed
    /// through and left for the secret lookup or WAPI to reject.
    ///
    /// # Errors
    ///
    /// Returns [`SolverError::MissingSecretRef`] if `apiKeySecretRef.name` is empty.
    pub fn validate(&self) -> Result<(), SolverError> {
        if self.api_key_secret_ref.name.is_empty() {
            return Err(SolverError::MissingSecretRef);
        }
        Ok(())
    }
}

/// Decode the raw Issuer config.
///
/// A missing or `null` config yields the zero value.
///
/// # Errors
///
/// Returns [`SolverError::ConfigDecode`] if the JSON does not match [`WedosProviderConfig`].
pub fn load_config(raw: Option<&serde_json::Value>) -> Result<WedosProviderConfig, SolverError> {
    match raw {
        None | Some(serde_json::Value::Null) => Ok(WedosProviderConfig::default()),
        Some(value) => {
            WedosProviderConfig::deserialize(value).map_err(SolverError::ConfigDecode)
        }
    }
}
