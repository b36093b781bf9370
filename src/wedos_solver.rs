// Copyright (c) 2025 Erick Bourgeois, firestoned
// SPDX-License-Identifier: MIT

//! WEDOS implementation of [`Solver`].
//!
//! Every challenge is resolved from scratch: decode the Issuer config, read
//! the WAPI password from the referenced Secret in the challenge namespace,
//! build a [`WedosProvider`] and delegate. Nothing is cached between calls,
//! so rotated credentials take effect on the next challenge.

use crate::challenge::ChallengeRequest;
use crate::constants::{SECRET_FETCH_TIMEOUT_SECS, SOLVER_NAME};
use crate::errors::SolverError;
use crate::provider_config::load_config;
use crate::solver::Solver;
use crate::wedos::{WedosConfig, WedosProvider};
use async_trait::async_trait;
use k8s_openapi::api::core::v1::Secret;
use kube::{Api, Client};
use std::time::Duration;
use tokio::sync::watch;
use tracing::{debug, info};

/// Solver publishing DNS-01 records through WEDOS.
pub struct WedosSolver {
    /// Set by `initialize`
    client: Option<Client>,
    /// Template for per-challenge provider configs (endpoint, TTL, timeout)
    provider_defaults: WedosConfig,
    /// Deadline for the credential secret lookup
    secret_timeout: Duration,
}

impl WedosSolver {
    /// Create an uninitialized solver.
    ///
    /// Username and password of `provider_defaults` are overwritten per challenge.
    #[must_use]
    pub fn new(provider_defaults: WedosConfig) -> Self {
        Self {
            client: None,
            provider_defaults,
            secret_timeout: Duration::from_secs(SECRET_FETCH_TIMEOUT_SECS),
        }
    }

    /// Override the secret lookup deadline.
    #[must_use]
    pub fn with_secret_timeout(mut self, timeout: Duration) -> Self {
        self.secret_timeout = timeout;
        self
    }

    /// Deadline applied to the secret lookup.
    #[must_use]
    pub fn secret_timeout(&self) -> Duration {
        self.secret_timeout
    }

    /// Resolve the provider for one challenge.
    ///
    /// # Errors
    ///
    /// Returns an error if the config is malformed or incomplete, the secret
    /// cannot be read in time, the key is missing, or the provider cannot be built.
    pub async fn provider(&self, request: &ChallengeRequest) -> Result<WedosProvider, SolverError> {
        let config = load_config(request.config.as_ref())?;
        config.validate()?;

        let client = self.client.as_ref().ok_or(SolverError::NotInitialized)?;
        let namespace = &request.resource_namespace;
        let secret_ref = &config.api_key_secret_ref;

        debug!(
            namespace = %namespace,
            secret = %secret_ref.name,
            key = %secret_ref.key,
            "Fetching WEDOS credential secret"
        );

        let secret_api: Api<Secret> = Api::namespaced(client.clone(), namespace);
        let secret = tokio::time::timeout(self.secret_timeout, secret_api.get(&secret_ref.name))
            .await
            .map_err(|_| SolverError::SecretFetchTimeout {
                namespace: namespace.clone(),
                name: secret_ref.name.clone(),
                timeout: self.secret_timeout,
            })??;

        let bytes = secret
            .data
            .as_ref()
            .and_then(|data| data.get(&secret_ref.key))
            .ok_or_else(|| SolverError::MissingSecretKey {
                key: secret_ref.key.clone(),
                name: secret_ref.name.clone(),
                namespace: namespace.clone(),
            })?;

        let password =
            String::from_utf8(bytes.0.clone()).map_err(|_| SolverError::InvalidSecretEncoding {
                key: secret_ref.key.clone(),
                name: secret_ref.name.clone(),
                namespace: namespace.clone(),
            })?;

        let mut wedos_config = self.provider_defaults.clone();
        wedos_config.username = config.api_username;
        wedos_config.password = password;

        Ok(WedosProvider::new(wedos_config)?)
    }
}

#[async_trait]
impl Solver for WedosSolver {
    fn name(&self) -> &str {
        SOLVER_NAME
    }

    async fn initialize(
        &mut self,
        kube_config: kube::Config,
        _stop: watch::Receiver<bool>,
    ) -> Result<(), SolverError> {
        let client = Client::try_from(kube_config)?;
        self.client = Some(client);
        info!("WEDOS solver initialized");
        Ok(())
    }

    async fn present(&self, request: &ChallengeRequest) -> Result<(), SolverError> {
        info!(
            uid = %request.uid,
            dns_name = %request.dns_name,
            fqdn = %request.resolved_fqdn,
            zone = %request.resolved_zone,
            namespace = %request.resource_namespace,
            "Presenting DNS-01 challenge"
        );

        let provider = self.provider(request).await?;
        provider
            .present(&request.resolved_fqdn, &request.resolved_zone, &request.key)
            .await?;
        Ok(())
    }

    async fn cleanup(&self, request: &ChallengeRequest) -> Result<(), SolverError> {
        info!(
            uid = %request.uid,
            dns_name = %request.dns_name,
            fqdn = %request.resolved_fqdn,
            zone = %request.resolved_zone,
            namespace = %request.resource_namespace,
            "Cleaning up DNS-01 challenge"
        );

        let provider = self.provider(request).await?;
        provider
            .cleanup(&request.resolved_fqdn, &request.resolved_zone, &request.key)
            .await?;
        Ok(())
    }
}
