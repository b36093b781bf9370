// Copyright (c) 2025 Erick Bourgeois, firestoned
// SPDX-License-Identifier: MIT

//! WEDOS DNS provider for DNS-01 challenges.
//!
//! This module manages `_acme-challenge` TXT rows through the WEDOS WAPI
//! JSON interface. It handles:
//!
//! - Mapping a challenge FQDN onto a WEDOS domain and relative row name
//! - Creating or refreshing the challenge row
//! - Removing the challenge row once validated
//! - Committing the domain so changes reach the nameservers
//!
//! # Example
//!
//! ```rust,no_run
//! use cert_manager_webhook_wedos::wedos::{WedosConfig, WedosProvider};
//!
//! # async fn example() -> Result<(), cert_manager_webhook_wedos::errors::WedosError> {
//! let config = WedosConfig {
//!     username: "admin@example.com".to_string(),
//!     password: "wapi-password".to_string(),
//!     ..WedosConfig::default()
//! };
//! let provider = WedosProvider::new(config)?;
//!
//! provider
//!     .present("_acme-challenge.example.com.", "example.com.", "token")
//!     .await?;
//! # Ok(())
//! # }
//! ```

pub mod auth;
pub mod client;
pub mod types;

pub use client::WapiClient;
pub use types::DnsRow;

use crate::constants::{
    DEFAULT_TXT_TTL_SECS, DEFAULT_WAPI_HTTP_TIMEOUT_SECS, TXT_RECORD_TYPE, WAPI_ENDPOINT,
};
use crate::errors::WedosError;
use std::fmt;
use std::time::Duration;
use tracing::{debug, info};

/// Configuration of a [`WedosProvider`].
#[derive(Clone)]
pub struct WedosConfig {
    /// WAPI login
    pub username: String,
    /// WAPI password (plain; hashed before use)
    pub password: String,
    /// WAPI JSON endpoint
    pub endpoint: String,
    /// TTL of challenge rows in seconds
    pub ttl: u32,
    /// Timeout of a single WAPI HTTP request
    pub http_timeout: Duration,
}

impl Default for WedosConfig {
    fn default() -> Self {
        Self {
            username: String::new(),
            password: String::new(),
            endpoint: WAPI_ENDPOINT.to_string(),
            ttl: DEFAULT_TXT_TTL_SECS,
            http_timeout: Duration::from_secs(DEFAULT_WAPI_HTTP_TIMEOUT_SECS),
        }
    }
}

impl fmt::Debug for WedosConfig {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("WedosConfig")
            .field("username", &self.username)
            .field("password", &"<redacted>")
            .field("endpoint", &self.endpoint)
            .field("ttl", &self.ttl)
            .field("http_timeout", &self.http_timeout)
            .finish()
    }
}

/// DNS provider backed by one WEDOS account.
#[derive(Debug, Clone)]
pub struct WedosProvider {
    config: WedosConfig,
    client: WapiClient,
}

impl WedosProvider {
    /// Build a provider from `config`.
    ///
    /// # Errors
    ///
    /// Returns [`WedosError::MissingCredentials`] if the username or password
    /// is empty, or [`WedosError::Request`] if the HTTP client cannot be built.
    pub fn new(config: WedosConfig) -> Result<Self, WedosError> {
        if config.username.is_empty() || config.password.is_empty() {
            return Err(WedosError::MissingCredentials);
        }

        let client = WapiClient::new(
            &config.endpoint,
            &config.username,
            &config.password,
            config.http_timeout,
        )?;

        Ok(Self { config, client })
    }

    /// Configuration this provider was built with.
    #[must_use]
    pub fn config(&self) -> &WedosConfig {
        &self.config
    }

    /// Publish the challenge TXT row for `fqdn` in `zone`.
    ///
    /// An existing row with the same name and value is refreshed instead of
    /// duplicated. The domain is committed afterwards.
    ///
    /// # Errors
    ///
    /// Returns an error if `fqdn` is outside `zone` or any WAPI call fails.
    pub async fn present(&self, fqdn: &str, zone: &str, value: &str) -> Result<(), WedosError> {
        let (domain, name) = split_fqdn(fqdn, zone)?;

        let rows = self.client.list_rows(&domain).await?;
        match find_txt_row(&rows, &name, value) {
            Some(row) => {
                debug!(domain = %domain, name = %name, row_id = %row.id, "Refreshing existing challenge row");
                self.client
                    .update_row(&domain, &row.id, self.config.ttl, value)
                    .await?;
            }
            None => {
                self.client
                    .add_txt_row(&domain, &name, self.config.ttl, value)
                    .await?;
            }
        }
        self.client.commit(&domain).await?;

        info!(domain = %domain, name = %name, "Presented challenge TXT row");
        Ok(())
    }

    /// Remove the challenge TXT row for `fqdn` in `zone`.
    ///
    /// Does nothing if no matching row exists.
    ///
    /// # Errors
    ///
    /// Returns an error if `fqdn` is outside `zone` or any WAPI call fails.
    pub async fn cleanup(&self, fqdn: &str, zone: &str, value: &str) -> Result<(), WedosError> {
        let (domain, name) = split_fqdn(fqdn, zone)?;

        let rows = self.client.list_rows(&domain).await?;
        let Some(row) = find_txt_row(&rows, &name, value) else {
            debug!(domain = %domain, name = %name, "No challenge row to clean up");
            return Ok(());
        };

        self.client.delete_row(&domain, &row.id).await?;
        self.client.commit(&domain).await?;

        info!(domain = %domain, name = %name, row_id = %row.id, "Cleaned up challenge TXT row");
        Ok(())
    }
}

/// First TXT row called `name` holding `value`.
#[must_use]
pub fn find_txt_row<'a>(rows: &'a [DnsRow], name: &str, value: &str) -> Option<&'a DnsRow> {
    rows.iter().find(|row| {
        row.record_type.eq_ignore_ascii_case(TXT_RECORD_TYPE)
            && row.name == name
            && row.rdata == value
    })
}

/// Split `fqdn` into the WEDOS domain (zone without trailing dot) and the row
/// name relative to it. The apex yields an empty row name.
///
/// # Errors
///
/// Returns [`WedosError::RecordOutsideZone`] if `fqdn` is not `zone` or a name below it.
pub fn split_fqdn(fqdn: &str, zone: &str) -> Result<(String, String), WedosError> {
    let domain = unfqdn(zone).to_ascii_lowercase();
    let record = unfqdn(fqdn).to_ascii_lowercase();

    let outside = || WedosError::RecordOutsideZone {
        fqdn: fqdn.to_string(),
        zone: zone.to_string(),
    };

    if domain.is_empty() {
        return Err(outside());
    }
    if record == domain {
        return Ok((domain, String::new()));
    }

    let name = record
        .strip_suffix(&domain)
        .and_then(|prefix| prefix.strip_suffix('.'))
        .filter(|name| !name.is_empty())
        .ok_or_else(outside)?
        .to_string();

    Ok((domain, name))
}

fn unfqdn(name: &str) -> &str {
    name.strip_suffix('.').unwrap_or(name)
}
