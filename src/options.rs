// Copyright (c) 2025 Erick Bourgeois, firestoned
// SPDX-License-Identifier: MIT

//! Command line and environment configuration of the webhook process.

use crate::constants::{
    DEFAULT_BIND_ADDRESS, DEFAULT_SECURE_PORT, DEFAULT_TXT_TTL_SECS,
    DEFAULT_WAPI_HTTP_TIMEOUT_SECS, WAPI_ENDPOINT,
};
use crate::server::TlsFiles;
use crate::wedos::WedosConfig;
use clap::Parser;
use std::net::{IpAddr, SocketAddr};
use std::path::PathBuf;
use std::time::Duration;

/// cert-manager DNS-01 webhook solver for WEDOS.
#[derive(Debug, Clone, Parser)]
#[command(name = "cert-manager-webhook-wedos", version, about)]
pub struct Options {
    /// API group the webhook is registered under (must match the Issuer `groupName`)
    #[arg(long, env = "GROUP_NAME", value_parser = parse_group_name)]
    pub group_name: String,

    /// Port to serve HTTPS on
    #[arg(long, default_value_t = DEFAULT_SECURE_PORT)]
    pub secure_port: u16,

    /// Address to listen on
    #[arg(long, default_value = DEFAULT_BIND_ADDRESS)]
    pub bind_address: IpAddr,

    /// PEM certificate chain for HTTPS
    #[arg(long, requires = "tls_private_key_file")]
    pub tls_cert_file: Option<PathBuf>,

    /// PEM private key for HTTPS
    #[arg(long, requires = "tls_cert_file")]
    pub tls_private_key_file: Option<PathBuf>,

    /// WEDOS WAPI JSON endpoint
    #[arg(long, env = "WEDOS_ENDPOINT", default_value = WAPI_ENDPOINT)]
    pub wedos_endpoint: String,

    /// TTL of challenge TXT rows in seconds
    #[arg(long, env = "WEDOS_TTL", default_value_t = DEFAULT_TXT_TTL_SECS)]
    pub wedos_ttl: u32,

    /// Timeout of a single WAPI request in seconds
    #[arg(long, env = "WEDOS_HTTP_TIMEOUT", default_value_t = DEFAULT_WAPI_HTTP_TIMEOUT_SECS)]
    pub wedos_http_timeout: u64,
}

impl Options {
    /// Socket address to listen on.
    #[must_use]
    pub fn listen_address(&self) -> SocketAddr {
        SocketAddr::new(self.bind_address, self.secure_port)
    }

    /// TLS files, when both are configured.
    #[must_use]
    pub fn tls_files(&self) -> Option<TlsFiles> {
        match (&self.tls_cert_file, &self.tls_private_key_file) {
            (Some(cert_file), Some(key_file)) => Some(TlsFiles {
                cert_file: cert_file.clone(),
                key_file: key_file.clone(),
            }),
            _ => None,
        }
    }

    /// Provider defaults; credentials are filled in per challenge.
    #[must_use]
    pub fn wedos_defaults(&self) -> WedosConfig {
        WedosConfig {
            endpoint: self.wedos_endpoint.clone(),
            ttl: self.wedos_ttl,
            http_timeout: Duration::from_secs(self.wedos_http_timeout),
            ..WedosConfig::default()
        }
    }
}

fn parse_group_name(value: &str) -> Result<String, String> {
    let value = value.trim();
    if value.is_empty() {
        return Err("GROUP_NAME must be specified".to_string());
    }
    Ok(value.to_string())
}
