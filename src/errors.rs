// Copyright (c) 2025 Erick Bourgeois, firestoned
// SPDX-License-Identifier: MIT

//! Error types for the WEDOS webhook solver.
//!
//! This module provides specialized error types for:
//! - Challenge resolution (solver config, credential secret lookup)
//! - WEDOS WAPI operations (authentication, row management, commits)
//!
//! Every error is reported back to cert-manager verbatim through the
//! `ChallengeResponse` status message, so the `Display` output is what
//! users see on their `Challenge` resources.

use std::time::Duration;
use thiserror::Error;

/// Errors that can occur while resolving and running a challenge.
#[derive(Error, Debug)]
pub enum SolverError {
    /// The Issuer `config` block is not valid JSON for this solver
    #[error("error decoding solver config: {0}")]
    ConfigDecode(#[source] serde_json::Error),

    /// `apiKeySecretRef.name` is empty or missing
    #[error("API key secret reference was not provided")]
    MissingSecretRef,

    /// `present`/`cleanup` was called before `initialize`
    #[error("solver has not been initialized with a Kubernetes client")]
    NotInitialized,

    /// Kubernetes API failure (client construction, secret not found, forbidden, ...)
    #[error(transparent)]
    Kube(#[from] kube::Error),

    /// The secret lookup did not complete within the deadline
    #[error("deadline exceeded after {timeout:?} fetching secret \"{namespace}/{name}\"")]
    SecretFetchTimeout {
        /// Namespace of the secret
        namespace: String,
        /// Name of the secret
        name: String,
        /// Deadline that expired
        timeout: Duration,
    },

    /// The secret exists but does not hold the configured key
    #[error("key \"{key}\" not found in secret \"{namespace}/{name}\"")]
    MissingSecretKey {
        /// Key that was looked up
        key: String,
        /// Name of the secret
        name: String,
        /// Namespace of the secret
        namespace: String,
    },

    /// The credential bytes are not valid UTF-8
    #[error("value of key \"{key}\" in secret \"{namespace}/{name}\" is not valid UTF-8")]
    InvalidSecretEncoding {
        /// Key that was looked up
        key: String,
        /// Name of the secret
        name: String,
        /// Namespace of the secret
        namespace: String,
    },

    /// Failure reported by the WEDOS provider
    #[error(transparent)]
    Wedos(#[from] WedosError),
}

/// Errors that can occur while talking to the WEDOS WAPI.
#[derive(Error, Debug)]
pub enum WedosError {
    /// Username or password is empty
    #[error("wedos: some credentials information are missing")]
    MissingCredentials,

    /// The record FQDN does not belong to the zone it should be created in
    #[error("wedos: record '{fqdn}' is not inside zone '{zone}'")]
    RecordOutsideZone {
        /// Fully qualified record name
        fqdn: String,
        /// Zone the record was expected in
        zone: String,
    },

    /// HTTP client construction or transport failure
    #[error("wedos: {command}: request failed: {source}")]
    Request {
        /// WAPI command being executed
        command: String,
        /// Underlying reqwest error
        #[source]
        source: reqwest::Error,
    },

    /// Non-2xx HTTP status from the WAPI endpoint
    #[error("wedos: {command}: unexpected HTTP status {status}: {body}")]
    Http {
        /// WAPI command being executed
        command: String,
        /// HTTP status code
        status: u16,
        /// Response body
        body: String,
    },

    /// WAPI returned a code other than 1000
    #[error("wedos: {command}: {result} (code: {code}, svTRID: {sv_trid})")]
    Api {
        /// WAPI command being executed
        command: String,
        /// WAPI return code
        code: u32,
        /// WAPI result text
        result: String,
        /// Server transaction ID, useful when contacting WEDOS support
        sv_trid: String,
    },

    /// The response body could not be decoded
    #[error("wedos: {command}: failed to decode response: {source}")]
    Decode {
        /// WAPI command being executed
        command: String,
        /// Underlying JSON error
        #[source]
        source: serde_json::Error,
    },

    /// The request could not be encoded
    #[error("wedos: {command}: failed to encode request: {source}")]
    Encode {
        /// WAPI command being executed
        command: String,
        /// Underlying JSON error
        #[source]
        source: serde_json::Error,
    },
}

/// Errors that can stop the webhook server.
#[derive(Error, Debug)]
pub enum ServerError {
    /// The serving certificate or key could not be loaded
    #[error("failed to load TLS certificate '{cert_file}' / key '{key_file}': {source}")]
    TlsConfig {
        /// Path of the PEM certificate chain
        cert_file: String,
        /// Path of the PEM private key
        key_file: String,
        /// Underlying I/O or parse error
        #[source]
        source: std::io::Error,
    },

    /// Binding or serving failed
    #[error("webhook server error: {0}")]
    Io(#[from] std::io::Error),
}
