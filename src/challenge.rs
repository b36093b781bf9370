// Copyright (c) 2025 Erick Bourgeois, firestoned
// SPDX-License-Identifier: MIT

//! Wire types exchanged with cert-manager.
//!
//! cert-manager talks to DNS-01 webhook solvers through the Kubernetes
//! aggregation layer: it `POST`s a `ChallengePayload` carrying a
//! [`ChallengeRequest`] to `/apis/<group>/v1alpha1/<solver>` and expects the
//! same payload back with the [`ChallengeResponse`] filled in.
//!
//! # Example
//!
//! ```rust
//! use cert_manager_webhook_wedos::challenge::{ChallengeAction, ChallengePayload};
//!
//! let payload: ChallengePayload = serde_json::from_str(r#"{
//!     "apiVersion": "acme.example.com/v1alpha1",
//!     "kind": "ChallengePayload",
//!     "request": {
//!         "uid": "3c7c",
//!         "action": "Present",
//!         "resolvedFQDN": "_acme-challenge.example.com.",
//!         "resolvedZone": "example.com.",
//!         "key": "token"
//!     }
//! }"#).unwrap();
//!
//! let request = payload.request.unwrap();
//! assert_eq!(request.action, ChallengeAction::Present);
//! assert!(request.config.is_none());
//! ```

use crate::constants::{
    API_VERSION, KIND_CHALLENGE_PAYLOAD, REASON_INTERNAL_ERROR, STATUS_FAILURE,
};
use k8s_openapi::apimachinery::pkg::apis::meta::v1::Status;
use serde::{Deserialize, Serialize};
use std::fmt;

/// Action cert-manager asks the solver to perform.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(from = "String", into = "String")]
pub enum ChallengeAction {
    /// Publish the challenge TXT record
    Present,
    /// Remove the challenge TXT record
    CleanUp,
    /// Anything else; rejected by the server with a failed response
    Unknown(String),
}

impl From<String> for ChallengeAction {
    fn from(value: String) -> Self {
        match value.as_str() {
            "Present" => Self::Present,
            "CleanUp" => Self::CleanUp,
            _ => Self::Unknown(value),
        }
    }
}

impl From<ChallengeAction> for String {
    fn from(action: ChallengeAction) -> Self {
        match action {
            ChallengeAction::Present => "Present".to_string(),
            ChallengeAction::CleanUp => "CleanUp".to_string(),
            ChallengeAction::Unknown(value) => value,
        }
    }
}

impl ChallengeAction {
    /// Bounded label for metrics; every unknown action shares `Unknown`.
    #[must_use]
    pub fn metric_label(&self) -> &'static str {
        match self {
            Self::Present => "Present",
            Self::CleanUp => "CleanUp",
            Self::Unknown(_) => "Unknown",
        }
    }
}

impl Default for ChallengeAction {
    fn default() -> Self {
        Self::Unknown(String::new())
    }
}

impl fmt::Display for ChallengeAction {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Present => f.write_str("Present"),
            Self::CleanUp => f.write_str("CleanUp"),
            Self::Unknown(value) => f.write_str(value),
        }
    }
}

/// A single DNS-01 challenge as sent by cert-manager.
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct ChallengeRequest {
    /// Unique ID of this request, echoed in the response
    pub uid: String,

    /// Whether to present or clean up the record
    pub action: ChallengeAction,

    /// Challenge type, always `dns-01` for webhook solvers
    #[serde(rename = "type")]
    pub challenge_type: String,

    /// Domain being validated (e.g. `example.com` or `*.example.com`)
    pub dns_name: String,

    /// TXT record value to publish
    pub key: String,

    /// Namespace in which to look up referenced secrets
    pub resource_namespace: String,

    /// Fully qualified record name, e.g. `_acme-challenge.example.com.`
    #[serde(rename = "resolvedFQDN")]
    pub resolved_fqdn: String,

    /// Authoritative zone for the record, e.g. `example.com.`
    pub resolved_zone: String,

    /// Whether ambient credentials may be used; unused by this solver
    pub allow_ambient_credentials: bool,

    /// Raw solver config from the Issuer
    #[serde(skip_serializing_if = "Option::is_none")]
    pub config: Option<serde_json::Value>,
}

/// Outcome of a challenge, returned to cert-manager.
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct ChallengeResponse {
    /// UID of the request this responds to
    pub uid: String,

    /// Whether the action succeeded
    pub success: bool,

    /// Failure details when `success` is false
    #[serde(rename = "status", skip_serializing_if = "Option::is_none")]
    pub result: Option<Status>,
}

impl ChallengeResponse {
    /// Response for a successful action.
    #[must_use]
    pub fn succeeded(uid: impl Into<String>) -> Self {
        Self {
            uid: uid.into(),
            success: true,
            result: None,
        }
    }

    /// Response for a failed action, carrying the error message.
    #[must_use]
    pub fn failed(uid: impl Into<String>, message: impl Into<String>) -> Self {
        Self {
            uid: uid.into(),
            success: false,
            result: Some(Status {
                status: Some(STATUS_FAILURE.to_string()),
                message: Some(message.into()),
                reason: Some(REASON_INTERNAL_ERROR.to_string()),
                ..Default::default()
            }),
        }
    }
}

/// Envelope for requests and responses.
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ChallengePayload {
    /// `<group>/v1alpha1`
    #[serde(default)]
    pub api_version: String,

    /// Always `ChallengePayload`
    #[serde(default)]
    pub kind: String,

    /// Set by cert-manager
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub request: Option<ChallengeRequest>,

    /// Set by the solver
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub response: Option<ChallengeResponse>,
}

impl ChallengePayload {
    /// Build the reply for `group`, keeping the original request.
    #[must_use]
    pub fn respond(
        group: &str,
        request: Option<ChallengeRequest>,
        response: ChallengeResponse,
    ) -> Self {
        Self {
            api_version: format!("{group}/{API_VERSION}"),
            kind: KIND_CHALLENGE_PAYLOAD.to_string(),
            request,
            response: Some(response),
        }
    }
}
