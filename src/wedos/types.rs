// Copyright (c) 2025 Erick Bourgeois, firestoned
// SPDX-License-Identifier: MIT

//! WAPI request and response structures.

use serde::{Deserialize, Deserializer, Serialize};

/// Outer envelope of every WAPI request.
#[derive(Debug, Serialize)]
pub struct ApiRequestEnvelope<'a, D: Serialize> {
    /// The request proper
    pub request: ApiRequest<'a, D>,
}

/// WAPI request body.
#[derive(Debug, Serialize)]
pub struct ApiRequest<'a, D: Serialize> {
    /// WAPI login
    pub user: &'a str,
    /// Hourly auth token, see [`super::auth::auth_token`]
    pub auth: &'a str,
    /// WAPI command, e.g. `dns-row-add`
    pub command: &'a str,
    /// Command parameters; omitted when absent
    #[serde(skip_serializing_if = "Option::is_none")]
    pub data: Option<&'a D>,
}

/// Outer envelope of every WAPI response.
#[derive(Debug, Deserialize)]
pub struct ApiResponseEnvelope {
    /// The response proper
    pub response: ApiResponse,
}

/// WAPI response body.
#[derive(Debug, Default, Deserialize)]
#[serde(default)]
pub struct ApiResponse {
    /// Return code; 1000 means success
    pub code: u32,
    /// Human readable result text
    pub result: String,
    /// Server time as a Unix timestamp
    pub timestamp: i64,
    /// Server transaction ID
    #[serde(rename = "svTRID")]
    pub sv_trid: String,
    /// Command the response belongs to
    pub command: String,
    /// Command specific payload
    pub data: Option<serde_json::Value>,
}

/// A row as returned by `dns-rows-list`.
#[derive(Clone, Debug, Default, PartialEq, Eq, Deserialize)]
#[serde(default)]
pub struct DnsRow {
    /// Row ID used by update and delete
    #[serde(rename = "ID", deserialize_with = "string_or_number")]
    pub id: String,
    /// Name relative to the domain; empty for the apex
    pub name: String,
    /// TTL in seconds
    #[serde(deserialize_with = "string_or_number")]
    pub ttl: String,
    /// Record type, e.g. `TXT`
    #[serde(rename = "rdtype")]
    pub record_type: String,
    /// Record data
    pub rdata: String,
}

/// `data` of a `dns-rows-list` response.
#[derive(Debug, Default, Deserialize)]
#[serde(default)]
pub struct DnsRowList {
    /// Rows of the domain
    pub row: Vec<DnsRow>,
}

/// `data` of `dns-rows-list`.
#[derive(Debug, Serialize)]
pub struct DomainRef<'a> {
    /// Domain name without trailing dot
    pub domain: &'a str,
}

/// `data` of `dns-domain-commit`.
#[derive(Debug, Serialize)]
pub struct DomainCommit<'a> {
    /// Domain name without trailing dot
    pub name: &'a str,
}

/// `data` of `dns-row-add`.
#[derive(Debug, Serialize)]
pub struct RowAdd<'a> {
    /// Domain name without trailing dot
    pub domain: &'a str,
    /// Row name relative to the domain
    pub name: &'a str,
    /// TTL in seconds
    pub ttl: u32,
    /// Record type, always `TXT` here
    #[serde(rename = "type")]
    pub record_type: &'a str,
    /// Record data
    pub rdata: &'a str,
}

/// `data` of `dns-row-update`.
#[derive(Debug, Serialize)]
pub struct RowUpdate<'a> {
    /// Domain name without trailing dot
    pub domain: &'a str,
    /// ID of the row to update
    pub row_id: &'a str,
    /// New TTL in seconds
    pub ttl: u32,
    /// New record data
    pub rdata: &'a str,
}

/// `data` of `dns-row-delete`.
#[derive(Debug, Serialize)]
pub struct RowDelete<'a> {
    /// Domain name without trailing dot
    pub domain: &'a str,
    /// ID of the row to delete
    pub row_id: &'a str,
}

/// WAPI is inconsistent about quoting numeric fields.
fn string_or_number<'de, D>(deserializer: D) -> Result<String, D::Error>
where
    D: Deserializer<'de>,
{
    match serde_json::Value::deserialize(deserializer)? {
        serde_json::Value::String(s) => Ok(s),
        serde_json::Value::Number(n) => Ok(n.to_string()),
        serde_json::Value::Null => Ok(String::new()),
        other => Err(serde::de::Error::custom(format!(
            "expected string or number, got {other}"
        ))),
    }
}
