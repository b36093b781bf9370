// Copyright (c) 2025 Erick Bourgeois, firestoned
// SPDX-License-Identifier: MIT

//! WAPI HTTP transport.
//!
//! WAPI takes a single form field `request` holding a JSON document, always
//! answers with HTTP 200 and reports failures through `response.code`.

use super::auth::{auth_token, sha1_hex};
use super::types::{
    ApiRequest, ApiRequestEnvelope, ApiResponse, ApiResponseEnvelope, DnsRow, DnsRowList,
    DomainCommit, DomainRef, RowAdd, RowDelete, RowUpdate,
};
use crate::constants::{
    TXT_RECORD_TYPE, WAPI_CMD_DOMAIN_COMMIT, WAPI_CMD_ROWS_LIST, WAPI_CMD_ROW_ADD,
    WAPI_CMD_ROW_DELETE, WAPI_CMD_ROW_UPDATE, WAPI_CODE_OK, WAPI_FORM_FIELD,
};
use crate::errors::WedosError;
use crate::metrics::record_wapi_request;
use chrono::Utc;
use reqwest::{header::CONTENT_TYPE, Client as HttpClient};
use serde::Serialize;
use std::time::Duration;
use tracing::{debug, error};

/// Low-level WAPI client bound to one account.
#[derive(Debug, Clone)]
pub struct WapiClient {
    http: HttpClient,
    endpoint: String,
    username: String,
    password_hash: String,
}

impl WapiClient {
    /// Create a client for `endpoint`.
    ///
    /// # Errors
    ///
    /// Returns [`WedosError::Request`] if the HTTP client cannot be built.
    pub fn new(
        endpoint: &str,
        username: &str,
        password: &str,
        timeout: Duration,
    ) -> Result<Self, WedosError> {
        let http = HttpClient::builder()
            .timeout(timeout)
            .build()
            .map_err(|source| WedosError::Request {
                command: "client".to_string(),
                source,
            })?;

        Ok(Self {
            http,
            endpoint: endpoint.to_string(),
            username: username.to_string(),
            password_hash: sha1_hex(password),
        })
    }

    /// List all rows of `domain`.
    ///
    /// # Errors
    ///
    /// Returns an error if the request fails or WAPI rejects it.
    pub async fn list_rows(&self, domain: &str) -> Result<Vec<DnsRow>, WedosError> {
        let response = self
            .call(WAPI_CMD_ROWS_LIST, &DomainRef { domain })
            .await?;

        let rows = match response.data {
            Some(data @ serde_json::Value::Object(_)) => {
                serde_json::from_value::<DnsRowList>(data)
                    .map_err(|source| WedosError::Decode {
                        command: WAPI_CMD_ROWS_LIST.to_string(),
                        source,
                    })?
                    .row
            }
            _ => Vec::new(),
        };

        debug!(domain = %domain, rows = rows.len(), "Listed WEDOS DNS rows");
        Ok(rows)
    }

    /// Add a TXT row named `name` (relative to `domain`).
    ///
    /// # Errors
    ///
    /// Returns an error if the request fails or WAPI rejects it.
    pub async fn add_txt_row(
        &self,
        domain: &str,
        name: &str,
        ttl: u32,
        rdata: &str,
    ) -> Result<(), WedosError> {
        let data = RowAdd {
            domain,
            name,
            ttl,
            record_type: TXT_RECORD_TYPE,
            rdata,
        };
        self.call(WAPI_CMD_ROW_ADD, &data).await.map(|_| ())
    }

    /// Update TTL and data of an existing row.
    ///
    /// # Errors
    ///
    /// Returns an error if the request fails or WAPI rejects it.
    pub async fn update_row(
        &self,
        domain: &str,
        row_id: &str,
        ttl: u32,
        rdata: &str,
    ) -> Result<(), WedosError> {
        let data = RowUpdate {
            domain,
            row_id,
            ttl,
            rdata,
        };
        self.call(WAPI_CMD_ROW_UPDATE, &data).await.map(|_| ())
    }

    /// Delete a row.
    ///
    /// # Errors
    ///
    /// Returns an error if the request fails or WAPI rejects it.
    pub async fn delete_row(&self, domain: &str, row_id: &str) -> Result<(), WedosError> {
        self.call(WAPI_CMD_ROW_DELETE, &RowDelete { domain, row_id })
            .await
            .map(|_| ())
    }

    /// Publish pending changes of `domain`.
    ///
    /// Row changes stay invisible on the WEDOS nameservers until committed.
    ///
    /// # Errors
    ///
    /// Returns an error if the request fails or WAPI rejects it.
    pub async fn commit(&self, domain: &str) -> Result<(), WedosError> {
        self.call(WAPI_CMD_DOMAIN_COMMIT, &DomainCommit { name: domain })
            .await
            .map(|_| ())
    }

    /// Execute one WAPI command and check its return code.
    async fn call<D: Serialize + std::fmt::Debug>(
        &self,
        command: &str,
        data: &D,
    ) -> Result<ApiResponse, WedosError> {
        let result = self.call_internal(command, data).await;
        record_wapi_request(command, result.is_ok());
        result
    }

    async fn call_internal<D: Serialize + std::fmt::Debug>(
        &self,
        command: &str,
        data: &D,
    ) -> Result<ApiResponse, WedosError> {
        let auth = auth_token(&self.username, &self.password_hash, Utc::now());
        let envelope = ApiRequestEnvelope {
            request: ApiRequest {
                user: &self.username,
                auth: &auth,
                command,
                data: Some(data),
            },
        };
        let json = serde_json::to_string(&envelope).map_err(|source| WedosError::Encode {
            command: command.to_string(),
            source,
        })?;
        let body = url::form_urlencoded::Serializer::new(String::new())
            .append_pair(WAPI_FORM_FIELD, &json)
            .finish();

        debug!(
            command = %command,
            endpoint = %self.endpoint,
            data = ?data,
            "WAPI request"
        );

        let response = self
            .http
            .post(&self.endpoint)
            .header(CONTENT_TYPE, "application/x-www-form-urlencoded")
            .body(body)
            .send()
            .await
            .map_err(|source| WedosError::Request {
                command: command.to_string(),
                source,
            })?;

        let status = response.status();
        let text = response
            .text()
            .await
            .map_err(|source| WedosError::Request {
                command: command.to_string(),
                source,
            })?;

        if !status.is_success() {
            error!(
                command = %command,
                status = %status,
                body = %text,
                "WAPI request failed"
            );
            return Err(WedosError::Http {
                command: command.to_string(),
                status: status.as_u16(),
                body: text,
            });
        }

        let envelope: ApiResponseEnvelope =
            serde_json::from_str(&text).map_err(|source| WedosError::Decode {
                command: command.to_string(),
                source,
            })?;
        let response = envelope.response;

        if response.code != WAPI_CODE_OK {
            error!(
                command = %command,
                code = response.code,
                result = %response.result,
                sv_trid = %response.sv_trid,
                "WAPI rejected command"
            );
            return Err(WedosError::Api {
                command: command.to_string(),
                code: response.code,
                result: response.result,
                sv_trid: response.sv_trid,
            });
        }

        debug!(
            command = %command,
            sv_trid = %response.sv_trid,
            "WAPI command succeeded"
        );
        Ok(response)
    }
}
