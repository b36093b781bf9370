// Copyright (c) 2025 Erick Bourgeois, firestoned
// SPDX-License-Identifier: MIT

//! HTTP server exposing a [`Solver`] to cert-manager.
//!
//! cert-manager reaches webhook solvers through the Kubernetes aggregation
//! layer. The server therefore looks like a tiny API server for a single
//! group (`GROUP_NAME`) and version (`v1alpha1`):
//!
//! | Method | Path | Purpose |
//! |--------|------|---------|
//! | GET | `/apis`, `/apis/{group}`, `/apis/{group}/v1alpha1` | Discovery |
//! | POST | `/apis/{group}/v1alpha1/{solver}` | Present / CleanUp a challenge |
//! | GET | `/healthz`, `/livez`, `/readyz` | Probes |
//! | GET | `/metrics` | Prometheus metrics |
//!
//! # Example
//!
//! ```rust,no_run
//! use cert_manager_webhook_wedos::server::WebhookServer;
//! use cert_manager_webhook_wedos::wedos::WedosConfig;
//! use cert_manager_webhook_wedos::wedos_solver::WedosSolver;
//!
//! # async fn example() -> Result<(), Box<dyn std::error::Error>> {
//! let solver = WedosSolver::new(WedosConfig::default());
//! let server = WebhookServer::new("acme.example.com", solver);
//!
//! let (_stop_tx, stop_rx) = tokio::sync::watch::channel(false);
//! server.run("0.0.0.0:8443".parse()?, None, stop_rx).await?;
//! # Ok(())
//! # }
//! ```

use crate::challenge::{ChallengeAction, ChallengePayload, ChallengeResponse};
use crate::constants::{
    API_VERSION, KIND_CHALLENGE_PAYLOAD, METRICS_SERVER_PATH, REASON_BAD_REQUEST,
    REASON_NOT_FOUND, SHUTDOWN_GRACE_PERIOD_SECS, STATUS_FAILURE, VERB_CREATE,
};
use crate::errors::ServerError;
use crate::metrics::{gather_metrics, record_challenge};
use crate::solver::Solver;
use axum::{
    body::Bytes,
    extract::{Path, State},
    http::StatusCode,
    response::{IntoResponse, Response},
    routing::{get, post},
    Json, Router,
};
use axum_server::tls_rustls::RustlsConfig;
use k8s_openapi::apimachinery::pkg::apis::meta::v1::{
    APIGroup, APIGroupList, APIResource, APIResourceList, GroupVersionForDiscovery, Status,
};
use std::net::SocketAddr;
use std::path::PathBuf;
use std::sync::Arc;
use std::time::{Duration, Instant};
use tokio::sync::watch;
use tracing::{error, info, warn};

/// PEM files used to serve HTTPS.
#[derive(Debug, Clone)]
pub struct TlsFiles {
    /// Certificate chain
    pub cert_file: PathBuf,
    /// Private key
    pub key_file: PathBuf,
}

/// Webhook server for one solver under one API group.
pub struct WebhookServer<S: Solver> {
    group_name: String,
    solver: Arc<S>,
}

struct AppState<S: Solver> {
    group_name: String,
    solver: Arc<S>,
}

impl<S: Solver> Clone for AppState<S> {
    fn clone(&self) -> Self {
        Self {
            group_name: self.group_name.clone(),
            solver: Arc::clone(&self.solver),
        }
    }
}

impl<S: Solver> WebhookServer<S> {
    /// Create a server for `solver`, registered under `group_name`.
    ///
    /// The solver must already be initialized.
    pub fn new(group_name: impl Into<String>, solver: S) -> Self {
        Self {
            group_name: group_name.into(),
            solver: Arc::new(solver),
        }
    }

    /// API group the server answers for.
    #[must_use]
    pub fn group_name(&self) -> &str {
        &self.group_name
    }

    /// Build the axum router.
    pub fn router(&self) -> Router {
        let state = AppState {
            group_name: self.group_name.clone(),
            solver: Arc::clone(&self.solver),
        };

        Router::new()
            .route("/healthz", get(health))
            .route("/livez", get(health))
            .route("/readyz", get(health))
            .route(METRICS_SERVER_PATH, get(metrics))
            .route("/apis", get(api_group_list::<S>))
            .route("/apis/{group}", get(api_group::<S>))
            .route("/apis/{group}/{version}", get(api_resource_list::<S>))
            .route("/apis/{group}/{version}/{resource}", post(challenge::<S>))
            .with_state(state)
    }

    /// Serve until `stop` flips to `true`.
    ///
    /// Serves HTTPS when `tls` is given, plain HTTP otherwise.
    ///
    /// # Errors
    ///
    /// Returns an error if the TLS files cannot be loaded or the listener fails.
    pub async fn run(
        self,
        addr: SocketAddr,
        tls: Option<TlsFiles>,
        stop: watch::Receiver<bool>,
    ) -> Result<(), ServerError> {
        let router = self.router();

        match tls {
            Some(tls) => {
                let config = RustlsConfig::from_pem_file(&tls.cert_file, &tls.key_file)
                    .await
                    .map_err(|source| ServerError::TlsConfig {
                        cert_file: tls.cert_file.display().to_string(),
                        key_file: tls.key_file.display().to_string(),
                        source,
                    })?;

                let handle = axum_server::Handle::new();
                let shutdown_handle = handle.clone();
                tokio::spawn(async move {
                    wait_for_stop(stop).await;
                    shutdown_handle
                        .graceful_shutdown(Some(Duration::from_secs(SHUTDOWN_GRACE_PERIOD_SECS)));
                });

                info!(address = %addr, group = %self.group_name, "Serving webhook over HTTPS");
                axum_server::bind_rustls(addr, config)
                    .handle(handle)
                    .serve(router.into_make_service())
                    .await?;
            }
            None => {
                warn!(
                    address = %addr,
                    "No TLS certificate configured, serving webhook over plain HTTP"
                );
                let listener = tokio::net::TcpListener::bind(addr).await?;
                axum::serve(listener, router)
                    .with_graceful_shutdown(wait_for_stop(stop))
                    .await?;
            }
        }

        info!("Webhook server stopped");
        Ok(())
    }
}

/// Resolves once `stop` is `true` or its sender is gone.
async fn wait_for_stop(mut stop: watch::Receiver<bool>) {
    let _ = stop.wait_for(|stopped| *stopped).await;
}

async fn health() -> &'static str {
    "ok"
}

async fn metrics() -> Response {
    match gather_metrics() {
        Ok(text) => (StatusCode::OK, text).into_response(),
        Err(e) => {
            error!(error = %e, "Failed to gather metrics");
            (StatusCode::INTERNAL_SERVER_ERROR, e.to_string()).into_response()
        }
    }
}

/// `Status` body for requests that never reach the solver.
fn status_response(code: StatusCode, reason: &str, message: String) -> Response {
    let status = Status {
        status: Some(STATUS_FAILURE.to_string()),
        code: Some(i32::from(code.as_u16())),
        reason: Some(reason.to_string()),
        message: Some(message),
        ..Default::default()
    };
    (code, Json(status)).into_response()
}

fn group_version(group: &str) -> GroupVersionForDiscovery {
    GroupVersionForDiscovery {
        group_version: format!("{group}/{API_VERSION}"),
        version: API_VERSION.to_string(),
    }
}

fn discovery_group(group: &str) -> APIGroup {
    APIGroup {
        name: group.to_string(),
        preferred_version: Some(group_version(group)),
        versions: vec![group_version(group)],
        ..Default::default()
    }
}

async fn api_group_list<S: Solver>(State(state): State<AppState<S>>) -> Json<APIGroupList> {
    Json(APIGroupList {
        groups: vec![discovery_group(&state.group_name)],
    })
}

async fn api_group<S: Solver>(
    State(state): State<AppState<S>>,
    Path(group): Path<String>,
) -> Response {
    if group != state.group_name {
        return status_response(
            StatusCode::NOT_FOUND,
            REASON_NOT_FOUND,
            format!("API group {group:?} is not served here"),
        );
    }
    Json(discovery_group(&group)).into_response()
}

async fn api_resource_list<S: Solver>(
    State(state): State<AppState<S>>,
    Path((group, version)): Path<(String, String)>,
) -> Response {
    if group != state.group_name || version != API_VERSION {
        return status_response(
            StatusCode::NOT_FOUND,
            REASON_NOT_FOUND,
            format!("API group version \"{group}/{version}\" is not served here"),
        );
    }

    let name = state.solver.name().to_string();
    Json(APIResourceList {
        group_version: format!("{group}/{version}"),
        resources: vec![APIResource {
            name: name.clone(),
            singular_name: name,
            namespaced: false,
            kind: KIND_CHALLENGE_PAYLOAD.to_string(),
            verbs: vec![VERB_CREATE.to_string()],
            ..Default::default()
        }],
    })
    .into_response()
}

async fn challenge<S: Solver>(
    State(state): State<AppState<S>>,
    Path((group, version, resource)): Path<(String, String, String)>,
    body: Bytes,
) -> Response {
    if group != state.group_name || version != API_VERSION || resource != state.solver.name() {
        return status_response(
            StatusCode::NOT_FOUND,
            REASON_NOT_FOUND,
            format!("resource \"{resource}\" in \"{group}/{version}\" is not served here"),
        );
    }

    let payload: ChallengePayload = match serde_json::from_slice(&body) {
        Ok(payload) => payload,
        Err(e) => {
            warn!(error = %e, "Rejecting undecodable ChallengePayload");
            return status_response(
                StatusCode::BAD_REQUEST,
                REASON_BAD_REQUEST,
                format!("failed to decode ChallengePayload: {e}"),
            );
        }
    };

    let Some(request) = payload.request else {
        return status_response(
            StatusCode::BAD_REQUEST,
            REASON_BAD_REQUEST,
            "ChallengePayload has no request".to_string(),
        );
    };

    let start = Instant::now();
    let outcome = match &request.action {
        ChallengeAction::Present => Some(state.solver.present(&request).await),
        ChallengeAction::CleanUp => Some(state.solver.cleanup(&request).await),
        ChallengeAction::Unknown(_) => None,
    };

    let response = match outcome {
        Some(Ok(())) => {
            info!(uid = %request.uid, action = %request.action, "Challenge action succeeded");
            ChallengeResponse::succeeded(&request.uid)
        }
        Some(Err(e)) => {
            error!(
                uid = %request.uid,
                action = %request.action,
                fqdn = %request.resolved_fqdn,
                error = %e,
                "Challenge action failed"
            );
            ChallengeResponse::failed(&request.uid, e.to_string())
        }
        None => {
            warn!(uid = %request.uid, action = %request.action, "Unknown challenge action");
            ChallengeResponse::failed(
                &request.uid,
                format!("unknown action type {:?}", request.action.to_string()),
            )
        }
    };
    record_challenge(request.action.metric_label(), response.success, start.elapsed());

    let reply = ChallengePayload::respond(&state.group_name, Some(request), response);
    (StatusCode::CREATED, Json(reply)).into_response()
}
