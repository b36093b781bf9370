// Copyright (c) 2025 Erick Bourgeois, firestoned
// SPDX-License-Identifier: MIT

//! Global constants for the WEDOS webhook solver.
//!
//! This module contains all numeric and string constants used throughout the codebase.
//! Constants are organized by category for easy maintenance.

// ============================================================================
// Webhook API Constants
// ============================================================================

/// Name of this solver, used as the webhook resource name and in Issuer `solverName`
pub const SOLVER_NAME: &str = "wedos";

/// API version served for the webhook group
pub const API_VERSION: &str = "v1alpha1";

/// Kind of the object exchanged with cert-manager
pub const KIND_CHALLENGE_PAYLOAD: &str = "ChallengePayload";

/// Verb cert-manager uses against the solver resource
pub const VERB_CREATE: &str = "create";

/// Kubernetes `Status.status` value for failed calls
pub const STATUS_FAILURE: &str = "Failure";

/// Kubernetes `Status.reason` for solver failures
pub const REASON_INTERNAL_ERROR: &str = "InternalError";

/// Kubernetes `Status.reason` for malformed payloads
pub const REASON_BAD_REQUEST: &str = "BadRequest";

/// Kubernetes `Status.reason` for unknown groups or resources
pub const REASON_NOT_FOUND: &str = "NotFound";

// ============================================================================
// Kubernetes Client Constants
// ============================================================================

/// Upper bound for fetching the credential secret (15 seconds)
pub const SECRET_FETCH_TIMEOUT_SECS: u64 = 15;

// ============================================================================
// WEDOS WAPI Constants
// ============================================================================

/// WAPI JSON endpoint
pub const WAPI_ENDPOINT: &str = "https://api.wedos.com/wapi/json";

/// WAPI return code for a successful command
pub const WAPI_CODE_OK: u32 = 1000;

/// Form field carrying the JSON request
pub const WAPI_FORM_FIELD: &str = "request";

/// Default TTL for challenge TXT rows (5 minutes)
pub const DEFAULT_TXT_TTL_SECS: u32 = 300;

/// Default HTTP timeout for WAPI calls (10 seconds)
pub const DEFAULT_WAPI_HTTP_TIMEOUT_SECS: u64 = 10;

/// Record type used for DNS-01 challenges
pub const TXT_RECORD_TYPE: &str = "TXT";

/// WAPI command listing the rows of a domain
pub const WAPI_CMD_ROWS_LIST: &str = "dns-rows-list";

/// WAPI command adding a row
pub const WAPI_CMD_ROW_ADD: &str = "dns-row-add";

/// WAPI command updating a row
pub const WAPI_CMD_ROW_UPDATE: &str = "dns-row-update";

/// WAPI command deleting a row
pub const WAPI_CMD_ROW_DELETE: &str = "dns-row-delete";

/// WAPI command publishing pending changes of a domain
pub const WAPI_CMD_DOMAIN_COMMIT: &str = "dns-domain-commit";

// ============================================================================
// Server Constants
// ============================================================================

/// Default HTTPS port of the webhook (matches the cert-manager Helm chart)
pub const DEFAULT_SECURE_PORT: u16 = 443;

/// Default bind address of the webhook
pub const DEFAULT_BIND_ADDRESS: &str = "0.0.0.0";

/// Grace period for in-flight requests on shutdown
pub const SHUTDOWN_GRACE_PERIOD_SECS: u64 = 10;

/// Path for Prometheus metrics endpoint
pub const METRICS_SERVER_PATH: &str = "/metrics";

// ============================================================================
// Runtime Constants
// ============================================================================

/// Number of worker threads for Tokio runtime
pub const TOKIO_WORKER_THREADS: usize = 4;
