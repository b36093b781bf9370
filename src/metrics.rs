// Copyright (c) 2025 Erick Bourgeois, firestoned
// SPDX-License-Identifier: MIT

//! Prometheus metrics for the WEDOS webhook solver.
//!
//! This module provides metrics collection with the namespace prefix
//! `cert_manager_webhook_wedos_`.
//!
//! # Metrics Categories
//!
//! - **Challenge Metrics** - Track Present/CleanUp calls and their outcomes
//! - **WAPI Metrics** - Track calls to the WEDOS API by command
//!
//! # Example
//!
//! ```rust,no_run
//! use cert_manager_webhook_wedos::metrics::record_challenge;
//!
//! record_challenge("Present", true, std::time::Duration::from_millis(800));
//! ```

use prometheus::{CounterVec, Encoder, HistogramOpts, HistogramVec, Opts, Registry, TextEncoder};
use std::sync::LazyLock;
use std::time::Duration;

/// Namespace prefix for all metrics (prometheus-safe)
const METRICS_NAMESPACE: &str = "cert_manager_webhook_wedos";

/// Global Prometheus metrics registry
///
/// All metrics are registered in this registry and exposed via `/metrics` endpoint.
pub static METRICS_REGISTRY: LazyLock<Registry> = LazyLock::new(Registry::new);

// ============================================================================
// Challenge Metrics
// ============================================================================

/// Total number of challenge actions by action and result
///
/// Labels:
/// - `action`: `Present`, `CleanUp` or `Unknown`
/// - `result`: `success` or `error`
pub static CHALLENGES_TOTAL: LazyLock<CounterVec> = LazyLock::new(|| {
    let opts = Opts::new(
        format!("{METRICS_NAMESPACE}_challenges_total"),
        "Total number of challenge actions by action and result",
    );
    let counter = CounterVec::new(opts, &["action", "result"]).unwrap();
    METRICS_REGISTRY
        .register(Box::new(counter.clone()))
        .unwrap();
    counter
});

/// Duration of challenge actions in seconds
///
/// Labels:
/// - `action`: `Present` or `CleanUp`
pub static CHALLENGE_DURATION_SECONDS: LazyLock<HistogramVec> = LazyLock::new(|| {
    let opts = HistogramOpts::new(
        format!("{METRICS_NAMESPACE}_challenge_duration_seconds"),
        "Duration of challenge actions in seconds by action",
    )
    .buckets(vec![0.05, 0.1, 0.25, 0.5, 1.0, 2.5, 5.0, 10.0, 30.0]);
    let histogram = HistogramVec::new(opts, &["action"]).unwrap();
    METRICS_REGISTRY
        .register(Box::new(histogram.clone()))
        .unwrap();
    histogram
});

// ============================================================================
// WAPI Metrics
// ============================================================================

/// Total number of WAPI commands by command and result
///
/// Labels:
/// - `command`: WAPI command (e.g. `dns-row-add`)
/// - `result`: `success` or `error`
pub static WAPI_REQUESTS_TOTAL: LazyLock<CounterVec> = LazyLock::new(|| {
    let opts = Opts::new(
        format!("{METRICS_NAMESPACE}_wapi_requests_total"),
        "Total number of WEDOS API commands by command and result",
    );
    let counter = CounterVec::new(opts, &["command", "result"]).unwrap();
    METRICS_REGISTRY
        .register(Box::new(counter.clone()))
        .unwrap();
    counter
});

fn result_label(success: bool) -> &'static str {
    if success {
        "success"
    } else {
        "error"
    }
}

/// Record a finished challenge action.
pub fn record_challenge(action: &str, success: bool, duration: Duration) {
    CHALLENGES_TOTAL
        .with_label_values(&[action, result_label(success)])
        .inc();
    CHALLENGE_DURATION_SECONDS
        .with_label_values(&[action])
        .observe(duration.as_secs_f64());
}

/// Record a finished WAPI command.
pub fn record_wapi_request(command: &str, success: bool) {
    WAPI_REQUESTS_TOTAL
        .with_label_values(&[command, result_label(success)])
        .inc();
}

/// Gather all metrics in Prometheus text format
///
/// # Errors
///
/// Returns an error if encoding fails
pub fn gather_metrics() -> Result<String, prometheus::Error> {
    let encoder = TextEncoder::new();
    let metric_families = METRICS_REGISTRY.gather();
    let mut buffer = Vec::new();
    encoder.encode(&metric_families, &mut buffer)?;
    String::from_utf8(buffer).map_err(|e| prometheus::Error::Msg(format!("UTF-8 error: {e}")))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_record_challenge_success() {
        let action = "TestPresent";
        record_challenge(action, true, Duration::from_millis(500));

        let counter = CHALLENGES_TOTAL.with_label_values(&[action, "success"]);
        assert!(counter.get() > 0.0);

        let histogram = CHALLENGE_DURATION_SECONDS.with_label_values(&[action]);
        assert!(histogram.get_sample_count() > 0);
    }

    #[test]
    fn test_record_challenge_error() {
        let action = "TestCleanUp";
        record_challenge(action, false, Duration::from_millis(250));

        let counter = CHALLENGES_TOTAL.with_label_values(&[action, "error"]);
        assert!(counter.get() > 0.0);
    }

    #[test]
    fn test_record_wapi_request() {
        record_wapi_request("test-command", false);

        let counter = WAPI_REQUESTS_TOTAL.with_label_values(&["test-command", "error"]);
        assert!(counter.get() > 0.0);
    }

    #[test]
    fn test_gather_metrics() {
        record_challenge("GatherTest", true, Duration::from_millis(100));

        let result = gather_metrics();
        assert!(result.is_ok(), "Gathering metrics should succeed");

        let metrics_text = result.unwrap();
        assert!(
            metrics_text.contains("cert_manager_webhook_wedos"),
            "Metrics should contain namespace prefix"
        );
        assert!(
            metrics_text.contains("challenges_total"),
            "Metrics should contain challenge counter"
        );
    }
}
