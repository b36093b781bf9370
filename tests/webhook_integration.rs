// Copyright (c) 2025 Erick Bourgeois, firestoned
// SPDX-License-Identifier: MIT

//! End-to-end tests for the WEDOS webhook.
//!
//! A real `WedosSolver` is served through the webhook router. The Kubernetes
//! API and the WEDOS WAPI are both mocked with wiremock, so these tests run
//! without a cluster or WEDOS account.
//!
//! Run with: cargo test --test webhook_integration

use base64::{engine::general_purpose::STANDARD as BASE64, Engine as _};
use cert_manager_webhook_wedos::server::WebhookServer;
use cert_manager_webhook_wedos::solver::Solver;
use cert_manager_webhook_wedos::wedos::WedosConfig;
use cert_manager_webhook_wedos::wedos_solver::WedosSolver;
use serde_json::{json, Value};
use std::time::Duration;
use tokio::net::TcpListener;
use tokio::sync::watch;
use wiremock::matchers::{body_string_contains, method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

const GROUP: &str = "acme.example.com";

// ============================================================================
// Helper Functions
// ============================================================================

struct Harness {
    base_url: String,
    wapi: MockServer,
    _kube: MockServer,
}

async fn start_kube_with_secret() -> MockServer {
    let kube = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/api/v1/namespaces/cert-manager/secrets/wedos-cred"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "apiVersion": "v1",
            "kind": "Secret",
            "metadata": { "name": "wedos-cred", "namespace": "cert-manager" },
            "type": "Opaque",
            "data": { "password": BASE64.encode("s3cr3t") }
        })))
        .mount(&kube)
        .await;
    kube
}

async fn start_harness() -> Harness {
    let _ = rustls::crypto::ring::default_provider().install_default();
    let kube = start_kube_with_secret().await;
    let wapi = MockServer::start().await;

    let mut solver = WedosSolver::new(WedosConfig {
        endpoint: format!("{}/wapi/json", wapi.uri()),
        http_timeout: Duration::from_secs(5),
        ..WedosConfig::default()
    });
    let (_stop_tx, stop_rx) = watch::channel(false);
    solver
        .initialize(kube::Config::new(kube.uri().parse().unwrap()), stop_rx)
        .await
        .unwrap();

    let router = WebhookServer::new(GROUP, solver).router();
    let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    tokio::spawn(async move {
        axum::serve(listener, router).await.unwrap();
    });

    Harness {
        base_url: format!("http://{addr}"),
        wapi,
        _kube: kube,
    }
}

fn wapi_ok(data: Value) -> ResponseTemplate {
    ResponseTemplate::new(200).set_body_json(json!({
        "response": {
            "code": 1000,
            "result": "OK",
            "timestamp": 1_700_000_000,
            "svTRID": "1700000000.0001",
            "command": "",
            "data": data
        }
    }))
}

async fn mount_wapi(wapi: &MockServer, command: &str, data: Value, calls: u64) {
    // Matches `"command":"<command>"` inside the form-encoded JSON
    Mock::given(method("POST"))
        .and(path("/wapi/json"))
        .and(body_string_contains(format!("%22command%22%3A%22{command}%22")))
        .respond_with(wapi_ok(data))
        .expect(calls)
        .mount(wapi)
        .await;
}

fn challenge(action: &str, config: Value) -> Value {
    json!({
        "apiVersion": format!("{GROUP}/v1alpha1"),
        "kind": "ChallengePayload",
        "request": {
            "uid": "6e2a8f2c-0b1c-4a51-9d53-1f2a3b4c5d6e",
            "action": action,
            "type": "dns-01",
            "dnsName": "example.com",
            "key": "LoqXcYV8q5ONbJQxbmR7SCTNo3tiAXDfowyjxAjEuX0",
            "resourceNamespace": "cert-manager",
            "resolvedFQDN": "_acme-challenge.example.com.",
            "resolvedZone": "example.com.",
            "allowAmbientCredentials": false,
            "config": config
        }
    })
}

fn bob_config() -> Value {
    json!({
        "apiUsername": "bob",
        "apiKeySecretRef": { "name": "wedos-cred", "key": "password" }
    })
}

async fn post_challenge(harness: &Harness, body: &Value) -> Value {
    let response = reqwest::Client::new()
        .post(format!("{}/apis/{GROUP}/v1alpha1/wedos", harness.base_url))
        .json(body)
        .send()
        .await
        .unwrap();
    assert_eq!(response.status().as_u16(), 201);
    response.json().await.unwrap()
}

// ============================================================================
// Tests
// ============================================================================

#[tokio::test]
async fn test_present_then_cleanup() {
    let harness = start_harness().await;
    let key = "LoqXcYV8q5ONbJQxbmR7SCTNo3tiAXDfowyjxAjEuX0";

    mount_wapi(&harness.wapi, "dns-rows-list", json!({ "row": [] }), 1).await;
    mount_wapi(&harness.wapi, "dns-row-add", json!({}), 1).await;
    mount_wapi(&harness.wapi, "dns-domain-commit", json!({}), 1).await;

    let reply = post_challenge(&harness, &challenge("Present", bob_config())).await;
    assert_eq!(reply["response"]["success"], true);
    assert_eq!(
        reply["response"]["uid"],
        "6e2a8f2c-0b1c-4a51-9d53-1f2a3b4c5d6e"
    );
    harness.wapi.verify().await;
    harness.wapi.reset().await;

    mount_wapi(
        &harness.wapi,
        "dns-rows-list",
        json!({
            "row": [
                { "ID": "12", "name": "www", "ttl": "300", "rdtype": "A", "rdata": "192.0.2.1" },
                { "ID": "13", "name": "_acme-challenge", "ttl": "300", "rdtype": "TXT", "rdata": key }
            ]
        }),
        1,
    )
    .await;
    mount_wapi(&harness.wapi, "dns-row-delete", json!({}), 1).await;
    mount_wapi(&harness.wapi, "dns-domain-commit", json!({}), 1).await;

    let reply = post_challenge(&harness, &challenge("CleanUp", bob_config())).await;
    assert_eq!(reply["response"]["success"], true);
}

#[tokio::test]
async fn test_discovery_names_wedos_resource() {
    let harness = start_harness().await;

    let body: Value = reqwest::get(format!("{}/apis/{GROUP}/v1alpha1", harness.base_url))
        .await
        .unwrap()
        .json()
        .await
        .unwrap();

    assert_eq!(body["resources"][0]["name"], "wedos");
    assert_eq!(body["resources"][0]["kind"], "ChallengePayload");
}

#[tokio::test]
async fn test_missing_secret_ref_fails_without_wapi_calls() {
    let harness = start_harness().await;
    Mock::given(method("POST"))
        .respond_with(wapi_ok(json!({})))
        .expect(0)
        .mount(&harness.wapi)
        .await;

    let reply = post_challenge(&harness, &challenge("Present", json!({}))).await;

    assert_eq!(reply["response"]["success"], false);
    assert_eq!(
        reply["response"]["status"]["message"],
        "API key secret reference was not provided"
    );
}

#[tokio::test]
async fn test_wapi_rejection_is_reported() {
    let harness = start_harness().await;
    Mock::given(method("POST"))
        .and(path("/wapi/json"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "response": {
                "code": 2051,
                "result": "Access not allowed from this IP address",
                "svTRID": "1700000000.0002"
            }
        })))
        .mount(&harness.wapi)
        .await;

    let reply = post_challenge(&harness, &challenge("Present", bob_config())).await;

    assert_eq!(reply["response"]["success"], false);
    let message = reply["response"]["status"]["message"].as_str().unwrap();
    assert!(message.contains("2051"));
    assert!(message.contains("Access not allowed"));
}

#[tokio::test]
async fn test_cleanup_without_record_succeeds() {
    let harness = start_harness().await;
    mount_wapi(&harness.wapi, "dns-rows-list", json!({ "row": [] }), 1).await;
    mount_wapi(&harness.wapi, "dns-row-delete", json!({}), 0).await;
    mount_wapi(&harness.wapi, "dns-domain-commit", json!({}), 0).await;

    let reply = post_challenge(&harness, &challenge("CleanUp", bob_config())).await;

    assert_eq!(reply["response"]["success"], true);
}
