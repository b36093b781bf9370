// Copyright (c) 2025 Erick Bourgeois, firestoned
// SPDX-License-Identifier: MIT

//! Unit tests for `challenge.rs`

#[cfg(test)]
mod tests {
    use crate::challenge::{ChallengeAction, ChallengePayload, ChallengeRequest, ChallengeResponse};
    use serde_json::json;

    fn cert_manager_payload() -> serde_json::Value {
        json!({
            "apiVersion": "acme.example.com/v1alpha1",
            "kind": "ChallengePayload",
            "request": {
                "uid": "8f2a6b1c",
                "action": "Present",
                "type": "dns-01",
                "dnsName": "example.com",
                "key": "LoqXcYV8q5ONbJQxbmR7SCTNo3tiAXDfowyjxAjEuX0",
                "resourceNamespace": "ns1",
                "resolvedFQDN": "_acme-challenge.example.com.",
                "resolvedZone": "example.com.",
                "allowAmbientCredentials": false,
                "config": {
                    "apiUsername": "bob",
                    "apiKeySecretRef": { "name": "wedos-cred", "key": "password" }
                }
            }
        })
    }

    #[test]
    fn test_decode_cert_manager_request() {
        let payload: ChallengePayload = serde_json::from_value(cert_manager_payload()).unwrap();
        let request = payload.request.expect("request should be present");

        assert_eq!(request.uid, "8f2a6b1c");
        assert_eq!(request.action, ChallengeAction::Present);
        assert_eq!(request.challenge_type, "dns-01");
        assert_eq!(request.dns_name, "example.com");
        assert_eq!(request.resource_namespace, "ns1");
        assert_eq!(request.resolved_fqdn, "_acme-challenge.example.com.");
        assert_eq!(request.resolved_zone, "example.com.");
        assert!(request.config.is_some());
        assert!(payload.response.is_none());
    }

    #[test]
    fn test_decode_request_without_config() {
        let request: ChallengeRequest = serde_json::from_value(json!({
            "uid": "1",
            "action": "CleanUp"
        }))
        .unwrap();

        assert_eq!(request.action, ChallengeAction::CleanUp);
        assert!(request.config.is_none());
        assert!(request.key.is_empty());
    }

    #[test]
    fn test_decode_request_with_null_config() {
        let request: ChallengeRequest =
            serde_json::from_value(json!({ "uid": "1", "config": null })).unwrap();
        assert!(request.config.is_none());
    }

    #[test]
    fn test_unknown_action_is_preserved() {
        let request: ChallengeRequest =
            serde_json::from_value(json!({ "uid": "1", "action": "Rotate" })).unwrap();

        assert_eq!(request.action, ChallengeAction::Unknown("Rotate".to_string()));
        assert_eq!(request.action.to_string(), "Rotate");
        assert_eq!(serde_json::to_value(&request.action).unwrap(), json!("Rotate"));
    }

    #[test]
    fn test_metric_label_is_bounded() {
        assert_eq!(ChallengeAction::Present.metric_label(), "Present");
        assert_eq!(ChallengeAction::CleanUp.metric_label(), "CleanUp");
        assert_eq!(
            ChallengeAction::Unknown("Rotate".to_string()).metric_label(),
            "Unknown"
        );
        assert_eq!(ChallengeAction::default().metric_label(), "Unknown");
    }

    #[test]
    fn test_action_serializes_as_cert_manager_strings() {
        assert_eq!(
            serde_json::to_value(ChallengeAction::Present).unwrap(),
            json!("Present")
        );
        assert_eq!(
            serde_json::to_value(ChallengeAction::CleanUp).unwrap(),
            json!("CleanUp")
        );
    }

    #[test]
    fn test_succeeded_response_has_no_status() {
        let response = ChallengeResponse::succeeded("abc");
        let value = serde_json::to_value(&response).unwrap();

        assert_eq!(value["uid"], "abc");
        assert_eq!(value["success"], true);
        assert!(value.get("status").is_none());
    }

    #[test]
    fn test_failed_response_carries_message() {
        let response = ChallengeResponse::failed("abc", "boom");
        let value = serde_json::to_value(&response).unwrap();

        assert_eq!(value["success"], false);
        assert_eq!(value["status"]["status"], "Failure");
        assert_eq!(value["status"]["message"], "boom");
        assert_eq!(value["status"]["reason"], "InternalError");
    }

    #[test]
    fn test_respond_sets_type_meta() {
        let payload: ChallengePayload = serde_json::from_value(cert_manager_payload()).unwrap();
        let reply = ChallengePayload::respond(
            "acme.example.com",
            payload.request,
            ChallengeResponse::succeeded("8f2a6b1c"),
        );

        assert_eq!(reply.api_version, "acme.example.com/v1alpha1");
        assert_eq!(reply.kind, "ChallengePayload");
        assert!(reply.request.is_some());
        assert_eq!(reply.response.unwrap().uid, "8f2a6b1c");
    }
}
