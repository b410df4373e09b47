// SPDX-License-Identifier: MIT
// Copyright (c) 2026 Alfred Jean LLC

#![allow(clippy::unwrap_used)]
use super::*;

#[test]
fn test_outcome_tagged_serialization() {
    let outcome = CapturedOutcome::Failure {
        kind: "auth".to_string(),
        message: "invalid key".to_string(),
    };

    let json = serde_json::to_string(&outcome).unwrap();
    assert!(json.contains("\"type\":\"failure\""));
    assert!(json.contains("\"kind\":\"auth\""));
}

#[test]
fn test_response_outcome_deserialization() {
    let json = r#"{"type":"response","text":"4"}"#;
    let outcome: CapturedOutcome = serde_json::from_str(json).unwrap();

    assert_eq!(
        outcome,
        CapturedOutcome::Response {
            text: "4".to_string()
        }
    );
    assert!(outcome.is_response());
}

#[test]
fn test_call_serialization_keeps_request() {
    let call = CapturedCall {
        seq: 3,
        timestamp: SystemTime::UNIX_EPOCH,
        elapsed_ms: 1200,
        request: CapturedRequest::new("groq:qwen-2.5-coder-32b", "be brief", "2+2?"),
        outcome: CapturedOutcome::Response {
            text: "4".to_string(),
        },
    };

    let json = serde_json::to_string(&call).unwrap();
    let parsed: CapturedCall = serde_json::from_str(&json).unwrap();

    assert_eq!(parsed.seq, 3);
    assert_eq!(parsed.elapsed_ms, 1200);
    assert_eq!(parsed.request, call.request);
}
