//! Token count endpoint integration tests
//!
//! Tests for POST /count-tokens against mock Anthropic and Google APIs.

use std::time::Duration;

use axum::http::StatusCode;
use pretty_assertions::assert_eq;
use serde_json::{json, Value};

use crate::common::{
    constants::{GEMINI_FLASH, GEMINI_PRO, OPUS, SONNET},
    test_data::{conversation, count_request, single_user_message},
    TestHarness,
};

const SUPPORTED_IDS: [&str; 4] = [SONNET, OPUS, GEMINI_PRO, GEMINI_FLASH];

// =============================================================================
// End-to-end scenarios
// =============================================================================

#[tokio::test]
async fn test_anthropic_model_returns_input_tokens() {
    let harness = TestHarness::new().await;
    harness.anthropic.mock_count_tokens_success(5).await;

    let response = harness
        .server
        .post("/count-tokens")
        .json(&count_request(SONNET, single_user_message("Hello")))
        .await;

    response.assert_status_ok();
    assert_eq!(response.json::<Value>(), json!({ "inputTokens": 5 }));
}

#[tokio::test]
async fn test_google_model_returns_total_tokens_as_input_tokens() {
    let harness = TestHarness::new().await;
    harness.google.mock_count_tokens_success(GEMINI_PRO, 3).await;

    let response = harness
        .server
        .post("/count-tokens")
        .json(&count_request(GEMINI_PRO, single_user_message("Hi")))
        .await;

    response.assert_status_ok();
    assert_eq!(response.json::<Value>(), json!({ "inputTokens": 3 }));
}

#[tokio::test]
async fn test_unsupported_model_lists_every_supported_id_once() {
    let harness = TestHarness::new().await;

    let response = harness
        .server
        .post("/count-tokens")
        .json(&count_request("gpt-4", single_user_message("x")))
        .await;

    response.assert_status(StatusCode::BAD_REQUEST);
    let json: Value = response.json();
    assert_eq!(json["type"], "validation_error");

    let message = json["error"].as_str().unwrap();
    assert!(message.ends_with(&SUPPORTED_IDS.join(", ")), "{}", message);
    for id in SUPPORTED_IDS {
        assert_eq!(message.matches(id).count(), 1, "{} in {}", id, message);
    }

    assert!(harness.anthropic.received_bodies().await.is_empty());
    assert!(harness.google.received_bodies().await.is_empty());
}

#[tokio::test]
async fn test_missing_messages_is_validation_error() {
    let harness = TestHarness::new().await;

    let response = harness
        .server
        .post("/count-tokens")
        .json(&json!({ "model": SONNET }))
        .await;

    response.assert_status(StatusCode::BAD_REQUEST);
    assert_eq!(
        response.json::<Value>(),
        json!({ "error": "Messages are required", "type": "validation_error" })
    );
    assert!(harness.anthropic.received_bodies().await.is_empty());
}

// =============================================================================
// Forwarding
// =============================================================================

#[tokio::test]
async fn test_anthropic_receives_messages_verbatim() {
    let harness = TestHarness::new().await;
    harness.anthropic.mock_count_tokens_success(21).await;

    harness
        .server
        .post("/count-tokens")
        .json(&count_request(OPUS, conversation()))
        .await
        .assert_status_ok();

    let bodies = harness.anthropic.received_bodies().await;
    assert_eq!(bodies, vec![json!({ "model": OPUS, "messages": conversation() })]);
}

#[tokio::test]
async fn test_google_receives_translated_contents() {
    let harness = TestHarness::new().await;
    harness.google.mock_count_tokens_success(GEMINI_FLASH, 14).await;

    let response = harness
        .server
        .post("/count-tokens")
        .json(&count_request(GEMINI_FLASH, conversation()))
        .await;

    response.assert_status_ok();
    assert_eq!(response.json::<Value>(), json!({ "inputTokens": 14 }));

    let bodies = harness.google.received_bodies().await;
    assert_eq!(
        bodies,
        vec![json!({
            "contents": [
                { "role": "user", "parts": [{ "text": "What is the capital of France?" }] },
                { "role": "model", "parts": [{ "text": "Paris." }] },
                { "role": "user", "parts": [{ "text": "And of Italy?" }] }
            ]
        })]
    );
}

#[tokio::test]
async fn test_same_request_twice_yields_same_count() {
    let harness = TestHarness::new().await;
    harness.anthropic.mock_count_tokens_success(9).await;
    let request = count_request(SONNET, conversation());

    let first: Value = harness.server.post("/count-tokens").json(&request).await.json();
    let second: Value = harness.server.post("/count-tokens").json(&request).await.json();

    assert_eq!(first, json!({ "inputTokens": 9 }));
    assert_eq!(first, second);
    assert_eq!(harness.anthropic.received_bodies().await.len(), 2);
}

// =============================================================================
// Validation
// =============================================================================

#[tokio::test]
async fn test_null_messages_is_validation_error() {
    let harness = TestHarness::new().await;

    let response = harness
        .server
        .post("/count-tokens")
        .json(&json!({ "model": GEMINI_PRO, "messages": null }))
        .await;

    response.assert_status(StatusCode::BAD_REQUEST);
    assert_eq!(response.json::<Value>()["type"], "validation_error");
}

#[tokio::test]
async fn test_empty_messages_are_rejected_before_forwarding() {
    let harness = TestHarness::new().await;
    harness.anthropic.mock_count_tokens_success(0).await;

    let response = harness
        .server
        .post("/count-tokens")
        .json(&count_request(SONNET, json!([])))
        .await;

    response.assert_status(StatusCode::BAD_REQUEST);
    assert_eq!(
        response.json::<Value>(),
        json!({ "error": "Messages must not be empty", "type": "validation_error" })
    );
    assert!(harness.anthropic.received_bodies().await.is_empty());
}

#[tokio::test]
async fn test_missing_model_is_validation_error() {
    let harness = TestHarness::new().await;

    let response = harness
        .server
        .post("/count-tokens")
        .json(&json!({ "messages": single_user_message("x") }))
        .await;

    response.assert_status(StatusCode::BAD_REQUEST);
    let json: Value = response.json();
    assert_eq!(json["type"], "validation_error");
    assert!(json["error"].as_str().unwrap().contains(&SUPPORTED_IDS.join(", ")));
}

#[tokio::test]
async fn test_unknown_role_is_validation_error() {
    let harness = TestHarness::new().await;

    let response = harness
        .server
        .post("/count-tokens")
        .json(&count_request(
            SONNET,
            json!([{ "role": "system", "content": "be brief" }]),
        ))
        .await;

    response.assert_status(StatusCode::BAD_REQUEST);
    assert_eq!(response.json::<Value>()["type"], "validation_error");
}

#[tokio::test]
async fn test_non_json_body_is_validation_error() {
    let harness = TestHarness::new().await;

    let response = harness.server.post("/count-tokens").text("hello").await;

    response.assert_status(StatusCode::BAD_REQUEST);
    let json: Value = response.json();
    assert_eq!(json["type"], "validation_error");
    assert!(json["error"]
        .as_str()
        .unwrap()
        .starts_with("Invalid request body"));
}

// =============================================================================
// Provider failures
// =============================================================================

#[tokio::test]
async fn test_anthropic_error_keeps_status_and_message() {
    let harness = TestHarness::new().await;
    harness
        .anthropic
        .mock_count_tokens_error(
            429,
            "rate_limit_error",
            "Number of requests has exceeded your rate limit",
        )
        .await;

    let response = harness
        .server
        .post("/count-tokens")
        .json(&count_request(SONNET, single_user_message("x")))
        .await;

    response.assert_status(StatusCode::TOO_MANY_REQUESTS);
    assert_eq!(
        response.json::<Value>(),
        json!({
            "error": "Number of requests has exceeded your rate limit",
            "type": "anthropic_api_error",
            "status": 429
        })
    );
}

#[tokio::test]
async fn test_google_error_is_google_api_error() {
    let harness = TestHarness::new().await;
    harness
        .google
        .mock_count_tokens_error(400, "API key not valid. Please pass a valid API key.")
        .await;

    let response = harness
        .server
        .post("/count-tokens")
        .json(&count_request(GEMINI_PRO, single_user_message("x")))
        .await;

    response.assert_status(StatusCode::BAD_REQUEST);
    let json: Value = response.json();
    assert_eq!(json["type"], "google_api_error");
    assert_eq!(json["status"], 400);
    assert_eq!(json["error"], "API key not valid. Please pass a valid API key.");
}

#[tokio::test]
async fn test_google_error_without_json_uses_generic_message() {
    let harness = TestHarness::new().await;
    harness.google.mock_count_tokens_plain_error(503).await;

    let response = harness
        .server
        .post("/count-tokens")
        .json(&count_request(GEMINI_FLASH, single_user_message("x")))
        .await;

    response.assert_status(StatusCode::SERVICE_UNAVAILABLE);
    assert_eq!(
        response.json::<Value>(),
        json!({ "error": "Google API error", "type": "google_api_error", "status": 503 })
    );
}

#[tokio::test]
async fn test_undecodable_success_body_is_provider_error() {
    let harness = TestHarness::new().await;
    harness.anthropic.mock_count_tokens_malformed().await;

    let response = harness
        .server
        .post("/count-tokens")
        .json(&count_request(SONNET, single_user_message("x")))
        .await;

    response.assert_status(StatusCode::INTERNAL_SERVER_ERROR);
    let json: Value = response.json();
    assert_eq!(json["type"], "anthropic_api_error");
    assert_eq!(json["status"], 500);
}

#[tokio::test]
async fn test_google_success_without_total_tokens_is_provider_error() {
    let harness = TestHarness::new().await;
    harness.google.mock_count_tokens_malformed().await;

    let response = harness
        .server
        .post("/count-tokens")
        .json(&count_request(GEMINI_PRO, single_user_message("Hello world")))
        .await;

    response.assert_status(StatusCode::INTERNAL_SERVER_ERROR);
    let json: Value = response.json();
    assert_eq!(json["type"], "google_api_error");
    assert_eq!(json["status"], 500);
    assert!(json.get("inputTokens").is_none());
}

#[tokio::test]
async fn test_missing_anthropic_key_fails_as_anthropic_error() {
    let harness = TestHarness::with_config(|config| config.anthropic_api_key = None).await;
    harness.anthropic.mock_count_tokens_success(5).await;

    let response = harness
        .server
        .post("/count-tokens")
        .json(&count_request(SONNET, single_user_message("x")))
        .await;

    response.assert_status(StatusCode::INTERNAL_SERVER_ERROR);
    assert_eq!(
        response.json::<Value>(),
        json!({
            "error": "ANTHROPIC_API_KEY is not configured",
            "type": "anthropic_api_error",
            "status": 500
        })
    );
    assert!(harness.anthropic.received_bodies().await.is_empty());
}

#[tokio::test]
async fn test_missing_google_key_does_not_affect_anthropic() {
    let harness = TestHarness::with_config(|config| config.google_api_key = None).await;
    harness.anthropic.mock_count_tokens_success(4).await;

    let google = harness
        .server
        .post("/count-tokens")
        .json(&count_request(GEMINI_PRO, single_user_message("x")))
        .await;
    assert_eq!(google.json::<Value>()["type"], "google_api_error");

    let anthropic = harness
        .server
        .post("/count-tokens")
        .json(&count_request(SONNET, single_user_message("x")))
        .await;
    anthropic.assert_status_ok();
    assert_eq!(anthropic.json::<Value>(), json!({ "inputTokens": 4 }));
}

#[tokio::test]
async fn test_unreachable_provider_is_provider_error() {
    // Nothing listens on the discard port
    let harness = TestHarness::with_config(|config| {
        config.google_api_url = "http://127.0.0.1:9".to_string();
    })
    .await;

    let response = harness
        .server
        .post("/count-tokens")
        .json(&count_request(GEMINI_PRO, single_user_message("x")))
        .await;

    response.assert_status(StatusCode::INTERNAL_SERVER_ERROR);
    let json: Value = response.json();
    assert_eq!(json["type"], "google_api_error");
    assert_eq!(json["status"], 500);
}

#[tokio::test]
async fn test_slow_provider_hits_configured_timeout() {
    let harness = TestHarness::with_config(|config| config.provider_timeout_seconds = 1).await;
    harness
        .google
        .mock_count_tokens_delayed(3, Duration::from_secs(3))
        .await;

    let response = harness
        .server
        .post("/count-tokens")
        .json(&count_request(GEMINI_PRO, single_user_message("x")))
        .await;

    response.assert_status(StatusCode::INTERNAL_SERVER_ERROR);
    assert_eq!(response.json::<Value>()["type"], "google_api_error");
}
