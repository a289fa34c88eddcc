//! Anthropic path integration tests
//!
//! Provider selection through metadata or the configured default, the
//! credential check, and the legacy completion request.

use axum::http::StatusCode;
use pretty_assertions::assert_eq;
use serde_json::{json, Value};

use crate::common::{constants, TestHarness};
use crate::mocks::{body_json, header_value, COMPLETE_PATH};

async fn anthropic_harness() -> TestHarness {
    TestHarness::with_config(|config| {
        config.anthropic_api_key = Some(constants::TEST_ANTHROPIC_API_KEY.to_string());
    })
    .await
}

#[tokio::test]
async fn test_anthropic_without_key_is_rejected_before_any_call() {
    let harness = TestHarness::new().await;
    harness.upstream.mock_anthropic_completion("unused").await;
    harness.upstream.mock_chat_completion("unused").await;

    let response = harness
        .server
        .post("/chat")
        .json(&json!({"message": "hi", "metadata": {"provider": "anthropic"}}))
        .await;

    response.assert_status(StatusCode::BAD_REQUEST);
    assert_eq!(
        response.json::<Value>(),
        json!({"error": "Anthropic provider requested but ANTHROPIC_API_KEY not set"})
    );
    assert_eq!(harness.upstream.call_count().await, 0);
}

#[tokio::test]
async fn test_claude_alias_selects_anthropic() {
    let harness = anthropic_harness().await;
    harness.upstream.mock_anthropic_completion(" Hi there").await;

    let response = harness
        .server
        .post("/chat")
        .json(&json!({"message": "hi", "metadata": {"provider": "Claude"}}))
        .await;

    response.assert_status_ok();
    assert_eq!(response.json::<Value>(), json!({"reply": " Hi there"}));

    let request = harness.upstream.single_request().await;
    assert_eq!(request.url.path(), COMPLETE_PATH);
}

#[tokio::test]
async fn test_anthropic_request_headers_and_body() {
    let harness = anthropic_harness().await;
    harness.upstream.mock_anthropic_completion("ok").await;

    harness
        .server
        .post("/chat")
        .json(&json!({
            "message": "Tell me a joke",
            "metadata": {"provider": "anthropic", "anthropic_model": "claude-instant-1"}
        }))
        .await
        .assert_status_ok();

    let request = harness.upstream.single_request().await;
    assert_eq!(
        header_value(&request, "x-api-key").as_deref(),
        Some(constants::TEST_ANTHROPIC_API_KEY)
    );
    assert_eq!(
        header_value(&request, "authorization"),
        Some(format!("Bearer {}", constants::TEST_ANTHROPIC_API_KEY))
    );
    assert_eq!(
        header_value(&request, "anthropic-version").as_deref(),
        Some("2023-06-01")
    );
    assert_eq!(
        body_json(&request),
        json!({
            "model": "claude-instant-1",
            "prompt": "You are a helpful assistant.\n\nHuman: Tell me a joke\n\nAssistant:",
            "max_tokens_to_sample": 500,
            "temperature": 0.7
        })
    );
}

#[tokio::test]
async fn test_default_provider_applies_without_metadata() {
    let harness = TestHarness::with_config(|config| {
        config.anthropic_api_key = Some(constants::TEST_ANTHROPIC_API_KEY.to_string());
        config.default_provider = Some("anthropic".to_string());
    })
    .await;
    harness.upstream.mock_anthropic_completion("from claude").await;

    let response = harness.server.post("/chat").json(&json!({"message": "hi"})).await;

    response.assert_status_ok();
    assert_eq!(response.json::<Value>(), json!({"reply": "from claude"}));
}

#[tokio::test]
async fn test_metadata_provider_overrides_default() {
    let harness = TestHarness::with_config(|config| {
        config.anthropic_api_key = Some(constants::TEST_ANTHROPIC_API_KEY.to_string());
        config.default_provider = Some("anthropic".to_string());
    })
    .await;
    harness.upstream.mock_chat_completion("from openai").await;

    let response = harness
        .server
        .post("/chat")
        .json(&json!({"message": "hi", "metadata": {"provider": "OpenAI"}}))
        .await;

    response.assert_status_ok();
    assert_eq!(response.json::<Value>(), json!({"reply": "from openai"}));
}
