//! Provider client parity
//!
//! The bespoke HTTP client and the pre-bound OpenAI client are two backings
//! of the same `ProviderClient` capability. Every test here runs once per
//! backing against a fresh mock upstream and must observe identical results.

use std::sync::Arc;
use std::time::Duration;

use pretty_assertions::assert_eq;
use serde_json::json;

use llm_relay::{
    proxy::UpstreamResponse, AppError, ChatRequest, Config, Dispatcher, HttpProviderClient,
    OpenAiSdkClient, ProviderClient,
};

use crate::common::{constants, test_config};
use crate::mocks::{body_json, header_value, MockUpstream, UpstreamTestData, CHAT_COMPLETIONS_PATH};

#[derive(Debug, Clone, Copy)]
enum Backing {
    Http,
    Sdk,
}

const BACKINGS: [Backing; 2] = [Backing::Http, Backing::Sdk];

fn client(backing: Backing, config: &Config) -> Arc<dyn ProviderClient> {
    match backing {
        Backing::Http => Arc::new(HttpProviderClient::new(reqwest::Client::new())),
        Backing::Sdk => Arc::new(OpenAiSdkClient::new(config).unwrap()),
    }
}

/// Dispatcher that always routes through the given backing
fn dispatcher(backing: Backing, config: Config) -> Dispatcher {
    let client = client(backing, &config);
    Dispatcher::new(Arc::new(config), client, None)
}

#[tokio::test]
async fn test_parity_reply() {
    for backing in BACKINGS {
        let upstream = MockUpstream::start().await;
        upstream.mock_chat_completion("hello!").await;

        let reply = dispatcher(backing, test_config(&upstream.uri()))
            .chat(&ChatRequest::new("hi"))
            .await
            .unwrap();

        assert_eq!(reply.text, "hello!", "{:?}", backing);
    }
}

#[tokio::test]
async fn test_parity_outbound_request() {
    let mut seen = Vec::new();

    for backing in BACKINGS {
        let upstream = MockUpstream::start().await;
        upstream.mock_chat_completion("ok").await;

        let mut config = test_config(&upstream.uri());
        config.static_headers = vec![("X-Customer-Id".to_string(), "cust_123".to_string())];
        dispatcher(backing, config)
            .chat(&ChatRequest::new("Compare me"))
            .await
            .unwrap();

        let request = upstream.single_request().await;
        assert_eq!(request.url.path(), CHAT_COMPLETIONS_PATH, "{:?}", backing);
        seen.push((
            header_value(&request, "authorization"),
            header_value(&request, "content-type"),
            header_value(&request, "x-customer-id"),
            body_json(&request),
        ));
    }

    assert_eq!(seen[0], seen[1]);
    assert_eq!(
        seen[0].0,
        Some(format!("Bearer {}", constants::TEST_OPENAI_API_KEY))
    );
    assert_eq!(seen[0].2.as_deref(), Some("cust_123"));
    assert_eq!(seen[0].3["messages"][1]["content"], json!("Compare me"));
}

#[tokio::test]
async fn test_parity_raw_response() {
    for backing in BACKINGS {
        let upstream = MockUpstream::start().await;
        upstream.mock_chat_raw(418, "short and stout").await;

        let config = test_config(&upstream.uri());
        let outbound = dispatcher(backing, config.clone())
            .prepare(&ChatRequest::new("hi"))
            .unwrap();

        let response = client(backing, &config).send(&outbound).await.unwrap();
        assert_eq!(
            response,
            UpstreamResponse {
                status: 418,
                body: "short and stout".to_string()
            },
            "{:?}",
            backing
        );
    }
}

#[tokio::test]
async fn test_parity_unexpected_shape() {
    for backing in BACKINGS {
        let upstream = MockUpstream::start().await;
        upstream.mock_chat_json(200, json!({"choices": []})).await;

        let err = dispatcher(backing, test_config(&upstream.uri()))
            .chat(&ChatRequest::new("hi"))
            .await
            .unwrap_err();

        assert!(
            matches!(err, AppError::UnexpectedShape { status: 200, ref body } if *body == json!({"choices": []})),
            "{:?}: {:?}",
            backing,
            err
        );
    }
}

#[tokio::test]
async fn test_parity_not_json() {
    for backing in BACKINGS {
        let upstream = MockUpstream::start().await;
        upstream.mock_chat_raw(502, "Bad Gateway").await;

        let err = dispatcher(backing, test_config(&upstream.uri()))
            .chat(&ChatRequest::new("hi"))
            .await
            .unwrap_err();

        assert!(
            matches!(err, AppError::UpstreamNotJson { status: 502, ref details } if details == "Bad Gateway"),
            "{:?}: {:?}",
            backing,
            err
        );
    }
}

#[tokio::test]
async fn test_parity_connection_failure() {
    for backing in BACKINGS {
        let err = dispatcher(backing, test_config(constants::UNREACHABLE_URL))
            .chat(&ChatRequest::new("hi"))
            .await
            .unwrap_err();

        assert!(
            matches!(err, AppError::Transport { timed_out: false, .. }),
            "{:?}: {:?}",
            backing,
            err
        );
    }
}

#[tokio::test]
async fn test_parity_timeout() {
    for backing in BACKINGS {
        let upstream = MockUpstream::start().await;
        upstream
            .mock_chat_delayed("too late", Duration::from_secs(3))
            .await;

        let mut config = test_config(&upstream.uri());
        config.request_timeout_secs = 1;
        let err = dispatcher(backing, config)
            .chat(&ChatRequest::new("hi"))
            .await
            .unwrap_err();

        assert!(
            matches!(err, AppError::Transport { timed_out: true, .. }),
            "{:?}: {:?}",
            backing,
            err
        );
    }
}

#[tokio::test]
async fn test_parity_legacy_completion_reply() {
    for backing in BACKINGS {
        let upstream = MockUpstream::start().await;
        upstream
            .mock_chat_json(200, UpstreamTestData::legacy_completion("legacy"))
            .await;

        let reply = dispatcher(backing, test_config(&upstream.uri()))
            .chat(&ChatRequest::new("hi"))
            .await
            .unwrap();

        assert_eq!(reply.text, "legacy", "{:?}", backing);
    }
}
