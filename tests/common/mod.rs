//! Common test utilities for llm-relay
//!
//! Builds a complete application around a mock upstream so integration tests
//! exercise the real router, dispatcher and provider clients.

#![allow(dead_code)]

use std::sync::Arc;

use axum_test::TestServer;
use llm_relay::{
    proxy::RequestDefaults, reply::ShapePolicy, routes, AppState, Config,
};

use crate::mocks::MockUpstream;

/// Test configuration constants
pub mod constants {
    /// Test API key for OpenAI
    pub const TEST_OPENAI_API_KEY: &str = "sk-test-openai";
    /// Test API key for Anthropic
    pub const TEST_ANTHROPIC_API_KEY: &str = "sk-ant-test";
    /// Test billing proxy key
    pub const TEST_BILLING_KEY: &str = "ac-test-key";
    /// Address nothing listens on, for connection failures
    pub const UNREACHABLE_URL: &str = "http://127.0.0.1:1";
}

/// Configuration pointing both providers at the given base URL
///
/// Anthropic is left unconfigured; tests opt in by setting the key.
pub fn test_config(upstream_url: &str) -> Config {
    Config {
        host: "127.0.0.1".to_string(),
        port: 0,
        openai_api_key: constants::TEST_OPENAI_API_KEY.to_string(),
        proxy_url: upstream_url.to_string(),
        static_headers: vec![],
        anthropic_api_key: None,
        anthropic_base_url: upstream_url.to_string(),
        anthropic_version: "2023-06-01".to_string(),
        default_provider: None,
        defaults: RequestDefaults::default(),
        request_timeout_secs: 30,
        use_openai_sdk: true,
        shape_policy: ShapePolicy::Lenient,
    }
}

/// Test harness for end-to-end gateway tests
///
/// # Example
///
/// ```ignore
/// let harness = TestHarness::new().await;
/// harness.upstream.mock_chat_completion("hello!").await;
///
/// let response = harness.server
///     .post("/chat")
///     .json(&json!({"message": "hi"}))
///     .await;
/// ```
pub struct TestHarness {
    pub server: TestServer,
    pub upstream: MockUpstream,
}

impl TestHarness {
    /// Harness with the default test configuration
    pub async fn new() -> Self {
        Self::with_config(|_| {}).await
    }

    /// Harness with a customized configuration
    pub async fn with_config(customize: impl FnOnce(&mut Config)) -> Self {
        let upstream = MockUpstream::start().await;

        let mut config = test_config(&upstream.uri());
        customize(&mut config);

        let state = Arc::new(AppState::new(config).expect("Failed to build app state"));
        let app = routes::create_router(state);
        let server = TestServer::new(app).expect("Failed to create test server");

        Self { server, upstream }
    }
}
