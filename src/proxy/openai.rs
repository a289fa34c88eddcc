//! Pre-bound OpenAI client
//!
//! A client wrapper in the style of the vendor SDKs: the base URL, the API key
//! and the static proxy headers are bound once at construction, and callers
//! only hand over a typed chat-completions request. It returns the raw
//! upstream body, exactly like [`HttpProviderClient`], so both paths feed the
//! same reply extraction.
//!
//! [`HttpProviderClient`]: crate::proxy::HttpProviderClient

use std::time::Duration;

use anyhow::Context;
use async_trait::async_trait;

use crate::{
    config::Config,
    error::{AppError, AppResult},
    proxy::{
        client::read_response,
        headers::{compose_headers, Credential},
        provider::{OutboundRequest, ProviderClient, ProviderKind, UpstreamResponse},
        request::ChatCompletionRequest,
    },
    types::Metadata,
};

/// OpenAI chat-completions client bound to one base URL and header set
#[derive(Debug, Clone)]
pub struct OpenAiSdkClient {
    client: reqwest::Client,
    base_url: String,
}

impl OpenAiSdkClient {
    /// Create a client from configuration
    ///
    /// Default headers are the OpenAI credential plus the static proxy
    /// headers, the same set the header composer produces for a request
    /// without metadata.
    pub fn new(config: &Config) -> anyhow::Result<Self> {
        let credential = Credential {
            api_key: &config.openai_api_key,
            anthropic_version: None,
        };
        let default_headers = compose_headers(
            ProviderKind::OpenAi,
            credential,
            &config.static_headers,
            &Metadata::new(),
        );

        let client = reqwest::Client::builder()
            .default_headers(default_headers)
            .timeout(Duration::from_secs(config.request_timeout_secs))
            .build()
            .context("Failed to build OpenAI client")?;

        Ok(Self {
            client,
            base_url: config.proxy_url.trim_end_matches('/').to_string(),
        })
    }

    /// URL of the chat-completions endpoint
    pub fn chat_completions_url(&self) -> String {
        format!("{}/chat/completions", self.base_url)
    }

    /// Create a chat completion
    pub async fn create_chat_completion(
        &self,
        request: &ChatCompletionRequest,
        timeout: Duration,
    ) -> AppResult<UpstreamResponse> {
        let response = self
            .client
            .post(self.chat_completions_url())
            .json(request)
            .timeout(timeout)
            .send()
            .await
            .map_err(|e| AppError::transport(&e))?;

        read_response(response).await
    }
}

#[async_trait]
impl ProviderClient for OpenAiSdkClient {
    fn name(&self) -> &'static str {
        "sdk"
    }

    async fn send(&self, request: &OutboundRequest) -> AppResult<UpstreamResponse> {
        if request.provider != ProviderKind::OpenAi {
            return Err(AppError::Internal(anyhow::anyhow!(
                "OpenAI client cannot send {} requests",
                request.provider
            )));
        }

        let typed: ChatCompletionRequest = serde_json::from_value(request.body.clone())
            .context("Request body is not a chat completion")?;

        self.create_chat_completion(&typed, request.timeout).await
    }
}
