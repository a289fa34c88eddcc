//! Chat dispatch
//!
//! Turns a validated `ChatRequest` into exactly one upstream call and the
//! upstream answer into a reply:
//!
//! 1. resolve the provider and check its credential
//! 2. compose headers and build the body
//! 3. send through a `ProviderClient`
//! 4. parse the body as JSON and extract the reply text

use std::sync::Arc;
use std::time::Duration;

use serde_json::Value;
use tracing::Instrument;

use crate::{
    config::Config,
    error::{AppError, AppResult, ANTHROPIC_NOT_CONFIGURED, NO_MESSAGE},
    proxy::{
        client::HttpProviderClient,
        headers::{compose_headers, Credential},
        logging::RequestContext,
        openai::OpenAiSdkClient,
        provider::{OutboundRequest, ProviderClient, ProviderKind, UpstreamResponse},
        request::build_request,
    },
    reply::{extract_reply, Reply, ShapePolicy},
    types::ChatRequest,
};

/// Relays chat requests to the configured providers
pub struct Dispatcher {
    config: Arc<Config>,
    http: Arc<dyn ProviderClient>,
    sdk: Option<Arc<dyn ProviderClient>>,
}

impl Dispatcher {
    /// Create a dispatcher with explicit client backings
    pub fn new(
        config: Arc<Config>,
        http: Arc<dyn ProviderClient>,
        sdk: Option<Arc<dyn ProviderClient>>,
    ) -> Self {
        Self { config, http, sdk }
    }

    /// Create a dispatcher from configuration
    ///
    /// The pre-bound OpenAI client is only built when `use_openai_sdk` is set.
    pub fn from_config(config: Arc<Config>, http_client: reqwest::Client) -> anyhow::Result<Self> {
        let http: Arc<dyn ProviderClient> = Arc::new(HttpProviderClient::new(http_client));
        let sdk: Option<Arc<dyn ProviderClient>> = if config.use_openai_sdk {
            Some(Arc::new(OpenAiSdkClient::new(&config)?))
        } else {
            None
        };
        Ok(Self::new(config, http, sdk))
    }

    /// Provider a request will be sent to
    pub fn provider_for(&self, request: &ChatRequest) -> ProviderKind {
        ProviderKind::resolve(&request.metadata, self.config.default_provider.as_deref())
    }

    /// Validate the request and prepare the upstream call
    ///
    /// Fails before any network activity when the message is blank or the
    /// selected provider has no credential.
    pub fn prepare(&self, request: &ChatRequest) -> AppResult<OutboundRequest> {
        let message = request
            .trimmed_message()
            .ok_or_else(|| AppError::Validation(NO_MESSAGE.to_string()))?;

        let provider = self.provider_for(request);

        let credential = match provider {
            ProviderKind::OpenAi => Credential {
                api_key: &self.config.openai_api_key,
                anthropic_version: None,
            },
            ProviderKind::Anthropic => Credential {
                api_key: self
                    .config
                    .anthropic_api_key
                    .as_deref()
                    .ok_or_else(|| AppError::Configuration(ANTHROPIC_NOT_CONFIGURED.to_string()))?,
                anthropic_version: Some(&self.config.anthropic_version),
            },
        };

        let headers = compose_headers(
            provider,
            credential,
            &self.config.static_headers,
            &request.metadata,
        );
        let body = build_request(provider, message, &request.metadata, &self.config.defaults);
        let model = body.model().to_string();
        let body = serde_json::to_value(&body).map_err(|e| AppError::Internal(e.into()))?;

        Ok(OutboundRequest {
            provider,
            endpoint: self.config.endpoint_for(provider),
            model,
            headers,
            body,
            timeout: Duration::from_secs(self.config.request_timeout_secs),
        })
    }

    /// Pick the client backing for a prepared request
    ///
    /// The pre-bound client is only used for OpenAI requests without
    /// metadata; its fixed header set would otherwise drop the metadata
    /// headers.
    fn client_for(&self, outbound: &OutboundRequest, request: &ChatRequest) -> &dyn ProviderClient {
        match &self.sdk {
            Some(sdk)
                if outbound.provider == ProviderKind::OpenAi && request.metadata.is_empty() =>
            {
                sdk.as_ref()
            }
            _ => self.http.as_ref(),
        }
    }

    /// Relay a chat request and return the extracted reply
    pub async fn chat(&self, request: &ChatRequest) -> AppResult<Reply> {
        let outbound = self.prepare(request)?;
        let client = self.client_for(&outbound, request);

        let ctx = RequestContext::new(outbound.provider, &outbound.endpoint)
            .with_model(&outbound.model)
            .with_client(client.name());

        let span = ctx.create_span();
        self.relay(client, &outbound, &ctx).instrument(span).await
    }

    async fn relay(
        &self,
        client: &dyn ProviderClient,
        outbound: &OutboundRequest,
        ctx: &RequestContext,
    ) -> AppResult<Reply> {
        ctx.log_request_start();
        ctx.log_outbound(&outbound.headers, &outbound.body);

        let upstream = client.send(outbound).await.map_err(|e| {
            match &e {
                AppError::Transport { timed_out: true, .. } => {
                    ctx.log_timeout(outbound.timeout.as_millis() as u64)
                }
                other => ctx.log_connection_error(&other.to_string()),
            }
            e
        })?;

        ctx.log_upstream_response(upstream.status, &upstream.body);

        let reply = normalize(&upstream, self.config.shape_policy).map_err(|e| {
            ctx.log_unusable_response(upstream.status, e.kind());
            e
        })?;
        ctx.log_reply_extracted(reply.shape);
        Ok(reply)
    }
}

/// Parse an upstream body and extract the reply
///
/// A body that is not JSON is `UpstreamNotJson`; JSON that matches no known
/// shape is `UnexpectedShape` carrying the parsed body.
pub fn normalize(upstream: &UpstreamResponse, policy: ShapePolicy) -> AppResult<Reply> {
    let parsed: Value =
        serde_json::from_str(&upstream.body).map_err(|_| AppError::UpstreamNotJson {
            status: upstream.status,
            details: upstream.body.clone(),
        })?;

    extract_reply(&parsed, policy).ok_or(AppError::UnexpectedShape {
        status: upstream.status,
        body: parsed,
    })
}
