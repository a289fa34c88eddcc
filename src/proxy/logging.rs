//! Request logging utilities for upstream calls
//!
//! Provides structured logging with a short correlation id so that the
//! inbound request, the upstream call and its outcome can be tied together.
//! Credential headers only ever reach the log through [`redacted`].

use std::time::Instant;

use reqwest::header::HeaderMap;
use serde_json::Value;
use tracing::{debug, error, info, warn, Span};
use uuid::Uuid;

use crate::{
    proxy::{headers::redacted, provider::ProviderKind},
    reply::ReplyShape,
};

/// Context for tracking one relayed request
#[derive(Debug, Clone)]
pub struct RequestContext {
    /// Unique identifier for this request (for log correlation)
    pub trace_id: String,
    /// When the request started
    pub start_time: Instant,
    /// Provider handling this request
    pub provider: ProviderKind,
    /// Upstream URL being called
    pub endpoint: String,
    /// Model named in the outbound body
    pub model: Option<String>,
    /// Which `ProviderClient` backing performs the call
    pub client: &'static str,
}

impl RequestContext {
    /// Create a new request context
    pub fn new(provider: ProviderKind, endpoint: &str) -> Self {
        Self {
            trace_id: Uuid::new_v4().to_string()[..8].to_string(),
            start_time: Instant::now(),
            provider,
            endpoint: endpoint.to_string(),
            model: None,
            client: "http",
        }
    }

    /// Set the model for this request
    pub fn with_model(mut self, model: impl Into<String>) -> Self {
        self.model = Some(model.into());
        self
    }

    /// Set the client backing
    pub fn with_client(mut self, client: &'static str) -> Self {
        self.client = client;
        self
    }

    /// Get elapsed time in milliseconds
    pub fn elapsed_ms(&self) -> u128 {
        self.start_time.elapsed().as_millis()
    }

    /// Log request initiation
    pub fn log_request_start(&self) {
        info!(
            trace_id = %self.trace_id,
            provider = %self.provider,
            endpoint = %self.endpoint,
            model = ?self.model,
            client = %self.client,
            "Relaying chat request"
        );
    }

    /// Log the outbound headers and payload (debug level)
    pub fn log_outbound(&self, headers: &HeaderMap, payload: &Value) {
        debug!(
            trace_id = %self.trace_id,
            headers = ?redacted(headers),
            payload = %payload,
            "Prepared upstream request"
        );
    }

    /// Log response received from upstream
    pub fn log_upstream_response(&self, status: u16, body: &str) {
        info!(
            trace_id = %self.trace_id,
            provider = %self.provider,
            status = %status,
            elapsed_ms = %self.elapsed_ms(),
            "Response received from upstream"
        );
        debug!(trace_id = %self.trace_id, body = %body, "Upstream response body");
    }

    /// Log successful extraction
    pub fn log_reply_extracted(&self, shape: ReplyShape) {
        info!(
            trace_id = %self.trace_id,
            provider = %self.provider,
            shape = %shape.as_str(),
            elapsed_ms = %self.elapsed_ms(),
            "Reply extracted"
        );
        if shape == ReplyShape::Heuristic {
            warn!(
                trace_id = %self.trace_id,
                "Reply taken from an unrecognized response shape"
            );
        }
    }

    /// Log a response that could not be turned into a reply
    pub fn log_unusable_response(&self, status: u16, reason: &str) {
        warn!(
            trace_id = %self.trace_id,
            provider = %self.provider,
            endpoint = %self.endpoint,
            status = %status,
            reason = %reason,
            elapsed_ms = %self.elapsed_ms(),
            "Upstream response unusable"
        );
    }

    /// Log connection error
    pub fn log_connection_error(&self, error: &str) {
        error!(
            trace_id = %self.trace_id,
            provider = %self.provider,
            url = %self.endpoint,
            elapsed_ms = %self.elapsed_ms(),
            error = %error,
            "Connection to upstream failed"
        );
    }

    /// Log timeout
    pub fn log_timeout(&self, timeout_ms: u64) {
        error!(
            trace_id = %self.trace_id,
            provider = %self.provider,
            endpoint = %self.endpoint,
            timeout_ms = %timeout_ms,
            elapsed_ms = %self.elapsed_ms(),
            "Request timed out"
        );
    }

    /// Create a tracing span for this request
    pub fn create_span(&self) -> Span {
        tracing::info_span!(
            "relay_request",
            trace_id = %self.trace_id,
            provider = %self.provider,
            client = %self.client,
        )
    }
}
