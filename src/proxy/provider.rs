//! Provider selection and the outbound client abstraction
//!
//! `ProviderKind` decides which upstream a request goes to. `ProviderClient`
//! is the single seam through which the outbound call is made, so the bespoke
//! HTTP path and the pre-bound client path are interchangeable.

use std::fmt;
use std::time::Duration;

use async_trait::async_trait;
use reqwest::header::HeaderMap;
use serde_json::Value;

use crate::{error::AppResult, types::Metadata};

/// Upstream provider family
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum ProviderKind {
    #[default]
    OpenAi,
    Anthropic,
}

impl ProviderKind {
    /// Parse a provider name, case-insensitively
    ///
    /// `claude` is accepted as an alias for Anthropic. Unknown names map to
    /// OpenAI.
    pub fn parse(name: &str) -> Self {
        match name.trim().to_ascii_lowercase().as_str() {
            "anthropic" | "claude" => ProviderKind::Anthropic,
            _ => ProviderKind::OpenAi,
        }
    }

    /// Resolve the provider for a request
    ///
    /// `metadata.provider` wins over the configured default, which wins over
    /// the built-in OpenAI default.
    pub fn resolve(metadata: &Metadata, configured_default: Option<&str>) -> Self {
        metadata
            .get_str("provider")
            .or_else(|| configured_default.map(str::trim).filter(|s| !s.is_empty()))
            .map(Self::parse)
            .unwrap_or_default()
    }

    /// Name used in logs and metrics labels
    pub fn as_str(&self) -> &'static str {
        match self {
            ProviderKind::OpenAi => "openai",
            ProviderKind::Anthropic => "anthropic",
        }
    }
}

impl fmt::Display for ProviderKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A fully prepared upstream call
#[derive(Debug, Clone)]
pub struct OutboundRequest {
    pub provider: ProviderKind,
    pub endpoint: String,
    /// Model named in the body
    pub model: String,
    pub headers: HeaderMap,
    pub body: Value,
    /// Bound on the whole call, connection included
    pub timeout: Duration,
}

/// Raw upstream answer, before any parsing
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UpstreamResponse {
    pub status: u16,
    pub body: String,
}

/// Trait for the component that performs the outbound call
///
/// Implementations send exactly one request and never retry. Connection
/// failures and timeouts are reported as `AppError::Transport`; any HTTP
/// status, including errors, is returned as an `UpstreamResponse` so the
/// caller can inspect the body.
#[async_trait]
pub trait ProviderClient: Send + Sync {
    /// Name of the backing, for logs
    fn name(&self) -> &'static str;

    /// Send the request and return the raw upstream response
    async fn send(&self, request: &OutboundRequest) -> AppResult<UpstreamResponse>;
}
