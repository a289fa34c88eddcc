//! Configuration management for llm-relay
//!
//! Configuration is loaded from environment variables once at startup and is
//! read-only afterwards.

use std::env;
use std::net::{IpAddr, SocketAddr};
use std::str::FromStr;

use anyhow::{Context, Result};
use tracing::warn;

use crate::{
    proxy::{ProviderKind, RequestDefaults},
    reply::ShapePolicy,
};

/// Header under which the billing proxy API key is sent
pub const BILLING_KEY_HEADER: &str = "X-API-Key";

/// Application configuration
#[derive(Debug, Clone)]
pub struct Config {
    /// Host to bind to
    pub host: String,
    /// Port to listen on
    pub port: u16,

    /// OpenAI API key
    pub openai_api_key: String,
    /// Base URL for OpenAI-compatible calls (official API or billing proxy)
    pub proxy_url: String,
    /// Static headers sent with every upstream call, in configuration order
    pub static_headers: Vec<(String, String)>,

    /// Anthropic API key (Anthropic requests are rejected without it)
    pub anthropic_api_key: Option<String>,
    /// Base URL for Anthropic-compatible calls
    pub anthropic_base_url: String,
    /// Value of the `anthropic-version` header
    pub anthropic_version: String,

    /// Provider used when a request does not name one
    pub default_provider: Option<String>,
    /// Model, prompt and sampling defaults
    pub defaults: RequestDefaults,

    /// Upper bound on each outbound call
    pub request_timeout_secs: u64,
    /// Use the pre-bound OpenAI client for requests without metadata
    pub use_openai_sdk: bool,
    /// Whether the last-resort reply heuristic is allowed
    pub shape_policy: ShapePolicy,
}

impl Config {
    /// Load configuration from environment variables
    pub fn from_env() -> Result<Self> {
        Self::from_lookup(|key| env::var(key).ok())
    }

    /// Load configuration from an arbitrary variable source
    pub fn from_lookup<F>(lookup: F) -> Result<Self>
    where
        F: Fn(&str) -> Option<String>,
    {
        let var = |key: &str| lookup(key).filter(|v| !v.trim().is_empty());
        let defaults = RequestDefaults::default();

        let mut static_headers = var("AGENTCOST_HEADERS")
            .map(|raw| parse_static_headers(&raw))
            .unwrap_or_default();
        if let Some(billing_key) = var("AGENTCOST_API_KEY") {
            let present = static_headers
                .iter()
                .any(|(name, _)| name.eq_ignore_ascii_case(BILLING_KEY_HEADER));
            if !present {
                static_headers.push((BILLING_KEY_HEADER.to_string(), billing_key));
            }
        }

        Ok(Self {
            host: var("HOST").unwrap_or_else(|| "0.0.0.0".to_string()),
            port: parse_or(&var, "PORT", 5000)?,

            openai_api_key: var("OPENAI_API_KEY").context("OPENAI_API_KEY must be set")?,
            proxy_url: var("AGENTCOST_PROXY_URL")
                .unwrap_or_else(|| "https://api.openai.com/v1".to_string()),
            static_headers,

            anthropic_api_key: var("ANTHROPIC_API_KEY"),
            anthropic_base_url: var("ANTHROPIC_PROXY_URL")
                .or_else(|| var("ANTHROPIC_BASE_URL"))
                .unwrap_or_else(|| "https://api.anthropic.com".to_string()),
            anthropic_version: var("ANTHROPIC_VERSION")
                .unwrap_or_else(|| "2023-06-01".to_string()),

            default_provider: var("DEFAULT_PROVIDER"),
            defaults: RequestDefaults {
                system_prompt: var("SYSTEM_PROMPT").unwrap_or(defaults.system_prompt),
                openai_model: var("OPENAI_MODEL").unwrap_or(defaults.openai_model),
                anthropic_model: var("ANTHROPIC_MODEL").unwrap_or(defaults.anthropic_model),
                temperature: parse_or(&var, "DEFAULT_TEMPERATURE", defaults.temperature)?,
                max_tokens: parse_or(&var, "DEFAULT_MAX_TOKENS", defaults.max_tokens)?,
            },

            request_timeout_secs: parse_or(&var, "REQUEST_TIMEOUT_SECS", 30)?,
            use_openai_sdk: var("USE_OPENAI_SDK")
                .map(|v| is_truthy(&v))
                .unwrap_or(true),
            shape_policy: match var("REPLY_HEURISTICS") {
                Some(v) if !is_truthy(&v) => ShapePolicy::Strict,
                _ => ShapePolicy::Lenient,
            },
        })
    }

    /// Endpoint for the given provider
    pub fn endpoint_for(&self, provider: ProviderKind) -> String {
        match provider {
            ProviderKind::OpenAi => {
                format!("{}/chat/completions", self.proxy_url.trim_end_matches('/'))
            }
            ProviderKind::Anthropic => {
                format!("{}/v1/complete", self.anthropic_base_url.trim_end_matches('/'))
            }
        }
    }

    /// Address to listen on
    ///
    /// `HOST` must be an IP literal, IPv4 or IPv6 (`0.0.0.0`, `::`).
    pub fn socket_addr(&self) -> Result<SocketAddr> {
        let ip: IpAddr = self
            .host
            .trim()
            .parse()
            .with_context(|| format!("Invalid HOST: {}", self.host))?;
        Ok(SocketAddr::new(ip, self.port))
    }

    /// Whether an Anthropic credential is available
    pub fn anthropic_configured(&self) -> bool {
        self.anthropic_api_key.is_some()
    }
}

fn parse_or<T, F>(var: &F, key: &str, default: T) -> Result<T>
where
    T: FromStr,
    T::Err: std::error::Error + Send + Sync + 'static,
    F: Fn(&str) -> Option<String>,
{
    match var(key) {
        Some(raw) => raw
            .trim()
            .parse()
            .with_context(|| format!("Invalid {}", key)),
        None => Ok(default),
    }
}

fn is_truthy(value: &str) -> bool {
    matches!(
        value.trim().to_ascii_lowercase().as_str(),
        "1" | "true" | "yes"
    )
}

/// Parse `AGENTCOST_HEADERS`, a JSON object of header names to values
///
/// Invalid JSON yields no headers. Non-string values are rendered as JSON
/// text; nulls are dropped.
fn parse_static_headers(raw: &str) -> Vec<(String, String)> {
    match serde_json::from_str::<serde_json::Map<String, serde_json::Value>>(raw) {
        Ok(map) => map
            .into_iter()
            .filter_map(|(name, value)| {
                crate::types::metadata_value_text(&value).map(|text| (name, text))
            })
            .collect(),
        Err(e) => {
            warn!(error = %e, "AGENTCOST_HEADERS is not a JSON object, ignoring");
            Vec::new()
        }
    }
}
