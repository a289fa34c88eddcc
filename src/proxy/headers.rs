//! Outbound header composition for AI provider requests
//!
//! Headers are merged in three layers, later layers overriding earlier ones:
//! provider credentials, static proxy headers from configuration, and
//! headers derived from per-request metadata (`agent_name` -> `X-Agent-Name`).
//!
//! Client headers are never forwarded upstream.

use reqwest::header::{HeaderMap, HeaderName, HeaderValue, AUTHORIZATION, CONTENT_TYPE};
use tracing::warn;

use crate::{
    proxy::provider::ProviderKind,
    types::{metadata_value_text, Metadata},
};

/// Header carrying the Anthropic API key
pub const X_API_KEY: &str = "x-api-key";

/// Header carrying the Anthropic API version
pub const ANTHROPIC_VERSION: &str = "anthropic-version";

/// Placeholder shown instead of credential values in logs
pub const REDACTED: &str = "REDACTED";

/// Credential-bearing headers, matched case-insensitively
const CREDENTIAL_HEADERS: &[&str] = &["authorization", X_API_KEY];

/// Provider credential used for the outbound call
#[derive(Debug, Clone, Copy)]
pub struct Credential<'a> {
    pub api_key: &'a str,
    /// Value for `anthropic-version`, only sent to Anthropic
    pub anthropic_version: Option<&'a str>,
}

/// Build the header set for an outbound provider call
pub fn compose_headers(
    provider: ProviderKind,
    credential: Credential<'_>,
    static_headers: &[(String, String)],
    metadata: &Metadata,
) -> HeaderMap {
    let mut headers = HeaderMap::new();
    headers.insert(CONTENT_TYPE, HeaderValue::from_static("application/json"));

    let bearer = format!("Bearer {}", credential.api_key);
    insert_header(&mut headers, AUTHORIZATION.as_str(), &bearer);

    if provider == ProviderKind::Anthropic {
        insert_header(&mut headers, X_API_KEY, credential.api_key);
        if let Some(version) = credential.anthropic_version {
            insert_header(&mut headers, ANTHROPIC_VERSION, version);
        }
    }

    for (name, value) in static_headers {
        insert_header(&mut headers, name, value);
    }

    for (key, value) in metadata.iter() {
        let Some(text) = metadata_value_text(value) else {
            continue;
        };
        insert_header(&mut headers, &metadata_header_name(key), &text);
    }

    headers
}

/// Derive a header name from a metadata key
///
/// Each `_`-separated segment is capitalized (first letter upper, rest
/// lower), segments are joined with `-`, and the result is prefixed with
/// `X-`.
pub fn metadata_header_name(key: &str) -> String {
    let segments: Vec<String> = key.split('_').map(capitalize).collect();
    format!("X-{}", segments.join("-"))
}

fn capitalize(segment: &str) -> String {
    let mut chars = segment.chars();
    match chars.next() {
        Some(first) => first.to_uppercase().chain(chars.flat_map(char::to_lowercase)).collect(),
        None => String::new(),
    }
}

/// Insert a header, replacing any existing value with the same name
///
/// Names or values that are not valid HTTP are skipped.
fn insert_header(headers: &mut HeaderMap, name: &str, value: &str) {
    let parsed = (
        HeaderName::from_bytes(name.as_bytes()),
        HeaderValue::from_str(value),
    );
    match parsed {
        (Ok(name), Ok(value)) => {
            headers.insert(name, value);
        }
        _ => warn!(header = %name, "Skipping header that is not valid HTTP"),
    }
}

/// Check whether a header carries a credential
pub fn is_credential_header(name: &HeaderName) -> bool {
    CREDENTIAL_HEADERS.contains(&name.as_str())
}

/// Copy of the headers safe for logging, with credentials replaced
pub fn redacted(headers: &HeaderMap) -> Vec<(String, String)> {
    headers
        .iter()
        .map(|(name, value)| {
            let shown = if is_credential_header(name) {
                REDACTED.to_string()
            } else {
                value.to_str().unwrap_or("<binary>").to_string()
            };
            (name.as_str().to_string(), shown)
        })
        .collect()
}
