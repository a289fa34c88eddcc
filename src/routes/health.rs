//! Health check endpoint
//!
//! `/health` reports liveness plus which providers are usable with the
//! current configuration. It never calls upstream.

use std::sync::Arc;

use axum::{extract::State, http::StatusCode, Json};
use serde::Serialize;

use crate::{proxy::ProviderKind, types::Metadata, AppState};

/// Health status enum
#[derive(Debug, Clone, Serialize, PartialEq)]
#[serde(rename_all = "lowercase")]
pub enum HealthStatus {
    Healthy,
}

/// Per-provider configuration state
#[derive(Debug, Serialize)]
pub struct ProviderStatus {
    pub configured: bool,
    pub endpoint: String,
}

/// Providers known to the gateway
#[derive(Debug, Serialize)]
pub struct Providers {
    pub openai: ProviderStatus,
    pub anthropic: ProviderStatus,
    pub default: String,
}

/// Health check response
#[derive(Debug, Serialize)]
pub struct HealthResponse {
    pub status: HealthStatus,
    pub version: String,
    pub uptime_seconds: u64,
    pub timestamp: String,
    pub providers: Providers,
}

/// Health check endpoint
pub async fn health_check(
    State(state): State<Arc<AppState>>,
) -> (StatusCode, Json<HealthResponse>) {
    let config = &state.config;
    let default = ProviderKind::resolve(&Metadata::new(), config.default_provider.as_deref());

    let response = HealthResponse {
        status: HealthStatus::Healthy,
        version: env!("CARGO_PKG_VERSION").to_string(),
        uptime_seconds: state.start_time.elapsed().as_secs(),
        timestamp: chrono::Utc::now().to_rfc3339(),
        providers: Providers {
            openai: ProviderStatus {
                configured: true,
                endpoint: config.endpoint_for(ProviderKind::OpenAi),
            },
            anthropic: ProviderStatus {
                configured: config.anthropic_configured(),
                endpoint: config.endpoint_for(ProviderKind::Anthropic),
            },
            default: default.to_string(),
        },
    };

    (StatusCode::OK, Json(response))
}
