//! Chat endpoint
//!
//! `POST /chat` takes `{"message": ..., "metadata": {...}}`, relays it to the
//! selected provider and answers `{"reply": ...}`.

use std::sync::Arc;
use std::time::Instant;

use axum::{body::Bytes, extract::State, http::StatusCode, Json};
use tracing::{info, warn};

use crate::{
    error::AppError,
    routes::metrics::record_request,
    types::{ChatReply, ChatRequest},
    AppState,
};

/// Parse the inbound body
///
/// An empty body or JSON `null` is treated as an empty request, which then
/// fails validation with the usual "No message provided".
fn parse_chat_request(body: &[u8]) -> Result<ChatRequest, AppError> {
    if body.iter().all(u8::is_ascii_whitespace) {
        return Ok(ChatRequest::default());
    }
    let value: serde_json::Value =
        serde_json::from_slice(body).map_err(|e| AppError::InvalidBody(e.to_string()))?;
    if value.is_null() {
        return Ok(ChatRequest::default());
    }
    serde_json::from_value(value).map_err(|e| AppError::InvalidBody(e.to_string()))
}

/// Handle chat requests
pub async fn chat(
    State(state): State<Arc<AppState>>,
    body: Bytes,
) -> Result<(StatusCode, Json<ChatReply>), AppError> {
    let start_time = Instant::now();
    let request = parse_chat_request(&body)?;

    let provider = state.dispatcher.provider_for(&request);

    info!(
        provider = %provider,
        message_len = %request.message.len(),
        metadata_keys = %request.metadata.iter().count(),
        "Processing chat request"
    );

    let result = state.dispatcher.chat(&request).await;
    let duration = start_time.elapsed().as_secs_f64();

    match result {
        Ok(reply) => {
            record_request("success", provider.as_str(), duration);
            info!(
                provider = %provider,
                shape = %reply.shape.as_str(),
                duration_ms = %format!("{:.2}", duration * 1000.0),
                "Chat request completed"
            );
            Ok((StatusCode::OK, Json(ChatReply::new(reply.text))))
        }
        Err(e) => {
            record_request(e.kind(), provider.as_str(), duration);
            warn!(
                provider = %provider,
                kind = %e.kind(),
                error = %e,
                "Chat request failed"
            );
            Err(e)
        }
    }
}
