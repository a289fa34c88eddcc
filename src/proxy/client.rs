//! Bespoke HTTP backing for `ProviderClient`
//!
//! Posts the prepared body to the prepared endpoint with exactly the composed
//! headers. Works for every provider and is the path taken whenever a request
//! carries metadata.

use async_trait::async_trait;

use crate::{
    error::{AppError, AppResult},
    proxy::provider::{OutboundRequest, ProviderClient, UpstreamResponse},
};

/// Direct HTTP client for provider calls
#[derive(Debug, Clone)]
pub struct HttpProviderClient {
    client: reqwest::Client,
}

impl HttpProviderClient {
    /// Create a new client sharing the given connection pool
    pub fn new(client: reqwest::Client) -> Self {
        Self { client }
    }
}

#[async_trait]
impl ProviderClient for HttpProviderClient {
    fn name(&self) -> &'static str {
        "http"
    }

    async fn send(&self, request: &OutboundRequest) -> AppResult<UpstreamResponse> {
        let response = self
            .client
            .post(&request.endpoint)
            .headers(request.headers.clone())
            .json(&request.body)
            .timeout(request.timeout)
            .send()
            .await
            .map_err(|e| AppError::transport(&e))?;

        read_response(response).await
    }
}

/// Read status and body text from an upstream response
///
/// Failing to read the body (for example a timeout mid-body) is a transport
/// error like any other.
pub(crate) async fn read_response(response: reqwest::Response) -> AppResult<UpstreamResponse> {
    let status = response.status().as_u16();
    let body = response.text().await.map_err(|e| AppError::transport(&e))?;
    Ok(UpstreamResponse { status, body })
}
