//! llm-relay - single-endpoint chat gateway for LLM providers
//!
//! Accepts a chat message, relays it to an OpenAI- or Anthropic-compatible
//! upstream (optionally through a billing proxy), and normalizes whatever
//! the upstream answers into `{"reply": ...}`.

pub mod config;
pub mod error;
pub mod proxy;
pub mod reply;
pub mod routes;
pub mod types;

use std::sync::Arc;
use std::time::{Duration, Instant};

use anyhow::Result;

pub use crate::config::Config;
pub use crate::error::{AppError, AppResult};
pub use crate::proxy::{Dispatcher, HttpProviderClient, OpenAiSdkClient, ProviderClient, ProviderKind};
pub use crate::reply::{extract_reply, Reply, ReplyShape, ShapePolicy};
pub use crate::types::{ChatReply, ChatRequest, Metadata};

/// Application state shared across all request handlers
pub struct AppState {
    pub config: Arc<Config>,
    pub dispatcher: Dispatcher,
    pub start_time: Instant,
}

impl AppState {
    /// Create a new application state
    pub fn new(config: Config) -> Result<Self> {
        let config = Arc::new(config);

        // Initialize HTTP client with connection pooling
        let http_client = reqwest::Client::builder()
            .pool_max_idle_per_host(100)
            .timeout(Duration::from_secs(config.request_timeout_secs))
            .build()?;

        let dispatcher = Dispatcher::from_config(config.clone(), http_client)?;

        Ok(Self::with_dispatcher(config, dispatcher))
    }

    /// Create an application state around an existing dispatcher
    ///
    /// Lets tests substitute the provider clients.
    pub fn with_dispatcher(config: Arc<Config>, dispatcher: Dispatcher) -> Self {
        Self {
            config,
            dispatcher,
            start_time: Instant::now(),
        }
    }
}
