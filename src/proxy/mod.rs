//! Proxy module
//!
//! Handles request preparation and forwarding to upstream AI providers, and
//! turning their answers into replies.

pub mod client;
pub mod dispatch;
pub mod headers;
pub mod logging;
pub mod openai;
pub mod provider;
pub mod request;

pub use client::HttpProviderClient;
pub use dispatch::{normalize, Dispatcher};
pub use openai::OpenAiSdkClient;
pub use provider::{OutboundRequest, ProviderClient, ProviderKind, UpstreamResponse};
pub use request::{build_request, RequestBody, RequestDefaults};
