//! Provider request bodies
//!
//! OpenAI-compatible targets get a chat-completions body with a system and a
//! user message. Anthropic-compatible targets get a legacy `/v1/complete`
//! body where the system prompt and message are flattened into one prompt.

use serde::{Deserialize, Serialize};

use crate::{proxy::provider::ProviderKind, types::Metadata};

/// Defaults applied when the request metadata does not override them
#[derive(Debug, Clone, PartialEq)]
pub struct RequestDefaults {
    pub system_prompt: String,
    pub openai_model: String,
    pub anthropic_model: String,
    pub temperature: f64,
    pub max_tokens: u32,
}

impl Default for RequestDefaults {
    fn default() -> Self {
        Self {
            system_prompt: "You are a helpful assistant.".to_string(),
            openai_model: "gpt-3.5-turbo".to_string(),
            anthropic_model: "claude-2".to_string(),
            temperature: 0.7,
            max_tokens: 500,
        }
    }
}

/// Chat message role
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Role {
    System,
    User,
}

/// Chat message
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ChatMessage {
    pub role: Role,
    pub content: String,
}

/// OpenAI chat completions request
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ChatCompletionRequest {
    pub model: String,
    pub messages: Vec<ChatMessage>,
    pub temperature: f64,
    pub max_tokens: u32,
}

/// Anthropic legacy completion request
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CompleteRequest {
    pub model: String,
    pub prompt: String,
    pub max_tokens_to_sample: u32,
    pub temperature: f64,
}

/// Body sent to the selected provider
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(untagged)]
pub enum RequestBody {
    OpenAi(ChatCompletionRequest),
    Anthropic(CompleteRequest),
}

impl RequestBody {
    /// Model named in the body
    pub fn model(&self) -> &str {
        match self {
            RequestBody::OpenAi(body) => &body.model,
            RequestBody::Anthropic(body) => &body.model,
        }
    }
}

/// Flatten a system prompt and message into an Anthropic completion prompt
pub fn anthropic_prompt(system_prompt: &str, message: &str) -> String {
    format!("{system_prompt}\n\nHuman: {message}\n\nAssistant:")
}

/// Build the provider-specific request body
pub fn build_request(
    provider: ProviderKind,
    message: &str,
    metadata: &Metadata,
    defaults: &RequestDefaults,
) -> RequestBody {
    match provider {
        ProviderKind::OpenAi => RequestBody::OpenAi(ChatCompletionRequest {
            model: metadata
                .get_str("model")
                .unwrap_or(&defaults.openai_model)
                .to_string(),
            messages: vec![
                ChatMessage {
                    role: Role::System,
                    content: defaults.system_prompt.clone(),
                },
                ChatMessage {
                    role: Role::User,
                    content: message.to_string(),
                },
            ],
            temperature: metadata
                .get_f64("temperature")
                .unwrap_or(defaults.temperature),
            max_tokens: metadata
                .get_u32("max_tokens")
                .unwrap_or(defaults.max_tokens),
        }),
        ProviderKind::Anthropic => RequestBody::Anthropic(CompleteRequest {
            model: metadata
                .get_str("anthropic_model")
                .unwrap_or(&defaults.anthropic_model)
                .to_string(),
            prompt: anthropic_prompt(&defaults.system_prompt, message),
            max_tokens_to_sample: defaults.max_tokens,
            temperature: defaults.temperature,
        }),
    }
}
