//! Reply extraction from provider responses
//!
//! Upstream bodies come from OpenAI, Anthropic, or whatever proxy sits in
//! front of them, so their shape is not under our control. Each known shape
//! has a matcher `fn(&Value) -> Option<String>`; matchers run in a fixed
//! priority order and the first non-empty string wins. Structured shapes come
//! before the generic heuristics so an unrelated string field (a model id,
//! say) is never mistaken for the reply.

use serde_json::Value;

/// Which response shape produced the reply
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ReplyShape {
    /// `choices[0].message.content`
    ChatCompletion,
    /// `choices[0].text`
    LegacyCompletion,
    /// `output[0].content[0].text` and friends
    ResponsesOutput,
    /// top-level `completion`
    AnthropicCompletion,
    /// top-level `output` or `text` string
    ProxyText,
    /// top-level `message`, or the first string field
    Heuristic,
}

impl ReplyShape {
    pub fn as_str(&self) -> &'static str {
        match self {
            ReplyShape::ChatCompletion => "chat_completion",
            ReplyShape::LegacyCompletion => "legacy_completion",
            ReplyShape::ResponsesOutput => "responses_output",
            ReplyShape::AnthropicCompletion => "anthropic_completion",
            ReplyShape::ProxyText => "proxy_text",
            ReplyShape::Heuristic => "heuristic",
        }
    }
}

/// Whether the last-resort heuristic may be used
///
/// `Lenient` keeps the first-string-field fallback, which can return an
/// unrelated field when the shape is unknown. `Strict` skips it and lets
/// unknown shapes surface as errors.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum ShapePolicy {
    #[default]
    Lenient,
    Strict,
}

/// Reply text together with the shape it was found in
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Reply {
    pub text: String,
    pub shape: ReplyShape,
}

type Matcher = fn(&Value) -> Option<String>;

const MATCHERS: &[(ReplyShape, Matcher)] = &[
    (ReplyShape::ChatCompletion, chat_completion),
    (ReplyShape::LegacyCompletion, legacy_completion),
    (ReplyShape::ResponsesOutput, responses_output),
    (ReplyShape::AnthropicCompletion, anthropic_completion),
    (ReplyShape::ProxyText, proxy_text),
    (ReplyShape::Heuristic, heuristic),
];

/// Extract the reply text from a parsed provider response
///
/// Returns `None` when no matcher applies; callers report that as an
/// unexpected shape together with the original body.
pub fn extract_reply(value: &Value, policy: ShapePolicy) -> Option<Reply> {
    MATCHERS
        .iter()
        .filter(|(shape, _)| policy == ShapePolicy::Lenient || *shape != ReplyShape::Heuristic)
        .find_map(|(shape, matcher)| {
            matcher(value).map(|text| Reply {
                text,
                shape: *shape,
            })
        })
}

fn non_empty(value: &Value) -> Option<String> {
    value
        .as_str()
        .filter(|s| !s.is_empty())
        .map(str::to_string)
}

fn first_element(value: &Value) -> Option<&Value> {
    value.as_array().and_then(|items| items.first())
}

fn chat_completion(value: &Value) -> Option<String> {
    let choice = first_element(value.get("choices")?)?;
    non_empty(choice.get("message")?.get("content")?)
}

fn legacy_completion(value: &Value) -> Option<String> {
    let choice = first_element(value.get("choices")?)?;
    non_empty(choice.get("text")?)
}

fn responses_output(value: &Value) -> Option<String> {
    let item = ["output", "outputs"]
        .iter()
        .find_map(|key| value.get(*key).and_then(first_element))?;

    let from_content = ["content", "content_type", "data"]
        .iter()
        .find_map(|key| item.get(*key).and_then(first_element))
        .and_then(|part| part.get("text"))
        .and_then(non_empty);

    from_content.or_else(|| item.get("text").and_then(non_empty))
}

fn anthropic_completion(value: &Value) -> Option<String> {
    non_empty(value.get("completion")?)
}

fn proxy_text(value: &Value) -> Option<String> {
    value
        .get("output")
        .and_then(non_empty)
        .or_else(|| value.get("text").and_then(non_empty))
}

fn heuristic(value: &Value) -> Option<String> {
    let fields = value.as_object()?;
    fields
        .get("message")
        .and_then(non_empty)
        .or_else(|| fields.values().find_map(non_empty))
}
