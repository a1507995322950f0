//! Chat-call types - the request/response contract with LLM providers

use serde::{Deserialize, Serialize};

/// A single message in a chat conversation.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ChatMessage {
    /// Role: "system", "user", or "assistant"
    pub role: String,

    /// Message content
    pub content: String,
}

impl ChatMessage {
    /// Create a system message.
    pub fn system(content: impl Into<String>) -> Self {
        Self {
            role: "system".to_string(),
            content: content.into(),
        }
    }

    /// Create a user message.
    pub fn user(content: impl Into<String>) -> Self {
        Self {
            role: "user".to_string(),
            content: content.into(),
        }
    }

    /// Create an assistant message.
    pub fn assistant(content: impl Into<String>) -> Self {
        Self {
            role: "assistant".to_string(),
            content: content.into(),
        }
    }
}

/// A chat-completion request.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ChatRequest {
    /// Model to use (e.g. "gpt-4o")
    pub model: String,

    /// Conversation messages, system prompt first
    pub messages: Vec<ChatMessage>,

    /// Sampling temperature
    pub temperature: f32,

    /// Maximum tokens in the completion
    pub max_tokens: u32,
}

/// A chat-completion response, reduced to what the pipeline consumes.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ChatCompletion {
    /// Raw completion text
    pub content: String,

    /// Token accounting reported by the provider
    pub usage: TokenUsage,
}

/// Token usage for a single LLM call.
///
/// Providers occasionally omit usage data; both fields default to zero.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct TokenUsage {
    /// Tokens consumed by the prompt
    #[serde(default)]
    pub prompt_tokens: u32,

    /// Tokens produced in the completion
    #[serde(default)]
    pub completion_tokens: u32,
}
