//! OpenAI-compatible chat-completions provider
//!
//! Speaks the `/chat/completions` REST protocol. Works against the OpenAI
//! API and any compatible gateway via `with_base_url`. Deadlines are the
//! caller's responsibility (see [`crate::retry`]); this client does not
//! impose its own request timeout.

use crate::ChatError;
use async_trait::async_trait;
use codebook_domain::{ChatClient, ChatCompletion, ChatMessage, ChatRequest, TokenUsage};
use serde::{Deserialize, Serialize};
use tracing::info;

/// Default OpenAI API base URL
pub const DEFAULT_BASE_URL: &str = "https://api.openai.com/v1";

/// Chat client backed by an OpenAI-compatible HTTP API.
pub struct OpenAiChatClient {
    http: reqwest::Client,
    api_key: String,
    base_url: String,
}

/// Request body for the chat-completions endpoint
#[derive(Serialize)]
struct WireRequest<'a> {
    model: &'a str,
    messages: &'a [ChatMessage],
    temperature: f32,
    max_tokens: u32,
}

/// Response body from the chat-completions endpoint
#[derive(Deserialize)]
struct WireResponse {
    choices: Vec<WireChoice>,
    #[serde(default)]
    usage: Option<WireUsage>,
}

#[derive(Deserialize)]
struct WireChoice {
    message: WireMessage,
}

#[derive(Deserialize)]
struct WireMessage {
    #[serde(default)]
    content: Option<String>,
}

#[derive(Deserialize)]
struct WireUsage {
    #[serde(default)]
    prompt_tokens: u32,
    #[serde(default)]
    completion_tokens: u32,
}

impl OpenAiChatClient {
    /// Create a client with an explicit API key.
    pub fn new(api_key: impl Into<String>) -> Self {
        Self {
            http: reqwest::Client::new(),
            api_key: api_key.into(),
            base_url: DEFAULT_BASE_URL.to_string(),
        }
    }

    /// Create a client from the `OPENAI_API_KEY` environment variable.
    pub fn from_env() -> Result<Self, ChatError> {
        let api_key = std::env::var("OPENAI_API_KEY")
            .map_err(|_| ChatError::Config("OPENAI_API_KEY not set".to_string()))?;
        Ok(Self::new(api_key))
    }

    /// Point the client at a different base URL (gateways, proxies).
    pub fn with_base_url(mut self, base_url: impl Into<String>) -> Self {
        self.base_url = base_url.into();
        self
    }
}

#[async_trait]
impl ChatClient for OpenAiChatClient {
    type Error = ChatError;

    async fn complete_chat(&self, request: ChatRequest) -> Result<ChatCompletion, Self::Error> {
        let url = format!("{}/chat/completions", self.base_url);
        let body = WireRequest {
            model: &request.model,
            messages: &request.messages,
            temperature: request.temperature,
            max_tokens: request.max_tokens,
        };

        let response = self
            .http
            .post(&url)
            .bearer_auth(&self.api_key)
            .json(&body)
            .send()
            .await?;

        let status = response.status();
        if !status.is_success() {
            let message = response
                .text()
                .await
                .unwrap_or_else(|_| "unreadable response body".to_string());
            return Err(ChatError::Api {
                status: status.as_u16(),
                message,
            });
        }

        let wire: WireResponse = response
            .json()
            .await
            .map_err(|e| ChatError::InvalidResponse(format!("failed to parse response: {e}")))?;

        let content = wire
            .choices
            .into_iter()
            .next()
            .and_then(|choice| choice.message.content)
            .unwrap_or_default();

        let usage = wire
            .usage
            .map(|u| TokenUsage {
                prompt_tokens: u.prompt_tokens,
                completion_tokens: u.completion_tokens,
            })
            .unwrap_or_default();

        // Token accounting only; completion content is never logged.
        info!(
            model = %request.model,
            prompt_tokens = usage.prompt_tokens,
            completion_tokens = usage.completion_tokens,
            "chat completion finished"
        );

        Ok(ChatCompletion { content, usage })
    }
}
