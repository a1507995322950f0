//! Codebook LLM Provider Layer
//!
//! Implementations of the `ChatClient` trait from `codebook-domain`, plus
//! the generic retry executor that wraps chat calls.
//!
//! # Providers
//!
//! - `MockChatClient`: deterministic mock for testing
//! - `OpenAiChatClient`: OpenAI-compatible chat-completions REST API
//!
//! # Examples
//!
//! ```
//! use codebook_domain::{ChatClient, ChatMessage, ChatRequest};
//! use codebook_llm::MockChatClient;
//!
//! # tokio_test::block_on(async {
//! let client = MockChatClient::new("[]");
//! let request = ChatRequest {
//!     model: "gpt-4o".to_string(),
//!     messages: vec![ChatMessage::user("test prompt")],
//!     temperature: 0.7,
//!     max_tokens: 1000,
//! };
//! let completion = client.complete_chat(request).await.unwrap();
//! assert_eq!(completion.content, "[]");
//! # });
//! ```

#![warn(missing_docs)]

pub mod openai;
pub mod retry;

use async_trait::async_trait;
use codebook_domain::{ChatClient, ChatCompletion, ChatRequest, TokenUsage};
use std::collections::HashMap;
use std::sync::{Arc, Mutex};
use thiserror::Error;

pub use openai::OpenAiChatClient;
pub use retry::{call_with_retry, RetryError, RetryPolicy};

/// Errors that can occur during chat operations
#[derive(Error, Debug)]
pub enum ChatError {
    /// Network or transport error
    #[error("communication error: {0}")]
    Communication(#[from] reqwest::Error),

    /// Non-success HTTP status from the provider
    #[error("API error: HTTP {status}: {message}")]
    Api {
        /// HTTP status code returned by the provider
        status: u16,
        /// Response body or a placeholder when unreadable
        message: String,
    },

    /// Response body did not match the expected shape
    #[error("invalid response: {0}")]
    InvalidResponse(String),

    /// Client-side configuration problem
    #[error("configuration error: {0}")]
    Config(String),

    /// Generic error (used by mocks and adapters)
    #[error("LLM error: {0}")]
    Other(String),
}

/// Mock chat client for deterministic testing
///
/// Returns pre-configured completions without any network calls. Responses
/// can be keyed by the last user message, and the client can be scripted to
/// fail a number of leading calls to exercise retry paths.
///
/// # Examples
///
/// ```
/// use codebook_domain::{ChatClient, ChatMessage, ChatRequest};
/// use codebook_llm::MockChatClient;
///
/// # tokio_test::block_on(async {
/// let mut client = MockChatClient::new("default");
/// client.add_response("prompt one", "response one");
///
/// let request = ChatRequest {
///     model: "gpt-4o".to_string(),
///     messages: vec![ChatMessage::user("prompt one")],
///     temperature: 0.0,
///     max_tokens: 100,
/// };
/// assert_eq!(client.complete_chat(request).await.unwrap().content, "response one");
/// assert_eq!(client.call_count(), 1);
/// # });
/// ```
#[derive(Debug, Clone)]
pub struct MockChatClient {
    default_response: String,
    usage: TokenUsage,
    responses: Arc<Mutex<HashMap<String, String>>>,
    failures_remaining: Arc<Mutex<u32>>,
    call_count: Arc<Mutex<usize>>,
}

impl MockChatClient {
    /// Create a mock returning a fixed completion for all requests.
    pub fn new(response: impl Into<String>) -> Self {
        Self {
            default_response: response.into(),
            usage: TokenUsage {
                prompt_tokens: 100,
                completion_tokens: 50,
            },
            responses: Arc::new(Mutex::new(HashMap::new())),
            failures_remaining: Arc::new(Mutex::new(0)),
            call_count: Arc::new(Mutex::new(0)),
        }
    }

    /// Create a mock that fails the first `times` calls, then succeeds.
    pub fn failing(times: u32, response: impl Into<String>) -> Self {
        let client = Self::new(response);
        *client.failures_remaining.lock().unwrap() = times;
        client
    }

    /// Override the token usage reported with each completion.
    pub fn with_usage(mut self, prompt_tokens: u32, completion_tokens: u32) -> Self {
        self.usage = TokenUsage {
            prompt_tokens,
            completion_tokens,
        };
        self
    }

    /// Add a specific completion for a given user-message content.
    pub fn add_response(&mut self, user_content: impl Into<String>, response: impl Into<String>) {
        self.responses
            .lock()
            .unwrap()
            .insert(user_content.into(), response.into());
    }

    /// Number of times `complete_chat` was called.
    pub fn call_count(&self) -> usize {
        *self.call_count.lock().unwrap()
    }
}

#[async_trait]
impl ChatClient for MockChatClient {
    type Error = ChatError;

    async fn complete_chat(&self, request: ChatRequest) -> Result<ChatCompletion, Self::Error> {
        *self.call_count.lock().unwrap() += 1;

        {
            let mut failures = self.failures_remaining.lock().unwrap();
            if *failures > 0 {
                *failures -= 1;
                return Err(ChatError::Other("scripted mock failure".to_string()));
            }
        }

        let last_user = request
            .messages
            .iter()
            .rev()
            .find(|m| m.role == "user")
            .map(|m| m.content.clone())
            .unwrap_or_default();

        let responses = self.responses.lock().unwrap();
        let content = responses
            .get(&last_user)
            .cloned()
            .unwrap_or_else(|| self.default_response.clone());

        Ok(ChatCompletion {
            content,
            usage: self.usage,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use codebook_domain::ChatMessage;

    fn request(content: &str) -> ChatRequest {
        ChatRequest {
            model: "gpt-4o".to_string(),
            messages: vec![ChatMessage::user(content)],
            temperature: 0.7,
            max_tokens: 1000,
        }
    }

    #[test]
    fn mock_returns_default_response() {
        let client = MockChatClient::new("fixed");
        let completion = tokio_test::block_on(client.complete_chat(request("anything"))).unwrap();
        assert_eq!(completion.content, "fixed");
        assert_eq!(completion.usage.prompt_tokens, 100);
        assert_eq!(completion.usage.completion_tokens, 50);
    }

    #[test]
    fn mock_keys_responses_by_user_message() {
        let mut client = MockChatClient::new("default");
        client.add_response("hello", "world");
        client.add_response("foo", "bar");

        let c = tokio_test::block_on(client.complete_chat(request("hello"))).unwrap();
        assert_eq!(c.content, "world");
        let c = tokio_test::block_on(client.complete_chat(request("foo"))).unwrap();
        assert_eq!(c.content, "bar");
        let c = tokio_test::block_on(client.complete_chat(request("unknown"))).unwrap();
        assert_eq!(c.content, "default");
    }

    #[test]
    fn mock_counts_calls_across_clones() {
        let client = MockChatClient::new("x");
        let clone = client.clone();
        assert_eq!(client.call_count(), 0);

        tokio_test::block_on(client.complete_chat(request("a"))).unwrap();
        tokio_test::block_on(clone.complete_chat(request("b"))).unwrap();
        assert_eq!(client.call_count(), 2);
        assert_eq!(clone.call_count(), 2);
    }

    #[test]
    fn mock_scripted_failures_then_success() {
        let client = MockChatClient::failing(2, "eventually");

        assert!(tokio_test::block_on(client.complete_chat(request("a"))).is_err());
        assert!(tokio_test::block_on(client.complete_chat(request("a"))).is_err());
        let c = tokio_test::block_on(client.complete_chat(request("a"))).unwrap();
        assert_eq!(c.content, "eventually");
        assert_eq!(client.call_count(), 3);
    }

    #[test]
    fn mock_usage_override() {
        let client = MockChatClient::new("x").with_usage(7, 3);
        let c = tokio_test::block_on(client.complete_chat(request("a"))).unwrap();
        assert_eq!(c.usage.prompt_tokens, 7);
        assert_eq!(c.usage.completion_tokens, 3);
    }
}
