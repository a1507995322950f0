//! Trait definitions for external collaborators
//!
//! These traits define the boundary between the coding pipeline and
//! infrastructure. Implementations live in other crates (`codebook-llm`).

use crate::chat::{ChatCompletion, ChatRequest};
use async_trait::async_trait;

/// Capability to complete a chat conversation against an LLM provider.
///
/// The pipeline does not select providers or manage credentials; it only
/// requires this one asynchronous, fallible call. Rate limiting and
/// connection pooling are the implementor's concern.
#[async_trait]
pub trait ChatClient {
    /// Error type for chat operations
    type Error: std::error::Error + Send + Sync + 'static;

    /// Run one chat completion and return its content plus token usage.
    async fn complete_chat(&self, request: ChatRequest) -> Result<ChatCompletion, Self::Error>;
}
