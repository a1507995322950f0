//! Codebook Coder
//!
//! The evidence-grounding core of the thematic coding pipeline: splits
//! interaction text into offset-exact chunks, asks an LLM to propose codes
//! with supporting quotes, and keeps only quotes that are verifiably
//! verbatim in their chunk.
//!
//! # Architecture
//!
//! ```text
//! Text → TextChunker → chunks → [per chunk] CoderAgent
//!      → ChatClient (retried) → parse_json_array → candidate codes
//!      → normalize_quote_span → quote ids → CodingResult
//! ```
//!
//! Partial failures degrade silently to smaller results; a chunk whose call
//! or output is beyond repair yields an empty result rather than an error,
//! so one bad chunk never aborts a batch.
//!
//! # Example
//!
//! ```
//! use codebook_coder::{CoderAgent, CoderConfig, IdentityRegistry, TextChunker};
//! use codebook_llm::MockChatClient;
//!
//! # tokio_test::block_on(async {
//! let registry = IdentityRegistry::from_toml_str(r#"
//!     [[identities]]
//!     id = "descriptive"
//!     name = "Descriptive coder"
//!     prompt_prefix = "You are a careful qualitative researcher."
//! "#).unwrap();
//!
//! let chunker = TextChunker::new(500);
//! let chunks = chunker.chunk("The service was excellent.\n\nDelivery took too long.");
//!
//! let identity = registry.get("descriptive").unwrap().clone();
//! let agent = CoderAgent::new(identity, CoderConfig::default(), MockChatClient::new("[]"));
//!
//! for chunk in &chunks {
//!     let result = agent.code_chunk(chunk, "7c9e6679-7425-40de-944b-e07fc1f90ae7").await;
//!     assert!(result.codes.len() <= 3);
//! }
//! # });
//! ```

#![warn(missing_docs)]

mod agent;
mod chunking;
mod config;
mod error;
mod identity;
mod parser;
mod prompt;
mod span;


pub use agent::CoderAgent;
pub use chunking::{approx_token_count, TextChunker};
pub use config::CoderConfig;
pub use error::CoderError;
pub use identity::{Identity, IdentityRegistry};
pub use parser::parse_json_array;
pub use span::{normalize_quote_span, QuoteSpan};
