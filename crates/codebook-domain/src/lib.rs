//! Codebook Domain Layer
//!
//! Core value objects and trait seams for the evidence-grounding pipeline.
//! Everything downstream of chunking speaks these shapes: offset-exact
//! [`Chunk`]s of interaction text, [`Quote`]s addressed by code-point spans,
//! thematic [`Code`]s backed by those quotes, and the [`CodingResult`]
//! produced per chunk per coder identity.
//!
//! ## Key Concepts
//!
//! - **Chunk**: a contiguous slice of source text sized to an LLM context
//!   budget, with absolute Unicode code-point offsets
//! - **Quote**: a verbatim excerpt of a chunk, offset-addressed relative to
//!   that chunk, used as evidence for a code
//! - **Code**: a thematic label grounded in 1-3 quotes
//! - **Quote ID**: a stable string encoding a quote's provenance
//!   (interaction, optional message, chunk, offsets) — see [`quote_id`]
//!
//! ## Architecture
//!
//! Infrastructure implementations (LLM clients, retry plumbing) live in
//! `codebook-llm`; the coder agent and text utilities live in
//! `codebook-coder`. This crate defines the contracts between them.

#![warn(missing_docs)]
#![warn(clippy::all)]

pub mod chat;
pub mod chunk;
pub mod coding;
pub mod quote_id;
pub mod traits;

// Re-exports for convenience
pub use chat::{ChatCompletion, ChatMessage, ChatRequest, TokenUsage};
pub use chunk::Chunk;
pub use coding::{Code, CodingResult, Quote, MAX_CODES_PER_CHUNK, MAX_LABEL_CHARS, MAX_QUOTES_PER_CODE};
pub use quote_id::{decode_quote_id, encode_quote_id, QuoteIdError, QuoteIdParts};
pub use traits::ChatClient;
