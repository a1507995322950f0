//! Coding module - thematic codes and the quotes that ground them

use crate::chat::TokenUsage;
use serde::{Deserialize, Serialize};

/// Upper bound on codes returned per chunk; extras from the model are discarded.
pub const MAX_CODES_PER_CHUNK: usize = 3;

/// Upper bound on quotes per code; extras from the model are discarded.
pub const MAX_QUOTES_PER_CODE: usize = 3;

/// Upper bound on a code label's length in Unicode code points.
pub const MAX_LABEL_CHARS: usize = 200;

/// A verbatim excerpt of a chunk, offset-addressed for traceability.
///
/// `start_pos`/`end_pos` are Unicode code-point offsets into the *chunk*
/// that produced the quote, not into the original document:
/// `chunk.text[start_pos..end_pos]` (code-point slicing) equals `text`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Quote {
    /// Stable provenance identifier, see [`crate::quote_id`]
    pub quote_id: String,

    /// Verbatim quote text
    pub text: String,

    /// Identifier of the interaction the quote came from
    pub interaction_id: String,

    /// Index of the chunk the quote was extracted from
    pub chunk_index: usize,

    /// Inclusive code-point offset into the chunk
    pub start_pos: usize,

    /// Exclusive code-point offset into the chunk
    pub end_pos: usize,
}

/// A thematic label grounded in supporting quotes.
///
/// A code with zero surviving quotes never appears in output; the producer
/// drops it entirely.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Code {
    /// Concise descriptive label, 1 to [`MAX_LABEL_CHARS`] code points
    pub label: String,

    /// Supporting evidence, 1 to [`MAX_QUOTES_PER_CODE`] quotes
    pub quotes: Vec<Quote>,
}

/// Result of coding one chunk under one coder identity.
///
/// This is the wire contract consumed across the pipeline-stage boundary;
/// persistence and HTTP mapping of this shape belong to other services.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct CodingResult {
    /// Codes extracted from the chunk, 0 to [`MAX_CODES_PER_CHUNK`] entries
    pub codes: Vec<Code>,

    /// Token accounting for the LLM call that produced the codes
    pub token_usage: TokenUsage,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn coding_result_serializes_with_expected_keys() {
        let result = CodingResult {
            codes: vec![Code {
                label: "Service quality".to_string(),
                quotes: vec![Quote {
                    quote_id: "abc-1:ch_0:4-25".to_string(),
                    text: "service was excellent".to_string(),
                    interaction_id: "abc-1".to_string(),
                    chunk_index: 0,
                    start_pos: 4,
                    end_pos: 25,
                }],
            }],
            token_usage: TokenUsage {
                prompt_tokens: 100,
                completion_tokens: 50,
            },
        };

        let json = serde_json::to_value(&result).unwrap();
        assert_eq!(json["codes"][0]["label"], "Service quality");
        assert_eq!(json["codes"][0]["quotes"][0]["quote_id"], "abc-1:ch_0:4-25");
        assert_eq!(json["token_usage"]["prompt_tokens"], 100);
    }

    #[test]
    fn default_result_is_empty_with_zero_usage() {
        let result = CodingResult::default();
        assert!(result.codes.is_empty());
        assert_eq!(result.token_usage.prompt_tokens, 0);
        assert_eq!(result.token_usage.completion_tokens, 0);
    }
}
