//! Quote ID codec - stable provenance identifiers for quotes
//!
//! A quote id encodes where a quote came from:
//!
//! ```text
//! <interaction_id>[:msg_<msg_index>]:ch_<chunk_index>:<start>-<end>
//! ```
//!
//! The `msg_` segment is present only when message-level addressing applies
//! (e.g. email threads); chunk-level producers omit it. This string format
//! is the one contract this workspace guarantees stable for cross-service
//! addressing of evidence.

use regex::Regex;
use std::fmt;
use std::sync::LazyLock;
use thiserror::Error;

/// Canonical quote id grammar.
static QUOTE_ID_RE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(
        r"^(?P<interaction_id>[a-f0-9-]+)(?::msg_(?P<msg_index>\d+))?:ch_(?P<chunk_index>\d+):(?P<start_pos>\d+)-(?P<end_pos>\d+)$",
    )
    .expect("quote id pattern is valid")
});

/// Error raised when a quote id does not conform to the canonical grammar.
///
/// A malformed id indicates a data-integrity bug upstream, not a model
/// quirk, so callers are expected to propagate this rather than absorb it.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum QuoteIdError {
    /// The string does not match the canonical quote id format
    #[error("invalid quote id format: {0}")]
    InvalidFormat(String),
}

/// Decoded fields of a quote id.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct QuoteIdParts {
    /// Identifier of the source interaction (lowercase hex and hyphens)
    pub interaction_id: String,

    /// Message index within the interaction, if message-level addressing applies
    pub msg_index: Option<usize>,

    /// Index of the chunk the quote was extracted from
    pub chunk_index: usize,

    /// Inclusive code-point offset into the chunk
    pub start_pos: usize,

    /// Exclusive code-point offset into the chunk
    pub end_pos: usize,
}

impl QuoteIdParts {
    /// Re-encode these fields into the canonical string form.
    pub fn encode(&self) -> String {
        encode_quote_id(
            &self.interaction_id,
            self.chunk_index,
            self.start_pos,
            self.end_pos,
            self.msg_index,
        )
    }
}

impl fmt::Display for QuoteIdParts {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.encode())
    }
}

/// Encode a quote id.
///
/// # Examples
///
/// ```
/// use codebook_domain::quote_id::encode_quote_id;
///
/// let id = encode_quote_id("abc-1", 2, 10, 20, None);
/// assert_eq!(id, "abc-1:ch_2:10-20");
///
/// let id = encode_quote_id("abc-1", 2, 10, 20, Some(5));
/// assert_eq!(id, "abc-1:msg_5:ch_2:10-20");
/// ```
pub fn encode_quote_id(
    interaction_id: &str,
    chunk_index: usize,
    start_pos: usize,
    end_pos: usize,
    msg_index: Option<usize>,
) -> String {
    match msg_index {
        Some(msg) => format!("{interaction_id}:msg_{msg}:ch_{chunk_index}:{start_pos}-{end_pos}"),
        None => format!("{interaction_id}:ch_{chunk_index}:{start_pos}-{end_pos}"),
    }
}

/// Decode a quote id, rejecting anything that does not match the grammar.
///
/// # Examples
///
/// ```
/// use codebook_domain::quote_id::decode_quote_id;
///
/// let parts = decode_quote_id("abc-1:ch_2:10-20").unwrap();
/// assert_eq!(parts.interaction_id, "abc-1");
/// assert_eq!(parts.msg_index, None);
/// assert_eq!(parts.chunk_index, 2);
/// assert_eq!(parts.start_pos, 10);
/// assert_eq!(parts.end_pos, 20);
///
/// assert!(decode_quote_id("not a quote id").is_err());
/// ```
pub fn decode_quote_id(quote_id: &str) -> Result<QuoteIdParts, QuoteIdError> {
    let captures = QUOTE_ID_RE
        .captures(quote_id)
        .ok_or_else(|| QuoteIdError::InvalidFormat(quote_id.to_string()))?;

    let parse = |name: &str| -> Result<usize, QuoteIdError> {
        captures[name]
            .parse()
            .map_err(|_| QuoteIdError::InvalidFormat(quote_id.to_string()))
    };

    let msg_index = match captures.name("msg_index") {
        Some(m) => Some(
            m.as_str()
                .parse()
                .map_err(|_| QuoteIdError::InvalidFormat(quote_id.to_string()))?,
        ),
        None => None,
    };

    Ok(QuoteIdParts {
        interaction_id: captures["interaction_id"].to_string(),
        msg_index,
        chunk_index: parse("chunk_index")?,
        start_pos: parse("start_pos")?,
        end_pos: parse("end_pos")?,
    })
}
