//! Quote span validation and repair

use tracing::{info, warn};

/// Outcome of validating a claimed quote span against its chunk.
///
/// Offsets are Unicode code-point offsets into the chunk text. The two
/// variants are distinct outcome channels: a repair is worth surfacing to
/// observability even though the resulting span is equally trustworthy.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum QuoteSpan {
    /// Claimed offsets were correct and returned unchanged
    Verbatim {
        /// Inclusive code-point start offset
        start: usize,
        /// Exclusive code-point end offset
        end: usize,
    },

    /// Offsets were recovered by substring search (first match)
    Repaired {
        /// Inclusive code-point start offset
        start: usize,
        /// Exclusive code-point end offset
        end: usize,
    },
}

impl QuoteSpan {
    /// The span bounds regardless of how they were obtained.
    pub fn bounds(&self) -> (usize, usize) {
        match *self {
            QuoteSpan::Verbatim { start, end } | QuoteSpan::Repaired { start, end } => (start, end),
        }
    }

    /// Whether the span came from the repair path.
    pub fn is_repaired(&self) -> bool {
        matches!(self, QuoteSpan::Repaired { .. })
    }
}

/// Validate or repair a claimed quote span against a chunk's text.
///
/// Claimed offsets are accepted as-is only when they are in bounds, ordered,
/// and the code-point slice they address equals `quote_text` exactly.
/// Otherwise the quote is located by exact substring search (first match,
/// deterministically). No fuzzy matching is attempted: an approximate
/// repair could attribute a quote to text the source never contained.
///
/// Returns `None` when the quote text does not occur in the chunk at all;
/// the caller must drop the quote. An empty `quote_text` matches at
/// `(0, 0)`.
///
/// # Examples
///
/// ```
/// use codebook_coder::{normalize_quote_span, QuoteSpan};
///
/// let span = normalize_quote_span(
///     "service was excellent",
///     "The service was excellent.",
///     Some(0),
///     Some(5),
/// );
/// assert_eq!(span, Some(QuoteSpan::Repaired { start: 4, end: 25 }));
///
/// assert!(normalize_quote_span("absent", "The service was excellent.", None, None).is_none());
/// ```
pub fn normalize_quote_span(
    quote_text: &str,
    chunk_text: &str,
    claimed_start: Option<usize>,
    claimed_end: Option<usize>,
) -> Option<QuoteSpan> {
    if let (Some(start), Some(end)) = (claimed_start, claimed_end) {
        if start < end && char_slice(chunk_text, start, end).as_deref() == Some(quote_text) {
            return Some(QuoteSpan::Verbatim { start, end });
        }
    }

    match chunk_text.find(quote_text) {
        Some(byte_start) => {
            let start = chunk_text[..byte_start].chars().count();
            let end = start + quote_text.chars().count();
            info!(
                original_start = ?claimed_start,
                original_end = ?claimed_end,
                repaired_start = start,
                repaired_end = end,
                "repaired quote offsets"
            );
            Some(QuoteSpan::Repaired { start, end })
        }
        None => {
            warn!(
                quote_length = quote_text.chars().count(),
                chunk_length = chunk_text.chars().count(),
                "quote not found in chunk"
            );
            None
        }
    }
}

/// Slice `text` by code-point offsets, or `None` when out of bounds.
fn char_slice(text: &str, start: usize, end: usize) -> Option<String> {
    let total = text.chars().count();
    if end > total {
        return None;
    }
    Some(text.chars().skip(start).take(end - start).collect())
}
