//! Chunk module - offset-exact slices of interaction text

use serde::{Deserialize, Serialize};

/// A contiguous slice of source text sized to an LLM context budget.
///
/// Offsets are absolute Unicode code-point offsets into the original source
/// (never byte offsets), so `source[start_pos..end_pos]` sliced by code
/// points always equals `text`. Chunks are created once per analysis request
/// and are read-only afterward.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Chunk {
    /// Position of this chunk in the source, 0-based and strictly increasing
    pub chunk_index: usize,

    /// Exact substring of the source covered by this chunk
    pub text: String,

    /// Inclusive code-point offset of the chunk's first character
    pub start_pos: usize,

    /// Exclusive code-point offset one past the chunk's last character
    pub end_pos: usize,

    /// Estimated token length of `text`
    pub token_count: usize,
}

impl Chunk {
    /// Length of the chunk in Unicode code points.
    pub fn char_len(&self) -> usize {
        self.end_pos - self.start_pos
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn char_len_matches_offsets() {
        let chunk = Chunk {
            chunk_index: 0,
            text: "Hello 世界".to_string(),
            start_pos: 10,
            end_pos: 18,
            token_count: 2,
        };
        assert_eq!(chunk.char_len(), 8);
        assert_eq!(chunk.text.chars().count(), chunk.char_len());
    }
}
