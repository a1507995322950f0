//! Text chunking with exact code-point offset preservation

use codebook_domain::Chunk;

/// Splits interaction text into offset-tagged chunks bounded by a token budget.
///
/// Paragraphs (blank-line separated) that fit the budget become one chunk
/// each; an over-long paragraph is re-split at sentence boundaries. The
/// budget is advisory past sentence granularity: a single sentence that
/// still exceeds it is emitted whole rather than split mid-sentence.
///
/// All offsets are absolute Unicode code-point offsets into the source,
/// computed by span arithmetic over a single scan - never by locating
/// substrings inside already-chunked text, which miscounts when the source
/// repeats itself.
///
/// # Examples
///
/// ```
/// use codebook_coder::TextChunker;
///
/// let chunker = TextChunker::new(500);
/// let chunks = chunker.chunk("First para.\n\nSecond para.");
///
/// assert_eq!(chunks.len(), 2);
/// assert_eq!(chunks[0].text, "First para.");
/// assert_eq!((chunks[0].start_pos, chunks[0].end_pos), (0, 11));
/// assert_eq!((chunks[1].start_pos, chunks[1].end_pos), (13, 25));
/// ```
pub struct TextChunker<F = fn(&str) -> usize> {
    max_tokens: usize,
    count_tokens: F,
}

impl TextChunker {
    /// Create a chunker using the built-in approximate token counter.
    pub fn new(max_tokens: usize) -> Self {
        Self {
            max_tokens,
            count_tokens: approx_token_count,
        }
    }
}

impl<F: Fn(&str) -> usize> TextChunker<F> {
    /// Create a chunker with a custom token counter.
    pub fn with_token_counter(max_tokens: usize, count_tokens: F) -> Self {
        Self {
            max_tokens,
            count_tokens,
        }
    }

    /// Chunk the given text.
    pub fn chunk(&self, text: &str) -> Vec<Chunk> {
        let chars: Vec<char> = text.chars().collect();
        let mut chunks = Vec::new();
        let mut chunk_index = 0;

        for (para_start, para_end) in paragraph_spans(&chars) {
            let para_text: String = chars[para_start..para_end].iter().collect();
            let para_tokens = (self.count_tokens)(&para_text);

            if para_tokens <= self.max_tokens {
                chunks.push(Chunk {
                    chunk_index,
                    text: para_text,
                    start_pos: para_start,
                    end_pos: para_end,
                    token_count: para_tokens,
                });
                chunk_index += 1;
            } else {
                for (sent_start, sent_end) in sentence_spans(&chars, para_start, para_end) {
                    let sent_text: String = chars[sent_start..sent_end].iter().collect();
                    let sent_tokens = (self.count_tokens)(&sent_text);
                    chunks.push(Chunk {
                        chunk_index,
                        text: sent_text,
                        start_pos: sent_start,
                        end_pos: sent_end,
                        token_count: sent_tokens,
                    });
                    chunk_index += 1;
                }
            }
        }

        chunks
    }
}

/// Approximate token count at roughly 4 characters per token.
pub fn approx_token_count(text: &str) -> usize {
    text.chars().count().div_ceil(4)
}

/// Non-empty spans between consecutive `\n\n` separators, in code-point space.
///
/// Separators are consumed left to right without overlap, so a run of three
/// newlines splits into one separator plus a segment starting with `\n`.
fn paragraph_spans(chars: &[char]) -> Vec<(usize, usize)> {
    let mut spans = Vec::new();
    let mut start = 0;
    let mut i = 0;

    while i < chars.len() {
        if chars[i] == '\n' && i + 1 < chars.len() && chars[i + 1] == '\n' {
            if i > start {
                spans.push((start, i));
            }
            i += 2;
            start = i;
        } else {
            i += 1;
        }
    }
    if start < chars.len() {
        spans.push((start, chars.len()));
    }

    spans
}

/// Sentence spans within `[start, end)`: a run of non-terminal characters,
/// one terminal (`.`/`!`/`?`) plus trailing whitespace, or a bare tail run.
/// Stray terminal characters that cannot start a sentence are skipped and
/// become inter-chunk gaps.
fn sentence_spans(chars: &[char], start: usize, end: usize) -> Vec<(usize, usize)> {
    let is_terminal = |c: char| matches!(c, '.' | '!' | '?');
    let mut spans = Vec::new();
    let mut i = start;

    while i < end {
        if is_terminal(chars[i]) {
            i += 1;
            continue;
        }
        let sent_start = i;
        while i < end && !is_terminal(chars[i]) {
            i += 1;
        }
        if i < end {
            i += 1;
            while i < end && chars[i].is_whitespace() {
                i += 1;
            }
        }
        spans.push((sent_start, i));
    }

    spans
}
