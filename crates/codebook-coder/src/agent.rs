//! Coder agent - codes one chunk at a time under an identity perspective

use crate::config::CoderConfig;
use crate::identity::Identity;
use crate::parser::parse_json_array;
use crate::prompt::build_coding_prompt;
use crate::span::normalize_quote_span;
use codebook_domain::{
    encode_quote_id, ChatClient, ChatMessage, ChatRequest, Chunk, Code, CodingResult, Quote,
    TokenUsage, MAX_CODES_PER_CHUNK, MAX_LABEL_CHARS, MAX_QUOTES_PER_CODE,
};
use codebook_llm::call_with_retry;
use serde_json::Value;
use std::sync::Arc;
use tracing::{debug, info, warn};

/// Code points of chunk text used for the dry-run placeholder quote.
const PLACEHOLDER_QUOTE_CHARS: usize = 20;

/// Generates thematic codes with supporting quotes for text chunks.
///
/// Each agent operates under one [`Identity`], whose `prompt_prefix` becomes
/// the system message of every call, so a panel of agents with different
/// identities yields diverse readings of the same chunk.
///
/// `code_chunk` is deliberately infallible: transport failures, malformed
/// model output, and ungrounded quotes all degrade to smaller (possibly
/// empty) results instead of aborting the batch. Chunks share no mutable
/// state, so callers may process many chunks concurrently.
pub struct CoderAgent<C> {
    identity: Identity,
    config: CoderConfig,
    client: Arc<C>,
}

impl<C> CoderAgent<C>
where
    C: ChatClient + Send + Sync,
{
    /// Create an agent for one identity over one chat client.
    pub fn new(identity: Identity, config: CoderConfig, client: C) -> Self {
        Self {
            identity,
            config,
            client: Arc::new(client),
        }
    }

    /// The identity this agent codes under.
    pub fn identity(&self) -> &Identity {
        &self.identity
    }

    /// Generate codes for a single chunk.
    ///
    /// Returns at most [`MAX_CODES_PER_CHUNK`] codes, each grounded in at
    /// most [`MAX_QUOTES_PER_CODE`] offset-validated quotes stamped with
    /// encoded quote ids. On any unrecoverable failure the result is empty
    /// with zero token usage.
    pub async fn code_chunk(&self, chunk: &Chunk, interaction_id: &str) -> CodingResult {
        if self.config.dry_run {
            return self.placeholder_result(chunk, interaction_id);
        }

        let request = ChatRequest {
            model: self.config.model.clone(),
            messages: vec![
                ChatMessage::system(&self.identity.prompt_prefix),
                ChatMessage::user(build_coding_prompt(&chunk.text)),
            ],
            temperature: self.config.temperature,
            max_tokens: self.config.max_completion_tokens,
        };

        let client = Arc::clone(&self.client);
        let completion = match call_with_retry(&self.config.retry, || {
            let client = Arc::clone(&client);
            let request = request.clone();
            async move { client.complete_chat(request).await }
        })
        .await
        {
            Ok(completion) => completion,
            Err(error) => {
                warn!(
                    identity = %self.identity.id,
                    chunk_index = chunk.chunk_index,
                    error = %error,
                    "chat call failed after retries"
                );
                return CodingResult::default();
            }
        };

        let candidates = parse_json_array(&completion.content);
        debug!(
            identity = %self.identity.id,
            chunk_index = chunk.chunk_index,
            candidates = candidates.len(),
            "parsed candidate codes"
        );

        let codes = self.ground_candidates(&candidates, chunk, interaction_id);
        info!(
            identity = %self.identity.id,
            chunk_index = chunk.chunk_index,
            codes = codes.len(),
            "chunk coded"
        );

        CodingResult {
            codes,
            token_usage: completion.usage,
        }
    }

    /// Validate candidate codes, repair or drop their quotes, and stamp ids.
    fn ground_candidates(
        &self,
        candidates: &[Value],
        chunk: &Chunk,
        interaction_id: &str,
    ) -> Vec<Code> {
        let mut codes = Vec::new();

        for candidate in candidates.iter().take(MAX_CODES_PER_CHUNK) {
            let Some(object) = candidate.as_object() else {
                warn!("skipping non-object code candidate");
                continue;
            };
            let Some(label) = object.get("label").and_then(Value::as_str) else {
                warn!("skipping code candidate without label");
                continue;
            };
            if label.is_empty() || label.chars().count() > MAX_LABEL_CHARS {
                warn!(label_length = label.chars().count(), "skipping code with invalid label");
                continue;
            }
            let Some(raw_quotes) = object.get("quotes").and_then(Value::as_array) else {
                warn!(label, "skipping code candidate without quotes");
                continue;
            };

            let mut quotes = Vec::new();
            for raw_quote in raw_quotes.iter().take(MAX_QUOTES_PER_CODE) {
                let Some(quote) = self.ground_quote(raw_quote, chunk, interaction_id, label) else {
                    continue;
                };
                quotes.push(quote);
            }

            if quotes.is_empty() {
                warn!(label, "dropping code with no valid quotes");
                continue;
            }
            codes.push(Code {
                label: label.to_string(),
                quotes,
            });
        }

        codes
    }

    /// Validate one claimed quote against the chunk, minting its id.
    fn ground_quote(
        &self,
        raw_quote: &Value,
        chunk: &Chunk,
        interaction_id: &str,
        label: &str,
    ) -> Option<Quote> {
        let object = raw_quote.as_object()?;
        let text = object.get("text").and_then(Value::as_str)?;
        let claimed_start = object.get("start_pos").and_then(Value::as_u64).map(|v| v as usize);
        let claimed_end = object.get("end_pos").and_then(Value::as_u64).map(|v| v as usize);

        let Some(span) = normalize_quote_span(text, &chunk.text, claimed_start, claimed_end) else {
            let preview: String = text.chars().take(50).collect();
            warn!(label, quote_preview = %preview, "dropping quote not grounded in chunk");
            return None;
        };

        let (start_pos, end_pos) = span.bounds();
        let quote_id = encode_quote_id(interaction_id, chunk.chunk_index, start_pos, end_pos, None);

        Some(Quote {
            quote_id,
            text: text.to_string(),
            interaction_id: interaction_id.to_string(),
            chunk_index: chunk.chunk_index,
            start_pos,
            end_pos,
        })
    }

    /// Deterministic offline result: one schema-valid code whose quote id
    /// still goes through the real codec.
    fn placeholder_result(&self, chunk: &Chunk, interaction_id: &str) -> CodingResult {
        let end = chunk.text.chars().count().min(PLACEHOLDER_QUOTE_CHARS);
        let text: String = chunk.text.chars().take(end).collect();
        let quote_id = encode_quote_id(interaction_id, chunk.chunk_index, 0, end, None);

        CodingResult {
            codes: vec![Code {
                label: format!("Placeholder code for {}", self.identity.id),
                quotes: vec![Quote {
                    quote_id,
                    text,
                    interaction_id: interaction_id.to_string(),
                    chunk_index: chunk.chunk_index,
                    start_pos: 0,
                    end_pos: end,
                }],
            }],
            token_usage: TokenUsage {
                prompt_tokens: 100,
                completion_tokens: 50,
            },
        }
    }
}
