//! Coding prompt construction

/// Build the user prompt asking the model to code one chunk.
pub(crate) fn build_coding_prompt(chunk_text: &str) -> String {
    let mut prompt = String::new();
    prompt.push_str(CODING_INSTRUCTIONS);
    prompt.push_str("\n\nText to analyze:\n");
    prompt.push_str(chunk_text);
    prompt.push_str("\n\n");
    prompt.push_str(OUTPUT_FORMAT_REMINDER);
    prompt
}

const CODING_INSTRUCTIONS: &str = r#"Analyze the following text and generate 1-3 descriptive codes that capture key themes or concepts.

For each code:
1. Provide a concise label (max 200 characters)
2. Extract 1-3 representative quotes from the text that support the code
3. Ensure each quote is VERBATIM from the text (exact copy, no modifications)
4. For each quote, provide text, start_pos, and end_pos as Unicode code-point offsets

IMPORTANT: Respond ONLY with a JSON array (no other text, no markdown fences, no explanations)."#;

const OUTPUT_FORMAT_REMINDER: &str = r#"Expected JSON array format:
[
  {
    "label": "Code label here",
    "quotes": [
      {
        "text": "Exact quote from text",
        "start_pos": 0,
        "end_pos": 50
      }
    ]
  }
]"#;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn prompt_embeds_chunk_text() {
        let prompt = build_coding_prompt("The service was excellent.");
        assert!(prompt.contains("The service was excellent."));
    }

    #[test]
    fn prompt_demands_verbatim_quotes_and_json() {
        let prompt = build_coding_prompt("text");
        assert!(prompt.contains("VERBATIM"));
        assert!(prompt.contains("JSON array"));
        assert!(prompt.contains("start_pos"));
        assert!(prompt.contains("end_pos"));
    }

    #[test]
    fn instructions_precede_text_and_format_reminder_follows() {
        let prompt = build_coding_prompt("MARKER");
        let instructions = prompt.find("descriptive codes").unwrap();
        let text = prompt.find("MARKER").unwrap();
        let reminder = prompt.find("Expected JSON array format").unwrap();
        assert!(instructions < text);
        assert!(text < reminder);
    }
}
