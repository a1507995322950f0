//! Resilient JSON array extraction from model output
//!
//! Models are asked for a bare JSON array but routinely wrap it in prose,
//! markdown fences, or an envelope object. `parse_json_array` runs an
//! ordered cascade of recovery strategies and never fails: an empty vec is
//! the total-failure signal, and the caller proceeds with an empty result.

use regex::Regex;
use serde_json::Value;
use std::sync::LazyLock;
use tracing::warn;

/// Fenced block tagged as JSON.
static JSON_FENCE_RE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"(?s)```json\s*\n(.*?)\n```").expect("json fence pattern is valid")
});

/// Fenced block with no language annotation.
static BARE_FENCE_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"(?s)```\s*\n(.*?)\n```").expect("bare fence pattern is valid"));

/// Extract a JSON array of candidate objects from raw model output.
///
/// Strategies, each tried only if the previous fails:
/// 1. parse the whole text as JSON
/// 2. parse the contents of a ```json fenced block
/// 3. parse the contents of a bare ``` fenced block
/// 4. bracket-match the first complete top-level array in the text
///
/// Strategies 1-3 also accept an object wrapping the array under a
/// `"codes"` key (a common model failure mode), logged as degraded output.
///
/// # Examples
///
/// ```
/// use codebook_coder::parse_json_array;
///
/// let items = parse_json_array(r#"[{"label": "a"}]"#);
/// assert_eq!(items.len(), 1);
///
/// assert!(parse_json_array("no json here").is_empty());
/// ```
pub fn parse_json_array(content: &str) -> Vec<Value> {
    if let Some(items) = parse_and_coerce(content) {
        return items;
    }

    if let Some(capture) = JSON_FENCE_RE.captures(content).and_then(|c| c.get(1)) {
        if let Some(items) = parse_and_coerce(capture.as_str()) {
            return items;
        }
    }

    if let Some(capture) = BARE_FENCE_RE.captures(content).and_then(|c| c.get(1)) {
        if let Some(items) = parse_and_coerce(capture.as_str()) {
            return items;
        }
    }

    if let Some(items) = scan_first_array(content) {
        return items;
    }

    // Length only; model output may contain sensitive interaction text.
    warn!(content_length = content.len(), "failed to parse JSON array from model output");
    Vec::new()
}

/// Parse a candidate string and coerce the result to an array.
///
/// Shared by the direct and fenced strategies so the envelope normalization
/// behaves identically no matter which strategy matched.
fn parse_and_coerce(candidate: &str) -> Option<Vec<Value>> {
    let value: Value = serde_json::from_str(candidate).ok()?;
    match value {
        Value::Array(items) => Some(items),
        Value::Object(mut map) => match map.remove("codes") {
            Some(Value::Array(items)) => {
                warn!("model wrapped array in an object envelope; unwrapping 'codes'");
                Some(items)
            }
            _ => None,
        },
        _ => None,
    }
}

/// Locate and parse the first complete top-level `[...]` span.
///
/// Bracket counting ignores brackets inside quoted strings and honors one
/// level of backslash escaping; deeper escape nesting is unsupported.
fn scan_first_array(content: &str) -> Option<Vec<Value>> {
    let start = content.find('[')?;
    let bytes = content.as_bytes();
    let mut depth: usize = 0;
    let mut in_string = false;
    let mut escape_next = false;

    for i in start..bytes.len() {
        let byte = bytes[i];
        if escape_next {
            escape_next = false;
            continue;
        }
        match byte {
            b'\\' => escape_next = true,
            b'"' => in_string = !in_string,
            b'[' if !in_string => depth += 1,
            b']' if !in_string => {
                depth -= 1;
                if depth == 0 {
                    return match serde_json::from_str(&content[start..=i]) {
                        Ok(Value::Array(items)) => Some(items),
                        _ => None,
                    };
                }
            }
            _ => {}
        }
    }

    None
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn direct_array_passes_through() {
        let items = parse_json_array(r#"[{"label": "one"}, {"label": "two"}]"#);
        assert_eq!(items.len(), 2);
        assert_eq!(items[0]["label"], "one");
    }

    #[test]
    fn codes_envelope_is_unwrapped() {
        let items = parse_json_array(r#"{"codes": [{"label": "wrapped"}]}"#);
        assert_eq!(items.len(), 1);
        assert_eq!(items[0]["label"], "wrapped");
    }

    #[test]
    fn json_fenced_block_is_parsed() {
        let content = "Here are the codes:\n```json\n[{\"label\": \"fenced\"}]\n```\nDone.";
        let items = parse_json_array(content);
        assert_eq!(items.len(), 1);
        assert_eq!(items[0]["label"], "fenced");
    }

    #[test]
    fn bare_fenced_block_is_parsed() {
        let content = "```\n[{\"label\": \"bare\"}]\n```";
        let items = parse_json_array(content);
        assert_eq!(items.len(), 1);
        assert_eq!(items[0]["label"], "bare");
    }

    #[test]
    fn fenced_envelope_is_unwrapped_like_direct() {
        let content = "```json\n{\"codes\": [{\"label\": \"both\"}]}\n```";
        let items = parse_json_array(content);
        assert_eq!(items.len(), 1);
        assert_eq!(items[0]["label"], "both");
    }

    #[test]
    fn embedded_array_is_bracket_matched() {
        let content = "The result is [{\"label\": \"embedded\"}] as requested.";
        let items = parse_json_array(content);
        assert_eq!(items.len(), 1);
        assert_eq!(items[0]["label"], "embedded");
    }

    #[test]
    fn bracket_matching_ignores_brackets_in_strings() {
        let content = r#"prefix [{"label": "has ] bracket", "note": "and [ too"}] suffix"#;
        let items = parse_json_array(content);
        assert_eq!(items.len(), 1);
        assert_eq!(items[0]["label"], "has ] bracket");
    }

    #[test]
    fn bracket_matching_honors_escaped_quotes() {
        let content = r#"noise [{"label": "quoted \" then ] inside"}] tail"#;
        let items = parse_json_array(content);
        assert_eq!(items.len(), 1);
    }

    #[test]
    fn nested_arrays_resolve_to_outermost() {
        let content = r#"x [[1, 2], [3, 4]] y"#;
        let items = parse_json_array(content);
        assert_eq!(items.len(), 2);
    }

    #[test]
    fn garbage_returns_empty() {
        assert!(parse_json_array("This is not JSON at all").is_empty());
        assert!(parse_json_array("").is_empty());
        assert!(parse_json_array("{\"other\": 1}").is_empty());
        assert!(parse_json_array("[unclosed").is_empty());
    }

    #[test]
    fn envelope_with_non_array_codes_is_rejected() {
        assert!(parse_json_array(r#"{"codes": "not a list"}"#).is_empty());
    }

    #[test]
    fn scalar_json_is_rejected() {
        assert!(parse_json_array("42").is_empty());
        assert!(parse_json_array("\"just a string\"").is_empty());
    }

    #[test]
    fn empty_array_is_valid_output() {
        assert!(parse_json_array("[]").is_empty());
        // An empty fenced array is also accepted, not a failure.
        assert!(parse_json_array("```json\n[]\n```").is_empty());
    }
}
