//! Model output repair
//!
//! A generative model is not guaranteed to emit pure JSON: it may prepend a
//! chain-of-thought block, wrap the payload in a fenced code block, or add
//! narration around it. [`extract_json`] runs four ordered recovery
//! heuristics and the first success wins. Best-effort repair, not a grammar.

use std::sync::LazyLock;

use regex::Regex;
use serde::de::DeserializeOwned;

use crate::error::RouteError;

static THINK_BLOCK: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"(?s)<think>.*?</think>").expect("valid regex"));

static JSON_FENCE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"(?s)```json\s*(.*?)\s*```").expect("valid regex"));

/// Maximum snippet length carried in a `MalformedModelOutput` error
const SNIPPET_CHARS: usize = 100;

/// Repair raw model text into a typed value.
///
/// Strategies, in order:
/// 1. strip `<think>...</think>` blocks non-greedily, parse the remainder;
/// 2. parse the inner content of a ```` ```json ```` fenced block;
/// 3. parse the span from the first `{` to the last `}`;
/// 4. fail with [`RouteError::MalformedModelOutput`] carrying a truncated
///    snippet of the cleaned text.
pub fn extract_json<T: DeserializeOwned>(raw: &str) -> Result<T, RouteError> {
    let cleaned = THINK_BLOCK.replace_all(raw, "");
    let cleaned = cleaned.trim();

    if let Ok(value) = serde_json::from_str(cleaned) {
        return Ok(value);
    }

    if let Some(inner) = JSON_FENCE.captures(cleaned).and_then(|captures| captures.get(1)) {
        if let Ok(value) = serde_json::from_str(inner.as_str()) {
            return Ok(value);
        }
    }

    if let (Some(start), Some(end)) = (cleaned.find('{'), cleaned.rfind('}')) {
        if start < end {
            if let Ok(value) = serde_json::from_str(&cleaned[start..=end]) {
                return Ok(value);
            }
        }
    }

    Err(RouteError::malformed(truncate_chars(cleaned, SNIPPET_CHARS)))
}

fn truncate_chars(text: &str, max_chars: usize) -> String {
    text.chars().take(max_chars).collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::Intent;
    use rstest::rstest;

    const BARE: &str = r#"{"locations": [{"name": "Beijing", "transport_mode": "flight"}, {"name": "Dubai", "transport_mode": "flight"}]}"#;

    fn decode(raw: &str) -> Intent {
        extract_json(raw).expect("should decode")
    }

    #[test]
    fn test_bare_json() {
        let intent = decode(BARE);
        assert_eq!(intent.locations.len(), 2);
        assert_eq!(intent.locations[0].name, "Beijing");
    }

    #[rstest]
    #[case::think_block(format!("<think>The user wants a route.\nLet me list stops.</think>{BARE}"))]
    #[case::fenced(format!("```json\n{BARE}\n```"))]
    #[case::think_then_fence(format!("<think>hmm</think>Sure, here you go:\n```json\n{BARE}\n```"))]
    #[case::leading_prose(format!("Here is the route you asked for: {BARE} Hope that helps!"))]
    fn test_wrapped_output_decodes_identically(#[case] wrapped: String) {
        // Every recovery path must yield the same structure as the bare text
        assert_eq!(decode(&wrapped), decode(BARE));
    }

    #[test]
    fn test_multiple_think_blocks_are_stripped() {
        let raw = format!("<think>a</think>{BARE}<think>b</think>");
        assert_eq!(decode(&raw), decode(BARE));
    }

    #[test]
    fn test_all_strategies_fail() {
        let err = extract_json::<Intent>("no structured data here").unwrap_err();
        match err {
            RouteError::MalformedModelOutput { snippet } => {
                assert!(snippet.contains("no structured data"));
            }
            other => panic!("unexpected error: {other:?}"),
        }
    }

    #[test]
    fn test_snippet_is_truncated() {
        let long = "x".repeat(500);
        let err = extract_json::<Intent>(&long).unwrap_err();
        match err {
            RouteError::MalformedModelOutput { snippet } => {
                assert_eq!(snippet.chars().count(), 100);
            }
            other => panic!("unexpected error: {other:?}"),
        }
    }

    #[test]
    fn test_snippet_reflects_cleaned_text() {
        let raw = "<think>long reasoning that should not leak</think>still not json";
        let err = extract_json::<Intent>(raw).unwrap_err();
        match err {
            RouteError::MalformedModelOutput { snippet } => {
                assert!(!snippet.contains("reasoning"));
                assert!(snippet.contains("still not json"));
            }
            other => panic!("unexpected error: {other:?}"),
        }
    }

    #[test]
    fn test_brace_span_with_noise_on_both_sides() {
        let raw = format!("Result -> {BARE} <- done");
        assert_eq!(decode(&raw), decode(BARE));
    }
}
