use std::sync::LazyLock;

use regex::Regex;
use serde_json::Value;
use thiserror::Error;
use tracing::debug;

/// Fenced block explicitly tagged as json, brace-delimited body.
/// Case-insensitive tag, dot matches newlines, lazy body so the match is
/// anchored by the closing fence.
static FENCED_JSON: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"(?si)```json\s*(\{.*?\})\s*```").expect("fenced-json pattern")
});

/// Trailing comma immediately before a closing brace or bracket, a common
/// small-model artifact.
static TRAILING_COMMA: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r",\s*([}\]])").expect("trailing-comma pattern"));

/// Extraction failure after all strategies were exhausted
#[derive(Debug, Error)]
pub enum ExtractError {
    #[error("no JSON object found in response text")]
    NoJsonFound,
    #[error("candidate JSON span failed to parse: {0}")]
    Invalid(#[source] serde_json::Error),
}

/// Recover a JSON value from unstructured model output.
///
/// Ordered strategy chain, each attempted only if the previous failed,
/// short-circuiting on first success:
/// 1. parse the entire response as JSON
/// 2. parse the body of a ```json fenced block
/// 3. take the first `{` to the last `}`, strip trailing commas, parse
///
/// Returns an error once every strategy fails; never panics on malformed
/// input.
pub fn extract_json_object(text: &str) -> Result<Value, ExtractError> {
    // 1. Direct parse
    if let Ok(value) = serde_json::from_str::<Value>(text.trim()) {
        return Ok(value);
    }
    debug!("Direct JSON parse failed, trying fenced block extraction");

    // 2. Fenced-block extraction
    if let Some(captures) = FENCED_JSON.captures(text) {
        let inner = &captures[1];
        match serde_json::from_str::<Value>(inner) {
            Ok(value) => return Ok(value),
            Err(e) => {
                debug!("Fenced JSON block failed to parse: {e}");
                return Err(ExtractError::Invalid(e));
            }
        }
    }
    debug!("No fenced JSON block, trying bracket-span fallback");

    // 3. Bracket-span fallback with trailing-comma cleanup
    let start = text.find('{');
    let end = text.rfind('}');
    if let (Some(start), Some(end)) = (start, end) {
        if end > start {
            let span = &text[start..=end];
            let cleaned = TRAILING_COMMA.replace_all(span, "${1}");
            return serde_json::from_str::<Value>(&cleaned).map_err(ExtractError::Invalid);
        }
    }

    // 4. Total failure
    Err(ExtractError::NoJsonFound)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_direct_parse() {
        let value = extract_json_object(r#"{"key": "value", "list": [1, 2]}"#).unwrap();
        assert_eq!(value["key"], "value");
        assert_eq!(value["list"][1], 2);
    }

    #[test]
    fn test_direct_parse_with_surrounding_whitespace() {
        let value = extract_json_object("\n  {\"a\": 1}\n  ").unwrap();
        assert_eq!(value["a"], 1);
    }

    #[test]
    fn test_fenced_block_with_prose() {
        let text = "Here is the analysis you asked for.\n```json\n{\"key\": \"value\", \"nested\": {\"a\": 1}}\n```\nLet me know if you need anything else.";
        let value = extract_json_object(text).unwrap();
        assert_eq!(value["nested"]["a"], 1);
    }

    #[test]
    fn test_fenced_block_tag_case_insensitive() {
        let text = "```JSON\n{\"a\": 2}\n```";
        let value = extract_json_object(text).unwrap();
        assert_eq!(value["a"], 2);
    }

    #[test]
    fn test_bracket_span_fallback() {
        let text = "Blah blah { \"key\": \"value\", \"num\": 5 } blah";
        let value = extract_json_object(text).unwrap();
        assert_eq!(value["num"], 5);
    }

    #[test]
    fn test_trailing_comma_before_brace() {
        let value = extract_json_object("result: {\"a\": 1, }").unwrap();
        assert_eq!(value, serde_json::json!({"a": 1}));
    }

    #[test]
    fn test_trailing_comma_inside_array() {
        let value = extract_json_object("note {\"list\": [1, 2,], \"b\": 3, }").unwrap();
        assert_eq!(value, serde_json::json!({"list": [1, 2], "b": 3}));
    }

    #[test]
    fn test_nested_braces_inside_string_values() {
        let text = "The model said: {\"reason\": \"used a closing } brace mid-sentence\", \"ok\": true} done";
        let value = extract_json_object(text).unwrap();
        assert_eq!(value["ok"], true);
    }

    #[test]
    fn test_no_braces_fails_deterministically() {
        let err = extract_json_object("This is not JSON at all.").unwrap_err();
        assert!(matches!(err, ExtractError::NoJsonFound));

        let err = extract_json_object("").unwrap_err();
        assert!(matches!(err, ExtractError::NoJsonFound));
    }

    #[test]
    fn test_unparseable_span_reports_invalid() {
        let err = extract_json_object("prefix { not json at all } suffix").unwrap_err();
        assert!(matches!(err, ExtractError::Invalid(_)));
    }
}
