// src/extraction/sanitize.rs
//! Cleanup of model output before JSON parsing.
//!
//! The prompt forbids markdown, but models still fence their output at
//! times. Every response goes through this step before the JSON parse.

use regex::Regex;
use std::sync::OnceLock;

fn fence_regex() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| Regex::new(r"```(?:json)?").expect("fence regex is valid"))
}

/// Strip ```json / ``` fence markers and surrounding whitespace.
pub fn strip_code_fences(content: &str) -> String {
    fence_regex().replace_all(content, "").trim().to_string()
}

#[cfg(test)]
mod tests {
    use super::*;

    const RAW_JSON: &str = r#"{"isResume": true, "firstName": "Jane"}"#;

    #[test]
    fn test_unfenced_content_is_untouched() {
        assert_eq!(strip_code_fences(RAW_JSON), RAW_JSON);
    }

    #[test]
    fn test_json_fence_is_stripped() {
        let fenced = format!("```json\n{}\n```", RAW_JSON);
        assert_eq!(strip_code_fences(&fenced), RAW_JSON);
    }

    #[test]
    fn test_bare_fence_is_stripped() {
        let fenced = format!("```\n{}\n```", RAW_JSON);
        assert_eq!(strip_code_fences(&fenced), RAW_JSON);
    }

    #[test]
    fn test_fenced_and_unfenced_parse_identically() {
        let fenced = format!("  ```json\n{}\n```  ", RAW_JSON);

        let from_fenced: serde_json::Value =
            serde_json::from_str(&strip_code_fences(&fenced)).unwrap();
        let from_raw: serde_json::Value =
            serde_json::from_str(&strip_code_fences(RAW_JSON)).unwrap();

        assert_eq!(from_fenced, from_raw);
    }
}
