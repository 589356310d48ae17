//! Candidate extraction
//!
//! Pulls the first balanced `{ ... }` region out of free-form model output.

use regex::Regex;

lazy_static::lazy_static! {
    static ref CODE_FENCE: Regex = Regex::new(r"(?i)```(?:json)?").unwrap();
}

/// Remove markdown code fences (optionally tagged `json`) and trim.
pub fn strip_code_fences(text: &str) -> String {
    CODE_FENCE.replace_all(text, "").trim().to_string()
}

/// Return the first brace-balanced region starting at the first `{`.
///
/// Depth counts every `{` and `}` byte, including ones inside string
/// literals, so a stray `}` in a string value can end the region early.
pub fn extract_json_candidate(text: &str) -> Option<String> {
    let text = strip_code_fences(text);
    let start = text.find('{')?;

    let mut depth = 0usize;
    for (offset, ch) in text[start..].char_indices() {
        match ch {
            '{' => depth += 1,
            '}' => {
                depth -= 1;
                if depth == 0 {
                    let end = start + offset + ch.len_utf8();
                    return Some(text[start..end].to_string());
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
    fn test_fenced_json_with_chatter() {
        let raw = "Sure! ```json\n{\"question\":\"Q\",\"nodes\":[]}\n```\nHope that helps.";
        assert_eq!(
            extract_json_candidate(raw).as_deref(),
            Some("{\"question\":\"Q\",\"nodes\":[]}")
        );
    }

    #[test]
    fn test_uppercase_fence_tag() {
        let raw = "```JSON\n{\"a\": 1}\n```";
        assert_eq!(extract_json_candidate(raw).as_deref(), Some("{\"a\": 1}"));
    }

    #[test]
    fn test_nested_objects() {
        let raw = "prefix {\"a\": {\"b\": {\"c\": 1}}, \"d\": 2} suffix {\"e\": 3}";
        assert_eq!(
            extract_json_candidate(raw).as_deref(),
            Some("{\"a\": {\"b\": {\"c\": 1}}, \"d\": 2}")
        );
    }

    #[test]
    fn test_no_brace() {
        assert_eq!(extract_json_candidate("I cannot answer that."), None);
    }

    #[test]
    fn test_unbalanced() {
        assert_eq!(extract_json_candidate("{\"a\": {\"b\": 1}"), None);
    }

    #[test]
    fn test_leading_close_brace_is_ignored() {
        assert_eq!(extract_json_candidate("} noise {\"a\":1}").as_deref(), Some("{\"a\":1}"));
    }

    #[test]
    fn test_brace_inside_string_closes_early() {
        let raw = "{\"text\": \"oops }\", \"more\": 1}";
        assert_eq!(extract_json_candidate(raw).as_deref(), Some("{\"text\": \"oops }"));
    }

    #[test]
    fn test_multibyte_text_around_region() {
        let raw = "Voilà → {\"q\": \"café\"} ✓";
        assert_eq!(extract_json_candidate(raw).as_deref(), Some("{\"q\": \"café\"}"));
    }
}
