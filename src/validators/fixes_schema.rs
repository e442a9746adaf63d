// src/validators/fixes_schema.rs
//! Strict structural validation of the fixes payload
//!
//! The payload is a single JSON array of `{ "path": string, "content": string }`
//! objects copied verbatim from a chat response. Anything else (prose around
//! the array, markdown code fences, missing fields) is rejected with a reason
//! that names the offending element so the user knows what to fix before
//! copying again.
//!
//! Validation never fails loudly: every defect is an ordinary [`Rejection`]
//! value, and checks stop at the first defect found.

use serde_json::Value;
use thiserror::Error;

/// Marker that opens a markdown code block
const CODE_FENCE: &str = "```";

/// Why a clipboard snapshot is not an acceptable fixes payload
///
/// `Display` renders the exact reason text written to the log. Item indices
/// are 1-based, in array order.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum Rejection {
    #[error("clipboard empty")]
    Empty,

    #[error("must start with [ and end with ]")]
    NotBracketed,

    #[error("JSON parse: {0}")]
    Parse(String),

    #[error("top-level value is not an array")]
    NotAnArray,

    #[error("item #{0} is not an object")]
    NotAnObject(usize),

    #[error("item #{0} missing string 'path'")]
    MissingPath(usize),

    #[error("item #{0} missing string 'content'")]
    MissingContent(usize),

    #[error("item #{0} has empty 'path'")]
    EmptyPath(usize),

    #[error("item #{0} 'content' appears to be wrapped in code fences")]
    FencedContent(usize),
}

/// Validate raw clipboard text as a fixes payload
///
/// Returns the number of fix entries on success. There is no upper bound on
/// the number of entries; an empty array is valid.
pub fn validate_fixes(raw: &str) -> Result<usize, Rejection> {
    let trimmed = raw.trim();
    if trimmed.is_empty() {
        return Err(Rejection::Empty);
    }

    // Cheap pre-filter: prose or fences around the array never reach the parser
    if !(trimmed.starts_with('[') && trimmed.ends_with(']')) {
        return Err(Rejection::NotBracketed);
    }

    let root: Value =
        serde_json::from_str(trimmed).map_err(|e| Rejection::Parse(e.to_string()))?;

    let items = root.as_array().ok_or(Rejection::NotAnArray)?;

    for (offset, item) in items.iter().enumerate() {
        check_entry(offset + 1, item)?;
    }

    Ok(items.len())
}

fn check_entry(idx: usize, item: &Value) -> Result<(), Rejection> {
    let entry = item.as_object().ok_or(Rejection::NotAnObject(idx))?;

    let path = entry
        .get("path")
        .and_then(Value::as_str)
        .ok_or(Rejection::MissingPath(idx))?;

    // A JSON null is not a string, so null content is caught here as well
    let content = entry
        .get("content")
        .and_then(Value::as_str)
        .ok_or(Rejection::MissingContent(idx))?;

    if path.trim().is_empty() {
        return Err(Rejection::EmptyPath(idx));
    }

    if content.trim_start().starts_with(CODE_FENCE) {
        return Err(Rejection::FencedContent(idx));
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    fn reason(raw: &str) -> String {
        validate_fixes(raw).unwrap_err().to_string()
    }

    #[test]
    fn accepts_single_entry() {
        assert_eq!(validate_fixes(r#"[{"path":"a.txt","content":"hello"}]"#), Ok(1));
    }

    #[test]
    fn accepts_empty_array_and_empty_content() {
        assert_eq!(validate_fixes("[]"), Ok(0));
        assert_eq!(validate_fixes("  \n[ ]\t"), Ok(0));
        assert_eq!(validate_fixes(r#"[{"path":"x","content":""}]"#), Ok(1));
    }

    #[test]
    fn accepts_many_entries_with_extra_fields() {
        let entries: Vec<String> = (0..500)
            .map(|i| {
                format!(r#"{{"path":"src/f{i}.rs","content":"fn f{i}() {{}}\n","note":{i}}}"#)
            })
            .collect();
        let raw = format!("[{}]", entries.join(","));
        assert_eq!(validate_fixes(&raw), Ok(500));
    }

    #[test]
    fn blank_input_is_empty() {
        assert_eq!(validate_fixes(""), Err(Rejection::Empty));
        assert_eq!(reason(" \r\n\t "), "clipboard empty");
    }

    #[test]
    fn requires_brackets_before_parsing() {
        for raw in [
            "hello",
            r#"{"path":"a","content":"b"}"#,
            "Here you go: [{\"path\":\"a\",\"content\":\"b\"}]",
            "```json\n[{\"path\":\"a\",\"content\":\"b\"}]\n```",
            "[1, 2",
        ] {
            assert_eq!(reason(raw), "must start with [ and end with ]", "input: {raw:?}");
        }
    }

    #[test]
    fn malformed_json_reports_parser_error() {
        let err = validate_fixes(r#"[{"path":"a","content":"b"},]"#).unwrap_err();
        assert!(matches!(err, Rejection::Parse(_)));
        assert!(err.to_string().starts_with("JSON parse: "), "{err}");
    }

    #[test]
    fn element_must_be_object() {
        assert_eq!(
            reason(r#"[{"path":"a","content":"b"}, 42]"#),
            "item #2 is not an object"
        );
        assert_eq!(reason(r#"[["a","b"]]"#), "item #1 is not an object");
    }

    #[test]
    fn path_must_be_string() {
        assert_eq!(reason(r#"[{"content":"b"}]"#), "item #1 missing string 'path'");
        assert_eq!(
            reason(r#"[{"path":7,"content":"b"}]"#),
            "item #1 missing string 'path'"
        );
    }

    #[test]
    fn content_must_be_string() {
        assert_eq!(reason(r#"[{"path":"a"}]"#), "item #1 missing string 'content'");
        assert_eq!(
            reason(r#"[{"path":"a","content":null}]"#),
            "item #1 missing string 'content'"
        );
        assert_eq!(
            reason(r#"[{"path":"a","content":["x"]}]"#),
            "item #1 missing string 'content'"
        );
    }

    #[test]
    fn path_must_not_be_blank() {
        assert_eq!(
            reason(r#"[{"path":"a","content":"x"},{"path":"   ","content":"x"}]"#),
            "item #2 has empty 'path'"
        );
    }

    #[test]
    fn fenced_content_is_rejected() {
        assert_eq!(
            reason(r#"[{"path":"a","content":"```rust\nfn main() {}\n```"}]"#),
            "item #1 'content' appears to be wrapped in code fences"
        );
        assert_eq!(
            validate_fixes(r#"[{"path":"a","content":"  \n```\nx\n```"}]"#),
            Err(Rejection::FencedContent(1))
        );
    }

    #[test]
    fn fence_later_in_content_is_fine() {
        let raw = r##"[{"path":"README.md","content":"# Title\n```sh\nls\n```\n"}]"##;
        assert_eq!(validate_fixes(raw), Ok(1));
    }

    #[test]
    fn stops_at_first_defect() {
        // item 2 lacks a path, item 3 is not even an object
        let raw = r#"[{"path":"a","content":"b"},{"content":"c"},5]"#;
        assert_eq!(validate_fixes(raw), Err(Rejection::MissingPath(2)));
    }

    #[test]
    fn non_array_reason_text() {
        assert_eq!(Rejection::NotAnArray.to_string(), "top-level value is not an array");
    }
}
