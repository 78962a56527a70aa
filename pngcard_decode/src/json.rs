//! JSON layer with trailing-data salvage.
//!
//! Some encoders append bytes after the card document. When the text holds a
//! complete JSON value followed by anything other than whitespace, the prefix
//! up to where that extra data starts is scanned for the last object that
//! closes at brace depth zero, and only that slice is parsed.
//!
//! The scan counts raw `{` and `}` bytes and does not understand strings, so a
//! document with unbalanced braces inside string values cannot be salvaged.

use serde_json::{Deserializer, Value};

use crate::DecodeFailure;

fn is_json_whitespace(c: char) -> bool {
    matches!(c, ' ' | '\t' | '\n' | '\r')
}

/// Parse `text` as a single JSON value, salvaging documents with trailing
/// data.
pub fn parse_with_salvage(text: &str) -> Result<Value, DecodeFailure> {
    let mut stream = Deserializer::from_str(text).into_iter::<Value>();
    let value = match stream.next() {
        Some(Ok(value)) => value,
        Some(Err(e)) => return Err(DecodeFailure::Json(e)),
        None => return Err(DecodeFailure::Empty),
    };

    let end = stream.byte_offset();
    let rest = &text[end..];
    let trailing = rest.trim_start_matches(is_json_whitespace);
    if trailing.is_empty() {
        return Ok(value);
    }

    let offset = text.len() - trailing.len();
    salvage(text, offset).ok_or(DecodeFailure::TrailingData { offset })
}

/// Re-parse the last top-level object that closes before `offset`.
#[must_use]
pub fn salvage(text: &str, offset: usize) -> Option<Value> {
    let end = last_object_end(text.get(..offset)?)?;
    serde_json::from_str(&text[..end]).ok()
}

/// Byte offset just past the last `}` that brings brace depth back to zero.
#[must_use]
pub fn last_object_end(prefix: &str) -> Option<usize> {
    let mut depth: isize = 0;
    let mut last_end = None;
    for (i, byte) in prefix.bytes().enumerate() {
        match byte {
            b'{' => depth += 1,
            b'}' => {
                depth -= 1;
                if depth == 0 {
                    last_end = Some(i + 1);
                }
            }
            _ => {}
        }
    }
    last_end
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_plain_document_parses() {
        let value = parse_with_salvage("  {\"name\":\"Bob\"}\n").ok();
        assert_eq!(value, Some(json!({"name": "Bob"})));
    }

    #[test]
    fn test_trailing_garbage_is_salvaged() {
        let value = parse_with_salvage("{\"name\":\"Bob\"}GARBAGE").ok();
        assert_eq!(value, Some(json!({"name": "Bob"})));
    }

    #[test]
    fn test_trailing_object_keeps_first() {
        let value = parse_with_salvage("{\"name\":\"A\"} {\"name\":\"B\"}").ok();
        assert_eq!(value, Some(json!({"name": "A"})));
    }

    #[test]
    fn test_nested_objects_count_as_one() {
        let text = "{\"data\":{\"name\":\"Nested\"},\"spec\":\"v2\"}\u{0}\u{0}";
        let value = parse_with_salvage(text).ok();
        assert_eq!(
            value,
            Some(json!({"data": {"name": "Nested"}, "spec": "v2"}))
        );
    }

    #[test]
    fn test_array_with_trailing_data_is_not_salvaged() {
        let result = parse_with_salvage("[1, 2]xyz");
        assert!(matches!(result, Err(DecodeFailure::TrailingData { offset: 6 })));
    }

    #[test]
    fn test_unbalanced_brace_in_string_defeats_salvage() {
        let result = parse_with_salvage("{\"name\":\"{Bob\"}junk");
        assert!(matches!(result, Err(DecodeFailure::TrailingData { .. })));
    }

    #[test]
    fn test_syntax_error_is_json_failure() {
        assert!(matches!(
            parse_with_salvage("{\"name\": }"),
            Err(DecodeFailure::Json(_))
        ));
        assert!(matches!(parse_with_salvage(""), Err(DecodeFailure::Empty)));
        assert!(matches!(parse_with_salvage("   "), Err(DecodeFailure::Empty)));
    }

    #[test]
    fn test_last_object_end() {
        assert_eq!(last_object_end("{\"a\":{}} "), Some(8));
        assert_eq!(last_object_end("{} {} "), Some(5));
        assert_eq!(last_object_end("[1,2]"), None);
        assert_eq!(last_object_end("{\"a\":1"), None);
    }
}
