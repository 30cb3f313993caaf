//! Validated-parse boundary for provider replies.
//!
//! All fence stripping, JSON decoding, and shape checks happen here so the
//! acquisition loop only ever branches on a typed result.

use serde_json::Value;

use crate::error::ParseError;
use crate::types::lead::{EmailDraft, RawLead};

/// Remove an optional markdown code fence around a reply.
///
/// Accepts an opening marker with or without a language tag
/// (```` ```json ````, ```` ```JSON ````, ```` ``` ````) and an optional
/// closing marker.
pub fn strip_code_fences(raw: &str) -> &str {
    let mut text = raw.trim();

    if let Some(rest) = text.strip_prefix("```") {
        let tag_len = rest
            .find(|c: char| !c.is_ascii_alphanumeric())
            .unwrap_or(rest.len());
        text = &rest[tag_len..];
    }

    let text = text.trim();
    text.strip_suffix("```").unwrap_or(text).trim()
}

/// Parse a batch reply into raw lead candidates.
///
/// Fails with [`ParseError::Empty`] for blank text,
/// [`ParseError::InvalidJson`] when decoding fails,
/// [`ParseError::WrongShape`] for non-array JSON, and
/// [`ParseError::EmptyArray`] for `[]`. Array elements that are not
/// objects are dropped; nameless objects are kept for the caller to filter.
pub fn parse_batch(raw: &str) -> Result<Vec<RawLead>, ParseError> {
    let cleaned = strip_code_fences(raw);
    if cleaned.is_empty() {
        return Err(ParseError::Empty);
    }

    let value: Value = serde_json::from_str(cleaned)?;
    let items = match value {
        Value::Array(items) => items,
        other => {
            return Err(ParseError::WrongShape {
                expected: "array",
                found: json_kind(&other),
            })
        }
    };

    if items.is_empty() {
        return Err(ParseError::EmptyArray);
    }

    Ok(items
        .into_iter()
        .filter_map(|item| match item {
            Value::Object(object) => Some(RawLead::from(object)),
            _ => None,
        })
        .collect())
}

/// Parse a single-object email draft reply.
pub fn parse_email_draft(raw: &str) -> Result<EmailDraft, ParseError> {
    let cleaned = strip_code_fences(raw);
    if cleaned.is_empty() {
        return Err(ParseError::Empty);
    }

    let value: Value = serde_json::from_str(cleaned)?;
    let object = match value {
        Value::Object(map) => map,
        other => {
            return Err(ParseError::WrongShape {
                expected: "object",
                found: json_kind(&other),
            })
        }
    };

    let field = |key: &'static str| -> Result<String, ParseError> {
        object
            .get(key)
            .and_then(Value::as_str)
            .map(str::trim)
            .filter(|s| !s.is_empty())
            .map(str::to_string)
            .ok_or(ParseError::MissingField(key))
    };

    Ok(EmailDraft {
        subject: field("subject")?,
        body: field("body")?,
    })
}

fn json_kind(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "boolean",
        Value::Number(_) => "number",
        Value::String(_) => "string",
        Value::Array(_) => "array",
        Value::Object(_) => "object",
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_strip_code_fences() {
        assert_eq!(strip_code_fences("```json\n[]\n```"), "[]");
        assert_eq!(strip_code_fences("```JSON\n[]\n```"), "[]");
        assert_eq!(strip_code_fences("```\n[]\n```"), "[]");
        assert_eq!(strip_code_fences("```[1]```"), "[1]");
        assert_eq!(strip_code_fences("  [1]  "), "[1]");
        assert_eq!(strip_code_fences("```json\n[1]"), "[1]");
        assert_eq!(strip_code_fences("```"), "");
    }

    #[test]
    fn test_parse_batch_fenced_array() {
        let raw = "```json\n[{\"name\":\"A\",\"rating\":4.5},{\"name\":\"B\"}]\n```";
        let batch = parse_batch(raw).unwrap();
        assert_eq!(batch.len(), 2);
    }

    #[test]
    fn test_parse_batch_drops_non_objects() {
        let batch = parse_batch(r#"[{"name":"A"}, "stray", 3, null]"#).unwrap();
        assert_eq!(batch.len(), 1);
    }

    #[test]
    fn test_parse_batch_keeps_objects_with_repeated_review_keys() {
        let batch = parse_batch(
            r#"[{"name":"Blue Door","reviewCount":12,"reviews":12},{"name":"Red Door"}]"#,
        )
        .unwrap();

        let names: Vec<_> = batch
            .into_iter()
            .filter_map(RawLead::into_lead)
            .map(|lead| lead.name)
            .collect();
        assert_eq!(names, vec!["Blue Door", "Red Door"]);
    }

    #[test]
    fn test_parse_batch_keeps_nameless_objects() {
        let batch = parse_batch(r#"[{"address":"1 Main St"}]"#).unwrap();
        assert_eq!(batch.len(), 1);
        assert!(batch[0].clone().into_lead().is_none());
    }

    #[test]
    fn test_parse_batch_errors() {
        assert!(matches!(parse_batch(""), Err(ParseError::Empty)));
        assert!(matches!(parse_batch("```json\n```"), Err(ParseError::Empty)));
        assert!(matches!(parse_batch("[]"), Err(ParseError::EmptyArray)));
        assert!(matches!(
            parse_batch(r#"{"name":"A"}"#),
            Err(ParseError::WrongShape { found: "object", .. })
        ));

        let err = parse_batch("Sorry, I could not find any businesses.").unwrap_err();
        assert!(err.is_malformed());
    }

    #[test]
    fn test_parse_email_draft() {
        let draft =
            parse_email_draft("```json\n{\"subject\":\"Hi\",\"body\":\"Hello there\"}\n```")
                .unwrap();
        assert_eq!(draft.subject, "Hi");
        assert_eq!(draft.body, "Hello there");
    }

    #[test]
    fn test_parse_email_draft_errors() {
        assert!(matches!(
            parse_email_draft(r#"{"subject":"Hi"}"#),
            Err(ParseError::MissingField("body"))
        ));
        assert!(matches!(
            parse_email_draft("[]"),
            Err(ParseError::WrongShape { expected: "object", .. })
        ));
        assert!(parse_email_draft("not json").unwrap_err().is_malformed());
    }
}
