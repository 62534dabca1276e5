use serde_json::Value;

use crate::{Enrichment, EnrichmentError};

/// Remove surrounding whitespace and a Markdown code fence, if any
pub fn strip_fences(raw: &str) -> &str {
    let text = raw.trim();
    let Some(rest) = text.strip_prefix("```") else {
        return text;
    };

    // Drop the info string (```json) up to the first line break
    let body = match rest.find('\n') {
        Some(nl) => &rest[nl + 1..],
        None => rest.trim_start_matches(|c: char| c.is_ascii_alphanumeric()),
    };

    body.trim_end()
        .strip_suffix("```")
        .unwrap_or(body)
        .trim()
}

/// Decode a `{translation, notes}` reply
pub fn parse_enrichment(raw: &str) -> Result<Enrichment, EnrichmentError> {
    let body = strip_fences(raw);

    let value: Value = serde_json::from_str(body).map_err(|e| EnrichmentError::Parse {
        reason: e.to_string(),
        raw: raw.to_string(),
    })?;

    let Value::Object(fields) = value else {
        return Err(EnrichmentError::Parse {
            reason: "expected a JSON object".to_string(),
            raw: raw.to_string(),
        });
    };

    let translation = fields
        .get("translation")
        .and_then(Value::as_str)
        .map(str::trim)
        .filter(|t| !t.is_empty())
        .ok_or(EnrichmentError::MissingField("translation"))?;

    let notes = match fields.get("notes") {
        None | Some(Value::Null) => "",
        Some(Value::String(notes)) => notes.trim(),
        Some(_) => return Err(EnrichmentError::MissingField("notes")),
    };

    Ok(Enrichment {
        translation: translation.to_string(),
        notes: notes.to_string(),
    })
}

/// Plain-text translation reply
pub fn parse_translation(raw: &str) -> Result<String, EnrichmentError> {
    let text = strip_fences(raw);
    if text.is_empty() {
        return Err(EnrichmentError::MissingField("content"));
    }
    Ok(text.to_string())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn strips_fences_and_whitespace() {
        assert_eq!(strip_fences("  {\"a\":1}\n"), "{\"a\":1}");
        assert_eq!(strip_fences("```json\n{\"a\":1}\n```"), "{\"a\":1}");
        assert_eq!(strip_fences("\n```\n{\"a\":1}\n```\n\n"), "{\"a\":1}");
        assert_eq!(strip_fences("```json {\"a\":1}```"), "{\"a\":1}");
    }

    #[test]
    fn parses_fenced_reply() {
        let raw = "```json\n{\"translation\": \"negation\", \"notes\": \"from 'nein'\"}\n```";
        let enrichment = parse_enrichment(raw).unwrap();
        assert_eq!(enrichment.translation, "negation");
        assert_eq!(enrichment.notes, "from 'nein'");
    }

    #[test]
    fn notes_are_optional() {
        let enrichment = parse_enrichment(r#"{"translation": "house"}"#).unwrap();
        assert_eq!(enrichment.notes, "");

        let enrichment = parse_enrichment(r#"{"translation": "house", "notes": null}"#).unwrap();
        assert_eq!(enrichment.notes, "");
    }

    #[test]
    fn decode_failure_keeps_raw_text() {
        match parse_enrichment("Sorry, I can't help with that.") {
            Err(EnrichmentError::Parse { raw, .. }) => {
                assert_eq!(raw, "Sorry, I can't help with that.")
            }
            other => panic!("unexpected: {other:?}"),
        }

        assert!(matches!(
            parse_enrichment("[1, 2]"),
            Err(EnrichmentError::Parse { .. })
        ));
    }

    #[test]
    fn missing_fields_are_distinct() {
        assert!(matches!(
            parse_enrichment(r#"{"notes": "x"}"#),
            Err(EnrichmentError::MissingField("translation"))
        ));
        assert!(matches!(
            parse_enrichment(r#"{"translation": "  "}"#),
            Err(EnrichmentError::MissingField("translation"))
        ));
        assert!(matches!(
            parse_enrichment(r#"{"translation": "x", "notes": 3}"#),
            Err(EnrichmentError::MissingField("notes"))
        ));
    }

    #[test]
    fn plain_translation() {
        assert_eq!(parse_translation("  the house \n").unwrap(), "the house");
        assert!(matches!(
            parse_translation("```\n```"),
            Err(EnrichmentError::MissingField("content"))
        ));
    }
}
