//! Best-effort recovery of the enrichment object from free-form model output.
//!
//! Models wrap JSON in prose or code fences despite instructions, so a reply
//! that does not parse is an expected outcome: [`extract`] returns `None` and
//! the employer is left untouched.

use jboard_client::EmployerUpdate;
use serde_json::{Map, Value};

/// Recover `{website?, description?}` from raw model text.
///
/// Tries each top-level brace-balanced span in order, then the greedy span
/// from the first `{` to the last `}`. Missing keys and non-string values
/// mean "no override".
pub fn extract(raw: &str) -> Option<EmployerUpdate> {
    balanced_objects(raw)
        .into_iter()
        .chain(greedy_object(raw))
        .find_map(parse_update)
}

fn parse_update(span: &str) -> Option<EmployerUpdate> {
    let value: Value = serde_json::from_str(span).ok()?;
    let object = value.as_object()?;
    Some(EmployerUpdate {
        website: string_field(object, "website"),
        description: string_field(object, "description"),
    })
}

fn string_field(object: &Map<String, Value>, key: &str) -> Option<String> {
    object.get(key).and_then(Value::as_str).map(str::to_string)
}

/// Top-level `{...}` spans in order of appearance.
///
/// Braces inside string literals do not count. When a `{` is never closed,
/// scanning resumes right after it.
fn balanced_objects(text: &str) -> Vec<&str> {
    let mut spans = Vec::new();
    let mut depth = 0usize;
    let mut start = 0;
    let mut in_string = false;
    let mut escaped = false;

    for (offset, ch) in text.char_indices() {
        if depth == 0 {
            if ch == '{' {
                depth = 1;
                start = offset;
            }
            continue;
        }

        if in_string {
            match ch {
                _ if escaped => escaped = false,
                '\\' => escaped = true,
                '"' => in_string = false,
                _ => {}
            }
            continue;
        }

        match ch {
            '"' => in_string = true,
            '{' => depth += 1,
            '}' => {
                depth -= 1;
                if depth == 0 {
                    spans.push(&text[start..=offset]);
                }
            }
            _ => {}
        }
    }

    if depth > 0 {
        spans.extend(balanced_objects(&text[start + 1..]));
    }

    spans
}

/// Span from the first `{` to the last `}`.
fn greedy_object(text: &str) -> Option<&str> {
    let start = text.find('{')?;
    let end = text.rfind('}')?;
    (end > start).then(|| &text[start..=end])
}

#[cfg(test)]
mod tests {
    use super::*;

    fn update(website: Option<&str>, description: Option<&str>) -> EmployerUpdate {
        EmployerUpdate {
            website: website.map(str::to_string),
            description: description.map(str::to_string),
        }
    }

    #[test]
    fn test_extract_tolerates_prose_and_fences() {
        let raw = "Sure! ```json\n{\"website\":\"a.com\",\"description\":\"x\"}\n```";
        assert_eq!(extract(raw), Some(update(Some("a.com"), Some("x"))));
    }

    #[test]
    fn test_extract_without_json_is_none() {
        assert_eq!(extract("no json here"), None);
        assert_eq!(extract(""), None);
        assert_eq!(extract("} backwards {"), None);
    }

    #[test]
    fn test_extract_plain_object() {
        let raw = r#"{"website": "https://acme.com", "description": "Acme makes anvils."}"#;
        assert_eq!(
            extract(raw),
            Some(update(Some("https://acme.com"), Some("Acme makes anvils.")))
        );
    }

    #[test]
    fn test_extract_missing_keys_mean_no_override() {
        assert_eq!(extract(r#"{"website": "acme.com"}"#), Some(update(Some("acme.com"), None)));
        assert_eq!(extract("{}"), Some(EmployerUpdate::default()));
        assert_eq!(
            extract(r#"{"website": null, "description": 42}"#),
            Some(EmployerUpdate::default())
        );
    }

    #[test]
    fn test_extract_ignores_braces_inside_strings() {
        let raw = r#"Here you go: {"website": "acme.com", "description": "Uses {templates} and \"quotes\"."} Hope this helps {:"#;
        assert_eq!(
            extract(raw),
            Some(update(Some("acme.com"), Some("Uses {templates} and \"quotes\".")))
        );
    }

    #[test]
    fn test_extract_stops_at_first_object() {
        let raw = r#"{"website": "first.com"} and also {"website": "second.com"}"#;
        assert_eq!(extract(raw), Some(update(Some("first.com"), None)));
    }

    #[test]
    fn test_extract_skips_non_json_brace_groups() {
        let raw = r#"Template {name} filled in: {"website": "a.com"}"#;
        assert_eq!(balanced_objects(raw), vec!["{name}", r#"{"website": "a.com"}"#]);
        assert_eq!(extract(raw), Some(update(Some("a.com"), None)));
    }

    #[test]
    fn test_extract_recovers_after_unclosed_brace() {
        let raw = r#"Note {oops {"website":"a.com"}"#;
        assert_eq!(balanced_objects(raw), vec![r#"{"website":"a.com"}"#]);
        assert_eq!(extract(raw), Some(update(Some("a.com"), None)));
    }

    #[test]
    fn test_greedy_span() {
        assert_eq!(greedy_object("x {a} y {b} z"), Some("{a} y {b}"));
        assert_eq!(greedy_object("} {"), None);
        assert_eq!(greedy_object("none"), None);
    }

    #[test]
    fn test_extract_rejects_broken_json() {
        assert_eq!(extract(r#"{"website": "acme.com",}"#), None);
        assert_eq!(extract(r#"{"website": "acme.com""#), None);
    }
}
