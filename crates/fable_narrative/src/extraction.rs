//! Utilities for extracting structured data from model replies.
//!
//! Replies often wrap their JSON in markdown code blocks or surround it with
//! chatter. Extraction locates the JSON first, then deserializes it into a
//! typed reply. Every failure names the exchange step and keeps the raw reply.

use fable_error::{ExchangeStep, StructuredResponseError, StructuredResponseErrorKind};
use serde::de::DeserializeOwned;

/// Every JSON-looking slice of a reply, most likely first.
///
/// Order: the body of a markdown code fence, the first balanced object, the
/// first balanced array. Duplicates are dropped.
fn candidates(response: &str) -> Vec<&str> {
    let mut found: Vec<&str> = Vec::with_capacity(3);
    let slices = [
        fenced(response),
        balanced(response, '{', '}'),
        balanced(response, '[', ']'),
    ];
    for slice in slices.into_iter().flatten() {
        if !slice.is_empty() && !found.contains(&slice) {
            found.push(slice);
        }
    }
    found
}

/// Body of the first markdown code fence, with any language tag removed.
///
/// A fence left open by a truncated reply runs to the end of the text.
fn fenced(response: &str) -> Option<&str> {
    let (_, after) = response.split_once("```")?;
    let body = after.trim_start_matches(|c: char| c.is_ascii_alphanumeric());
    let body = body.split_once("```").map_or(body, |(inside, _)| inside);
    Some(body.trim())
}

/// First slice that opens with `open` and closes at its matching `close`.
///
/// Delimiters inside JSON strings are ignored. An opening delimiter that
/// never closes is skipped in favor of the next one.
fn balanced(response: &str, open: char, close: char) -> Option<&str> {
    response.match_indices(open).find_map(|(start, _)| {
        closing(&response[start..], open, close).map(|end| &response[start..start + end])
    })
}

/// Byte length of the balanced run at the start of `text`, if it closes.
fn closing(text: &str, open: char, close: char) -> Option<usize> {
    let mut depth = 0usize;
    let mut in_string = false;
    let mut escaped = false;

    for (i, ch) in text.char_indices() {
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
            c if c == open => depth += 1,
            c if c == close => {
                depth = depth.checked_sub(1)?;
                if depth == 0 {
                    return Some(i + ch.len_utf8());
                }
            }
            _ => {}
        }
    }
    None
}

/// Locate the JSON in a reply that may contain markdown or extra text.
///
/// Prefers a code fence, then a balanced object, then a balanced array.
///
/// # Errors
///
/// Returns [`StructuredResponseErrorKind::NoJson`] if nothing JSON-shaped is found.
///
/// # Examples
///
/// ```
/// use fable_error::ExchangeStep;
/// use fable_narrative::extract_json;
///
/// let reply = "Here you go:\n```json\n{\"story_name\": \"Gavin and the Dog\"}\n```\n";
/// let json = extract_json(ExchangeStep::Title, reply).unwrap();
/// assert_eq!(json, r#"{"story_name": "Gavin and the Dog"}"#);
/// ```
pub fn extract_json(step: ExchangeStep, response: &str) -> Result<&str, StructuredResponseError> {
    candidates(response)
        .first()
        .copied()
        .ok_or_else(|| no_json(step, response))
}

fn no_json(step: ExchangeStep, response: &str) -> StructuredResponseError {
    tracing::error!(
        step = %step,
        response_length = response.len(),
        "No JSON found in reply"
    );
    StructuredResponseError::new(step, StructuredResponseErrorKind::NoJson, response)
}

/// Deserialize extracted JSON into a typed reply.
///
/// `raw` is the full reply the JSON came from, kept on the error.
///
/// # Errors
///
/// Returns [`StructuredResponseErrorKind::Shape`] if the JSON is invalid or
/// does not match `T`.
pub fn parse_json<T>(
    step: ExchangeStep,
    json_str: &str,
    raw: &str,
) -> Result<T, StructuredResponseError>
where
    T: DeserializeOwned,
{
    serde_json::from_str(json_str).map_err(|e| {
        let preview = json_str.chars().take(100).collect::<String>();

        tracing::error!(
            step = %step,
            error = %e,
            json_preview = %preview,
            "JSON parsing failed"
        );

        StructuredResponseError::new(step, StructuredResponseErrorKind::Shape(e.to_string()), raw)
    })
}

/// Locate and deserialize the JSON in a reply.
///
/// Each candidate slice is tried in turn and the first that deserializes into
/// `T` wins, so bracketed chatter ahead of the real object is skipped. When
/// none fits, the error describes the most likely candidate.
///
/// Pure: the same reply always yields the same result.
///
/// # Examples
///
/// ```
/// use fable_error::ExchangeStep;
/// use fable_narrative::parse_reply;
/// use serde::Deserialize;
///
/// #[derive(Deserialize)]
/// struct Names {
///     names: Vec<String>,
/// }
///
/// let reply = r#"Sure [as asked]! {"names": ["Gavin", "Dog"]}"#;
/// let names: Names = parse_reply(ExchangeStep::CharacterNames, reply).unwrap();
/// assert_eq!(names.names, vec!["Gavin", "Dog"]);
/// ```
pub fn parse_reply<T>(step: ExchangeStep, response: &str) -> Result<T, StructuredResponseError>
where
    T: DeserializeOwned,
{
    let found = candidates(response);
    let Some(best) = found.first() else {
        return Err(no_json(step, response));
    };
    if let Some(reply) = found
        .iter()
        .find_map(|json| serde_json::from_str::<T>(json).ok())
    {
        return Ok(reply);
    }
    parse_json(step, best, response)
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde::Deserialize;

    const STEP: ExchangeStep = ExchangeStep::Narrative;

    #[test]
    fn test_extract_json_from_code_block() {
        let response = r#"
Here's the JSON you requested:

```json
{
  "story": [{"paragraph": "Once upon a time"}]
}
```

Hope this helps!
"#;
        let json = extract_json(STEP, response).unwrap();
        assert!(json.starts_with('{'));
        assert!(json.contains("Once upon a time"));
    }

    #[test]
    fn test_extract_json_from_unlabelled_fence() {
        let response = "```\n{\"background\": \"a meadow\"}\n```";
        let json = extract_json(STEP, response).unwrap();
        assert_eq!(json, "{\"background\": \"a meadow\"}");
    }

    #[test]
    fn test_extract_json_from_truncated_fence() {
        let response = "```json\n{\"description\": \"a tall man\"}";
        let json = extract_json(STEP, response).unwrap();
        assert_eq!(json, "{\"description\": \"a tall man\"}");
    }

    #[test]
    fn test_extract_json_balanced_braces() {
        let response =
            r#"Sure! Here it is: {"people": ["Gavin"], "nested": {"value": "x"}} Enjoy."#;
        let json = extract_json(STEP, response).unwrap();
        assert_eq!(json, r#"{"people": ["Gavin"], "nested": {"value": "x"}}"#);
    }

    #[test]
    fn test_extract_json_prefers_object() {
        let response = "Scene [page 1]: {\"background\": \"a sunny backyard\"}";
        let json = extract_json(STEP, response).unwrap();
        assert_eq!(json, "{\"background\": \"a sunny backyard\"}");
    }

    #[test]
    fn test_extract_json_array_only() {
        let response = "Names: [\"Gavin\", \"Dog\"] as requested";
        let json = extract_json(STEP, response).unwrap();
        assert_eq!(json, "[\"Gavin\", \"Dog\"]");
    }

    #[test]
    fn test_unclosed_brace_skipped() {
        let response = "Use { carefully. {\"description\": \"a tall man\"}";
        let json = extract_json(STEP, response).unwrap();
        assert_eq!(json, "{\"description\": \"a tall man\"}");
    }

    #[test]
    fn test_extract_json_with_string_escapes() {
        let response = r#"{"paragraph": "She said \"hello {there}\""}"#;
        let json = extract_json(STEP, response).unwrap();
        assert_eq!(json, response);
    }

    #[test]
    fn test_no_json_found() {
        let response = "This is just plain text with no JSON";
        let err = extract_json(ExchangeStep::Title, response).unwrap_err();
        assert_eq!(err.kind, StructuredResponseErrorKind::NoJson);
        assert_eq!(err.step, ExchangeStep::Title);
        assert_eq!(err.raw, response);
    }

    #[derive(Deserialize, Debug, PartialEq)]
    struct Background {
        background: String,
    }

    #[test]
    fn test_parse_reply_into_struct() {
        let reply = r#"{"background": "a sunny backyard"}"#;
        let parsed: Background = parse_reply(ExchangeStep::Background(0), reply).unwrap();
        assert_eq!(parsed.background, "a sunny backyard");
    }

    #[test]
    fn test_parse_reply_skips_bracketed_chatter() {
        let reply = r#"Scene [page 1]: {"background": "a sunny backyard"}"#;
        let parsed: Background = parse_reply(ExchangeStep::Background(0), reply).unwrap();
        assert_eq!(parsed.background, "a sunny backyard");
    }

    #[test]
    fn test_parse_reply_falls_back_to_array() {
        #[derive(Deserialize, Debug, PartialEq)]
        struct Item {
            id: u32,
        }

        let reply = "Here are the items:\n[\n  {\"id\": 1},\n  {\"id\": 2}\n]\n";
        assert_eq!(extract_json(STEP, reply).unwrap(), "{\"id\": 1}");
        let items: Vec<Item> = parse_reply(STEP, reply).unwrap();
        assert_eq!(items, vec![Item { id: 1 }, Item { id: 2 }]);
    }

    #[test]
    fn test_parse_reply_missing_key() {
        let reply = r#"{"scene": "a sunny backyard"}"#;
        let err = parse_reply::<Background>(ExchangeStep::Background(1), reply).unwrap_err();
        assert!(matches!(err.kind, StructuredResponseErrorKind::Shape(_)));
        assert_eq!(err.step, ExchangeStep::Background(1));
        assert_eq!(err.raw, reply);
    }

    #[test]
    fn test_parse_reply_is_idempotent() {
        let reply = "noise {\"background\": \"a dark forest\"} noise";
        let first: Background = parse_reply(STEP, reply).unwrap();
        let second: Background = parse_reply(STEP, reply).unwrap();
        assert_eq!(first, second);

        let broken = "{\"background\": ";
        let a = parse_reply::<Background>(STEP, broken).unwrap_err();
        let b = parse_reply::<Background>(STEP, broken).unwrap_err();
        assert_eq!(a.kind, b.kind);
    }
}
