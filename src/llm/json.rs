//! JSON extraction for model responses.
//!
//! Even in JSON mode, models occasionally wrap the object in a markdown
//! fence or add a sentence around it. This pulls the first JSON object out
//! of such text.

use serde_json::{Deserializer, Map, Value};

/// Extract the first JSON object from a model response.
///
/// Tries, in order:
/// 1. The whole (trimmed) response
/// 2. The body of a ` ```json ` or bare ` ``` ` fenced block
/// 3. The first `{` from which a complete object parses, ignoring any
///    trailing text
///
/// Returns `None` if no JSON object is found. Top-level arrays, strings
/// and numbers are not objects and are ignored.
pub fn extract_json_object(response: &str) -> Option<Map<String, Value>> {
    let trimmed = response.trim();

    if let Ok(Value::Object(map)) = serde_json::from_str::<Value>(trimmed) {
        return Some(map);
    }

    if let Some(inner) = fenced_block(trimmed)
        && let Ok(Value::Object(map)) = serde_json::from_str::<Value>(inner)
    {
        return Some(map);
    }

    trimmed
        .match_indices('{')
        .find_map(|(start, _)| leading_object(&trimmed[start..]))
}

/// Body of the first fenced code block, with an optional `json` tag removed.
fn fenced_block(text: &str) -> Option<&str> {
    let start = text.find("```")? + 3;
    let rest = &text[start..];
    let end = rest.find("```")?;
    let body = &rest[..end];
    Some(body.strip_prefix("json").unwrap_or(body).trim())
}

/// Parse a JSON object at the start of `text`, allowing trailing content.
fn leading_object(text: &str) -> Option<Map<String, Value>> {
    let mut stream = Deserializer::from_str(text).into_iter::<Value>();
    match stream.next() {
        Some(Ok(Value::Object(map))) => Some(map),
        _ => None,
    }
}
