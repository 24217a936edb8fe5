//! Generic field-shape parsing for source-like fields.
//!
//! Upstream APIs put citations under many names (`citations`, `references`,
//! `links`, ...) and in three shapes: a list, a single object, or a bare
//! string. [`parse_source_field`] accepts all three and maps objects through
//! a fixed set of field aliases:
//!
//! | Record field | Taken from (first non-empty) |
//! |--------------|------------------------------|
//! | `url` | `url`, `link`, `source` |
//! | `snippet` | `snippet`, `content`, `text` |
//! | `score` | `score`, `relevance` (default 0) |
//! | `title` | `title` |
//!
//! Objects become records only when they carry a `url` or a `title`.
//!
//! Function and tool calls may also carry sources inside their (often
//! JSON-encoded) arguments; see [`parse_function_calls`].

use serde_json::{Map, Value};

use crate::error::{ExtractError, Result};
use crate::models::SourceRecord;

const URL_ALIASES: &[&str] = &["url", "link", "source"];
const SNIPPET_ALIASES: &[&str] = &["snippet", "content", "text"];
const SCORE_ALIASES: &[&str] = &["score", "relevance"];

/// Render a scalar JSON value as text. Arrays and objects yield `None`.
pub(crate) fn scalar_text(value: &Value) -> Option<String> {
    match value {
        Value::String(s) => Some(s.clone()),
        Value::Null => Some(String::new()),
        Value::Number(n) => Some(n.to_string()),
        Value::Bool(b) => Some(b.to_string()),
        Value::Array(_) | Value::Object(_) => None,
    }
}

/// Like [`scalar_text`], but a non-scalar is an error naming `field`.
pub(crate) fn text_of(field: &str, value: &Value) -> Result<String> {
    scalar_text(value).ok_or_else(|| ExtractError::NotText {
        field: field.to_string(),
    })
}

/// First alias whose value renders to non-empty text, or `""`.
pub(crate) fn first_text(obj: &Map<String, Value>, aliases: &[&str]) -> String {
    aliases
        .iter()
        .filter_map(|key| obj.get(*key))
        .filter_map(scalar_text)
        .find(|text| !text.is_empty())
        .unwrap_or_default()
}

fn optional_text(obj: &Map<String, Value>, field: &str) -> Result<Option<String>> {
    match obj.get(field) {
        Some(value) => Ok(Some(text_of(field, value)?).filter(|text| !text.is_empty())),
        None => Ok(None),
    }
}

fn score_of(obj: &Map<String, Value>) -> Result<f64> {
    let found = SCORE_ALIASES
        .iter()
        .find_map(|key| obj.get(*key).filter(|v| !v.is_null()).map(|v| (*key, v)));

    let Some((field, value)) = found else {
        return Ok(0.0);
    };

    let not_numeric = || ExtractError::NotNumeric {
        field: field.to_string(),
        value: value.to_string(),
    };

    match value {
        Value::Number(n) => n.as_f64().ok_or_else(not_numeric),
        Value::String(s) => s.trim().parse::<f64>().map_err(|_| not_numeric()),
        _ => Err(not_numeric()),
    }
}

/// True for strings that plausibly name a web resource.
pub fn looks_like_url(text: &str) -> bool {
    text.starts_with("http") || text.starts_with("www")
}

/// Map one source-like object to a record using the field aliases.
///
/// Returns `Ok(None)` when the object has neither a `url` nor a `title`.
pub fn record_from_object(obj: &Map<String, Value>) -> Result<Option<SourceRecord>> {
    let url = first_text(obj, URL_ALIASES);
    let title = optional_text(obj, "title")?.unwrap_or_default();
    if url.is_empty() && title.is_empty() {
        return Ok(None);
    }

    Ok(Some(SourceRecord {
        title,
        url,
        snippet: first_text(obj, SNIPPET_ALIASES),
        score: score_of(obj)?,
        author: optional_text(obj, "author")?,
        page: optional_text(obj, "page")?,
        collection_id: None,
        collection_type: None,
        metadata: obj.get("metadata").and_then(Value::as_object).cloned(),
    }))
}

/// Parse whatever JSON sits at a source-like field into records.
///
/// `field` only labels diagnostics. A record that fails to parse is skipped;
/// the rest of the field is still returned.
pub fn parse_source_field(field: &str, value: &Value) -> Vec<SourceRecord> {
    match value {
        Value::Array(items) => items
            .iter()
            .enumerate()
            .filter_map(|(index, item)| match item {
                Value::Object(obj) => admit(field, index, record_from_object(obj)),
                Value::String(url) if !url.is_empty() => Some(SourceRecord::from_url(url.clone())),
                _ => None,
            })
            .collect(),
        Value::Object(obj) => admit(field, 0, record_from_object(obj))
            .into_iter()
            .collect(),
        Value::String(url) if looks_like_url(url) => vec![SourceRecord::from_url(url.clone())],
        _ => Vec::new(),
    }
}

fn admit(field: &str, index: usize, parsed: Result<Option<SourceRecord>>) -> Option<SourceRecord> {
    match parsed {
        Ok(record) => record,
        Err(err) => {
            tracing::debug!(field, index, error = %err, "skipping unparseable source record");
            None
        }
    }
}

/// Extract sources embedded in function-call or tool-call arguments.
///
/// `payload` is a single call object or a list of them. Arguments are read
/// from `arguments`, or `function.arguments` for OpenAI-style tool calls, and
/// may be a JSON-encoded string or an already-decoded object. A call whose
/// arguments fail to decode is skipped.
pub fn parse_function_calls(payload: &Value) -> Vec<SourceRecord> {
    let calls: Vec<&Value> = match payload {
        Value::Array(items) => items.iter().collect(),
        other => vec![other],
    };

    calls
        .into_iter()
        .enumerate()
        .flat_map(|(index, call)| {
            call_sources(call).unwrap_or_else(|err| {
                tracing::debug!(call = index, error = %err, "skipping function call arguments");
                Vec::new()
            })
        })
        .collect()
}

fn call_sources(call: &Value) -> Result<Vec<SourceRecord>> {
    let arguments = call
        .get("arguments")
        .or_else(|| call.get("function").and_then(|f| f.get("arguments")));

    let Some(arguments) = arguments else {
        return Ok(Vec::new());
    };

    let decoded;
    let arguments = match arguments {
        Value::String(encoded) => {
            decoded = serde_json::from_str::<Value>(encoded).map_err(|e| {
                ExtractError::InvalidJson {
                    field: "arguments".to_string(),
                    message: e.to_string(),
                }
            })?;
            &decoded
        }
        other => other,
    };

    Ok(arguments
        .get("sources")
        .map(|sources| parse_source_field("arguments.sources", sources))
        .unwrap_or_default())
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn list_of_objects_uses_aliases() {
        let value = json!([
            {"title": "A", "link": "https://a.example", "content": "alpha", "relevance": 0.4},
            {"title": "B", "source": "https://b.example", "text": "beta", "score": "0.7"},
        ]);
        let records = parse_source_field("citations", &value);
        assert_eq!(records.len(), 2);
        assert_eq!(records[0].url, "https://a.example");
        assert_eq!(records[0].snippet, "alpha");
        assert!((records[0].score - 0.4).abs() < 1e-9);
        assert_eq!(records[1].url, "https://b.example");
        assert_eq!(records[1].snippet, "beta");
        assert!((records[1].score - 0.7).abs() < 1e-9);
    }

    #[test]
    fn url_alias_prefers_url_over_link() {
        let value = json!({"url": "https://primary", "link": "https://secondary"});
        let records = parse_source_field("links", &value);
        assert_eq!(records[0].url, "https://primary");
    }

    #[test]
    fn empty_alias_falls_through() {
        let value = json!({"url": "", "link": "https://fallback", "snippet": "", "content": "body"});
        let records = parse_source_field("links", &value);
        assert_eq!(records[0].url, "https://fallback");
        assert_eq!(records[0].snippet, "body");
    }

    #[test]
    fn string_elements_become_url_records() {
        let value = json!(["https://a.example", "not-a-url-but-kept", ""]);
        let records = parse_source_field("links", &value);
        assert_eq!(records.len(), 2);
        assert_eq!(records[1].url, "not-a-url-but-kept");
        assert!(records[1].title.is_empty());
    }

    #[test]
    fn bare_string_needs_url_prefix() {
        assert_eq!(
            parse_source_field("source_links", &json!("www.example.com")).len(),
            1
        );
        assert_eq!(
            parse_source_field("source_links", &json!("http://example.com")).len(),
            1
        );
        assert!(parse_source_field("source_links", &json!("plain words")).is_empty());
    }

    #[test]
    fn snippet_only_object_is_dropped() {
        let value = json!([{"snippet": "orphan text", "score": 0.9}]);
        assert!(parse_source_field("references", &value).is_empty());
    }

    #[test]
    fn bad_score_skips_only_that_record() {
        let value = json!([
            {"title": "bad", "score": "high"},
            {"title": "good", "score": 0.5},
        ]);
        let records = parse_source_field("references", &value);
        assert_eq!(records.len(), 1);
        assert_eq!(records[0].title, "good");
    }

    #[test]
    fn missing_score_defaults_to_zero() {
        let records = parse_source_field("references", &json!({"title": "T"}));
        assert_eq!(records[0].score, 0.0);
    }

    #[test]
    fn scalars_and_numbers_ignored() {
        assert!(parse_source_field("metadata", &json!(42)).is_empty());
        assert!(parse_source_field("metadata", &json!(null)).is_empty());
        assert!(parse_source_field("metadata", &json!([1, true, null])).is_empty());
    }

    #[test]
    fn metadata_object_is_carried() {
        let value = json!({"title": "T", "metadata": {"lang": "en"}});
        let records = parse_source_field("citations", &value);
        let meta = records[0].metadata.as_ref().unwrap();
        assert_eq!(meta["lang"], "en");
    }

    #[test]
    fn function_call_with_encoded_arguments() {
        let payload = json!({
            "name": "search",
            "arguments": "{\"sources\": [{\"title\": \"Doc\", \"url\": \"https://doc\"}]}"
        });
        let records = parse_function_calls(&payload);
        assert_eq!(records.len(), 1);
        assert_eq!(records[0].title, "Doc");
    }

    #[test]
    fn tool_calls_read_nested_function_arguments() {
        let payload = json!([
            {"type": "function", "function": {"name": "a", "arguments": {"sources": "https://x.example"}}},
            {"type": "function", "function": {"name": "b", "arguments": "{\"sources\": [\"https://y.example\"]}"}},
        ]);
        let urls: Vec<String> = parse_function_calls(&payload)
            .into_iter()
            .map(|r| r.url)
            .collect();
        assert_eq!(urls, vec!["https://x.example", "https://y.example"]);
    }

    #[test]
    fn malformed_arguments_skip_only_that_call() {
        let payload = json!([
            {"function": {"arguments": "{not json"}},
            {"function": {"arguments": "{\"sources\": [{\"title\": \"kept\"}]}"}},
        ]);
        let records = parse_function_calls(&payload);
        assert_eq!(records.len(), 1);
        assert_eq!(records[0].title, "kept");
    }

    #[test]
    fn call_without_sources_yields_nothing() {
        let payload = json!({"arguments": {"query": "rust"}});
        assert!(parse_function_calls(&payload).is_empty());
        assert!(parse_function_calls(&json!(null)).is_empty());
    }
}
