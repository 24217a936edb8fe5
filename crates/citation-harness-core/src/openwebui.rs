//! OpenWebUI retrieval source groups.
//!
//! OpenWebUI reports retrieval results under a top-level `sources` list. Each
//! element is a *source group*: one collection's hits as parallel arrays.
//!
//! ```json
//! {
//!   "source": {"id": "kb-1", "type": "collection"},
//!   "document": ["chunk one", "chunk two"],
//!   "metadata": [{"title": "Guide", "page": 3}, {"ti": "Paper", "hdl": "https://..."}],
//!   "distances": [0.12, 0.4]
//! }
//! ```
//!
//! The arrays are frequently ragged. Documents drive iteration; a missing
//! metadata entry reads as `{}` and a missing distance leaves the score at 0.
//! Distances are dissimilarities, so `score = 1 - distance`.

use serde_json::{Map, Value};

use crate::error::{ExtractError, Result};
use crate::format::truncate_with_ellipsis;
use crate::models::SourceRecord;
use crate::parse::{first_text, scalar_text};

/// Longest snippet kept from a retrieved document, in characters.
pub const SNIPPET_CHARS: usize = 300;

const TITLE_KEYS: &[&str] = &["title", "ti", "name"];
const AUTHOR_KEYS: &[&str] = &["author", "au"];
const URL_KEYS: &[&str] = &["url", "hdl"];

/// Parse a top-level `sources` value into records.
///
/// Fails only when `value` is not a list. Individual malformed groups are
/// skipped and logged.
pub fn parse_source_groups(value: &Value) -> Result<Vec<SourceRecord>> {
    let groups = value.as_array().ok_or(ExtractError::UnexpectedShape {
        location: "sources".to_string(),
        expected: "a list of source groups",
    })?;

    let mut records = Vec::new();
    for (index, group) in groups.iter().enumerate() {
        match parse_group(group) {
            Ok(mut parsed) => records.append(&mut parsed),
            Err(err) => tracing::debug!(group = index, error = %err, "skipping source group"),
        }
    }
    Ok(records)
}

fn parse_group(group: &Value) -> Result<Vec<SourceRecord>> {
    let group = group.as_object().ok_or(ExtractError::UnexpectedShape {
        location: "sources[]".to_string(),
        expected: "a source group object",
    })?;

    let origin = group.get("source").and_then(Value::as_object);
    let collection_id = origin.map(|o| first_text(o, &["id"])).unwrap_or_default();
    let collection_type = origin
        .map(|o| first_text(o, &["type"]))
        .unwrap_or_default();

    let documents = as_list(group.get("document"));
    let metadata = as_list(group.get("metadata"));
    let distances = as_list(group.get("distances"));

    let empty = Map::new();
    let records = documents
        .iter()
        .enumerate()
        .map(|(i, document)| {
            let meta = metadata
                .get(i)
                .and_then(|m| m.as_object())
                .unwrap_or(&empty);
            let distance = distances.get(i).and_then(|d| d.as_f64());
            document_record(document, meta, distance, &collection_id, &collection_type)
        })
        .filter(|record| !record.is_blank())
        .collect();

    Ok(records)
}

fn document_record(
    document: &Value,
    meta: &Map<String, Value>,
    distance: Option<f64>,
    collection_id: &str,
    collection_type: &str,
) -> SourceRecord {
    let text = scalar_text(document).unwrap_or_else(|| document.to_string());

    SourceRecord {
        title: first_text(meta, TITLE_KEYS),
        url: first_text(meta, URL_KEYS),
        snippet: truncate_with_ellipsis(&text, SNIPPET_CHARS),
        score: distance.map(|d| 1.0 - d).unwrap_or(0.0),
        author: non_empty(first_text(meta, AUTHOR_KEYS)),
        page: page_label(meta),
        collection_id: non_empty(collection_id.to_string()),
        collection_type: non_empty(collection_type.to_string()),
        metadata: (!meta.is_empty()).then(|| meta.clone()),
    }
}

/// Normalize a parallel-array field: absent or null is empty, a scalar is a
/// one-element list.
fn as_list(value: Option<&Value>) -> Vec<&Value> {
    match value {
        None | Some(Value::Null) => Vec::new(),
        Some(Value::Array(items)) => items.iter().collect(),
        Some(other) => vec![other],
    }
}

fn page_label(meta: &Map<String, Value>) -> Option<String> {
    let page = match meta.get("page")? {
        Value::Number(n) if n.is_f64() => match n.as_f64() {
            Some(f) if f.fract() == 0.0 => format!("{}", f as i64),
            _ => n.to_string(),
        },
        other => scalar_text(other)?,
    };
    (!page.is_empty()).then(|| format!("Page {page}"))
}

fn non_empty(text: String) -> Option<String> {
    (!text.is_empty()).then_some(text)
}
