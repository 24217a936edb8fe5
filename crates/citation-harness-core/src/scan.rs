//! Source-location scanning.
//!
//! Sources can appear in several places of one response. They are visited
//! in a fixed order, because the deduplicator keeps the first occurrence:
//!
//! 1. top-level `sources` (OpenWebUI source groups),
//! 2. top-level [`SOURCE_FIELDS`],
//! 3. per choice: `message.<SOURCE_FIELDS>`, then `function_call` /
//!    `tool_calls` arguments,
//! 4. top-level `context`, else `retrieved_docs`.
//!
//! Each location is parsed on its own; a location that fails contributes
//! nothing and the scan moves on. The top-level `sources` and `metadata`
//! locations can describe the same documents; both are scanned and the
//! deduplicator settles the overlap.

use serde_json::Value;

use crate::dedup::deduplicate;
use crate::error::Result;
use crate::models::SourceRecord;
use crate::openwebui::parse_source_groups;
use crate::parse::{parse_function_calls, parse_source_field};

/// Source-like field names checked at the top level and inside each
/// choice's message.
pub const SOURCE_FIELDS: &[&str] = &[
    "citations",
    "references",
    "links",
    "source_documents",
    "source_links",
    "metadata",
];

const CALL_FIELDS: &[&str] = &["function_call", "tool_calls"];
const CONTEXT_FIELDS: &[&str] = &["context", "retrieved_docs"];

/// Collect, then deduplicate, every source found in `raw`.
pub fn scan_sources(raw: &Value) -> Vec<SourceRecord> {
    let mut found = Vec::new();

    if let Some(groups) = raw.get("sources") {
        absorb(&mut found, "sources", parse_source_groups(groups));
    }

    for field in SOURCE_FIELDS {
        if let Some(value) = raw.get(*field) {
            absorb(&mut found, field, Ok(parse_source_field(field, value)));
        }
    }

    if let Some(choices) = raw.get("choices").and_then(Value::as_array) {
        for (index, choice) in choices.iter().enumerate() {
            scan_choice(&mut found, index, choice);
        }
    }

    let context = CONTEXT_FIELDS
        .iter()
        .find_map(|field| raw.get(*field).filter(|v| !v.is_null()).map(|v| (*field, v)));
    if let Some((field, value)) = context {
        absorb(&mut found, field, Ok(parse_source_field(field, value)));
    }

    let scanned = found.len();
    let sources = deduplicate(found);
    tracing::debug!(scanned, kept = sources.len(), "collected response sources");
    sources
}

fn scan_choice(found: &mut Vec<SourceRecord>, index: usize, choice: &Value) {
    let message = choice.get("message");

    for field in SOURCE_FIELDS {
        if let Some(value) = message.and_then(|m| m.get(*field)) {
            let location = format!("choices[{index}].message.{field}");
            absorb(found, &location, Ok(parse_source_field(&location, value)));
        }
    }

    for field in CALL_FIELDS {
        let payload = message
            .and_then(|m| m.get(*field))
            .or_else(|| choice.get(*field));
        if let Some(payload) = payload {
            let location = format!("choices[{index}].{field}");
            absorb(found, &location, Ok(parse_function_calls(payload)));
        }
    }
}

/// Append one location's records, or log and drop its failure.
fn absorb(found: &mut Vec<SourceRecord>, location: &str, parsed: Result<Vec<SourceRecord>>) {
    match parsed {
        Ok(mut records) => found.append(&mut records),
        Err(err) => tracing::debug!(location, error = %err, "skipping source location"),
    }
}
