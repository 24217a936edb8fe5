//! The normalization entry point.
//!
//! [`normalize`] runs content extraction and source scanning over one raw
//! response and packages the outcome as a [`NormalizedResult`]. It never
//! fails: when the answer text cannot be read, the content becomes
//! [`PARSE_FAILURE_CONTENT`] and the sources are left empty.

use serde_json::Value;

use crate::content::extract_content;
use crate::models::{NormalizedResult, RequestContext};
use crate::scan::scan_sources;

/// Content used when the response's answer text cannot be extracted.
pub const PARSE_FAILURE_CONTENT: &str = "[ERROR: Failed to parse API response]";

/// Normalize one decoded chat-completion response.
///
/// `context` only labels diagnostics. The raw document is moved into the
/// result untouched.
pub fn normalize(raw: Value, context: Option<&RequestContext>) -> NormalizedResult {
    let query = context.and_then(|c| c.query.as_deref()).unwrap_or_default();
    let collection = context
        .and_then(|c| c.collection_id.as_deref())
        .unwrap_or_default();

    match extract_content(&raw) {
        Ok(extracted) => {
            let sources = scan_sources(&raw);
            tracing::debug!(
                shape = ?extracted.shape,
                sources = sources.len(),
                query,
                collection,
                "normalized response"
            );
            NormalizedResult {
                content: extracted.text,
                sources,
                raw_response: raw,
                status: None,
                error: None,
            }
        }
        Err(err) => {
            tracing::error!(error = %err, query, collection, "failed to parse API response");
            NormalizedResult {
                content: PARSE_FAILURE_CONTENT.to_string(),
                sources: Vec::new(),
                raw_response: raw,
                status: None,
                error: None,
            }
        }
    }
}
