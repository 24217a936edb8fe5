//! Core data models produced by the normalizer.
//!
//! Every value here is created fresh per normalization call and owned by the
//! caller afterwards; nothing is cached or shared between calls.

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

/// One retrieved source (citation) attached to a chat response.
///
/// A record is only ever emitted when at least one of `title`, `url`, or
/// `snippet` is non-empty.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct SourceRecord {
    pub title: String,
    pub url: String,
    pub snippet: String,
    /// Similarity/relevance as reported upstream; 0 when absent.
    pub score: f64,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub author: Option<String>,
    /// Display form, e.g. `"Page 2"`.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub page: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub collection_id: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub collection_type: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub metadata: Option<Map<String, Value>>,
}

impl SourceRecord {
    /// A record carrying nothing but a URL.
    pub fn from_url(url: impl Into<String>) -> Self {
        Self {
            url: url.into(),
            ..Self::default()
        }
    }

    /// True when `title`, `url`, and `snippet` are all empty.
    pub fn is_blank(&self) -> bool {
        self.title.is_empty() && self.url.is_empty() && self.snippet.is_empty()
    }
}

/// The normalized form of one chat-completion response.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct NormalizedResult {
    /// Trimmed answer text.
    pub content: String,
    /// Deduplicated sources in first-seen order.
    pub sources: Vec<SourceRecord>,
    /// The untouched upstream document, kept for diagnostics.
    pub raw_response: Value,
    /// HTTP status, set only on transport failures.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub status: Option<u16>,
    /// Failure description, set only on transport failures.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
}

impl NormalizedResult {
    /// Build the error-shaped result returned when no response body could be
    /// normalized (non-200 status, timeout, connection failure).
    pub fn failure(
        content: impl Into<String>,
        status: Option<u16>,
        error: impl Into<String>,
    ) -> Self {
        Self {
            content: content.into(),
            sources: Vec::new(),
            raw_response: Value::Null,
            status,
            error: Some(error.into()),
        }
    }

    /// True for results built by [`NormalizedResult::failure`].
    pub fn is_failure(&self) -> bool {
        self.error.is_some()
    }
}

/// Optional description of the request a response belongs to.
///
/// Only attached to diagnostics; it never changes the normalized output.
#[derive(Debug, Clone, Default)]
pub struct RequestContext {
    pub query: Option<String>,
    pub collection_id: Option<String>,
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn blank_record() {
        assert!(SourceRecord::default().is_blank());
        assert!(!SourceRecord::from_url("https://a.example").is_blank());
    }

    #[test]
    fn optional_fields_omitted_when_serialized() {
        let record = SourceRecord {
            title: "T".to_string(),
            ..SourceRecord::default()
        };
        let value = serde_json::to_value(&record).unwrap();
        assert_eq!(
            value,
            json!({"title": "T", "url": "", "snippet": "", "score": 0.0})
        );
    }

    #[test]
    fn failure_result_shape() {
        let result = NormalizedResult::failure("[ERROR: Request timed out]", None, "timeout");
        assert!(result.is_failure());
        assert!(result.sources.is_empty());
        assert_eq!(result.raw_response, Value::Null);

        let value = serde_json::to_value(&result).unwrap();
        assert_eq!(value["error"], "timeout");
        assert!(value.get("status").is_none());
    }

    #[test]
    fn models_are_send_sync() {
        fn assert_send_sync<T: Send + Sync>() {}
        assert_send_sync::<SourceRecord>();
        assert_send_sync::<NormalizedResult>();
    }
}
