//! Order-preserving source deduplication.
//!
//! Two records are duplicates when they derive the same key. The key joins
//! the non-empty values of `url`, `title`, `collection_id`, and `page` (in
//! that order) with `|`. A record with none of those falls back to a SHA-256
//! of its JSON form, so distinct contentless records rarely collide; when
//! they do, one is dropped.
//!
//! The first occurrence of a key wins and output order equals input order.
//! Running [`deduplicate`] on its own output is a no-op.

use sha2::{Digest, Sha256};
use std::collections::HashSet;

use crate::models::SourceRecord;

/// Derive the identity key of a record.
pub fn dedup_key(record: &SourceRecord) -> String {
    let parts: Vec<&str> = [
        Some(record.url.as_str()),
        Some(record.title.as_str()),
        record.collection_id.as_deref(),
        record.page.as_deref(),
    ]
    .into_iter()
    .flatten()
    .filter(|part| !part.is_empty())
    .collect();

    if parts.is_empty() {
        structural_hash(record)
    } else {
        parts.join("|")
    }
}

fn structural_hash(record: &SourceRecord) -> String {
    let canonical = serde_json::to_string(record).unwrap_or_default();
    let mut hasher = Sha256::new();
    hasher.update(canonical.as_bytes());
    format!("sha256:{:x}", hasher.finalize())
}

/// Drop records whose key was already seen, keeping first-seen order.
pub fn deduplicate(records: Vec<SourceRecord>) -> Vec<SourceRecord> {
    let mut seen: HashSet<String> = HashSet::with_capacity(records.len());
    records
        .into_iter()
        .filter(|record| seen.insert(dedup_key(record)))
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn with_url(url: &str, title: &str) -> SourceRecord {
        SourceRecord {
            url: url.to_string(),
            title: title.to_string(),
            ..SourceRecord::default()
        }
    }

    #[test]
    fn first_seen_order_preserved() {
        let records = vec![
            with_url("x", "A"),
            with_url("y", "B"),
            with_url("x", "A"),
        ];
        let deduped = deduplicate(records);
        let titles: Vec<&str> = deduped.iter().map(|r| r.title.as_str()).collect();
        assert_eq!(titles, vec!["A", "B"]);
    }

    #[test]
    fn first_occurrence_wins() {
        let mut first = with_url("x", "");
        first.score = 0.1;
        let mut second = with_url("x", "");
        second.score = 0.9;
        let deduped = deduplicate(vec![first, second]);
        assert_eq!(deduped.len(), 1);
        assert!((deduped[0].score - 0.1).abs() < f64::EPSILON);
    }

    #[test]
    fn idempotent() {
        let records = vec![
            with_url("x", "A"),
            with_url("x", "B"),
            with_url("x", "A"),
            with_url("", "A"),
        ];
        let once = deduplicate(records);
        let twice = deduplicate(once.clone());
        assert_eq!(once, twice);
        assert_eq!(once.len(), 3);
    }

    #[test]
    fn key_components_in_order() {
        let record = SourceRecord {
            url: "u".to_string(),
            title: "t".to_string(),
            collection_id: Some("c".to_string()),
            page: Some("Page 1".to_string()),
            ..SourceRecord::default()
        };
        assert_eq!(dedup_key(&record), "u|t|c|Page 1");
    }

    #[test]
    fn pages_distinguish_records() {
        let mut a = with_url("", "Book");
        a.page = Some("Page 1".to_string());
        let mut b = with_url("", "Book");
        b.page = Some("Page 2".to_string());
        assert_eq!(deduplicate(vec![a, b]).len(), 2);
    }

    #[test]
    fn snippet_only_records_use_structural_hash() {
        let a = SourceRecord {
            snippet: "alpha".to_string(),
            ..SourceRecord::default()
        };
        let b = SourceRecord {
            snippet: "beta".to_string(),
            ..SourceRecord::default()
        };
        assert!(dedup_key(&a).starts_with("sha256:"));
        assert_ne!(dedup_key(&a), dedup_key(&b));
        assert_eq!(deduplicate(vec![a.clone(), b, a]).len(), 2);
    }
}
