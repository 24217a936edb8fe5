//! Human-readable rendering of source records.
//!
//! Each record becomes one (possibly multi-line) entry:
//!
//! ```text
//! 1. **Deployment Guide** by Ops Team (Page 4)
//!    URL: https://docs.example/deploy
//!    Roll out the canary first, then...
//!    Relevance: 0.873
//! ```
//!
//! Fields that are absent or empty are left out entirely.

use crate::models::SourceRecord;

/// Longest snippet shown per formatted source, in characters.
pub const DISPLAY_SNIPPET_CHARS: usize = 200;

/// Cut `text` to at most `max_chars` characters, appending `...` when
/// anything was removed. Counts characters, not bytes.
pub fn truncate_with_ellipsis(text: &str, max_chars: usize) -> String {
    match text.char_indices().nth(max_chars) {
        Some((cut, _)) => format!("{}...", &text[..cut]),
        None => text.to_string(),
    }
}

/// Render one record as a numbered entry. `index` is 1-based.
pub fn format_source(index: usize, source: &SourceRecord) -> String {
    let mut out = format!("{index}.");

    if !source.title.is_empty() {
        out.push_str(&format!(" **{}**", source.title));
    }
    if let Some(author) = source.author.as_deref().filter(|a| !a.is_empty()) {
        out.push_str(&format!(" by {author}"));
    }
    if let Some(page) = source.page.as_deref().filter(|p| !p.is_empty()) {
        out.push_str(&format!(" ({page})"));
    }
    if !source.url.is_empty() {
        out.push_str(&format!("\n   URL: {}", source.url));
    }
    if !source.snippet.is_empty() {
        out.push_str(&format!(
            "\n   {}",
            truncate_with_ellipsis(&source.snippet, DISPLAY_SNIPPET_CHARS)
        ));
    }
    if source.score > 0.0 {
        out.push_str(&format!("\n   Relevance: {:.3}", source.score));
    }

    out
}

/// Render every record in order, numbering from 1.
pub fn format_sources(sources: &[SourceRecord]) -> Vec<String> {
    sources
        .iter()
        .enumerate()
        .map(|(i, source)| format_source(i + 1, source))
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn truncate_short_text_unchanged() {
        assert_eq!(truncate_with_ellipsis("abc", 3), "abc");
        assert_eq!(truncate_with_ellipsis("", 3), "");
    }

    #[test]
    fn truncate_counts_chars_not_bytes() {
        assert_eq!(truncate_with_ellipsis("ééééé", 2), "éé...");
    }

    #[test]
    fn full_entry() {
        let source = SourceRecord {
            title: "Guide".to_string(),
            url: "https://docs.example".to_string(),
            snippet: "Body".to_string(),
            score: 0.87654,
            author: Some("Ops".to_string()),
            page: Some("Page 4".to_string()),
            ..SourceRecord::default()
        };
        assert_eq!(
            format_source(1, &source),
            "1. **Guide** by Ops (Page 4)\n   URL: https://docs.example\n   Body\n   Relevance: 0.877"
        );
    }

    #[test]
    fn absent_fields_are_omitted() {
        let source = SourceRecord::from_url("https://only.example");
        assert_eq!(format_source(3, &source), "3.\n   URL: https://only.example");
    }

    #[test]
    fn zero_score_hidden_and_snippet_truncated() {
        let source = SourceRecord {
            title: "T".to_string(),
            snippet: "y".repeat(DISPLAY_SNIPPET_CHARS + 1),
            ..SourceRecord::default()
        };
        let text = format_source(1, &source);
        assert!(!text.contains("Relevance"));
        assert!(text.ends_with(&format!("{}...", "y".repeat(DISPLAY_SNIPPET_CHARS))));
    }

    #[test]
    fn numbering_is_one_based() {
        let sources = vec![
            SourceRecord::from_url("https://a"),
            SourceRecord::from_url("https://b"),
        ];
        let lines = format_sources(&sources);
        assert!(lines[0].starts_with("1."));
        assert!(lines[1].starts_with("2."));
    }
}
