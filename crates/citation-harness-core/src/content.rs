//! Answer-text extraction.
//!
//! Chat APIs disagree on where the answer lives. The known layouts are kept
//! in one ordered table, [`CONTENT_SHAPES`]; the first row whose predicate
//! matches the document supplies the content, even if that content turns
//! out to be empty.
//!
//! | Shape | Matches when | Content |
//! |-------|--------------|---------|
//! | `Choices` | `choices` is a non-empty list | `choices[0].message.content`, else `choices[0].text` |
//! | `Response` | `response` is a string | `response` |
//! | `Content` | `content` exists | `content` |
//! | `Message` | `message` exists | `message` (string) or `message.content` |
//!
//! A document matching none of them is serialized whole and used as the
//! content, with a warning logged.

use serde_json::Value;

use crate::error::Result;
use crate::parse::text_of;

/// Which layout supplied the content.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ContentShape {
    Choices,
    Response,
    Content,
    Message,
    Unrecognized,
}

/// Trimmed answer text plus the layout it came from.
#[derive(Debug, Clone, PartialEq)]
pub struct ExtractedContent {
    pub text: String,
    pub shape: ContentShape,
}

type Predicate = fn(&Value) -> bool;
type Extractor = fn(&Value) -> Result<String>;

/// Recognized layouts, evaluated top to bottom.
pub const CONTENT_SHAPES: &[(ContentShape, Predicate, Extractor)] = &[
    (ContentShape::Choices, has_choices, from_choices),
    (ContentShape::Response, has_response_text, from_response),
    (ContentShape::Content, has_content, from_content),
    (ContentShape::Message, has_message, from_message),
];

/// Extract the answer text from a raw response.
///
/// Errors only when the matching layout holds a non-text value (an array or
/// object where a string belongs).
pub fn extract_content(raw: &Value) -> Result<ExtractedContent> {
    for (shape, matches, extract) in CONTENT_SHAPES {
        if matches(raw) {
            let text = extract(raw)?;
            return Ok(ExtractedContent {
                text: text.trim().to_string(),
                shape: *shape,
            });
        }
    }

    let keys: Vec<&str> = raw
        .as_object()
        .map(|obj| obj.keys().map(String::as_str).collect())
        .unwrap_or_default();
    tracing::warn!(?keys, "unrecognized response shape, using raw document as content");

    Ok(ExtractedContent {
        text: raw.to_string().trim().to_string(),
        shape: ContentShape::Unrecognized,
    })
}

fn has_choices(raw: &Value) -> bool {
    raw.get("choices")
        .and_then(Value::as_array)
        .is_some_and(|choices| !choices.is_empty())
}

fn from_choices(raw: &Value) -> Result<String> {
    let first = &raw["choices"][0];
    if let Some(content) = first.get("message").and_then(|m| m.get("content")) {
        return text_of("choices[0].message.content", content);
    }
    match first.get("text") {
        Some(text) => text_of("choices[0].text", text),
        None => Ok(String::new()),
    }
}

fn has_response_text(raw: &Value) -> bool {
    raw.get("response").is_some_and(Value::is_string)
}

fn from_response(raw: &Value) -> Result<String> {
    text_of("response", &raw["response"])
}

fn has_content(raw: &Value) -> bool {
    raw.get("content").is_some()
}

fn from_content(raw: &Value) -> Result<String> {
    text_of("content", &raw["content"])
}

fn has_message(raw: &Value) -> bool {
    raw.get("message").is_some()
}

fn from_message(raw: &Value) -> Result<String> {
    match &raw["message"] {
        Value::String(text) => Ok(text.clone()),
        Value::Object(message) => match message.get("content") {
            Some(content) => text_of("message.content", content),
            None => Ok(String::new()),
        },
        _ => Ok(String::new()),
    }
}
