//! # Citation Harness Core
//!
//! Pure response-normalization logic for Citation Harness: data models,
//! content extraction, source-location scanning, field-shape parsers,
//! deduplication, and source formatting.
//!
//! This crate contains no tokio, reqwest, filesystem I/O, or other
//! native-only dependencies. Every entry point is a synchronous function of
//! its input, so callers may normalize from any thread without locking.
//!
//! ```rust
//! use citation_harness_core::normalize::normalize;
//! use serde_json::json;
//!
//! let raw = json!({"choices": [{"message": {"content": "  Hi there  "}}]});
//! let result = normalize(raw, None);
//! assert_eq!(result.content, "Hi there");
//! assert!(result.sources.is_empty());
//! ```

pub mod content;
pub mod dedup;
pub mod error;
pub mod format;
pub mod models;
pub mod normalize;
pub mod openwebui;
pub mod parse;
pub mod scan;

pub use models::{NormalizedResult, RequestContext, SourceRecord};
pub use normalize::normalize;
