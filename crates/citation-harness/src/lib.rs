//! # Citation Harness
//!
//! **Ask a retrieval-backed chat API a question and get back one consistent
//! answer-plus-sources structure, whatever shape the API replied in.**
//!
//! ## Architecture
//!
//! ```text
//! ┌──────────┐   ┌─────────────┐   ┌─────────────────────────┐
//! │   CLI    │──▶│ ChatClient  │──▶│ POST /api/chat/         │
//! │  (cite)  │   │ + Transport │   │      completions        │
//! └──────────┘   └──────┬──────┘   └─────────────────────────┘
//!                       │ raw JSON
//!                       ▼
//!              ┌─────────────────┐
//!              │   Normalizer    │  content + deduplicated sources
//!              │ (harness-core)  │
//!              └─────────────────┘
//! ```
//!
//! ## Quick Start
//!
//! ```bash
//! export OPENWEBUI_API_KEY=sk-...
//! cite probe                                  # check the server answers
//! cite ask "How do we deploy?"                # default collection
//! cite ask "What is on page 4?" --collection kb-manuals --json
//! cite normalize saved-response.json          # offline, no config needed
//! ```
//!
//! ## Modules
//!
//! | Module | Purpose |
//! |--------|---------|
//! | [`config`] | TOML configuration parsing and validation |
//! | [`transport`] | `Transport` trait and the `reqwest` implementation |
//! | [`client`] | Chat client: request payload, failure mapping, probe |
//! | [`ask`] | `cite ask` and result printing |
//! | [`probe`] | `cite probe` |
//! | [`normalize_cmd`] | `cite normalize` for saved responses |
//! | [`logging`] | `tracing` subscriber setup |
//!
//! The normalizer itself lives in `citation-harness-core` and is
//! re-exported here as [`normalizer`].

pub mod ask;
pub mod client;
pub mod config;
pub mod logging;
pub mod normalize_cmd;
pub mod probe;
pub mod transport;

pub use citation_harness_core as normalizer;
pub use citation_harness_core::{NormalizedResult, SourceRecord};
pub use client::{ChatClient, ClientSettings};
