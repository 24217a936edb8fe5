//! Tracing subscriber setup for the `cite` binary.
//!
//! Diagnostics go to stderr so that stdout carries only command output
//! (answers, formatted sources, or JSON). `RUST_LOG` takes precedence over
//! the configured default filter.

use tracing_subscriber::EnvFilter;

/// Install the global subscriber. Safe to call more than once; later calls
/// are ignored.
pub fn init(default_filter: &str) {
    let filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_filter));

    let _ = tracing_subscriber::fmt()
        .with_writer(std::io::stderr)
        .with_env_filter(filter)
        .with_target(false)
        .try_init();
}
