//! # Citation Harness CLI (`cite`)
//!
//! Ask questions of a retrieval-backed chat API and print the answer with
//! its normalized, deduplicated sources.
//!
//! ## Usage
//!
//! ```bash
//! cite --config ./config/cite.toml <command>
//! ```
//!
//! ## Commands
//!
//! | Command | Description |
//! |---------|-------------|
//! | `cite ask "<question>"` | Ask a question against a collection |
//! | `cite probe` | Check that the server answers `GET /api/models` |
//! | `cite normalize <file>` | Normalize a saved response body (no config needed) |

use citation_harness::{ask, config, logging, normalize_cmd, probe};
use clap::{Parser, Subcommand};
use std::path::PathBuf;

/// Citation Harness CLI: query a retrieval-backed chat API and normalize
/// its answers into content plus cited sources.
#[derive(Parser)]
#[command(
    name = "cite",
    about = "Citation Harness — ask a retrieval-backed chat API and get answers with normalized sources",
    version
)]
struct Cli {
    /// Path to configuration file (TOML).
    ///
    /// Defaults to `./config/cite.toml`. The API credential is read from the
    /// environment variable named by `[api].api_key_env`.
    #[arg(long, global = true, default_value = "./config/cite.toml")]
    config: PathBuf,

    #[command(subcommand)]
    command: Commands,
}

/// Top-level CLI commands.
#[derive(Subcommand)]
enum Commands {
    /// Ask a question.
    ///
    /// Sends the question to `/api/chat/completions`, scoped to a document
    /// collection, and prints the answer followed by its sources.
    Ask {
        /// The question to ask.
        question: String,

        /// Collection ID to search. Defaults to `[api].default_collection`.
        #[arg(long)]
        collection: Option<String>,

        /// Print the full normalized result as JSON.
        #[arg(long)]
        json: bool,
    },

    /// Check connectivity.
    ///
    /// Exits with a non-zero status when `GET /api/models` does not
    /// answer 200.
    Probe,

    /// Normalize a saved response body.
    ///
    /// Reads a chat-completion response from a file (or `-` for stdin) and
    /// prints it the same way `ask` would. Does not need a config file.
    Normalize {
        /// Path to the response JSON, or `-` for stdin.
        path: PathBuf,

        /// Print the full normalized result as JSON.
        #[arg(long)]
        json: bool,
    },
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    // Commands that don't require config
    if let Commands::Normalize { path, json } = &cli.command {
        logging::init("warn");
        normalize_cmd::run_normalize(path, *json)?;
        return Ok(());
    }

    let cfg = config::load_config(&cli.config)?;
    logging::init(&cfg.logging.filter);

    match cli.command {
        Commands::Ask {
            question,
            collection,
            json,
        } => {
            ask::run_ask(&cfg, &question, collection, json).await?;
        }
        Commands::Probe => {
            probe::run_probe(&cfg).await?;
        }
        Commands::Normalize { .. } => {
            // Handled above (before config loading)
            unreachable!()
        }
    }

    Ok(())
}
