//! Nova CLI - Main entry point.
//!
//! - Interactive chat (default)
//! - One-shot questions with optional CSV export
//! - Offline table extraction
//! - Server health check

use anyhow::Result;
use clap::Parser;

use nova_cli::cli::{Cli, dispatch_command};
use nova_cli::logging::{init_debug_file_logging, init_stderr_logging};

#[tokio::main]
async fn main() -> Result<()> {
    // Load .env before anything reads the environment
    let dotenv = dotenvy::dotenv();

    let cli = Cli::parse();

    // Initialize debug file logging if --debug flag is passed
    let _debug_guard = if cli.global.debug {
        Some(init_debug_file_logging()?)
    } else {
        init_stderr_logging(cli.global.log_level);
        None
    };

    match dotenv {
        Ok(path) => tracing::debug!(path = %path.display(), "Loaded .env"),
        Err(err) if err.not_found() => {}
        Err(err) => tracing::warn!("Failed to load .env: {}", err),
    }

    dispatch_command(cli).await
}
