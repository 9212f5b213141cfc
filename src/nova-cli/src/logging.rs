//! Tracing setup for the CLI.

use anyhow::Result;
use tracing_subscriber::EnvFilter;

use crate::cli::LogLevel;

/// Environment variable selecting the log level.
pub const NOVA_LOG_LEVEL_ENV: &str = "NOVA_LOG_LEVEL";

/// File written by `--debug`.
pub const DEBUG_LOG_FILE: &str = "nova-debug.log";

/// Guard that ensures debug log file is properly flushed when dropped.
pub struct DebugLogGuard {
    _guard: tracing_appender::non_blocking::WorkerGuard,
}

/// Builds the filter directive for stderr logging.
///
/// `--log-level` wins, then `NOVA_LOG_LEVEL`, then a raw `RUST_LOG` directive.
pub fn filter_directive(
    cli_level: Option<LogLevel>,
    nova_log_level: Option<&str>,
    rust_log: Option<&str>,
) -> String {
    if let Some(level) = cli_level {
        return level.as_filter_str().to_string();
    }
    if let Some(level) = nova_log_level.and_then(LogLevel::from_str_loose) {
        return level.as_filter_str().to_string();
    }
    match rust_log {
        Some(directive) if !directive.trim().is_empty() => directive.to_string(),
        _ => LogLevel::default().as_filter_str().to_string(),
    }
}

/// Installs the stderr subscriber.
pub fn init_stderr_logging(cli_level: Option<LogLevel>) {
    let directive = filter_directive(
        cli_level,
        std::env::var(NOVA_LOG_LEVEL_ENV).ok().as_deref(),
        std::env::var("RUST_LOG").ok().as_deref(),
    );
    let filter = EnvFilter::try_new(&directive).unwrap_or_else(|_| EnvFilter::new("warn"));

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .with_target(false)
        .init();
}

/// Set up debug file logging that writes ALL trace-level logs to ./nova-debug.log.
pub fn init_debug_file_logging() -> Result<DebugLogGuard> {
    use std::fs::File;
    use tracing_subscriber::layer::SubscriberExt;
    use tracing_subscriber::util::SubscriberInitExt;

    let debug_file_path = std::env::current_dir()?.join(DEBUG_LOG_FILE);

    let file = File::create(&debug_file_path).map_err(|e| {
        anyhow::anyhow!(
            "Failed to create {}: {}. Check write permissions.",
            DEBUG_LOG_FILE,
            e
        )
    })?;

    let (non_blocking, guard) = tracing_appender::non_blocking(file);

    let file_layer = tracing_subscriber::fmt::layer()
        .with_writer(non_blocking)
        .with_ansi(false)
        .with_target(true)
        .with_thread_ids(true)
        .with_file(true)
        .with_line_number(true);

    tracing_subscriber::registry()
        .with(EnvFilter::new("trace"))
        .with(file_layer)
        .init();

    eprintln!(
        "Debug mode enabled: logging to {}",
        debug_file_path.display()
    );

    Ok(DebugLogGuard { _guard: guard })
}
