//! CLI argument structures and parsing.

use clap::{Args, Parser, Subcommand};
use std::path::PathBuf;

use crate::ask_cmd::AskCommand;
use crate::extract_cmd::ExtractCommand;

/// Log verbosity level for CLI output.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, clap::ValueEnum)]
pub enum LogLevel {
    /// Only show errors
    Error,
    /// Show warnings and errors (default)
    #[default]
    Warn,
    /// Show informational messages, warnings, and errors
    Info,
    /// Show debug messages and above
    Debug,
    /// Show all messages including trace-level details
    Trace,
}

impl LogLevel {
    /// Convert to tracing filter string.
    pub fn as_filter_str(&self) -> &'static str {
        match self {
            LogLevel::Error => "error",
            LogLevel::Warn => "warn",
            LogLevel::Info => "info",
            LogLevel::Debug => "debug",
            LogLevel::Trace => "trace",
        }
    }

    /// Parse from string (case-insensitive).
    pub fn from_str_loose(s: &str) -> Option<LogLevel> {
        match s.trim().to_lowercase().as_str() {
            "error" => Some(LogLevel::Error),
            "warn" | "warning" => Some(LogLevel::Warn),
            "info" => Some(LogLevel::Info),
            "debug" => Some(LogLevel::Debug),
            "trace" => Some(LogLevel::Trace),
            _ => None,
        }
    }
}

/// Nova - chat with the Nova service from your terminal
///
/// If no subcommand is specified, starts the interactive chat.
#[derive(Debug, Parser)]
#[command(name = "nova")]
#[command(author, version)]
#[command(about = "Nova - terminal chat client", long_about = None)]
pub struct Cli {
    #[clap(flatten)]
    pub global: GlobalArgs,

    #[command(subcommand)]
    pub command: Option<Commands>,
}

/// Flags accepted by every command.
#[derive(Args, Debug, Default)]
pub struct GlobalArgs {
    /// Base URL of the Nova server (overrides config and NOVA_API_URL)
    #[arg(long = "api-url", value_name = "URL", global = true)]
    pub api_url: Option<String>,

    /// Path to config.toml (default: $NOVA_HOME/config.toml or ~/.nova/config.toml)
    #[arg(long = "config", value_name = "FILE", global = true)]
    pub config: Option<PathBuf>,

    /// Set log verbosity level (error, warn, info, debug, trace)
    #[arg(long = "log-level", short = 'L', value_enum, global = true)]
    pub log_level: Option<LogLevel>,

    /// Enable debug mode: writes ALL trace-level logs to ./nova-debug.log
    #[arg(long = "debug", global = true)]
    pub debug: bool,

    /// Show replies at once instead of revealing them progressively
    #[arg(long = "no-animate", global = true)]
    pub no_animate: bool,
}

/// CLI subcommands.
#[derive(Debug, Subcommand)]
pub enum Commands {
    /// Start an interactive chat (default)
    #[command(display_order = 1)]
    Chat,

    /// Ask a single question and print the reply
    #[command(display_order = 2)]
    Ask(AskCommand),

    /// Convert a markdown table to CSV
    #[command(display_order = 3)]
    Extract(ExtractCommand),

    /// Show the model served by the Nova server
    #[command(display_order = 4)]
    Health,
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::CommandFactory;
    use pretty_assertions::assert_eq;

    #[test]
    fn test_cli_definition_is_valid() {
        Cli::command().debug_assert();
    }

    #[test]
    fn test_no_subcommand_means_chat() {
        let cli = Cli::try_parse_from(["nova"]).expect("should parse");
        assert!(cli.command.is_none());
        assert!(!cli.global.debug);
        assert_eq!(cli.global.log_level, None);
    }

    #[test]
    fn test_global_flags_after_subcommand() {
        let cli = Cli::try_parse_from([
            "nova",
            "ask",
            "hello there",
            "--api-url",
            "http://localhost:5001",
            "--no-animate",
            "-L",
            "debug",
        ])
        .expect("should parse");

        assert_eq!(cli.global.api_url.as_deref(), Some("http://localhost:5001"));
        assert!(cli.global.no_animate);
        assert_eq!(cli.global.log_level, Some(LogLevel::Debug));
        match cli.command {
            Some(Commands::Ask(ask)) => assert_eq!(ask.message, vec!["hello there"]),
            other => panic!("unexpected command: {other:?}"),
        }
    }

    #[test]
    fn test_extract_args() {
        let cli = Cli::try_parse_from(["nova", "extract", "reply.md", "-o", "out.csv"])
            .expect("should parse");
        match cli.command {
            Some(Commands::Extract(extract)) => {
                assert_eq!(extract.input, Some(PathBuf::from("reply.md")));
                assert_eq!(extract.output, Some(PathBuf::from("out.csv")));
            }
            other => panic!("unexpected command: {other:?}"),
        }
    }

    #[test]
    fn test_log_level_loose_parsing() {
        assert_eq!(LogLevel::from_str_loose("WARNING"), Some(LogLevel::Warn));
        assert_eq!(LogLevel::from_str_loose(" trace "), Some(LogLevel::Trace));
        assert_eq!(LogLevel::from_str_loose("loud"), None);
        assert_eq!(LogLevel::default().as_filter_str(), "warn");
    }
}
