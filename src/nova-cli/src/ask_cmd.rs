//! One-shot question command.

use std::future::Future;
use std::io::{self, IsTerminal, Write};
use std::path::{Path, PathBuf};

use anyhow::{Context, Result, anyhow, bail};
use clap::Parser;
use nova_core::{ChatBackend, Clock, Conversation, RevealEvents, SystemClock};

use crate::chat_cmd::ctrl_c_signal;
use crate::cli::handlers::{build_client, build_conversation};
use crate::config::NovaConfig;
use crate::render::{Console, play_reply};

/// Ask a single question and print the reply.
#[derive(Debug, Parser)]
pub struct AskCommand {
    /// The message to send (multiple words are joined with spaces)
    #[arg(value_name = "MESSAGE", required = true, num_args = 1..)]
    pub message: Vec<String>,

    /// Save the table in the reply as CSV into this directory
    #[arg(long, value_name = "DIR")]
    pub export: Option<PathBuf>,
}

impl AskCommand {
    pub async fn run(self, config: &NovaConfig) -> Result<()> {
        let message = self.message.join(" ");
        let client = build_client(config)?;
        // Piped output gets the reply in one piece.
        let animate = config.reveal.animate && io::stdout().is_terminal();
        let (conversation, events) = build_conversation(client, config, animate);
        let mut console = Console::new(io::stdout(), false);

        ask(
            conversation,
            events,
            &message,
            &mut console,
            self.export.as_deref(),
            &SystemClock,
            ctrl_c_signal(),
        )
        .await?;
        Ok(())
    }
}

/// Sends `message`, prints the reply and optionally exports its table.
///
/// Returns the path of the exported file, if any.
pub async fn ask<B, W, F>(
    mut conversation: Conversation<B>,
    mut events: RevealEvents,
    message: &str,
    console: &mut Console<W>,
    export_dir: Option<&Path>,
    clock: &dyn Clock,
    interrupt: F,
) -> Result<Option<PathBuf>>
where
    B: ChatBackend,
    W: Write,
    F: Future<Output = ()>,
{
    let id = conversation
        .submit(message)
        .await
        .ok_or_else(|| anyhow!("Message is empty"))?;

    if let Some(reply) = conversation.message(id).filter(|m| m.is_error) {
        let reason = reply.content.strip_prefix("Error: ").unwrap_or(&reply.content);
        bail!("{reason}");
    }

    play_reply(&mut conversation, &mut events, id, console, interrupt).await?;

    let Some(dir) = export_dir else {
        return Ok(None);
    };
    let artifact = conversation
        .export(clock)
        .ok_or_else(|| anyhow!("The reply does not contain a table"))?;
    let path = artifact
        .write_to(dir)
        .with_context(|| format!("Failed to export table to {}", dir.display()))?;
    eprintln!("Saved {}", path.display());
    Ok(Some(path))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_support::ScriptedBackend;
    use chrono::NaiveDate;
    use nova_core::{FixedClock, RevealEngine};
    use pretty_assertions::assert_eq;
    use tempfile::TempDir;

    fn clock() -> FixedClock {
        FixedClock(
            NaiveDate::from_ymd_opt(2024, 12, 31)
                .and_then(|d| d.and_hms_opt(23, 59, 59))
                .expect("valid timestamp"),
        )
    }

    fn conversation(backend: ScriptedBackend) -> (Conversation<ScriptedBackend>, RevealEvents) {
        Conversation::new(backend, RevealEngine::new())
    }

    #[test]
    fn test_parse_words_and_export() {
        let cmd = AskCommand::try_parse_from(["ask", "make", "a", "table", "--export", "out"])
            .expect("should parse");
        assert_eq!(cmd.message.join(" "), "make a table");
        assert_eq!(cmd.export, Some(PathBuf::from("out")));

        assert!(AskCommand::try_parse_from(["ask"]).is_err());
    }

    #[tokio::test(start_paused = true)]
    async fn test_ask_prints_revealed_reply() {
        let (conv, events) = conversation(ScriptedBackend::replying(["Paris."]));
        let mut console = Console::new(Vec::new(), false);

        let exported = ask(
            conv,
            events,
            "capital of France?",
            &mut console,
            None,
            &clock(),
            std::future::pending(),
        )
        .await
        .expect("ask");

        assert_eq!(exported, None);
        assert_eq!(console.into_inner(), b"Paris.\n".to_vec());
    }

    #[tokio::test]
    async fn test_ask_with_export() {
        let dir = TempDir::new().expect("tempdir");
        let (conv, events) = conversation(ScriptedBackend::replying(["| x | y |\n| 1 | 2 |"]));
        let mut console = Console::new(Vec::new(), false);

        let exported = ask(
            conv.with_animation(false),
            events,
            "table",
            &mut console,
            Some(dir.path()),
            &clock(),
            std::future::pending(),
        )
        .await
        .expect("ask");

        let path = exported.expect("exported path");
        assert_eq!(path, dir.path().join("nova-table-20241231-235959.csv"));
        assert_eq!(
            std::fs::read_to_string(path).expect("read"),
            "\"x\",\"y\"\n\"1\",\"2\""
        );
    }

    #[tokio::test]
    async fn test_export_requires_a_table() {
        let dir = TempDir::new().expect("tempdir");
        let (conv, events) = conversation(ScriptedBackend::replying(["no table"]));
        let mut console = Console::new(Vec::new(), false);

        let err = ask(
            conv.with_animation(false),
            events,
            "table",
            &mut console,
            Some(dir.path()),
            &clock(),
            std::future::pending(),
        )
        .await
        .unwrap_err();
        assert_eq!(err.to_string(), "The reply does not contain a table");
    }

    #[tokio::test]
    async fn test_backend_error_fails_the_command() {
        let (conv, events) = conversation(ScriptedBackend::failing(400, "messages[] required"));
        let mut console = Console::new(Vec::new(), false);

        let err = ask(
            conv,
            events,
            "hi",
            &mut console,
            None,
            &clock(),
            std::future::pending(),
        )
        .await
        .unwrap_err();
        assert_eq!(
            err.to_string(),
            "Chat service returned 400: messages[] required"
        );
        assert!(console.into_inner().is_empty());
    }
}
