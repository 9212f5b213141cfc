//! Interactive chat command.
//!
//! On a terminal the REPL runs in raw mode and edits the pending message with
//! [`InputBuffer`]; Ctrl+C during a reveal skips to the full reply. With
//! piped stdin every line is sent as a message.

use std::future::Future;
use std::io::{self, IsTerminal, Write};
use std::path::PathBuf;

use anyhow::Result;
use crossterm::event::{
    DisableBracketedPaste, EnableBracketedPaste, Event, EventStream, KeyCode, KeyEvent,
    KeyEventKind, KeyModifiers,
};
use crossterm::{execute, terminal};
use futures::StreamExt;
use nova_core::{
    ChatBackend, Clock, Conversation, InputAction, InputBuffer, RevealEvents, SystemClock,
};
use tokio::io::{AsyncBufReadExt, BufReader};

use crate::cli::handlers::{build_client, build_conversation};
use crate::config::NovaConfig;
use crate::render::{Console, play_reply};

const PROMPT: &str = "you> ";

const HELP: &str = "\
Commands:
  /export [dir]  save the table in the latest reply as CSV
  /reset         start a new conversation
  /health        show the model served by the server
  /help          show this help
  /quit          leave

Enter sends, Shift+Enter adds a line, Ctrl+C skips a reply being typed.";

/// A `/` command typed at the prompt.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SlashCommand {
    Export(Option<PathBuf>),
    Reset,
    Health,
    Help,
    Quit,
    Unknown(String),
}

impl SlashCommand {
    /// Parses `input` as a command; `None` if it is a regular message.
    pub fn parse(input: &str) -> Option<Self> {
        let rest = input.trim().strip_prefix('/')?;
        let (name, arg) = match rest.split_once(char::is_whitespace) {
            Some((name, arg)) => (name, Some(arg.trim()).filter(|a| !a.is_empty())),
            None => (rest, None),
        };

        Some(match name.to_lowercase().as_str() {
            "export" => SlashCommand::Export(arg.map(PathBuf::from)),
            "reset" | "clear" | "new" => SlashCommand::Reset,
            "health" => SlashCommand::Health,
            "help" | "?" => SlashCommand::Help,
            "quit" | "exit" | "q" => SlashCommand::Quit,
            other => SlashCommand::Unknown(other.to_string()),
        })
    }
}

/// Whether the REPL keeps going after a line.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Flow {
    Continue,
    Quit,
}

/// A conversation plus the bits the REPL needs around it.
pub struct ChatSession<B> {
    conversation: Conversation<B>,
    events: RevealEvents,
    export_dir: PathBuf,
    clock: Box<dyn Clock>,
}

impl<B: ChatBackend> ChatSession<B> {
    pub fn new(conversation: Conversation<B>, events: RevealEvents, export_dir: PathBuf) -> Self {
        Self {
            conversation,
            events,
            export_dir,
            clock: Box::new(SystemClock),
        }
    }

    /// Replaces the clock used to name exported files.
    pub fn with_clock(mut self, clock: impl Clock + 'static) -> Self {
        self.clock = Box::new(clock);
        self
    }

    pub fn conversation(&self) -> &Conversation<B> {
        &self.conversation
    }

    /// Handles one line of input: a command or a message to send.
    ///
    /// `interrupt` is only awaited while a reply is being revealed.
    pub async fn dispatch<W, F>(
        &mut self,
        line: &str,
        console: &mut Console<W>,
        interrupt: F,
    ) -> io::Result<Flow>
    where
        W: Write,
        F: Future<Output = ()>,
    {
        match SlashCommand::parse(line) {
            Some(command) => self.run_command(command, console).await,
            None => {
                self.send(line, console, interrupt).await?;
                Ok(Flow::Continue)
            }
        }
    }

    /// Sends a message and prints the reply as it is revealed.
    pub async fn send<W, F>(
        &mut self,
        text: &str,
        console: &mut Console<W>,
        interrupt: F,
    ) -> io::Result<()>
    where
        W: Write,
        F: Future<Output = ()>,
    {
        let Some(id) = self.conversation.submit(text).await else {
            return Ok(());
        };
        play_reply(
            &mut self.conversation,
            &mut self.events,
            id,
            console,
            interrupt,
        )
        .await?;

        if self.conversation.can_export() {
            console.line("(table detected: /export saves it as CSV)")?;
        }
        Ok(())
    }

    pub async fn run_command<W: Write>(
        &mut self,
        command: SlashCommand,
        console: &mut Console<W>,
    ) -> io::Result<Flow> {
        match command {
            SlashCommand::Export(dir) => {
                let dir = dir.unwrap_or_else(|| self.export_dir.clone());
                match self.conversation.export(&*self.clock) {
                    None => console.line("Nothing to export: the latest reply has no table.")?,
                    Some(artifact) => match artifact.write_to(&dir) {
                        Ok(path) => console.line(&format!("Saved {}", path.display()))?,
                        Err(err) => console.line(&format!("Export failed: {err}"))?,
                    },
                }
            }
            SlashCommand::Reset => {
                self.conversation.reset();
                console.line("Conversation cleared.")?;
            }
            SlashCommand::Health => match self.conversation.health().await {
                Some(model) => console.line(&format!("Model: {model}"))?,
                None => console.line("Server unreachable.")?,
            },
            SlashCommand::Help => console.line(HELP)?,
            SlashCommand::Quit => return Ok(Flow::Quit),
            SlashCommand::Unknown(name) => {
                console.line(&format!("Unknown command /{name}. Type /help for help."))?
            }
        }
        Ok(Flow::Continue)
    }

    /// Raw-mode REPL on an interactive terminal.
    pub async fn run_terminal(&mut self) -> Result<()> {
        let _raw = RawModeGuard::enable()?;
        let mut console = Console::new(io::stdout(), true);
        let mut keys = EventStream::new();
        let mut input = InputBuffer::new();

        console.line("Nova chat. Type /help for commands.")?;
        console.write(PROMPT)?;

        while let Some(event) = keys.next().await {
            match event? {
                Event::Key(key) => match input.apply(key) {
                    InputAction::Inserted(c) => console.write(c.encode_utf8(&mut [0; 4]))?,
                    InputAction::Newline => console.write("\n")?,
                    InputAction::Deleted('\n') => {}
                    InputAction::Deleted(_) => console.write("\u{8} \u{8}")?,
                    InputAction::Cleared => {
                        console.line("^C")?;
                        console.write(PROMPT)?;
                    }
                    InputAction::Submit(text) => {
                        console.write("\n")?;
                        let flow = self
                            .dispatch(&text, &mut console, ctrl_c_key(&mut keys))
                            .await?;
                        if flow == Flow::Quit {
                            break;
                        }
                        console.write(PROMPT)?;
                    }
                    InputAction::Quit => {
                        console.write("\n")?;
                        break;
                    }
                    InputAction::Ignored => {}
                },
                Event::Paste(text) => {
                    input.insert_str(&text);
                    console.write(&text)?;
                }
                _ => {}
            }
        }
        Ok(())
    }

    /// Line-oriented REPL for piped input.
    pub async fn run_lines(&mut self) -> Result<()> {
        let mut console = Console::new(io::stdout(), false);
        let mut lines = BufReader::new(tokio::io::stdin()).lines();

        loop {
            let line = tokio::select! {
                line = lines.next_line() => line?,
                _ = tokio::signal::ctrl_c() => None,
            };
            let Some(line) = line else { break };
            if line.trim().is_empty() {
                continue;
            }
            if self.dispatch(&line, &mut console, ctrl_c_signal()).await? == Flow::Quit {
                break;
            }
        }
        Ok(())
    }
}

/// Runs the chat REPL.
pub async fn run_chat(config: &NovaConfig) -> Result<()> {
    let client = build_client(config)?;
    let (conversation, events) = build_conversation(client, config, config.reveal.animate);
    let mut session = ChatSession::new(conversation, events, config.export_dir());

    if let Some(model) = session.conversation().health().await {
        tracing::info!(model = %model, "connected to Nova server");
    }

    if io::stdin().is_terminal() {
        session.run_terminal().await
    } else {
        session.run_lines().await
    }
}

/// Completes on Ctrl+C delivered as a signal.
pub async fn ctrl_c_signal() {
    if tokio::signal::ctrl_c().await.is_err() {
        std::future::pending::<()>().await;
    }
}

/// Completes when Ctrl+C is pressed in raw mode.
async fn ctrl_c_key(keys: &mut EventStream) {
    while let Some(Ok(event)) = keys.next().await {
        if matches!(event, Event::Key(key) if is_ctrl_c(&key)) {
            return;
        }
    }
    std::future::pending::<()>().await;
}

fn is_ctrl_c(key: &KeyEvent) -> bool {
    key.kind != KeyEventKind::Release
        && key.code == KeyCode::Char('c')
        && key.modifiers.contains(KeyModifiers::CONTROL)
}

/// Restores the terminal when the REPL ends, including on error.
struct RawModeGuard;

impl RawModeGuard {
    fn enable() -> io::Result<Self> {
        terminal::enable_raw_mode()?;
        if let Err(err) = execute!(io::stdout(), EnableBracketedPaste) {
            tracing::debug!("Bracketed paste unavailable: {}", err);
        }
        Ok(Self)
    }
}

impl Drop for RawModeGuard {
    fn drop(&mut self) {
        let _ = execute!(io::stdout(), DisableBracketedPaste);
        let _ = terminal::disable_raw_mode();
    }
}
