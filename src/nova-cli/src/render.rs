//! Terminal output for revealed replies.
//!
//! The reveal engine reports growing prefixes; a terminal can only append, so
//! [`ReplyPrinter`] turns each prefix into the text not printed yet and
//! [`play_reply`] drives one reply from first tick to settled.

use std::future::Future;
use std::io::{self, Write};

use nova_core::{ChatBackend, Conversation, MessageId, RevealEvents};

/// Output sink that knows whether the terminal is in raw mode.
///
/// Raw mode disables the `\n` to `\r\n` translation, so it is done here.
pub struct Console<W: Write> {
    out: W,
    raw: bool,
}

impl<W: Write> Console<W> {
    pub fn new(out: W, raw: bool) -> Self {
        Self { out, raw }
    }

    /// Writes `text` and flushes.
    pub fn write(&mut self, text: &str) -> io::Result<()> {
        if text.is_empty() {
            return Ok(());
        }
        if self.raw {
            self.out.write_all(text.replace('\n', "\r\n").as_bytes())?;
        } else {
            self.out.write_all(text.as_bytes())?;
        }
        self.out.flush()
    }

    /// Writes `text` followed by a line break.
    pub fn line(&mut self, text: &str) -> io::Result<()> {
        self.write(text)?;
        self.write("\n")
    }

    pub fn into_inner(self) -> W {
        self.out
    }
}

/// Tracks how much of a reply has been printed.
#[derive(Debug, Default)]
pub struct ReplyPrinter {
    printed: usize,
}

impl ReplyPrinter {
    /// Returns the part of `shown` that has not been printed yet.
    pub fn next_chunk<'a>(&mut self, shown: &'a str) -> &'a str {
        if shown.len() <= self.printed || !shown.is_char_boundary(self.printed) {
            return "";
        }
        let chunk = &shown[self.printed..];
        self.printed = shown.len();
        chunk
    }
}

/// Prints the reply `id` as it is revealed, ending with a newline.
///
/// When `interrupt` completes the reveal is skipped and the rest of the
/// reply is printed at once.
pub async fn play_reply<B, W, F>(
    conversation: &mut Conversation<B>,
    events: &mut RevealEvents,
    id: MessageId,
    console: &mut Console<W>,
    interrupt: F,
) -> io::Result<()>
where
    B: ChatBackend,
    W: Write,
    F: Future<Output = ()>,
{
    let mut printer = ReplyPrinter::default();
    tokio::pin!(interrupt);
    let mut interrupted = false;

    loop {
        if let Some(shown) = conversation.displayed_text(id) {
            console.write(printer.next_chunk(shown))?;
        }
        if !conversation.message(id).is_some_and(|m| m.animate) {
            break;
        }

        tokio::select! {
            event = events.recv() => match event {
                Some(event) => {
                    conversation.apply(event);
                }
                None => {
                    conversation.skip_reveal(id);
                }
            },
            () = &mut interrupt, if !interrupted => {
                interrupted = true;
                tracing::debug!(%id, "reveal skipped");
                conversation.skip_reveal(id);
            }
        }
    }

    console.write("\n")
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_support::ScriptedBackend;
    use nova_core::RevealEngine;
    use pretty_assertions::assert_eq;

    fn output(console: Console<Vec<u8>>) -> String {
        String::from_utf8(console.into_inner()).expect("utf-8 output")
    }

    #[test]
    fn test_printer_emits_only_new_text() {
        let mut printer = ReplyPrinter::default();
        assert_eq!(printer.next_chunk(""), "");
        assert_eq!(printer.next_chunk("He"), "He");
        assert_eq!(printer.next_chunk("He"), "");
        assert_eq!(printer.next_chunk("Hell"), "ll");
        assert_eq!(printer.next_chunk("Hello"), "o");
    }

    #[test]
    fn test_printer_with_multibyte_text() {
        let mut printer = ReplyPrinter::default();
        assert_eq!(printer.next_chunk("日"), "日");
        assert_eq!(printer.next_chunk("日本語"), "本語");
    }

    #[test]
    fn test_raw_console_translates_newlines() {
        let mut console = Console::new(Vec::new(), true);
        console.line("a\nb").expect("write");
        assert_eq!(output(console), "a\r\nb\r\n");

        let mut console = Console::new(Vec::new(), false);
        console.line("a\nb").expect("write");
        assert_eq!(output(console), "a\nb\n");
    }

    #[tokio::test(start_paused = true)]
    async fn test_play_reply_prints_whole_reply_once() {
        let (mut conv, mut events) =
            Conversation::new(ScriptedBackend::replying(["Hello, world"]), RevealEngine::new());
        let id = conv.submit("hi").await.expect("reply id");

        let mut console = Console::new(Vec::new(), false);
        play_reply(
            &mut conv,
            &mut events,
            id,
            &mut console,
            std::future::pending(),
        )
        .await
        .expect("play");

        assert_eq!(output(console), "Hello, world\n");
        assert!(!conv.is_typing());
    }

    #[tokio::test(start_paused = true)]
    async fn test_interrupt_skips_to_full_text() {
        let long_reply = "word ".repeat(400);
        let (mut conv, mut events) = Conversation::new(
            ScriptedBackend::replying([long_reply.clone()]),
            RevealEngine::new(),
        );
        let id = conv.submit("hi").await.expect("reply id");

        let mut console = Console::new(Vec::new(), false);
        play_reply(
            &mut conv,
            &mut events,
            id,
            &mut console,
            tokio::time::sleep(std::time::Duration::from_millis(50)),
        )
        .await
        .expect("play");

        assert_eq!(output(console), format!("{long_reply}\n"));
        assert!(!conv.message(id).expect("reply").animate);
    }

    #[tokio::test]
    async fn test_unanimated_reply_prints_at_once() {
        let (conv, mut events) =
            Conversation::new(ScriptedBackend::replying(["instant"]), RevealEngine::new());
        let mut conv = conv.with_animation(false);
        let id = conv.submit("hi").await.expect("reply id");

        let mut console = Console::new(Vec::new(), true);
        play_reply(
            &mut conv,
            &mut events,
            id,
            &mut console,
            std::future::pending(),
        )
        .await
        .expect("play");

        assert_eq!(output(console), "instant\r\n");
    }
}
