//! Table extraction command.
//!
//! Reads markdown from a file (or stdin) and writes the first pipe table as
//! quoted CSV.

use std::io::Read;
use std::path::PathBuf;

use anyhow::{Context, Result, bail};
use clap::Parser;

/// Convert a markdown table to CSV.
#[derive(Debug, Parser)]
pub struct ExtractCommand {
    /// Markdown file to read (stdin if not provided)
    #[arg(value_name = "FILE")]
    pub input: Option<PathBuf>,

    /// Output file path (stdout if not specified)
    #[arg(short, long, value_name = "FILE")]
    pub output: Option<PathBuf>,
}

impl ExtractCommand {
    pub async fn run(self) -> Result<()> {
        let text = match &self.input {
            Some(path) => std::fs::read_to_string(path)
                .with_context(|| format!("Failed to read {}", path.display()))?,
            None => {
                let mut text = String::new();
                std::io::stdin()
                    .read_to_string(&mut text)
                    .context("Failed to read stdin")?;
                text
            }
        };

        let csv = table_to_csv(&text)?;

        match &self.output {
            Some(path) => {
                std::fs::write(path, csv.as_bytes())
                    .with_context(|| format!("Failed to write {}", path.display()))?;
                eprintln!("Wrote {}", path.display());
            }
            None => println!("{csv}"),
        }
        Ok(())
    }
}

/// Converts the table in `text`, failing when there is none.
pub fn table_to_csv(text: &str) -> Result<String> {
    if !nova_core::looks_like_table(text) {
        bail!("No table found in input");
    }
    match nova_core::extract(text) {
        Some(csv) if !csv.is_empty() => Ok(csv),
        _ => bail!("No table rows found in input"),
    }
}
