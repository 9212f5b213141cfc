//! Pipe Table Extraction
//!
//! Turns a markdown-style pipe table found in a reply into a quoted CSV blob,
//! without a markdown parser. The input is unvalidated model output, so the
//! extractor is lenient: rows keep whatever number of cells they have.
//!
//! ## Example
//!
//! ```text
//! | Name | Quote        |        "Name","Quote"
//! |------|--------------|   →    "Ann","He said ""hi"""
//! | Ann  | He said "hi" |
//! ```

mod extract;
mod types;

pub use extract::{extract, extract_rows, looks_like_table};
pub use types::{CSV_QUOTE, CSV_SEPARATOR, TableRow, quote_cell};
