//! Pipe table detection and CSV conversion.

use super::types::TableRow;

/// Cheap gate deciding whether to offer a table export at all.
///
/// True as soon as the text contains a `|`. False positives are fine; a reply
/// holding a real table must never be rejected here.
pub fn looks_like_table(text: &str) -> bool {
    text.contains('|')
}

/// Parses the pipe table rows of `text`.
///
/// Lines whose trimmed form starts with `|` are table rows. When no line
/// does, lines containing a `|` anywhere are used instead, which covers
/// tables written without outer pipes. Divider rows such as `|---|---|` are
/// dropped.
///
/// Returns `None` when no candidate line exists.
pub fn extract_rows(text: &str) -> Option<Vec<TableRow>> {
    let lines = candidate_lines(text);
    if lines.is_empty() {
        return None;
    }

    let rows = lines
        .into_iter()
        .map(strip_outer_pipes)
        .filter(|content| !is_divider(content))
        .map(TableRow::parse)
        .collect();
    Some(rows)
}

/// Converts the pipe table in `text` into CSV.
///
/// Every cell is quoted, rows are separated by `\n` and there is no trailing
/// newline. Column counts are not checked. Returns `None` when the text has
/// no table lines.
pub fn extract(text: &str) -> Option<String> {
    let rows = extract_rows(text)?;
    tracing::debug!(rows = rows.len(), "extracted table");
    Some(
        rows.iter()
            .map(TableRow::to_csv_line)
            .collect::<Vec<_>>()
            .join("\n"),
    )
}

fn candidate_lines(text: &str) -> Vec<&str> {
    let piped: Vec<&str> = text
        .lines()
        .map(str::trim)
        .filter(|line| line.starts_with('|'))
        .collect();
    if !piped.is_empty() {
        return piped;
    }

    text.lines()
        .map(str::trim)
        .filter(|line| line.contains('|'))
        .collect()
}

/// Removes one leading and one trailing `|`.
fn strip_outer_pipes(line: &str) -> &str {
    let line = line.trim();
    let line = line.strip_prefix('|').unwrap_or(line);
    line.strip_suffix('|').unwrap_or(line)
}

/// A markdown header divider: at least three `-` once whitespace and pipes
/// are removed, and nothing else.
pub(crate) fn is_divider(content: &str) -> bool {
    let mut dashes = 0;
    for ch in content.chars() {
        match ch {
            '-' => dashes += 1,
            '|' => {}
            c if c.is_whitespace() => {}
            _ => return false,
        }
    }
    dashes >= 3
}
