//! Row type produced by table extraction.

/// Field separator used in the CSV output.
pub const CSV_SEPARATOR: char = ',';

/// Quote character wrapped around every CSV cell.
pub const CSV_QUOTE: char = '"';

// ============================================================
// TABLE ROW
// ============================================================

/// One row of a pipe table, as trimmed cell strings.
///
/// Rows of the same table may have different lengths; nothing pads or
/// truncates them.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct TableRow {
    pub cells: Vec<String>,
}

impl TableRow {
    pub fn new(cells: Vec<String>) -> Self {
        Self { cells }
    }

    /// Splits the inner content of a row (outer pipes already removed) on `|`
    /// and trims every cell.
    pub fn parse(content: &str) -> Self {
        Self {
            cells: content.split('|').map(|c| c.trim().to_string()).collect(),
        }
    }

    /// Number of cells in this row.
    #[inline]
    pub fn len(&self) -> usize {
        self.cells.len()
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.cells.is_empty()
    }

    /// Encodes the row as one CSV line: every cell quoted, embedded quotes
    /// doubled, cells joined by commas.
    pub fn to_csv_line(&self) -> String {
        let mut line = String::new();
        for (i, cell) in self.cells.iter().enumerate() {
            if i > 0 {
                line.push(CSV_SEPARATOR);
            }
            line.push_str(&quote_cell(cell));
        }
        line
    }
}

impl From<Vec<String>> for TableRow {
    fn from(cells: Vec<String>) -> Self {
        Self::new(cells)
    }
}

/// Wraps a cell in double quotes, doubling any quote it contains.
pub fn quote_cell(cell: &str) -> String {
    let mut quoted = String::with_capacity(cell.len() + 2);
    quoted.push(CSV_QUOTE);
    for ch in cell.chars() {
        if ch == CSV_QUOTE {
            quoted.push(CSV_QUOTE);
        }
        quoted.push(ch);
    }
    quoted.push(CSV_QUOTE);
    quoted
}
