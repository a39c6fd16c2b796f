use serde::{Deserialize, Serialize};

/// One table as handed over by the extractor.
///
/// Cells are positional so duplicated or blank header labels survive. `None`,
/// empty and whitespace-only cells all count as "not present".
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct RawTable {
    /// Header hint from the extractor (usually the table's first line)
    pub header: Vec<String>,
    pub rows: Vec<Vec<Option<String>>>,
}

impl RawTable {
    pub fn new(header: Vec<String>, rows: Vec<Vec<Option<String>>>) -> Self {
        Self { header, rows }
    }

    /// Build a table from string literals; empty strings become absent cells.
    pub fn from_strs(header: &[&str], rows: &[&[&str]]) -> Self {
        Self {
            header: header.iter().map(|h| h.to_string()).collect(),
            rows: rows
                .iter()
                .map(|r| r.iter().map(|c| present(c).map(str::to_string)).collect())
                .collect(),
        }
    }

    pub fn iter_rows(&self) -> impl Iterator<Item = RawRow<'_>> {
        self.rows.iter().map(|cells| RawRow { cells })
    }
}

/// Borrowed view over one raw row
#[derive(Debug, Clone, Copy)]
pub struct RawRow<'a> {
    cells: &'a [Option<String>],
}

impl<'a> RawRow<'a> {
    /// Trimmed cell text, `None` when the cell is missing or blank
    pub fn get(&self, col: usize) -> Option<&'a str> {
        self.cells.get(col).and_then(|c| c.as_deref()).and_then(present)
    }

    /// Cells as header labels (blank cells become empty labels)
    pub fn labels(&self) -> Vec<String> {
        (0..self.cells.len())
            .map(|i| self.get(i).unwrap_or_default().to_string())
            .collect()
    }

    /// All cells joined with `,`, blanks kept as empty fields
    pub fn joined(&self) -> String {
        self.labels().join(",")
    }
}

fn present(s: &str) -> Option<&str> {
    let t = s.trim();
    if t.is_empty() { None } else { Some(t) }
}
