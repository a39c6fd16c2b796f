//! Error and warning types for statement reconstruction.
//!
//! `ExtractionError` and `ReconstructError` are fatal for one document.
//! `ParseWarning` never stops a run: the row is dropped or the field left
//! empty, and the warning is kept in the run report.

use std::fmt;
use std::path::PathBuf;

use chrono::NaiveDate;
use thiserror::Error;

use crate::record::Role;

/// Failure of the external table-extraction step
#[derive(Error, Debug)]
pub enum ExtractionError {
    #[error("input not found: {}", .0.display())]
    NotFound(PathBuf),

    #[error("could not decrypt {}: wrong or missing password", .0.display())]
    BadPassword(PathBuf),

    #[error("no extractable tables in {}", .0.display())]
    NoTables(PathBuf),

    /// The extraction tool ran but failed for another reason.
    #[error("table extraction failed: {0}")]
    Tool(String),

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("malformed table data: {0}")]
    Json(#[from] serde_json::Error),
}

/// Invalid rule table or engine configuration
#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("invalid {field} pattern: {source}")]
    InvalidPattern {
        field: &'static str,
        source: regex::Error,
    },

    #[error("rule table must list date/description and balance column names")]
    MissingColumnRules,

    #[error("epoch year {year} is outside {min}..={max}")]
    EpochYearOutOfRange { year: i32, min: i32, max: i32 },
}

/// Fatal outcome of a document run
#[derive(Error, Debug)]
pub enum ReconstructError {
    #[error(transparent)]
    Extraction(#[from] ExtractionError),

    #[error(transparent)]
    Config(#[from] ConfigError),

    #[error("no transactions reconstructed from {tables} table(s)")]
    NoTransactions { tables: usize },
}

/// Position of a raw row inside the extracted document (both zero-based)
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RowRef {
    pub table: usize,
    pub row: usize,
}

impl fmt::Display for RowRef {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "table {} row {}", self.table, self.row)
    }
}

/// Non-fatal anomaly seen while reconstructing
#[derive(Error, Debug, Clone, PartialEq)]
pub enum ParseWarning {
    #[error("table {table} skipped: no {} column", .missing.iter().map(Role::label).collect::<Vec<_>>().join("/"))]
    TableSkipped { table: usize, missing: Vec<Role> },

    #[error("{at}: row carries data but no date and no open transaction; discarded")]
    UnclassifiedRow { at: RowRef },

    #[error("{at}: date fragment {fragment:?} does not resolve to a calendar date")]
    UnresolvedDate { at: RowRef, fragment: String },

    #[error("{at}: {} cell {raw:?} could not be resolved to an amount", .role.label())]
    AmbiguousAmount { at: RowRef, role: Role, raw: String },

    #[error("transaction dated {value_date} had no content after cleaning; dropped")]
    EmptyRecord { value_date: NaiveDate },
}
