//! passbook-ingest: turns extracted statement tables into transaction records.
//!
//! Pipeline per document: column resolution, date sequencing and row
//! classification, assembly, amount disambiguation, normalization, then a
//! stable sort by value date.

pub mod assembler;
pub mod classifier;
pub mod columns;
pub mod disambiguate;
pub mod engine;
pub mod export;
pub mod extract;
pub mod types;

pub use columns::{ColumnMap, ResolvedTable, RowView, locate_header, map_columns, resolve_columns};
pub use engine::{Reconstructor, RunReport, Statement, process_document, reconstruct};
pub use export::{default_output_path, write_csv, write_csv_file};
pub use extract::{JsonTablesExtractor, TableExtractor, TabulaExtractor, extractor_for};
pub use types::{RawRow, RawTable};
