//! Table extraction adapters.
//!
//! The engine never reads a PDF itself; an adapter turns the input file into
//! `RawTable`s and the engine takes it from there.

mod json;
mod tabula;

use std::path::Path;

use passbook_core::{ExtractionError, ExtractorConfig};

use crate::types::RawTable;

pub use json::JsonTablesExtractor;
pub use tabula::{TabulaExtractor, parse_tabula_json};

pub trait TableExtractor {
    /// Every table of the document, in page order.
    fn extract_tables(
        &self,
        path: &Path,
        password: Option<&str>,
    ) -> Result<Vec<RawTable>, ExtractionError>;
}

/// JSON adapter for `.json` inputs, tabula for everything else
pub fn extractor_for(path: &Path, config: &ExtractorConfig) -> Box<dyn TableExtractor> {
    let is_json = path
        .extension()
        .and_then(|e| e.to_str())
        .is_some_and(|e| e.eq_ignore_ascii_case("json"));
    if is_json {
        Box::new(JsonTablesExtractor)
    } else {
        Box::new(TabulaExtractor::new(config.command.clone()))
    }
}

fn ensure_exists(path: &Path) -> Result<(), ExtractionError> {
    if path.is_file() {
        Ok(())
    } else {
        Err(ExtractionError::NotFound(path.to_path_buf()))
    }
}

fn non_empty(path: &Path, tables: Vec<RawTable>) -> Result<Vec<RawTable>, ExtractionError> {
    if tables.is_empty() {
        Err(ExtractionError::NoTables(path.to_path_buf()))
    } else {
        Ok(tables)
    }
}
