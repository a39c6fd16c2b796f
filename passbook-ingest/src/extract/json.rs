use std::fs;
use std::path::Path;

use passbook_core::ExtractionError;

use super::{TableExtractor, ensure_exists, non_empty};
use crate::types::RawTable;

/// Reads tables that were extracted earlier and saved as a JSON list of
/// `RawTable`s. The password is ignored.
#[derive(Debug, Clone, Copy, Default)]
pub struct JsonTablesExtractor;

impl TableExtractor for JsonTablesExtractor {
    fn extract_tables(
        &self,
        path: &Path,
        _password: Option<&str>,
    ) -> Result<Vec<RawTable>, ExtractionError> {
        ensure_exists(path)?;
        let text = fs::read_to_string(path)?;
        let tables: Vec<RawTable> = serde_json::from_str(&text)?;
        tracing::debug!(path = %path.display(), tables = tables.len(), "loaded tables from json");
        non_empty(path, tables)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    #[test]
    fn test_reads_tables() {
        let mut file = tempfile::Builder::new().suffix(".json").tempfile().unwrap();
        write!(
            file,
            r#"[{{"header": ["Date", "Balance"], "rows": [["Jan 05 x", "10"], [null, "11"]]}}]"#
        )
        .unwrap();

        let tables = JsonTablesExtractor.extract_tables(file.path(), None).unwrap();
        assert_eq!(tables.len(), 1);
        assert_eq!(tables[0].header, vec!["Date".to_string(), "Balance".to_string()]);
        assert_eq!(tables[0].rows[1][0], None);
    }

    #[test]
    fn test_empty_list_is_no_tables() {
        let mut file = tempfile::Builder::new().suffix(".json").tempfile().unwrap();
        write!(file, "[]").unwrap();
        let err = JsonTablesExtractor.extract_tables(file.path(), None).unwrap_err();
        assert!(matches!(err, ExtractionError::NoTables(_)));
    }

    #[test]
    fn test_malformed_json() {
        let mut file = tempfile::Builder::new().suffix(".json").tempfile().unwrap();
        write!(file, "{{not json").unwrap();
        let err = JsonTablesExtractor.extract_tables(file.path(), None).unwrap_err();
        assert!(matches!(err, ExtractionError::Json(_)));
    }
}
