use std::path::Path;
use std::process::{Command, Stdio};

use passbook_core::ExtractionError;
use serde::Deserialize;

use super::{TableExtractor, ensure_exists, non_empty};
use crate::types::RawTable;

/// Runs tabula on a PDF and reads its JSON output.
///
/// The command is configurable (`["tabula"]`, `["java", "-jar", "tabula.jar"]`,
/// ...); the extraction flags are appended to it.
#[derive(Debug, Clone)]
pub struct TabulaExtractor {
    command: Vec<String>,
}

impl TabulaExtractor {
    pub fn new(command: Vec<String>) -> Self {
        Self { command }
    }

    fn args(&self, path: &Path, password: Option<&str>) -> Vec<String> {
        let mut args: Vec<String> = self.command.iter().skip(1).cloned().collect();
        args.extend(["--pages", "all", "--guess", "--format", "JSON"].map(String::from));
        if let Some(pw) = password.filter(|p| !p.is_empty()) {
            args.push("--password".to_string());
            args.push(pw.to_string());
        }
        args.push(path.display().to_string());
        args
    }
}

impl TableExtractor for TabulaExtractor {
    fn extract_tables(
        &self,
        path: &Path,
        password: Option<&str>,
    ) -> Result<Vec<RawTable>, ExtractionError> {
        ensure_exists(path)?;
        let Some(program) = self.command.first() else {
            return Err(ExtractionError::Tool("extractor command is empty".to_string()));
        };

        tracing::debug!(program = %program, path = %path.display(), "running tabula");
        let output = Command::new(program)
            .args(self.args(path, password))
            .stdin(Stdio::null())
            .output()
            .map_err(|e| ExtractionError::Tool(format!("could not run {program}: {e}")))?;

        if !output.status.success() {
            let stderr = String::from_utf8_lossy(&output.stderr);
            let lowered = stderr.to_lowercase();
            if lowered.contains("password") || lowered.contains("encrypt") {
                return Err(ExtractionError::BadPassword(path.to_path_buf()));
            }
            return Err(ExtractionError::Tool(format!(
                "{program} exited with {}: {}",
                output.status,
                stderr.trim()
            )));
        }

        let stdout = String::from_utf8_lossy(&output.stdout);
        non_empty(path, parse_tabula_json(&stdout)?)
    }
}

#[derive(Debug, Deserialize)]
struct TabulaTable {
    #[serde(default)]
    data: Vec<Vec<TabulaCell>>,
}

#[derive(Debug, Deserialize)]
struct TabulaCell {
    #[serde(default)]
    text: String,
}

/// Parse tabula's `--format JSON` output.
///
/// The first row of each table becomes the header hint. Tables without rows
/// are dropped.
pub fn parse_tabula_json(json: &str) -> Result<Vec<RawTable>, ExtractionError> {
    let tables: Vec<TabulaTable> = serde_json::from_str(json)?;

    Ok(tables
        .into_iter()
        .filter_map(|t| {
            let mut rows = t.data.into_iter().map(|row| {
                row.into_iter()
                    .map(|c| {
                        let text = c.text.trim();
                        (!text.is_empty()).then(|| text.to_string())
                    })
                    .collect::<Vec<Option<String>>>()
            });
            let header = rows.next()?.into_iter().map(Option::unwrap_or_default).collect();
            Some(RawTable::new(header, rows.collect()))
        })
        .collect())
}
