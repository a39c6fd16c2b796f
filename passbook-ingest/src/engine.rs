//! One document run: tables in, ordered transaction records out.
//!
//! A `Reconstructor` owns the date cursor and the in-flight record for a
//! single document. Both carry over from one table to the next, since a
//! transaction can straddle a page break. Build a new one per document.

use std::path::Path;

use passbook_core::{
    ConfigError, DateCursor, DateStep, DescriptionCleaner, EngineConfig, ParseWarning,
    ReconstructError, Role, RowRef, RuleTable, TransactionRecord, clean_amount,
    without_date_fragment,
};
use regex::Regex;
use rust_decimal::Decimal;
use tracing::{debug, info, warn};

use crate::assembler::Assembler;
use crate::classifier::{NoiseReason, RowKind, classify, is_boilerplate_row};
use crate::columns::{RowView, locate_header};
use crate::disambiguate::{RowAmounts, resolve_row};
use crate::extract::TableExtractor;
use crate::types::RawTable;

/// Counters and warnings collected over one document
#[derive(Debug, Clone, Default, PartialEq)]
pub struct RunReport {
    pub tables_seen: usize,
    pub tables_skipped: usize,
    pub rows_seen: usize,
    pub noise_rows: usize,
    pub continuation_rows: usize,
    pub records_pruned: usize,
    pub warnings: Vec<ParseWarning>,
}

/// Reconstructed statement: records sorted by value date, plus the report
#[derive(Debug, Clone, PartialEq)]
pub struct Statement {
    pub transactions: Vec<TransactionRecord>,
    pub report: RunReport,
}

pub struct Reconstructor {
    rules: RuleTable,
    header_re: Regex,
    cleaner: DescriptionCleaner,
    cursor: DateCursor,
    assembler: Assembler,
    report: RunReport,
}

impl Reconstructor {
    pub fn new(config: &EngineConfig) -> Result<Self, ConfigError> {
        config.validate()?;
        Ok(Self {
            header_re: config.rules.header_regex()?,
            cleaner: DescriptionCleaner::new(&config.rules)?,
            rules: config.rules.clone(),
            cursor: DateCursor::new(config.epoch_year),
            assembler: Assembler::new(),
            report: RunReport::default(),
        })
    }

    /// Feed the next table of the document.
    ///
    /// A table whose date/description or balance column cannot be found is
    /// skipped with a warning.
    pub fn push_table(&mut self, table: &RawTable) {
        let index = self.report.tables_seen;
        self.report.tables_seen += 1;

        let resolved = match locate_header(table, &self.rules, &self.header_re) {
            Ok(resolved) => resolved,
            Err(missing) => {
                self.report.tables_skipped += 1;
                self.warn(ParseWarning::TableSkipped {
                    table: index,
                    missing,
                });
                return;
            }
        };
        debug!(
            table = index,
            header_row = ?resolved.header_row,
            rows = table.rows.len(),
            "columns resolved"
        );

        for (row, raw) in table.iter_rows().enumerate().skip(resolved.data_start) {
            let view = resolved.columns.view(&raw);
            self.push_row(RowRef { table: index, row }, &view);
        }
    }

    fn push_row(&mut self, at: RowRef, view: &RowView<'_>) {
        self.report.rows_seen += 1;

        // banner rows never reach the cursor
        if is_boilerplate_row(view, &self.rules) {
            debug!(%at, "boilerplate row dropped");
            self.report.noise_rows += 1;
            return;
        }

        let step = view
            .description
            .map(|d| self.cursor.step(d))
            .unwrap_or(DateStep::Absent);
        if let DateStep::Unresolvable { fragment } = &step {
            self.warn(ParseWarning::UnresolvedDate {
                at,
                fragment: fragment.clone(),
            });
        }
        let date = step.date();

        match classify(view, date, self.assembler.has_open(), &self.rules) {
            RowKind::NewTransaction => {
                let Some(date) = date else {
                    return;
                };
                let amounts = self.amounts(at, view, None);
                debug!(%at, %date, "new transaction");
                self.assembler.start(date, view.description, amounts);
            }
            RowKind::Continuation => {
                let open_balance = self.assembler.open_balance();
                let amounts = self.amounts(at, view, open_balance);
                self.assembler.continue_with(view, amounts);
                self.report.continuation_rows += 1;
            }
            RowKind::Noise(reason) => {
                self.report.noise_rows += 1;
                let has_content = view.description.is_some() || view.has_amount_cell();
                if reason == NoiseReason::NoOpenRecord && has_content {
                    self.warn(ParseWarning::UnclassifiedRow { at });
                }
            }
        }
    }

    fn amounts(&mut self, at: RowRef, view: &RowView<'_>, fallback: Option<Decimal>) -> RowAmounts {
        for role in [Role::Deposit, Role::Withdrawal, Role::Balance] {
            if let Some(raw) = view.cell(role) {
                if clean_amount(raw).is_none() {
                    self.warn(ParseWarning::AmbiguousAmount {
                        at,
                        role,
                        raw: raw.to_string(),
                    });
                }
            }
        }

        let text = view.description.map(without_date_fragment).unwrap_or_default();
        resolve_row(view, &text, fallback, &self.rules)
    }

    fn warn(&mut self, warning: ParseWarning) {
        warn!("{warning}");
        self.report.warnings.push(warning);
    }

    /// Close the in-flight record and return the finished statement.
    pub fn finish(mut self) -> Result<Statement, ReconstructError> {
        let assembled = self.assembler.finish(&self.cleaner);

        for value_date in assembled.pruned {
            self.report.records_pruned += 1;
            let warning = ParseWarning::EmptyRecord { value_date };
            warn!("{warning}");
            self.report.warnings.push(warning);
        }

        if assembled.records.is_empty() {
            return Err(ReconstructError::NoTransactions {
                tables: self.report.tables_seen,
            });
        }

        info!(
            transactions = assembled.records.len(),
            tables = self.report.tables_seen,
            skipped = self.report.tables_skipped,
            warnings = self.report.warnings.len(),
            "statement reconstructed"
        );
        Ok(Statement {
            transactions: assembled.records,
            report: self.report,
        })
    }
}

/// Reconstruct a statement from already extracted tables.
pub fn reconstruct(tables: &[RawTable], config: &EngineConfig) -> Result<Statement, ReconstructError> {
    let mut engine = Reconstructor::new(config)?;
    for table in tables {
        engine.push_table(table);
    }
    engine.finish()
}

/// Extract and reconstruct one document.
pub fn process_document(
    extractor: &dyn TableExtractor,
    path: &Path,
    password: Option<&str>,
    config: &EngineConfig,
) -> Result<Statement, ReconstructError> {
    let tables = extractor.extract_tables(path, password)?;
    info!(path = %path.display(), tables = tables.len(), "tables extracted");
    reconstruct(&tables, config)
}
