//! CSV export of reconstructed records.

use std::io;
use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use chrono::NaiveDateTime;
use passbook_core::TransactionRecord;
use rust_decimal::Decimal;

pub const CSV_HEADER: [&str; 5] = ["ValueDate", "Description", "Deposit", "Withdrawal", "Balance"];

fn amount(value: Option<Decimal>) -> String {
    value.map(|d| d.to_string()).unwrap_or_default()
}

/// Write records as CSV; absent fields become empty cells.
pub fn write_csv<W: io::Write>(writer: W, records: &[TransactionRecord]) -> csv::Result<()> {
    let mut wtr = csv::Writer::from_writer(writer);
    wtr.write_record(CSV_HEADER)?;
    for r in records {
        wtr.write_record([
            r.iso_date(),
            r.description.clone().unwrap_or_default(),
            amount(r.deposit),
            amount(r.withdrawal),
            amount(r.balance),
        ])?;
    }
    wtr.flush()?;
    Ok(())
}

pub fn write_csv_file(path: &Path, records: &[TransactionRecord]) -> Result<()> {
    let file = std::fs::File::create(path)
        .with_context(|| format!("creating {}", path.display()))?;
    write_csv(file, records).with_context(|| format!("writing {}", path.display()))?;
    Ok(())
}

/// `<dir>/<stem>_processed_<YYYYMMDD_HHMMSS>.csv`, next to the input
pub fn default_output_path(input: &Path, now: NaiveDateTime) -> PathBuf {
    let stem = input
        .file_stem()
        .map(|s| s.to_string_lossy().into_owned())
        .unwrap_or_else(|| "statement".to_string());
    let name = format!("{stem}_processed_{}.csv", now.format("%Y%m%d_%H%M%S"));
    match input.parent() {
        Some(dir) => dir.join(name),
        None => PathBuf::from(name),
    }
}
