use std::path::PathBuf;
use std::str::FromStr;

use chrono::NaiveDate;
use passbook_core::{EngineConfig, ParseWarning, ReconstructError, Role};
use passbook_ingest::{
    JsonTablesExtractor, RawTable, TableExtractor, extractor_for, process_document, reconstruct,
    write_csv,
};
use rust_decimal::Decimal;

fn fixture_path() -> PathBuf {
    PathBuf::from(env!("CARGO_MANIFEST_DIR"))
        .join("tests")
        .join("fixtures")
        .join("statement_tables.json")
}

fn dec(s: &str) -> Decimal {
    Decimal::from_str(s).unwrap()
}

fn ymd(y: i32, m: u32, d: u32) -> NaiveDate {
    NaiveDate::from_ymd_opt(y, m, d).unwrap()
}

#[test]
fn test_merges_continuation_row() {
    let table = RawTable::from_strs(
        &["Date   Value Description", "Withdrawal", "Balance"],
        &[
            &["Jan 05 UPI/merchant/ref123", "1500", "8500"],
            &["continuation text", "", "8500"],
        ],
    );

    let statement = reconstruct(&[table], &EngineConfig::default()).unwrap();
    assert_eq!(statement.transactions.len(), 1);

    let record = &statement.transactions[0];
    assert_eq!(record.iso_date(), "2024-01-05");
    assert_eq!(
        record.description.as_deref(),
        Some("Jan 05 UPI (merchant) - ref123 continuation text")
    );
    assert_eq!(record.withdrawal, Some(dec("1500")));
    assert_eq!(record.deposit, None);
    assert_eq!(record.balance, Some(dec("8500")));

    assert_eq!(statement.report.continuation_rows, 1);
    assert!(statement.report.warnings.is_empty());
}

#[test]
fn test_boilerplate_row_never_joins_or_starts() {
    let table = RawTable::from_strs(
        &["Date", "Withdrawal", "Balance"],
        &[
            &["Jan 05 UPI/merchant/ref123", "1500", "8500"],
            &["Jan 06 IFSC Code: HDFC0000123", "", "8500"],
            &["Jan 07 PURCHASE store", "100", "8400"],
        ],
    );

    let statement = reconstruct(&[table], &EngineConfig::default()).unwrap();
    let descriptions: Vec<&str> = statement
        .transactions
        .iter()
        .filter_map(|r| r.description.as_deref())
        .collect();
    assert_eq!(descriptions, vec!["Jan 05 UPI (merchant) - ref123", "Jan 07 PURCHASE store"]);
    assert!(descriptions.iter().all(|d| !d.contains("IFSC")));
    assert_eq!(statement.report.noise_rows, 1);
}

#[test]
fn test_year_rolls_over_across_tables() {
    let header = ["Date", "Deposit", "Balance"];
    let december = RawTable::from_strs(&header, &[&["Dec 30 interest", "12", "112"]]);
    let january = RawTable::from_strs(
        &header,
        &[&["Jan 02 REFUND shop", "40", "152"], &["Jan 02 CHEQUE 4411", "8", "160"]],
    );

    let statement = reconstruct(&[december, january], &EngineConfig::default()).unwrap();
    let dates: Vec<NaiveDate> = statement.transactions.iter().map(|r| r.value_date).collect();
    assert_eq!(dates, vec![ymd(2024, 12, 30), ymd(2025, 1, 2), ymd(2025, 1, 2)]);
}

#[test]
fn test_epoch_year_is_configurable() {
    let table = RawTable::from_strs(&["Date", "Balance"], &[&["Mar 14 opening", "1"]]);
    let config = EngineConfig::default().with_epoch_year(2019);
    let statement = reconstruct(&[table], &config).unwrap();
    assert_eq!(statement.transactions[0].value_date, ymd(2019, 3, 14));
}

#[test]
fn test_out_of_order_pages_sorted_stably() {
    let header = ["Date", "Withdrawal", "Balance"];
    // page two was extracted first; no rollover between its rows and page one
    let tables = [
        RawTable::from_strs(&header, &[&["Mar 10 late", "5", "90"]]),
        RawTable::from_strs(&header, &[&["Mar 10 first", "1", "99"], &["Mar 10 second", "4", "95"]]),
    ];

    let statement = reconstruct(&tables, &EngineConfig::default()).unwrap();
    let order: Vec<&str> = statement
        .transactions
        .iter()
        .filter_map(|r| r.description.as_deref())
        .collect();
    assert_eq!(order, vec!["Mar 10 late", "Mar 10 first", "Mar 10 second"]);
}

#[test]
fn test_transaction_spans_page_break() {
    let header = ["Date", "Withdrawal", "Balance"];
    let tables = [
        RawTable::from_strs(&header, &[&["Apr 01 NEFT/acme/778", "250", "750"]]),
        RawTable::from_strs(&header, &[&["invoice 42", "", ""]]),
    ];

    let statement = reconstruct(&tables, &EngineConfig::default()).unwrap();
    assert_eq!(statement.transactions.len(), 1);
    assert_eq!(
        statement.transactions[0].description.as_deref(),
        Some("Apr 01 NEFT (acme) - 778 invoice 42")
    );
}

#[test]
fn test_withdrawal_duplicating_balance_is_dropped() {
    let table = RawTable::from_strs(
        &["Date", "Withdrawal", "Balance"],
        &[&["May 02 ATM/WDL/CITY", "5,000.00", "5,000.00"]],
    );
    let statement = reconstruct(&[table], &EngineConfig::default()).unwrap();
    let record = &statement.transactions[0];
    assert_eq!(record.withdrawal, None);
    assert_eq!(record.balance, Some(dec("5000.00")));
}

#[test]
fn test_balance_repeated_in_text_is_not_a_withdrawal() {
    let table = RawTable::from_strs(
        &["Date", "Withdrawal", "Balance"],
        &[&["Jan 05 UPI transfer 8,500.00", "", "8,500.00"]],
    );
    let statement = reconstruct(&[table], &EngineConfig::default()).unwrap();
    let record = &statement.transactions[0];
    assert_eq!(record.withdrawal, None);
    assert_eq!(record.deposit, None);
    assert_eq!(record.balance, Some(dec("8500.00")));
}

#[test]
fn test_deposit_scraped_from_text() {
    let table = RawTable::from_strs(
        &["Date", "Balance"],
        &[&["Jun 01 SALARY ACME 2,00,000.00", "2,10,000.00"]],
    );
    let statement = reconstruct(&[table], &EngineConfig::default()).unwrap();
    let record = &statement.transactions[0];
    assert_eq!(record.deposit, Some(dec("200000.00")));
    assert_eq!(record.withdrawal, None);
    assert_eq!(record.balance, Some(dec("210000.00")));
}

#[test]
fn test_non_transactional_tables() {
    let summary = RawTable::from_strs(&["Summary", "Total"], &[&["Opening", "10"]]);
    let err = reconstruct(&[summary.clone(), summary], &EngineConfig::default()).unwrap_err();
    assert!(matches!(err, ReconstructError::NoTransactions { tables: 2 }));
}

#[test]
fn test_skipped_table_is_reported() {
    let summary = RawTable::from_strs(&["Narration", "Withdrawal"], &[&["x", "1"]]);
    let ledger = RawTable::from_strs(&["Date", "Balance"], &[&["Jul 04 opening", "10"]]);
    let statement = reconstruct(&[summary, ledger], &EngineConfig::default()).unwrap();
    assert_eq!(statement.report.tables_seen, 2);
    assert_eq!(statement.report.tables_skipped, 1);
    assert_eq!(
        statement.report.warnings,
        vec![ParseWarning::TableSkipped {
            table: 0,
            missing: vec![Role::DateDesc, Role::Balance],
        }]
    );
}

#[test]
fn test_fixture_document() {
    let path = fixture_path();
    let extractor = extractor_for(&path, &EngineConfig::default().extractor);
    let statement = process_document(extractor.as_ref(), &path, None, &EngineConfig::default()).unwrap();

    let summary: Vec<(String, Option<&str>, Option<Decimal>, Option<Decimal>)> = statement
        .transactions
        .iter()
        .map(|r| (r.iso_date(), r.description.as_deref(), r.deposit, r.withdrawal))
        .collect();
    assert_eq!(
        summary,
        vec![
            ("2024-12-28".to_string(), Some("Dec 28 Opening balance"), None, None),
            ("2024-12-30".to_string(), Some("Dec 30 UPI (grocer) - 998877"), None, Some(dec("1250.50"))),
            (
                "2025-01-02".to_string(),
                Some("Jan 02 NEFT CREDIT ACME PAYROLL salary for december"),
                Some(dec("45000.00")),
                None,
            ),
            ("2025-01-03".to_string(), Some("Jan 03 ATM (WDL) - MUMBAI"), None, None),
            ("2025-01-03".to_string(), Some("Jan 03 PAYTM (recharge) - ref42"), None, Some(dec("299.00"))),
        ]
    );

    let report = &statement.report;
    assert_eq!(report.tables_seen, 2);
    assert_eq!(report.tables_skipped, 0);
    assert_eq!(report.rows_seen, 7);
    assert_eq!(report.noise_rows, 1);
    assert_eq!(report.continuation_rows, 1);
    assert!(report.warnings.is_empty());

    let mut csv = Vec::new();
    write_csv(&mut csv, &statement.transactions).unwrap();
    let csv = String::from_utf8(csv).unwrap();
    assert_eq!(csv.lines().count(), 6);
    assert!(csv.contains("2024-12-30,Dec 30 UPI (grocer) - 998877,,1250.50,8749.50"));
}

#[test]
fn test_json_extractor_on_temp_file() {
    let table = RawTable::from_strs(&["Date", "Balance"], &[&["Aug 09 opening", "10"]]);
    let file = tempfile::Builder::new().suffix(".json").tempfile().unwrap();
    std::fs::write(file.path(), serde_json::to_string(&vec![table.clone()]).unwrap()).unwrap();

    let tables = JsonTablesExtractor.extract_tables(file.path(), Some("ignored")).unwrap();
    assert_eq!(tables, vec![table]);
}
