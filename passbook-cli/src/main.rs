use anyhow::{Context, Result, bail};
use clap::Parser;
use passbook_core::{MAX_EPOCH_YEAR, MIN_EPOCH_YEAR, TransactionRecord};
use passbook_ingest::{default_output_path, extractor_for, process_document, write_csv_file};
use rust_decimal::Decimal;
use std::path::PathBuf;
use std::process::ExitCode;
use tracing_subscriber::EnvFilter;

mod config;
mod state;

const PREVIEW_ROWS: usize = 10;

#[derive(Parser, Debug)]
#[command(
    name = "passbook",
    version,
    about = "Rebuild bank statement transactions from PDF tables"
)]
struct Cli {
    /// Statement PDF, or tables saved as .json
    #[arg(required_unless_present = "init_config")]
    input: Option<PathBuf>,

    /// PDF password (pass "" for unencrypted files)
    #[arg(required_unless_present = "init_config")]
    password: Option<String>,

    /// Year of the first transaction (statements print "Mon DD" only)
    #[arg(long, value_parser = clap::value_parser!(i32).range(MIN_EPOCH_YEAR as i64..=MAX_EPOCH_YEAR as i64))]
    year: Option<i32>,

    /// Where to write the CSV (default: next to the input, timestamped)
    #[arg(short, long)]
    output: Option<PathBuf>,

    /// Write the default config to ~/.passbook/config.toml and exit
    #[arg(long)]
    init_config: bool,
}

fn main() -> ExitCode {
    let cli = match Cli::try_parse() {
        Ok(cli) => cli,
        Err(e) => {
            let _ = e.print();
            return ExitCode::from(parse_failure_code(&e));
        }
    };

    init_tracing();

    match run(cli) {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            eprintln!("Error: {e:#}");
            ExitCode::FAILURE
        }
    }
}

/// Usage errors exit 1; `--help` and `--version` also arrive as clap errors
/// and exit 0.
fn parse_failure_code(err: &clap::Error) -> u8 {
    if err.use_stderr() { 1 } else { 0 }
}

fn init_tracing() {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn"));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .with_target(false)
        .init();
}

fn run(cli: Cli) -> Result<()> {
    if cli.init_config {
        return config::init_config();
    }

    let Some(input) = cli.input else {
        bail!("missing input file");
    };
    if !input.is_file() {
        bail!("input file not found: {}", input.display());
    }

    let mut cfg = config::load_config()?;
    if let Some(year) = cli.year {
        cfg = cfg.with_epoch_year(year);
    }
    tracing::debug!(epoch_year = cfg.epoch_year, extractor = ?cfg.extractor.command, "config loaded");

    let password = cli.password.as_deref().filter(|p| !p.is_empty());
    let extractor = extractor_for(&input, &cfg.extractor);
    let statement = process_document(extractor.as_ref(), &input, password, &cfg)
        .with_context(|| format!("processing {}", input.display()))?;

    let output = cli
        .output
        .unwrap_or_else(|| default_output_path(&input, chrono::Local::now().naive_local()));
    write_csv_file(&output, &statement.transactions)?;

    println!("Processed data saved to: {}", output.display());
    println!();
    print_preview(&statement.transactions);
    println!();
    println!("Total transactions: {}", statement.transactions.len());

    let report = &statement.report;
    if !report.warnings.is_empty() || report.tables_skipped > 0 {
        println!(
            "Skipped tables: {} | noise rows: {} | warnings: {}",
            report.tables_skipped,
            report.noise_rows,
            report.warnings.len()
        );
    }
    Ok(())
}

fn fmt_amount(value: Option<Decimal>) -> String {
    value.map(|d| d.to_string()).unwrap_or_default()
}

fn print_preview(records: &[TransactionRecord]) {
    println!(
        "{:<10}  {:<48}  {:>12}  {:>12}  {:>12}",
        "ValueDate", "Description", "Deposit", "Withdrawal", "Balance"
    );
    for r in records.iter().take(PREVIEW_ROWS) {
        let desc = r.description.as_deref().unwrap_or("");
        let desc: String = if desc.chars().count() > 48 {
            desc.chars().take(45).chain("...".chars()).collect()
        } else {
            desc.to_string()
        };
        println!(
            "{:<10}  {:<48}  {:>12}  {:>12}  {:>12}",
            r.iso_date(),
            desc,
            fmt_amount(r.deposit),
            fmt_amount(r.withdrawal),
            fmt_amount(r.balance)
        );
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::error::ErrorKind;

    #[test]
    fn test_parse_positional_args() {
        let cli = Cli::try_parse_from(["passbook", "stmt.pdf", "secret", "--year", "2023"]).unwrap();
        assert_eq!(cli.input, Some(PathBuf::from("stmt.pdf")));
        assert_eq!(cli.password.as_deref(), Some("secret"));
        assert_eq!(cli.year, Some(2023));
        assert!(!cli.init_config);
    }

    #[test]
    fn test_password_required() {
        let err = Cli::try_parse_from(["passbook", "stmt.pdf"]).unwrap_err();
        assert_eq!(err.kind(), ErrorKind::MissingRequiredArgument);
        assert!(err.use_stderr());
    }

    #[test]
    fn test_extra_positional_rejected() {
        let err = Cli::try_parse_from(["passbook", "stmt.pdf", "secret", "extra"]).unwrap_err();
        assert_eq!(err.kind(), ErrorKind::UnknownArgument);
        assert_eq!(parse_failure_code(&err), 1);
    }

    #[test]
    fn test_help_exits_zero() {
        let err = Cli::try_parse_from(["passbook", "--help"]).unwrap_err();
        assert_eq!(err.kind(), ErrorKind::DisplayHelp);
        assert_eq!(parse_failure_code(&err), 0);
    }

    #[test]
    fn test_year_out_of_range() {
        let err = Cli::try_parse_from(["passbook", "stmt.pdf", "", "--year", "2147483647"]).unwrap_err();
        assert_eq!(err.kind(), ErrorKind::ValueValidation);
        assert_eq!(parse_failure_code(&err), 1);
    }

    #[test]
    fn test_init_config_alone() {
        let cli = Cli::try_parse_from(["passbook", "--init-config"]).unwrap();
        assert!(cli.init_config);
        assert!(cli.input.is_none());
    }

    #[test]
    fn test_missing_input_file() {
        let cli = Cli::try_parse_from(["passbook", "/nonexistent/passbook/stmt.pdf", ""]).unwrap();
        let err = run(cli).unwrap_err();
        assert!(err.to_string().starts_with("input file not found"));
    }
}
