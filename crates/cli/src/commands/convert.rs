//! convert command - Rewrite a CSV object in another format
//!
//! Reads `SRC` as CSV and writes the resulting table to `DST`. The format
//! name is passed through unparsed so that unknown formats surface as the
//! connector's unsupported format error.

use clap::Args;

use bf_core::ConfigManager;

use super::CsvArgs;
use crate::exit_code::ExitCode;
use crate::output::Formatter;

/// Rewrite a CSV object in another format
#[derive(Args, Debug)]
pub struct ConvertArgs {
    /// Source object key (CSV)
    pub src: String,

    /// Destination object key
    pub dst: String,

    /// Output format: csv or parquet
    #[arg(short, long)]
    pub format: String,

    #[command(flatten)]
    pub csv: CsvArgs,
}

/// Execute the convert command
pub async fn execute(
    args: ConvertArgs,
    manager: &ConfigManager,
    formatter: &Formatter,
) -> ExitCode {
    if args.src.is_empty() || args.dst.is_empty() {
        formatter.error("Source and destination keys cannot be empty");
        return ExitCode::UsageError;
    }

    let connector = match super::connect(manager).await {
        Ok(c) => c,
        Err(e) => return super::report_error(formatter, "Failed to bind storage", &e),
    };

    let table = match connector
        .read_table(&args.src, &args.csv.read_options())
        .await
    {
        Ok(t) => t,
        Err(e) => return super::report_error(formatter, "Failed to read table", &e),
    };

    match connector.write_table(&table, &args.dst, &args.format).await {
        Ok(outcome) => super::report_outcome(formatter, &args.dst, &outcome),
        Err(e) => super::report_error(formatter, "Failed to write table", &e),
    }
}
