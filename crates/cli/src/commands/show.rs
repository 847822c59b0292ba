//! show command - Display an object as a table
//!
//! Reads a CSV (or, with `--parquet`, a Parquet) object into a table and
//! prints it as a grid or as JSON.

use clap::Args;

use bf_core::ConfigManager;

use super::CsvArgs;
use crate::exit_code::ExitCode;
use crate::output::{Formatter, TableView};

/// Display an object as a table
#[derive(Args, Debug)]
pub struct ShowArgs {
    /// Object key
    pub key: String,

    /// Read the object as Parquet instead of CSV
    #[arg(long)]
    pub parquet: bool,

    /// Maximum number of rows to display
    #[arg(short = 'n', long)]
    pub limit: Option<usize>,

    #[command(flatten)]
    pub csv: CsvArgs,
}

/// Execute the show command
pub async fn execute(args: ShowArgs, manager: &ConfigManager, formatter: &Formatter) -> ExitCode {
    if args.key.is_empty() {
        formatter.error("Object key cannot be empty");
        return ExitCode::UsageError;
    }

    let connector = match super::connect(manager).await {
        Ok(c) => c,
        Err(e) => return super::report_error(formatter, "Failed to bind storage", &e),
    };

    let result = if args.parquet {
        connector.read_parquet(&args.key).await
    } else {
        connector
            .read_table(&args.key, &args.csv.read_options())
            .await
    };
    let table = match result {
        Ok(t) => t,
        Err(e) => return super::report_error(formatter, "Failed to read table", &e),
    };

    match TableView::new(&table, args.limit) {
        Ok(view) => {
            formatter.table(&view);
            ExitCode::Success
        }
        Err(e) => {
            formatter.error(&format!("Failed to format table: {e}"));
            ExitCode::GeneralError
        }
    }
}
