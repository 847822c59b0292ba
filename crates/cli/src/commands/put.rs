//! put command - Upload a local CSV file as a table
//!
//! The file is parsed locally, so a malformed file fails before anything
//! is sent to the bucket.

use std::path::{Path, PathBuf};

use clap::Args;

use bf_core::{ConfigManager, Table};

use super::CsvArgs;
use crate::exit_code::ExitCode;
use crate::output::Formatter;

/// Upload a local CSV file as a table
#[derive(Args, Debug)]
pub struct PutArgs {
    /// Local CSV file
    pub file: PathBuf,

    /// Destination object key
    pub key: String,

    /// Output format: csv or parquet
    #[arg(short, long)]
    pub format: String,

    #[command(flatten)]
    pub csv: CsvArgs,
}

/// Execute the put command
pub async fn execute(args: PutArgs, manager: &ConfigManager, formatter: &Formatter) -> ExitCode {
    if args.key.is_empty() {
        formatter.error("Object key cannot be empty");
        return ExitCode::UsageError;
    }

    let table = match load_local(&args.file, &args.csv) {
        Ok(t) => t,
        Err(e) => {
            return super::report_error(
                formatter,
                &format!("Failed to load {}", args.file.display()),
                &e,
            );
        }
    };

    let connector = match super::connect(manager).await {
        Ok(c) => c,
        Err(e) => return super::report_error(formatter, "Failed to bind storage", &e),
    };

    match connector.write_table(&table, &args.key, &args.format).await {
        Ok(outcome) => super::report_outcome(formatter, &args.key, &outcome),
        Err(e) => super::report_error(formatter, "Failed to write table", &e),
    }
}

fn load_local(path: &Path, csv: &CsvArgs) -> bf_core::Result<Table> {
    let data = std::fs::read(path)?;
    bf_core::format::decode_csv(&data, &csv.read_options())
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;
    use tempfile::NamedTempFile;

    fn csv_args(delimiter: char) -> CsvArgs {
        CsvArgs {
            encoding: "utf-8".to_string(),
            delimiter,
        }
    }

    #[test]
    fn test_load_local_csv() {
        let mut file = NamedTempFile::new().unwrap();
        file.write_all(b"isin;price\nDE0001;10.5\nDE0002;11.25\n")
            .unwrap();

        let table = load_local(file.path(), &csv_args(';')).unwrap();
        assert_eq!(table.num_rows(), 2);
        assert_eq!(table.column_names(), vec!["isin", "price"]);
    }

    #[test]
    fn test_load_local_missing_file() {
        let err = load_local(Path::new("/nonexistent/bf/input.csv"), &csv_args(',')).unwrap_err();
        assert!(matches!(err, bf_core::Error::Io(_)));
    }
}
