//! CLI command definitions and execution
//!
//! This module contains all CLI commands and their implementations.
//! Storage commands load the configuration, bind a connector to the
//! configured bucket and run exactly one connector operation.

use std::path::PathBuf;

use bf_core::config::Defaults;
use bf_core::{ConfigManager, ReadOptions, WriteOutcome};
use bf_s3::S3Connector;
use clap::{Args, Parser, Subcommand};
use serde::Serialize;

use crate::exit_code::ExitCode;
use crate::output::{Formatter, OutputConfig};

mod completions;
mod config;
mod convert;
mod ls;
mod put;
mod show;

/// bf - move tables between object storage and memory
///
/// Lists, reads and writes CSV and Parquet tables in an S3-compatible bucket.
#[derive(Parser, Debug)]
#[command(name = "bf")]
#[command(author, version, about, long_about = None)]
#[command(propagate_version = true)]
pub struct Cli {
    /// Path to the configuration file
    #[arg(long, global = true, env = "BF_CONFIG")]
    pub config: Option<PathBuf>,

    /// Output format: human-readable or JSON
    #[arg(long, global = true, default_value = "false")]
    pub json: bool,

    /// Disable colored output
    #[arg(long, global = true, default_value = "false")]
    pub no_color: bool,

    /// Suppress non-error output
    #[arg(short, long, global = true, default_value = "false")]
    pub quiet: bool,

    /// Enable debug logging
    #[arg(long, global = true, default_value = "false")]
    pub debug: bool,

    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Manage the storage configuration
    #[command(subcommand)]
    Config(config::ConfigCommands),

    /// List object keys under a prefix
    Ls(ls::LsArgs),

    /// Read an object into a table and display it
    Show(show::ShowArgs),

    /// Read a CSV object and write it back in another format
    Convert(convert::ConvertArgs),

    /// Parse a local CSV file and write it to the bucket
    Put(put::PutArgs),

    /// Generate shell completions
    Completions(completions::CompletionsArgs),
}

/// Options for decoding delimited text
#[derive(Args, Debug, Clone)]
pub struct CsvArgs {
    /// Text encoding of the CSV data
    #[arg(long, default_value = bf_core::format::DEFAULT_ENCODING)]
    pub encoding: String,

    /// Field delimiter of the CSV data
    #[arg(long, default_value_t = bf_core::format::DEFAULT_DELIMITER)]
    pub delimiter: char,
}

impl CsvArgs {
    pub fn read_options(&self) -> ReadOptions {
        ReadOptions::new()
            .encoding(&self.encoding)
            .delimiter(self.delimiter)
    }
}

/// Execute the CLI command and return an exit code
pub async fn execute(cli: Cli) -> ExitCode {
    let config_manager = match config_manager(cli.config.clone()) {
        Ok(manager) => manager,
        Err(e) => {
            let formatter = Formatter::new(output_config(&cli, &Defaults::default()));
            return report_error(&formatter, "Failed to locate configuration", &e);
        }
    };
    tracing::debug!(path = %config_manager.config_path().display(), "Using configuration file");

    // A config file that fails to load is reported by the command that needs it
    let defaults = config_manager
        .load()
        .map(|config| config.defaults)
        .unwrap_or_default();
    let formatter = Formatter::new(output_config(&cli, &defaults));

    match cli.command {
        Commands::Config(cmd) => config::execute(cmd, &config_manager, &formatter),
        Commands::Ls(args) => ls::execute(args, &config_manager, &formatter).await,
        Commands::Show(args) => show::execute(args, &config_manager, &formatter).await,
        Commands::Convert(args) => convert::execute(args, &config_manager, &formatter).await,
        Commands::Put(args) => put::execute(args, &config_manager, &formatter).await,
        Commands::Completions(args) => completions::execute(args),
    }
}

/// Output settings from the `[defaults]` section, overridden by flags
fn output_config(cli: &Cli, defaults: &Defaults) -> OutputConfig {
    OutputConfig {
        json: cli.json || defaults.output == "json",
        no_color: cli.no_color || defaults.color == "never",
        quiet: cli.quiet,
    }
}

/// Configuration manager for an explicit path, or the default location
pub fn config_manager(path: Option<PathBuf>) -> bf_core::Result<ConfigManager> {
    match path {
        Some(path) => Ok(ConfigManager::with_path(path)),
        None => ConfigManager::new(),
    }
}

/// Bind a connector to the configured bucket
async fn connect(manager: &ConfigManager) -> bf_core::Result<S3Connector> {
    let config = manager.load()?;
    bf_s3::connect(config.storage()?).await
}

/// Print `error` with some context and map it to an exit code
fn report_error(formatter: &Formatter, context: &str, error: &bf_core::Error) -> ExitCode {
    formatter.error(&format!("{context}: {error}"));
    ExitCode::from(error)
}

#[derive(Debug, Serialize)]
struct WriteOutput<'a> {
    key: &'a str,
    #[serde(flatten)]
    outcome: &'a WriteOutcome,
    #[serde(skip_serializing_if = "Option::is_none")]
    size_human: Option<String>,
}

/// Report the outcome of a table write; a skipped write is still a success
fn report_outcome(formatter: &Formatter, key: &str, outcome: &WriteOutcome) -> ExitCode {
    let size_human = match outcome {
        WriteOutcome::Written { size_bytes, .. } => Some(humansize::format_size(
            *size_bytes as u64,
            humansize::BINARY,
        )),
        WriteOutcome::Skipped => None,
    };

    if formatter.is_json() {
        formatter.json(&WriteOutput {
            key,
            outcome,
            size_human,
        });
        return ExitCode::Success;
    }

    match outcome {
        WriteOutcome::Written { location, .. } => formatter.success(&format!(
            "Wrote {} to {location}",
            size_human.unwrap_or_default()
        )),
        WriteOutcome::Skipped => {
            formatter.warning(&format!("Table is empty, nothing written to {key}"))
        }
    }
    ExitCode::Success
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::CommandFactory;

    #[test]
    fn test_cli_is_well_formed() {
        Cli::command().debug_assert();
    }

    #[test]
    fn test_parse_global_flags() {
        let cli = Cli::try_parse_from(["bf", "--json", "--config", "/tmp/bf.toml", "ls"]).unwrap();
        assert!(cli.json);
        assert_eq!(cli.config, Some(PathBuf::from("/tmp/bf.toml")));
        assert!(matches!(cli.command, Commands::Ls(_)));
    }

    #[test]
    fn test_output_config_from_defaults() {
        let defaults = Defaults {
            output: "json".to_string(),
            color: "never".to_string(),
        };
        let cli = Cli::try_parse_from(["bf", "ls"]).unwrap();
        let output = output_config(&cli, &defaults);
        assert!(output.json);
        assert!(output.no_color);

        let output = output_config(&cli, &Defaults::default());
        assert!(!output.json);
        assert!(!output.no_color);
    }

    #[test]
    fn test_output_flags_override_defaults() {
        let defaults = Defaults::default();
        let cli = Cli::try_parse_from(["bf", "--json", "--no-color", "-q", "ls"]).unwrap();
        let output = output_config(&cli, &defaults);
        assert!(output.json);
        assert!(output.no_color);
        assert!(output.quiet);
    }

    #[test]
    fn test_defaults_applied_from_config_file() {
        let temp_dir = tempfile::TempDir::new().unwrap();
        let path = temp_dir.path().join("config.toml");
        std::fs::write(
            &path,
            "schema_version = 1\n\n[defaults]\noutput = \"json\"\ncolor = \"auto\"\n",
        )
        .unwrap();

        let defaults = config_manager(Some(path)).unwrap().load().unwrap().defaults;
        let cli = Cli::try_parse_from(["bf", "ls"]).unwrap();
        let output = output_config(&cli, &defaults);
        assert!(output.json);
        assert!(!output.no_color);
    }

    #[test]
    fn test_csv_args_defaults() {
        let cli = Cli::try_parse_from(["bf", "show", "raw/a.csv"]).unwrap();
        let Commands::Show(args) = cli.command else {
            panic!("expected show");
        };
        let options = args.csv.read_options();
        assert_eq!(options, ReadOptions::default());
    }

    #[test]
    fn test_csv_args_custom() {
        let cli = Cli::try_parse_from([
            "bf",
            "convert",
            "raw/a.csv",
            "out/a.parquet",
            "--format",
            "parquet",
            "--encoding",
            "latin1",
            "--delimiter",
            ";",
        ])
        .unwrap();
        let Commands::Convert(args) = cli.command else {
            panic!("expected convert");
        };
        assert_eq!(args.format, "parquet");
        assert_eq!(args.csv.read_options().delimiter, ';');
        assert_eq!(args.csv.read_options().encoding, "latin1");
    }

    #[test]
    fn test_multi_char_delimiter_rejected() {
        let result = Cli::try_parse_from(["bf", "show", "k", "--delimiter", "::"]);
        assert!(result.is_err());
    }

    #[test]
    fn test_write_output_json_shape() {
        let outcome = WriteOutcome::Skipped;
        let output = WriteOutput {
            key: "out.csv",
            outcome: &outcome,
            size_human: None,
        };
        let json = serde_json::to_value(&output).unwrap();
        assert_eq!(json["status"], "skipped");
        assert_eq!(json["key"], "out.csv");
    }

    #[test]
    fn test_write_output_json_written() {
        let outcome = WriteOutcome::Written {
            location: bf_core::ObjectLocation::new("http://localhost:9000", "b", "out.csv"),
            size_bytes: 17,
        };
        let output = WriteOutput {
            key: "out.csv",
            outcome: &outcome,
            size_human: Some("17 B".to_string()),
        };
        let json = serde_json::to_value(&output).unwrap();
        assert_eq!(json["status"], "written");
        assert_eq!(json["size_bytes"], 17);
        assert_eq!(json["location"]["bucket"], "b");
    }
}
