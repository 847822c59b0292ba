//! Output formatter for human-readable and JSON output
//!
//! Ensures consistent output formatting across all commands.

use arrow::error::ArrowError;
use arrow::util::display::{ArrayFormatter, FormatOptions};
use bf_core::Table;
use comfy_table::presets::UTF8_FULL_CONDENSED;
use serde::Serialize;

use super::OutputConfig;

/// Formatter for CLI output
///
/// Handles both human-readable and JSON output formats based on configuration.
/// When JSON mode is enabled, all output is strict JSON without colors.
#[derive(Debug, Clone)]
pub struct Formatter {
    config: OutputConfig,
}

/// A table flattened to strings for display
#[derive(Debug, Serialize, PartialEq)]
pub struct TableView {
    pub columns: Vec<String>,
    pub rows: Vec<Vec<String>>,
    pub total_rows: usize,
}

impl TableView {
    /// Format up to `limit` rows of `table`
    pub fn new(table: &Table, limit: Option<usize>) -> Result<Self, ArrowError> {
        let options = FormatOptions::default();
        let formatters = table
            .batch()
            .columns()
            .iter()
            .map(|column| ArrayFormatter::try_new(column.as_ref(), &options))
            .collect::<Result<Vec<_>, _>>()?;

        let shown = limit.map_or(table.num_rows(), |l| l.min(table.num_rows()));
        let rows = (0..shown)
            .map(|row| formatters.iter().map(|f| f.value(row).to_string()).collect())
            .collect();

        Ok(Self {
            columns: table.column_names(),
            rows,
            total_rows: table.num_rows(),
        })
    }
}

impl Formatter {
    /// Create a new formatter with the given configuration
    pub fn new(config: OutputConfig) -> Self {
        Self { config }
    }

    /// Check if JSON output mode is enabled
    pub fn is_json(&self) -> bool {
        self.config.json
    }

    /// Check if quiet mode is enabled
    pub fn is_quiet(&self) -> bool {
        self.config.quiet
    }

    /// Check if colors are enabled
    pub fn colors_enabled(&self) -> bool {
        !self.config.no_color && !self.config.json
    }

    /// Output a success message
    pub fn success(&self, message: &str) {
        if self.config.quiet || self.config.json {
            return;
        }

        if self.colors_enabled() {
            println!("\x1b[32m✓\x1b[0m {message}");
        } else {
            println!("✓ {message}");
        }
    }

    /// Output an error message
    ///
    /// Errors are always printed, even in quiet mode.
    pub fn error(&self, message: &str) {
        if self.config.json {
            let error = serde_json::json!({
                "error": message
            });
            eprintln!(
                "{}",
                serde_json::to_string_pretty(&error).unwrap_or_else(|_| message.to_string())
            );
        } else if self.colors_enabled() {
            eprintln!("\x1b[31m✗\x1b[0m {message}");
        } else {
            eprintln!("✗ {message}");
        }
    }

    /// Output a warning message
    pub fn warning(&self, message: &str) {
        if self.config.quiet || self.config.json {
            return;
        }

        if self.colors_enabled() {
            eprintln!("\x1b[33m⚠\x1b[0m {message}");
        } else {
            eprintln!("⚠ {message}");
        }
    }

    /// Output JSON directly
    pub fn json<T: Serialize>(&self, value: &T) {
        match serde_json::to_string_pretty(value) {
            Ok(json) => println!("{json}"),
            Err(e) => eprintln!("Error serializing output: {e}"),
        }
    }

    /// Print a line of text (respects quiet mode)
    pub fn println(&self, message: &str) {
        if self.config.quiet {
            return;
        }
        println!("{message}");
    }

    /// Render a table view as a grid, or as JSON in JSON mode
    pub fn table(&self, view: &TableView) {
        if self.config.json {
            self.json(view);
            return;
        }
        if self.config.quiet {
            return;
        }

        println!("{}", render_grid(view));
        if view.rows.len() < view.total_rows {
            println!("({} of {} rows shown)", view.rows.len(), view.total_rows);
        }
    }
}

fn render_grid(view: &TableView) -> comfy_table::Table {
    let mut grid = comfy_table::Table::new();
    grid.load_preset(UTF8_FULL_CONDENSED)
        .set_header(view.columns.iter())
        .add_rows(view.rows.iter());
    grid
}

impl Default for Formatter {
    fn default() -> Self {
        Self::new(OutputConfig::default())
    }
}
