//! ls command - List object keys
//!
//! Lists every key in the configured bucket that starts with a prefix.

use clap::Args;
use serde::Serialize;

use bf_core::ConfigManager;

use crate::exit_code::ExitCode;
use crate::output::Formatter;

/// List object keys
#[derive(Args, Debug)]
pub struct LsArgs {
    /// Key prefix; lists the whole bucket when omitted
    #[arg(default_value = "")]
    pub prefix: String,

    /// Summarize output (show totals only)
    #[arg(long)]
    pub summarize: bool,
}

/// Output structure for ls command (JSON format)
#[derive(Debug, Serialize)]
struct LsOutput<'a> {
    prefix: &'a str,
    keys: &'a [String],
    count: usize,
}

/// Execute the ls command
pub async fn execute(args: LsArgs, manager: &ConfigManager, formatter: &Formatter) -> ExitCode {
    let connector = match super::connect(manager).await {
        Ok(c) => c,
        Err(e) => return super::report_error(formatter, "Failed to bind storage", &e),
    };

    let keys = match connector.list_keys(&args.prefix).await {
        Ok(keys) => keys,
        Err(e) => return super::report_error(formatter, "Failed to list keys", &e),
    };

    if formatter.is_json() {
        formatter.json(&LsOutput {
            prefix: &args.prefix,
            keys: &keys,
            count: keys.len(),
        });
        return ExitCode::Success;
    }

    if !args.summarize {
        for key in &keys {
            formatter.println(key);
        }
    }
    if args.summarize || keys.is_empty() {
        formatter.println(&summary_line(&args.prefix, keys.len()));
    }
    ExitCode::Success
}

fn summary_line(prefix: &str, count: usize) -> String {
    let noun = if count == 1 { "key" } else { "keys" };
    if prefix.is_empty() {
        format!("Total: {count} {noun}")
    } else {
        format!("Total: {count} {noun} under '{prefix}'")
    }
}
