//! bf - tables in S3-compatible object storage
//!
//! Lists, reads and writes CSV and Parquet tables in a configured bucket.

use clap::Parser;

mod commands;
mod exit_code;
mod logging;
mod output;

use commands::Cli;

#[tokio::main]
async fn main() {
    let cli = Cli::parse();

    // A broken config file is reported by the command itself, not here
    let configured = commands::config_manager(cli.config.clone())
        .and_then(|manager| manager.load())
        .map(|config| config.logging.filter)
        .ok();
    logging::init(&logging::filter_directive(
        cli.debug,
        std::env::var("RUST_LOG").ok(),
        configured.as_deref(),
    ));

    let exit_code = commands::execute(cli).await;

    std::process::exit(exit_code.as_i32());
}
