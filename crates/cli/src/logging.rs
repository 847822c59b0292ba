//! Tracing subscriber setup
//!
//! Logs go to stderr so that stdout stays clean for command output.

use tracing_subscriber::{EnvFilter, fmt, prelude::*};

const FALLBACK_FILTER: &str = "info";

/// Choose the filter directive.
///
/// `RUST_LOG` wins, then `--debug`, then the configured filter.
pub fn filter_directive(debug: bool, rust_log: Option<String>, configured: Option<&str>) -> String {
    if let Some(directive) = rust_log.filter(|d| !d.trim().is_empty()) {
        return directive;
    }
    if debug {
        return "debug".to_string();
    }
    configured
        .filter(|d| !d.trim().is_empty())
        .unwrap_or(FALLBACK_FILTER)
        .to_string()
}

/// Install the global subscriber
pub fn init(directive: &str) {
    let filter = EnvFilter::try_new(directive).unwrap_or_else(|_| EnvFilter::new(FALLBACK_FILTER));

    tracing_subscriber::registry()
        .with(fmt::layer().with_writer(std::io::stderr).with_target(false))
        .with(filter)
        .init();
}
