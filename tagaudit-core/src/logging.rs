//! Structured logging using **tracing**.
//!
//! stdout carries only the audit report: the "found in N cpp files" lines,
//! the header and the table lines of unused identifiers. Everything else
//! goes to stderr as one JSON object per line. That covers search failures
//! counted as zero, table lookups that failed and fatal setup errors. Piping
//! stdout into a file or `diff` therefore never picks up log noise.
//!
//! Events carry the `identifier`, `backend` and `tool` fields where they
//! apply, so `jq 'select(.fields.identifier == "ZDCEcalRawHits")'` isolates
//! one tag.

use tracing::{error, info};

/// Installs the stderr JSON subscriber for the `tagaudit` binary.
///
/// Call *once*, before the first search runs. Without `RUST_LOG` only
/// errors are logged. `RUST_LOG=tagaudit_core=warn` shows the searches
/// that were absorbed as zero, and `debug` adds per-identifier counts and
/// the builtin backend's cache activity.
pub fn init_structured_logging() {
    tracing_subscriber::fmt()
        .json()
        // stderr may be a terminal while stdout is piped; keep it plain JSON.
        .with_ansi(false)
        .with_level(true)
        .with_target(true)
        .with_current_span(true)
        .with_env_filter(tracing_subscriber::EnvFilter::from_default_env())
        .with_writer(std::io::stderr)
        .init();
}

/// Logs a CLI milestone, such as which config file was loaded.
pub fn log_info(message: &str) {
    info!(detail = %message);
}

/// Logs a fatal CLI error before the process exits with status 2.
pub fn log_error(message: &str) {
    error!(detail = %message);
}
