//! JSON output for a finished report.
//!
//! The plain-text report is streamed by [`crate::audit::write_report`] while
//! the searches run, since its detail dump needs the search provider.

use serde_json::json;

use crate::audit::AuditReport;

/// Renders the report as pretty JSON.
///
/// No timestamps or timings are included, so identical trees give identical
/// output.
pub fn to_json(report: &AuditReport) -> serde_json::Result<String> {
    serde_json::to_string_pretty(&json!({
        "file_type": report.file_type,
        "table": report.table.display().to_string(),
        "total": report.entries.len(),
        "entries": report.entries,
        "unused": report.unused,
    }))
}

/// Prints the report as JSON to stdout.
pub fn print_json(report: &AuditReport) {
    match to_json(report) {
        Ok(json) => println!("{}", json),
        Err(e) => {
            eprintln!("[WARN] JSON serialization failed: {}", e);
            println!("{{\"unused\": {:?}}}", report.unused);
        }
    }
}
