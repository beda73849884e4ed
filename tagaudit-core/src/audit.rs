//! The audit itself: count, classify and report every identifier.
//!
//! Identifiers are processed one at a time in the order given (callers pass
//! a sorted list). A failed search never stops the run: it is logged,
//! recorded on the [`TagUsage`], and counted as zero, so the printed report
//! looks exactly as if nothing matched.

use std::convert::Infallible;
use std::io::{self, Write};
use std::path::{Path, PathBuf};

use serde::Serialize;
use tracing::{debug, error, info, warn};

use crate::search::{SearchProvider, SearchRequest};

/// Suffix appended to the line of an identifier with no matches.
pub const WARNING_MARKER: &str = "<--------- WARNING";

/// Result of auditing one identifier.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct TagUsage {
    pub identifier: String,
    /// Distinct files containing the identifier as a whole word.
    pub count: usize,
    /// Set when `count == 0`.
    pub warning: bool,
    /// Why the search failed, when it did. The count is then 0.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub search_error: Option<String>,
}

/// Result of a full audit run.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct AuditReport {
    /// File type label, e.g. "cpp".
    pub file_type: String,
    /// Flags table used for the detail dump.
    pub table: PathBuf,
    /// One entry per identifier, in audit order.
    pub entries: Vec<TagUsage>,
    /// Identifiers with zero matches, in audit order.
    pub unused: Vec<String>,
}

/// Status text and warning flag for one identifier.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Classification {
    pub status: String,
    pub warning: bool,
}

/// `"found in {count} {label} files"`, warning when nothing was found.
pub fn classify(count: usize, file_type_label: &str) -> Classification {
    Classification {
        status: format!("found in {} {} files", count, file_type_label),
        warning: count == 0,
    }
}

/// The per-identifier report line.
pub fn report_line(identifier: &str, classification: &Classification) -> String {
    if classification.warning {
        format!("{} {} {}", identifier, classification.status, WARNING_MARKER)
    } else {
        format!("{} {}", identifier, classification.status)
    }
}

/// Header printed before the detail dump.
pub fn unused_header(table: &Path) -> String {
    let name = table
        .file_name()
        .map(|n| n.to_string_lossy().into_owned())
        .unwrap_or_else(|| table.display().to_string());
    format!("Potentially unused parameters in `{}`:", name)
}

/// Searches for one identifier, absorbing failure as a zero count.
pub fn audit_identifier(
    provider: &dyn SearchProvider,
    request: &SearchRequest,
    identifier: &str,
) -> TagUsage {
    let (count, search_error) = match provider.count_files(request, identifier) {
        Ok(count) => (count, None),
        Err(e) if e.is_recoverable() => {
            warn!(
                identifier = %identifier,
                backend = provider.name(),
                error = %e,
                "search failed, counting as zero"
            );
            (0, Some(e.to_string()))
        }
        Err(e) => {
            // Not a tool or file problem: the identifier itself could not
            // be searched for.
            error!(
                identifier = %identifier,
                backend = provider.name(),
                error = %e,
                "identifier cannot be searched, counting as zero"
            );
            (0, Some(e.to_string()))
        }
    };

    TagUsage {
        identifier: identifier.to_string(),
        count,
        warning: count == 0,
        search_error,
    }
}

/// Number of filtered files containing `identifier`; 0 if the search failed.
pub fn count_occurrences(
    provider: &dyn SearchProvider,
    request: &SearchRequest,
    identifier: &str,
) -> usize {
    audit_identifier(provider, request, identifier).count
}

/// Audits every identifier, calling `on_entry` as soon as each is done.
pub fn run_audit_with<F, E>(
    provider: &dyn SearchProvider,
    request: &SearchRequest,
    identifiers: &[String],
    table: &Path,
    mut on_entry: F,
) -> Result<AuditReport, E>
where
    F: FnMut(&TagUsage) -> Result<(), E>,
{
    info!(
        identifiers = identifiers.len(),
        root = %request.root.display(),
        file_type = %request.file_type.name,
        backend = provider.name(),
        "audit started"
    );

    let mut entries = Vec::with_capacity(identifiers.len());
    let mut unused = Vec::new();

    for identifier in identifiers {
        let usage = audit_identifier(provider, request, identifier);
        if usage.warning {
            unused.push(usage.identifier.clone());
        }
        on_entry(&usage)?;
        entries.push(usage);
    }

    info!(unused = unused.len(), "audit finished");

    Ok(AuditReport {
        file_type: request.file_type.name.clone(),
        table: table.to_path_buf(),
        entries,
        unused,
    })
}

/// Audits every identifier without printing anything.
pub fn run_audit(
    provider: &dyn SearchProvider,
    request: &SearchRequest,
    identifiers: &[String],
    table: &Path,
) -> AuditReport {
    match run_audit_with(provider, request, identifiers, table, |_| Ok::<(), Infallible>(())) {
        Ok(report) => report,
        Err(never) => match never {},
    }
}

/// Writes the table lines of every unused identifier, as the provider
/// returns them. A failed lookup prints nothing for that identifier.
pub fn dump_unused_details<W: Write>(
    provider: &dyn SearchProvider,
    table: &Path,
    unused: &[String],
    out: &mut W,
) -> io::Result<()> {
    for identifier in unused {
        match provider.show_matches(table, identifier) {
            Ok(text) => out.write_all(text.as_bytes())?,
            Err(e) => {
                warn!(
                    identifier = %identifier,
                    table = %table.display(),
                    error = %e,
                    "table lookup failed"
                );
            }
        }
    }
    Ok(())
}

/// Runs the audit and streams the plain-text report to `out`.
pub fn write_report<W: Write>(
    provider: &dyn SearchProvider,
    request: &SearchRequest,
    identifiers: &[String],
    table: &Path,
    out: &mut W,
) -> io::Result<AuditReport> {
    let label = request.file_type.name.clone();
    let report = run_audit_with(provider, request, identifiers, table, |usage| -> io::Result<()> {
        let line = report_line(&usage.identifier, &classify(usage.count, &label));
        writeln!(out, "{}", line)?;
        out.flush()
    })?;

    writeln!(out)?;
    writeln!(out, "{}", unused_header(table))?;
    debug!(unused = report.unused.len(), "dumping table lines");
    dump_unused_details(provider, table, &report.unused, out)?;
    out.flush()?;

    Ok(report)
}
