//! tagaudit-core: find collection tags that no source file references
//!
//! A reconstruction flags table (`reco_flags.py`) names many data
//! collections. This library counts, for each name, how many C++ files under
//! a tree mention it as a whole word, and reports the names nobody uses
//! together with the table lines that declare them.
//!
//! # Quick Start
//!
//! ```rust,ignore
//! use tagaudit_core::prelude::*;
//!
//! let report = TagAudit::new(".")
//!     .backend(Backend::Builtin)
//!     .collect()?;
//!
//! for tag in &report.unused {
//!     println!("Unused: {}", tag);
//! }
//! ```
//!
//! # Module Organization
//!
//! - [`identifiers`]: the embedded collection list and table extraction
//! - [`search`]: the [`SearchProvider`] seam and its two backends
//! - [`scan`]: file-type filters and recursive file discovery
//! - [`audit`]: counting, classification and the streamed report
//! - [`report`]: JSON rendering of a finished report
//! - [`builder`]: fluent configuration API
//! - [`config`]: `tagaudit.toml` loading
//! - [`error`]: typed error handling

pub mod audit;
pub mod builder;
pub mod config;
pub mod error;
pub mod identifiers;
pub mod logging;
pub mod prelude;
pub mod report;
pub mod scan;
pub mod search;

// Error types
pub use error::{IoResultExt, TagauditError, TagauditResult};

// Audit
pub use audit::{
    audit_identifier, classify, count_occurrences, dump_unused_details, report_line,
    run_audit, run_audit_with, unused_header, write_report, AuditReport, Classification,
    TagUsage, WARNING_MARKER,
};

// Builder API
pub use builder::{IdentifierSource, TagAudit, DEFAULT_TABLE};

// Configuration
pub use config::{load_config, TagauditConfig, CONFIG_FILE};

// Identifiers
pub use identifiers::{
    default_identifiers, identifiers_from_table, load_identifiers, DEFAULT_IDENTIFIERS,
};

// Logging
pub use logging::{init_structured_logging, log_error, log_info};

// Reporting
pub use report::{print_json, to_json};

// File discovery
pub use scan::{gather_files, FileType};

// Search
pub use search::{Backend, BuiltinSearch, ExternalSearch, SearchProvider, SearchRequest};
