//! Builder pattern API for running an audit.
//!
//! ```rust,ignore
//! use tagaudit_core::prelude::*;
//!
//! let report = TagAudit::new(".")
//!     .backend(Backend::Builtin)
//!     .run_to(&mut std::io::stdout().lock())?;
//!
//! println!("Unused: {:?}", report.unused);
//! ```

use std::fs;
use std::io::Write;
use std::path::PathBuf;

use anyhow::{Context, Result};

use crate::audit::{self, AuditReport};
use crate::config::TagauditConfig;
use crate::identifiers::{default_identifiers, identifiers_from_table, load_identifiers};
use crate::scan::FileType;
use crate::search::{Backend, BuiltinSearch, ExternalSearch, SearchProvider, SearchRequest};

/// Flags table audited by default, relative to the root.
pub const DEFAULT_TABLE: &str = "src/tools/default_flags_table/reco_flags.py";

/// Where the identifier list comes from.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum IdentifierSource {
    /// The embedded collection list.
    Embedded,
    /// An explicit list (from config or the caller).
    List(Vec<String>),
    /// Collection names declared in the flags table itself.
    Table,
}

/// Builder for configuring an audit.
#[derive(Debug, Clone)]
pub struct TagAudit {
    /// Directory searched recursively
    root: PathBuf,

    /// Flags table, relative to `root` unless absolute
    table: PathBuf,

    /// File type filter
    file_type: FileType,

    /// Search backend
    backend: Backend,

    /// Identifier list source
    source: IdentifierSource,

    /// Extra excluded directories (builtin backend)
    excluded_dirs: Vec<String>,

    /// Highlight matches in the builtin detail dump
    color: bool,
}

impl TagAudit {
    /// Create a new audit of the tree at `root` with default settings.
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self {
            root: root.into(),
            table: PathBuf::from(DEFAULT_TABLE),
            file_type: FileType::cpp(),
            backend: Backend::External,
            source: IdentifierSource::Embedded,
            excluded_dirs: Vec::new(),
            color: true,
        }
    }

    /// Apply values from a loaded `tagaudit.toml`.
    pub fn with_config(mut self, cfg: &TagauditConfig) -> Result<Self> {
        if let Some(ids) = &cfg.identifiers {
            self.source = IdentifierSource::List(ids.clone());
        }
        if let Some(table) = &cfg.table {
            self.table = PathBuf::from(table);
        }
        if let Some(name) = &cfg.file_type {
            self.file_type = FileType::from_name(name).context("Invalid file_type in tagaudit.toml")?;
        }
        if let Some(backend) = &cfg.backend {
            self.backend = backend.parse::<Backend>().context("Invalid backend in tagaudit.toml")?;
        }
        if let Some(exclude) = &cfg.exclude {
            self.excluded_dirs = exclude.clone();
        }
        if let Some(color) = cfg.color {
            self.color = color;
        }
        Ok(self)
    }

    /// Set the flags table path.
    pub fn table(mut self, table: impl Into<PathBuf>) -> Self {
        self.table = table.into();
        self
    }

    /// Set the file type filter.
    pub fn file_type(mut self, file_type: FileType) -> Self {
        self.file_type = file_type;
        self
    }

    /// Set the search backend.
    pub fn backend(mut self, backend: Backend) -> Self {
        self.backend = backend;
        self
    }

    /// Set where identifiers come from.
    pub fn identifiers(mut self, source: IdentifierSource) -> Self {
        self.source = source;
        self
    }

    /// Add directory names the builtin backend skips.
    pub fn exclude_dirs(mut self, dirs: Vec<String>) -> Self {
        self.excluded_dirs.extend(dirs);
        self
    }

    /// Enable or disable match highlighting in the builtin detail dump.
    pub fn color(mut self, enabled: bool) -> Self {
        self.color = enabled;
        self
    }

    /// The flags table path as seen from the working directory.
    pub fn table_path(&self) -> PathBuf {
        if self.table.is_absolute() {
            self.table.clone()
        } else {
            self.root.join(&self.table)
        }
    }

    /// Resolve the identifier list, sorted.
    pub fn resolve_identifiers(&self) -> Result<Vec<String>> {
        match &self.source {
            IdentifierSource::Embedded => Ok(default_identifiers()),
            IdentifierSource::List(ids) => Ok(load_identifiers(ids.as_slice())),
            IdentifierSource::Table => {
                let path = self.table_path();
                let text = fs::read_to_string(&path)
                    .with_context(|| format!("Failed to read flags table {}", path.display()))?;
                Ok(identifiers_from_table(&text))
            }
        }
    }

    /// Build the configured search provider.
    pub fn provider(&self) -> Box<dyn SearchProvider> {
        match self.backend {
            Backend::External => Box::new(ExternalSearch::new()),
            Backend::Builtin => Box::new(
                BuiltinSearch::new()
                    .with_excludes(self.excluded_dirs.clone())
                    .with_color(self.color),
            ),
        }
    }

    fn request(&self) -> SearchRequest {
        SearchRequest::new(&self.root, self.file_type.clone())
    }

    /// Run the audit, streaming the plain-text report to `out`.
    pub fn run_to<W: Write>(&self, out: &mut W) -> Result<AuditReport> {
        let provider = self.provider();
        self.run_with_provider(provider.as_ref(), out)
    }

    /// Same as [`TagAudit::run_to`] with a caller-supplied provider.
    pub fn run_with_provider<W: Write>(
        &self,
        provider: &dyn SearchProvider,
        out: &mut W,
    ) -> Result<AuditReport> {
        let identifiers = self.resolve_identifiers()?;
        let table = self.table_path();
        audit::write_report(provider, &self.request(), &identifiers, &table, out)
            .context("Failed to write report")
    }

    /// Run the audit without printing anything.
    pub fn collect(&self) -> Result<AuditReport> {
        let identifiers = self.resolve_identifiers()?;
        let provider = self.provider();
        Ok(audit::run_audit(
            provider.as_ref(),
            &self.request(),
            &identifiers,
            &self.table_path(),
        ))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::path::Path;

    #[test]
    fn test_defaults() {
        let audit = TagAudit::new(".");
        assert_eq!(
            audit.table_path(),
            Path::new(".").join("src/tools/default_flags_table/reco_flags.py")
        );
        assert_eq!(audit.backend, Backend::External);
        assert_eq!(audit.file_type, FileType::cpp());
        assert_eq!(audit.resolve_identifiers().unwrap(), default_identifiers());
    }

    #[test]
    fn test_with_config_overrides() {
        let cfg = TagauditConfig {
            identifiers: Some(vec!["ZDCEcalRawHits".into(), "B0ECalRawHits".into()]),
            table: Some("flags.py".into()),
            file_type: Some("py".into()),
            backend: Some("builtin".into()),
            exclude: Some(vec!["vendor".into()]),
            color: Some(false),
        };
        let audit = TagAudit::new("/tree").with_config(&cfg).unwrap();
        assert_eq!(audit.table_path(), PathBuf::from("/tree/flags.py"));
        assert_eq!(audit.backend, Backend::Builtin);
        assert_eq!(audit.file_type.name, "py");
        assert_eq!(audit.excluded_dirs, vec!["vendor".to_string()]);
        assert!(!audit.color);
        assert_eq!(
            audit.resolve_identifiers().unwrap(),
            vec!["B0ECalRawHits", "ZDCEcalRawHits"]
        );
    }

    #[test]
    fn test_with_config_rejects_unknown_backend() {
        let cfg = TagauditConfig {
            backend: Some("ripgrep".into()),
            ..Default::default()
        };
        let err = TagAudit::new(".").with_config(&cfg).unwrap_err();
        assert!(err.to_string().contains("Invalid backend"));
    }

    #[test]
    fn test_absolute_table_is_kept() {
        let audit = TagAudit::new("/tree").table("/etc/flags/reco_flags.py");
        assert_eq!(audit.table_path(), PathBuf::from("/etc/flags/reco_flags.py"));
    }

    #[test]
    fn test_table_source_missing_file_is_error() {
        let audit = TagAudit::new("/nonexistent/tagaudit/tree").identifiers(IdentifierSource::Table);
        let err = audit.resolve_identifiers().unwrap_err();
        assert!(err.to_string().contains("Failed to read flags table"));
    }
}
