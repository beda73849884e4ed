//! Search backends.
//!
//! The audit only needs two questions answered: how many files of a type
//! contain a word, and which lines of one file contain it. [`SearchProvider`]
//! is that seam; [`ExternalSearch`] shells out to ripgrep/grep and
//! [`BuiltinSearch`] answers in-process. The builtin walk uses ripgrep's
//! walker with its defaults, so both see the same files unless extra
//! excludes are configured.

use std::fmt;
use std::path::{Path, PathBuf};
use std::str::FromStr;

use crate::error::{TagauditError, TagauditResult};
use crate::scan::FileType;

mod builtin;
mod external;

pub use builtin::{whole_word_regex, BuiltinSearch};
pub use external::ExternalSearch;

/// Where and what kind of files to search.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SearchRequest {
    /// Directory searched recursively.
    pub root: PathBuf,
    /// Only files of this type are counted.
    pub file_type: FileType,
}

impl SearchRequest {
    pub fn new(root: impl Into<PathBuf>, file_type: FileType) -> Self {
        Self {
            root: root.into(),
            file_type,
        }
    }
}

/// Whole-word, case-sensitive, literal search capability.
///
/// `word` is always a literal: regex metacharacters in it match themselves.
pub trait SearchProvider {
    /// Number of distinct files under `request.root` of `request.file_type`
    /// that contain `word` as a whole word.
    fn count_files(&self, request: &SearchRequest, word: &str) -> TagauditResult<usize>;

    /// Lines of `file` containing `word` as a whole word, ready to print.
    ///
    /// An empty string means no line matched.
    fn show_matches(&self, file: &Path, word: &str) -> TagauditResult<String>;

    /// Short backend name used in logs.
    fn name(&self) -> &str;
}

/// Which [`SearchProvider`] to use.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Backend {
    /// ripgrep for counting, grep for the detail dump.
    #[default]
    External,
    /// In-process directory walk and regex matching.
    Builtin,
}

impl FromStr for Backend {
    type Err = TagauditError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "external" => Ok(Self::External),
            "builtin" => Ok(Self::Builtin),
            other => Err(TagauditError::invalid_argument(format!(
                "unknown backend '{}' (expected 'external' or 'builtin')",
                other
            ))),
        }
    }
}

impl fmt::Display for Backend {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::External => f.write_str("external"),
            Self::Builtin => f.write_str("builtin"),
        }
    }
}
