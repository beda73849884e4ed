//! Typed error handling for tagaudit.
//!
//! Search backends return these so the audit can tell a failed search apart
//! from a search that simply found nothing, even though the printed report
//! treats both as zero.

use std::path::PathBuf;
use thiserror::Error;

/// Main error type for tagaudit operations.
#[derive(Error, Debug)]
pub enum TagauditError {
    /// I/O error when reading files
    #[error("I/O error at {path}: {message}")]
    Io {
        path: PathBuf,
        message: String,
        #[source]
        source: Option<std::io::Error>,
    },

    /// External search tool could not be run or reported a failure
    #[error("Search with {tool} failed: {message}")]
    Search { tool: String, message: String },

    /// Configuration file errors
    #[error("Config error at {path}: {message}")]
    Config { path: PathBuf, message: String },

    /// Invalid argument provided
    #[error("Invalid argument: {message}")]
    InvalidArgument { message: String },

    /// Generic internal error
    #[error("Internal error: {message}")]
    Internal { message: String },
}

impl TagauditError {
    /// Create an I/O error with path context.
    pub fn io(path: impl Into<PathBuf>, err: std::io::Error) -> Self {
        Self::Io {
            path: path.into(),
            message: err.to_string(),
            source: Some(err),
        }
    }

    /// Create a search error for the named tool.
    pub fn search(tool: impl Into<String>, message: impl Into<String>) -> Self {
        Self::Search {
            tool: tool.into(),
            message: message.into(),
        }
    }

    /// Create a config error.
    pub fn config(path: impl Into<PathBuf>, message: impl Into<String>) -> Self {
        Self::Config {
            path: path.into(),
            message: message.into(),
        }
    }

    /// Create an invalid argument error.
    pub fn invalid_argument(message: impl Into<String>) -> Self {
        Self::InvalidArgument {
            message: message.into(),
        }
    }

    /// Whether a search tool or file was at fault, rather than the request.
    pub fn is_recoverable(&self) -> bool {
        matches!(self, Self::Io { .. } | Self::Search { .. })
    }
}

/// Convenience type alias for tagaudit results.
pub type TagauditResult<T> = Result<T, TagauditError>;

/// Extension trait for converting std::io::Error with path context.
pub trait IoResultExt<T> {
    /// Add path context to an I/O error.
    fn with_path(self, path: impl Into<PathBuf>) -> TagauditResult<T>;
}

impl<T> IoResultExt<T> for std::io::Result<T> {
    fn with_path(self, path: impl Into<PathBuf>) -> TagauditResult<T> {
        self.map_err(|e| TagauditError::io(path, e))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::path::Path;

    #[test]
    fn test_io_error() {
        let err = TagauditError::io(
            PathBuf::from("/tree/reco_flags.py"),
            std::io::Error::new(std::io::ErrorKind::NotFound, "file not found"),
        );
        assert!(matches!(&err, TagauditError::Io { path, .. } if path == Path::new("/tree/reco_flags.py")));
        assert!(err.to_string().contains("/tree/reco_flags.py"));
    }

    #[test]
    fn test_search_error_message() {
        let err = TagauditError::search("rg", "No such file or directory");
        assert_eq!(
            err.to_string(),
            "Search with rg failed: No such file or directory"
        );
    }

    #[test]
    fn test_is_recoverable() {
        assert!(TagauditError::search("rg", "spawn failed").is_recoverable());
        assert!(!TagauditError::config("tagaudit.toml", "bad").is_recoverable());
        assert!(!TagauditError::invalid_argument("unknown file type").is_recoverable());
    }

    #[test]
    fn test_io_result_ext() {
        let result: std::io::Result<()> =
            Err(std::io::Error::new(std::io::ErrorKind::NotFound, "missing"));
        let tagged = result.with_path("/missing/file.cc");
        assert!(matches!(tagged, Err(TagauditError::Io { .. })));
    }
}
