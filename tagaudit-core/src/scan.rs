//! File-type filters and recursive source discovery.
//!
//! The walk uses ripgrep's own walker (`ignore::WalkBuilder`) with its
//! defaults, so the builtin backend sees the same files `rg --type` does:
//! hidden entries are skipped and `.gitignore`/`.ignore` rules apply.
//!
//! Performance notes:
//! - Extra excluded directories are pruned with `filter_entry`, so their
//!   subtrees are never visited
//! - Name filtering runs on Rayon workers once the walk is done

use anyhow::{Context, Result};
use ignore::{DirEntry, WalkBuilder};
use rayon::prelude::*;
use std::collections::HashSet;
use std::path::{Path, PathBuf};

use crate::error::{TagauditError, TagauditResult};

/// A named set of file name suffixes, modeled on ripgrep's `--type` filters.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FileType {
    /// Name passed to `rg --type` and shown in the report ("cpp files").
    pub name: String,
    /// File name suffixes, each including the leading dot.
    pub suffixes: Vec<String>,
}

impl FileType {
    fn with_suffixes(name: &str, suffixes: &[&str]) -> Self {
        Self {
            name: name.to_string(),
            suffixes: suffixes.iter().map(|s| s.to_string()).collect(),
        }
    }

    /// C++ sources and headers, the same globs as ripgrep's `cpp` type.
    pub fn cpp() -> Self {
        Self::with_suffixes(
            "cpp",
            &[
                ".C", ".h", ".H", ".cc", ".cpp", ".hpp", ".cxx", ".hxx", ".hh", ".inl",
                ".C.in", ".h.in", ".H.in", ".cc.in", ".cpp.in", ".hpp.in", ".cxx.in",
                ".hxx.in", ".hh.in",
            ],
        )
    }

    /// Looks up a filter by its ripgrep type name.
    pub fn from_name(name: &str) -> TagauditResult<Self> {
        match name {
            "cpp" => Ok(Self::cpp()),
            "c" => Ok(Self::with_suffixes("c", &[".c", ".h", ".H", ".c.in", ".h.in"])),
            "py" => Ok(Self::with_suffixes("py", &[".py", ".pyi"])),
            "rust" => Ok(Self::with_suffixes("rust", &[".rs"])),
            other => Err(TagauditError::invalid_argument(format!(
                "unknown file type '{}' (expected one of: cpp, c, py, rust)",
                other
            ))),
        }
    }

    /// Checks whether a file name belongs to this type.
    ///
    /// Suffix matching is case-sensitive: `Foo.C` is C++, `foo.c` is not.
    pub fn matches(&self, path: &Path) -> bool {
        path.file_name()
            .and_then(|n| n.to_str())
            .is_some_and(|name| {
                self.suffixes
                    .iter()
                    .any(|suffix| name.len() > suffix.len() && name.ends_with(suffix.as_str()))
            })
    }
}

impl Default for FileType {
    fn default() -> Self {
        Self::cpp()
    }
}

#[inline]
fn is_excluded_dir(entry: &DirEntry, excludes: &HashSet<String>) -> bool {
    // The walk root itself is never pruned.
    entry.depth() > 0
        && entry.file_type().is_some_and(|t| t.is_dir())
        && entry
            .file_name()
            .to_str()
            .is_some_and(|name| excludes.contains(name))
}

/// Gathers every file under `root` that matches `file_type`.
///
/// Hidden and ignored entries are skipped exactly as ripgrep skips them.
/// Directories named in `extra_excludes` are pruned at any depth. The result
/// is sorted so callers see a stable order across runs.
pub fn gather_files(
    root: &Path,
    file_type: &FileType,
    extra_excludes: &[String],
) -> Result<Vec<PathBuf>> {
    let excludes: HashSet<String> = extra_excludes.iter().cloned().collect();

    let entries: Vec<_> = WalkBuilder::new(root)
        .filter_entry(move |e| !is_excluded_dir(e, &excludes))
        .build()
        .collect();

    let mut files = entries
        .into_par_iter()
        .filter_map(|entry| match entry {
            Ok(e) => {
                let path = e.path();
                if e.file_type().is_some_and(|t| t.is_file()) && file_type.matches(path) {
                    Some(Ok(path.to_path_buf()))
                } else {
                    None
                }
            }
            Err(e) => Some(Err(e.into())),
        })
        .collect::<Result<Vec<_>>>()
        .with_context(|| format!("Failed to gather {} files from {}", file_type.name, root.display()))?;

    files.sort();
    Ok(files)
}
