//! In-process search: walk the tree once, then match a compiled
//! whole-word regex against every cached file.

use std::fs;
use std::path::Path;
use std::sync::{Arc, Mutex};

use colored::Colorize;
use rayon::prelude::*;
use regex::Regex;
use tracing::debug;

use super::{SearchProvider, SearchRequest};
use crate::error::{IoResultExt, TagauditError, TagauditResult};
use crate::scan::gather_files;

/// Builds a regex matching `word` literally, bounded by a non-word
/// character or a line edge on both sides.
///
/// Capture group 1 is the word itself, without the boundary characters.
pub fn whole_word_regex(word: &str) -> TagauditResult<Regex> {
    if word.is_empty() {
        return Err(TagauditError::invalid_argument("cannot search for an empty word"));
    }
    let pattern = format!(r"(?m)(?:^|\W)({})(?:\W|$)", regex::escape(word));
    Regex::new(&pattern).map_err(|e| TagauditError::Internal {
        message: format!("failed to compile pattern for '{}': {}", word, e),
    })
}

/// Text of one source file.
#[derive(Debug)]
struct SourceFile {
    text: String,
}

/// Files gathered for one [`SearchRequest`].
#[derive(Debug)]
struct Corpus {
    request: SearchRequest,
    files: Arc<Vec<SourceFile>>,
}

/// [`SearchProvider`] that needs no external tools.
///
/// Files are read once per distinct request and reused for every word.
#[derive(Debug, Default)]
pub struct BuiltinSearch {
    excludes: Vec<String>,
    color: bool,
    corpus: Mutex<Option<Corpus>>,
}

impl BuiltinSearch {
    pub fn new() -> Self {
        Self::default()
    }

    /// Also prunes directories with these names, at any depth.
    pub fn with_excludes(mut self, excludes: Vec<String>) -> Self {
        self.excludes = excludes;
        self
    }

    /// Highlights matched words in [`SearchProvider::show_matches`] output.
    pub fn with_color(mut self, color: bool) -> Self {
        self.color = color;
        self
    }

    fn files_for(&self, request: &SearchRequest) -> TagauditResult<Arc<Vec<SourceFile>>> {
        let mut cached = self.corpus.lock().map_err(|_| TagauditError::Internal {
            message: "source cache lock poisoned".to_string(),
        })?;

        if let Some(corpus) = cached.as_ref() {
            if corpus.request == *request {
                return Ok(Arc::clone(&corpus.files));
            }
        }

        let paths = gather_files(&request.root, &request.file_type, &self.excludes)
            .map_err(|e| TagauditError::search("builtin", format!("{:#}", e)))?;

        let files: Vec<SourceFile> = paths
            .par_iter()
            .filter_map(|path| match fs::read(path) {
                Ok(bytes) => Some(SourceFile {
                    text: String::from_utf8_lossy(&bytes).into_owned(),
                }),
                Err(e) => {
                    debug!(path = %path.display(), error = %e, "skipping unreadable file");
                    None
                }
            })
            .collect();
        debug!(root = %request.root.display(), files = files.len(), "source files cached");

        let files = Arc::new(files);
        *cached = Some(Corpus {
            request: request.clone(),
            files: Arc::clone(&files),
        });
        Ok(files)
    }

    fn highlight(&self, line: &str, re: &Regex) -> String {
        if !self.color {
            return line.to_string();
        }

        let mut out = String::with_capacity(line.len() + 16);
        let mut last = 0;
        // Resume right after each word, so a trailing boundary character can
        // lead the next occurrence.
        while let Some(word) = re.captures_at(line, last).and_then(|caps| caps.get(1)) {
            out.push_str(&line[last..word.start()]);
            out.push_str(&word.as_str().red().bold().to_string());
            last = word.end();
        }
        out.push_str(&line[last..]);
        out
    }
}

impl SearchProvider for BuiltinSearch {
    fn count_files(&self, request: &SearchRequest, word: &str) -> TagauditResult<usize> {
        let re = whole_word_regex(word)?;
        let files = self.files_for(request)?;
        let count = files.par_iter().filter(|f| re.is_match(&f.text)).count();
        debug!(identifier = %word, count, "builtin search finished");
        Ok(count)
    }

    fn show_matches(&self, file: &Path, word: &str) -> TagauditResult<String> {
        let re = whole_word_regex(word)?;
        let bytes = fs::read(file).with_path(file)?;
        let text = String::from_utf8_lossy(&bytes);

        let mut out = String::new();
        for line in text.lines().filter(|line| re.is_match(line)) {
            out.push_str(&self.highlight(line, &re));
            out.push('\n');
        }
        Ok(out)
    }

    fn name(&self) -> &str {
        "builtin"
    }
}
