//! Search by running ripgrep and grep as child processes.
//!
//! One child per call, waited on to completion. A tool that cannot be
//! spawned is a [`TagauditError::Search`]; the audit decides what to do
//! with it.

use std::collections::HashSet;
use std::path::Path;
use std::process::{Command, Output};

use tracing::{debug, warn};

use super::{SearchProvider, SearchRequest};
use crate::error::{TagauditError, TagauditResult};

/// ripgrep/grep exit status for "ran fine, nothing matched".
const NO_MATCH_STATUS: i32 = 1;

/// [`SearchProvider`] backed by `rg` (counting) and `grep` (detail dump).
#[derive(Debug, Clone)]
pub struct ExternalSearch {
    rg: String,
    grep: String,
}

impl Default for ExternalSearch {
    fn default() -> Self {
        Self::new()
    }
}

impl ExternalSearch {
    /// Uses `rg` and `grep` from `PATH`.
    pub fn new() -> Self {
        Self::with_programs("rg", "grep")
    }

    /// Uses the given executables instead of `rg` and `grep`.
    pub fn with_programs(rg: impl Into<String>, grep: impl Into<String>) -> Self {
        Self {
            rg: rg.into(),
            grep: grep.into(),
        }
    }

    /// Runs `cmd` and turns its output into text, tolerating "no match".
    ///
    /// Any other failing status is logged; stdout is still used if the tool
    /// printed anything, and an error is returned only when it printed
    /// nothing at all.
    fn run(tool: &str, cmd: &mut Command) -> TagauditResult<String> {
        let Output {
            status,
            stdout,
            stderr,
        } = cmd
            .output()
            .map_err(|e| TagauditError::search(tool, e.to_string()))?;

        let stdout = String::from_utf8_lossy(&stdout).into_owned();
        match status.code() {
            Some(0) | Some(NO_MATCH_STATUS) => Ok(stdout),
            code => {
                let stderr = String::from_utf8_lossy(&stderr);
                let message = format!(
                    "exit status {}: {}",
                    code.map_or_else(|| "signal".to_string(), |c| c.to_string()),
                    stderr.trim()
                );
                warn!(tool = %tool, detail = %message, "search tool reported a failure");
                if stdout.is_empty() {
                    Err(TagauditError::search(tool, message))
                } else {
                    Ok(stdout)
                }
            }
        }
    }
}

/// Counts distinct, non-empty lines of `rg --files-with-matches` output.
pub(crate) fn count_listed_files(listing: &str) -> usize {
    listing
        .lines()
        .map(str::trim_end)
        .filter(|line| !line.is_empty())
        .collect::<HashSet<_>>()
        .len()
}

impl SearchProvider for ExternalSearch {
    fn count_files(&self, request: &SearchRequest, word: &str) -> TagauditResult<usize> {
        let mut cmd = Command::new(&self.rg);
        cmd.args([
            "--files-with-matches",
            "--word-regexp",
            "--fixed-strings",
            "--case-sensitive",
            "--type",
            request.file_type.name.as_str(),
            "--",
            word,
        ])
        .arg(&request.root);

        let listing = Self::run(&self.rg, &mut cmd)?;
        let count = count_listed_files(&listing);
        debug!(identifier = %word, count, "ripgrep search finished");
        Ok(count)
    }

    fn show_matches(&self, file: &Path, word: &str) -> TagauditResult<String> {
        let mut cmd = Command::new(&self.grep);
        cmd.args(["--color=always", "--word-regexp", "--fixed-strings", "--", word])
            .arg(file);
        Self::run(&self.grep, &mut cmd)
    }

    fn name(&self) -> &str {
        "external"
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::scan::FileType;
    use std::fs;
    use std::path::PathBuf;
    use std::sync::atomic::{AtomicU64, Ordering};

    const MISSING_TOOL: &str = "tagaudit-test-no-such-search-tool";

    static TEST_COUNTER: AtomicU64 = AtomicU64::new(0);

    /// Writes a shell script standing in for rg/grep. It records its argv
    /// (one per line) to `argv`, prints `stdout` and exits with `status`.
    #[cfg(unix)]
    fn stub_tool(stdout: &str, status: i32) -> PathBuf {
        use std::os::unix::fs::PermissionsExt;

        let id = TEST_COUNTER.fetch_add(1, Ordering::SeqCst);
        let dir = std::env::temp_dir().join(format!(
            "tagaudit_external_test_{}_{}",
            std::process::id(),
            id
        ));
        if dir.exists() {
            fs::remove_dir_all(&dir).ok();
        }
        fs::create_dir_all(&dir).unwrap();
        fs::write(dir.join("stdout"), stdout).unwrap();

        let script = dir.join("tool");
        fs::write(
            &script,
            format!(
                "#!/bin/sh\nprintf '%s\\n' \"$@\" > \"{dir}/argv\"\ncat \"{dir}/stdout\"\necho 'stub failure' >&2\nexit {status}\n",
                dir = dir.display(),
                status = status
            ),
        )
        .unwrap();
        fs::set_permissions(&script, fs::Permissions::from_mode(0o755)).unwrap();
        script
    }

    #[cfg(unix)]
    fn recorded_argv(script: &Path) -> Vec<String> {
        let argv = fs::read_to_string(script.with_file_name("argv")).unwrap();
        argv.lines().map(str::to_string).collect()
    }

    #[cfg(unix)]
    fn cleanup(script: &Path) {
        if let Some(dir) = script.parent() {
            fs::remove_dir_all(dir).ok();
        }
    }

    #[test]
    fn test_count_listed_files_distinct_and_non_empty() {
        let listing = "./src/a.cc\n./src/b.h\n\n./src/a.cc\n";
        assert_eq!(count_listed_files(listing), 2);
        assert_eq!(count_listed_files(""), 0);
    }

    #[test]
    fn test_missing_rg_is_search_error() {
        let search = ExternalSearch::with_programs(MISSING_TOOL, MISSING_TOOL);
        let request = SearchRequest::new(".", FileType::cpp());
        let err = search
            .count_files(&request, "GeneratedParticles")
            .unwrap_err();
        assert!(matches!(err, TagauditError::Search { .. }));
        assert!(err.to_string().contains(MISSING_TOOL));
    }

    #[test]
    fn test_missing_grep_is_search_error() {
        let search = ExternalSearch::with_programs(MISSING_TOOL, MISSING_TOOL);
        let err = search
            .show_matches(Path::new("reco_flags.py"), "ZDCEcalTruthClusters")
            .unwrap_err();
        assert!(err.is_recoverable());
    }

    #[cfg(unix)]
    #[test]
    fn test_rg_receives_whole_word_fixed_string_arguments() {
        let rg = stub_tool("./src/a.cc\n./src/b.h\n./src/a.cc\n", 0);
        let search = ExternalSearch::with_programs(rg.display().to_string(), MISSING_TOOL);
        let request = SearchRequest::new("/tree", FileType::cpp());

        assert_eq!(search.count_files(&request, "GeneratedParticles").unwrap(), 2);
        assert_eq!(
            recorded_argv(&rg),
            vec![
                "--files-with-matches",
                "--word-regexp",
                "--fixed-strings",
                "--case-sensitive",
                "--type",
                "cpp",
                "--",
                "GeneratedParticles",
                "/tree",
            ]
        );
        cleanup(&rg);
    }

    #[cfg(unix)]
    #[test]
    fn test_grep_receives_whole_word_fixed_string_arguments() {
        let line = "    ('Reco:GeneratedParticles:MomentumSmearing', '0', ''),\n";
        let grep = stub_tool(line, 0);
        let search = ExternalSearch::with_programs(MISSING_TOOL, grep.display().to_string());
        let table = Path::new("/tree/src/tools/default_flags_table/reco_flags.py");

        assert_eq!(search.show_matches(table, "GeneratedParticles").unwrap(), line);
        assert_eq!(
            recorded_argv(&grep),
            vec![
                "--color=always",
                "--word-regexp",
                "--fixed-strings",
                "--",
                "GeneratedParticles",
                "/tree/src/tools/default_flags_table/reco_flags.py",
            ]
        );
        cleanup(&grep);
    }

    #[cfg(unix)]
    #[test]
    fn test_no_match_status_counts_as_zero() {
        let tool = stub_tool("", NO_MATCH_STATUS);
        let program = tool.display().to_string();
        let search = ExternalSearch::with_programs(program.clone(), program);
        let request = SearchRequest::new("/tree", FileType::cpp());

        assert_eq!(search.count_files(&request, "ZDCEcalTruthClusters").unwrap(), 0);
        assert_eq!(
            search
                .show_matches(Path::new("reco_flags.py"), "ZDCEcalTruthClusters")
                .unwrap(),
            ""
        );
        cleanup(&tool);
    }

    #[cfg(unix)]
    #[test]
    fn test_failing_status_still_uses_output() {
        let tool = stub_tool("./src/a.cc\n", 2);
        let program = tool.display().to_string();
        let search = ExternalSearch::with_programs(program.clone(), program);
        let request = SearchRequest::new("/tree", FileType::cpp());

        assert_eq!(search.count_files(&request, "EcalEndcapNRawHits").unwrap(), 1);
        assert_eq!(
            search
                .show_matches(Path::new("reco_flags.py"), "EcalEndcapNRawHits")
                .unwrap(),
            "./src/a.cc\n"
        );
        cleanup(&tool);
    }

    #[cfg(unix)]
    #[test]
    fn test_failing_status_without_output_is_search_error() {
        let rg = stub_tool("", 2);
        let search = ExternalSearch::with_programs(rg.display().to_string(), MISSING_TOOL);
        let request = SearchRequest::new("/tree", FileType::cpp());

        let err = search.count_files(&request, "EcalEndcapNRawHits").unwrap_err();
        assert!(matches!(err, TagauditError::Search { .. }));
        assert!(err.to_string().contains("exit status 2"));
        assert!(err.to_string().contains("stub failure"));
        cleanup(&rg);
    }
}
