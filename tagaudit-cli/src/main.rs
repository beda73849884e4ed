//! tagaudit CLI - report collection tags from the reco flags table that no
//! C++ source references.
//!
//! Run with no arguments from the top of the source tree:
//!
//! ```text
//! $ tagaudit
//! B0ECalClusters found in 3 cpp files
//! ...
//! ZDCEcalTruthClusters found in 0 cpp files <--------- WARNING
//!
//! Potentially unused parameters in `reco_flags.py`:
//!     ('ZDC:ZDCEcalTruthClusters:depthCorrection', '0', ''),
//! ```

use anyhow::{Context, Result};
use clap::Parser;
use std::io::Write;
use std::path::PathBuf;

use tagaudit_core::{
    init_structured_logging, load_config, log_error, log_info, print_json, Backend, FileType,
    IdentifierSource, TagAudit,
};

/// Exit code for setup failures (bad config, unknown file type, I/O).
const EXIT_FATAL: i32 = 2;

/// Exit code when `--fail-on-unused` is set and something is unused.
const EXIT_UNUSED: i32 = 1;

#[derive(Parser, Debug)]
#[command(author, version, about = "Find reco flags collection tags unused in C++ sources")]
pub struct Cli {
    /// Directory to search recursively
    #[arg(long, default_value = ".")]
    root: PathBuf,

    /// Flags table to show unused entries from (relative to --root)
    #[arg(long)]
    table: Option<PathBuf>,

    /// ripgrep file type to search (cpp, c, py, rust)
    #[arg(long)]
    file_type: Option<String>,

    /// Search backend: external (rg/grep) or builtin
    #[arg(long)]
    backend: Option<String>,

    /// Audit the collection names declared in the table instead of the built-in list
    #[arg(long)]
    from_table: bool,

    /// Extra directory names to skip (builtin backend)
    #[arg(long, num_args = 1..)]
    exclude: Vec<String>,

    /// Disable match highlighting in the builtin detail dump
    #[arg(long)]
    no_color: bool,

    /// Output results in JSON format
    #[arg(long)]
    json: bool,

    /// Exit with status 1 when any tag is unused
    #[arg(long)]
    fail_on_unused: bool,
}

/// Builds the audit from defaults, then tagaudit.toml, then flags.
fn configure(cli: &Cli) -> Result<TagAudit> {
    let mut audit = TagAudit::new(&cli.root);

    if let Some(cfg) = load_config(&cli.root)? {
        log_info(&format!("loaded config from {}", cli.root.display()));
        audit = audit.with_config(&cfg)?;
    }

    if let Some(table) = &cli.table {
        audit = audit.table(table);
    }
    if let Some(name) = &cli.file_type {
        audit = audit.file_type(FileType::from_name(name)?);
    }
    if let Some(backend) = &cli.backend {
        audit = audit.backend(backend.parse::<Backend>()?);
    }
    if cli.from_table {
        audit = audit.identifiers(IdentifierSource::Table);
    }
    if !cli.exclude.is_empty() {
        audit = audit.exclude_dirs(cli.exclude.clone());
    }
    if cli.no_color {
        audit = audit.color(false);
    }

    Ok(audit)
}

fn run(cli: &Cli) -> Result<bool> {
    let audit = configure(cli)?;

    let report = if cli.json {
        let report = audit.collect()?;
        print_json(&report);
        report
    } else {
        let stdout = std::io::stdout();
        let mut out = stdout.lock();
        let report = audit.run_to(&mut out)?;
        out.flush().context("Failed to flush stdout")?;
        report
    };

    Ok(!report.unused.is_empty())
}

fn main() -> Result<()> {
    std::panic::set_hook(Box::new(|info| {
        eprintln!("[PANIC] tagaudit internal error: {}", info);
        eprintln!("[PANIC] The process will exit with code 101.");
    }));

    init_structured_logging();

    let cli = Cli::parse();

    match run(&cli) {
        Ok(has_unused) => {
            if has_unused && cli.fail_on_unused {
                std::process::exit(EXIT_UNUSED);
            }
            Ok(())
        }
        Err(e) => {
            log_error(&format!("{:#}", e));
            eprintln!("Error: {:#}", e);
            std::process::exit(EXIT_FATAL);
        }
    }
}
