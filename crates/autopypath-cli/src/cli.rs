//! CLI argument parsing using clap derive

use std::path::PathBuf;

use autopypath_core::{LoadStrategy, MarkerType, ResolveOptions};
use clap::{Parser, ValueEnum};
use tracing::Level;

/// autopypath - Resolve a Python search path from a script's repository
#[derive(Parser, Debug)]
#[command(name = "autopypath")]
#[command(author, version, about, long_about = None)]
pub struct Cli {
    /// Script whose repository root and search path are resolved
    pub context_file: PathBuf,

    /// Repository marker as NAME=TYPE, where TYPE is "file" or "dir"
    #[arg(short = 'm', long = "marker", value_name = "NAME=TYPE", value_parser = parse_marker)]
    pub markers: Vec<(String, MarkerType)>,

    /// Path to add, relative to the repository root
    #[arg(short = 'p', long = "path", value_name = "PATH")]
    pub paths: Vec<PathBuf>,

    /// Path used instead of --path on POSIX hosts
    #[arg(long = "posix-path", value_name = "PATH")]
    pub posix_paths: Vec<PathBuf>,

    /// Path used instead of --path on Windows hosts
    #[arg(long = "windows-path", value_name = "PATH")]
    pub windows_paths: Vec<PathBuf>,

    /// How paths are combined: prepend, prepend_highest_priority or replace
    #[arg(short = 's', long = "strategy", value_name = "STRATEGY")]
    pub load_strategy: Option<LoadStrategy>,

    /// Comma-separated source order (manual, autopypath, pyproject, dotenv)
    #[arg(short = 'o', long = "order", value_name = "SOURCES", value_delimiter = ',')]
    pub source_order: Vec<String>,

    /// Compute the result without modifying the search path
    #[arg(long)]
    pub dry_run: bool,

    /// Turn configuration warnings into errors
    #[arg(long)]
    pub strict: bool,

    /// Output format
    #[arg(short, long, value_enum, default_value_t = OutputFormat::Plain)]
    pub format: OutputFormat,

    /// Start from an empty search path instead of $PYTHONPATH
    #[arg(long)]
    pub no_env: bool,

    /// Enable verbose output
    #[arg(short, long)]
    pub verbose: bool,

    /// Log level for the resolution run (trace, debug, info, warn, error)
    #[arg(long, value_name = "LEVEL")]
    pub log_level: Option<Level>,
}

/// How the result is printed
#[derive(ValueEnum, Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum OutputFormat {
    /// Human-readable summary
    #[default]
    Plain,
    /// A single PYTHONPATH=... line
    Env,
    /// The full resolution as JSON
    Json,
}

impl Cli {
    /// Engine options for this invocation. Repeatable flags given zero
    /// times leave the setting to the configuration files.
    pub fn to_options(&self) -> ResolveOptions {
        fn non_empty<T: Clone>(values: &[T]) -> Option<Vec<T>> {
            (!values.is_empty()).then(|| values.to_vec())
        }

        ResolveOptions {
            context_file: self.context_file.clone(),
            repo_markers: non_empty(&self.markers),
            paths: non_empty(&self.paths),
            posix_paths: non_empty(&self.posix_paths),
            windows_paths: non_empty(&self.windows_paths),
            load_strategy: self.load_strategy,
            source_order: non_empty(&self.source_order),
            dry_run: self.dry_run,
            strict: self.strict,
            log_level: self.log_level,
        }
    }
}

fn parse_marker(value: &str) -> Result<(String, MarkerType), String> {
    let (name, kind) = value
        .rsplit_once('=')
        .ok_or_else(|| format!("expected NAME=TYPE, got {value:?}"))?;
    let kind = kind.parse::<MarkerType>().map_err(|e| e.to_string())?;
    Ok((name.to_string(), kind))
}
