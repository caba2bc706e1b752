//! autopypath CLI
//!
//! Resolves the search path for a script and prints it.

mod cli;
mod error;
mod output;

use autopypath_core::{Resolution, SearchPath, defaults};
use clap::Parser;
use colored::Colorize;
use tracing_subscriber::{EnvFilter, fmt, prelude::*};

use cli::Cli;
use error::{CliError, Result};

fn main() {
    if let Err(e) = run() {
        eprintln!("{}: {}", "error".red().bold(), e);
        std::process::exit(1);
    }
}

fn run() -> Result<()> {
    let cli = Cli::parse();
    init_logging(cli.verbose)?;

    let mut search_path = if cli.no_env {
        SearchPath::default()
    } else {
        SearchPath::from_env(defaults::DOTENV_KEY)
    };
    tracing::debug!(entries = search_path.len(), "Starting search path");

    let resolution = Resolution::resolve(&cli.to_options(), &mut search_path)?;
    output::print(&resolution, &search_path, cli.format, cli.verbose)
}

/// Install the global subscriber. `RUST_LOG` wins; otherwise warnings only,
/// or debug output with `--verbose`.
fn init_logging(verbose: bool) -> Result<()> {
    let fallback = if verbose { "debug" } else { "warn" };
    let filter = EnvFilter::try_from_default_env()
        .or_else(|_| EnvFilter::try_new(fallback))
        .map_err(|e| CliError::user(format!("Invalid log filter: {e}")))?;

    tracing_subscriber::registry()
        .with(filter)
        .with(fmt::layer().with_writer(std::io::stderr).with_target(true).compact())
        .try_init()
        .map_err(|e| CliError::user(format!("Failed to initialize logging: {e}")))
}
