//! Rendering of a resolution for the terminal

use std::io::Write;

use autopypath_core::{Resolution, SearchPath, SourceName, defaults};
use colored::Colorize;

use crate::cli::OutputFormat;
use crate::error::Result;

/// Print `resolution` to stdout in `format`.
pub fn print(
    resolution: &Resolution,
    search_path: &SearchPath,
    format: OutputFormat,
    verbose: bool,
) -> Result<()> {
    let mut out = std::io::stdout().lock();
    match format {
        OutputFormat::Plain => plain(&mut out, resolution, verbose)?,
        OutputFormat::Env => {
            let value = search_path.to_env_value()?;
            writeln!(out, "{}={}", defaults::DOTENV_KEY, value.to_string_lossy())?;
        }
        OutputFormat::Json => {
            writeln!(out, "{}", serde_json::to_string_pretty(resolution)?)?;
        }
    }
    Ok(())
}

fn plain(out: &mut impl Write, resolution: &Resolution, verbose: bool) -> Result<()> {
    if resolution.dry_run() {
        writeln!(out, "{}", "[dry-run] search path not modified".yellow())?;
    }
    writeln!(
        out,
        "{} {}",
        "Repository root:".bold(),
        resolution.repo_root().display()
    )?;
    writeln!(out, "{} {}", "Load strategy:".bold(), resolution.load_strategy())?;
    let order = resolution
        .source_order()
        .iter()
        .map(SourceName::as_str)
        .collect::<Vec<_>>()
        .join(", ");
    writeln!(out, "{} {}", "Resolution order:".bold(), order)?;

    if resolution.paths().is_empty() {
        writeln!(out, "{}", "No paths added".yellow())?;
    } else {
        writeln!(out, "{}", "Paths:".bold())?;
        for path in resolution.paths() {
            writeln!(out, "  {}", path.display().to_string().green())?;
        }
    }

    if verbose {
        let tool = resolution.autopypath_config();
        writeln!(out)?;
        writeln!(out, "{}\n{}", "manual:".cyan(), resolution.manual_config())?;
        writeln!(
            out,
            "{} ({})\n{}",
            "autopypath:".cyan(),
            tool.toml_file(),
            tool.config()
        )?;
        let pyproject = resolution.pyproject_config();
        writeln!(
            out,
            "{} ({})\n{}",
            "pyproject:".cyan(),
            pyproject.toml_file(),
            pyproject.config()
        )?;
        let dotenv = resolution.dotenv_config();
        writeln!(
            out,
            "{} ({})\n{}",
            "dotenv:".cyan(),
            dotenv.dotenv_file().display(),
            dotenv.config()
        )?;
    }
    Ok(())
}
