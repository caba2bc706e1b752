//! Search path resolution
//!
//! [`Resolution::resolve`] runs the whole pipeline for one context file:
//!
//! 1. Find the repository root, side-loading `autopypath.toml` on the way
//! 2. Load `pyproject.toml` and `.env` from the root
//! 3. Pick the load strategy and source order (manual, autopypath,
//!    pyproject, then built-in defaults; first defined value wins)
//! 4. Gather paths from the sources in order according to the strategy
//! 5. Resolve, de-duplicate and existence-check the gathered paths
//! 6. Splice them into the [`SearchPath`] unless this is a dry run

use std::collections::HashSet;
use std::path::{Path, PathBuf};

use serde::Serialize;
use tracing::Level;

use crate::config::{DefaultConfig, DotenvConfig, ManualSettings, SourceConfig, TomlConfig};
use crate::error::{Error, Result};
use crate::locator::{self, RootSearch};
use crate::logging::LogLevelGuard;
use crate::path;
use crate::search_path::SearchPath;
use crate::types::{LoadStrategy, MarkerType, SourceName};
use crate::validate;

/// Inputs to a resolution run.
///
/// Everything except the context file is optional; unset values fall back
/// to the configuration files and then to the built-in defaults.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ResolveOptions {
    /// The script being configured; its directory is where the root search starts
    pub context_file: PathBuf,
    pub repo_markers: Option<Vec<(String, MarkerType)>>,
    pub paths: Option<Vec<PathBuf>>,
    pub posix_paths: Option<Vec<PathBuf>>,
    pub windows_paths: Option<Vec<PathBuf>>,
    pub load_strategy: Option<LoadStrategy>,
    /// Source literals; unknown names are skipped with a warning, or
    /// rejected in strict mode
    pub source_order: Option<Vec<String>>,
    /// Compute everything but leave the search path untouched
    pub dry_run: bool,
    /// Escalate tolerated misconfigurations to errors
    pub strict: bool,
    /// Temporary log verbosity for the duration of the run
    pub log_level: Option<Level>,
}

impl ResolveOptions {
    pub fn new(context_file: impl Into<PathBuf>) -> Self {
        Self {
            context_file: context_file.into(),
            ..Default::default()
        }
    }

    pub fn repo_markers<N: Into<String>>(
        mut self,
        markers: impl IntoIterator<Item = (N, MarkerType)>,
    ) -> Self {
        self.repo_markers = Some(
            markers
                .into_iter()
                .map(|(name, kind)| (name.into(), kind))
                .collect(),
        );
        self
    }

    pub fn paths<P: Into<PathBuf>>(mut self, paths: impl IntoIterator<Item = P>) -> Self {
        self.paths = Some(paths.into_iter().map(Into::into).collect());
        self
    }

    pub fn posix_paths<P: Into<PathBuf>>(mut self, paths: impl IntoIterator<Item = P>) -> Self {
        self.posix_paths = Some(paths.into_iter().map(Into::into).collect());
        self
    }

    pub fn windows_paths<P: Into<PathBuf>>(mut self, paths: impl IntoIterator<Item = P>) -> Self {
        self.windows_paths = Some(paths.into_iter().map(Into::into).collect());
        self
    }

    pub fn load_strategy(mut self, strategy: LoadStrategy) -> Self {
        self.load_strategy = Some(strategy);
        self
    }

    /// Accepts [`SourceName`] values or raw literals.
    pub fn source_order<S: ToString>(mut self, order: impl IntoIterator<Item = S>) -> Self {
        self.source_order = Some(order.into_iter().map(|s| s.to_string()).collect());
        self
    }

    pub fn dry_run(mut self, dry_run: bool) -> Self {
        self.dry_run = dry_run;
        self
    }

    pub fn strict(mut self, strict: bool) -> Self {
        self.strict = strict;
        self
    }

    pub fn log_level(mut self, level: Level) -> Self {
        self.log_level = Some(level);
        self
    }
}

/// The outcome of one resolution run.
#[derive(Debug, Clone, Serialize)]
pub struct Resolution {
    context_file: PathBuf,
    repo_root: PathBuf,
    load_strategy: LoadStrategy,
    #[serde(rename = "path_resolution_order")]
    source_order: Vec<SourceName>,
    paths: Vec<PathBuf>,
    original_search_path: Vec<String>,
    updated_search_path: Vec<String>,
    dry_run: bool,
    strict: bool,
    #[serde(skip)]
    manual: SourceConfig,
    #[serde(skip)]
    autopypath: Option<TomlConfig>,
    #[serde(skip)]
    pyproject: TomlConfig,
    #[serde(skip)]
    dotenv: DotenvConfig,
    #[serde(skip)]
    defaults: DefaultConfig,
}

impl Resolution {
    /// Resolve the search path for `options.context_file` and apply it to
    /// `search_path`.
    ///
    /// # Errors
    ///
    /// - Validation errors for malformed overrides or configuration files
    /// - [`Error::RootNotFound`] when no ancestor carries a marker
    /// - [`Error::EmptyReplace`] when the `replace` strategy yields nothing
    /// - [`Error::Strict`] for tolerated problems when `options.strict` is set
    pub fn resolve(options: &ResolveOptions, search_path: &mut SearchPath) -> Result<Self> {
        let _log_guard = LogLevelGuard::scoped(options.log_level);
        let strict = options.strict;

        if options.dry_run {
            tracing::info!("Dry run enabled; the search path will not be modified");
        }
        let original_search_path = search_path.entries().to_vec();

        let context_file = validate::context_file(&options.context_file)?;
        let context_file =
            dunce::canonicalize(&context_file).map_err(|e| Error::io(&context_file, e))?;
        let start_dir = context_file.parent().ok_or_else(|| {
            Error::invalid_value("context_file", "context file has no parent directory")
        })?;

        let manual = ManualSettings {
            repo_markers: options.repo_markers.clone(),
            paths: options.paths.clone(),
            posix_paths: options.posix_paths.clone(),
            windows_paths: options.windows_paths.clone(),
            load_strategy: options.load_strategy,
            source_order: known_sources(options.source_order.as_deref(), strict)?,
        }
        .to_config()?;
        let defaults = DefaultConfig::default();

        let RootSearch { root, autopypath } =
            locator::find_repo_root(start_dir, manual.repo_markers(), defaults.repo_markers())?;
        let pyproject = TomlConfig::pyproject(&root)?;
        let dotenv = DotenvConfig::load(&root, strict)?;

        let tool = autopypath.as_ref().map(TomlConfig::config);
        let layered = [Some(&manual), tool, Some(pyproject.config())];

        let load_strategy = layered
            .iter()
            .flatten()
            .find_map(|config| config.load_strategy())
            .unwrap_or(defaults.load_strategy());
        let source_order = layered
            .iter()
            .flatten()
            .find_map(|config| config.source_order())
            .unwrap_or(defaults.source_order())
            .to_vec();
        tracing::debug!(%load_strategy, ?source_order, "Effective load strategy and source order");

        let source_paths = |source: SourceName| match source {
            SourceName::Manual => manual.paths(),
            SourceName::Autopypath => tool.and_then(SourceConfig::paths),
            SourceName::Pyproject => pyproject.config().paths(),
            SourceName::Dotenv => dotenv.config().paths(),
        };
        let gathered = match gather(&source_order, load_strategy, source_paths) {
            Some(gathered) => gathered,
            None => {
                tracing::debug!(paths = ?defaults.paths(), "No source provided paths; using defaults");
                defaults.paths().to_vec()
            }
        };

        let known = if load_strategy == LoadStrategy::Replace {
            HashSet::new()
        } else {
            resolved_entries(&original_search_path)
        };
        let normalized = normalize(&root, gathered, known, strict)?;
        let paths = existing(normalized, strict)?;

        if paths.is_empty() {
            if load_strategy == LoadStrategy::Replace {
                tracing::error!("No valid paths to replace the search path with");
                return Err(Error::EmptyReplace);
            }
            tolerate(
                strict,
                "No valid paths to add to the search path after processing.".to_string(),
            )?;
        }

        if options.dry_run {
            tracing::debug!(?paths, "Dry run; search path left unchanged");
        } else {
            match load_strategy {
                LoadStrategy::Replace => search_path.replace(&paths),
                LoadStrategy::Prepend | LoadStrategy::PrependHighestPriority => {
                    search_path.prepend(&paths)
                }
            }
            tracing::debug!(?paths, %load_strategy, "Search path updated");
        }
        let updated_search_path = search_path.entries().to_vec();

        Ok(Self {
            context_file,
            repo_root: root,
            load_strategy,
            source_order,
            paths,
            original_search_path,
            updated_search_path,
            dry_run: options.dry_run,
            strict,
            manual,
            autopypath,
            pyproject,
            dotenv,
            defaults,
        })
    }

    /// Put the search path back the way it was before [`resolve`](Self::resolve).
    /// Does nothing after a dry run.
    pub fn restore(&self, search_path: &mut SearchPath) {
        if self.dry_run {
            tracing::debug!("Dry run; nothing to restore");
            return;
        }
        search_path.set(self.original_search_path.clone());
        tracing::debug!("Search path restored");
    }

    pub fn context_file(&self) -> &Path {
        &self.context_file
    }

    pub fn repo_root(&self) -> &Path {
        &self.repo_root
    }

    pub fn load_strategy(&self) -> LoadStrategy {
        self.load_strategy
    }

    pub fn source_order(&self) -> &[SourceName] {
        &self.source_order
    }

    /// The final paths, absolute, existing and without duplicates.
    pub fn paths(&self) -> &[PathBuf] {
        &self.paths
    }

    pub fn original_search_path(&self) -> &[String] {
        &self.original_search_path
    }

    pub fn updated_search_path(&self) -> &[String] {
        &self.updated_search_path
    }

    pub fn dry_run(&self) -> bool {
        self.dry_run
    }

    pub fn strict(&self) -> bool {
        self.strict
    }

    pub fn manual_config(&self) -> &SourceConfig {
        &self.manual
    }

    /// The tool file found during the root search, or a shared empty
    /// configuration when there was none.
    pub fn autopypath_config(&self) -> &TomlConfig {
        self.autopypath
            .as_ref()
            .unwrap_or_else(|| TomlConfig::shared_empty())
    }

    pub fn pyproject_config(&self) -> &TomlConfig {
        &self.pyproject
    }

    pub fn dotenv_config(&self) -> &DotenvConfig {
        &self.dotenv
    }

    pub fn default_config(&self) -> &DefaultConfig {
        &self.defaults
    }
}

/// Log a tolerated problem, or fail with it in strict mode.
fn tolerate(strict: bool, message: String) -> Result<()> {
    if strict {
        tracing::error!("{message}");
        return Err(Error::strict(message));
    }
    tracing::warn!("{message}");
    Ok(())
}

/// Parse source literals, dropping the ones that name no known source.
fn known_sources(literals: Option<&[String]>, strict: bool) -> Result<Option<Vec<SourceName>>> {
    let Some(literals) = literals else {
        return Ok(None);
    };
    let mut known = Vec::with_capacity(literals.len());
    for literal in literals {
        match literal.parse::<SourceName>() {
            Ok(source) => known.push(source),
            Err(_) => tolerate(strict, format!("Unknown path resolution source: {literal:?}"))?,
        }
    }
    Ok(Some(known))
}

/// Collect paths from each source in `order` according to `strategy`.
///
/// `None` when no source had any paths.
fn gather<'a>(
    order: &[SourceName],
    strategy: LoadStrategy,
    source_paths: impl Fn(SourceName) -> Option<&'a [PathBuf]>,
) -> Option<Vec<PathBuf>> {
    let mut gathered: Vec<PathBuf> = Vec::new();
    for &source in order {
        let Some(paths) = source_paths(source).filter(|paths| !paths.is_empty()) else {
            continue;
        };
        tracing::debug!(%source, ?paths, %strategy, "Gathering paths");
        match strategy {
            LoadStrategy::Prepend => gathered.extend_from_slice(paths),
            LoadStrategy::Replace => {
                gathered.extend_from_slice(paths);
                break;
            }
            LoadStrategy::PrependHighestPriority => {
                gathered = paths.to_vec();
                break;
            }
        }
    }
    (!gathered.is_empty()).then_some(gathered)
}

/// Resolved forms of the entries already in the search path.
fn resolved_entries(entries: &[String]) -> HashSet<PathBuf> {
    entries
        .iter()
        .filter_map(|entry| match path::resolve_entry(entry) {
            Ok(resolved) => Some(resolved),
            Err(error) => {
                tracing::warn!(entry = %entry, %error, "Could not resolve existing search path entry");
                None
            }
        })
        .collect()
}

/// Make every path absolute against `root` and drop repeats, keeping the
/// first occurrence. Anything already in `known` counts as a repeat.
fn normalize(
    root: &Path,
    gathered: Vec<PathBuf>,
    mut known: HashSet<PathBuf>,
    strict: bool,
) -> Result<Vec<PathBuf>> {
    let mut normalized = Vec::with_capacity(gathered.len());
    for path in gathered {
        match path::resolve_against(root, &path) {
            Ok(resolved) => {
                if known.insert(resolved.clone()) {
                    normalized.push(resolved);
                } else {
                    tracing::debug!(path = ?resolved, "Skipping duplicate path");
                }
            }
            Err(error) => tolerate(
                strict,
                format!("Could not resolve path {}: {error}", path.display()),
            )?,
        }
    }
    Ok(normalized)
}

/// Keep only paths that are existing directories.
fn existing(normalized: Vec<PathBuf>, strict: bool) -> Result<Vec<PathBuf>> {
    let mut kept = Vec::with_capacity(normalized.len());
    for path in normalized {
        if path.is_dir() {
            kept.push(path);
        } else if path.exists() {
            tolerate(strict, format!("Path is not a directory: {}", path.display()))?;
        } else {
            tolerate(strict, format!("Path does not exist: {}", path.display()))?;
        }
    }
    Ok(kept)
}
