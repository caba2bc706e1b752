//! Settings read from a `[tool.autopypath]` table.
//!
//! The dedicated `autopypath.toml` and the `pyproject.toml` manifest share
//! one parser; they differ only in the file name and in how a missing file
//! is treated.

use std::path::{Path, PathBuf};
use std::sync::LazyLock;

use crate::config::SourceConfig;
use crate::defaults;
use crate::error::{Error, Result};
use crate::no_path::{MaybePath, NoPath};
use crate::path::resolve_against;
use crate::types::{LoadStrategy, MarkerType, RepoMarkers, SourceName};
use crate::validate::{self, toml_type_name};

const KNOWN_KEYS: &[&str] = &["repo_markers", "paths", "load_strategy", "path_resolution_order"];

static EMPTY: LazyLock<TomlConfig> = LazyLock::new(TomlConfig::empty);

/// Configuration loaded from a TOML file section.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TomlConfig {
    toml_file: MaybePath,
    toml_section: String,
    config: SourceConfig,
}

impl TomlConfig {
    /// A configuration with no backing file. Its [`toml_file`](Self::toml_file)
    /// is [`NoPath`], so any attempt to read through it fails.
    pub fn empty() -> Self {
        Self {
            toml_file: NoPath.into(),
            toml_section: defaults::TOML_SECTION.to_string(),
            config: SourceConfig::empty(),
        }
    }

    /// Shared instance of [`TomlConfig::empty`].
    pub fn shared_empty() -> &'static TomlConfig {
        &EMPTY
    }

    /// Load `section` from `root/filename`.
    ///
    /// Fails with [`Error::FileNotFound`] when the file does not exist. A
    /// missing or empty section yields an empty configuration.
    pub fn load(root: &Path, filename: &str, section: &str) -> Result<Self> {
        let section = validate::toml_section(section)?;
        let root = validate::root_dir(root)?;
        validate::filename(filename)?;

        let file = root.join(filename);
        if !file.is_file() {
            tracing::debug!(?file, "No {filename} file found");
            return Err(Error::FileNotFound {
                filename: filename.to_string(),
                path: file,
            });
        }

        let toml_file = MaybePath::from(file);
        let content = toml_file.read_to_string()?;
        let file = toml_file.path()?;
        let document: toml::Table = content.parse().map_err(|source| Error::TomlParse {
            path: file.to_path_buf(),
            source,
        })?;

        let config = match find_section(&document, section, filename)? {
            Some(table) if !table.is_empty() => {
                tracing::debug!(?file, section, "Loading configuration section");
                parse_section(table, &root, filename)?
            }
            _ => {
                tracing::debug!(?file, section, "No configuration section found");
                SourceConfig::empty()
            }
        };

        Ok(Self {
            toml_section: section.to_string(),
            toml_file,
            config,
        })
    }

    /// Load the dedicated tool file from `root`.
    pub fn autopypath(root: &Path) -> Result<Self> {
        Self::load(root, defaults::TOOL_FILENAME, defaults::TOML_SECTION)
    }

    /// Load the manifest from `root`. A missing manifest is not an error.
    pub fn pyproject(root: &Path) -> Result<Self> {
        match Self::load(root, defaults::MANIFEST_FILENAME, defaults::TOML_SECTION) {
            Err(Error::FileNotFound { path, .. }) => {
                tracing::debug!(?path, "No manifest found; pyproject source is empty");
                Ok(Self::empty())
            }
            other => other,
        }
    }

    /// The file this configuration was read from, or [`NoPath`].
    pub fn toml_file(&self) -> &MaybePath {
        &self.toml_file
    }

    pub fn toml_section(&self) -> &str {
        &self.toml_section
    }

    pub fn config(&self) -> &SourceConfig {
        &self.config
    }
}

/// Walk the dotted `section` path. `None` when any part is missing.
fn find_section<'a>(
    document: &'a toml::Table,
    section: &str,
    filename: &str,
) -> Result<Option<&'a toml::Table>> {
    let mut current = document;
    for key in section.split('.') {
        match current.get(key) {
            None => return Ok(None),
            Some(toml::Value::Table(table)) => current = table,
            Some(other) => {
                return Err(Error::invalid_type(
                    format!("[{section}] section in {filename}"),
                    "table",
                    toml_type_name(other),
                ));
            }
        }
    }
    Ok(Some(current))
}

fn parse_section(table: &toml::Table, root: &Path, filename: &str) -> Result<SourceConfig> {
    for key in table.keys() {
        if !KNOWN_KEYS.contains(&key.as_str()) {
            tracing::warn!(key = %key, file = filename, "Ignoring unknown configuration key");
        }
    }

    let repo_markers = match table.get("repo_markers") {
        Some(value) => parse_repo_markers(value, filename)?,
        None => None,
    };
    let paths = match table.get("paths") {
        Some(value) => parse_paths(value, root, filename)?,
        None => None,
    };
    let load_strategy = match table.get("load_strategy") {
        Some(value) => Some(parse_load_strategy(value, filename)?),
        None => None,
    };
    let source_order = match table.get("path_resolution_order") {
        Some(value) => parse_source_order(value, filename)?,
        None => None,
    };

    Ok(SourceConfig::new(repo_markers, paths, load_strategy, source_order))
}

fn parse_repo_markers(value: &toml::Value, filename: &str) -> Result<Option<RepoMarkers>> {
    let field = format!("repo_markers in {filename}");
    let toml::Value::Table(table) = value else {
        return Err(Error::invalid_type(field, "table", toml_type_name(value)));
    };

    let mut entries = Vec::with_capacity(table.len());
    for (name, kind) in table {
        let toml::Value::String(kind) = kind else {
            return Err(Error::invalid_type(
                format!("{field} (marker {name:?})"),
                "string",
                toml_type_name(kind),
            ));
        };
        entries.push((name.as_str(), kind.parse::<MarkerType>()?));
    }
    validate::repo_markers(entries)
}

fn parse_paths(value: &toml::Value, root: &Path, filename: &str) -> Result<Option<Vec<PathBuf>>> {
    let field = format!("paths in {filename}");
    let items = string_array(value, &field)?;
    let Some(requested) = validate::paths(items)? else {
        return Ok(None);
    };

    let mut existing = Vec::with_capacity(requested.len());
    for path in requested {
        let target = resolve_against(root, &path).map_err(|e| Error::io(root.join(&path), e))?;
        if target.is_dir() {
            existing.push(target);
        } else if target.exists() {
            tracing::warn!(path = ?target, file = filename, "Configured path is not a directory; skipping");
        } else {
            tracing::warn!(path = ?target, file = filename, "Configured path does not exist; skipping");
        }
    }
    Ok((!existing.is_empty()).then_some(existing))
}

fn parse_load_strategy(value: &toml::Value, filename: &str) -> Result<LoadStrategy> {
    match value {
        toml::Value::String(literal) => validate::load_strategy(literal),
        other => Err(Error::invalid_type(
            format!("load_strategy in {filename}"),
            "string",
            toml_type_name(other),
        )),
    }
}

fn parse_source_order(value: &toml::Value, filename: &str) -> Result<Option<Vec<SourceName>>> {
    let field = format!("path_resolution_order in {filename}");
    let items = string_array(value, &field)?;
    validate::source_order_literals(items)
}

fn string_array<'a>(value: &'a toml::Value, field: &str) -> Result<Vec<&'a str>> {
    let toml::Value::Array(items) = value else {
        return Err(Error::invalid_type(field, "array of strings", toml_type_name(value)));
    };
    items
        .iter()
        .map(|item| match item {
            toml::Value::String(s) => Ok(s.as_str()),
            other => Err(Error::invalid_type(
                field,
                "array of strings",
                format!("array containing {}", toml_type_name(other)),
            )),
        })
        .collect()
}
