//! Repository root discovery
//!
//! Walks upward from a starting directory until one of the repository
//! markers matches. The dedicated tool file is side-loaded the first time it
//! is seen on the way up, and its markers join the search when the caller
//! did not pin the markers explicitly.

use std::borrow::Cow;
use std::path::{Path, PathBuf};

use crate::config::TomlConfig;
use crate::defaults;
use crate::error::{Error, Result};
use crate::types::{MarkerType, RepoMarkers};

/// Outcome of a successful root search.
#[derive(Debug, Clone)]
pub struct RootSearch {
    /// The first ancestor (or the start directory itself) with a matching marker
    pub root: PathBuf,
    /// The tool file loaded during the walk, if one was found
    pub autopypath: Option<TomlConfig>,
}

/// Find the repository root above `start_dir`.
///
/// `manual` markers, when given, are used as-is and never extended by the
/// tool file. Otherwise the search starts from `defaults`, and markers from
/// a side-loaded tool file are placed ahead of them.
pub fn find_repo_root(
    start_dir: &Path,
    manual: Option<&RepoMarkers>,
    defaults: &RepoMarkers,
) -> Result<RootSearch> {
    let mut markers: Cow<'_, RepoMarkers> = match manual {
        Some(markers) => Cow::Borrowed(markers),
        None => Cow::Borrowed(defaults),
    };
    let mut autopypath: Option<TomlConfig> = None;
    let mut current = start_dir;

    loop {
        tracing::debug!(dir = ?current, "Checking for repository markers");

        if autopypath.is_none() {
            if let Some(loaded) = side_load(current)? {
                if manual.is_none() {
                    if let Some(tool_markers) = loaded.config().repo_markers() {
                        tracing::debug!(markers = %tool_markers, "Using markers from tool file");
                        markers = Cow::Owned(tool_markers.merged_over(defaults));
                    }
                }
                autopypath = Some(loaded);
            }
        }

        if let Some((name, kind)) = matching_marker(current, &markers) {
            tracing::debug!(root = ?current, marker = name, %kind, "Found repository root");
            return Ok(RootSearch {
                root: current.to_path_buf(),
                autopypath,
            });
        }

        match current.parent() {
            Some(parent) => current = parent,
            None => {
                tracing::error!(start = ?start_dir, "Repository root not found");
                return Err(Error::RootNotFound {
                    start: start_dir.to_path_buf(),
                });
            }
        }
    }
}

/// Load the tool file in `dir` if a regular one exists there.
fn side_load(dir: &Path) -> Result<Option<TomlConfig>> {
    let candidate = dir.join(defaults::TOOL_FILENAME);
    if !candidate.exists() {
        return Ok(None);
    }
    if !candidate.is_file() {
        tracing::warn!(path = ?candidate, "Ignoring tool file that is not a regular file");
        return Ok(None);
    }
    tracing::debug!(path = ?candidate, "Loading tool file found during root search");
    TomlConfig::autopypath(dir).map(Some)
}

fn matching_marker<'m>(dir: &Path, markers: &'m RepoMarkers) -> Option<(&'m str, MarkerType)> {
    markers.iter().find(|(name, kind)| {
        let candidate = dir.join(name);
        match kind {
            MarkerType::File => candidate.is_file(),
            MarkerType::Dir => candidate.is_dir(),
        }
    })
}
