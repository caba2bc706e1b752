//! The record every configuration source produces.

use std::fmt;
use std::path::PathBuf;

use serde::Serialize;

use crate::defaults;
use crate::types::{LoadStrategy, RepoMarkers, SourceName};

/// Settings attributed to one configuration source.
///
/// Each field is `None` when the source does not define it. Equality and
/// hashing depend only on the four fields, so configurations from different
/// sources compare equal when they say the same thing.
#[derive(Debug, Clone, Default, PartialEq, Eq, Hash, Serialize)]
pub struct SourceConfig {
    repo_markers: Option<RepoMarkers>,
    paths: Option<Vec<PathBuf>>,
    load_strategy: Option<LoadStrategy>,
    #[serde(rename = "path_resolution_order")]
    source_order: Option<Vec<SourceName>>,
}

impl SourceConfig {
    /// A configuration that defines nothing.
    pub fn empty() -> Self {
        Self::default()
    }

    /// Assemble from already-validated parts.
    pub(crate) fn new(
        repo_markers: Option<RepoMarkers>,
        paths: Option<Vec<PathBuf>>,
        load_strategy: Option<LoadStrategy>,
        source_order: Option<Vec<SourceName>>,
    ) -> Self {
        Self {
            repo_markers,
            paths,
            load_strategy,
            source_order,
        }
    }

    pub fn repo_markers(&self) -> Option<&RepoMarkers> {
        self.repo_markers.as_ref()
    }

    pub fn paths(&self) -> Option<&[PathBuf]> {
        self.paths.as_deref()
    }

    pub fn load_strategy(&self) -> Option<LoadStrategy> {
        self.load_strategy
    }

    pub fn source_order(&self) -> Option<&[SourceName]> {
        self.source_order.as_deref()
    }

    pub fn is_empty(&self) -> bool {
        self.repo_markers.is_none()
            && self.paths.is_none()
            && self.load_strategy.is_none()
            && self.source_order.is_none()
    }
}

impl fmt::Display for SourceConfig {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        fn or_none<T: fmt::Display>(value: Option<T>) -> String {
            value.map_or_else(|| "None".to_string(), |v| v.to_string())
        }

        let paths = self.paths.as_ref().map(|paths| {
            let joined = paths
                .iter()
                .map(|p| format!("{:?}", p.display().to_string()))
                .collect::<Vec<_>>()
                .join(", ");
            format!("[{joined}]")
        });
        let order = self.source_order.as_ref().map(|order| {
            let joined = order
                .iter()
                .map(SourceName::as_str)
                .collect::<Vec<_>>()
                .join(", ");
            format!("[{joined}]")
        });

        writeln!(f, "  repo_markers={}", or_none(self.repo_markers.as_ref()))?;
        writeln!(f, "  paths={}", or_none(paths))?;
        writeln!(f, "  load_strategy={}", or_none(self.load_strategy))?;
        write!(f, "  path_resolution_order={}", or_none(order))
    }
}

/// Built-in fallback values. Unlike the other sources every field is set.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DefaultConfig {
    repo_markers: RepoMarkers,
    paths: Vec<PathBuf>,
    load_strategy: LoadStrategy,
    source_order: Vec<SourceName>,
}

impl Default for DefaultConfig {
    fn default() -> Self {
        Self {
            repo_markers: RepoMarkers::from_validated(
                defaults::REPO_MARKERS
                    .iter()
                    .map(|(name, kind)| (name.to_string(), *kind)),
            ),
            paths: defaults::PATHS.iter().map(PathBuf::from).collect(),
            load_strategy: defaults::LOAD_STRATEGY,
            source_order: defaults::PATH_RESOLUTION_ORDER.to_vec(),
        }
    }
}

impl DefaultConfig {
    pub fn repo_markers(&self) -> &RepoMarkers {
        &self.repo_markers
    }

    pub fn paths(&self) -> &[PathBuf] {
        &self.paths
    }

    pub fn load_strategy(&self) -> LoadStrategy {
        self.load_strategy
    }

    pub fn source_order(&self) -> &[SourceName] {
        &self.source_order
    }

    /// The same values as an ordinary source record.
    pub fn to_source_config(&self) -> SourceConfig {
        SourceConfig::new(
            Some(self.repo_markers.clone()),
            Some(self.paths.clone()),
            Some(self.load_strategy),
            Some(self.source_order.clone()),
        )
    }
}
