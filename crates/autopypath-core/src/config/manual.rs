//! Settings supplied directly by the caller.

use std::path::PathBuf;

use crate::config::SourceConfig;
use crate::error::Result;
use crate::types::{LoadStrategy, MarkerType, SourceName};
use crate::validate;

/// Unvalidated caller overrides.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ManualSettings {
    pub repo_markers: Option<Vec<(String, MarkerType)>>,
    pub paths: Option<Vec<PathBuf>>,
    /// Used instead of `paths` on non-Windows hosts when set.
    pub posix_paths: Option<Vec<PathBuf>>,
    /// Used instead of `paths` on Windows when set.
    pub windows_paths: Option<Vec<PathBuf>>,
    pub load_strategy: Option<LoadStrategy>,
    pub source_order: Option<Vec<SourceName>>,
}

impl ManualSettings {
    /// The path list that applies to the host platform.
    pub fn platform_paths(&self) -> Option<&[PathBuf]> {
        let specific = if cfg!(windows) {
            self.windows_paths.as_deref()
        } else {
            self.posix_paths.as_deref()
        };
        specific.or(self.paths.as_deref())
    }

    /// Validate every field. Paths stay relative; they are anchored at the
    /// repository root later.
    pub fn to_config(&self) -> Result<SourceConfig> {
        let repo_markers = match &self.repo_markers {
            Some(entries) => validate::repo_markers(entries.iter().map(|(n, k)| (n.as_str(), *k)))?,
            None => None,
        };
        let paths = match self.platform_paths() {
            Some(paths) => validate::paths(paths)?,
            None => None,
        };
        let source_order = match &self.source_order {
            Some(order) => validate::source_order(order.iter().copied())?,
            None => None,
        };

        Ok(SourceConfig::new(
            repo_markers,
            paths,
            self.load_strategy,
            source_order,
        ))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn nothing_set_is_empty() {
        assert!(ManualSettings::default().to_config().unwrap().is_empty());
    }

    #[test]
    fn empty_collections_are_not_configured() {
        let settings = ManualSettings {
            repo_markers: Some(vec![]),
            paths: Some(vec![]),
            source_order: Some(vec![]),
            ..Default::default()
        };
        assert!(settings.to_config().unwrap().is_empty());
    }

    #[test]
    fn platform_paths_override_generic_paths() {
        let settings = ManualSettings {
            paths: Some(vec![PathBuf::from("generic")]),
            posix_paths: Some(vec![PathBuf::from("posix")]),
            windows_paths: Some(vec![PathBuf::from("windows")]),
            ..Default::default()
        };
        let expected = if cfg!(windows) { "windows" } else { "posix" };
        assert_eq!(
            settings.to_config().unwrap().paths().unwrap(),
            &[PathBuf::from(expected)]
        );
    }

    #[test]
    fn other_platform_paths_are_ignored() {
        let other = if cfg!(windows) {
            ManualSettings {
                paths: Some(vec![PathBuf::from("generic")]),
                posix_paths: Some(vec![PathBuf::from("posix")]),
                ..Default::default()
            }
        } else {
            ManualSettings {
                paths: Some(vec![PathBuf::from("generic")]),
                windows_paths: Some(vec![PathBuf::from("windows")]),
                ..Default::default()
            }
        };
        assert_eq!(other.platform_paths().unwrap(), &[PathBuf::from("generic")]);
    }

    #[test]
    fn duplicate_sources_are_rejected() {
        let settings = ManualSettings {
            source_order: Some(vec![SourceName::Manual, SourceName::Dotenv, SourceName::Manual]),
            ..Default::default()
        };
        let err = settings.to_config().unwrap_err();
        assert!(err.is_value_error());
        assert!(err.to_string().contains("manual"));
    }

    #[test]
    fn bad_marker_name_is_rejected() {
        let settings = ManualSettings {
            repo_markers: Some(vec![("a/b".to_string(), MarkerType::File)]),
            ..Default::default()
        };
        assert!(settings.to_config().unwrap_err().is_value_error());
    }
}
