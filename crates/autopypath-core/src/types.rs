//! Vocabulary shared by every configuration source.
//!
//! Each enum has exactly one string resolver ([`FromStr`]) so literals coming
//! from TOML files or the command line are normalized at the boundary and the
//! rest of the crate works purely on the typed variants.

use std::fmt;
use std::hash::{Hash, Hasher};
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::error::Error;

/// Whether a repository marker must be a regular file or a directory.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum MarkerType {
    /// A same-named regular file must exist
    File,
    /// A same-named directory must exist
    Dir,
}

impl MarkerType {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::File => "file",
            Self::Dir => "dir",
        }
    }
}

impl FromStr for MarkerType {
    type Err = Error;

    fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
        match s {
            "file" => Ok(Self::File),
            "dir" => Ok(Self::Dir),
            _ => Err(Error::invalid_value(
                "repo_markers",
                format!("{s:?} is not a valid marker type (expected \"file\" or \"dir\")"),
            )),
        }
    }
}

impl fmt::Display for MarkerType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// How paths gathered from several sources are combined and spliced into
/// the search path.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum LoadStrategy {
    /// Concatenate every source's paths in order and insert them at the front
    #[default]
    Prepend,
    /// Use only the first source (in order) that yields paths, inserted at the front
    PrependHighestPriority,
    /// Concatenate like `Prepend`, then overwrite the whole search path
    Replace,
}

impl LoadStrategy {
    pub const ALL: [LoadStrategy; 3] = [
        LoadStrategy::Prepend,
        LoadStrategy::PrependHighestPriority,
        LoadStrategy::Replace,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Prepend => "prepend",
            Self::PrependHighestPriority => "prepend_highest_priority",
            Self::Replace => "replace",
        }
    }
}

impl FromStr for LoadStrategy {
    type Err = Error;

    fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
        Self::ALL
            .into_iter()
            .find(|strategy| strategy.as_str() == s)
            .ok_or_else(|| {
                Error::invalid_value(
                    "load_strategy",
                    format!("{s:?} is not a valid load strategy (expected one of {})", literals(&Self::ALL)),
                )
            })
    }
}

impl fmt::Display for LoadStrategy {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// A configuration source that can contribute paths.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SourceName {
    /// Values passed directly by the caller
    Manual,
    /// The dedicated `autopypath.toml` file
    Autopypath,
    /// The `[tool.autopypath]` table of `pyproject.toml`
    Pyproject,
    /// The `PYTHONPATH` key of the `.env` file
    Dotenv,
}

impl SourceName {
    pub const ALL: [SourceName; 4] = [
        SourceName::Manual,
        SourceName::Autopypath,
        SourceName::Pyproject,
        SourceName::Dotenv,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Manual => "manual",
            Self::Autopypath => "autopypath",
            Self::Pyproject => "pyproject",
            Self::Dotenv => "dotenv",
        }
    }
}

impl FromStr for SourceName {
    type Err = Error;

    fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
        Self::ALL
            .into_iter()
            .find(|source| source.as_str() == s)
            .ok_or_else(|| {
                Error::invalid_value(
                    "path_resolution_order",
                    format!("{s:?} is not a valid source (expected one of {})", literals(&Self::ALL)),
                )
            })
    }
}

impl fmt::Display for SourceName {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

fn literals<T: fmt::Display>(values: &[T]) -> String {
    values
        .iter()
        .map(|v| format!("\"{v}\""))
        .collect::<Vec<_>>()
        .join(", ")
}

/// An ordered set of repository root markers.
///
/// Iteration order is insertion order; it decides which marker is tested
/// first inside a directory. Equality and hashing ignore order, so two maps
/// with the same entries compare equal regardless of where they came from.
#[derive(Debug, Clone, Default, Serialize)]
#[serde(transparent)]
pub struct RepoMarkers {
    entries: Vec<(String, MarkerType)>,
}

impl RepoMarkers {
    /// Build from already-validated entries. A repeated name keeps its first
    /// position and takes the last value.
    pub(crate) fn from_validated(entries: impl IntoIterator<Item = (String, MarkerType)>) -> Self {
        let mut markers = Self::default();
        for (name, kind) in entries {
            markers.insert(name, kind);
        }
        markers
    }

    fn insert(&mut self, name: String, kind: MarkerType) {
        match self.entries.iter_mut().find(|(existing, _)| *existing == name) {
            Some(entry) => entry.1 = kind,
            None => self.entries.push((name, kind)),
        }
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, MarkerType)> {
        self.entries.iter().map(|(name, kind)| (name.as_str(), *kind))
    }

    pub fn get(&self, name: &str) -> Option<MarkerType> {
        self.iter().find(|(n, _)| *n == name).map(|(_, kind)| kind)
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Entries of `self` first, followed by entries of `base` that `self`
    /// does not redefine.
    pub fn merged_over(&self, base: &RepoMarkers) -> RepoMarkers {
        let mut merged = self.clone();
        for (name, kind) in base.iter() {
            if merged.get(name).is_none() {
                merged.entries.push((name.to_string(), kind));
            }
        }
        merged
    }

    fn sorted(&self) -> Vec<(&str, MarkerType)> {
        let mut entries: Vec<_> = self.iter().collect();
        entries.sort();
        entries
    }
}

impl PartialEq for RepoMarkers {
    fn eq(&self, other: &Self) -> bool {
        self.sorted() == other.sorted()
    }
}

impl Eq for RepoMarkers {}

impl Hash for RepoMarkers {
    fn hash<H: Hasher>(&self, state: &mut H) {
        self.sorted().hash(state);
    }
}

impl fmt::Display for RepoMarkers {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let body = self
            .iter()
            .map(|(name, kind)| format!("{name:?} = \"{kind}\""))
            .collect::<Vec<_>>()
            .join(", ");
        write!(f, "{{ {body} }}")
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;

    #[rstest]
    #[case("prepend", LoadStrategy::Prepend)]
    #[case("prepend_highest_priority", LoadStrategy::PrependHighestPriority)]
    #[case("replace", LoadStrategy::Replace)]
    fn load_strategy_literals_round_trip(#[case] literal: &str, #[case] expected: LoadStrategy) {
        let parsed: LoadStrategy = literal.parse().unwrap();
        assert_eq!(parsed, expected);
        assert_eq!(parsed.to_string(), literal);
    }

    #[test]
    fn legacy_strategy_names_are_rejected() {
        for legacy in ["merge", "override", "PREPEND"] {
            let err = legacy.parse::<LoadStrategy>().unwrap_err();
            assert!(err.is_value_error(), "{legacy} should be a value error");
        }
    }

    #[test]
    fn source_names_parse() {
        assert_eq!("dotenv".parse::<SourceName>().unwrap(), SourceName::Dotenv);
        assert_eq!("autopypath".parse::<SourceName>().unwrap(), SourceName::Autopypath);
        assert!("env".parse::<SourceName>().is_err());
    }

    #[test]
    fn marker_type_parse() {
        assert_eq!("file".parse::<MarkerType>().unwrap(), MarkerType::File);
        assert_eq!("dir".parse::<MarkerType>().unwrap(), MarkerType::Dir);
        assert!("directory".parse::<MarkerType>().is_err());
    }

    #[test]
    fn strategy_serializes_as_literal() {
        let json = serde_json::to_string(&LoadStrategy::PrependHighestPriority).unwrap();
        assert_eq!(json, "\"prepend_highest_priority\"");
    }

    #[test]
    fn repo_markers_equality_ignores_order() {
        let a = RepoMarkers::from_validated([
            (".git".to_string(), MarkerType::Dir),
            ("setup.py".to_string(), MarkerType::File),
        ]);
        let b = RepoMarkers::from_validated([
            ("setup.py".to_string(), MarkerType::File),
            (".git".to_string(), MarkerType::Dir),
        ]);
        assert_eq!(a, b);
        assert_eq!(a.iter().next(), Some((".git", MarkerType::Dir)));
        assert_eq!(b.iter().next(), Some(("setup.py", MarkerType::File)));
    }

    #[test]
    fn repeated_marker_name_keeps_position_and_last_value() {
        let markers = RepoMarkers::from_validated([
            ("a".to_string(), MarkerType::File),
            ("b".to_string(), MarkerType::File),
            ("a".to_string(), MarkerType::Dir),
        ]);
        assert_eq!(markers.len(), 2);
        assert_eq!(markers.iter().next(), Some(("a", MarkerType::Dir)));
    }

    #[test]
    fn merged_over_puts_own_entries_first() {
        let own = RepoMarkers::from_validated([("root.txt".to_string(), MarkerType::File)]);
        let base = RepoMarkers::from_validated([
            (".git".to_string(), MarkerType::Dir),
            ("root.txt".to_string(), MarkerType::Dir),
        ]);
        let merged = own.merged_over(&base);
        let entries: Vec<_> = merged.iter().collect();
        assert_eq!(
            entries,
            vec![("root.txt", MarkerType::File), (".git", MarkerType::Dir)]
        );
    }
}
