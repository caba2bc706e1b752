//! The module search list being configured.
//!
//! This is an explicit handle rather than process-wide state: the resolver
//! reads and mutates the `SearchPath` it is given and nothing else. Callers
//! that want to affect a real interpreter seed it from `PYTHONPATH` and write
//! [`SearchPath::to_env_value`] back out.

use std::ffi::OsString;
use std::path::PathBuf;

use crate::error::{Error, Result};

/// An ordered list of search path entries.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct SearchPath {
    entries: Vec<String>,
}

impl SearchPath {
    pub fn new<S: Into<String>>(entries: impl IntoIterator<Item = S>) -> Self {
        Self {
            entries: entries.into_iter().map(Into::into).collect(),
        }
    }

    /// Seed from an environment variable holding a platform path list.
    ///
    /// An unset or empty variable yields an empty search path.
    pub fn from_env(var: &str) -> Self {
        let entries = std::env::var_os(var)
            .map(|value| {
                std::env::split_paths(&value)
                    .filter(|path| !path.as_os_str().is_empty())
                    .map(|path| path.to_string_lossy().into_owned())
                    .collect()
            })
            .unwrap_or_default();
        Self { entries }
    }

    pub fn entries(&self) -> &[String] {
        &self.entries
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Insert `paths` at the front, in order, leaving the rest untouched.
    pub fn prepend(&mut self, paths: &[PathBuf]) {
        let front = paths.iter().map(|path| path.to_string_lossy().into_owned());
        self.entries.splice(0..0, front);
    }

    /// Overwrite the whole list with `paths`.
    pub fn replace(&mut self, paths: &[PathBuf]) {
        self.entries = paths
            .iter()
            .map(|path| path.to_string_lossy().into_owned())
            .collect();
    }

    pub fn set(&mut self, entries: Vec<String>) {
        self.entries = entries;
    }

    /// Join the entries with the platform path-list separator.
    pub fn to_env_value(&self) -> Result<OsString> {
        std::env::join_paths(&self.entries)
            .map_err(|e| Error::invalid_value("search path", e.to_string()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn prepend_keeps_order_and_tail() {
        let mut search_path = SearchPath::new(["/usr/lib/python3", "/site"]);
        search_path.prepend(&[PathBuf::from("/repo/src"), PathBuf::from("/repo/tests")]);
        assert_eq!(
            search_path.entries(),
            &["/repo/src", "/repo/tests", "/usr/lib/python3", "/site"]
        );
    }

    #[test]
    fn replace_overwrites() {
        let mut search_path = SearchPath::new(["/usr/lib/python3"]);
        search_path.replace(&[PathBuf::from("/repo/src")]);
        assert_eq!(search_path.entries(), &["/repo/src"]);
    }

    #[test]
    fn env_value_round_trips_through_split_paths() {
        let search_path = SearchPath::new(["/a", "/b"]);
        let value = search_path.to_env_value().unwrap();
        let split: Vec<PathBuf> = std::env::split_paths(&value).collect();
        assert_eq!(split, vec![PathBuf::from("/a"), PathBuf::from("/b")]);
    }

    #[test]
    fn unset_env_is_empty() {
        let search_path = SearchPath::from_env("AUTOPYPATH_TEST_VARIABLE_THAT_IS_NEVER_SET");
        assert!(search_path.is_empty());
    }
}
