//! A path-like value that stands for "no file was found".
//!
//! [`MaybePath`] is what the TOML sources record as their file location.
//! When no file was located the value is [`NoPath`], and every filesystem
//! operation on it fails with [`Error::NoPath`] instead of quietly probing
//! some default location.

use std::fmt;
use std::path::{Path, PathBuf};

use serde::Serialize;

use crate::error::{Error, Result};

/// The absence of a path. All instances are equal to each other.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct NoPath;

impl NoPath {
    pub fn label(&self) -> &'static str {
        "<NoPath>"
    }
}

impl fmt::Display for NoPath {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

/// Either a real path or [`NoPath`].
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum MaybePath {
    Path(PathBuf),
    NoPath(NoPath),
}

impl MaybePath {
    pub fn is_no_path(&self) -> bool {
        matches!(self, Self::NoPath(_))
    }

    /// Borrow the underlying path.
    pub fn path(&self) -> Result<&Path> {
        self.require("path")
    }

    pub fn exists(&self) -> Result<bool> {
        self.require("exists").map(Path::exists)
    }

    pub fn is_file(&self) -> Result<bool> {
        self.require("is_file").map(Path::is_file)
    }

    pub fn is_dir(&self) -> Result<bool> {
        self.require("is_dir").map(Path::is_dir)
    }

    pub fn join(&self, segment: impl AsRef<Path>) -> Result<PathBuf> {
        self.require("join").map(|path| path.join(segment))
    }

    pub fn read_to_string(&self) -> Result<String> {
        let path = self.require("read_to_string")?;
        std::fs::read_to_string(path).map_err(|e| Error::io(path, e))
    }

    fn require(&self, operation: &'static str) -> Result<&Path> {
        match self {
            Self::Path(path) => Ok(path),
            Self::NoPath(_) => Err(Error::NoPath { operation }),
        }
    }
}

impl From<PathBuf> for MaybePath {
    fn from(path: PathBuf) -> Self {
        Self::Path(path)
    }
}

impl From<NoPath> for MaybePath {
    fn from(no_path: NoPath) -> Self {
        Self::NoPath(no_path)
    }
}

impl fmt::Display for MaybePath {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Path(path) => write!(f, "{}", path.display()),
            Self::NoPath(no_path) => write!(f, "{no_path}"),
        }
    }
}

impl Serialize for MaybePath {
    fn serialize<S: serde::Serializer>(&self, serializer: S) -> std::result::Result<S::Ok, S::Error> {
        match self {
            Self::Path(path) => path.serialize(serializer),
            Self::NoPath(_) => serializer.serialize_none(),
        }
    }
}
