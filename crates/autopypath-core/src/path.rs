//! Path normalization helpers
//!
//! Paths are made absolute against an explicit base (the repository root),
//! never against the current working directory of the process.

use std::io;
use std::path::{Component, Path, PathBuf};

/// Collapse `.` and `..` components without touching the filesystem.
///
/// `..` never climbs above a root or drive prefix.
pub fn normalize_lexically(path: &Path) -> PathBuf {
    let mut normalized = PathBuf::new();
    for component in path.components() {
        match component {
            Component::CurDir => {}
            Component::ParentDir => match normalized.components().next_back() {
                Some(Component::Normal(_)) => {
                    normalized.pop();
                }
                Some(Component::RootDir | Component::Prefix(_)) => {}
                _ => normalized.push(".."),
            },
            other => normalized.push(other.as_os_str()),
        }
    }
    normalized
}

/// Absolute form of `path`, with relative paths anchored at `base`.
///
/// Existing paths are canonicalized (symlinks resolved, no UNC prefix on
/// Windows); paths that do not exist are normalized lexically instead.
pub fn resolve_against(base: &Path, path: &Path) -> io::Result<PathBuf> {
    let joined = if path.is_absolute() {
        path.to_path_buf()
    } else {
        base.join(path)
    };
    match dunce::canonicalize(&joined) {
        Ok(resolved) => Ok(resolved),
        Err(e) if matches!(e.kind(), io::ErrorKind::NotFound | io::ErrorKind::NotADirectory) => {
            Ok(normalize_lexically(&joined))
        }
        Err(e) => Err(e),
    }
}

/// Resolve an entry already present in the search path.
///
/// Relative entries there are relative to the working directory, as the
/// interpreter itself treats them.
pub fn resolve_entry(entry: &str) -> io::Result<PathBuf> {
    let absolute = std::path::absolute(entry)?;
    resolve_against(Path::new(""), &absolute)
}
