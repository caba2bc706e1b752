//! Paths read from the `PYTHONPATH` key of a `.env` file.

use std::cmp::Ordering;
use std::path::{Path, PathBuf};
use std::sync::LazyLock;

use regex::Regex;

use crate::config::SourceConfig;
use crate::defaults;
use crate::error::{Error, Result};
use crate::path::resolve_against;
use crate::validate;

/// Path-list separator of the host platform.
pub const NATIVE_SEPARATOR: char = if cfg!(windows) { ';' } else { ':' };

static DRIVE_PATTERN: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"\b[A-Za-z]:\\").expect("drive pattern is valid"));

/// Configuration from the repository's `.env` file.
///
/// Only `paths` is ever populated; the file has no way to express markers,
/// a load strategy or a source order.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DotenvConfig {
    dotenv_file: PathBuf,
    config: SourceConfig,
}

impl DotenvConfig {
    /// Read `root/.env`.
    ///
    /// A missing file gives an empty configuration. A path that exists but
    /// is not a regular file is a warning, or an [`Error::Strict`] when
    /// `strict` is set.
    pub fn load(root: &Path, strict: bool) -> Result<Self> {
        let root = validate::root_dir(root)?;
        let dotenv_file = root.join(defaults::DOTENV_FILENAME);

        if !dotenv_file.exists() {
            tracing::debug!(path = ?dotenv_file, "No .env file found");
            return Ok(Self::without_paths(dotenv_file));
        }
        if !dotenv_file.is_file() {
            let message = format!(".env path is not a file: {}", dotenv_file.display());
            if strict {
                tracing::error!("{message}");
                return Err(Error::strict(message));
            }
            tracing::warn!("{message}");
            return Ok(Self::without_paths(dotenv_file));
        }

        let Some(value) = read_pythonpath(&dotenv_file, strict)? else {
            tracing::debug!(path = ?dotenv_file, "PYTHONPATH not set in .env file");
            return Ok(Self::without_paths(dotenv_file));
        };
        tracing::debug!(path = ?dotenv_file, %value, "Read PYTHONPATH from .env file");

        let paths = split_pythonpath(&value, &root)?;
        Ok(Self {
            dotenv_file,
            config: SourceConfig::new(None, paths, None, None),
        })
    }

    fn without_paths(dotenv_file: PathBuf) -> Self {
        Self {
            dotenv_file,
            config: SourceConfig::empty(),
        }
    }

    /// Where the `.env` file was looked for.
    pub fn dotenv_file(&self) -> &Path {
        &self.dotenv_file
    }

    pub fn config(&self) -> &SourceConfig {
        &self.config
    }
}

/// The last `PYTHONPATH` assignment in the file, if any.
///
/// Lines that cannot be parsed are skipped with a warning, or fail with
/// [`Error::Strict`] when `strict` is set. Read errors always fail.
fn read_pythonpath(path: &Path, strict: bool) -> Result<Option<String>> {
    let dotenv_error = |source| Error::Dotenv {
        path: path.to_path_buf(),
        source,
    };

    let mut value = None;
    for item in dotenvy::from_path_iter(path).map_err(dotenv_error)? {
        let (key, val) = match item {
            Ok(pair) => pair,
            Err(err @ dotenvy::Error::LineParse(..)) => {
                let message = format!("Skipping unparsable line in {}: {err}", path.display());
                if strict {
                    tracing::error!("{message}");
                    return Err(Error::strict(message));
                }
                tracing::warn!(path = ?path, error = %err, "Skipping unparsable line in .env file");
                continue;
            }
            Err(err) => return Err(dotenv_error(err)),
        };
        if key == defaults::DOTENV_KEY {
            value = Some(val);
        }
    }
    Ok(value)
}

fn split_pythonpath(value: &str, root: &Path) -> Result<Option<Vec<PathBuf>>> {
    let value = value.trim();
    if value.is_empty() {
        return Ok(None);
    }

    let separator = detect_separator(value);
    if let Some(separator) = separator.filter(|s| *s != NATIVE_SEPARATOR) {
        tracing::info!(
            %separator,
            native = %NATIVE_SEPARATOR,
            "Detected a non-native path separator in .env PYTHONPATH"
        );
    }

    let segments: Vec<&str> = match separator {
        Some(separator) => value.split(separator).map(str::trim).collect(),
        None => vec![value],
    };

    let mut paths = Vec::new();
    for segment in segments.into_iter().filter(|s| !s.is_empty()) {
        if is_absolute_segment(segment) {
            tracing::warn!(
                segment,
                "Absolute paths are not supported in .env PYTHONPATH; skipping"
            );
            continue;
        }
        let relative = validate::path_or_str(Path::new(segment))?;
        let resolved =
            resolve_against(root, &relative).map_err(|e| Error::io(root.join(&relative), e))?;
        paths.push(resolved);
    }
    tracing::debug!(?paths, "Resolved PYTHONPATH entries from .env");

    Ok((!paths.is_empty()).then_some(paths))
}

/// Absolute on any platform: rooted, or starting with a drive letter.
fn is_absolute_segment(segment: &str) -> bool {
    let bytes = segment.as_bytes();
    Path::new(segment).is_absolute()
        || segment.starts_with(['/', '\\'])
        || (bytes.len() >= 2 && bytes[0].is_ascii_alphabetic() && bytes[1] == b':')
}

/// Guess which path-list separator a `PYTHONPATH` value uses.
///
/// Returns `None` when the value shows no evidence of either, meaning the
/// whole value is a single entry.
pub fn detect_separator(value: &str) -> Option<char> {
    let drives = DRIVE_PATTERN.find_iter(value).count();
    let colons = value.matches(':').count().saturating_sub(drives);
    let semicolons = value.matches(';').count();
    let backslashes = value.matches('\\').count().saturating_sub(drives);

    let mut windows = drives * 10 + backslashes;
    let mut posix = value.matches(":/").count() * 5;
    if value.starts_with('/') {
        posix += 5;
    }
    if colons > 0 {
        posix += 1;
    }
    if semicolons > 0 {
        windows += 1;
    }

    match posix.cmp(&windows) {
        Ordering::Greater => Some(':'),
        Ordering::Less => Some(';'),
        Ordering::Equal if posix == 0 => None,
        Ordering::Equal if colons > semicolons => Some(':'),
        Ordering::Equal => Some(';'),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;
    use rstest::rstest;
    use std::fs;

    fn root() -> (tempfile::TempDir, PathBuf) {
        let dir = tempfile::tempdir().unwrap();
        let root = dunce::canonicalize(dir.path()).unwrap();
        (dir, root)
    }

    #[rstest]
    #[case("src:lib:tests", Some(':'))]
    #[case("src;lib;tests", Some(';'))]
    #[case("/opt/a:/opt/b", Some(':'))]
    #[case(r"C:\a;D:\b", Some(';'))]
    #[case(r"C:\only", Some(';'))]
    #[case(r"src\pkg;lib", Some(';'))]
    #[case("src", None)]
    #[case("a:b;c", Some(';'))]
    #[case("a:b:c;d", Some(':'))]
    fn separator_detection(#[case] value: &str, #[case] expected: Option<char>) {
        assert_eq!(detect_separator(value), expected);
    }

    #[test]
    fn missing_file_is_empty() {
        let (_dir, root) = root();
        let config = DotenvConfig::load(&root, true).unwrap();
        assert!(config.config().is_empty());
        assert_eq!(config.dotenv_file(), root.join(".env"));
    }

    #[test]
    fn directory_named_env_warns_or_fails() {
        let (_dir, root) = root();
        fs::create_dir(root.join(".env")).unwrap();

        assert!(DotenvConfig::load(&root, false).unwrap().config().is_empty());
        let err = DotenvConfig::load(&root, true).unwrap_err();
        assert!(matches!(err, Error::Strict { .. }));
        assert!(err.to_string().contains(".env path is not a file"));
    }

    #[test]
    fn keeps_paths_that_do_not_exist() {
        let (_dir, root) = root();
        fs::create_dir(root.join("src")).unwrap();
        fs::create_dir(root.join("lib")).unwrap();
        fs::write(root.join(".env"), "PYTHONPATH=src:lib:tests\n").unwrap();

        let config = DotenvConfig::load(&root, false).unwrap();
        assert_eq!(
            config.config().paths().unwrap(),
            &[root.join("src"), root.join("lib"), root.join("tests")]
        );
        assert!(config.config().repo_markers().is_none());
        assert!(config.config().load_strategy().is_none());
        assert!(config.config().source_order().is_none());
    }

    #[test]
    fn windows_separator_is_understood_everywhere() {
        let (_dir, root) = root();
        fs::write(root.join(".env"), "PYTHONPATH=\"src;tests\"\n").unwrap();
        let config = DotenvConfig::load(&root, false).unwrap();
        assert_eq!(
            config.config().paths().unwrap(),
            &[root.join("src"), root.join("tests")]
        );
    }

    #[test]
    fn absolute_entries_are_dropped() {
        let (_dir, root) = root();
        fs::write(root.join(".env"), "PYTHONPATH=/usr/lib:src\n").unwrap();
        let config = DotenvConfig::load(&root, false).unwrap();
        assert_eq!(config.config().paths().unwrap(), &[root.join("src")]);
    }

    #[rstest]
    #[case("OTHER=1\n")]
    #[case("PYTHONPATH=\n")]
    #[case("PYTHONPATH=\"   \"\n")]
    fn no_usable_value_is_none(#[case] body: &str) {
        let (_dir, root) = root();
        fs::write(root.join(".env"), body).unwrap();
        let config = DotenvConfig::load(&root, false).unwrap();
        assert!(config.config().paths().is_none());
    }

    #[test]
    fn last_assignment_wins() {
        let (_dir, root) = root();
        fs::write(root.join(".env"), "PYTHONPATH=first\nPYTHONPATH=second\n").unwrap();
        let config = DotenvConfig::load(&root, false).unwrap();
        assert_eq!(config.config().paths().unwrap(), &[root.join("second")]);
    }

    #[test]
    fn unparsable_line_is_skipped() {
        let (_dir, root) = root();
        fs::write(root.join(".env"), "this is not valid\nPYTHONPATH=src\n").unwrap();

        let config = DotenvConfig::load(&root, false).unwrap();
        assert_eq!(config.config().paths().unwrap(), &[root.join("src")]);

        let err = DotenvConfig::load(&root, true).unwrap_err();
        assert!(matches!(err, Error::Strict { .. }), "{err}");
    }
}
