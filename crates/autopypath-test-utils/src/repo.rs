//! [`TestRepo`] builder for autopypath test scenarios.

use std::fs;
use std::path::{Path, PathBuf};
use tempfile::TempDir;

use crate::markers;

/// A temporary project directory with helpers for laying out markers,
/// configuration files and source directories.
///
/// The root is canonicalized on creation, so paths built from it compare
/// equal to what the resolver reports.
///
/// # Example
///
/// ```rust,no_run
/// use autopypath_test_utils::TestRepo;
///
/// let repo = TestRepo::new();
/// repo.init_git();
/// repo.mkdir("src");
/// repo.write_pyproject(r#"paths = ["src"]"#);
/// let script = repo.script("scripts/run.py");
/// ```
pub struct TestRepo {
    _temp_dir: TempDir,
    root: PathBuf,
}

impl Default for TestRepo {
    fn default() -> Self {
        Self::new()
    }
}

impl TestRepo {
    /// Create an empty temporary directory.
    pub fn new() -> Self {
        let temp_dir = TempDir::new().unwrap();
        let root = dunce::canonicalize(temp_dir.path()).unwrap();
        Self {
            _temp_dir: temp_dir,
            root,
        }
    }

    pub fn root(&self) -> &Path {
        &self.root
    }

    /// Absolute path of `rel` inside the repository.
    pub fn path(&self, rel: &str) -> PathBuf {
        self.root.join(rel)
    }

    /// Mark the root with a fake `.git` directory.
    pub fn init_git(&self) {
        markers::fake_git_dir(&self.root);
    }

    /// Create `rel` and any missing parents.
    pub fn mkdir(&self, rel: &str) -> PathBuf {
        let dir = self.path(rel);
        fs::create_dir_all(&dir)
            .unwrap_or_else(|e| panic!("TestRepo::mkdir: failed to create {}: {e}", dir.display()));
        dir
    }

    /// Write `content` to `rel`, creating parent directories.
    pub fn write_file(&self, rel: &str, content: &str) -> PathBuf {
        let file = self.path(rel);
        if let Some(parent) = file.parent() {
            fs::create_dir_all(parent).unwrap();
        }
        fs::write(&file, content)
            .unwrap_or_else(|e| panic!("TestRepo::write_file: failed to write {}: {e}", file.display()));
        file
    }

    /// Create an empty script to use as a context file.
    pub fn script(&self, rel: &str) -> PathBuf {
        self.write_file(rel, "")
    }

    /// Write `autopypath.toml` at the root with `body` under `[tool.autopypath]`.
    pub fn write_autopypath_toml(&self, body: &str) -> PathBuf {
        self.write_tool_section("autopypath.toml", body)
    }

    /// Write `pyproject.toml` at the root with `body` under `[tool.autopypath]`.
    pub fn write_pyproject(&self, body: &str) -> PathBuf {
        self.write_tool_section("pyproject.toml", body)
    }

    /// Write `rel` with `body` under `[tool.autopypath]`.
    pub fn write_tool_section(&self, rel: &str, body: &str) -> PathBuf {
        self.write_file(rel, &format!("[tool.autopypath]\n{body}\n"))
    }

    /// Write a `.env` file at the root containing `PYTHONPATH=<value>`.
    pub fn write_dotenv(&self, value: &str) -> PathBuf {
        self.write_file(".env", &format!("PYTHONPATH={value}\n"))
    }

    /// Assert that `rel` exists.
    ///
    /// # Panics
    /// Panics with a descriptive message if the path does not exist.
    pub fn assert_exists(&self, rel: &str) {
        let full_path = self.path(rel);
        assert!(
            full_path.exists(),
            "Expected path to exist: {}",
            full_path.display()
        );
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn layout_helpers_create_files() {
        let repo = TestRepo::new();
        repo.init_git();
        repo.mkdir("src/pkg");
        repo.write_pyproject("paths = [\"src\"]");
        repo.write_dotenv("src");
        let script = repo.script("scripts/run.py");

        repo.assert_exists(".git/HEAD");
        repo.assert_exists("src/pkg");
        assert!(script.is_file());
        let manifest = fs::read_to_string(repo.path("pyproject.toml")).unwrap();
        assert!(manifest.starts_with("[tool.autopypath]\n"));
        assert_eq!(
            fs::read_to_string(repo.path(".env")).unwrap(),
            "PYTHONPATH=src\n"
        );
    }
}
