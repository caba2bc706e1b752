//! Root marker fixtures.
//!
//! None of these produce a working repository. They only create the
//! directory entries the root search looks for.

use std::fs;
use std::path::Path;

/// Creates a bare `.git` directory with a `HEAD` file.
///
/// # Panics
/// Panics if the filesystem operations fail.
pub fn fake_git_dir(path: &Path) {
    fs::create_dir(path.join(".git"))
        .unwrap_or_else(|e| panic!("fake_git_dir: failed to create .git: {e}"));
    fs::write(path.join(".git/HEAD"), "ref: refs/heads/main\n")
        .unwrap_or_else(|e| panic!("fake_git_dir: failed to write HEAD: {e}"));
}

/// Creates an empty `.hg` directory.
///
/// # Panics
/// Panics if the directory cannot be created.
pub fn fake_hg_dir(path: &Path) {
    fs::create_dir(path.join(".hg"))
        .unwrap_or_else(|e| panic!("fake_hg_dir: failed to create .hg: {e}"));
}

/// A marker file name nothing on a real system is expected to carry.
///
/// Tests that need the root search to fail pass this as their only marker
/// so the walk cannot succeed on some ancestor of the temporary directory.
pub const UNLIKELY_MARKER: &str = "autopypath-test-marker-6d0b9a2e";
