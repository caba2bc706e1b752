//! Built-in defaults and well-known file names.

use crate::types::{LoadStrategy, MarkerType, SourceName};

/// Name of the tool; also the last segment of the TOML section it reads.
pub const TOOL_NAME: &str = "autopypath";

/// Dedicated tool configuration file, side-loaded during the root search.
pub const TOOL_FILENAME: &str = "autopypath.toml";

/// Generic project manifest.
pub const MANIFEST_FILENAME: &str = "pyproject.toml";

/// TOML table read from both the tool file and the manifest.
pub const TOML_SECTION: &str = "tool.autopypath";

/// Environment file read from the repository root.
pub const DOTENV_FILENAME: &str = ".env";

/// The only key read from the environment file.
pub const DOTENV_KEY: &str = "PYTHONPATH";

/// Maximum length of a single file or directory name.
pub const MAX_NAME_LENGTH: usize = 64;

/// Markers identifying a repository root, tested in this order.
pub const REPO_MARKERS: &[(&str, MarkerType)] = &[
    ("pyproject.toml", MarkerType::File),
    (".git", MarkerType::Dir),
    (".hg", MarkerType::Dir),
    (".svn", MarkerType::Dir),
    (".bzr", MarkerType::Dir),
    (".cvs", MarkerType::Dir),
    ("_darcs", MarkerType::Dir),
    (".fossil", MarkerType::Dir),
];

/// Paths relative to the repository root used when no source yields any.
pub const PATHS: &[&str] = &["src", "tests"];

pub const LOAD_STRATEGY: LoadStrategy = LoadStrategy::Prepend;

pub const PATH_RESOLUTION_ORDER: &[SourceName] = &[
    SourceName::Manual,
    SourceName::Autopypath,
    SourceName::Pyproject,
    SourceName::Dotenv,
];
