//! autopypath core library
//!
//! Finds a Python project's repository root from a script's location and
//! works out which directories to put at the front of its module search
//! path. Settings come from four sources, consulted in a configurable
//! order:
//!
//! - manual overrides passed by the caller
//! - `[tool.autopypath]` in `autopypath.toml`
//! - `[tool.autopypath]` in `pyproject.toml`
//! - `PYTHONPATH` in `.env`
//!
//! Built-in defaults fill in whatever no source defines.
//!
//! # Example
//!
//! ```no_run
//! use autopypath_core::{LoadStrategy, Resolution, ResolveOptions, SearchPath};
//!
//! let mut search_path = SearchPath::from_env("PYTHONPATH");
//! let options = ResolveOptions::new("scripts/run.py")
//!     .paths(["src", "lib"])
//!     .load_strategy(LoadStrategy::Prepend);
//! let resolution = Resolution::resolve(&options, &mut search_path)?;
//! println!("root: {}", resolution.repo_root().display());
//! # Ok::<(), autopypath_core::Error>(())
//! ```

pub mod config;
pub mod defaults;
pub mod error;
pub mod locator;
pub mod logging;
pub mod no_path;
pub mod path;
pub mod resolver;
pub mod search_path;
pub mod types;
pub mod validate;

pub use config::{DefaultConfig, DotenvConfig, ManualSettings, SourceConfig, TomlConfig};
pub use error::{Error, Result};
pub use locator::{RootSearch, find_repo_root};
pub use logging::LogLevelGuard;
pub use no_path::{MaybePath, NoPath};
pub use resolver::{Resolution, ResolveOptions};
pub use search_path::SearchPath;
pub use types::{LoadStrategy, MarkerType, RepoMarkers, SourceName};
