//! Configuration sources
//!
//! Every source produces the same [`SourceConfig`] record:
//!
//! - manual: caller overrides ([`ManualSettings`])
//! - autopypath: the `[tool.autopypath]` table of `autopypath.toml` ([`TomlConfig`])
//! - pyproject: the same table in `pyproject.toml` ([`TomlConfig`])
//! - dotenv: `PYTHONPATH` in `.env` ([`DotenvConfig`])
//!
//! [`DefaultConfig`] supplies the built-in fallback for each setting.

mod dotenv;
mod manual;
mod source;
mod toml_file;

pub use dotenv::{DotenvConfig, NATIVE_SEPARATOR, detect_separator};
pub use manual::ManualSettings;
pub use source::{DefaultConfig, SourceConfig};
pub use toml_file::TomlConfig;
