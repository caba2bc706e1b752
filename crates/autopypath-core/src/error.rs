//! Error types for autopypath-core

use std::path::PathBuf;

/// Result type for autopypath-core operations
pub type Result<T> = std::result::Result<T, Error>;

/// Errors that can occur while resolving the search path
#[derive(Debug, thiserror::Error)]
pub enum Error {
    /// A setting had the wrong shape (e.g. a string where an array was expected)
    #[error("Invalid {field}: expected {expected}, got {found}")]
    InvalidType {
        field: String,
        expected: String,
        found: String,
    },

    /// A setting had the right shape but unacceptable content
    #[error("Invalid {field}: {message}")]
    InvalidValue { field: String, message: String },

    /// An explicitly named configuration file does not exist
    #[error("No {filename} file found at {path}")]
    FileNotFound { filename: String, path: PathBuf },

    /// The marker search reached the filesystem root without a match
    #[error("Repository root could not be found searching upward from {start}")]
    RootNotFound { start: PathBuf },

    /// A tolerated misconfiguration escalated by strict mode
    #[error("{message}")]
    Strict { message: String },

    /// The `replace` strategy produced no paths to install
    #[error("No valid paths to replace the search path with")]
    EmptyReplace,

    /// I/O attempted through the no-path sentinel
    #[error("NoPath does not support IO operations ({operation})")]
    NoPath { operation: &'static str },

    #[error("Failed to parse TOML at {path}: {source}")]
    TomlParse {
        path: PathBuf,
        #[source]
        source: toml::de::Error,
    },

    #[error("Failed to parse env file at {path}: {source}")]
    Dotenv {
        path: PathBuf,
        #[source]
        source: dotenvy::Error,
    },

    #[error("I/O error at {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
}

impl Error {
    pub fn io(path: impl Into<PathBuf>, source: std::io::Error) -> Self {
        Self::Io {
            path: path.into(),
            source,
        }
    }

    pub(crate) fn invalid_type(
        field: impl Into<String>,
        expected: impl Into<String>,
        found: impl Into<String>,
    ) -> Self {
        Self::InvalidType {
            field: field.into(),
            expected: expected.into(),
            found: found.into(),
        }
    }

    pub(crate) fn invalid_value(field: impl Into<String>, message: impl Into<String>) -> Self {
        Self::InvalidValue {
            field: field.into(),
            message: message.into(),
        }
    }

    pub(crate) fn strict(message: impl Into<String>) -> Self {
        Self::Strict {
            message: message.into(),
        }
    }

    /// True for wrong-shape validation failures
    pub fn is_type_error(&self) -> bool {
        matches!(self, Self::InvalidType { .. })
    }

    /// True for right-shape, bad-content validation failures
    pub fn is_value_error(&self) -> bool {
        matches!(self, Self::InvalidValue { .. })
    }
}
