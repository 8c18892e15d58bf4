//! Flag store error types.

use std::path::PathBuf;

use thiserror::Error;

/// Flag store errors.
#[derive(Debug, Error)]
pub enum FlagError {
    /// A stored value does not have the expected shape.
    #[error("flag '{key}' has an unexpected shape: {source}")]
    Decode {
        /// Flag key.
        key: String,
        /// Underlying JSON error.
        #[source]
        source: serde_json::Error,
    },

    /// A value could not be turned into JSON.
    #[error("flag '{key}' could not be encoded: {source}")]
    Encode {
        /// Flag key.
        key: String,
        /// Underlying JSON error.
        #[source]
        source: serde_json::Error,
    },

    /// The store file could not be read or written.
    #[error("flag store file {path}: {source}")]
    Io {
        /// Store file path.
        path: PathBuf,
        /// Underlying I/O error.
        #[source]
        source: std::io::Error,
    },

    /// The store file is not valid JSON.
    #[error("flag store file {path} is corrupt: {source}")]
    Corrupt {
        /// Store file path.
        path: PathBuf,
        /// Underlying JSON error.
        #[source]
        source: serde_json::Error,
    },
}

impl FlagError {
    /// Create an I/O error for a store file.
    #[must_use]
    pub fn io(path: impl Into<PathBuf>, source: std::io::Error) -> Self {
        Self::Io {
            path: path.into(),
            source,
        }
    }
}
