//! Error types for theme resolution and persistence.

use std::io;
use std::path::PathBuf;

/// Errors surfaced by the theme API.
///
/// Storage failures never reach this type through the store: they are logged
/// and degraded to defaults. It only carries caller contract violations and
/// configuration problems.
#[derive(Debug, thiserror::Error)]
pub enum ThemeError {
    /// A value that is not `light`, `dark` or `system` was given as a preference.
    #[error("Invalid theme preference '{0}'. Expected light, dark or system.")]
    InvalidPreference(String),

    /// Configuration file could not be read.
    #[error("Failed to read config {path}: {source}")]
    ConfigIo {
        path: PathBuf,
        #[source]
        source: io::Error,
    },

    /// Configuration could not be parsed.
    #[error("Invalid theme config: {0}")]
    ConfigParse(#[from] serde_yaml::Error),
}

impl ThemeError {
    /// Create an invalid preference error.
    pub fn invalid_preference(raw: impl Into<String>) -> Self {
        Self::InvalidPreference(raw.into())
    }
}

/// Errors from a storage backend.
#[derive(Debug, thiserror::Error)]
pub enum StorageError {
    /// The backend refused access (disabled storage, permissions).
    #[error("Storage access denied: {0}")]
    Denied(String),

    /// The backend is full.
    #[error("Storage quota exceeded")]
    QuotaExceeded,

    /// I/O failure in a file-backed store.
    #[error("Storage I/O failed for {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: io::Error,
    },

    /// The backing file exists but is not a valid key-value document.
    #[error("Storage file {path} is corrupt: {source}")]
    Corrupt {
        path: PathBuf,
        #[source]
        source: serde_json::Error,
    },
}

impl StorageError {
    pub fn denied(msg: impl Into<String>) -> Self {
        Self::Denied(msg.into())
    }
}
