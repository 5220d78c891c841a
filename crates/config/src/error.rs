//! Error types for configuration and preference storage.

use std::path::PathBuf;

/// Errors that can occur while loading or saving preferences.
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("Failed to access preference file {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("Malformed preference file: {0}")]
    Json(#[from] serde_json::Error),
}
