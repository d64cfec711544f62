//! Error types for preference persistence.

use std::path::PathBuf;
use thiserror::Error;

/// Errors reading or writing persisted preferences.
#[derive(Debug, Error)]
pub enum PreferencesError {
    /// The preference file could not be read or written.
    #[error("Preference storage error at {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// The preference file is not valid JSON for the schema.
    #[error("Invalid preference data: {0}")]
    Serde(#[from] serde_json::Error),
}
