//! Error types for loading stats payloads.
//!
//! Normalisation and comparison are infallible; only reading and parsing a
//! payload can fail.

use std::path::PathBuf;

#[derive(Debug, thiserror::Error)]
pub enum LoadError {
    #[error("failed to read {}: {source}", .path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("invalid JSON: {0}")]
    Json(#[from] serde_json::Error),

    #[error("expected a JSON object at the top level, found {found}")]
    NotAnObject { found: &'static str },
}
