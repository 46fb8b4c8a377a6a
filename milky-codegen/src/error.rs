//! Error types for code generation.

use std::path::PathBuf;
use thiserror::Error;

/// Error type for code generation operations.
#[derive(Debug, Error)]
pub enum CodegenError {
    /// Document loading error.
    #[error("document parse error: {0}")]
    Parse(#[from] milky_schema::ParseError),

    /// Reference resolution or validation error.
    #[error("schema error: {0}")]
    Schema(#[from] milky_schema::SchemaError),

    /// IO error.
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// A rendered artifact could not be moved into place.
    #[error("failed to write '{}': {source}", path.display())]
    Persist {
        /// Target path.
        path: PathBuf,
        /// Underlying error.
        #[source]
        source: std::io::Error,
    },
}

impl CodegenError {
    /// Creates a persist error for the given target.
    pub fn persist(path: impl Into<PathBuf>, source: std::io::Error) -> Self {
        Self::Persist {
            path: path.into(),
            source,
        }
    }
}
