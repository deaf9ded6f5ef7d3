//! Application-wide error types.
//!
//! Library modules use specific error types via `thiserror`
//! ([`ToolError`], [`crate::config::ConfigError`]), while the CLI and `main`
//! use `anyhow` for convenient error propagation.
//!
//! Most failures in a conversion run are deliberately *not* errors: a tool
//! that exits non-zero during extraction just means "field not found", and
//! the run carries on with the next file. The variants here cover the few
//! paths that can actually stop a command.

use std::path::PathBuf;

use crate::tools::ToolError;

/// Application-wide result type.
pub type Result<T> = std::result::Result<T, Error>;

/// Top-level application error.
#[derive(Debug, thiserror::Error)]
pub enum Error {
    /// External tool could not be started or reported failure
    #[error("Tool error: {0}")]
    Tool(#[from] ToolError),

    /// File not found
    #[error("File not found: {}", .0.display())]
    NotFound(PathBuf),

    /// Placement preference outside {artist, title}
    #[error("Invalid placement '{0}': expected 'artist' or 'title'")]
    InvalidPlacement(String),

    /// Generic error with context
    #[error("{context}: {source}")]
    WithContext {
        context: String,
        #[source]
        source: Box<Error>,
    },
}

impl Error {
    /// Create a not found error.
    pub fn not_found(path: impl Into<PathBuf>) -> Self {
        Self::NotFound(path.into())
    }

    /// Create an invalid placement error.
    pub fn invalid_placement(value: impl Into<String>) -> Self {
        Self::InvalidPlacement(value.into())
    }

    /// Add context to an error.
    pub fn context(self, ctx: impl Into<String>) -> Self {
        Self::WithContext {
            context: ctx.into(),
            source: Box::new(self),
        }
    }
}
