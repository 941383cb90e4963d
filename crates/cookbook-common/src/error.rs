//! Error types for the cookbook.
//!
//! The query core never fails; these errors only describe the edges where
//! documents and configuration are read from disk.

use std::path::PathBuf;
use thiserror::Error;

/// Top-level error type for cookbook operations.
#[derive(Debug, Error)]
pub enum CookbookError {
    /// Data file not found
    #[error("Data file not found: {0}")]
    NotFound(PathBuf),

    /// IO errors
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// Malformed JSON document
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    /// Malformed configuration file
    #[error("Config error: {0}")]
    Config(#[from] toml::de::Error),
}

/// Result type alias for cookbook operations.
pub type CookbookResult<T> = Result<T, CookbookError>;
