//! Error types for scaffold-config

use std::path::PathBuf;

/// Result type for scaffold-config operations
pub type Result<T> = std::result::Result<T, Error>;

/// Errors that can occur loading or resolving a template configuration
#[derive(Debug, thiserror::Error)]
pub enum Error {
    #[error(transparent)]
    Fs(#[from] scaffold_fs::Error),

    #[error(transparent)]
    Inject(#[from] scaffold_inject::Error),

    #[error("Failed to parse {format} config at {path}: {message}")]
    ConfigParse {
        path: PathBuf,
        format: String,
        message: String,
    },

    #[error("Unsupported config format: {extension}")]
    UnsupportedFormat { extension: String },

    #[error("Invalid replace_filter '{pattern}': {message}")]
    InvalidReplaceFilter { pattern: String, message: String },
}
