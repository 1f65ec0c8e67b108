//! Error types for scaffold-inject

/// Result type for scaffold-inject operations
pub type Result<T> = std::result::Result<T, Error>;

/// Errors that can occur while applying a chunk.
///
/// None of these abort a batch; the runner records them as failed outcomes.
#[derive(Debug, thiserror::Error)]
pub enum Error {
    /// Filesystem error from scaffold-fs
    #[error(transparent)]
    Fs(#[from] scaffold_fs::Error),

    /// Source content could not be read, fetched or produced
    #[error("{message}")]
    SourceFetch { origin: String, message: String },

    /// A command source wrote to standard error
    #[error("{stderr}")]
    SourceCommand { command: String, stderr: String },

    /// An inline script source exited unsuccessfully
    #[error("Script failed: {message}")]
    SourceScript { message: String },

    /// The chunk carries an empty delimiter
    #[error("Chunk {chunk_id} has an empty pattern")]
    EmptyPattern { chunk_id: String },

    #[error("Invalid pattern: {0}")]
    Pattern(#[from] regex::Error),

    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),
}

impl Error {
    pub fn fetch(origin: impl Into<String>, message: impl Into<String>) -> Self {
        Self::SourceFetch {
            origin: origin.into(),
            message: message.into(),
        }
    }
}
