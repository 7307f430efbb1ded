use thiserror::Error;

pub type Result<T> = std::result::Result<T, IndexerError>;

#[derive(Error, Debug)]
pub enum IndexerError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Chunker error: {0}")]
    Chunker(#[from] semchunk_code_chunker::ChunkerError),

    #[error("Invalid path: {0}")]
    InvalidPath(String),

    #[error("File too large: {path} ({size} bytes, limit {limit})")]
    FileTooLarge { path: String, size: u64, limit: u64 },

    #[error("{0}")]
    Other(String),
}

impl IndexerError {
    /// Errors that mean "not for us" rather than "broken"
    #[must_use]
    pub fn is_skip(&self) -> bool {
        matches!(self, Self::Chunker(err) if err.is_unsupported())
    }
}
