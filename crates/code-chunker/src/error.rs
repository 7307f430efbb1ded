use thiserror::Error;

/// Result type for chunker operations
pub type Result<T> = std::result::Result<T, ChunkerError>;

/// Errors that can occur while chunking a single file
#[derive(Error, Debug)]
pub enum ChunkerError {
    /// No grammar is registered for the file's extension
    #[error("Unsupported language: {0}")]
    UnsupportedLanguage(String),

    /// The grammar rejected the source text
    #[error("Parse error at {line}:{column}: {message}")]
    Parse {
        message: String,
        line: usize,
        column: usize,
    },

    /// Invalid configuration
    #[error("Invalid configuration: {0}")]
    InvalidConfig(String),

    /// Tree-sitter refused a grammar (ABI mismatch)
    #[error("Tree-sitter error: {0}")]
    TreeSitter(String),

    /// IO error occurred
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

impl ChunkerError {
    /// Create a parse error positioned at a 1-indexed line/column
    pub fn parse(msg: impl Into<String>, line: usize, column: usize) -> Self {
        Self::Parse {
            message: msg.into(),
            line,
            column,
        }
    }

    /// Create an unsupported language error
    pub fn unsupported_language(lang: impl Into<String>) -> Self {
        Self::UnsupportedLanguage(lang.into())
    }

    /// Create an invalid config error
    pub fn invalid_config(msg: impl Into<String>) -> Self {
        Self::InvalidConfig(msg.into())
    }

    /// Create a tree-sitter error
    pub fn tree_sitter(msg: impl Into<String>) -> Self {
        Self::TreeSitter(msg.into())
    }

    /// Unsupported files are skipped, not reported
    #[must_use]
    pub const fn is_unsupported(&self) -> bool {
        matches!(self, Self::UnsupportedLanguage(_))
    }
}
