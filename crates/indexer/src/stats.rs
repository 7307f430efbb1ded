use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// Statistics about a batch run
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct BatchStats {
    /// Number of files chunked successfully
    pub files: usize,

    /// Files without a registered grammar
    pub skipped: usize,

    /// Files that could not be read or parsed
    pub failed: usize,

    /// Number of chunks created
    pub chunks: usize,

    /// Total lines of code in successfully chunked files
    pub total_lines: usize,

    /// Time taken in milliseconds
    pub time_ms: u64,

    /// Files per language
    pub languages: BTreeMap<String, usize>,

    /// Errors encountered, one per failed file
    pub errors: Vec<String>,
}

impl BatchStats {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn add_file(&mut self, language: &str, lines: usize) {
        self.files += 1;
        self.total_lines += lines;
        *self.languages.entry(language.to_string()).or_insert(0) += 1;
    }

    pub fn add_chunks(&mut self, count: usize) {
        self.chunks += count;
    }

    pub fn add_skipped(&mut self) {
        self.skipped += 1;
    }

    pub fn add_error(&mut self, error: String) {
        self.failed += 1;
        self.errors.push(error);
    }

    /// Files seen in total, whatever their outcome
    pub fn total_files(&self) -> usize {
        self.files + self.skipped + self.failed
    }
}
