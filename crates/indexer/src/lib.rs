//! # Semchunk Indexer
//!
//! Batch orchestration for the code chunker: many files in, chunk lists out.
//!
//! ## Pipeline
//!
//! ```text
//! Paths (or a directory)
//!     │
//!     ├──> File Scanner (.gitignore aware, supported extensions only)
//!     │      └─> Source files
//!     │
//!     ├──> Bounded workers (tokio, one blocking task per file)
//!     │      └─> read → parse → extract → assemble
//!     │
//!     └──> Batch output
//!            ├─> per-file chunk lists, in input order
//!            └─> stats (files, skipped, failed, chunks, languages)
//! ```
//!
//! A file that fails never fails the batch: it yields an empty entry and an
//! error string in [`BatchStats::errors`].
//!
//! ## Example
//!
//! ```no_run
//! use semchunk_indexer::{BatchConfig, BatchProcessor};
//!
//! #[tokio::main]
//! async fn main() -> Result<(), Box<dyn std::error::Error>> {
//!     let processor = BatchProcessor::new(BatchConfig::default())?;
//!     let output = processor.process_directory("/path/to/project").await?;
//!
//!     println!(
//!         "Chunked {} files into {} chunks",
//!         output.stats.files, output.stats.chunks
//!     );
//!     Ok(())
//! }
//! ```

mod batch;
mod error;
mod limits;
mod scanner;
mod stats;

pub use batch::{BatchConfig, BatchOutput, BatchProcessor, FileChunks};
pub use error::{IndexerError, Result};
pub use limits::{resolve_concurrency, ConcurrencySnapshot, CONCURRENCY_ENV, MAX_CONCURRENCY};
pub use scanner::{FileScanner, ScanOptions, MAX_FILE_SIZE_BYTES};
pub use stats::BatchStats;
