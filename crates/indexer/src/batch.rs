use crate::error::{IndexerError, Result};
use crate::limits::{resolve_concurrency, ConcurrencySnapshot, FileLimiter};
use crate::scanner::{FileScanner, ScanOptions, MAX_FILE_SIZE_BYTES};
use crate::stats::BatchStats;
use semchunk_code_chunker::{ChunkRecord, Chunker, ChunkerConfig, Language, LanguagePolicy};
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use std::time::Instant;

/// Batch configuration, loadable from TOML
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct BatchConfig {
    /// Per-file chunking behavior
    pub chunker: ChunkerConfig,

    /// Files chunked at once (`None` = env / CPU count)
    pub concurrency: Option<usize>,

    /// Files larger than this are reported as failures
    pub max_file_bytes: u64,
}

impl Default for BatchConfig {
    fn default() -> Self {
        Self {
            chunker: ChunkerConfig::for_embeddings(),
            concurrency: None,
            max_file_bytes: MAX_FILE_SIZE_BYTES,
        }
    }
}

impl BatchConfig {
    pub fn validate(&self) -> Result<()> {
        self.chunker.validate()?;
        if self.concurrency == Some(0) {
            return Err(IndexerError::Other(
                "concurrency must be at least 1".to_string(),
            ));
        }
        if self.max_file_bytes == 0 {
            return Err(IndexerError::Other(
                "max_file_bytes must be positive".to_string(),
            ));
        }
        Ok(())
    }
}

/// Chunks produced for one input path
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct FileChunks {
    pub file_path: String,
    /// `None` when no grammar is registered for the file
    pub language: Option<Language>,
    pub chunks: Vec<ChunkRecord>,
}

impl FileChunks {
    fn empty(file_path: String, language: Option<Language>) -> Self {
        Self {
            file_path,
            language,
            chunks: Vec::new(),
        }
    }
}

/// Result of a batch: one entry per input path, in input order
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct BatchOutput {
    pub files: Vec<FileChunks>,
    pub stats: BatchStats,
}

impl BatchOutput {
    pub fn chunks(&self) -> impl Iterator<Item = &ChunkRecord> {
        self.files.iter().flat_map(|file| file.chunks.iter())
    }
}

struct Processed {
    entry: FileChunks,
    lines: usize,
}

struct Failure {
    language: Option<Language>,
    error: IndexerError,
}

/// Runs the per-file pipeline over many files concurrently
#[derive(Clone)]
pub struct BatchProcessor {
    chunker: Chunker,
    max_file_bytes: u64,
    limiter: FileLimiter,
}

impl BatchProcessor {
    pub fn new(config: BatchConfig) -> Result<Self> {
        config.validate()?;
        let chunker = Chunker::new(config.chunker)?;
        let limit = resolve_concurrency(config.concurrency);
        log::debug!("Batch processor concurrency limit: {limit}");

        Ok(Self {
            chunker,
            max_file_bytes: config.max_file_bytes,
            limiter: FileLimiter::new(limit),
        })
    }

    #[must_use]
    pub const fn chunker(&self) -> &Chunker {
        &self.chunker
    }

    #[must_use]
    pub fn concurrency(&self) -> ConcurrencySnapshot {
        self.limiter.snapshot()
    }

    /// Chunk a single file, surfacing its error
    pub async fn process_file(&self, path: impl AsRef<Path>) -> Result<FileChunks> {
        self.run_file(path.as_ref().to_path_buf())
            .await
            .map(|processed| processed.entry)
            .map_err(|failure| failure.error)
    }

    /// Chunk every path; per-file failures become empty entries and land in the stats
    pub async fn process_batch(&self, paths: &[PathBuf]) -> BatchOutput {
        let start = Instant::now();
        let mut stats = BatchStats::new();
        let mut files = Vec::with_capacity(paths.len());

        let tasks: Vec<_> = paths
            .iter()
            .cloned()
            .map(|path| {
                let this = self.clone();
                tokio::spawn(async move { this.run_file(path).await })
            })
            .collect();

        for (path, task) in paths.iter().zip(tasks) {
            let file_path = display_path(path);
            match task.await {
                Ok(Ok(processed)) => {
                    let language = processed
                        .entry
                        .language
                        .map_or("unknown", Language::as_str);
                    stats.add_file(language, processed.lines);
                    stats.add_chunks(processed.entry.chunks.len());
                    files.push(processed.entry);
                }
                Ok(Err(failure)) if failure.error.is_skip() => {
                    log::debug!("Skipping unsupported file={file_path}");
                    stats.add_skipped();
                    files.push(FileChunks::empty(file_path, failure.language));
                }
                Ok(Err(failure)) => {
                    let language = failure.language.map_or("unknown", Language::as_str);
                    log::warn!(
                        "Failed to chunk file={file_path} language={language} error={}",
                        failure.error
                    );
                    stats.add_error(format!("{file_path}: {}", failure.error));
                    files.push(FileChunks::empty(file_path, failure.language));
                }
                Err(e) => {
                    log::warn!("Chunking task panicked for file={file_path}: {e}");
                    stats.add_error(format!("{file_path}: task panicked: {e}"));
                    files.push(FileChunks::empty(file_path, None));
                }
            }
        }

        #[allow(clippy::cast_possible_truncation)]
        {
            stats.time_ms = start.elapsed().as_millis() as u64;
        }
        log::info!(
            "Batch completed: {} files, {} chunks, {} skipped, {} failed in {}ms",
            stats.files,
            stats.chunks,
            stats.skipped,
            stats.failed,
            stats.time_ms
        );

        BatchOutput { files, stats }
    }

    /// Scan a directory for supported files and chunk them
    pub async fn process_directory(&self, root: impl AsRef<Path>) -> Result<BatchOutput> {
        let root = root.as_ref();
        if !root.is_dir() {
            return Err(IndexerError::InvalidPath(format!(
                "Not a directory: {}",
                root.display()
            )));
        }

        let scanner = FileScanner::new(root)
            .with_registry(self.chunker.registry().clone())
            .with_options(ScanOptions {
                max_file_bytes: self.max_file_bytes,
                ..Default::default()
            });
        let files = tokio::task::spawn_blocking(move || scanner.scan())
            .await
            .map_err(|e| IndexerError::Other(format!("Directory scan panicked: {e}")))?;

        Ok(self.process_batch(&files).await)
    }

    async fn run_file(&self, path: PathBuf) -> std::result::Result<Processed, Failure> {
        let _permit = self.limiter.acquire().await;
        let file_path = display_path(&path);

        let policy = self.chunker.resolve(&path).map_err(|e| Failure {
            language: None,
            error: e.into(),
        })?;
        let fail = |error: IndexerError| Failure {
            language: Some(policy.language),
            error,
        };

        let content = self.read_source(&path, &file_path).await.map_err(fail)?;
        let lines = content.lines().count();

        let chunks = self
            .chunk_blocking(content, file_path.clone(), policy)
            .await
            .map_err(fail)?;
        log::debug!("Chunked file={file_path} chunks={}", chunks.len());

        Ok(Processed {
            entry: FileChunks {
                file_path,
                language: Some(policy.language),
                chunks,
            },
            lines,
        })
    }

    async fn read_source(&self, path: &Path, file_path: &str) -> Result<String> {
        let size = tokio::fs::metadata(path).await?.len();
        if size > self.max_file_bytes {
            return Err(IndexerError::FileTooLarge {
                path: file_path.to_string(),
                size,
                limit: self.max_file_bytes,
            });
        }
        Ok(tokio::fs::read_to_string(path).await?)
    }

    async fn chunk_blocking(
        &self,
        content: String,
        file_path: String,
        policy: LanguagePolicy,
    ) -> Result<Vec<ChunkRecord>> {
        let chunker = self.chunker.clone();
        let chunks = tokio::task::spawn_blocking(move || {
            chunker.chunk_with_policy(&content, &file_path, policy)
        })
        .await
        .map_err(|e| IndexerError::Other(format!("Chunking task panicked: {e}")))??;
        Ok(chunks)
    }
}

fn display_path(path: &Path) -> String {
    path.to_string_lossy().into_owned()
}
