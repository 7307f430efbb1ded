//! # Semchunk Code Chunker
//!
//! Splits source files into non-overlapping, semantically meaningful chunks
//! (functions, classes, interfaces, top-level declarations, imports) with
//! structural metadata, ready for embedding and retrieval.
//!
//! ## Architecture
//!
//! ```text
//! file path
//!     │
//!     ├──> Grammar Registry (extension → language policy, cached parsers)
//!     │
//!     ├──> Parser Adapter (tree-sitter → immutable syntax tree)
//!     │
//!     ├──> Extraction (pre-order walk, prune below chunk roots)
//!     │    ├─> name/type per node-kind rule
//!     │    ├─> optional details hook (params, async, docs)
//!     │    └─> file-level import records (JS/TS)
//!     │
//!     └──> Assembler (dedupe, order, stable ids, broadcast imports)
//! ```
//!
//! ## Example
//!
//! ```rust
//! use semchunk_code_chunker::{ChunkType, Chunker, ChunkerConfig};
//!
//! let chunker = Chunker::new(ChunkerConfig::default()).unwrap();
//! let chunks = chunker
//!     .chunk_str("interface Point { x: number; y: number }\n", "geometry.ts")
//!     .unwrap();
//!
//! assert_eq!(chunks.len(), 1);
//! assert_eq!(chunks[0].metadata.chunk_type, ChunkType::Interface);
//! assert_eq!(chunks[0].metadata.name, "Point");
//! ```

mod assemble;
mod chunker;
mod config;
mod details;
mod error;
mod extract;
mod imports;
mod language;
mod parser;
mod registry;
mod types;

pub use assemble::assemble;
pub use chunker::Chunker;
pub use config::ChunkerConfig;
pub use details::{hook_for, DetailsHook};
pub use error::{ChunkerError, Result};
pub use extract::{Extraction, Extractor, ANONYMOUS};
pub use imports::extract_imports;
pub use language::{ChunkableKind, Grammar, Language, LanguagePolicy, NameRule};
pub use parser::{ParserAdapter, SyntaxTree};
pub use registry::{GrammarRegistry, PooledParser};
pub use types::{
    ChunkDetails, ChunkMetadata, ChunkRecord, ChunkType, ImportRecord, ImportSpecifier, NodeChunk,
    Param, SpecifierKind,
};
