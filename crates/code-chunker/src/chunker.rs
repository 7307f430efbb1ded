use crate::assemble::assemble;
use crate::config::ChunkerConfig;
use crate::error::{ChunkerError, Result};
use crate::extract::Extractor;
use crate::language::LanguagePolicy;
use crate::parser::ParserAdapter;
use crate::registry::GrammarRegistry;
use crate::types::ChunkRecord;
use std::path::Path;
use std::sync::Arc;

/// Per-file pipeline: resolve → parse → extract → assemble
#[derive(Clone)]
pub struct Chunker {
    config: ChunkerConfig,
    parser: ParserAdapter,
}

impl Chunker {
    /// Create a chunker; uses the process-wide registry unless the config adds extensions
    pub fn new(config: ChunkerConfig) -> Result<Self> {
        config.validate()?;
        let registry = if config.extra_extensions.is_empty() {
            GrammarRegistry::shared()
        } else {
            Arc::new(GrammarRegistry::with_extensions(
                config.extension_overrides(),
            ))
        };
        Ok(Self {
            config,
            parser: ParserAdapter::new(registry),
        })
    }

    /// Create a chunker around an explicit registry
    pub fn with_registry(config: ChunkerConfig, registry: Arc<GrammarRegistry>) -> Result<Self> {
        config.validate()?;
        Ok(Self {
            config,
            parser: ParserAdapter::new(registry),
        })
    }

    #[must_use]
    pub const fn config(&self) -> &ChunkerConfig {
        &self.config
    }

    #[must_use]
    pub fn registry(&self) -> &Arc<GrammarRegistry> {
        self.parser.registry()
    }

    /// Language policy for a path, honoring `supported_languages`
    pub fn resolve(&self, file_path: impl AsRef<Path>) -> Result<LanguagePolicy> {
        let file_path = file_path.as_ref();
        let policy = self.registry().resolve(file_path).ok_or_else(|| {
            let ext = file_path
                .extension()
                .and_then(|ext| ext.to_str())
                .unwrap_or("<none>");
            ChunkerError::unsupported_language(format!(".{ext}"))
        })?;

        if !self.config.allows(policy.language) {
            return Err(ChunkerError::unsupported_language(policy.language.as_str()));
        }
        Ok(policy)
    }

    /// Chunk code from a string; the language comes from `file_path`'s extension
    pub fn chunk_str(&self, content: &str, file_path: &str) -> Result<Vec<ChunkRecord>> {
        let policy = self.resolve(file_path)?;
        self.chunk_with_policy(content, file_path, policy)
    }

    /// Chunk code from a file
    pub fn chunk_file(&self, path: impl AsRef<Path>) -> Result<Vec<ChunkRecord>> {
        let path = path.as_ref();
        let policy = self.resolve(path)?;
        let content = std::fs::read_to_string(path)?;
        let file_path = path.to_string_lossy();
        self.chunk_with_policy(&content, &file_path, policy)
    }

    /// Chunk code with an explicit policy
    pub fn chunk_with_policy(
        &self,
        content: &str,
        file_path: &str,
        policy: LanguagePolicy,
    ) -> Result<Vec<ChunkRecord>> {
        let tree = self.parser.parse(content, policy)?;

        let mut extractor = Extractor::new(policy);
        if !self.config.include_details {
            extractor = extractor.without_details();
        }
        let mut extraction = extractor.extract(&tree, content, file_path);
        drop(tree);

        if !self.config.include_imports {
            extraction.imports.clear();
        }

        let chunks = assemble(
            extraction.raw,
            &extraction.imports,
            file_path,
            policy.language,
        );
        log::debug!(
            "Chunked {file_path} ({}): {} chunks",
            policy.language,
            chunks.len()
        );
        Ok(chunks)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::language::Language;
    use crate::types::ChunkType;

    #[test]
    fn rejects_invalid_config() {
        let config = ChunkerConfig {
            supported_languages: vec!["brainfuck".to_string()],
            ..Default::default()
        };
        assert!(matches!(
            Chunker::new(config),
            Err(ChunkerError::InvalidConfig(_))
        ));
    }

    #[test]
    fn unsupported_extension() {
        let chunker = Chunker::new(ChunkerConfig::default()).unwrap();
        let err = chunker.chunk_str("# Title", "README.md").err().unwrap();
        assert!(err.is_unsupported());
    }

    #[test]
    fn language_filter_makes_other_languages_unsupported() {
        let chunker = Chunker::new(ChunkerConfig {
            supported_languages: vec!["java".to_string()],
            ..Default::default()
        })
        .unwrap();
        assert!(chunker.chunk_str("x = 1\n", "a.py").err().unwrap().is_unsupported());
        assert!(chunker.chunk_str("class A {}", "A.java").is_ok());
    }

    #[test]
    fn extra_extensions_are_resolved() {
        let mut config = ChunkerConfig::default();
        config
            .extra_extensions
            .insert("es6".to_string(), "javascript".to_string());
        let chunker = Chunker::new(config).unwrap();
        let chunks = chunker.chunk_str("function f() {}\n", "old.es6").unwrap();
        assert_eq!(chunks[0].metadata.language, Language::JavaScript);
        assert_eq!(chunks[0].metadata.chunk_type, ChunkType::Function);
    }

    #[test]
    fn minimal_config_strips_imports_and_details() {
        let chunker = Chunker::new(ChunkerConfig::minimal()).unwrap();
        let chunks = chunker
            .chunk_str("import a from 'a';\nasync function f(x) {}\n", "m.js")
            .unwrap();
        assert_eq!(chunks.len(), 2);
        assert!(chunks.iter().all(|c| c.metadata.imports.is_empty()));
        assert!(chunks.iter().all(|c| c.metadata.details.is_none()));
    }

    #[test]
    fn empty_file_has_no_chunks() {
        let chunker = Chunker::new(ChunkerConfig::default()).unwrap();
        assert!(chunker.chunk_str("", "empty.ts").unwrap().is_empty());
    }

    #[test]
    fn chunk_file_reads_from_disk() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("Main.java");
        std::fs::write(&path, "public class Main { public static void main(String[] a) {} }\n")
            .unwrap();

        let chunker = Chunker::new(ChunkerConfig::default()).unwrap();
        let chunks = chunker.chunk_file(&path).unwrap();
        assert_eq!(chunks.len(), 1);
        assert_eq!(chunks[0].metadata.name, "Main");
        assert_eq!(chunks[0].id, "java_class_Main_Main.java_0");
    }
}
