//! Grammar registry: extension lookup plus the process-wide parser cache.
//!
//! Grammars are loaded lazily, once per process, and never invalidated.
//! `tree_sitter::Parser` is `Send` but not `Sync`, so every grammar keeps a
//! pool of idle parsers; a file checks one out for the duration of its parse
//! and the guard hands it back on drop.

use crate::error::{ChunkerError, Result};
use crate::language::{Grammar, LanguagePolicy};
use once_cell::sync::Lazy;
use std::collections::HashMap;
use std::ops::{Deref, DerefMut};
use std::path::Path;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, Mutex, MutexGuard, OnceLock, PoisonError};
use tree_sitter::Parser;

const GRAMMAR_COUNT: usize = Grammar::ALL.len();

static SHARED: Lazy<Arc<GrammarRegistry>> = Lazy::new(|| Arc::new(GrammarRegistry::new()));

/// Maps file extensions to language policies and caches loaded grammars
pub struct GrammarRegistry {
    overrides: HashMap<String, LanguagePolicy>,
    grammars: [OnceLock<tree_sitter::Language>; GRAMMAR_COUNT],
    idle: [Mutex<Vec<Parser>>; GRAMMAR_COUNT],
    parsers_built: AtomicUsize,
}

impl Default for GrammarRegistry {
    fn default() -> Self {
        Self::new()
    }
}

impl GrammarRegistry {
    /// Registry with the built-in extension table only
    #[must_use]
    pub fn new() -> Self {
        Self {
            overrides: HashMap::new(),
            grammars: std::array::from_fn(|_| OnceLock::new()),
            idle: std::array::from_fn(|_| Mutex::new(Vec::new())),
            parsers_built: AtomicUsize::new(0),
        }
    }

    /// Registry with additional extension mappings (extension without the dot)
    #[must_use]
    pub fn with_extensions(extensions: impl IntoIterator<Item = (String, LanguagePolicy)>) -> Self {
        let mut registry = Self::new();
        registry.overrides = extensions
            .into_iter()
            .map(|(ext, policy)| (ext.to_lowercase(), policy))
            .collect();
        registry
    }

    /// Process-wide registry
    #[must_use]
    pub fn shared() -> Arc<Self> {
        Arc::clone(&SHARED)
    }

    /// Resolve the language policy for a path. `None` means unsupported.
    pub fn resolve(&self, path: impl AsRef<Path>) -> Option<LanguagePolicy> {
        let ext = path.as_ref().extension()?.to_str()?;
        self.resolve_extension(ext)
    }

    /// Resolve by bare extension (no leading dot)
    #[must_use]
    pub fn resolve_extension(&self, ext: &str) -> Option<LanguagePolicy> {
        let ext = ext.to_lowercase();
        self.overrides
            .get(&ext)
            .copied()
            .or_else(|| LanguagePolicy::from_extension(&ext))
    }

    /// Loaded grammar, constructed on first use
    pub fn grammar(&self, grammar: Grammar) -> &tree_sitter::Language {
        self.grammars[grammar.index()].get_or_init(|| {
            log::debug!("Loading {} grammar", grammar.as_str());
            grammar.tree_sitter_language()
        })
    }

    /// Borrow a parser configured for `grammar`
    pub fn checkout(&self, grammar: Grammar) -> Result<PooledParser<'_>> {
        let cached = self.idle_parsers(grammar).pop();
        let parser = match cached {
            Some(parser) => parser,
            None => self.build_parser(grammar)?,
        };

        Ok(PooledParser {
            registry: self,
            grammar,
            parser: Some(parser),
        })
    }

    /// Number of parsers constructed so far
    #[must_use]
    pub fn parsers_built(&self) -> usize {
        self.parsers_built.load(Ordering::Relaxed)
    }

    fn build_parser(&self, grammar: Grammar) -> Result<Parser> {
        let mut parser = Parser::new();
        parser
            .set_language(self.grammar(grammar))
            .map_err(|e| ChunkerError::tree_sitter(format!("Failed to set language: {e}")))?;
        self.parsers_built.fetch_add(1, Ordering::Relaxed);
        Ok(parser)
    }

    fn idle_parsers(&self, grammar: Grammar) -> MutexGuard<'_, Vec<Parser>> {
        self.idle[grammar.index()]
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
    }
}

/// A parser on loan from the registry; returned to the pool on drop
pub struct PooledParser<'a> {
    registry: &'a GrammarRegistry,
    grammar: Grammar,
    parser: Option<Parser>,
}

impl Deref for PooledParser<'_> {
    type Target = Parser;

    fn deref(&self) -> &Parser {
        self.parser
            .as_ref()
            .unwrap_or_else(|| unreachable!("parser taken before drop"))
    }
}

impl DerefMut for PooledParser<'_> {
    fn deref_mut(&mut self) -> &mut Parser {
        self.parser
            .as_mut()
            .unwrap_or_else(|| unreachable!("parser taken before drop"))
    }
}

impl Drop for PooledParser<'_> {
    fn drop(&mut self) {
        if let Some(mut parser) = self.parser.take() {
            parser.reset();
            self.registry.idle_parsers(self.grammar).push(parser);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::language::Language;

    #[test]
    fn resolves_builtin_extensions() {
        let registry = GrammarRegistry::new();
        assert_eq!(
            registry.resolve("/repo/src/index.JS").map(|p| p.language),
            Some(Language::JavaScript)
        );
        assert_eq!(
            registry.resolve("/repo/App.tsx").map(|p| p.grammar),
            Some(Grammar::Tsx)
        );
        assert!(registry.resolve("/repo/README.md").is_none());
        assert!(registry.resolve("/repo/Makefile").is_none());
    }

    #[test]
    fn overrides_extend_the_table() {
        let registry = GrammarRegistry::with_extensions([(
            "ES6".to_string(),
            LanguagePolicy::for_language(Language::JavaScript),
        )]);
        assert_eq!(
            registry.resolve("legacy.es6").map(|p| p.language),
            Some(Language::JavaScript)
        );
        assert!(registry.resolve("main.py").is_some());
    }

    #[test]
    fn parsers_are_reused_after_checkin() {
        let registry = GrammarRegistry::new();
        {
            let _first = registry.checkout(Grammar::Python).unwrap();
        }
        {
            let _second = registry.checkout(Grammar::Python).unwrap();
        }
        assert_eq!(registry.parsers_built(), 1);

        let _a = registry.checkout(Grammar::Java).unwrap();
        let _b = registry.checkout(Grammar::Java).unwrap();
        assert_eq!(registry.parsers_built(), 3);
    }

    #[test]
    fn concurrent_checkouts_share_one_grammar() {
        let registry = Arc::new(GrammarRegistry::new());
        let handles: Vec<_> = (0..4)
            .map(|_| {
                let registry = Arc::clone(&registry);
                std::thread::spawn(move || {
                    let mut parser = registry.checkout(Grammar::JavaScript).unwrap();
                    parser.parse("let x = 1;", None).is_some()
                })
            })
            .collect();

        for handle in handles {
            assert!(handle.join().unwrap());
        }
        assert!(registry.parsers_built() <= 4);
    }
}
