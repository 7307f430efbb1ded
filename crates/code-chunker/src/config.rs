use crate::error::{ChunkerError, Result};
use crate::language::{Language, LanguagePolicy};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// Configuration for code chunking behavior
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ChunkerConfig {
    /// Broadcast the file-level import list onto every chunk
    pub include_imports: bool,

    /// Populate per-chunk details (params, async/generator flags, docs)
    pub include_details: bool,

    /// Languages to support (empty = all supported languages)
    pub supported_languages: Vec<String>,

    /// Extra extension → language mappings on top of the built-in table
    pub extra_extensions: BTreeMap<String, String>,
}

impl Default for ChunkerConfig {
    fn default() -> Self {
        Self {
            include_imports: true,
            include_details: true,
            supported_languages: vec![],
            extra_extensions: BTreeMap::new(),
        }
    }
}

impl ChunkerConfig {
    /// Create config for the embedding pipeline (full metadata)
    pub fn for_embeddings() -> Self {
        Self::default()
    }

    /// Create config that only emits the core chunk fields
    pub fn minimal() -> Self {
        Self {
            include_imports: false,
            include_details: false,
            ..Default::default()
        }
    }

    /// Validate configuration
    pub fn validate(&self) -> Result<()> {
        for name in &self.supported_languages {
            if Language::from_name(name).is_none() {
                return Err(ChunkerError::invalid_config(format!(
                    "unknown language in supported_languages: {name}"
                )));
            }
        }

        for (ext, name) in &self.extra_extensions {
            let ext = ext.trim_start_matches('.');
            if ext.is_empty() {
                return Err(ChunkerError::invalid_config(
                    "extra_extensions contains an empty extension",
                ));
            }
            if Language::from_name(name).is_none() {
                return Err(ChunkerError::invalid_config(format!(
                    "extension .{ext} maps to unknown language {name}"
                )));
            }
        }

        Ok(())
    }

    /// Whether files of this language should be chunked at all
    #[must_use]
    pub fn allows(&self, language: Language) -> bool {
        self.supported_languages.is_empty()
            || self
                .supported_languages
                .iter()
                .any(|name| Language::from_name(name) == Some(language))
    }

    /// Resolved extra extension table (invalid entries are skipped)
    pub(crate) fn extension_overrides(
        &self,
    ) -> impl Iterator<Item = (String, LanguagePolicy)> + '_ {
        self.extra_extensions.iter().filter_map(|(ext, name)| {
            let language = Language::from_name(name)?;
            let ext = ext.trim_start_matches('.').to_lowercase();
            Some((ext, LanguagePolicy::for_language(language)))
        })
    }
}
