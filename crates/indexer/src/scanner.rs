use ignore::WalkBuilder;
use semchunk_code_chunker::GrammarRegistry;
use std::path::{Path, PathBuf};
use std::sync::Arc;

/// Default upper bound for a single source file
pub const MAX_FILE_SIZE_BYTES: u64 = 1_048_576; // 1 MB

/// Options for directory scans
#[derive(Debug, Clone, Copy)]
pub struct ScanOptions {
    /// Files larger than this are skipped
    pub max_file_bytes: u64,
    /// Walk into hidden files and directories
    pub include_hidden: bool,
}

impl Default for ScanOptions {
    fn default() -> Self {
        Self {
            max_file_bytes: MAX_FILE_SIZE_BYTES,
            include_hidden: false,
        }
    }
}

/// Scanner for finding chunkable source files in a project
pub struct FileScanner {
    root: PathBuf,
    options: ScanOptions,
    registry: Arc<GrammarRegistry>,
}

impl FileScanner {
    pub fn new(root: impl AsRef<Path>) -> Self {
        Self {
            root: root.as_ref().to_path_buf(),
            options: ScanOptions::default(),
            registry: GrammarRegistry::shared(),
        }
    }

    #[must_use]
    pub const fn with_options(mut self, options: ScanOptions) -> Self {
        self.options = options;
        self
    }

    /// Use a registry with extra extension mappings
    #[must_use]
    pub fn with_registry(mut self, registry: Arc<GrammarRegistry>) -> Self {
        self.registry = registry;
        self
    }

    /// Scan directory for source files (.gitignore aware), sorted by path
    pub fn scan(&self) -> Vec<PathBuf> {
        let mut files = Vec::new();

        let root = self.root.clone();
        let mut builder = WalkBuilder::new(&self.root);
        builder
            .hidden(!self.options.include_hidden)
            .git_ignore(true)
            .git_global(true)
            .git_exclude(true);
        builder.filter_entry(move |entry| !Self::is_ignored_scope(entry.path(), &root));

        for result in builder.build() {
            match result {
                Ok(entry) => {
                    let Some(file_type) = entry.file_type() else {
                        continue;
                    };
                    if !file_type.is_file() {
                        continue;
                    }

                    let path = entry.path();
                    if self.registry.resolve(path).is_none() {
                        continue;
                    }

                    if let Ok(meta) = entry.metadata() {
                        if meta.len() > self.options.max_file_bytes {
                            log::debug!(
                                "Skipping large file {} ({} bytes > {})",
                                path.display(),
                                meta.len(),
                                self.options.max_file_bytes
                            );
                            continue;
                        }
                    }

                    if Self::is_minified(path) {
                        log::debug!("Skipping minified bundle {}", path.display());
                        continue;
                    }

                    files.push(path.to_path_buf());
                }
                Err(e) => log::warn!("Failed to read entry: {e}"),
            }
        }

        files.sort();
        log::info!("Found {} source files", files.len());
        files
    }

    fn is_ignored_scope(path: &Path, root: &Path) -> bool {
        if let Ok(relative) = path.strip_prefix(root) {
            for component in relative.components() {
                if let std::path::Component::Normal(name) = component {
                    let lowered = name.to_string_lossy().to_lowercase();
                    if IGNORED_SCOPES.iter().any(|ignored| ignored == &lowered) {
                        return true;
                    }
                }
            }
        }
        false
    }

    fn is_minified(path: &Path) -> bool {
        path.file_name()
            .and_then(|name| name.to_str())
            .is_some_and(|name| {
                let lowered = name.to_lowercase();
                lowered.ends_with(".min.js") || lowered.ends_with(".bundle.js")
            })
    }
}

const IGNORED_SCOPES: &[&str] = &[
    // VCS / tooling
    ".git",
    ".hg",
    ".svn",
    ".idea",
    ".vscode",
    // caches / builds
    ".cache",
    "node_modules",
    ".next",
    ".turbo",
    ".parcel-cache",
    "build",
    "dist",
    "coverage",
    "target",
    "out",
    ".gradle",
    // python environments
    ".venv",
    "venv",
    ".tox",
    ".mypy_cache",
    ".pytest_cache",
    "__pycache__",
    // vendored code
    "vendor",
    "third_party",
    "third-party",
];

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;
    use semchunk_code_chunker::{Language, LanguagePolicy};
    use std::fs;
    use tempfile::tempdir;

    #[test]
    fn finds_only_supported_sources() {
        let temp = tempdir().unwrap();
        fs::create_dir_all(temp.path().join("src")).unwrap();
        fs::write(temp.path().join("src/app.ts"), b"export {};").unwrap();
        fs::write(temp.path().join("src/util.py"), b"x = 1").unwrap();
        fs::write(temp.path().join("README.md"), b"# readme").unwrap();
        fs::write(temp.path().join("Cargo.toml"), b"[package]").unwrap();

        let files = FileScanner::new(temp.path()).scan();
        let names: Vec<_> = files
            .iter()
            .filter_map(|p| p.file_name()?.to_str())
            .collect();
        assert_eq!(names, vec!["app.ts", "util.py"]);
    }

    #[test]
    fn skips_ignored_directories_and_bundles() {
        let temp = tempdir().unwrap();
        let deps = temp.path().join("node_modules").join("left-pad");
        fs::create_dir_all(&deps).unwrap();
        fs::write(deps.join("index.js"), b"module.exports = 1;").unwrap();
        fs::write(temp.path().join("vendor.min.js"), b"var a=1;").unwrap();
        fs::write(temp.path().join("main.js"), b"main();").unwrap();

        let files = FileScanner::new(temp.path()).scan();
        assert_eq!(files.len(), 1);
        assert!(files[0].ends_with("main.js"));
    }

    #[test]
    fn skips_large_files() {
        let temp = tempdir().unwrap();
        fs::write(temp.path().join("big.py"), vec![b'#'; 64]).unwrap();
        fs::write(temp.path().join("small.py"), b"x = 1").unwrap();

        let files = FileScanner::new(temp.path())
            .with_options(ScanOptions {
                max_file_bytes: 16,
                ..Default::default()
            })
            .scan();
        assert_eq!(files.len(), 1);
        assert!(files[0].ends_with("small.py"));
    }

    #[test]
    fn registry_overrides_widen_the_scan() {
        let temp = tempdir().unwrap();
        fs::write(temp.path().join("legacy.es6"), b"let a = 1;").unwrap();

        assert!(FileScanner::new(temp.path()).scan().is_empty());

        let registry = Arc::new(GrammarRegistry::with_extensions([(
            "es6".to_string(),
            LanguagePolicy::for_language(Language::JavaScript),
        )]));
        let files = FileScanner::new(temp.path()).with_registry(registry).scan();
        assert_eq!(files.len(), 1);
    }
}
