use serde::{Deserialize, Serialize};
use std::fmt;
use std::path::Path;

/// Supported programming language
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Language {
    JavaScript,
    TypeScript,
    Python,
    Java,
}

impl Language {
    pub const ALL: [Self; 4] = [
        Self::JavaScript,
        Self::TypeScript,
        Self::Python,
        Self::Java,
    ];

    /// Get language name as string
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::JavaScript => "javascript",
            Self::TypeScript => "typescript",
            Self::Python => "python",
            Self::Java => "java",
        }
    }

    /// Parse a language name as produced by [`Language::as_str`]
    #[must_use]
    pub fn from_name(name: &str) -> Option<Self> {
        Self::ALL
            .into_iter()
            .find(|lang| lang.as_str().eq_ignore_ascii_case(name.trim()))
    }

    /// Whether the file-level import list is populated for this language
    #[must_use]
    pub const fn has_import_records(self) -> bool {
        matches!(self, Self::JavaScript | Self::TypeScript)
    }

    /// Grammar used for files of this language unless the extension says otherwise
    #[must_use]
    pub const fn default_grammar(self) -> Grammar {
        match self {
            Self::JavaScript => Grammar::JavaScript,
            Self::TypeScript => Grammar::TypeScript,
            Self::Python => Grammar::Python,
            Self::Java => Grammar::Java,
        }
    }

    /// Chunkable node kinds for this language
    #[must_use]
    pub const fn chunkable_kinds(self) -> &'static [ChunkableKind] {
        match self {
            Self::JavaScript => JAVASCRIPT_KINDS,
            Self::TypeScript => TYPESCRIPT_KINDS,
            Self::Python => PYTHON_KINDS,
            Self::Java => JAVA_KINDS,
        }
    }
}

impl fmt::Display for Language {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A loadable tree-sitter grammar
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Grammar {
    /// ECMAScript with JSX
    JavaScript,
    TypeScript,
    Tsx,
    Python,
    Java,
}

impl Grammar {
    pub const ALL: [Self; 5] = [
        Self::JavaScript,
        Self::TypeScript,
        Self::Tsx,
        Self::Python,
        Self::Java,
    ];

    /// Position of this grammar in per-grammar tables
    #[must_use]
    pub const fn index(self) -> usize {
        match self {
            Self::JavaScript => 0,
            Self::TypeScript => 1,
            Self::Tsx => 2,
            Self::Python => 3,
            Self::Java => 4,
        }
    }

    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::JavaScript => "javascript",
            Self::TypeScript => "typescript",
            Self::Tsx => "tsx",
            Self::Python => "python",
            Self::Java => "java",
        }
    }

    /// Get Tree-sitter language instance
    #[must_use]
    pub fn tree_sitter_language(self) -> tree_sitter::Language {
        match self {
            Self::JavaScript => tree_sitter_javascript::LANGUAGE.into(),
            Self::TypeScript => tree_sitter_typescript::LANGUAGE_TYPESCRIPT.into(),
            Self::Tsx => tree_sitter_typescript::LANGUAGE_TSX.into(),
            Self::Python => tree_sitter_python::LANGUAGE.into(),
            Self::Java => tree_sitter_java::LANGUAGE.into(),
        }
    }
}

/// How a chunk's name and normalized type are derived from its root node
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum NameRule {
    /// Definition with a `name` field (functions, classes, interfaces, ...)
    NameField,
    /// `let`/`const`/`var` declarations: inspect the first declarator
    Declarator,
    /// Class member field
    Field,
    /// Import/package statements, identified by presence
    Statement,
    /// `export ...`, named after the wrapped declaration when there is one
    Export,
    /// Python decorators wrapping a function or class
    Decorated,
    /// Python top-level expression (docstrings, assignments, registrations)
    Expression,
}

/// Syntax-tree node kinds that may become chunks in at least one language
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ChunkableKind {
    FunctionDeclaration,
    GeneratorFunctionDeclaration,
    ClassDeclaration,
    AbstractClassDeclaration,
    LexicalDeclaration,
    VariableDeclaration,
    FieldDefinition,
    PublicFieldDefinition,
    ImportStatement,
    ExportStatement,
    InterfaceDeclaration,
    TypeAliasDeclaration,
    EnumDeclaration,
    FunctionSignature,
    InternalModule,
    FunctionDefinition,
    ClassDefinition,
    DecoratedDefinition,
    ImportFromStatement,
    FutureImportStatement,
    ExpressionStatement,
    PackageDeclaration,
    ImportDeclaration,
    RecordDeclaration,
    AnnotationTypeDeclaration,
    MethodDeclaration,
    ConstructorDeclaration,
    FieldDeclaration,
}

impl ChunkableKind {
    /// Tree-sitter node kind this entry matches
    #[must_use]
    pub const fn node_kind(self) -> &'static str {
        match self {
            Self::FunctionDeclaration => "function_declaration",
            Self::GeneratorFunctionDeclaration => "generator_function_declaration",
            Self::ClassDeclaration => "class_declaration",
            Self::AbstractClassDeclaration => "abstract_class_declaration",
            Self::LexicalDeclaration => "lexical_declaration",
            Self::VariableDeclaration => "variable_declaration",
            Self::FieldDefinition => "field_definition",
            Self::PublicFieldDefinition => "public_field_definition",
            Self::ImportStatement => "import_statement",
            Self::ExportStatement => "export_statement",
            Self::InterfaceDeclaration => "interface_declaration",
            Self::TypeAliasDeclaration => "type_alias_declaration",
            Self::EnumDeclaration => "enum_declaration",
            Self::FunctionSignature => "function_signature",
            Self::InternalModule => "internal_module",
            Self::FunctionDefinition => "function_definition",
            Self::ClassDefinition => "class_definition",
            Self::DecoratedDefinition => "decorated_definition",
            Self::ImportFromStatement => "import_from_statement",
            Self::FutureImportStatement => "future_import_statement",
            Self::ExpressionStatement => "expression_statement",
            Self::PackageDeclaration => "package_declaration",
            Self::ImportDeclaration => "import_declaration",
            Self::RecordDeclaration => "record_declaration",
            Self::AnnotationTypeDeclaration => "annotation_type_declaration",
            Self::MethodDeclaration => "method_declaration",
            Self::ConstructorDeclaration => "constructor_declaration",
            Self::FieldDeclaration => "field_declaration",
        }
    }

    #[must_use]
    pub const fn name_rule(self) -> NameRule {
        match self {
            Self::LexicalDeclaration | Self::VariableDeclaration => NameRule::Declarator,
            Self::FieldDefinition | Self::PublicFieldDefinition | Self::FieldDeclaration => {
                NameRule::Field
            }
            Self::ImportStatement
            | Self::ImportFromStatement
            | Self::FutureImportStatement
            | Self::ImportDeclaration
            | Self::PackageDeclaration => NameRule::Statement,
            Self::ExportStatement => NameRule::Export,
            Self::DecoratedDefinition => NameRule::Decorated,
            Self::ExpressionStatement => NameRule::Expression,
            Self::FunctionDeclaration
            | Self::GeneratorFunctionDeclaration
            | Self::ClassDeclaration
            | Self::AbstractClassDeclaration
            | Self::InterfaceDeclaration
            | Self::TypeAliasDeclaration
            | Self::EnumDeclaration
            | Self::FunctionSignature
            | Self::InternalModule
            | Self::FunctionDefinition
            | Self::ClassDefinition
            | Self::RecordDeclaration
            | Self::AnnotationTypeDeclaration
            | Self::MethodDeclaration
            | Self::ConstructorDeclaration => NameRule::NameField,
        }
    }
}

const JAVASCRIPT_KINDS: &[ChunkableKind] = &[
    ChunkableKind::FunctionDeclaration,
    ChunkableKind::GeneratorFunctionDeclaration,
    ChunkableKind::ClassDeclaration,
    ChunkableKind::LexicalDeclaration,
    ChunkableKind::VariableDeclaration,
    ChunkableKind::FieldDefinition,
    ChunkableKind::ImportStatement,
    ChunkableKind::ExportStatement,
];

const TYPESCRIPT_KINDS: &[ChunkableKind] = &[
    ChunkableKind::FunctionDeclaration,
    ChunkableKind::GeneratorFunctionDeclaration,
    ChunkableKind::ClassDeclaration,
    ChunkableKind::LexicalDeclaration,
    ChunkableKind::VariableDeclaration,
    ChunkableKind::FieldDefinition,
    ChunkableKind::ImportStatement,
    ChunkableKind::ExportStatement,
    ChunkableKind::InterfaceDeclaration,
    ChunkableKind::TypeAliasDeclaration,
    ChunkableKind::EnumDeclaration,
    ChunkableKind::AbstractClassDeclaration,
    ChunkableKind::FunctionSignature,
    ChunkableKind::InternalModule,
    ChunkableKind::PublicFieldDefinition,
];

const PYTHON_KINDS: &[ChunkableKind] = &[
    ChunkableKind::FunctionDefinition,
    ChunkableKind::ClassDefinition,
    ChunkableKind::DecoratedDefinition,
    ChunkableKind::ImportStatement,
    ChunkableKind::ImportFromStatement,
    ChunkableKind::FutureImportStatement,
    ChunkableKind::ExpressionStatement,
];

const JAVA_KINDS: &[ChunkableKind] = &[
    ChunkableKind::PackageDeclaration,
    ChunkableKind::ImportDeclaration,
    ChunkableKind::ClassDeclaration,
    ChunkableKind::InterfaceDeclaration,
    ChunkableKind::EnumDeclaration,
    ChunkableKind::RecordDeclaration,
    ChunkableKind::AnnotationTypeDeclaration,
    ChunkableKind::MethodDeclaration,
    ChunkableKind::ConstructorDeclaration,
    ChunkableKind::FieldDeclaration,
];

/// Per-file language selection: which policy applies and which grammar parses it
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct LanguagePolicy {
    pub language: Language,
    pub grammar: Grammar,
}

impl LanguagePolicy {
    #[must_use]
    pub const fn new(language: Language, grammar: Grammar) -> Self {
        Self { language, grammar }
    }

    /// Policy for a language using its default grammar
    #[must_use]
    pub const fn for_language(language: Language) -> Self {
        Self::new(language, language.default_grammar())
    }

    /// Built-in extension table
    #[must_use]
    pub fn from_extension(ext: &str) -> Option<Self> {
        let policy = match ext.to_lowercase().as_str() {
            "js" | "jsx" | "mjs" | "cjs" => Self::for_language(Language::JavaScript),
            "ts" | "mts" | "cts" => Self::for_language(Language::TypeScript),
            "tsx" => Self::new(Language::TypeScript, Grammar::Tsx),
            "py" | "pyi" => Self::for_language(Language::Python),
            "java" => Self::for_language(Language::Java),
            _ => return None,
        };
        Some(policy)
    }

    /// Detect from a file path's extension
    pub fn from_path(path: impl AsRef<Path>) -> Option<Self> {
        path.as_ref()
            .extension()
            .and_then(|ext| ext.to_str())
            .and_then(Self::from_extension)
    }

    /// Decide whether a node of this kind becomes a chunk root
    #[must_use]
    pub fn classify(&self, node_kind: &str) -> Option<ChunkableKind> {
        self.language
            .chunkable_kinds()
            .iter()
            .copied()
            .find(|kind| kind.node_kind() == node_kind)
    }
}
