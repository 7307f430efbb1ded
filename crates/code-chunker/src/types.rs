use crate::language::Language;
use serde::{Deserialize, Serialize};

/// A semantic code chunk ready for embedding
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct ChunkRecord {
    /// Deterministic identifier, unique within the file
    pub id: String,

    /// Verbatim source spanned by the chunk's root node
    pub content: String,

    /// Provenance and structural metadata
    pub metadata: ChunkMetadata,
}

impl ChunkRecord {
    /// Get the number of lines in this chunk
    #[must_use]
    pub const fn line_count(&self) -> usize {
        self.metadata
            .line_end
            .saturating_sub(self.metadata.line_start)
            + 1
    }

    /// Check if chunk contains a specific line
    #[must_use]
    pub const fn contains_line(&self, line: usize) -> bool {
        line >= self.metadata.line_start && line <= self.metadata.line_end
    }

    /// True when `other`'s line span is a strict sub-range of this one
    #[must_use]
    pub const fn strictly_contains(&self, other: &Self) -> bool {
        let (start, end) = (self.metadata.line_start, self.metadata.line_end);
        let (o_start, o_end) = (other.metadata.line_start, other.metadata.line_end);
        start <= o_start && o_end <= end && (start != o_start || end != o_end)
    }
}

/// Metadata bag attached to every chunk
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct ChunkMetadata {
    pub file_path: String,

    pub language: Language,

    #[serde(rename = "type")]
    pub chunk_type: ChunkType,

    /// Extracted identifier, `"anonymous"` when none was found
    pub name: String,

    /// 1-indexed, inclusive
    pub line_start: usize,

    /// 1-indexed, inclusive
    pub line_end: usize,

    /// File-level imports, identical on every chunk of the file
    #[serde(default)]
    pub imports: Vec<ImportRecord>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub details: Option<ChunkDetails>,
}

/// Normalized chunk type
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Hash)]
#[serde(rename_all = "snake_case")]
pub enum ChunkType {
    Function,
    Class,
    Interface,
    Enum,
    TypeAlias,
    Module,
    Variable,
    FunctionExpression,
    Field,
    Import,
    Export,
    Package,
    Expression,
}

impl ChunkType {
    /// Get human-readable name
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Function => "function",
            Self::Class => "class",
            Self::Interface => "interface",
            Self::Enum => "enum",
            Self::TypeAlias => "type_alias",
            Self::Module => "module",
            Self::Variable => "variable",
            Self::FunctionExpression => "function_expression",
            Self::Field => "field",
            Self::Import => "import",
            Self::Export => "export",
            Self::Package => "package",
            Self::Expression => "expression",
        }
    }
}

/// One import statement of a JS/TS file
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct ImportRecord {
    /// Module specifier, without quotes
    pub source: String,
    pub specifiers: Vec<ImportSpecifier>,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct ImportSpecifier {
    #[serde(rename = "type")]
    pub kind: SpecifierKind,

    /// Binding introduced in this file
    pub local: String,

    /// Exported name in the source module; `None` for default/namespace imports
    pub imported: Option<String>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Hash)]
#[serde(rename_all = "snake_case")]
pub enum SpecifierKind {
    /// `import x from "m"`
    Default,
    /// `import * as x from "m"`
    Namespace,
    /// `import { a as x } from "m"`
    Named,
}

/// Optional per-chunk details for grammars that expose them
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct ChunkDetails {
    #[serde(default)]
    pub params: Vec<Param>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub return_type: Option<String>,

    #[serde(default)]
    pub is_async: bool,

    #[serde(default)]
    pub is_generator: bool,

    /// Decorator source text, e.g. `@app.route("/")`
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub decorators: Vec<String>,

    /// Preceding doc comment (JS/TS) or docstring (Python)
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub documentation: Option<String>,
}

impl ChunkDetails {
    /// Nothing worth attaching
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self == &Self::default()
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct Param {
    pub name: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub type_annotation: Option<String>,
}

/// A chunk root found by traversal, before ids and imports are attached
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NodeChunk {
    pub chunk_type: ChunkType,
    pub name: String,
    pub content: String,
    pub start_byte: usize,
    pub end_byte: usize,
    pub line_start: usize,
    pub line_end: usize,
    pub details: Option<ChunkDetails>,
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    fn record(start: usize, end: usize) -> ChunkRecord {
        ChunkRecord {
            id: "x".to_string(),
            content: "code".to_string(),
            metadata: ChunkMetadata {
                file_path: "a.ts".to_string(),
                language: Language::TypeScript,
                chunk_type: ChunkType::Function,
                name: "f".to_string(),
                line_start: start,
                line_end: end,
                imports: vec![],
                details: None,
            },
        }
    }

    #[test]
    fn test_chunk_line_count() {
        assert_eq!(record(10, 15).line_count(), 6);
    }

    #[test]
    fn test_chunk_contains_line() {
        let chunk = record(10, 15);
        assert!(chunk.contains_line(10));
        assert!(chunk.contains_line(15));
        assert!(!chunk.contains_line(9));
        assert!(!chunk.contains_line(16));
    }

    #[test]
    fn test_strict_containment() {
        assert!(record(1, 10).strictly_contains(&record(3, 4)));
        assert!(record(1, 10).strictly_contains(&record(1, 4)));
        assert!(!record(1, 10).strictly_contains(&record(1, 10)));
        assert!(!record(3, 4).strictly_contains(&record(1, 10)));
    }

    #[test]
    fn serializes_metadata_bag() {
        let mut chunk = record(1, 2);
        chunk.metadata.imports.push(ImportRecord {
            source: "react".to_string(),
            specifiers: vec![ImportSpecifier {
                kind: SpecifierKind::Default,
                local: "React".to_string(),
                imported: None,
            }],
        });

        let value = serde_json::to_value(&chunk).unwrap();
        assert_eq!(value["metadata"]["filePath"], "a.ts");
        assert_eq!(value["metadata"]["type"], "function");
        assert_eq!(value["metadata"]["language"], "typescript");
        assert_eq!(value["metadata"]["lineStart"], 1);
        assert_eq!(value["metadata"]["imports"][0]["specifiers"][0]["type"], "default");
        assert!(value["metadata"]["imports"][0]["specifiers"][0]["imported"].is_null());
        assert!(value["metadata"].get("details").is_none());
    }
}
