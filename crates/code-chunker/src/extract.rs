//! Traversal & extraction: walks a syntax tree in pre-order, turns policy
//! matches into raw chunks and prunes their subtrees.

use crate::details::{hook_for, DetailsHook};
use crate::imports::extract_imports;
use crate::language::{ChunkableKind, LanguagePolicy, NameRule};
use crate::parser::SyntaxTree;
use crate::types::{ChunkType, ImportRecord, NodeChunk};
use tree_sitter::Node;

/// Fallback name for chunks without an identifiable name
pub const ANONYMOUS: &str = "anonymous";

/// Raw traversal output for one file
#[derive(Debug, Default)]
pub struct Extraction {
    pub raw: Vec<NodeChunk>,
    pub imports: Vec<ImportRecord>,
}

/// Name and normalized type of a chunk root, plus the node it was named after
struct Described<'t> {
    chunk_type: ChunkType,
    name: Option<String>,
    target: Node<'t>,
}

pub struct Extractor {
    policy: LanguagePolicy,
    details: Option<&'static dyn DetailsHook>,
}

impl Extractor {
    #[must_use]
    pub fn new(policy: LanguagePolicy) -> Self {
        Self {
            policy,
            details: hook_for(policy.language),
        }
    }

    /// Skip the per-language details hook
    #[must_use]
    pub fn without_details(mut self) -> Self {
        self.details = None;
        self
    }

    /// Extract raw chunks and the file-level import list
    pub fn extract(&self, tree: &SyntaxTree, source: &str, file_path: &str) -> Extraction {
        let root = tree.root();
        Extraction {
            raw: self.collect_chunks(root, source, file_path),
            imports: extract_imports(root, source, self.policy),
        }
    }

    fn collect_chunks(&self, root: Node<'_>, source: &str, file_path: &str) -> Vec<NodeChunk> {
        let mut chunks = Vec::new();
        let mut stack = vec![root];

        while let Some(node) = stack.pop() {
            if let Some(kind) = self.policy.classify(node.kind()) {
                chunks.push(self.materialize(node, kind, source, file_path));
                continue;
            }

            let mut cursor = node.walk();
            let children: Vec<_> = node.children(&mut cursor).collect();
            stack.extend(children.into_iter().rev());
        }

        chunks
    }

    fn materialize(
        &self,
        node: Node<'_>,
        kind: ChunkableKind,
        source: &str,
        file_path: &str,
    ) -> NodeChunk {
        let described = self.describe(node, kind, source);
        let name = described.name.unwrap_or_else(|| {
            if kind.name_rule() != NameRule::Expression {
                log::debug!(
                    "Extraction anomaly in {file_path}: {} at line {} has no identifiable name",
                    node.kind(),
                    node.start_position().row + 1
                );
            }
            ANONYMOUS.to_string()
        });

        let details = self
            .details
            .and_then(|hook| hook.details(node, described.target, source));

        let (line_start, line_end) = line_span(node);

        NodeChunk {
            chunk_type: described.chunk_type,
            name,
            content: node_text(node, source).to_string(),
            start_byte: node.start_byte(),
            end_byte: node.end_byte(),
            line_start,
            line_end,
            details,
        }
    }

    fn describe<'t>(&self, node: Node<'t>, kind: ChunkableKind, source: &str) -> Described<'t> {
        match kind.name_rule() {
            NameRule::NameField => Described {
                chunk_type: base_type(kind),
                name: definition_name(node, source),
                target: node,
            },
            NameRule::Declarator => describe_declarator(node, source),
            NameRule::Field => Described {
                chunk_type: ChunkType::Field,
                name: field_name(node, source),
                target: node,
            },
            NameRule::Statement => {
                let chunk_type = base_type(kind);
                Described {
                    chunk_type,
                    name: Some(chunk_type.as_str().to_string()),
                    target: node,
                }
            }
            NameRule::Export => self.describe_export(node, source),
            NameRule::Decorated => self.describe_decorated(node, source),
            NameRule::Expression => describe_expression(node, source),
        }
    }

    fn describe_inner<'t>(&self, inner: Node<'t>, source: &str) -> Described<'t> {
        match self.policy.classify(inner.kind()) {
            Some(kind) => self.describe(inner, kind, source),
            None => Described {
                chunk_type: ChunkType::Expression,
                name: definition_name(inner, source),
                target: inner,
            },
        }
    }

    fn describe_export<'t>(&self, node: Node<'t>, source: &str) -> Described<'t> {
        let name = node
            .child_by_field_name("declaration")
            .map(|decl| self.describe_inner(decl, source))
            .and_then(|inner| {
                let target = inner.target;
                inner.name.map(|name| (name, target))
            });

        match name {
            Some((name, target)) => Described {
                chunk_type: ChunkType::Export,
                name: Some(name),
                target,
            },
            None => Described {
                chunk_type: ChunkType::Export,
                name: Some(ChunkType::Export.as_str().to_string()),
                target: node,
            },
        }
    }

    fn describe_decorated<'t>(&self, node: Node<'t>, source: &str) -> Described<'t> {
        match node.child_by_field_name("definition") {
            Some(definition) => self.describe_inner(definition, source),
            None => Described {
                chunk_type: ChunkType::Function,
                name: None,
                target: node,
            },
        }
    }
}

/// Normalized type for rules whose type does not depend on children
fn base_type(kind: ChunkableKind) -> ChunkType {
    match kind {
        ChunkableKind::FunctionDeclaration
        | ChunkableKind::GeneratorFunctionDeclaration
        | ChunkableKind::FunctionSignature
        | ChunkableKind::FunctionDefinition
        | ChunkableKind::MethodDeclaration
        | ChunkableKind::ConstructorDeclaration
        | ChunkableKind::DecoratedDefinition => ChunkType::Function,
        ChunkableKind::ClassDeclaration
        | ChunkableKind::AbstractClassDeclaration
        | ChunkableKind::ClassDefinition
        | ChunkableKind::RecordDeclaration => ChunkType::Class,
        ChunkableKind::InterfaceDeclaration | ChunkableKind::AnnotationTypeDeclaration => {
            ChunkType::Interface
        }
        ChunkableKind::EnumDeclaration => ChunkType::Enum,
        ChunkableKind::TypeAliasDeclaration => ChunkType::TypeAlias,
        ChunkableKind::InternalModule => ChunkType::Module,
        ChunkableKind::LexicalDeclaration | ChunkableKind::VariableDeclaration => {
            ChunkType::Variable
        }
        ChunkableKind::FieldDefinition
        | ChunkableKind::PublicFieldDefinition
        | ChunkableKind::FieldDeclaration => ChunkType::Field,
        ChunkableKind::ImportStatement
        | ChunkableKind::ImportFromStatement
        | ChunkableKind::FutureImportStatement
        | ChunkableKind::ImportDeclaration => ChunkType::Import,
        ChunkableKind::PackageDeclaration => ChunkType::Package,
        ChunkableKind::ExportStatement => ChunkType::Export,
        ChunkableKind::ExpressionStatement => ChunkType::Expression,
    }
}

fn describe_declarator<'t>(node: Node<'t>, source: &str) -> Described<'t> {
    let declarator = {
        let mut cursor = node.walk();
        let found = node
            .named_children(&mut cursor)
            .find(|c| c.kind() == "variable_declarator");
        found
    };

    let Some(declarator) = declarator else {
        return Described {
            chunk_type: ChunkType::Variable,
            name: None,
            target: node,
        };
    };

    let name = declarator
        .child_by_field_name("name")
        .filter(|n| n.kind() == "identifier")
        .map(|n| node_text(n, source).to_string());

    match declarator.child_by_field_name("value") {
        Some(value) if is_function_literal(value.kind()) => Described {
            chunk_type: ChunkType::FunctionExpression,
            name,
            target: value,
        },
        _ => Described {
            chunk_type: ChunkType::Variable,
            name,
            target: node,
        },
    }
}

fn is_function_literal(kind: &str) -> bool {
    matches!(
        kind,
        "arrow_function" | "function_expression" | "function" | "generator_function"
    )
}

fn describe_expression<'t>(node: Node<'t>, source: &str) -> Described<'t> {
    let assignment = node
        .named_child(0)
        .filter(|child| child.kind() == "assignment");

    match assignment {
        Some(assignment) => Described {
            chunk_type: ChunkType::Variable,
            name: assignment
                .child_by_field_name("left")
                .filter(|left| matches!(left.kind(), "identifier" | "attribute"))
                .map(|left| node_text(left, source).to_string()),
            target: node,
        },
        None => Described {
            chunk_type: ChunkType::Expression,
            name: None,
            target: node,
        },
    }
}

/// `name` field, else the first identifier-like child
fn definition_name(node: Node<'_>, source: &str) -> Option<String> {
    if let Some(name) = node.child_by_field_name("name") {
        return non_empty(node_text(name, source));
    }

    let mut cursor = node.walk();
    let found = node.children(&mut cursor).find(|child| {
        matches!(
            child.kind(),
            "identifier" | "type_identifier" | "property_identifier"
        )
    });
    found.and_then(|child| non_empty(node_text(child, source)))
}

fn field_name(node: Node<'_>, source: &str) -> Option<String> {
    if let Some(property) = node
        .child_by_field_name("property")
        .or_else(|| node.child_by_field_name("name"))
    {
        return non_empty(node_text(property, source));
    }

    // Java: int x = 1, y; → first declarator
    node.child_by_field_name("declarator")
        .and_then(|declarator| declarator.child_by_field_name("name"))
        .and_then(|name| non_empty(node_text(name, source)))
}

fn non_empty(text: &str) -> Option<String> {
    let text = text.trim();
    (!text.is_empty()).then(|| text.to_string())
}

/// 1-indexed inclusive line span; a span ending at column 0 ends on the previous line
fn line_span(node: Node<'_>) -> (usize, usize) {
    let start = node.start_position().row + 1;
    let end_pos = node.end_position();
    let end = if end_pos.column == 0 && end_pos.row + 1 > start {
        end_pos.row
    } else {
        end_pos.row + 1
    };
    (start, end)
}

/// Source text spanned by a node
pub(crate) fn node_text<'s>(node: Node<'_>, source: &'s str) -> &'s str {
    source.get(node.byte_range()).unwrap_or_default()
}

/// Strip one layer of matching quotes
pub(crate) fn unquote(text: &str) -> &str {
    for quote in ['"', '\'', '`'] {
        if let Some(inner) = text
            .strip_prefix(quote)
            .and_then(|rest| rest.strip_suffix(quote))
        {
            return inner;
        }
    }
    text
}
