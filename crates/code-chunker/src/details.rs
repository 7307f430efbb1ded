//! Per-language details hook: parameters, return types, async/generator
//! flags, decorators and documentation for grammars that expose them.

use crate::extract::node_text;
use crate::language::Language;
use crate::types::{ChunkDetails, Param};
use tree_sitter::Node;

/// Extracts optional details for a chunk.
///
/// `root` is the chunk root; `target` is the definition the chunk is named
/// after (the same node unless the root wraps it, as `export` or Python
/// decorators do).
pub trait DetailsHook: Sync {
    fn details(&self, root: Node<'_>, target: Node<'_>, source: &str) -> Option<ChunkDetails>;
}

/// Hook for a language, if its grammar carries the information
#[must_use]
pub fn hook_for(language: Language) -> Option<&'static dyn DetailsHook> {
    match language {
        Language::JavaScript | Language::TypeScript => Some(&EcmaDetails),
        Language::Python => Some(&PythonDetails),
        Language::Java => None,
    }
}

struct EcmaDetails;

impl EcmaDetails {
    fn is_function(kind: &str) -> bool {
        matches!(
            kind,
            "function_declaration"
                | "generator_function_declaration"
                | "function_expression"
                | "function"
                | "generator_function"
                | "arrow_function"
                | "function_signature"
                | "method_definition"
        )
    }

    fn is_class(kind: &str) -> bool {
        matches!(
            kind,
            "class_declaration" | "abstract_class_declaration" | "class"
        )
    }

    fn params(target: Node<'_>, source: &str) -> Vec<Param> {
        // `x => x * 2` has a bare `parameter` instead of a list
        if let Some(single) = target.child_by_field_name("parameter") {
            return vec![Param {
                name: node_text(single, source).to_string(),
                type_annotation: None,
            }];
        }

        let Some(list) = target.child_by_field_name("parameters") else {
            return Vec::new();
        };

        let mut params = Vec::new();
        let mut cursor = list.walk();
        for param in list.named_children(&mut cursor) {
            let (name_node, type_node) = match param.kind() {
                "comment" | "decorator" => continue,
                "assignment_pattern" => (param.child_by_field_name("left"), None),
                "required_parameter" | "optional_parameter" => (
                    param.child_by_field_name("pattern"),
                    param.child_by_field_name("type"),
                ),
                _ => (Some(param), None),
            };
            let Some(name_node) = name_node else {
                continue;
            };
            params.push(Param {
                name: node_text(name_node, source).to_string(),
                type_annotation: type_node.map(|t| type_annotation_text(t, source)),
            });
        }
        params
    }

    fn decorators(root: Node<'_>, target: Node<'_>, source: &str) -> Vec<String> {
        let mut decorators = Vec::new();
        for node in [root, target] {
            let mut cursor = node.walk();
            for child in node.children(&mut cursor) {
                if child.kind() == "decorator" {
                    decorators.push(node_text(child, source).to_string());
                }
            }
            if root == target {
                break;
            }
        }
        decorators
    }

    /// Contiguous comment block directly above the chunk
    fn leading_comment(root: Node<'_>, source: &str) -> Option<String> {
        let mut lines = Vec::new();
        let mut next_row = root.start_position().row;
        let mut current = root.prev_sibling();

        while let Some(node) = current {
            if node.kind() != "comment" || node.end_position().row + 1 < next_row {
                break;
            }
            // `foo(); // note` belongs to the statement before it
            let trails_code = node.prev_sibling().is_some_and(|prev| {
                prev.kind() != "comment" && prev.end_position().row == node.start_position().row
            });
            if trails_code {
                break;
            }
            lines.push(node_text(node, source));
            next_row = node.start_position().row;
            current = node.prev_sibling();
        }

        if lines.is_empty() {
            return None;
        }
        lines.reverse();
        Some(lines.join("\n"))
    }
}

impl DetailsHook for EcmaDetails {
    fn details(&self, root: Node<'_>, target: Node<'_>, source: &str) -> Option<ChunkDetails> {
        let kind = target.kind();
        let mut details = ChunkDetails {
            decorators: Self::decorators(root, target, source),
            documentation: Self::leading_comment(root, source),
            ..Default::default()
        };

        if Self::is_function(kind) {
            details.params = Self::params(target, source);
            details.return_type = target
                .child_by_field_name("return_type")
                .map(|t| type_annotation_text(t, source));
            details.is_async = has_token(target, "async");
            details.is_generator = kind.contains("generator") || has_token(target, "*");
        } else if !Self::is_class(kind) {
            return None;
        }

        (!details.is_empty()).then_some(details)
    }
}

struct PythonDetails;

impl PythonDetails {
    fn params(target: Node<'_>, source: &str) -> Vec<Param> {
        let Some(list) = target.child_by_field_name("parameters") else {
            return Vec::new();
        };

        let mut params = Vec::new();
        let mut cursor = list.walk();
        for param in list.named_children(&mut cursor) {
            let (name_node, type_node) = match param.kind() {
                "identifier" | "list_splat_pattern" | "dictionary_splat_pattern" => {
                    (Some(param), None)
                }
                "typed_parameter" => (
                    first_named(param),
                    param.child_by_field_name("type"),
                ),
                "default_parameter" => (param.child_by_field_name("name"), None),
                "typed_default_parameter" => (
                    param.child_by_field_name("name"),
                    param.child_by_field_name("type"),
                ),
                _ => continue,
            };
            let Some(name_node) = name_node else {
                continue;
            };
            params.push(Param {
                name: node_text(name_node, source).to_string(),
                type_annotation: type_node.map(|t| node_text(t, source).to_string()),
            });
        }
        params
    }

    fn docstring(target: Node<'_>, source: &str) -> Option<String> {
        let body = target.child_by_field_name("body")?;
        let first = body.named_child(0)?;
        if first.kind() != "expression_statement" {
            return None;
        }
        let literal = first.named_child(0)?;
        if literal.kind() != "string" {
            return None;
        }
        let text = strip_python_quotes(node_text(literal, source)).trim();
        (!text.is_empty()).then(|| text.to_string())
    }

    /// `yield` anywhere in the body, ignoring nested scopes
    fn yields(target: Node<'_>) -> bool {
        let Some(body) = target.child_by_field_name("body") else {
            return false;
        };
        let mut stack = vec![body];
        while let Some(node) = stack.pop() {
            match node.kind() {
                "yield" => return true,
                "function_definition" | "class_definition" | "lambda" => continue,
                _ => {}
            }
            let mut cursor = node.walk();
            stack.extend(node.named_children(&mut cursor));
        }
        false
    }
}

impl DetailsHook for PythonDetails {
    fn details(&self, root: Node<'_>, target: Node<'_>, source: &str) -> Option<ChunkDetails> {
        let mut details = ChunkDetails::default();

        if root.kind() == "decorated_definition" {
            let mut cursor = root.walk();
            details.decorators = root
                .named_children(&mut cursor)
                .filter(|c| c.kind() == "decorator")
                .map(|c| node_text(c, source).to_string())
                .collect();
        }

        match target.kind() {
            "function_definition" => {
                details.params = Self::params(target, source);
                details.return_type = target
                    .child_by_field_name("return_type")
                    .map(|t| node_text(t, source).to_string());
                details.is_async = has_token(target, "async");
                details.is_generator = Self::yields(target);
                details.documentation = Self::docstring(target, source);
            }
            "class_definition" => {
                details.documentation = Self::docstring(target, source);
            }
            _ => return None,
        }

        (!details.is_empty()).then_some(details)
    }
}

fn has_token(node: Node<'_>, token: &str) -> bool {
    let mut cursor = node.walk();
    let found = node
        .children(&mut cursor)
        .any(|c| !c.is_named() && c.kind() == token);
    found
}

fn first_named(node: Node<'_>) -> Option<Node<'_>> {
    node.named_child(0)
}

/// `: number` → `number`
fn type_annotation_text(node: Node<'_>, source: &str) -> String {
    node_text(node, source)
        .trim_start()
        .trim_start_matches(':')
        .trim()
        .to_string()
}

fn strip_python_quotes(literal: &str) -> &str {
    let body = literal
        .trim_start_matches(|c: char| matches!(c, 'r' | 'R' | 'b' | 'B' | 'u' | 'U' | 'f' | 'F'));
    for quote in ["\"\"\"", "'''", "\"", "'"] {
        if let Some(inner) = body
            .strip_prefix(quote)
            .and_then(|rest| rest.strip_suffix(quote))
        {
            return inner;
        }
    }
    body
}
