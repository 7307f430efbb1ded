use crate::error::{ChunkerError, Result};
use crate::language::LanguagePolicy;
use crate::registry::GrammarRegistry;
use std::sync::Arc;
use tree_sitter::{Node, Tree};

/// Immutable parse result for one file
pub struct SyntaxTree {
    tree: Tree,
    policy: LanguagePolicy,
}

impl SyntaxTree {
    #[must_use]
    pub fn root(&self) -> Node<'_> {
        self.tree.root_node()
    }

    #[must_use]
    pub const fn policy(&self) -> LanguagePolicy {
        self.policy
    }
}

/// Wraps a single parse call against a pooled parser
#[derive(Clone)]
pub struct ParserAdapter {
    registry: Arc<GrammarRegistry>,
}

impl ParserAdapter {
    #[must_use]
    pub const fn new(registry: Arc<GrammarRegistry>) -> Self {
        Self { registry }
    }

    #[must_use]
    pub fn registry(&self) -> &Arc<GrammarRegistry> {
        &self.registry
    }

    /// Parse source text. Trees that needed error recovery are rejected.
    pub fn parse(&self, source: &str, policy: LanguagePolicy) -> Result<SyntaxTree> {
        let tree = {
            let mut parser = self.registry.checkout(policy.grammar)?;
            parser
                .parse(source, None)
                .ok_or_else(|| ChunkerError::parse("parser produced no tree", 1, 1))?
        };

        let root = tree.root_node();
        if root.has_error() {
            let (line, column, message) = match first_error(root) {
                Some(node) if node.is_missing() => (
                    node.start_position().row + 1,
                    node.start_position().column + 1,
                    format!("missing {}", node.kind()),
                ),
                Some(node) => (
                    node.start_position().row + 1,
                    node.start_position().column + 1,
                    "unexpected syntax".to_string(),
                ),
                None => (1, 1, "syntax error".to_string()),
            };
            return Err(ChunkerError::parse(
                format!("{} grammar: {message}", policy.grammar.as_str()),
                line,
                column,
            ));
        }

        Ok(SyntaxTree { tree, policy })
    }
}

/// First ERROR or MISSING node in document order
fn first_error(root: Node<'_>) -> Option<Node<'_>> {
    let mut stack = vec![root];
    while let Some(node) = stack.pop() {
        if node.is_error() || node.is_missing() {
            return Some(node);
        }
        if !node.has_error() {
            continue;
        }
        let mut cursor = node.walk();
        let children: Vec<_> = node.children(&mut cursor).collect();
        stack.extend(children.into_iter().rev());
    }
    None
}
