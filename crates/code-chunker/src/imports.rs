use crate::extract::{node_text, unquote};
use crate::language::LanguagePolicy;
use crate::types::{ImportRecord, ImportSpecifier, SpecifierKind};
use tree_sitter::Node;

/// Collect the file's import list from direct children of the program root.
///
/// Runs independently of chunk traversal, so pruning never hides an import.
/// Only JS/TS grammars produce records.
pub fn extract_imports(root: Node<'_>, source: &str, policy: LanguagePolicy) -> Vec<ImportRecord> {
    if !policy.language.has_import_records() {
        return Vec::new();
    }

    let mut imports = Vec::new();
    let mut cursor = root.walk();
    for child in root.named_children(&mut cursor) {
        if child.kind() != "import_statement" {
            continue;
        }
        match import_record(child, source) {
            Some(record) => imports.push(record),
            None => log::debug!(
                "Import without a module source at line {}",
                child.start_position().row + 1
            ),
        }
    }
    imports
}

fn import_record(node: Node<'_>, source: &str) -> Option<ImportRecord> {
    let mut specifiers = Vec::new();
    let mut module = node.child_by_field_name("source");

    let mut cursor = node.walk();
    for child in node.named_children(&mut cursor) {
        match child.kind() {
            "import_clause" => collect_clause(child, source, &mut specifiers),
            // TypeScript: import fs = require("fs")
            "import_require_clause" => {
                if let Some(local) = first_named_of_kind(child, "identifier") {
                    specifiers.push(ImportSpecifier {
                        kind: SpecifierKind::Default,
                        local: node_text(local, source).to_string(),
                        imported: None,
                    });
                }
                module = module.or_else(|| child.child_by_field_name("source"));
            }
            _ => {}
        }
    }

    let module = module?;
    Some(ImportRecord {
        source: unquote(node_text(module, source)).to_string(),
        specifiers,
    })
}

fn collect_clause(clause: Node<'_>, source: &str, out: &mut Vec<ImportSpecifier>) {
    let mut cursor = clause.walk();
    for child in clause.named_children(&mut cursor) {
        match child.kind() {
            "identifier" => out.push(ImportSpecifier {
                kind: SpecifierKind::Default,
                local: node_text(child, source).to_string(),
                imported: None,
            }),
            "namespace_import" => {
                if let Some(local) = first_named_of_kind(child, "identifier") {
                    out.push(ImportSpecifier {
                        kind: SpecifierKind::Namespace,
                        local: node_text(local, source).to_string(),
                        imported: None,
                    });
                }
            }
            "named_imports" => {
                let mut inner = child.walk();
                for spec in child.named_children(&mut inner) {
                    if spec.kind() != "import_specifier" {
                        continue;
                    }
                    let Some(name) = spec.child_by_field_name("name") else {
                        continue;
                    };
                    let imported = unquote(node_text(name, source)).to_string();
                    let local = spec.child_by_field_name("alias").map_or_else(
                        || imported.clone(),
                        |alias| node_text(alias, source).to_string(),
                    );
                    out.push(ImportSpecifier {
                        kind: SpecifierKind::Named,
                        local,
                        imported: Some(imported),
                    });
                }
            }
            _ => {}
        }
    }
}

fn first_named_of_kind<'t>(node: Node<'t>, kind: &str) -> Option<Node<'t>> {
    let mut cursor = node.walk();
    let found = node.named_children(&mut cursor).find(|c| c.kind() == kind);
    found
}
