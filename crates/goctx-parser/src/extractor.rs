//! Go symbol extraction — `KindMatcher`-first strategy.
//!
//! Extracts the package clause, import declarations, functions, methods,
//! type declarations (struct, interface, alias), constants, variables, and
//! struct fields, with Go-specific handling for receivers, exported
//! detection, and doc comments.

use ast_grep_core::Node;
use ast_grep_core::matcher::KindMatcher;
use ast_grep_core::ops::Any;
use ast_grep_language::SupportLang;

use crate::types::SyntaxError;
use goctx_core::entities::{DddFlags, NewImport, NewSymbol};
use goctx_core::enums::{SymbolKind, SymbolScope};

const GO_TOP_KINDS: &[&str] = &[
    "function_declaration",
    "method_declaration",
    "type_declaration",
    "const_declaration",
    "var_declaration",
];

/// Extract the package clause identifier. Empty when the clause is missing.
#[must_use]
pub fn extract_package_name<D: ast_grep_core::Doc<Lang = SupportLang>>(
    root: &ast_grep_core::AstGrep<D>,
) -> String {
    let matcher = KindMatcher::new("package_clause", SupportLang::Go);
    root.root()
        .find(&matcher)
        .and_then(|clause| {
            clause
                .children()
                .find(|c| c.kind().as_ref() == "package_identifier")
                .map(|n| n.text().to_string())
        })
        .unwrap_or_default()
}

/// Extract all import entries in declaration order.
#[must_use]
pub fn extract_imports<D: ast_grep_core::Doc<Lang = SupportLang>>(
    root: &ast_grep_core::AstGrep<D>,
) -> Vec<NewImport> {
    let matcher = KindMatcher::new("import_declaration", SupportLang::Go);
    let mut imports = Vec::new();
    for decl in root.root().find_all(&matcher) {
        for child in decl.children() {
            let k = child.kind();
            if k.as_ref() == "import_spec" {
                if let Some(import) = process_import_spec(&child) {
                    imports.push(import);
                }
            } else if k.as_ref() == "import_spec_list" {
                for spec in child.children() {
                    if spec.kind().as_ref() == "import_spec"
                        && let Some(import) = process_import_spec(&spec)
                    {
                        imports.push(import);
                    }
                }
            }
        }
    }
    imports
}

fn process_import_spec<D: ast_grep_core::Doc>(node: &Node<D>) -> Option<NewImport> {
    let mut alias = String::new();
    let mut path = None;
    for child in node.children() {
        let k = child.kind();
        match k.as_ref() {
            "package_identifier" | "blank_identifier" | "dot" => {
                alias = child.text().to_string();
            }
            "interpreted_string_literal" | "raw_string_literal" => {
                path = Some(strip_string_literal(&child.text()));
            }
            _ => {}
        }
    }
    path.map(|import_path| NewImport { import_path, alias })
}

/// Strip surrounding `"…"` or `` `…` `` from a Go string literal.
fn strip_string_literal(text: &str) -> String {
    text.trim_matches(|c| c == '"' || c == '`').to_string()
}

/// Extract all symbols from a Go source tree.
#[must_use]
pub fn extract_symbols<D: ast_grep_core::Doc<Lang = SupportLang>>(
    root: &ast_grep_core::AstGrep<D>,
    package_name: &str,
) -> Vec<NewSymbol> {
    let mut symbols = Vec::new();
    let matchers: Vec<KindMatcher> = GO_TOP_KINDS
        .iter()
        .map(|k| KindMatcher::new(k, SupportLang::Go))
        .collect();
    let matcher = Any::new(matchers);

    for node in root.root().find_all(&matcher) {
        let kind = node.kind();
        match kind.as_ref() {
            "function_declaration" => {
                if let Some(symbol) = process_function(&node, package_name) {
                    symbols.push(symbol);
                }
            }
            "method_declaration" => {
                if let Some(symbol) = process_method(&node, package_name) {
                    symbols.push(symbol);
                }
            }
            "type_declaration" => {
                symbols.extend(process_type_declaration(&node, package_name));
            }
            "const_declaration" => {
                symbols.extend(process_value_declaration(
                    &node,
                    "const_spec",
                    SymbolKind::Const,
                    package_name,
                ));
            }
            "var_declaration" => {
                symbols.extend(process_value_declaration(
                    &node,
                    "var_spec",
                    SymbolKind::Var,
                    package_name,
                ));
            }
            _ => {}
        }
    }
    symbols
}

/// Capture ERROR nodes left by the tree-sitter parse as syntax errors.
#[must_use]
pub fn collect_syntax_errors<D: ast_grep_core::Doc<Lang = SupportLang>>(
    root: &ast_grep_core::AstGrep<D>,
) -> Vec<SyntaxError> {
    let matcher = KindMatcher::new("ERROR", SupportLang::Go);
    root.root()
        .find_all(&matcher)
        .map(|node| {
            let text = node.text().to_string();
            let snippet: String = text.chars().take(40).collect();
            SyntaxError {
                line: node.start_pos().line() as u32 + 1,
                col: node.start_pos().column(&node) as u32 + 1,
                message: format!("syntax error near `{}`", snippet.trim()),
            }
        })
        .collect()
}

// ── function_declaration ──────────────────────────────────────────

fn process_function<D: ast_grep_core::Doc>(node: &Node<D>, pkg: &str) -> Option<NewSymbol> {
    let name = node
        .children()
        .find(|c| c.kind().as_ref() == "identifier")
        .map(|n| n.text().to_string())?;

    Some(new_symbol(
        node,
        name,
        SymbolKind::Function,
        pkg,
        String::new(),
    ))
}

// ── method_declaration ────────────────────────────────────────────

fn process_method<D: ast_grep_core::Doc>(node: &Node<D>, pkg: &str) -> Option<NewSymbol> {
    // Method name is a field_identifier child.
    let name = node
        .children()
        .find(|c| c.kind().as_ref() == "field_identifier")
        .map(|n| n.text().to_string())?;

    let receiver = extract_receiver(node).unwrap_or_default();
    Some(new_symbol(node, name, SymbolKind::Method, pkg, receiver))
}

/// Extract the receiver type name of a method, pointer star stripped.
fn extract_receiver<D: ast_grep_core::Doc>(node: &Node<D>) -> Option<String> {
    // First parameter_list is the receiver.
    let receiver_list = node
        .children()
        .find(|c| c.kind().as_ref() == "parameter_list")?;

    for child in receiver_list.children() {
        if child.kind().as_ref() == "parameter_declaration" {
            for sub in child.children() {
                let k = sub.kind();
                let kr = k.as_ref();
                if kr == "pointer_type" || kr == "type_identifier" || kr == "generic_type" {
                    return Some(sub.text().trim_start_matches('*').to_string());
                }
            }
        }
    }
    None
}

// ── type_declaration ──────────────────────────────────────────────

fn process_type_declaration<D: ast_grep_core::Doc>(node: &Node<D>, pkg: &str) -> Vec<NewSymbol> {
    let mut symbols = Vec::new();
    let doc = extract_go_doc(node);

    for child in node.children() {
        let k = child.kind();
        match k.as_ref() {
            "type_spec" => symbols.extend(process_type_spec(&child, &doc, pkg)),
            "type_alias" => {
                if let Some(name) = child
                    .children()
                    .find(|c| c.kind().as_ref() == "type_identifier")
                    .map(|n| n.text().to_string())
                {
                    let mut symbol = new_symbol(&child, name, SymbolKind::Type, pkg, String::new());
                    symbol.doc_comment = doc.clone();
                    symbols.push(symbol);
                }
            }
            _ => {}
        }
    }
    symbols
}

/// One type_spec yields the type symbol itself plus, for structs, one
/// `field` symbol per declared field.
fn process_type_spec<D: ast_grep_core::Doc>(
    node: &Node<D>,
    doc: &str,
    pkg: &str,
) -> Vec<NewSymbol> {
    let Some(name) = node
        .children()
        .find(|c| c.kind().as_ref() == "type_identifier")
        .map(|n| n.text().to_string())
    else {
        return Vec::new();
    };

    let mut kind = SymbolKind::Type;
    let mut fields = Vec::new();
    for child in node.children() {
        match child.kind().as_ref() {
            "struct_type" => {
                kind = SymbolKind::Struct;
                fields = extract_field_symbols(&child, pkg);
            }
            "interface_type" => kind = SymbolKind::Interface,
            _ => {}
        }
    }

    let mut symbol = new_symbol(node, name, kind, pkg, String::new());
    symbol.doc_comment = doc.to_string();

    let mut out = vec![symbol];
    out.append(&mut fields);
    out
}

/// Struct fields become `field` symbols. The chunker never chunks them;
/// they exist for symbol search and related-context summaries.
fn extract_field_symbols<D: ast_grep_core::Doc>(
    struct_node: &Node<D>,
    pkg: &str,
) -> Vec<NewSymbol> {
    let mut out = Vec::new();
    for child in struct_node.children() {
        if child.kind().as_ref() != "field_declaration_list" {
            continue;
        }
        for field in child.children() {
            if field.kind().as_ref() != "field_declaration" {
                continue;
            }
            // Named field (`Port int`) or embedded type (`Config`, `*Logger`).
            let name = field
                .children()
                .find(|c| c.kind().as_ref() == "field_identifier")
                .or_else(|| {
                    field
                        .children()
                        .find(|c| c.kind().as_ref() == "type_identifier")
                })
                .map(|n| n.text().to_string());
            if let Some(name) = name {
                out.push(new_symbol(&field, name, SymbolKind::Field, pkg, String::new()));
            }
        }
    }
    out
}

// ── const_declaration / var_declaration ───────────────────────────

/// Shared shape for `const` and `var` declarations: one symbol per spec,
/// direct children or wrapped in a `(...)` spec list.
fn process_value_declaration<D: ast_grep_core::Doc>(
    node: &Node<D>,
    spec_kind: &str,
    kind: SymbolKind,
    pkg: &str,
) -> Vec<NewSymbol> {
    let list_kind = format!("{spec_kind}_list");
    let parent_doc = extract_go_doc(node);
    let mut symbols = Vec::new();

    let mut push_spec = |spec: &Node<D>| {
        let Some(name) = spec
            .children()
            .find(|c| c.kind().as_ref() == "identifier")
            .map(|n| n.text().to_string())
        else {
            return;
        };
        let mut symbol = new_symbol(spec, name, kind, pkg, String::new());
        let own_doc = extract_go_doc(spec);
        symbol.doc_comment = if own_doc.is_empty() {
            parent_doc.clone()
        } else {
            own_doc
        };
        symbols.push(symbol);
    };

    for child in node.children() {
        let k = child.kind();
        if k.as_ref() == spec_kind {
            push_spec(&child);
        } else if k.as_ref() == list_kind {
            for spec in child.children() {
                if spec.kind().as_ref() == spec_kind {
                    push_spec(&spec);
                }
            }
        }
    }
    symbols
}

// ── Shared helpers ────────────────────────────────────────────────

fn new_symbol<D: ast_grep_core::Doc>(
    node: &Node<D>,
    name: String,
    kind: SymbolKind,
    pkg: &str,
    receiver: String,
) -> NewSymbol {
    let scope = SymbolScope::of_name(&name);
    let doc = extract_go_doc(node);
    NewSymbol {
        signature: extract_signature(node),
        doc_comment: doc,
        scope,
        receiver,
        start_line: node.start_pos().line() as u32 + 1,
        start_col: node.start_pos().column(node) as u32 + 1,
        end_line: node.end_pos().line() as u32 + 1,
        end_col: node.end_pos().column(node) as u32 + 1,
        ddd: DddFlags::default(),
        name,
        kind,
        package_name: pkg.to_string(),
    }
}

/// Extract signature: everything before the first `{`, whitespace-normalized
/// so formatting differences never change the stored signature.
fn extract_signature<D: ast_grep_core::Doc>(node: &Node<D>) -> String {
    let text = node.text().to_string();
    let end = text.find('{').unwrap_or(text.len());
    text[..end]
        .split_whitespace()
        .collect::<Vec<_>>()
        .join(" ")
}

/// Extract Go doc comments by walking backward through sibling `comment`
/// nodes.
///
/// Go convention: doc comments are `//` comments immediately preceding a
/// declaration, with no blank lines in between.
fn extract_go_doc<D: ast_grep_core::Doc>(node: &Node<D>) -> String {
    let mut comments = Vec::new();
    let mut current = node.prev();
    while let Some(sibling) = current {
        if sibling.kind().as_ref() == "comment" {
            let text = sibling.text().to_string();
            if let Some(stripped) = text.strip_prefix("//") {
                comments.push(stripped.trim().to_string());
            }
        } else {
            break;
        }
        current = sibling.prev();
    }
    comments.reverse();
    comments.join("\n")
}
