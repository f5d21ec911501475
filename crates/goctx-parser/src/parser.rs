//! Parse entry points: file/source → [`ParseResult`].

use std::path::Path;

use ast_grep_core::tree_sitter::StrDoc;
use ast_grep_language::{LanguageExt, SupportLang};

use crate::ddd;
use crate::error::ParserError;
use crate::extractor;
use crate::types::ParseResult;
use goctx_core::enums::SymbolKind;

/// The concrete AST tree type for Go sources.
pub type AstTree = ast_grep_core::AstGrep<StrDoc<SupportLang>>;

/// Parse Go source into an ast-grep tree.
#[must_use]
pub fn parse_tree(source: &str) -> AstTree {
    SupportLang::Go.ast_grep(source)
}

/// Parse a Go file from disk.
///
/// # Errors
///
/// Returns [`ParserError::Io`] when the file cannot be read. Syntax errors
/// never fail the call.
pub fn parse_file(path: &Path) -> Result<ParseResult, ParserError> {
    let source = std::fs::read_to_string(path).map_err(|source| ParserError::Io {
        path: path.display().to_string(),
        source,
    })?;
    Ok(parse_go_source(&source))
}

/// Parse Go source text. Never fails: a malformed source yields partial
/// symbols with `errors` populated.
#[must_use]
pub fn parse_go_source(source: &str) -> ParseResult {
    let tree = parse_tree(source);

    let package_name = extractor::extract_package_name(&tree);
    let imports = extractor::extract_imports(&tree);
    let mut symbols = extractor::extract_symbols(&tree, &package_name);
    let errors = extractor::collect_syntax_errors(&tree);

    // DDD classification applies to type-shaped symbols only.
    for symbol in &mut symbols {
        if matches!(
            symbol.kind,
            SymbolKind::Struct | SymbolKind::Interface | SymbolKind::Type
        ) {
            symbol.ddd = ddd::classify(&symbol.name);
        }
    }

    ParseResult {
        package_name,
        imports,
        symbols,
        errors,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use goctx_core::enums::{SymbolScope, SymbolKind};
    use pretty_assertions::assert_eq;

    const SAMPLE: &str = r#"package shop

import (
	"fmt"
	str "strings"
	_ "embed"
)

// Greet prints a greeting.
func Greet(name string) {
	fmt.Println(str.ToUpper(name))
}

// User is a shop customer.
type User struct {
	ID   string
	Name string
}

// GetID returns the user id.
func (u *User) GetID() string { return u.ID }

func (u *User) setName(n string) { u.Name = n }

type OrderRepository interface {
	Find(id string) (*User, error)
}

const MaxItems = 100

var defaultTimeout = 30
"#;

    #[test]
    fn extracts_package_and_imports() {
        let result = parse_go_source(SAMPLE);
        assert_eq!(result.package_name, "shop");
        assert_eq!(result.imports.len(), 3);
        assert_eq!(result.imports[0].import_path, "fmt");
        assert_eq!(result.imports[0].alias, "");
        assert_eq!(result.imports[1].import_path, "strings");
        assert_eq!(result.imports[1].alias, "str");
        assert_eq!(result.imports[2].import_path, "embed");
        assert_eq!(result.imports[2].alias, "_");
        assert!(result.errors.is_empty());
    }

    #[test]
    fn extracts_functions_and_methods() {
        let result = parse_go_source(SAMPLE);
        let greet = result
            .symbols
            .iter()
            .find(|s| s.name == "Greet")
            .expect("Greet extracted");
        assert_eq!(greet.kind, SymbolKind::Function);
        assert_eq!(greet.scope, SymbolScope::Exported);
        assert_eq!(greet.receiver, "");
        assert_eq!(greet.doc_comment, "Greet prints a greeting.");
        assert!(greet.signature.starts_with("func Greet"));
        assert!(greet.start_line >= 1);
        assert!(greet.end_line >= greet.start_line);

        let get_id = result
            .symbols
            .iter()
            .find(|s| s.name == "GetID")
            .expect("GetID extracted");
        assert_eq!(get_id.kind, SymbolKind::Method);
        assert_eq!(get_id.receiver, "User");

        let set_name = result
            .symbols
            .iter()
            .find(|s| s.name == "setName")
            .expect("setName extracted");
        assert_eq!(set_name.scope, SymbolScope::Unexported);
    }

    #[test]
    fn extracts_types_consts_vars_and_fields() {
        let result = parse_go_source(SAMPLE);
        let user = result.symbols.iter().find(|s| s.name == "User").unwrap();
        assert_eq!(user.kind, SymbolKind::Struct);
        assert_eq!(user.doc_comment, "User is a shop customer.");

        let repo = result
            .symbols
            .iter()
            .find(|s| s.name == "OrderRepository")
            .unwrap();
        assert_eq!(repo.kind, SymbolKind::Interface);

        let max = result.symbols.iter().find(|s| s.name == "MaxItems").unwrap();
        assert_eq!(max.kind, SymbolKind::Const);

        let timeout = result
            .symbols
            .iter()
            .find(|s| s.name == "defaultTimeout")
            .unwrap();
        assert_eq!(timeout.kind, SymbolKind::Var);

        let fields: Vec<_> = result
            .symbols
            .iter()
            .filter(|s| s.kind == SymbolKind::Field)
            .collect();
        assert_eq!(fields.len(), 2);
        assert!(fields.iter().any(|f| f.name == "ID"));
        assert!(fields.iter().any(|f| f.name == "Name"));
    }

    #[test]
    fn ddd_flags_set_on_type_symbols() {
        let result = parse_go_source(SAMPLE);
        let user = result.symbols.iter().find(|s| s.name == "User").unwrap();
        assert!(user.ddd.is_entity);

        let repo = result
            .symbols
            .iter()
            .find(|s| s.name == "OrderRepository")
            .unwrap();
        assert!(repo.ddd.is_repository);

        // Methods never carry type flags.
        let get_id = result.symbols.iter().find(|s| s.name == "GetID").unwrap();
        assert!(!get_id.ddd.any());
    }

    #[test]
    fn malformed_source_yields_errors_not_failure() {
        let result = parse_go_source("package broken\n\nfunc Incomplete( {\n");
        assert_eq!(result.package_name, "broken");
        assert!(!result.errors.is_empty());
        assert!(result.error_summary().is_some());
    }

    #[test]
    fn empty_package_file() {
        let result = parse_go_source("package main\n");
        assert_eq!(result.package_name, "main");
        assert!(result.imports.is_empty());
        assert!(result.symbols.is_empty());
        assert!(result.errors.is_empty());
    }
}
