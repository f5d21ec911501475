//! Parse output types.

use goctx_core::entities::{NewImport, NewSymbol};
use serde::{Deserialize, Serialize};

/// A captured syntax error. 1-based position of the offending region.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct SyntaxError {
    pub line: u32,
    pub col: u32,
    pub message: String,
}

/// Everything extracted from one Go source file.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct ParseResult {
    /// Package clause identifier; empty when the clause is missing.
    pub package_name: String,
    pub imports: Vec<NewImport>,
    pub symbols: Vec<NewSymbol>,
    /// Syntax errors found while parsing. Non-empty does not mean
    /// `symbols` is empty — extraction is best-effort.
    pub errors: Vec<SyntaxError>,
}

impl ParseResult {
    /// One-line summary of the captured errors, for the file row's
    /// `parse_error` column. `None` when the file parsed cleanly.
    #[must_use]
    pub fn error_summary(&self) -> Option<String> {
        if self.errors.is_empty() {
            return None;
        }
        let first = &self.errors[0];
        if self.errors.len() == 1 {
            Some(format!("line {}: {}", first.line, first.message))
        } else {
            Some(format!(
                "line {}: {} (+{} more)",
                first.line,
                first.message,
                self.errors.len() - 1
            ))
        }
    }
}
