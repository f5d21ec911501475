//! Parser error types for goctx-parser.

/// Errors that can occur around source parsing.
///
/// Syntax errors are never raised — they are captured in
/// `ParseResult.errors` and the parse succeeds with partial symbols.
#[derive(Debug, thiserror::Error)]
pub enum ParserError {
    #[error("io error reading {path}: {source}")]
    Io {
        path: String,
        #[source]
        source: std::io::Error,
    },
}
