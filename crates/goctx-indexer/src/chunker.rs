//! Source → chunk transformation.
//!
//! One chunk per material symbol (fields never chunk), with a canonical
//! package/import header as `context_before`. A file that yields no symbol
//! chunks gets a single package-level chunk spanning the whole file.
//!
//! `context_after` stays empty in the mainline; [`related_context`] computes
//! the summary a future population would use. Chunk identity hashes
//! `content` only, so context changes can never invalidate stored chunks.

use goctx_core::entities::{NewChunk, NewImport, NewSymbol};
use goctx_core::enums::{ChunkStrategy, ChunkType, SymbolKind};
use goctx_core::hash::{chunk_token_count, content_hash};
use goctx_parser::ParseResult;

/// A chunk plus the index of its owning symbol in the parse result, for
/// the indexer to wire `symbol_id` after symbol upserts.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DraftChunk {
    pub chunk: NewChunk,
    pub symbol_index: Option<usize>,
}

/// Chunking pipeline stage.
#[derive(Debug, Clone, Copy)]
pub struct Chunker {
    strategy: ChunkStrategy,
    /// Chunks above this token count are reported but not split.
    token_cap: u32,
}

impl Chunker {
    #[must_use]
    pub const fn new(strategy: ChunkStrategy, token_cap: u32) -> Self {
        Self {
            strategy,
            token_cap,
        }
    }

    /// Chunk a parsed file. Output is ordered by `start_line`.
    #[must_use]
    pub fn chunk_source(&self, source: &str, parse: &ParseResult) -> Vec<DraftChunk> {
        let lines: Vec<&str> = source.lines().collect();
        if lines.is_empty() {
            return Vec::new();
        }

        let context_before = build_context_before(&parse.package_name, &parse.imports);

        let mut chunks = match self.strategy {
            ChunkStrategy::PackageLevel => Vec::new(),
            ChunkStrategy::FunctionLevel => {
                self.symbol_chunks(&lines, &context_before, &parse.symbols)
            }
        };

        // Whole-file fallback: no material symbols, or package-level
        // strategy.
        if chunks.is_empty() {
            let end_line = lines.len() as u32;
            chunks.push(DraftChunk {
                chunk: self.build_chunk(
                    lines.join("\n"),
                    1,
                    end_line,
                    &context_before,
                    ChunkType::Package,
                ),
                symbol_index: None,
            });
        }

        chunks.sort_by_key(|draft| draft.chunk.start_line);
        chunks
    }

    fn symbol_chunks(
        &self,
        lines: &[&str],
        context_before: &str,
        symbols: &[NewSymbol],
    ) -> Vec<DraftChunk> {
        let mut seen_spans = std::collections::HashSet::new();
        let mut chunks = Vec::new();

        for (index, symbol) in symbols.iter().enumerate() {
            if symbol.kind == SymbolKind::Field {
                continue;
            }
            // Malformed parser output is silently dropped.
            if symbol.start_line == 0 || symbol.start_line as usize > lines.len() {
                continue;
            }
            let end_line = symbol.end_line.min(lines.len() as u32).max(symbol.start_line);
            if !seen_spans.insert((symbol.start_line, end_line)) {
                continue;
            }

            let content = lines[(symbol.start_line - 1) as usize..end_line as usize].join("\n");
            chunks.push(DraftChunk {
                chunk: self.build_chunk(
                    content,
                    symbol.start_line,
                    end_line,
                    context_before,
                    ChunkType::for_symbol(symbol.kind),
                ),
                symbol_index: Some(index),
            });
        }
        chunks
    }

    fn build_chunk(
        &self,
        content: String,
        start_line: u32,
        end_line: u32,
        context_before: &str,
        chunk_type: ChunkType,
    ) -> NewChunk {
        let token_count = chunk_token_count(&content, context_before, "");
        if token_count > self.token_cap {
            tracing::warn!(
                start_line,
                end_line,
                token_count,
                cap = self.token_cap,
                "chunk exceeds token cap; stored unsplit"
            );
        }
        NewChunk {
            symbol_id: None,
            content_hash: content_hash(&content),
            token_count,
            content,
            start_line,
            end_line,
            context_before: context_before.to_string(),
            context_after: String::new(),
            chunk_type,
        }
    }
}

impl Default for Chunker {
    fn default() -> Self {
        Self::new(ChunkStrategy::FunctionLevel, 1000)
    }
}

/// Split a chunk that exceeds the token cap.
///
/// Contractually a no-op today: oversized chunks are reported and stored
/// whole. The signature is the seam a future splitter slots into.
#[must_use]
pub fn split_oversized(chunk: NewChunk) -> Vec<NewChunk> {
    vec![chunk]
}

/// Canonical package/import header attached to every chunk of a file.
///
/// Imports are one entry per line in lexical path order; an alias is
/// rendered only when it is a real name (not `_` or `.`).
#[must_use]
pub fn build_context_before(package_name: &str, imports: &[NewImport]) -> String {
    let mut out = String::new();
    if !package_name.is_empty() {
        out.push_str("package ");
        out.push_str(package_name);
        out.push('\n');
    }
    if !imports.is_empty() {
        if !out.is_empty() {
            out.push('\n');
        }
        let mut sorted: Vec<&NewImport> = imports.iter().collect();
        sorted.sort_by(|a, b| a.import_path.cmp(&b.import_path));

        out.push_str("import (\n");
        for import in sorted {
            out.push('\t');
            if !import.alias.is_empty() && import.alias != "_" && import.alias != "." {
                out.push_str(&import.alias);
                out.push(' ');
            }
            out.push('"');
            out.push_str(&import.import_path);
            out.push_str("\"\n");
        }
        out.push(')');
    }
    out.trim_end().to_string()
}

/// Short textual summary of a symbol's surroundings.
///
/// For a method: its receiver type's signature. For a struct/interface:
/// the signatures of all methods whose receiver is the type. Exposed for
/// future `context_after` population; not wired into chunks.
#[must_use]
pub fn related_context(symbol: &NewSymbol, all: &[NewSymbol]) -> String {
    match symbol.kind {
        SymbolKind::Method => all
            .iter()
            .find(|candidate| {
                candidate.name == symbol.receiver
                    && matches!(
                        candidate.kind,
                        SymbolKind::Struct | SymbolKind::Interface | SymbolKind::Type
                    )
            })
            .map(|receiver| receiver.signature.clone())
            .unwrap_or_default(),
        SymbolKind::Struct | SymbolKind::Interface => {
            let methods: Vec<&str> = all
                .iter()
                .filter(|candidate| candidate.receiver == symbol.name)
                .map(|method| method.signature.as_str())
                .collect();
            methods.join("\n")
        }
        _ => String::new(),
    }
}
