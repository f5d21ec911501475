//! Kind, scope, and mode enums for gocontext.
//!
//! All enums use `snake_case` serialization via `#[serde(rename_all =
//! "snake_case")]` and provide `as_str()` returning the exact string stored
//! in SQL columns.

use serde::{Deserialize, Serialize};
use std::fmt;

// ---------------------------------------------------------------------------
// SymbolKind
// ---------------------------------------------------------------------------

/// Kind of a named program entity extracted by the parser.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SymbolKind {
    Function,
    Method,
    Struct,
    Interface,
    Type,
    Const,
    Var,
    Field,
}

impl SymbolKind {
    /// Return the string representation used in SQL storage.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Function => "function",
            Self::Method => "method",
            Self::Struct => "struct",
            Self::Interface => "interface",
            Self::Type => "type",
            Self::Const => "const",
            Self::Var => "var",
            Self::Field => "field",
        }
    }
}

impl fmt::Display for SymbolKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

// ---------------------------------------------------------------------------
// SymbolScope
// ---------------------------------------------------------------------------

/// Visibility scope of a symbol.
///
/// Go visibility: a name whose first rune is uppercase is exported.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SymbolScope {
    Exported,
    Unexported,
    PackageLocal,
}

impl SymbolScope {
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Exported => "exported",
            Self::Unexported => "unexported",
            Self::PackageLocal => "package_local",
        }
    }

    /// Scope derived from a Go identifier.
    #[must_use]
    pub fn of_name(name: &str) -> Self {
        if name.starts_with(char::is_uppercase) {
            Self::Exported
        } else {
            Self::Unexported
        }
    }
}

impl fmt::Display for SymbolScope {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

// ---------------------------------------------------------------------------
// ChunkType
// ---------------------------------------------------------------------------

/// The kind of source region a chunk covers.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ChunkType {
    Function,
    Method,
    Type,
    Package,
    ConstGroup,
    VarGroup,
}

impl ChunkType {
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Function => "function",
            Self::Method => "method",
            Self::Type => "type",
            Self::Package => "package",
            Self::ConstGroup => "const_group",
            Self::VarGroup => "var_group",
        }
    }

    /// Chunk type for a symbol of the given kind.
    ///
    /// Field symbols are never chunked; callers filter them out before this.
    #[must_use]
    pub const fn for_symbol(kind: SymbolKind) -> Self {
        match kind {
            SymbolKind::Function => Self::Function,
            SymbolKind::Method => Self::Method,
            SymbolKind::Struct | SymbolKind::Interface | SymbolKind::Type => Self::Type,
            SymbolKind::Const => Self::ConstGroup,
            SymbolKind::Var => Self::VarGroup,
            SymbolKind::Field => Self::Package,
        }
    }
}

impl fmt::Display for ChunkType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

// ---------------------------------------------------------------------------
// ChunkStrategy
// ---------------------------------------------------------------------------

/// Chunking strategy. A pipeline parameter, not a stored attribute.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ChunkStrategy {
    /// One chunk per material symbol, whole-file fallback when none.
    #[default]
    FunctionLevel,
    /// Always a single chunk spanning the whole file.
    PackageLevel,
}

// ---------------------------------------------------------------------------
// SearchMode
// ---------------------------------------------------------------------------

/// Search dispatch mode.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SearchMode {
    Vector,
    Keyword,
    #[default]
    Hybrid,
}

impl SearchMode {
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Vector => "vector",
            Self::Keyword => "keyword",
            Self::Hybrid => "hybrid",
        }
    }
}

impl fmt::Display for SearchMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

// ---------------------------------------------------------------------------
// DddRole
// ---------------------------------------------------------------------------

/// Domain-driven-design role of a type symbol.
///
/// Each role corresponds to one Boolean flag column on the symbol row.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum DddRole {
    AggregateRoot,
    Entity,
    ValueObject,
    Repository,
    Service,
    Command,
    Query,
    Handler,
}

impl DddRole {
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::AggregateRoot => "aggregate_root",
            Self::Entity => "entity",
            Self::ValueObject => "value_object",
            Self::Repository => "repository",
            Self::Service => "service",
            Self::Command => "command",
            Self::Query => "query",
            Self::Handler => "handler",
        }
    }

    /// Parse a role name as used in search filters. Returns `None` for
    /// unknown names.
    #[must_use]
    pub fn from_name(name: &str) -> Option<Self> {
        match name {
            "aggregate_root" => Some(Self::AggregateRoot),
            "entity" => Some(Self::Entity),
            "value_object" => Some(Self::ValueObject),
            "repository" => Some(Self::Repository),
            "service" => Some(Self::Service),
            "command" => Some(Self::Command),
            "query" => Some(Self::Query),
            "handler" => Some(Self::Handler),
            _ => None,
        }
    }

    /// The symbol flag column backing this role.
    #[must_use]
    pub const fn flag_column(self) -> &'static str {
        match self {
            Self::AggregateRoot => "is_aggregate_root",
            Self::Entity => "is_entity",
            Self::ValueObject => "is_value_object",
            Self::Repository => "is_repository",
            Self::Service => "is_service",
            Self::Command => "is_command",
            Self::Query => "is_query",
            Self::Handler => "is_handler",
        }
    }
}

impl fmt::Display for DddRole {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}
