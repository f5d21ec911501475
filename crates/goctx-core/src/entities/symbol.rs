use serde::{Deserialize, Serialize};

use crate::enums::{DddRole, SymbolKind, SymbolScope};

/// The eight Boolean DDD role flags carried by every symbol row.
///
/// Only struct/interface/type symbols are ever classified; all flags stay
/// `false` for the rest.
#[derive(Debug, Clone, Copy, Default, Serialize, Deserialize, PartialEq, Eq)]
pub struct DddFlags {
    pub is_aggregate_root: bool,
    pub is_entity: bool,
    pub is_value_object: bool,
    pub is_repository: bool,
    pub is_service: bool,
    pub is_command: bool,
    pub is_query: bool,
    pub is_handler: bool,
}

impl DddFlags {
    /// True when any role flag is set.
    #[must_use]
    pub const fn any(self) -> bool {
        self.is_aggregate_root
            || self.is_entity
            || self.is_value_object
            || self.is_repository
            || self.is_service
            || self.is_command
            || self.is_query
            || self.is_handler
    }

    /// Whether the flag backing `role` is set.
    #[must_use]
    pub const fn has(self, role: DddRole) -> bool {
        match role {
            DddRole::AggregateRoot => self.is_aggregate_root,
            DddRole::Entity => self.is_entity,
            DddRole::ValueObject => self.is_value_object,
            DddRole::Repository => self.is_repository,
            DddRole::Service => self.is_service,
            DddRole::Command => self.is_command,
            DddRole::Query => self.is_query,
            DddRole::Handler => self.is_handler,
        }
    }
}

/// A named program entity extracted from one file.
///
/// Natural key: (`file_id`, `name`, `start_line`, `start_col`). Positions
/// are 1-based; a method carries a non-empty `receiver` and no other kind
/// does.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct Symbol {
    pub id: i64,
    pub file_id: i64,
    pub name: String,
    pub kind: SymbolKind,
    pub package_name: String,
    pub signature: String,
    pub doc_comment: String,
    pub scope: SymbolScope,
    /// Receiver type name for methods (pointer star stripped), else empty.
    pub receiver: String,
    pub start_line: u32,
    pub start_col: u32,
    pub end_line: u32,
    pub end_col: u32,
    pub ddd: DddFlags,
}

/// Upsert payload for a symbol row.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct NewSymbol {
    pub name: String,
    pub kind: SymbolKind,
    pub package_name: String,
    pub signature: String,
    pub doc_comment: String,
    pub scope: SymbolScope,
    pub receiver: String,
    pub start_line: u32,
    pub start_col: u32,
    pub end_line: u32,
    pub end_col: u32,
    pub ddd: DddFlags,
}

impl NewSymbol {
    /// Positions a store will accept: 1-based, ordered spans.
    ///
    /// Rows violating this are unrepresentable and must be dropped before
    /// persistence.
    #[must_use]
    pub const fn has_valid_span(&self) -> bool {
        self.start_line >= 1
            && self.start_col >= 1
            && self.end_line >= self.start_line
            && self.end_col >= 1
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn flags_any_and_has() {
        let mut flags = DddFlags::default();
        assert!(!flags.any());
        flags.is_repository = true;
        assert!(flags.any());
        assert!(flags.has(DddRole::Repository));
        assert!(!flags.has(DddRole::Entity));
    }

    #[test]
    fn span_validation() {
        let mut sym = NewSymbol {
            name: "Greet".to_string(),
            kind: SymbolKind::Function,
            package_name: "main".to_string(),
            signature: "func Greet()".to_string(),
            doc_comment: String::new(),
            scope: SymbolScope::Exported,
            receiver: String::new(),
            start_line: 3,
            start_col: 1,
            end_line: 5,
            end_col: 2,
            ddd: DddFlags::default(),
        };
        assert!(sym.has_valid_span());
        sym.start_line = 0;
        assert!(!sym.has_valid_span());
        sym.start_line = 6;
        assert!(!sym.has_valid_span());
    }
}
