//! Search filter types and WHERE-clause compilation.
//!
//! Filters compile to SQL fragments with parameter binding — values never
//! appear in the SQL text. Column names come from compile-time constants
//! (enum `as_str`/`flag_column`), so the fragments are safe by
//! construction.

use serde::{Deserialize, Serialize};

use goctx_core::enums::{DddRole, SymbolKind};

/// A scored search hit from one lane of the store.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ScoredChunk {
    pub chunk_id: i64,
    /// Lane-normalized score: cosine similarity or normalized BM25, both
    /// "larger is better".
    pub score: f64,
}

/// Structured search filters pushed down into the store queries.
///
/// Empty collections mean "no constraint".
#[derive(Debug, Clone, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct SearchFilters {
    /// Restrict to chunks whose owning symbol has one of these kinds.
    #[serde(default)]
    pub symbol_kinds: Vec<SymbolKind>,
    /// Restrict to files in one of these packages.
    #[serde(default)]
    pub packages: Vec<String>,
    /// Restrict to file paths matching this glob (SQLite `GLOB` semantics).
    #[serde(default)]
    pub file_pattern: Option<String>,
    /// Restrict to chunks whose owning symbol carries one of these DDD
    /// roles.
    #[serde(default)]
    pub ddd_roles: Vec<DddRole>,
}

impl SearchFilters {
    /// True when no filter is set.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.symbol_kinds.is_empty()
            && self.packages.is_empty()
            && self.file_pattern.is_none()
            && self.ddd_roles.is_empty()
    }

    /// Append `AND ...` fragments to a query over the standard join aliases
    /// (`c` = chunks, `f` = files, `s` = symbols), pushing bound values onto
    /// `params` in fragment order.
    pub(crate) fn compile(&self, sql: &mut String, params: &mut Vec<libsql::Value>) {
        if !self.symbol_kinds.is_empty() {
            sql.push_str(" AND s.kind IN (");
            push_placeholders(sql, self.symbol_kinds.len());
            sql.push(')');
            for kind in &self.symbol_kinds {
                params.push(libsql::Value::from(kind.as_str().to_string()));
            }
        }
        if !self.packages.is_empty() {
            sql.push_str(" AND f.package_name IN (");
            push_placeholders(sql, self.packages.len());
            sql.push(')');
            for package in &self.packages {
                params.push(libsql::Value::from(package.clone()));
            }
        }
        if let Some(pattern) = &self.file_pattern {
            sql.push_str(" AND f.file_path GLOB ?");
            params.push(libsql::Value::from(pattern.clone()));
        }
        if !self.ddd_roles.is_empty() {
            sql.push_str(" AND (");
            for (i, role) in self.ddd_roles.iter().enumerate() {
                if i > 0 {
                    sql.push_str(" OR ");
                }
                sql.push_str("s.");
                sql.push_str(role.flag_column());
                sql.push_str(" = 1");
            }
            sql.push(')');
        }
    }
}

fn push_placeholders(sql: &mut String, count: usize) {
    for i in 0..count {
        if i > 0 {
            sql.push_str(", ");
        }
        sql.push('?');
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn empty_filters_compile_to_nothing() {
        let filters = SearchFilters::default();
        assert!(filters.is_empty());
        let mut sql = String::new();
        let mut params = Vec::new();
        filters.compile(&mut sql, &mut params);
        assert_eq!(sql, "");
        assert!(params.is_empty());
    }

    #[test]
    fn kinds_and_packages_bind_values() {
        let filters = SearchFilters {
            symbol_kinds: vec![SymbolKind::Function, SymbolKind::Method],
            packages: vec!["shop".to_string()],
            ..Default::default()
        };
        let mut sql = String::new();
        let mut params = Vec::new();
        filters.compile(&mut sql, &mut params);
        assert_eq!(
            sql,
            " AND s.kind IN (?, ?) AND f.package_name IN (?)"
        );
        assert_eq!(params.len(), 3);
    }

    #[test]
    fn ddd_roles_use_flag_columns() {
        let filters = SearchFilters {
            ddd_roles: vec![DddRole::Repository, DddRole::Handler],
            ..Default::default()
        };
        let mut sql = String::new();
        let mut params = Vec::new();
        filters.compile(&mut sql, &mut params);
        assert_eq!(sql, " AND (s.is_repository = 1 OR s.is_handler = 1)");
        assert!(params.is_empty());
    }

    #[test]
    fn glob_pattern_is_bound_not_interpolated() {
        let filters = SearchFilters {
            file_pattern: Some("internal/*.go".to_string()),
            ..Default::default()
        };
        let mut sql = String::new();
        let mut params = Vec::new();
        filters.compile(&mut sql, &mut params);
        assert_eq!(sql, " AND f.file_path GLOB ?");
        assert_eq!(params.len(), 1);
    }
}
