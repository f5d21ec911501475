use serde::{Deserialize, Serialize};

/// One import declaration entry in a file.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct Import {
    pub id: i64,
    pub file_id: i64,
    pub import_path: String,
    /// May be empty (no alias), `"_"` (blank import), or `"."` (wildcard).
    pub alias: String,
}

/// Insert payload for an import row. Imports are replaced wholesale per file
/// (delete-then-insert), so there is no natural-key upsert.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct NewImport {
    pub import_path: String,
    pub alias: String,
}
