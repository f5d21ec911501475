//! Shared test utilities for goctx-db integration tests.

use chrono::Utc;

use goctx_core::entities::{NewChunk, NewEmbedding, NewFile, NewSymbol};
use goctx_core::enums::{ChunkType, SymbolKind, SymbolScope};
use goctx_core::hash::{chunk_token_count, content_hash};

use crate::ContextDb;
use crate::store::ContextStore;

/// Create an in-memory store with migrations applied.
pub(crate) async fn test_store() -> ContextStore {
    let db = ContextDb::open_local(":memory:").await.unwrap();
    ContextStore::from_db(db)
}

pub(crate) fn test_file(project_id: i64, path: &str, hash: &str) -> NewFile {
    NewFile {
        project_id,
        file_path: path.to_string(),
        package_name: "testpkg".to_string(),
        content_hash: hash.to_string(),
        mod_time: Utc::now(),
        size_bytes: 64,
        parse_error: None,
    }
}

pub(crate) fn test_symbol(name: &str, kind: SymbolKind, line: u32) -> NewSymbol {
    NewSymbol {
        name: name.to_string(),
        kind,
        package_name: "testpkg".to_string(),
        signature: format!("func {name}()"),
        doc_comment: String::new(),
        scope: SymbolScope::of_name(name),
        receiver: String::new(),
        start_line: line,
        start_col: 1,
        end_line: line + 2,
        end_col: 2,
        ddd: goctx_core::entities::DddFlags::default(),
    }
}

pub(crate) fn test_chunk(content: &str, start: u32, end: u32) -> NewChunk {
    NewChunk {
        symbol_id: None,
        content: content.to_string(),
        content_hash: content_hash(content),
        token_count: chunk_token_count(content, "", ""),
        start_line: start,
        end_line: end,
        context_before: String::new(),
        context_after: String::new(),
        chunk_type: ChunkType::Function,
    }
}

/// Ids of the rows seeded by [`seed_corpus`].
pub(crate) struct SeededCorpus {
    pub project_id: i64,
    /// Function chunk in `pkg/order.go`, embedding `[1, 0, 0]`.
    pub chunk_a: i64,
    /// Method chunk in `pkg/order.go`, embedding `[0.8, 0.2, 0]`.
    pub chunk_b: i64,
    /// Repository-flagged interface chunk in `internal/repo.go`,
    /// embedding `[0.5, 0.5, 0]`.
    pub chunk_repo: i64,
}

/// Seed a small searchable corpus: two files, three symbol-owned chunks
/// plus one package chunk, all with 3-dim embeddings.
pub(crate) async fn seed_corpus(store: &ContextStore) -> SeededCorpus {
    let project = store.create_project("/repo/corpus", "", "").await.unwrap();

    let order_file = store
        .upsert_file(&test_file(project.id, "pkg/order.go", "hash-order"))
        .await
        .unwrap();
    let repo_file = store
        .upsert_file(&NewFile {
            package_name: "repo".to_string(),
            ..test_file(project.id, "internal/repo.go", "hash-repo")
        })
        .await
        .unwrap();

    let create_order = store
        .upsert_symbol(
            order_file.id,
            &test_symbol("CreateOrder", SymbolKind::Function, 5),
        )
        .await
        .unwrap();
    let apply = store
        .upsert_symbol(order_file.id, &{
            let mut sym = test_symbol("Apply", SymbolKind::Method, 15);
            sym.receiver = "Order".to_string();
            sym
        })
        .await
        .unwrap();
    let repo_sym = store
        .upsert_symbol(repo_file.id, &{
            let mut sym = test_symbol("OrderRepository", SymbolKind::Interface, 4);
            sym.ddd.is_repository = true;
            sym
        })
        .await
        .unwrap();

    let mut chunk = test_chunk("func CreateOrder builds a new order", 5, 9);
    chunk.symbol_id = Some(create_order.id);
    let chunk_a = store.upsert_chunk(order_file.id, &chunk).await.unwrap();

    let mut chunk = test_chunk("func (o *Order) Apply applies the order discount", 15, 20);
    chunk.symbol_id = Some(apply.id);
    chunk.chunk_type = ChunkType::Method;
    let chunk_b = store.upsert_chunk(order_file.id, &chunk).await.unwrap();

    let mut chunk = test_chunk("type OrderRepository interface fetches orders", 4, 8);
    chunk.symbol_id = Some(repo_sym.id);
    chunk.chunk_type = ChunkType::Type;
    let chunk_repo = store.upsert_chunk(repo_file.id, &chunk).await.unwrap();

    let package_chunk = store
        .upsert_chunk(order_file.id, &{
            let mut c = test_chunk("package shop", 1, 1);
            c.chunk_type = ChunkType::Package;
            c
        })
        .await
        .unwrap();

    for (chunk_id, vector) in [
        (chunk_a.id, vec![1.0_f32, 0.0, 0.0]),
        (chunk_b.id, vec![0.8, 0.2, 0.0]),
        (chunk_repo.id, vec![0.5, 0.5, 0.0]),
        (package_chunk.id, vec![0.0, 0.0, 1.0]),
    ] {
        store
            .upsert_embedding(
                chunk_id,
                &NewEmbedding {
                    vector,
                    provider: "test".to_string(),
                    model: "hash-fold".to_string(),
                },
            )
            .await
            .unwrap();
    }

    SeededCorpus {
        project_id: project.id,
        chunk_a: chunk_a.id,
        chunk_b: chunk_b.id,
        chunk_repo: chunk_repo.id,
    }
}
