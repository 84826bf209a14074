//! CRUD operations for long-form knowledge documents.
//!
//! Documents are keyed by caller-chosen ids so the editor can address a
//! stable record across saves. `upsert_document` preserves `created_at` on
//! existing records and refreshes `updated_at` on every write.

use chrono::Utc;
use surrealdb::engine::local::Db;
use surrealdb::Surreal;

use super::error::StoreError;
use super::models::KnowledgeDocument;

/// Record id for a freshly created document (millisecond timestamp, same
/// shape the site editor produces).
pub fn new_document_id() -> String {
    format!("doc_{}", Utc::now().timestamp_millis())
}

/// List all knowledge documents in store iteration order.
///
/// This is the order `build_context` concatenates them in.
pub async fn list_documents(db: &Surreal<Db>) -> Result<Vec<KnowledgeDocument>, StoreError> {
    let docs: Vec<KnowledgeDocument> = db
        .query("SELECT *, meta::id(id) as id FROM knowledge_document")
        .await
        .map_err(|e| StoreError::Query(e.to_string()))?
        .take(0)
        .map_err(|e| StoreError::Query(e.to_string()))?;

    Ok(docs)
}

/// Get a single knowledge document by id.
pub async fn get_document(
    db: &Surreal<Db>,
    id: &str,
) -> Result<Option<KnowledgeDocument>, StoreError> {
    let doc: Option<KnowledgeDocument> = db
        .query("SELECT *, meta::id(id) as id FROM type::thing('knowledge_document', $id)")
        .bind(("id", id.to_string()))
        .await
        .map_err(|e| StoreError::Query(e.to_string()))?
        .take(0)
        .map_err(|e| StoreError::Query(e.to_string()))?;

    Ok(doc)
}

/// Create or replace a knowledge document under the given id.
///
/// An existing record keeps its `created_at`; a new record gets both
/// timestamps set to now.
pub async fn upsert_document(
    db: &Surreal<Db>,
    id: &str,
    doc: &KnowledgeDocument,
) -> Result<(), StoreError> {
    let existing = get_document(db, id).await?;
    let created_at = existing.and_then(|d| d.created_at);

    db.query(
        r#"
        UPSERT type::thing('knowledge_document', $id) CONTENT {
            title: $title,
            content: $content,
            category: $category,
            created_at: $created_at ?? time::now(),
            updated_at: time::now()
        };
    "#,
    )
    .bind(("id", id.to_string()))
    .bind(("title", doc.title.clone()))
    .bind(("content", doc.content.clone()))
    .bind(("category", doc.category.clone()))
    .bind(("created_at", created_at))
    .await
    .map_err(|e| StoreError::Query(e.to_string()))?;

    Ok(())
}

/// Delete a knowledge document.
pub async fn delete_document(db: &Surreal<Db>, id: &str) -> Result<(), StoreError> {
    db.query("DELETE type::thing('knowledge_document', $id)")
        .bind(("id", id.to_string()))
        .await
        .map_err(|e| StoreError::Query(e.to_string()))?;

    Ok(())
}
