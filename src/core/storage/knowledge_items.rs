//! CRUD operations for knowledge Q&A entries.
//!
//! Two list orders exist on purpose: the retrieval pipeline reads in store
//! iteration order (first match wins, no ranking), while the admin view
//! groups entries by category.

use serde::Deserialize;
use surrealdb::engine::local::Db;
use surrealdb::Surreal;

use super::error::StoreError;
use super::models::KnowledgeItem;

/// Create a knowledge entry and return its record id.
///
/// # Errors
///
/// Returns `StoreError::Query` if the insert fails.
pub async fn create_knowledge_item(
    db: &Surreal<Db>,
    item: &KnowledgeItem,
) -> Result<String, StoreError> {
    // Helper struct to deserialize the created record ID
    #[derive(Debug, Deserialize)]
    struct CreatedRecord {
        id: surrealdb::sql::Thing,
    }

    let query = r#"
        CREATE knowledge_item CONTENT {
            question: $question,
            answer: $answer,
            keywords: $keywords,
            category: $category,
            created_at: time::now(),
            updated_at: time::now()
        };
    "#;

    let mut response = db
        .query(query)
        .bind(("question", item.question.clone()))
        .bind(("answer", item.answer.clone()))
        .bind(("keywords", item.keywords.clone()))
        .bind(("category", item.category.clone()))
        .await
        .map_err(|e| StoreError::Query(e.to_string()))?;

    let record: Option<CreatedRecord> = response
        .take(0)
        .map_err(|e| StoreError::Query(e.to_string()))?;

    record
        .map(|r| r.id.id.to_string())
        .ok_or_else(|| StoreError::Query("Failed to get created ID".to_string()))
}

/// List all knowledge entries in store iteration order.
///
/// This is the order the retrieval pipeline scans; it is not ranked.
pub async fn list_knowledge_items(db: &Surreal<Db>) -> Result<Vec<KnowledgeItem>, StoreError> {
    let items: Vec<KnowledgeItem> = db
        .query("SELECT *, meta::id(id) as id FROM knowledge_item")
        .await
        .map_err(|e| StoreError::Query(e.to_string()))?
        .take(0)
        .map_err(|e| StoreError::Query(e.to_string()))?;

    Ok(items)
}

/// List all knowledge entries grouped by category (admin list order).
pub async fn list_knowledge_items_by_category(
    db: &Surreal<Db>,
) -> Result<Vec<KnowledgeItem>, StoreError> {
    let items: Vec<KnowledgeItem> = db
        .query("SELECT *, meta::id(id) as id FROM knowledge_item ORDER BY category")
        .await
        .map_err(|e| StoreError::Query(e.to_string()))?
        .take(0)
        .map_err(|e| StoreError::Query(e.to_string()))?;

    Ok(items)
}

/// Update a knowledge entry. The record id is stable; `updated_at` is
/// refreshed automatically.
pub async fn update_knowledge_item(
    db: &Surreal<Db>,
    id: &str,
    item: &KnowledgeItem,
) -> Result<(), StoreError> {
    db.query(
        r#"
        UPDATE type::thing('knowledge_item', $id) MERGE {
            question: $question,
            answer: $answer,
            keywords: $keywords,
            category: $category,
            updated_at: time::now()
        };
    "#,
    )
    .bind(("id", id.to_string()))
    .bind(("question", item.question.clone()))
    .bind(("answer", item.answer.clone()))
    .bind(("keywords", item.keywords.clone()))
    .bind(("category", item.category.clone()))
    .await
    .map_err(|e| StoreError::Query(e.to_string()))?;

    Ok(())
}

/// Delete a knowledge entry.
pub async fn delete_knowledge_item(db: &Surreal<Db>, id: &str) -> Result<(), StoreError> {
    db.query("DELETE type::thing('knowledge_item', $id)")
        .bind(("id", id.to_string()))
        .await
        .map_err(|e| StoreError::Query(e.to_string()))?;

    Ok(())
}

/// Count knowledge entries (used by the seeding guard).
pub async fn count_knowledge_items(db: &Surreal<Db>) -> Result<usize, StoreError> {
    let result: Option<i64> = db
        .query("SELECT count() FROM knowledge_item GROUP ALL")
        .await
        .map_err(|e| StoreError::Query(e.to_string()))?
        .take((0, "count"))
        .map_err(|e| StoreError::Query(e.to_string()))?;

    Ok(result.unwrap_or(0) as usize)
}
