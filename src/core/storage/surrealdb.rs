//! Embedded SurrealDB wrapper for the support store.
//!
//! One RocksDB-backed instance holds every collection: knowledge entries,
//! knowledge documents, settings singletons, and chat transcripts. The
//! wrapper owns the connection and applies the schema on open; the collection
//! modules operate on the raw handle via [`SupportStore::db`].

use std::path::Path;

use surrealdb::engine::local::{Db, RocksDb};
use surrealdb::Surreal;

use super::error::{StoreError, StoreResult};

const NAMESPACE: &str = "haidesk";
const DATABASE: &str = "support";

/// Schema applied on every open. Settings documents may carry any subset of
/// fields (merge writes), so tables stay SCHEMALESS; indexes cover the two
/// filtered reads (admin list by category, history by operator).
const SCHEMA: &str = r#"
    DEFINE TABLE IF NOT EXISTS knowledge_item SCHEMALESS;
    DEFINE INDEX IF NOT EXISTS knowledge_item_category ON knowledge_item FIELDS category;

    DEFINE TABLE IF NOT EXISTS knowledge_document SCHEMALESS;

    DEFINE TABLE IF NOT EXISTS settings SCHEMALESS;

    DEFINE TABLE IF NOT EXISTS chat_message SCHEMALESS;
    DEFINE INDEX IF NOT EXISTS chat_message_user ON chat_message FIELDS user_id;

    DEFINE TABLE IF NOT EXISTS chat_session SCHEMALESS;

    DEFINE TABLE IF NOT EXISTS chat_rating SCHEMALESS;
"#;

/// Handle to the embedded document store. Cloning shares the connection.
#[derive(Clone)]
pub struct SupportStore {
    db: Surreal<Db>,
}

impl SupportStore {
    /// Open (or create) the store at the given directory and apply the
    /// schema. Fails if the directory cannot be created or locked.
    pub async fn open(path: impl AsRef<Path>) -> StoreResult<Self> {
        let path = path.as_ref();

        let db = Surreal::new::<RocksDb>(path)
            .await
            .map_err(|e| StoreError::Init(format!("open {}: {e}", path.display())))?;

        db.use_ns(NAMESPACE)
            .use_db(DATABASE)
            .await
            .map_err(|e| StoreError::Init(e.to_string()))?;

        db.query(SCHEMA)
            .await
            .map_err(|e| StoreError::Init(format!("schema: {e}")))?;

        log::debug!("Support store opened at {}", path.display());
        Ok(Self { db })
    }

    /// Raw database handle for the collection modules.
    pub fn db(&self) -> &Surreal<Db> {
        &self.db
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde::Deserialize;
    use tempfile::TempDir;

    #[tokio::test]
    async fn test_open_and_roundtrip() {
        let dir = TempDir::new().unwrap();
        let store = SupportStore::open(dir.path().join("store")).await.unwrap();

        store
            .db()
            .query("CREATE settings:probe CONTENT { marker: 1 }")
            .await
            .unwrap();

        #[derive(Debug, Deserialize)]
        struct Probe {
            marker: i64,
        }

        let probe: Option<Probe> = store
            .db()
            .query("SELECT marker FROM settings:probe")
            .await
            .unwrap()
            .take(0)
            .unwrap();
        assert_eq!(probe.map(|p| p.marker), Some(1));
    }

    #[tokio::test]
    async fn test_schema_is_idempotent() {
        let dir = TempDir::new().unwrap();
        let store = SupportStore::open(dir.path().join("store")).await.unwrap();

        // IF NOT EXISTS guards make a second apply harmless.
        store.db().query(SCHEMA).await.unwrap();
    }
}
