//! SQLite key-value store implementation.
//!
//! Implements `KvStore` from `botsmith-core` over the `kv_store` table.
//! Values are stored verbatim; callers decide what the strings mean.

use botsmith_core::storage::kv_store::KvStore;
use botsmith_types::error::RepositoryError;
use chrono::Utc;
use sqlx::Row;

use super::pool::DatabasePool;

/// SQLite-backed implementation of `KvStore`.
#[derive(Clone)]
pub struct SqliteKvStore {
    pool: DatabasePool,
}

impl SqliteKvStore {
    pub fn new(pool: DatabasePool) -> Self {
        Self { pool }
    }

    /// All keys starting with `prefix`, sorted.
    pub async fn keys_with_prefix(&self, prefix: &str) -> Result<Vec<String>, RepositoryError> {
        let pattern = format!("{}%", escape_like(prefix));
        let rows = sqlx::query("SELECT key FROM kv_store WHERE key LIKE ? ESCAPE '\\' ORDER BY key")
            .bind(pattern)
            .fetch_all(&self.pool.reader)
            .await
            .map_err(|e| RepositoryError::Query(e.to_string()))?;

        rows.iter()
            .map(|row| {
                row.try_get::<String, _>("key")
                    .map_err(|e| RepositoryError::Query(e.to_string()))
            })
            .collect()
    }
}

fn escape_like(s: &str) -> String {
    s.replace('\\', "\\\\").replace('%', "\\%").replace('_', "\\_")
}

impl KvStore for SqliteKvStore {
    async fn get(&self, key: &str) -> Result<Option<String>, RepositoryError> {
        let row = sqlx::query("SELECT value FROM kv_store WHERE key = ?")
            .bind(key)
            .fetch_optional(&self.pool.reader)
            .await
            .map_err(|e| RepositoryError::Query(e.to_string()))?;

        row.map(|row| {
            row.try_get::<String, _>("value")
                .map_err(|e| RepositoryError::Query(e.to_string()))
        })
        .transpose()
    }

    async fn set(&self, key: &str, value: &str) -> Result<(), RepositoryError> {
        let now = Utc::now().to_rfc3339();
        sqlx::query(
            r#"INSERT INTO kv_store (key, value, updated_at)
               VALUES (?, ?, ?)
               ON CONFLICT (key) DO UPDATE SET value = excluded.value, updated_at = excluded.updated_at"#,
        )
        .bind(key)
        .bind(value)
        .bind(&now)
        .execute(&self.pool.writer)
        .await
        .map_err(|e| RepositoryError::Query(e.to_string()))?;

        Ok(())
    }

    async fn remove(&self, key: &str) -> Result<(), RepositoryError> {
        sqlx::query("DELETE FROM kv_store WHERE key = ?")
            .bind(key)
            .execute(&self.pool.writer)
            .await
            .map_err(|e| RepositoryError::Query(e.to_string()))?;

        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use botsmith_core::knowledge::store::DocumentStore;
    use botsmith_types::bot::UserId;
    use botsmith_types::knowledge::KnowledgeScope;

    async fn test_store() -> (SqliteKvStore, tempfile::TempDir) {
        let dir = tempfile::tempdir().unwrap();
        let pool = DatabasePool::open_in(dir.path()).await.unwrap();
        (SqliteKvStore::new(pool), dir)
    }

    #[tokio::test]
    async fn test_set_get_roundtrip() {
        let (store, _dir) = test_store().await;
        store.set("theme", "dark").await.unwrap();
        assert_eq!(store.get("theme").await.unwrap().as_deref(), Some("dark"));
    }

    #[tokio::test]
    async fn test_get_nonexistent_returns_none() {
        let (store, _dir) = test_store().await;
        assert!(store.get("missing").await.unwrap().is_none());
    }

    #[tokio::test]
    async fn test_set_upserts() {
        let (store, _dir) = test_store().await;
        store.set("activeBotId_u1", "bot-1").await.unwrap();
        store.set("activeBotId_u1", "bot-2").await.unwrap();
        assert_eq!(
            store.get("activeBotId_u1").await.unwrap().as_deref(),
            Some("bot-2")
        );
    }

    #[tokio::test]
    async fn test_remove() {
        let (store, _dir) = test_store().await;
        store.set("k", "v").await.unwrap();
        store.remove("k").await.unwrap();
        assert!(store.get("k").await.unwrap().is_none());
        // Removing an absent key is fine.
        store.remove("k").await.unwrap();
    }

    #[tokio::test]
    async fn test_keys_with_prefix_escapes_wildcards() {
        let (store, _dir) = test_store().await;
        store.set("rag-docs-u1-a", "[]").await.unwrap();
        store.set("rag-docs-u1-b", "[]").await.unwrap();
        store.set("rag-docs-u10-a", "[]").await.unwrap();
        store.set("botConfigs_u1", "[]").await.unwrap();

        let keys = store.keys_with_prefix("rag-docs-u1-").await.unwrap();
        assert_eq!(keys, vec!["rag-docs-u1-a", "rag-docs-u1-b"]);

        store.set("a_b", "1").await.unwrap();
        store.set("axb", "1").await.unwrap();
        assert_eq!(store.keys_with_prefix("a_").await.unwrap(), vec!["a_b"]);
    }

    #[tokio::test]
    async fn test_document_store_survives_reopen() {
        let (store, _dir) = test_store().await;
        let scope = KnowledgeScope::for_bot(&UserId::new("u1"), "bot-1");

        let mut docs = DocumentStore::open(store.clone(), &scope).await.unwrap();
        docs.add("We ship worldwide").await.unwrap();

        let reopened = DocumentStore::open(store, &scope).await.unwrap();
        assert_eq!(reopened.len(), 1);
        assert_eq!(reopened.list()[0].text, "We ship worldwide");
    }
}
