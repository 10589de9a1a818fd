//! In-process key-value store backed by a concurrent hash map.
//!
//! Used for guest and embedded sessions (nothing outlives the process) and
//! as the test double for every service built on [`KvStore`].

use std::sync::Arc;

use dashmap::DashMap;

use botsmith_types::error::RepositoryError;

use super::kv_store::KvStore;

/// Volatile `KvStore`. Clones share the same entries.
#[derive(Debug, Clone, Default)]
pub struct InMemoryKvStore {
    entries: Arc<DashMap<String, String>>,
}

impl InMemoryKvStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Number of stored keys.
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

impl KvStore for InMemoryKvStore {
    async fn get(&self, key: &str) -> Result<Option<String>, RepositoryError> {
        Ok(self.entries.get(key).map(|v| v.value().clone()))
    }

    async fn set(&self, key: &str, value: &str) -> Result<(), RepositoryError> {
        self.entries.insert(key.to_string(), value.to_string());
        Ok(())
    }

    async fn remove(&self, key: &str) -> Result<(), RepositoryError> {
        self.entries.remove(key);
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_set_get_remove() {
        let store = InMemoryKvStore::new();
        assert!(store.get("k").await.unwrap().is_none());

        store.set("k", "v1").await.unwrap();
        store.set("k", "v2").await.unwrap();
        assert_eq!(store.get("k").await.unwrap().as_deref(), Some("v2"));

        store.remove("k").await.unwrap();
        store.remove("k").await.unwrap();
        assert!(store.get("k").await.unwrap().is_none());
    }

    #[tokio::test]
    async fn test_clones_share_entries() {
        let a = InMemoryKvStore::new();
        let b = a.clone();
        a.set("shared", "yes").await.unwrap();
        assert_eq!(b.get("shared").await.unwrap().as_deref(), Some("yes"));
        assert_eq!(b.len(), 1);
    }

    #[tokio::test]
    async fn test_arc_delegates() {
        let store = Arc::new(InMemoryKvStore::new());
        KvStore::set(&store, "k", "v").await.unwrap();
        assert_eq!(KvStore::get(&store, "k").await.unwrap().as_deref(), Some("v"));
    }
}
