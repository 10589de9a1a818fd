//! Document store for one (user, bot) knowledge scope.
//!
//! Holds the documents in memory and writes the whole collection back to the
//! key-value store after every mutation. Two writers on the same scope do
//! not merge: the last write wins.

use botsmith_types::bot::prefixed_id;
use botsmith_types::error::RepositoryError;
use botsmith_types::knowledge::{Document, KnowledgeScope};

use crate::storage::keys::knowledge_key;
use crate::storage::kv_store::KvStore;
use crate::storage::memory::InMemoryKvStore;

/// Ordered collection of knowledge documents owned by one scope.
pub struct DocumentStore<K: KvStore> {
    kv: K,
    key: String,
    docs: Vec<Document>,
}

impl DocumentStore<InMemoryKvStore> {
    /// An empty store that persists nowhere. Embedded widgets start with one.
    pub fn ephemeral() -> Self {
        Self {
            kv: InMemoryKvStore::new(),
            key: knowledge_key(&KnowledgeScope::default()),
            docs: Vec::new(),
        }
    }
}

impl<K: KvStore> DocumentStore<K> {
    /// Open the store for `scope`, loading any persisted documents.
    ///
    /// Stored content that is not a JSON array of documents is treated as an
    /// empty collection.
    pub async fn open(kv: K, scope: &KnowledgeScope) -> Result<Self, RepositoryError> {
        let key = knowledge_key(scope);
        if scope.is_shared() {
            tracing::debug!(key = %key, "opening shared knowledge scope");
        }

        let docs = match kv.get(&key).await? {
            Some(raw) => serde_json::from_str::<Vec<Document>>(&raw).unwrap_or_else(|e| {
                tracing::warn!(key = %key, error = %e, "discarding unreadable knowledge base");
                Vec::new()
            }),
            None => Vec::new(),
        };

        Ok(Self { kv, key, docs })
    }

    /// The storage key this store reads and writes.
    pub fn key(&self) -> &str {
        &self.key
    }

    /// Documents in insertion order.
    pub fn list(&self) -> &[Document] {
        &self.docs
    }

    pub fn len(&self) -> usize {
        self.docs.len()
    }

    pub fn is_empty(&self) -> bool {
        self.docs.is_empty()
    }

    /// Add a document. Blank or whitespace-only text is ignored and returns `None`.
    pub async fn add(&mut self, text: &str) -> Result<Option<Document>, RepositoryError> {
        if text.trim().is_empty() {
            return Ok(None);
        }

        let doc = Document {
            id: prefixed_id("doc"),
            text: text.to_string(),
        };
        let mut next = self.docs.clone();
        next.push(doc.clone());
        self.commit(next).await?;

        Ok(Some(doc))
    }

    /// Remove a document by id. Returns whether it existed.
    pub async fn remove(&mut self, id: &str) -> Result<bool, RepositoryError> {
        if !self.docs.iter().any(|d| d.id == id) {
            return Ok(false);
        }
        let next = self.docs.iter().filter(|d| d.id != id).cloned().collect();
        self.commit(next).await?;
        Ok(true)
    }

    /// Remove every document in this scope.
    pub async fn clear(&mut self) -> Result<(), RepositoryError> {
        self.commit(Vec::new()).await
    }

    /// Persist `next` and only then make it the in-memory state.
    async fn commit(&mut self, next: Vec<Document>) -> Result<(), RepositoryError> {
        let raw = serde_json::to_string(&next)
            .map_err(|e| RepositoryError::Serialization(e.to_string()))?;
        self.kv.set(&self.key, &raw).await?;
        self.docs = next;
        Ok(())
    }
}
