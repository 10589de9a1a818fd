//! Per-bot knowledge base: document storage and retrieval.
//!
//! - `DocumentStore`: (user, bot) scoped document collection persisted
//!   through a [`KvStore`](crate::storage::kv_store::KvStore)
//! - `Retriever` / `LexicalRetriever`: ranks documents for a query

pub mod retriever;
pub mod store;
