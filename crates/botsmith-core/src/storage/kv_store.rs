//! Key-value store trait.
//!
//! Defines the interface for string-keyed, string-valued persistence.
//! Implementations live in botsmith-infra (SQLite) and in [`super::memory`].

use std::sync::Arc;

use botsmith_types::error::RepositoryError;

/// Trait for key-value persistent storage addressed by plain string keys.
///
/// Values are opaque strings (callers store JSON). There is no concurrency
/// control: the last `set` on a key wins.
/// Uses RPITIT (native async fn in traits, Rust 2024 edition).
pub trait KvStore: Send + Sync {
    /// Get a value by key. Returns None if the key does not exist.
    fn get(
        &self,
        key: &str,
    ) -> impl std::future::Future<Output = Result<Option<String>, RepositoryError>> + Send;

    /// Set a value for a key (upsert).
    fn set(
        &self,
        key: &str,
        value: &str,
    ) -> impl std::future::Future<Output = Result<(), RepositoryError>> + Send;

    /// Remove a key. No-op if the key does not exist.
    fn remove(
        &self,
        key: &str,
    ) -> impl std::future::Future<Output = Result<(), RepositoryError>> + Send;
}

/// Shared handles delegate to the inner store, so one store can back the
/// bot list, the knowledge base and the theme preference at once.
impl<T: KvStore> KvStore for Arc<T> {
    fn get(
        &self,
        key: &str,
    ) -> impl std::future::Future<Output = Result<Option<String>, RepositoryError>> + Send {
        (**self).get(key)
    }

    fn set(
        &self,
        key: &str,
        value: &str,
    ) -> impl std::future::Future<Output = Result<(), RepositoryError>> + Send {
        (**self).set(key, value)
    }

    fn remove(
        &self,
        key: &str,
    ) -> impl std::future::Future<Output = Result<(), RepositoryError>> + Send {
        (**self).remove(key)
    }
}
