//! Knowledge base types: documents, retrieval results, and store scopes.

use serde::{Deserialize, Serialize};

use crate::bot::UserId;

/// A short text document in a bot's knowledge base. Immutable once created.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Document {
    pub id: String,
    pub text: String,
}

/// A document paired with its relevance score for one query.
///
/// Transient: recomputed per query and never persisted.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct RetrievalResult {
    pub document: Document,
    pub score: f32,
}

/// The (user, bot) pair a knowledge base belongs to.
///
/// Either half may be missing; a missing user maps to the shared `guest`
/// scope and a missing bot to `default`. Those shared scopes are not safe
/// across sessions.
#[derive(Debug, Clone, Default, PartialEq, Eq, Hash)]
pub struct KnowledgeScope {
    pub user_id: Option<UserId>,
    pub bot_id: Option<String>,
}

impl KnowledgeScope {
    pub fn new(user_id: Option<UserId>, bot_id: Option<String>) -> Self {
        Self { user_id, bot_id }
    }

    /// Scope for a signed-in user's bot.
    pub fn for_bot(user_id: &UserId, bot_id: &str) -> Self {
        Self {
            user_id: Some(user_id.clone()),
            bot_id: Some(bot_id.to_string()),
        }
    }

    /// Whether this scope falls back to a shared guest/default bucket.
    pub fn is_shared(&self) -> bool {
        self.user_id.is_none() || self.bot_id.is_none()
    }
}
