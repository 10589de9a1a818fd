//! In-memory registry of embedded chat sessions.
//!
//! Each session owns a decoded bot, its conversation, and an empty
//! ephemeral knowledge base. Sessions live until deleted, until they sit
//! idle past the configured TTL, or until the process exits.

use std::sync::Arc;
use std::time::{Duration, Instant};

use dashmap::DashMap;
use tokio::sync::Mutex;
use tokio::task::JoinHandle;

use botsmith_core::chat::service::ChatService;
use botsmith_core::chat::session::ConversationSession;
use botsmith_core::knowledge::store::DocumentStore;
use botsmith_core::storage::memory::InMemoryKvStore;
use botsmith_types::bot::BotConfig;

pub struct EmbedSession {
    pub bot: BotConfig,
    pub conversation: ConversationSession,
    pub knowledge: DocumentStore<InMemoryKvStore>,
    last_active: Instant,
}

impl EmbedSession {
    pub fn new(bot: BotConfig) -> Self {
        Self {
            bot,
            conversation: ConversationSession::new(),
            knowledge: DocumentStore::ephemeral(),
            last_active: Instant::now(),
        }
    }

    /// Mark the session as used now.
    pub fn touch(&mut self) {
        self.last_active = Instant::now();
    }

    pub fn last_active(&self) -> Instant {
        self.last_active
    }
}

/// Shared state of the embed host.
///
/// A session sits behind its own async mutex so a slow model call only
/// blocks that session, never the map.
#[derive(Clone)]
pub struct EmbedHost {
    pub chat: Arc<ChatService>,
    sessions: Arc<DashMap<String, Arc<Mutex<EmbedSession>>>>,
    idle_ttl: Option<Duration>,
}

impl EmbedHost {
    pub fn new(chat: ChatService) -> Self {
        Self {
            chat: Arc::new(chat),
            sessions: Arc::new(DashMap::new()),
            idle_ttl: None,
        }
    }

    /// Drop sessions idle longer than `ttl`. A zero TTL disables eviction.
    pub fn with_idle_ttl(mut self, ttl: Duration) -> Self {
        self.idle_ttl = (!ttl.is_zero()).then_some(ttl);
        self
    }

    /// Register a session and return its id.
    pub fn open(&self, bot: BotConfig) -> String {
        self.evict_idle();
        let session = EmbedSession::new(bot);
        let id = session.conversation.id().to_string();
        self.sessions.insert(id.clone(), Arc::new(Mutex::new(session)));
        id
    }

    pub fn get(&self, id: &str) -> Option<Arc<Mutex<EmbedSession>>> {
        self.sessions.get(id).map(|entry| Arc::clone(entry.value()))
    }

    pub fn close(&self, id: &str) -> bool {
        self.sessions.remove(id).is_some()
    }

    pub fn session_count(&self) -> usize {
        self.sessions.len()
    }

    /// Evict sessions idle past the TTL. Returns how many were dropped.
    pub fn evict_idle(&self) -> usize {
        let Some(ttl) = self.idle_ttl else {
            return 0;
        };
        match Instant::now().checked_sub(ttl) {
            Some(cutoff) => self.evict_inactive_since(cutoff),
            None => 0,
        }
    }

    /// Evict sessions whose last activity is before `cutoff`.
    ///
    /// A session whose lock is held is mid-turn and always kept.
    pub fn evict_inactive_since(&self, cutoff: Instant) -> usize {
        let before = self.sessions.len();
        self.sessions.retain(|_, session| match session.try_lock() {
            Ok(session) => session.last_active() >= cutoff,
            Err(_) => true,
        });
        let evicted = before.saturating_sub(self.sessions.len());
        if evicted > 0 {
            tracing::info!(evicted, remaining = self.sessions.len(), "evicted idle embed sessions");
        }
        evicted
    }

    /// Sweep idle sessions periodically. `None` when eviction is disabled.
    pub fn spawn_sweeper(&self) -> Option<JoinHandle<()>> {
        let ttl = self.idle_ttl?;
        let host = self.clone();
        let period = ttl.min(Duration::from_secs(60));
        Some(tokio::spawn(async move {
            let mut ticker = tokio::time::interval(period);
            loop {
                ticker.tick().await;
                host.evict_idle();
            }
        }))
    }
}

#[cfg(test)]
mod tests {
    use std::sync::Arc;

    use botsmith_core::llm::box_provider::BoxLlmProvider;
    use botsmith_core::llm::provider::LlmProvider;
    use botsmith_core::resolver::ResponseResolver;
    use botsmith_types::llm::{CompletionRequest, CompletionResponse, LlmError};

    use super::*;

    struct Unreachable;

    impl LlmProvider for Unreachable {
        fn name(&self) -> &str {
            "unreachable"
        }

        fn model(&self) -> &str {
            "none"
        }

        async fn complete(&self, _request: &CompletionRequest) -> Result<CompletionResponse, LlmError> {
            Err(LlmError::AuthenticationFailed)
        }
    }

    fn host() -> EmbedHost {
        let provider = Arc::new(BoxLlmProvider::new(Unreachable));
        EmbedHost::new(ChatService::new(ResponseResolver::new(provider)))
            .with_idle_ttl(Duration::from_secs(60))
    }

    #[test]
    fn test_idle_sessions_are_evicted() {
        let host = host();
        for _ in 0..100 {
            host.open(BotConfig::new("Widget", Vec::new()));
        }
        assert_eq!(host.session_count(), 100);

        let evicted = host.evict_inactive_since(Instant::now() + Duration::from_secs(1));
        assert_eq!(evicted, 100);
        assert_eq!(host.session_count(), 0);
    }

    #[test]
    fn test_recent_sessions_are_kept() {
        let host = host();
        let opened_at = Instant::now();
        let id = host.open(BotConfig::new("Widget", Vec::new()));

        assert_eq!(host.evict_idle(), 0);
        assert_eq!(host.evict_inactive_since(opened_at), 0);
        assert!(host.get(&id).is_some());
    }

    #[tokio::test]
    async fn test_busy_session_survives_sweep() {
        let host = host();
        let id = host.open(BotConfig::new("Widget", Vec::new()));
        let session = host.get(&id).unwrap();
        let _guard = session.lock().await;

        let evicted = host.evict_inactive_since(Instant::now() + Duration::from_secs(1));
        assert_eq!(evicted, 0);
        assert_eq!(host.session_count(), 1);
    }

    #[test]
    fn test_zero_ttl_disables_eviction() {
        let provider = Arc::new(BoxLlmProvider::new(Unreachable));
        let host = EmbedHost::new(ChatService::new(ResponseResolver::new(provider)))
            .with_idle_ttl(Duration::ZERO);
        assert!(host.spawn_sweeper().is_none());
        host.open(BotConfig::new("Widget", Vec::new()));
        assert_eq!(host.evict_idle(), 0);
    }
}
