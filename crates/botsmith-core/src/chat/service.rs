//! One chat turn: retrieve, resolve, record.

use botsmith_types::bot::BotConfig;
use botsmith_types::chat::ChatMessage;
use tracing::debug;

use crate::chat::session::ConversationSession;
use crate::knowledge::retriever::{LexicalRetriever, Retriever, join_context};
use crate::knowledge::store::DocumentStore;
use crate::resolver::ResponseResolver;
use crate::storage::kv_store::KvStore;

/// Number of documents injected as context when not configured.
pub const DEFAULT_TOP_K: usize = 3;

/// Runs the per-message pipeline for a conversation.
///
/// Retrieval and resolution are awaited in sequence; the caller is expected
/// not to send a new message while a turn is in flight.
pub struct ChatService {
    resolver: ResponseResolver,
    retriever: Box<dyn Retriever>,
    top_k: usize,
}

impl ChatService {
    /// Lexical retrieval with the default context depth.
    pub fn new(resolver: ResponseResolver) -> Self {
        Self {
            resolver,
            retriever: Box::new(LexicalRetriever::new()),
            top_k: DEFAULT_TOP_K,
        }
    }

    pub fn with_retriever(mut self, retriever: impl Retriever + 'static) -> Self {
        self.retriever = Box::new(retriever);
        self
    }

    /// Maximum documents per turn. Zero is raised to one.
    pub fn with_top_k(mut self, top_k: usize) -> Self {
        self.top_k = top_k.max(1);
        self
    }

    pub fn top_k(&self) -> usize {
        self.top_k
    }

    pub fn resolver(&self) -> &ResponseResolver {
        &self.resolver
    }

    /// Handle one user message and return the bot's reply.
    ///
    /// Blank input is ignored: nothing is appended and `None` is returned.
    pub async fn send<K: KvStore>(
        &self,
        session: &mut ConversationSession,
        bot: &BotConfig,
        knowledge: &DocumentStore<K>,
        input: &str,
    ) -> Option<ChatMessage> {
        if input.trim().is_empty() {
            return None;
        }

        session.append_user(input);

        let results = self.retriever.search(input, self.top_k, knowledge.list());
        debug!(bot_id = %bot.id, docs = results.len(), "retrieved knowledge context");
        let context = join_context(&results);

        let reply = self.resolver.resolve(input, bot, &context).await;
        Some(session.append_bot(reply))
    }
}

#[cfg(test)]
mod tests {
    use std::sync::Arc;

    use super::*;
    use crate::llm::box_provider::BoxLlmProvider;
    use crate::llm::testing::ScriptedProvider;
    use crate::storage::memory::InMemoryKvStore;
    use botsmith_types::chat::Sender;
    use botsmith_types::knowledge::KnowledgeScope;
    use botsmith_types::llm::LlmError;
    use serde_json::Value;

    fn service(provider: Arc<ScriptedProvider>) -> ChatService {
        ChatService::new(ResponseResolver::new(Arc::new(BoxLlmProvider::new(provider))))
    }

    #[tokio::test]
    async fn test_turn_appends_user_then_bot() {
        let provider = Arc::new(ScriptedProvider::replying(
            r#"{"intentName":"default","response":"We open at 9."}"#,
        ));
        let service = service(provider);
        let bot = BotConfig::new("Helper", Vec::new());
        let knowledge = DocumentStore::ephemeral();
        let mut session = ConversationSession::new();

        let reply = service.send(&mut session, &bot, &knowledge, "hours?").await.unwrap();
        assert_eq!(reply.text, "We open at 9.");

        let senders: Vec<Sender> = session.messages().iter().map(|m| m.sender).collect();
        assert_eq!(senders, vec![Sender::User, Sender::Bot]);
    }

    #[tokio::test]
    async fn test_blank_input_is_a_no_op() {
        let provider = Arc::new(ScriptedProvider::new(Vec::new()));
        let service = service(Arc::clone(&provider));
        let bot = BotConfig::new("Helper", Vec::new());
        let mut session = ConversationSession::new();

        assert!(service.send(&mut session, &bot, &DocumentStore::ephemeral(), "   ").await.is_none());
        assert!(session.is_empty());
        assert!(provider.requests().is_empty());
    }

    #[tokio::test]
    async fn test_matching_documents_become_context() {
        let provider = Arc::new(ScriptedProvider::replying(
            r#"{"intentName":"default","response":"ok"}"#,
        ));
        let service = service(Arc::clone(&provider)).with_top_k(2);
        let bot = BotConfig::new("Helper", Vec::new());

        let scope = KnowledgeScope::default();
        let mut knowledge = DocumentStore::open(InMemoryKvStore::new(), &scope).await.unwrap();
        knowledge.add("Refund policy: 30 days").await.unwrap();
        knowledge.add("Shipping is free").await.unwrap();
        knowledge.add("Refund requests go to support").await.unwrap();
        knowledge.add("Another refund note").await.unwrap();

        let mut session = ConversationSession::new();
        service.send(&mut session, &bot, &knowledge, "refund").await.unwrap();

        let payload: Value = serde_json::from_str(&provider.requests()[0].content).unwrap();
        let input = payload["userInput"].as_str().unwrap();
        assert!(input.contains(
            "[CONTEXT]\nRefund policy: 30 days\n\n---\n\nRefund requests go to support\n\n[QUESTION]\nrefund"
        ));
        assert!(!input.contains("Another refund note"));
    }

    #[tokio::test]
    async fn test_provider_failure_still_replies_with_default() {
        let provider = Arc::new(ScriptedProvider::failing(LlmError::Overloaded("busy".into())));
        let service = service(provider);
        let bot = BotConfig::new("Helper", Vec::new());
        let mut session = ConversationSession::new();

        let reply = service
            .send(&mut session, &bot, &DocumentStore::ephemeral(), "hi")
            .await
            .unwrap();
        assert_eq!(reply.text, bot.default_response);
        assert_eq!(session.len(), 2);
    }

    #[test]
    fn test_zero_top_k_is_raised() {
        let provider = Arc::new(ScriptedProvider::new(Vec::new()));
        assert_eq!(service(provider).with_top_k(0).top_k(), 1);
    }
}
