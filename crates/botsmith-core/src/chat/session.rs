//! In-memory conversation state.
//!
//! A session is an append-only list of messages. Observers subscribe to a
//! broadcast channel and receive each message as it is appended; the full
//! history is available as a snapshot at any time. Nothing is persisted.

use botsmith_types::bot::prefixed_id;
use botsmith_types::chat::{ChatMessage, Sender};
use tokio::sync::broadcast;

/// Buffered messages per subscriber before a slow one starts lagging.
const EVENT_CAPACITY: usize = 64;

#[derive(Debug)]
pub struct ConversationSession {
    id: String,
    messages: Vec<ChatMessage>,
    events: broadcast::Sender<ChatMessage>,
}

impl Default for ConversationSession {
    fn default() -> Self {
        Self::new()
    }
}

impl ConversationSession {
    pub fn new() -> Self {
        let (events, _) = broadcast::channel(EVENT_CAPACITY);
        Self {
            id: prefixed_id("session"),
            messages: Vec::new(),
            events,
        }
    }

    pub fn id(&self) -> &str {
        &self.id
    }

    pub fn append_user(&mut self, text: impl Into<String>) -> ChatMessage {
        self.append(ChatMessage::new(Sender::User, text))
    }

    pub fn append_bot(&mut self, text: impl Into<String>) -> ChatMessage {
        self.append(ChatMessage::new(Sender::Bot, text))
    }

    /// Messages in the order they were appended.
    pub fn messages(&self) -> &[ChatMessage] {
        &self.messages
    }

    /// Owned copy of the history, for handing across threads.
    pub fn snapshot(&self) -> Vec<ChatMessage> {
        self.messages.clone()
    }

    pub fn len(&self) -> usize {
        self.messages.len()
    }

    pub fn is_empty(&self) -> bool {
        self.messages.is_empty()
    }

    /// Receive every message appended from now on.
    pub fn subscribe(&self) -> broadcast::Receiver<ChatMessage> {
        self.events.subscribe()
    }

    fn append(&mut self, message: ChatMessage) -> ChatMessage {
        self.messages.push(message.clone());
        // No subscribers is not an error.
        let _ = self.events.send(message.clone());
        message
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_append_order_is_preserved() {
        let mut session = ConversationSession::new();
        session.append_user("hi");
        session.append_bot("Hello!");

        let messages = session.messages();
        assert_eq!(messages.len(), 2);
        assert_eq!(messages[0].sender, Sender::User);
        assert_eq!(messages[0].text, "hi");
        assert_eq!(messages[1].sender, Sender::Bot);
        assert_eq!(messages[1].text, "Hello!");
        assert_ne!(messages[0].id, messages[1].id);
    }

    #[test]
    fn test_history_is_never_truncated() {
        let mut session = ConversationSession::new();
        for i in 0..200 {
            session.append_user(format!("q{i}"));
            session.append_bot(format!("a{i}"));
        }
        assert_eq!(session.len(), 400);
        assert_eq!(session.messages()[0].text, "q0");
        assert_eq!(session.messages()[399].text, "a199");
    }

    #[tokio::test]
    async fn test_subscribers_receive_appends() {
        let mut session = ConversationSession::new();
        let mut rx = session.subscribe();

        session.append_user("hi");
        session.append_bot("Hello!");

        assert_eq!(rx.recv().await.unwrap().text, "hi");
        let bot = rx.recv().await.unwrap();
        assert_eq!(bot.sender, Sender::Bot);
        assert_eq!(bot.text, "Hello!");
    }

    #[test]
    fn test_snapshot_is_detached() {
        let mut session = ConversationSession::new();
        session.append_user("one");
        let snapshot = session.snapshot();
        session.append_bot("two");
        assert_eq!(snapshot.len(), 1);
        assert_eq!(session.len(), 2);
    }
}
