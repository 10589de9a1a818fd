//! Key naming for everything persisted in the key-value store.

use botsmith_types::bot::UserId;
use botsmith_types::knowledge::KnowledgeScope;

/// Key of the persisted light/dark preference.
pub const THEME_KEY: &str = "theme";

/// User segment used when no one is signed in.
pub const GUEST_SEGMENT: &str = "guest";

/// Bot segment used when no bot is selected.
pub const DEFAULT_BOT_SEGMENT: &str = "default";

/// `botConfigs_<user>`: JSON array of the user's bots.
pub fn bot_configs_key(user: &UserId) -> String {
    format!("botConfigs_{user}")
}

/// `activeBotId_<user>`: id of the bot currently open in the builder.
pub fn active_bot_key(user: &UserId) -> String {
    format!("activeBotId_{user}")
}

/// `rag-docs-<user|guest>-<bot|default>`: JSON array of knowledge documents.
pub fn knowledge_key(scope: &KnowledgeScope) -> String {
    let user = scope
        .user_id
        .as_ref()
        .map(UserId::as_str)
        .unwrap_or(GUEST_SEGMENT);
    let bot = scope.bot_id.as_deref().unwrap_or(DEFAULT_BOT_SEGMENT);
    format!("rag-docs-{user}-{bot}")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_bot_keys() {
        let user = UserId::new("u42");
        assert_eq!(bot_configs_key(&user), "botConfigs_u42");
        assert_eq!(active_bot_key(&user), "activeBotId_u42");
    }

    #[test]
    fn test_knowledge_key_scoped() {
        let scope = KnowledgeScope::for_bot(&UserId::new("u42"), "bot-7");
        assert_eq!(knowledge_key(&scope), "rag-docs-u42-bot-7");
    }

    #[test]
    fn test_knowledge_key_degrades_to_shared_scope() {
        assert_eq!(knowledge_key(&KnowledgeScope::default()), "rag-docs-guest-default");
        let scope = KnowledgeScope::new(Some(UserId::new("u1")), None);
        assert_eq!(knowledge_key(&scope), "rag-docs-u1-default");
    }

    #[test]
    fn test_distinct_bots_get_distinct_keys() {
        let user = UserId::new("u1");
        assert_ne!(
            knowledge_key(&KnowledgeScope::for_bot(&user, "a")),
            knowledge_key(&KnowledgeScope::for_bot(&user, "b"))
        );
    }
}
