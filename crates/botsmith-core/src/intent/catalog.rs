//! Read-only view over a bot's intents.
//!
//! No matching happens here. The catalog only shapes the intents and the
//! default response into the payload the classifier receives.

use botsmith_types::bot::{BotConfig, Intent};
use serde::Serialize;

/// One intent as presented to the classifier (no id).
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct IntentSummary<'a> {
    pub name: &'a str,
    pub training_phrases: &'a [String],
    pub response: &'a str,
}

/// Request content for a classification call, serialized as JSON.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ClassificationPayload<'a> {
    pub intents: Vec<IntentSummary<'a>>,
    pub default_response: &'a str,
    pub user_input: String,
}

#[derive(Debug, Clone, Copy)]
pub struct IntentCatalog<'a> {
    bot: &'a BotConfig,
}

impl<'a> IntentCatalog<'a> {
    pub fn new(bot: &'a BotConfig) -> Self {
        Self { bot }
    }

    /// All intents, in configured order.
    pub fn list(&self) -> &'a [Intent] {
        &self.bot.intents
    }

    pub fn default_response(&self) -> &'a str {
        &self.bot.default_response
    }

    /// First intent with exactly this name.
    pub fn find(&self, name: &str) -> Option<&'a Intent> {
        self.bot.intents.iter().find(|i| i.name == name)
    }

    /// Build the classifier payload. Every intent is included, unfiltered.
    pub fn to_payload(&self, user_input: impl Into<String>) -> ClassificationPayload<'a> {
        ClassificationPayload {
            intents: self
                .bot
                .intents
                .iter()
                .map(|i| IntentSummary {
                    name: &i.name,
                    training_phrases: &i.training_phrases,
                    response: &i.response,
                })
                .collect(),
            default_response: &self.bot.default_response,
            user_input: user_input.into(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use botsmith_types::bot::IntentDraft;

    fn bot() -> BotConfig {
        let mut bot = BotConfig::new("Helper", Vec::new());
        bot.add_intent(IntentDraft::new("Greeting", vec!["hi".into(), "hello".into()], "Hello!"));
        bot.add_intent(IntentDraft::new("Fallback", Vec::new(), "Not sure."));
        bot
    }

    #[test]
    fn test_payload_shape() {
        let bot = bot();
        let catalog = IntentCatalog::new(&bot);
        let json = serde_json::to_value(catalog.to_payload("hey")).unwrap();

        assert_eq!(json["userInput"], "hey");
        assert_eq!(json["defaultResponse"], bot.default_response.as_str());
        assert_eq!(json["intents"].as_array().unwrap().len(), 2);
        assert_eq!(json["intents"][0]["name"], "Greeting");
        assert_eq!(json["intents"][0]["trainingPhrases"][1], "hello");
        assert_eq!(json["intents"][1]["trainingPhrases"], serde_json::json!([]));
        assert!(json["intents"][0].get("id").is_none());
    }

    #[test]
    fn test_find_and_list() {
        let bot = bot();
        let catalog = IntentCatalog::new(&bot);
        assert_eq!(catalog.list().len(), 2);
        assert_eq!(catalog.find("Fallback").unwrap().response, "Not sure.");
        assert!(catalog.find("fallback").is_none());
    }
}
