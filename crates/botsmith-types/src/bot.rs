use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::error::BotError;

use std::fmt;

/// Theme color assigned to newly created bots.
pub const DEFAULT_THEME_COLOR: &str = "#c59d5f";

/// Fallback text used when a bot has no better answer.
pub const DEFAULT_RESPONSE: &str =
    "I'm sorry, I'm not sure how to help with that. Could you try asking in a different way?";

/// Build an opaque, time-sortable identifier such as `intent-0190...`.
pub fn prefixed_id(prefix: &str) -> String {
    format!("{prefix}-{}", Uuid::now_v7())
}

/// Identifier of the signed-in user, as handed over by the identity provider.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct UserId(pub String);

impl UserId {
    pub fn new(id: impl Into<String>) -> Self {
        Self(id.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for UserId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// A named trigger/response pair the classifier chooses from.
///
/// Training phrases are illustrative, not exhaustive. An intent with no
/// phrases is valid (a catch-all fallback intent, for example).
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Intent {
    pub id: String,
    pub name: String,
    #[serde(default)]
    pub training_phrases: Vec<String>,
    pub response: String,
}

/// An intent that has not been attached to a bot yet (no id).
///
/// Produced by file imports and by LLM intent generation.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct IntentDraft {
    pub name: String,
    #[serde(default)]
    pub training_phrases: Vec<String>,
    pub response: String,
}

impl IntentDraft {
    pub fn new(name: impl Into<String>, training_phrases: Vec<String>, response: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            training_phrases,
            response: response.into(),
        }
    }

    /// Attach a fresh id, turning the draft into a catalog entry.
    pub fn into_intent(self) -> Intent {
        Intent {
            id: prefixed_id("intent"),
            name: self.name,
            training_phrases: self.training_phrases,
            response: self.response,
        }
    }
}

/// Full configuration of one chatbot. Root aggregate owning its intents.
///
/// Serialized with camelCase keys; this is the shape stored under
/// `botConfigs_<user>` and carried inside embed tokens.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct BotConfig {
    pub id: String,
    pub name: String,
    #[serde(default = "default_theme_color")]
    pub theme_color: String,
    #[serde(default = "default_response")]
    pub default_response: String,
    pub intents: Vec<Intent>,
}

fn default_theme_color() -> String {
    DEFAULT_THEME_COLOR.to_string()
}

fn default_response() -> String {
    DEFAULT_RESPONSE.to_string()
}

impl BotConfig {
    /// Create a bot with a fresh id, the default theme color and default response.
    pub fn new(name: impl Into<String>, intents: Vec<Intent>) -> Self {
        Self {
            id: prefixed_id("bot"),
            name: name.into(),
            theme_color: default_theme_color(),
            default_response: default_response(),
            intents,
        }
    }

    pub fn intent(&self, id: &str) -> Option<&Intent> {
        self.intents.iter().find(|i| i.id == id)
    }

    /// Append a single intent built from a draft. Returns the stored intent.
    pub fn add_intent(&mut self, draft: IntentDraft) -> &Intent {
        self.intents.push(draft.into_intent());
        &self.intents[self.intents.len() - 1]
    }

    /// Append imported or generated intents in order, each with a fresh id.
    ///
    /// No deduplication by name: an intent already present under the same
    /// name is kept alongside the new one.
    pub fn append_intents(&mut self, drafts: impl IntoIterator<Item = IntentDraft>) -> usize {
        let before = self.intents.len();
        self.intents
            .extend(drafts.into_iter().map(IntentDraft::into_intent));
        self.intents.len() - before
    }

    /// Remove an intent by id. Returns whether anything was removed.
    pub fn remove_intent(&mut self, id: &str) -> bool {
        let before = self.intents.len();
        self.intents.retain(|i| i.id != id);
        self.intents.len() != before
    }
}

/// Edits to a bot's own settings. `None` leaves a field unchanged.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct BotSettings {
    pub name: Option<String>,
    pub default_response: Option<String>,
    pub theme_color: Option<String>,
}

impl BotSettings {
    pub fn is_empty(&self) -> bool {
        self.name.is_none() && self.default_response.is_none() && self.theme_color.is_none()
    }

    /// Validate every field, then apply them all. Nothing changes on error.
    pub fn apply(self, config: &mut BotConfig) -> Result<(), BotError> {
        let name = self.name.map(|n| n.trim().to_string());
        if name.as_deref().is_some_and(str::is_empty) {
            return Err(BotError::InvalidSetting("Bot name cannot be empty.".into()));
        }
        if self
            .default_response
            .as_deref()
            .is_some_and(|r| r.trim().is_empty())
        {
            return Err(BotError::InvalidSetting("Default response cannot be empty.".into()));
        }
        let theme_color = self.theme_color.map(|c| c.trim().to_lowercase());
        if let Some(color) = theme_color.as_deref().filter(|c| !is_hex_color(c)) {
            return Err(BotError::InvalidSetting(format!(
                "Invalid theme color '{color}'. Use #rgb or #rrggbb."
            )));
        }

        if let Some(name) = name {
            config.name = name;
        }
        if let Some(response) = self.default_response {
            config.default_response = response;
        }
        if let Some(color) = theme_color {
            config.theme_color = color;
        }
        Ok(())
    }
}

fn is_hex_color(value: &str) -> bool {
    value.strip_prefix('#').is_some_and(|hex| {
        matches!(hex.len(), 3 | 6) && hex.chars().all(|c| c.is_ascii_hexdigit())
    })
}
