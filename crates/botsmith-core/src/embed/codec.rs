//! BotConfig <-> embed token.
//!
//! JSON, then UTF-8 bytes, then URL-safe base64 without padding. Decoding
//! also accepts the standard alphabet and padded input so tokens produced
//! by other encoders still load.

use base64::Engine;
use base64::engine::general_purpose::{STANDARD_NO_PAD, URL_SAFE_NO_PAD};
use botsmith_types::bot::{BotConfig, DEFAULT_RESPONSE};
use botsmith_types::error::EmbedError;
use serde_json::Value;
use tracing::debug;

/// Encode a bot configuration into an embed token.
pub fn encode(config: &BotConfig) -> String {
    let json = serde_json::to_string(config).expect("BotConfig serialization should not fail");
    URL_SAFE_NO_PAD.encode(json.as_bytes())
}

/// Decode a token, reporting why it is unusable.
///
/// A leading `#` is ignored. The decoded object must carry a non-empty
/// `id`, a non-empty `name` and an `intents` array; anything less is
/// rejected rather than turned into a partial configuration. A blank
/// `defaultResponse` is treated like a missing one.
pub fn try_decode(token: &str) -> Result<BotConfig, EmbedError> {
    let token = token.trim();
    let token = token.strip_prefix('#').unwrap_or(token).trim_end_matches('=');
    if token.is_empty() {
        return Err(EmbedError::Empty);
    }

    let engine = if token.contains(['+', '/']) {
        &STANDARD_NO_PAD
    } else {
        &URL_SAFE_NO_PAD
    };
    let bytes = engine
        .decode(token)
        .map_err(|e| EmbedError::Base64(e.to_string()))?;
    let text = String::from_utf8(bytes).map_err(|_| EmbedError::Utf8)?;
    let value: Value = serde_json::from_str(&text).map_err(|e| EmbedError::Json(e.to_string()))?;

    require_text(&value, "id")?;
    require_text(&value, "name")?;
    if !value.get("intents").is_some_and(Value::is_array) {
        return Err(EmbedError::MissingField("intents"));
    }

    let mut config: BotConfig =
        serde_json::from_value(value).map_err(|e| EmbedError::Json(e.to_string()))?;
    // The default response is the last fallback of every turn.
    if config.default_response.trim().is_empty() {
        config.default_response = DEFAULT_RESPONSE.to_string();
    }
    Ok(config)
}

/// Decode a token; any failure means "no deployed configuration".
pub fn decode(token: &str) -> Option<BotConfig> {
    match try_decode(token) {
        Ok(config) => Some(config),
        Err(e) => {
            debug!(error = %e, "ignoring invalid embed token");
            None
        }
    }
}

/// The fragment of an embed URL, or the input itself when it has none.
pub fn token_from_url(url: &str) -> &str {
    match url.split_once('#') {
        Some((_, fragment)) => fragment,
        None => url,
    }
}

fn require_text(value: &Value, field: &'static str) -> Result<(), EmbedError> {
    match value.get(field).and_then(Value::as_str) {
        Some(s) if !s.is_empty() => Ok(()),
        _ => Err(EmbedError::MissingField(field)),
    }
}
