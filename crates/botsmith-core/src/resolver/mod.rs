//! Bot-response resolution.
//!
//! `ResponseResolver` turns (user input, bot configuration, retrieved
//! context) into the text the bot replies with. Classification is delegated
//! to the remote model under a strict two-field schema. Any failure on that
//! path resolves to the bot's default response; nothing is raised to the
//! caller.

pub mod prompt;

use std::fmt;
use std::sync::Arc;

use botsmith_types::bot::BotConfig;
use botsmith_types::llm::{CompletionRequest, ResponseFormat};
use schemars::JsonSchema;
use serde::{Deserialize, Serialize};
use serde_json::Value;
use tracing::{Instrument, debug, info_span, warn};

use crate::intent::catalog::IntentCatalog;
use crate::llm::box_provider::BoxLlmProvider;
use crate::llm::schema::object_schema;

use self::prompt::{CLASSIFIER_SYSTEM_PROMPT, augment_query};

/// Sampling temperature for classification calls.
pub const CLASSIFICATION_TEMPERATURE: f64 = 0.0;

/// Structured output the classifier must return.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, JsonSchema)]
#[serde(rename_all = "camelCase")]
pub struct IntentMatch {
    /// The name of the matched intent, or "default" if no intent matches.
    pub intent_name: String,
    /// The response associated with the matched intent.
    pub response: String,
}

impl IntentMatch {
    /// Closed JSON schema sent as the response constraint.
    pub fn schema() -> Value {
        object_schema::<IntentMatch>()
    }
}

/// Why a resolution fell back to the default response.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum FallbackReason {
    /// Transport or model error from the provider.
    Provider(String),
    /// The model output was not a JSON document.
    Unparsable(String),
    /// The `response` field was missing, not a string, or empty.
    EmptyResponse,
    /// The request payload could not be serialized.
    Payload(String),
}

impl fmt::Display for FallbackReason {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            FallbackReason::Provider(e) => write!(f, "provider error: {e}"),
            FallbackReason::Unparsable(e) => write!(f, "unparsable output: {e}"),
            FallbackReason::EmptyResponse => write!(f, "empty response field"),
            FallbackReason::Payload(e) => write!(f, "payload error: {e}"),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ResolutionOutcome {
    /// The model's `response` field was returned verbatim.
    Matched,
    Fallback(FallbackReason),
}

/// Result of one resolution, with enough detail for logs and the CLI.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Resolution {
    pub response: String,
    /// Intent name reported by the model, when it reported one.
    pub intent_name: Option<String>,
    pub outcome: ResolutionOutcome,
}

impl Resolution {
    fn fallback(bot: &BotConfig, reason: FallbackReason) -> Self {
        Self {
            response: bot.default_response.clone(),
            intent_name: None,
            outcome: ResolutionOutcome::Fallback(reason),
        }
    }

    pub fn is_fallback(&self) -> bool {
        matches!(self.outcome, ResolutionOutcome::Fallback(_))
    }
}

/// Resolves user input to a bot response through the remote classifier.
///
/// Holds no mutable state; one resolver can serve any number of sessions
/// concurrently.
#[derive(Debug, Clone)]
pub struct ResponseResolver {
    provider: Arc<BoxLlmProvider>,
}

impl ResponseResolver {
    pub fn new(provider: Arc<BoxLlmProvider>) -> Self {
        Self { provider }
    }

    pub fn provider(&self) -> &BoxLlmProvider {
        &self.provider
    }

    /// Resolve to a response string. Never fails.
    pub async fn resolve(&self, user_input: &str, bot: &BotConfig, context: &str) -> String {
        self.resolve_detailed(user_input, bot, context).await.response
    }

    /// Resolve and report whether the answer came from the model or the fallback.
    pub async fn resolve_detailed(
        &self,
        user_input: &str,
        bot: &BotConfig,
        context: &str,
    ) -> Resolution {
        let catalog = IntentCatalog::new(bot);
        let payload = catalog.to_payload(augment_query(user_input, context));
        let content = match serde_json::to_string(&payload) {
            Ok(content) => content,
            Err(e) => return Resolution::fallback(bot, FallbackReason::Payload(e.to_string())),
        };

        let request = CompletionRequest {
            model: self.provider.model().to_string(),
            system: Some(CLASSIFIER_SYSTEM_PROMPT.to_string()),
            content,
            temperature: Some(CLASSIFICATION_TEMPERATURE),
            max_tokens: None,
            response_format: Some(ResponseFormat::json(IntentMatch::schema())),
        };

        let span = info_span!(
            "gen_ai.classify",
            gen_ai.operation.name = "classify_intent",
            gen_ai.provider.name = self.provider.name(),
            gen_ai.request.model = %request.model,
            gen_ai.request.temperature = ?request.temperature,
            gen_ai.agent.id = %bot.id,
            intents = bot.intents.len(),
            has_context = !context.trim().is_empty(),
        );

        let resolution = match self.provider.complete(&request).instrument(span).await {
            Ok(response) => interpret(bot, &response.content),
            Err(e) => Resolution::fallback(bot, FallbackReason::Provider(e.to_string())),
        };

        match &resolution.outcome {
            ResolutionOutcome::Matched => debug!(
                bot_id = %bot.id,
                intent = resolution.intent_name.as_deref().unwrap_or(""),
                "resolved bot response"
            ),
            ResolutionOutcome::Fallback(reason) => warn!(
                bot_id = %bot.id,
                reason = %reason,
                "classification failed, using default response"
            ),
        }

        resolution
    }
}

/// Parse model output into a resolution.
///
/// Fields are read leniently: a missing `intentName` is tolerated, a missing
/// or empty `response` is not.
fn interpret(bot: &BotConfig, raw: &str) -> Resolution {
    let value: Value = match serde_json::from_str(raw.trim()) {
        Ok(value) => value,
        Err(e) => return Resolution::fallback(bot, FallbackReason::Unparsable(e.to_string())),
    };

    let response = value.get("response").and_then(Value::as_str).unwrap_or("");
    if response.is_empty() {
        return Resolution::fallback(bot, FallbackReason::EmptyResponse);
    }

    Resolution {
        response: response.to_string(),
        intent_name: value
            .get("intentName")
            .and_then(Value::as_str)
            .map(str::to_string),
        outcome: ResolutionOutcome::Matched,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::llm::testing::ScriptedProvider;
    use botsmith_types::bot::IntentDraft;
    use botsmith_types::llm::LlmError;

    fn bot() -> BotConfig {
        let mut bot = BotConfig::new("Helper", Vec::new());
        bot.default_response = "Sorry, no idea.".to_string();
        bot.add_intent(IntentDraft::new("Greeting", vec!["hi".into()], "Hello!"));
        bot
    }

    fn resolver(provider: Arc<ScriptedProvider>) -> ResponseResolver {
        ResponseResolver::new(Arc::new(BoxLlmProvider::new(provider)))
    }

    #[tokio::test]
    async fn test_matched_response_is_returned_verbatim() {
        let provider = Arc::new(ScriptedProvider::replying(
            r#"  {"intentName":"Greeting","response":"Hello!"}  "#,
        ));
        let resolution = resolver(provider).resolve_detailed("hi", &bot(), "").await;

        assert_eq!(resolution.response, "Hello!");
        assert_eq!(resolution.intent_name.as_deref(), Some("Greeting"));
        assert_eq!(resolution.outcome, ResolutionOutcome::Matched);
    }

    #[tokio::test]
    async fn test_default_intent_response_is_not_replaced() {
        let provider = Arc::new(ScriptedProvider::replying(
            r#"{"intentName":"default","response":"X"}"#,
        ));
        assert_eq!(resolver(provider).resolve("??", &bot(), "").await, "X");
    }

    #[tokio::test]
    async fn test_provider_error_falls_back() {
        let provider = Arc::new(ScriptedProvider::failing(LlmError::Provider {
            message: "HTTP 500".to_string(),
        }));
        let resolution = resolver(provider).resolve_detailed("hi", &bot(), "").await;

        assert_eq!(resolution.response, "Sorry, no idea.");
        assert!(matches!(
            resolution.outcome,
            ResolutionOutcome::Fallback(FallbackReason::Provider(_))
        ));
    }

    #[tokio::test]
    async fn test_unparsable_output_falls_back() {
        let provider = Arc::new(ScriptedProvider::replying("Hello there! I think you mean Greeting."));
        let resolution = resolver(provider).resolve_detailed("hi", &bot(), "").await;
        assert_eq!(resolution.response, "Sorry, no idea.");
        assert!(matches!(
            resolution.outcome,
            ResolutionOutcome::Fallback(FallbackReason::Unparsable(_))
        ));
    }

    #[tokio::test]
    async fn test_empty_or_missing_response_field_falls_back() {
        for raw in [
            r#"{"intentName":"Greeting","response":""}"#,
            r#"{"intentName":"Greeting"}"#,
            r#"{"intentName":"Greeting","response":null}"#,
            r#"[]"#,
        ] {
            let provider = Arc::new(ScriptedProvider::replying(raw));
            let resolution = resolver(provider).resolve_detailed("hi", &bot(), "").await;
            assert_eq!(resolution.response, "Sorry, no idea.", "payload: {raw}");
            assert_eq!(
                resolution.outcome,
                ResolutionOutcome::Fallback(FallbackReason::EmptyResponse)
            );
        }
    }

    #[tokio::test]
    async fn test_request_shape() {
        let provider = Arc::new(ScriptedProvider::replying(
            r#"{"intentName":"default","response":"ok"}"#,
        ));
        let resolver = resolver(Arc::clone(&provider));
        resolver.resolve("When?", &bot(), "We open at 9.").await;

        let requests = provider.requests();
        assert_eq!(requests.len(), 1);
        let request = &requests[0];
        assert_eq!(request.temperature, Some(0.0));
        assert_eq!(request.model, "scripted-model");
        assert_eq!(request.system.as_deref(), Some(CLASSIFIER_SYSTEM_PROMPT));

        let format = request.response_format.as_ref().unwrap();
        assert_eq!(format.mime_type, "application/json");
        assert_eq!(format.schema["additionalProperties"], false);

        let payload: Value = serde_json::from_str(&request.content).unwrap();
        assert_eq!(payload["defaultResponse"], "Sorry, no idea.");
        assert_eq!(payload["intents"][0]["name"], "Greeting");
        let input = payload["userInput"].as_str().unwrap();
        assert!(input.contains("[CONTEXT]\nWe open at 9.\n\n[QUESTION]\nWhen?"));
    }

    #[tokio::test]
    async fn test_no_context_sends_raw_input() {
        let provider = Arc::new(ScriptedProvider::replying(
            r#"{"intentName":"Greeting","response":"Hello!"}"#,
        ));
        resolver(Arc::clone(&provider)).resolve("hi", &bot(), "   ").await;

        let payload: Value = serde_json::from_str(&provider.requests()[0].content).unwrap();
        assert_eq!(payload["userInput"], "hi");
    }

    #[test]
    fn test_intent_match_schema_requires_both_fields() {
        let schema = IntentMatch::schema();
        let required = schema["required"].as_array().unwrap();
        assert_eq!(required.len(), 2);
        assert_eq!(schema["additionalProperties"], false);
    }
}
