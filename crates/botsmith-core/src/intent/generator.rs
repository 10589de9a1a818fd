//! Intent generation from free text.
//!
//! Asks the model to read a document (pasted text, or text extracted from an
//! uploaded file) and propose intents answering the questions it covers.

use std::sync::Arc;

use botsmith_types::bot::IntentDraft;
use botsmith_types::error::GenerationError;
use botsmith_types::llm::{CompletionRequest, ResponseFormat};
use schemars::JsonSchema;
use serde::Deserialize;
use serde_json::Value;
use tracing::{Instrument, info, info_span, warn};

use crate::llm::box_provider::BoxLlmProvider;
use crate::llm::schema::array_schema;

/// System prompt for intent extraction.
const GENERATOR_SYSTEM_PROMPT: &str = r#"You are an AI assistant that specializes in creating chatbot intents from raw text.
Your task is to analyze the provided text and generate a list of intents. Each intent must consist of:
1.  A concise 'name' that summarizes the intent.
2.  A list of 'trainingPhrases' (3-5 examples) that a user might say to trigger this intent. These phrases should be varied.
3.  A 'response' that directly and accurately answers the user's likely question, using only information from the provided text.

Extract the most relevant and distinct pieces of information to form these intents. Do not invent information. The entire output must be ONLY the JSON array specified in the schema."#;

/// Sampling temperature for generation calls.
pub const GENERATION_TEMPERATURE: f64 = 0.2;

/// One generated intent: the response schema and the parse target.
#[derive(Debug, Deserialize, JsonSchema)]
#[serde(rename_all = "camelCase")]
struct GeneratedIntent {
    /// A short, descriptive name for the intent (e.g., "Pricing Inquiry").
    name: String,
    /// An array of 3-5 example questions a user might ask for this intent.
    training_phrases: Vec<String>,
    /// The detailed answer to the user's question, based on the provided text.
    response: String,
}

/// Generates intent drafts from raw text.
#[derive(Debug, Clone)]
pub struct IntentGenerator {
    provider: Arc<BoxLlmProvider>,
}

impl IntentGenerator {
    pub fn new(provider: Arc<BoxLlmProvider>) -> Self {
        Self { provider }
    }

    /// Propose intents for `text`.
    ///
    /// Blank text yields an empty list without calling the model. Output
    /// that is valid JSON but not an array also yields an empty list.
    pub async fn generate(&self, text: &str) -> Result<Vec<IntentDraft>, GenerationError> {
        if text.trim().is_empty() {
            return Ok(Vec::new());
        }

        let request = CompletionRequest {
            model: self.provider.model().to_string(),
            system: Some(GENERATOR_SYSTEM_PROMPT.to_string()),
            content: format!("Here is the text to analyze:\n\n---\n\n{text}"),
            temperature: Some(GENERATION_TEMPERATURE),
            max_tokens: None,
            response_format: Some(ResponseFormat::json(array_schema::<GeneratedIntent>())),
        };

        let span = info_span!(
            "gen_ai.generate_intents",
            gen_ai.operation.name = "generate_intents",
            gen_ai.provider.name = self.provider.name(),
            gen_ai.request.model = %request.model,
            gen_ai.request.temperature = ?request.temperature,
            input_chars = text.len(),
        );

        let response = self
            .provider
            .complete(&request)
            .instrument(span)
            .await
            .map_err(|e| {
                warn!(error = %e, "intent generation request failed");
                GenerationError::Failed(e.to_string())
            })?;

        let value: Value = serde_json::from_str(response.content.trim()).map_err(|e| {
            warn!(error = %e, "intent generation returned invalid JSON");
            GenerationError::Failed(e.to_string())
        })?;

        let drafts = match value {
            Value::Array(items) => items.into_iter().filter_map(draft_from_value).collect::<Vec<_>>(),
            _ => Vec::new(),
        };
        info!(intents = drafts.len(), "generated intents from text");
        Ok(drafts)
    }
}

/// Keep an entry only when it has a name, a phrase array and a response.
fn draft_from_value(item: Value) -> Option<IntentDraft> {
    let intent: GeneratedIntent = serde_json::from_value(item).ok()?;
    if intent.name.is_empty() || intent.response.is_empty() {
        return None;
    }
    Some(IntentDraft::new(intent.name, intent.training_phrases, intent.response))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::llm::testing::ScriptedProvider;
    use botsmith_types::llm::LlmError;

    fn generator(provider: Arc<ScriptedProvider>) -> IntentGenerator {
        IntentGenerator::new(Arc::new(BoxLlmProvider::new(provider)))
    }

    #[tokio::test]
    async fn test_generate_keeps_complete_entries() {
        let provider = Arc::new(ScriptedProvider::replying(
            r#"[
                {"name":"Pricing","trainingPhrases":["How much?","Price?"],"response":"$10/month"},
                {"name":"","trainingPhrases":["x"],"response":"y"},
                {"name":"Hours","response":"9-5"},
                {"name":"Refunds","trainingPhrases":[],"response":""},
                {"name":"Shipping","trainingPhrases":"ship?","response":"Free"},
                {"name":"Support","trainingPhrases":["help"],"response":"Email us"}
            ]"#,
        ));
        let drafts = generator(provider).generate("Our plan costs $10/month.").await.unwrap();

        let names: Vec<&str> = drafts.iter().map(|d| d.name.as_str()).collect();
        assert_eq!(names, vec!["Pricing", "Support"]);
        assert_eq!(drafts[0].training_phrases, vec!["How much?", "Price?"]);
    }

    #[tokio::test]
    async fn test_request_shape() {
        let provider = Arc::new(ScriptedProvider::replying("[]"));
        generator(Arc::clone(&provider)).generate("Some text").await.unwrap();

        let request = &provider.requests()[0];
        assert_eq!(request.temperature, Some(0.2));
        assert_eq!(request.content, "Here is the text to analyze:\n\n---\n\nSome text");
        let schema = &request.response_format.as_ref().unwrap().schema;
        assert_eq!(schema["type"], "array");
    }

    #[tokio::test]
    async fn test_non_array_output_is_empty() {
        let provider = Arc::new(ScriptedProvider::replying(r#"{"name":"x"}"#));
        assert!(generator(provider).generate("text").await.unwrap().is_empty());
    }

    #[tokio::test]
    async fn test_blank_input_skips_the_call() {
        let provider = Arc::new(ScriptedProvider::new(Vec::new()));
        assert!(generator(Arc::clone(&provider)).generate("  ").await.unwrap().is_empty());
        assert!(provider.requests().is_empty());
    }

    #[tokio::test]
    async fn test_failures_surface_user_message() {
        let provider = Arc::new(ScriptedProvider::failing(LlmError::AuthenticationFailed));
        let err = generator(provider).generate("text").await.unwrap_err();
        assert!(err.to_string().starts_with("Failed to generate intents."));

        let provider = Arc::new(ScriptedProvider::replying("not json"));
        assert!(generator(provider).generate("text").await.is_err());
    }
}
