//! GeminiProvider -- concrete [`LlmProvider`] implementation for Google Gemini.
//!
//! Sends single-turn requests to `/v1beta/models/{model}:generateContent`.
//! Structured output is requested through `responseMimeType` plus
//! `responseJsonSchema`.
//!
//! The API key is wrapped in [`secrecy::SecretString`] and is only exposed
//! when building the `x-goog-api-key` header.

use std::time::Duration;

use secrecy::{ExposeSecret, SecretString};

use botsmith_core::llm::provider::LlmProvider;
use botsmith_types::llm::{CompletionRequest, CompletionResponse, LlmError, Usage};

use super::types::{GeminiContent, GeminiRequest, GeminiResponse, GenerationConfig};

/// Public Gemini API endpoint.
pub const DEFAULT_BASE_URL: &str = "https://generativelanguage.googleapis.com";

/// Google Gemini LLM provider.
///
/// Does not derive `Debug`; the key never appears in output.
pub struct GeminiProvider {
    client: reqwest::Client,
    api_key: SecretString,
    base_url: String,
    model: String,
}

impl GeminiProvider {
    pub fn new(api_key: SecretString, model: String) -> Result<Self, LlmError> {
        let client = reqwest::Client::builder()
            .timeout(Duration::from_secs(120))
            .build()
            .map_err(|e| LlmError::Provider {
                message: format!("failed to create HTTP client: {e}"),
            })?;

        Ok(Self {
            client,
            api_key,
            base_url: DEFAULT_BASE_URL.to_string(),
            model,
        })
    }

    /// Override the base URL (useful for testing or proxies).
    pub fn with_base_url(mut self, base_url: String) -> Self {
        self.base_url = base_url.trim_end_matches('/').to_string();
        self
    }

    fn url(&self, model: &str) -> String {
        format!("{}/v1beta/models/{model}:generateContent", self.base_url)
    }

    /// Convert a generic [`CompletionRequest`] into a [`GeminiRequest`].
    fn to_gemini_request(request: &CompletionRequest) -> GeminiRequest {
        let format = request.response_format.as_ref();
        GeminiRequest {
            system_instruction: request
                .system
                .as_ref()
                .map(|s| GeminiContent::text(None, s.clone())),
            contents: vec![GeminiContent::text(Some("user"), request.content.clone())],
            generation_config: GenerationConfig {
                temperature: request.temperature,
                max_output_tokens: request.max_tokens,
                response_mime_type: format.map(|f| f.mime_type.clone()),
                response_json_schema: format.map(|f| f.schema.clone()),
            },
        }
    }
}

/// Milliseconds from a `Retry-After` header given in seconds.
fn retry_after_ms(headers: &reqwest::header::HeaderMap) -> Option<u64> {
    headers
        .get(reqwest::header::RETRY_AFTER)?
        .to_str()
        .ok()?
        .trim()
        .parse::<u64>()
        .ok()
        .map(|secs| secs * 1000)
}

impl LlmProvider for GeminiProvider {
    fn name(&self) -> &str {
        "gemini"
    }

    fn model(&self) -> &str {
        &self.model
    }

    async fn complete(&self, request: &CompletionRequest) -> Result<CompletionResponse, LlmError> {
        let body = Self::to_gemini_request(request);
        let url = self.url(&request.model);

        let response = self
            .client
            .post(&url)
            .header("x-goog-api-key", self.api_key.expose_secret())
            .header("content-type", "application/json")
            .json(&body)
            .send()
            .await
            .map_err(|e| LlmError::Provider {
                message: format!("HTTP request failed: {e}"),
            })?;

        let status = response.status();
        if !status.is_success() {
            let retry_after = retry_after_ms(response.headers());
            let error_body = response.text().await.unwrap_or_default();
            return Err(match status.as_u16() {
                401 | 403 => LlmError::AuthenticationFailed,
                429 => LlmError::RateLimited {
                    retry_after_ms: retry_after,
                },
                503 => LlmError::Overloaded(error_body),
                400 => LlmError::InvalidRequest(error_body),
                _ => LlmError::Provider {
                    message: format!("HTTP {status}: {error_body}"),
                },
            });
        }

        let gemini_resp: GeminiResponse = response
            .json()
            .await
            .map_err(|e| LlmError::Deserialization(format!("failed to parse response: {e}")))?;

        let content = gemini_resp.first_text().ok_or(LlmError::EmptyResponse)?;
        let usage = gemini_resp.usage_metadata.clone().unwrap_or_default();

        Ok(CompletionResponse {
            id: gemini_resp.response_id.clone(),
            content,
            model: gemini_resp
                .model_version
                .clone()
                .unwrap_or_else(|| request.model.clone()),
            finish_reason: gemini_resp
                .candidates
                .first()
                .and_then(|c| c.finish_reason.clone()),
            usage: Usage {
                input_tokens: usage.prompt_token_count,
                output_tokens: usage.candidates_token_count,
            },
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use botsmith_types::llm::ResponseFormat;
    use serde_json::json;
    use wiremock::matchers::{body_partial_json, header, method, path};
    use wiremock::{Mock, MockServer, ResponseTemplate};

    const MODEL: &str = "gemini-2.5-flash";

    fn provider(server: &MockServer) -> GeminiProvider {
        GeminiProvider::new(SecretString::from("test-key-not-real"), MODEL.to_string())
            .unwrap()
            .with_base_url(server.uri())
    }

    fn request() -> CompletionRequest {
        CompletionRequest {
            model: MODEL.to_string(),
            system: Some("classify".to_string()),
            content: r#"{"userInput":"hi"}"#.to_string(),
            temperature: Some(0.0),
            max_tokens: None,
            response_format: Some(ResponseFormat::json(json!({"type": "object"}))),
        }
    }

    fn endpoint() -> String {
        format!("/v1beta/models/{MODEL}:generateContent")
    }

    #[tokio::test]
    async fn test_complete_success() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .and(path(endpoint()))
            .and(header("x-goog-api-key", "test-key-not-real"))
            .and(body_partial_json(json!({
                "systemInstruction": {"parts": [{"text": "classify"}]},
                "contents": [{"role": "user", "parts": [{"text": "{\"userInput\":\"hi\"}"}]}],
                "generationConfig": {
                    "temperature": 0.0,
                    "responseMimeType": "application/json",
                    "responseJsonSchema": {"type": "object"}
                }
            })))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({
                "candidates": [{
                    "content": {"role": "model", "parts": [{"text": "{\"intentName\":"}, {"text": "\"default\"}"}]},
                    "finishReason": "STOP"
                }],
                "usageMetadata": {"promptTokenCount": 42, "candidatesTokenCount": 7},
                "modelVersion": "gemini-2.5-flash-001",
                "responseId": "resp-1"
            })))
            .expect(1)
            .mount(&server)
            .await;

        let response = provider(&server).complete(&request()).await.unwrap();
        assert_eq!(response.content, r#"{"intentName":"default"}"#);
        assert_eq!(response.model, "gemini-2.5-flash-001");
        assert_eq!(response.id.as_deref(), Some("resp-1"));
        assert_eq!(response.finish_reason.as_deref(), Some("STOP"));
        assert_eq!(response.usage.input_tokens, 42);
        assert_eq!(response.usage.output_tokens, 7);
    }

    #[tokio::test]
    async fn test_no_candidates_is_empty_response() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .and(path(endpoint()))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({
                "candidates": [],
                "promptFeedback": {"blockReason": "SAFETY"}
            })))
            .mount(&server)
            .await;

        let err = provider(&server).complete(&request()).await.unwrap_err();
        assert!(matches!(err, LlmError::EmptyResponse));
    }

    #[tokio::test]
    async fn test_status_codes_map_to_errors() {
        let cases: Vec<(u16, fn(&LlmError) -> bool)> = vec![
            (401, |e| matches!(e, LlmError::AuthenticationFailed)),
            (403, |e| matches!(e, LlmError::AuthenticationFailed)),
            (400, |e| matches!(e, LlmError::InvalidRequest(_))),
            (503, |e| matches!(e, LlmError::Overloaded(_))),
            (500, |e| matches!(e, LlmError::Provider { .. })),
        ];

        for (status, check) in cases {
            let server = MockServer::start().await;
            Mock::given(method("POST"))
                .respond_with(ResponseTemplate::new(status).set_body_string("nope"))
                .mount(&server)
                .await;

            let err = provider(&server).complete(&request()).await.unwrap_err();
            assert!(check(&err), "status {status} gave {err:?}");
        }
    }

    #[tokio::test]
    async fn test_rate_limit_reads_retry_after() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .respond_with(ResponseTemplate::new(429).insert_header("retry-after", "3"))
            .mount(&server)
            .await;

        let err = provider(&server).complete(&request()).await.unwrap_err();
        assert!(matches!(
            err,
            LlmError::RateLimited {
                retry_after_ms: Some(3000)
            }
        ));
    }

    #[test]
    fn test_request_without_format_or_system() {
        let mut request = request();
        request.system = None;
        request.response_format = None;
        let body = serde_json::to_value(GeminiProvider::to_gemini_request(&request)).unwrap();

        assert!(body.get("systemInstruction").is_none());
        assert!(body["generationConfig"].get("responseJsonSchema").is_none());
        assert_eq!(body["generationConfig"]["temperature"], 0.0);
    }

    #[test]
    fn test_base_url_trailing_slash() {
        let provider = GeminiProvider::new(SecretString::from("k"), MODEL.to_string())
            .unwrap()
            .with_base_url("http://localhost:1234/".to_string());
        assert_eq!(
            provider.url(MODEL),
            "http://localhost:1234/v1beta/models/gemini-2.5-flash:generateContent"
        );
    }
}
