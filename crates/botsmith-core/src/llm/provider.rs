//! LlmProvider trait definition.
//!
//! The single abstraction the resolver and the intent generator talk to.
//! Implementations live in botsmith-infra (e.g., `GeminiProvider`).

use std::sync::Arc;

use botsmith_types::llm::{CompletionRequest, CompletionResponse, LlmError};

/// Trait for remote model backends.
///
/// Uses native async fn in traits (RPITIT, Rust 2024 edition). Wrap an
/// implementation in [`BoxLlmProvider`](super::box_provider::BoxLlmProvider)
/// when the concrete type must be chosen at runtime.
pub trait LlmProvider: Send + Sync {
    /// Human-readable provider name (e.g., "gemini").
    fn name(&self) -> &str;

    /// Model identifier requests are sent to.
    fn model(&self) -> &str;

    /// Send a completion request and receive the full response.
    fn complete(
        &self,
        request: &CompletionRequest,
    ) -> impl std::future::Future<Output = Result<CompletionResponse, LlmError>> + Send;
}

impl<T: LlmProvider> LlmProvider for Arc<T> {
    fn name(&self) -> &str {
        (**self).name()
    }

    fn model(&self) -> &str {
        (**self).model()
    }

    fn complete(
        &self,
        request: &CompletionRequest,
    ) -> impl std::future::Future<Output = Result<CompletionResponse, LlmError>> + Send {
        (**self).complete(request)
    }
}
