//! LLM provider implementations.
//!
//! Contains concrete implementations of the [`LlmProvider`] trait defined in
//! `botsmith-core` plus a factory ([`create_provider`]) that builds the right
//! one from a [`ProviderConfig`].
//!
//! [`LlmProvider`]: botsmith_core::llm::provider::LlmProvider

pub mod gemini;

use secrecy::SecretString;

use botsmith_core::llm::box_provider::BoxLlmProvider;
use botsmith_types::llm::{LlmError, ProviderConfig, ProviderType};

use self::gemini::GeminiProvider;

/// Create a [`BoxLlmProvider`] from a [`ProviderConfig`].
///
/// Fails with `AuthenticationFailed` when no API key is available.
pub fn create_provider(
    config: &ProviderConfig,
    api_key: Option<SecretString>,
) -> Result<BoxLlmProvider, LlmError> {
    match config.provider_type {
        ProviderType::Gemini => {
            let key = api_key.ok_or(LlmError::AuthenticationFailed)?;
            let mut provider = GeminiProvider::new(key, config.model.clone())?;
            if let Some(base_url) = &config.base_url {
                provider = provider.with_base_url(base_url.clone());
            }
            Ok(BoxLlmProvider::new(provider))
        }
    }
}

/// Read the API key from the environment variable named in the config.
///
/// Empty values count as missing.
pub fn api_key_from_env(config: &ProviderConfig) -> Option<SecretString> {
    std::env::var(&config.api_key_env)
        .ok()
        .filter(|v| !v.trim().is_empty())
        .map(SecretString::from)
}
