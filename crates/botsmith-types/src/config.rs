//! Global configuration types for Botsmith.
//!
//! `GlobalConfig` represents the top-level `config.toml` that controls the
//! model provider, retrieval depth, embed URLs and the HTTP embed host.

use serde::{Deserialize, Serialize};

use crate::llm::ProviderConfig;

/// Top-level configuration. Loaded from `~/.botsmith/config.toml`;
/// every field has a default.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct GlobalConfig {
    #[serde(default)]
    pub provider: ProviderConfig,

    #[serde(default)]
    pub retrieval: RetrievalConfig,

    #[serde(default)]
    pub embed: EmbedConfig,

    #[serde(default)]
    pub server: ServerConfig,
}

/// How much knowledge-base context is injected per message.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RetrievalConfig {
    /// Maximum number of documents passed to the resolver.
    #[serde(default = "default_top_k")]
    pub top_k: usize,
}

fn default_top_k() -> usize {
    3
}

impl Default for RetrievalConfig {
    fn default() -> Self {
        Self {
            top_k: default_top_k(),
        }
    }
}

/// Where embed links point to.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct EmbedConfig {
    /// Page that decodes the `#<token>` fragment and hosts the widget.
    #[serde(default = "default_embed_base_url")]
    pub base_url: String,
}

fn default_embed_base_url() -> String {
    "http://localhost:3000/".to_string()
}

impl Default for EmbedConfig {
    fn default() -> Self {
        Self {
            base_url: default_embed_base_url(),
        }
    }
}

/// Bind address of the embed HTTP host (`botsmith serve`).
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ServerConfig {
    #[serde(default = "default_host")]
    pub host: String,
    #[serde(default = "default_port")]
    pub port: u16,
    /// Embedded sessions idle longer than this are dropped. Zero keeps them
    /// until they are deleted.
    #[serde(default = "default_session_idle_secs")]
    pub session_idle_secs: u64,
}

fn default_host() -> String {
    "127.0.0.1".to_string()
}

fn default_port() -> u16 {
    3000
}

fn default_session_idle_secs() -> u64 {
    1800
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            host: default_host(),
            port: default_port(),
            session_idle_secs: default_session_idle_secs(),
        }
    }
}
