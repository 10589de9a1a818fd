//! Application state wiring storage, configuration and services together.
//!
//! AppState holds the concrete instances used by the CLI commands and the
//! embed HTTP host. Services are generic over `KvStore`; AppState pins them
//! to the SQLite implementation.

use std::sync::Arc;

use anyhow::Context;

use botsmith_core::chat::service::ChatService;
use botsmith_core::context::AppContext;
use botsmith_core::intent::generator::IntentGenerator;
use botsmith_core::knowledge::store::DocumentStore;
use botsmith_core::llm::box_provider::BoxLlmProvider;
use botsmith_core::resolver::ResponseResolver;
use botsmith_core::service::bot::BotService;
use botsmith_core::storage::keys::GUEST_SEGMENT;
use botsmith_infra::config::{effective_top_k, load_global_config};
use botsmith_infra::filesystem::{ensure_data_dir, resolve_data_dir};
use botsmith_infra::llm::{api_key_from_env, create_provider};
use botsmith_infra::sqlite::kv::SqliteKvStore;
use botsmith_infra::sqlite::pool::DatabasePool;
use botsmith_types::bot::{BotConfig, UserId};
use botsmith_types::config::GlobalConfig;
use botsmith_types::error::BotError;
use botsmith_types::knowledge::KnowledgeScope;

/// Concrete type alias for the bot service pinned to SQLite.
pub type ConcreteBotService = BotService<SqliteKvStore>;

/// Shared application state.
#[derive(Clone)]
pub struct AppState {
    pub config: Arc<GlobalConfig>,
    pub kv: SqliteKvStore,
    pub bot_service: Arc<ConcreteBotService>,
    /// Signed-in user; `None` runs as the shared guest.
    pub user: Option<UserId>,
}

impl AppState {
    /// Initialize the application state: load config, open the database.
    pub async fn init(user: Option<String>) -> anyhow::Result<Self> {
        let data_dir = resolve_data_dir();
        ensure_data_dir(&data_dir)
            .await
            .with_context(|| format!("failed to create data directory {}", data_dir.display()))?;

        let config = load_global_config(&data_dir).await;
        let pool = DatabasePool::open_in(&data_dir)
            .await
            .context("failed to open the Botsmith database")?;
        let kv = SqliteKvStore::new(pool);

        let user = user
            .map(|u| u.trim().to_string())
            .filter(|u| !u.is_empty())
            .map(UserId::new);
        tracing::debug!(data_dir = %data_dir.display(), user = ?user, "application state ready");

        Ok(Self::from_parts(config, kv, user))
    }

    /// Assemble state over an already opened store.
    pub fn from_parts(config: GlobalConfig, kv: SqliteKvStore, user: Option<UserId>) -> Self {
        Self {
            config: Arc::new(config),
            bot_service: Arc::new(BotService::new(kv.clone())),
            kv,
            user,
        }
    }

    /// Owner of the bot list: the signed-in user or the guest bucket.
    pub fn owner(&self) -> UserId {
        self.user
            .clone()
            .unwrap_or_else(|| UserId::new(GUEST_SEGMENT))
    }

    /// Resolve a bot by id or name; without one, the active bot, else the first.
    pub async fn resolve_bot(&self, id_or_name: Option<&str>) -> anyhow::Result<BotConfig> {
        let owner = self.owner();
        if let Some(wanted) = id_or_name {
            return self
                .bot_service
                .find(&owner, wanted)
                .await?
                .ok_or(BotError::NotFound)
                .with_context(|| format!("no bot matches '{wanted}'"));
        }

        if let Some(active) = self.bot_service.active(&owner).await? {
            return Ok(active);
        }
        self.bot_service
            .list(&owner)
            .await?
            .into_iter()
            .next()
            .ok_or_else(|| anyhow::anyhow!(BotError::NotFound))
    }

    /// The persisted knowledge base of one bot.
    pub async fn knowledge(&self, bot_id: &str) -> anyhow::Result<DocumentStore<SqliteKvStore>> {
        let scope = KnowledgeScope::new(self.user.clone(), Some(bot_id.to_string()));
        Ok(DocumentStore::open(self.kv.clone(), &scope).await?)
    }

    pub async fn app_context(&self) -> anyhow::Result<AppContext<SqliteKvStore>> {
        Ok(AppContext::init(self.kv.clone(), self.user.clone(), terminal_prefers_dark()).await?)
    }

    /// Build the configured LLM provider. Fails when no API key is set.
    pub fn provider(&self) -> anyhow::Result<Arc<BoxLlmProvider>> {
        let provider_config = &self.config.provider;
        let api_key = api_key_from_env(provider_config);
        let provider = create_provider(provider_config, api_key).with_context(|| {
            format!(
                "{} not set. Export your {} API key in that variable.",
                provider_config.api_key_env, provider_config.provider_type
            )
        })?;
        Ok(Arc::new(provider))
    }

    pub fn chat_service(&self) -> anyhow::Result<ChatService> {
        let resolver = ResponseResolver::new(self.provider()?);
        Ok(ChatService::new(resolver).with_top_k(effective_top_k(&self.config)))
    }

    pub fn intent_generator(&self) -> anyhow::Result<IntentGenerator> {
        Ok(IntentGenerator::new(self.provider()?))
    }
}

/// Dark background detection from the `COLORFGBG` terminal convention.
pub fn terminal_prefers_dark() -> bool {
    std::env::var("COLORFGBG")
        .ok()
        .as_deref()
        .is_some_and(background_is_dark)
}

fn background_is_dark(colorfgbg: &str) -> bool {
    colorfgbg
        .rsplit(';')
        .next()
        .and_then(|bg| bg.trim().parse::<u8>().ok())
        .is_some_and(|bg| bg < 7 || bg == 8)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_background_is_dark() {
        assert!(background_is_dark("15;0"));
        assert!(background_is_dark("7;default;8"));
        assert!(!background_is_dark("0;15"));
        assert!(!background_is_dark("0;7"));
        assert!(!background_is_dark("garbage"));
    }
}
