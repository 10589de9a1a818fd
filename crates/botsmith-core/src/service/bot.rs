//! Bot management service.
//!
//! Keeps each user's bot list and active-bot pointer in the key-value store:
//! the list as a JSON array under `botConfigs_<user>`, the active id as a
//! plain string under `activeBotId_<user>`.

use botsmith_types::bot::{BotConfig, UserId};
use botsmith_types::error::{BotError, RepositoryError};
use tracing::{info, warn};

use crate::service::defaults::{STARTER_BOT_NAME, new_bot};
use crate::storage::keys::{active_bot_key, bot_configs_key};
use crate::storage::kv_store::KvStore;

/// Service orchestrating the bot lifecycle for signed-in users.
///
/// Generic over `KvStore` so botsmith-core never depends on botsmith-infra.
pub struct BotService<K: KvStore> {
    kv: K,
}

impl<K: KvStore> BotService<K> {
    pub fn new(kv: K) -> Self {
        Self { kv }
    }

    /// All bots of `user`, in creation order.
    ///
    /// A user with nothing stored, or with a stored value that is not a
    /// JSON array, gets a freshly seeded starter bot.
    pub async fn list(&self, user: &UserId) -> Result<Vec<BotConfig>, BotError> {
        let key = bot_configs_key(user);
        if let Some(raw) = self.kv.get(&key).await? {
            match serde_json::from_str::<Vec<BotConfig>>(&raw) {
                Ok(bots) => return Ok(bots),
                Err(e) => warn!(user = %user, error = %e, "stored bot list is unreadable, reseeding"),
            }
        }

        let bots = vec![new_bot(STARTER_BOT_NAME)];
        self.save(user, &bots).await?;
        info!(user = %user, "seeded starter bot");
        Ok(bots)
    }

    /// Look a bot up by id.
    pub async fn get(&self, user: &UserId, id: &str) -> Result<Option<BotConfig>, BotError> {
        Ok(self.list(user).await?.into_iter().find(|b| b.id == id))
    }

    /// Look a bot up by id, falling back to a case-insensitive name match.
    pub async fn find(&self, user: &UserId, id_or_name: &str) -> Result<Option<BotConfig>, BotError> {
        let bots = self.list(user).await?;
        let found = bots
            .iter()
            .position(|b| b.id == id_or_name)
            .or_else(|| {
                bots.iter()
                    .position(|b| b.name.eq_ignore_ascii_case(id_or_name))
            });
        Ok(found.map(|i| bots[i].clone()))
    }

    /// Create a bot with starter content and make it active.
    ///
    /// A blank name is rejected silently with `None`.
    pub async fn create(&self, user: &UserId, name: &str) -> Result<Option<BotConfig>, BotError> {
        let name = name.trim();
        if name.is_empty() {
            return Ok(None);
        }

        let mut bots = self.list(user).await?;
        let bot = new_bot(name);
        bots.push(bot.clone());
        self.save(user, &bots).await?;
        self.kv.set(&active_bot_key(user), &bot.id).await?;

        info!(user = %user, bot_id = %bot.id, name = %bot.name, "created bot");
        Ok(Some(bot))
    }

    /// Replace the stored bot with the same id.
    pub async fn update(&self, user: &UserId, config: BotConfig) -> Result<BotConfig, BotError> {
        let mut bots = self.list(user).await?;
        let slot = bots
            .iter_mut()
            .find(|b| b.id == config.id)
            .ok_or(BotError::NotFound)?;
        *slot = config.clone();
        self.save(user, &bots).await?;
        Ok(config)
    }

    /// Delete a bot. Returns whether it existed.
    ///
    /// Deleting the active bot clears the active pointer; deleting the last
    /// bot removes the stored list altogether.
    pub async fn delete(&self, user: &UserId, id: &str) -> Result<bool, BotError> {
        let mut bots = self.list(user).await?;
        let before = bots.len();
        bots.retain(|b| b.id != id);
        if bots.len() == before {
            return Ok(false);
        }

        self.save(user, &bots).await?;
        if self.active_id(user).await?.as_deref() == Some(id) {
            self.kv.remove(&active_bot_key(user)).await?;
        }

        info!(user = %user, bot_id = %id, "deleted bot");
        Ok(true)
    }

    /// Set or clear the active bot.
    pub async fn select(&self, user: &UserId, id: Option<&str>) -> Result<(), BotError> {
        let key = active_bot_key(user);
        match id {
            Some(id) => {
                if self.get(user, id).await?.is_none() {
                    return Err(BotError::NotFound);
                }
                self.kv.set(&key, id).await?;
            }
            None => self.kv.remove(&key).await?,
        }
        Ok(())
    }

    /// The active bot, if the stored pointer still names an existing bot.
    pub async fn active(&self, user: &UserId) -> Result<Option<BotConfig>, BotError> {
        let bots = self.list(user).await?;
        let Some(id) = self.active_id(user).await? else {
            return Ok(None);
        };
        Ok(bots.into_iter().find(|b| b.id == id))
    }

    async fn active_id(&self, user: &UserId) -> Result<Option<String>, RepositoryError> {
        self.kv.get(&active_bot_key(user)).await
    }

    async fn save(&self, user: &UserId, bots: &[BotConfig]) -> Result<(), BotError> {
        let key = bot_configs_key(user);
        if bots.is_empty() {
            self.kv.remove(&key).await?;
            return Ok(());
        }
        let raw = serde_json::to_string(bots)
            .map_err(|e| RepositoryError::Serialization(e.to_string()))?;
        self.kv.set(&key, &raw).await?;
        Ok(())
    }
}
