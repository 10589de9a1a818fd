//! Process-wide application context.
//!
//! Holds the signed-in user (if any) and the UI theme preference. Built once
//! at startup with [`AppContext::init`] and passed to whatever needs it;
//! there is no global state and nothing to tear down.

use botsmith_types::bot::UserId;
use botsmith_types::error::RepositoryError;
use botsmith_types::theme::Theme;
use tracing::debug;

use crate::storage::keys::THEME_KEY;
use crate::storage::kv_store::KvStore;

pub struct AppContext<K: KvStore> {
    kv: K,
    user: Option<UserId>,
    theme: Theme,
}

impl<K: KvStore> AppContext<K> {
    /// Read the persisted theme, falling back to the system preference.
    pub async fn init(
        kv: K,
        user: Option<UserId>,
        system_prefers_dark: bool,
    ) -> Result<Self, RepositoryError> {
        let stored = kv
            .get(THEME_KEY)
            .await?
            .and_then(|raw| raw.parse::<Theme>().ok());
        let theme = stored.unwrap_or(if system_prefers_dark {
            Theme::Dark
        } else {
            Theme::Light
        });
        debug!(theme = %theme, persisted = stored.is_some(), "initialized app context");

        Ok(Self { kv, user, theme })
    }

    pub fn user(&self) -> Option<&UserId> {
        self.user.as_ref()
    }

    pub fn theme(&self) -> Theme {
        self.theme
    }

    pub fn kv(&self) -> &K {
        &self.kv
    }

    /// Switch light/dark and persist the new value.
    pub async fn toggle_theme(&mut self) -> Result<Theme, RepositoryError> {
        self.set_theme(self.theme.toggled()).await?;
        Ok(self.theme)
    }

    pub async fn set_theme(&mut self, theme: Theme) -> Result<(), RepositoryError> {
        self.kv.set(THEME_KEY, &theme.to_string()).await?;
        self.theme = theme;
        Ok(())
    }
}
