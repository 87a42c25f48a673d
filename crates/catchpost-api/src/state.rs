//! Application state wiring the services together.
//!
//! The wizard and moderation services are generic over the draft store and
//! messenger traits; AppState pins them to SQLite and the Telegram client.

use std::path::Path;
use std::sync::Arc;

use anyhow::Context;

use catchpost_core::moderation::{ModerationCoordinator, ModerationSettings};
use catchpost_core::sync::UserLocks;
use catchpost_core::wizard::WizardService;
use catchpost_infra::config::{load_bot_token, resolve_database_url};
use catchpost_infra::sqlite::draft::SqliteDraftStore;
use catchpost_infra::sqlite::pool::DatabasePool;
use catchpost_infra::telegram::client::TelegramMessenger;
use catchpost_types::config::AppConfig;

pub type ConcreteModeration = ModerationCoordinator<SqliteDraftStore, TelegramMessenger>;

pub type ConcreteWizardService = WizardService<SqliteDraftStore, TelegramMessenger>;

/// Shared state of the webhook server.
#[derive(Clone)]
pub struct AppState {
    pub wizard: Arc<ConcreteWizardService>,
    pub moderation: Arc<ConcreteModeration>,
    pub messenger: Arc<TelegramMessenger>,
    /// Expected value of the webhook secret-token header.
    pub webhook_secret: Option<String>,
}

impl AppState {
    /// Wire services over an opened store and a messenger. The wizard and
    /// the coordinator share one lock registry.
    pub fn new(store: Arc<SqliteDraftStore>, messenger: Arc<TelegramMessenger>, config: &AppConfig) -> Self {
        let locks = Arc::new(UserLocks::new());

        let moderation = Arc::new(ModerationCoordinator::new(
            store.clone(),
            messenger.clone(),
            locks.clone(),
            ModerationSettings::from(&config.moderation),
        ));

        let wizard = Arc::new(WizardService::new(
            store,
            messenger.clone(),
            locks,
            moderation.clone(),
            config.wizard.clone(),
        ));

        Self {
            wizard,
            moderation,
            messenger,
            webhook_secret: config.telegram.webhook_secret.clone(),
        }
    }

    /// Open the database and build the Telegram client from the
    /// environment's bot token.
    pub async fn init(config: &AppConfig, data_dir: &Path) -> anyhow::Result<Self> {
        let token = load_bot_token(|key| std::env::var(key).ok())?;
        let messenger = TelegramMessenger::new(token, &config.telegram)
            .context("failed to build Telegram client")?;
        let store = open_store(config, data_dir).await?;

        if config.moderation.moderator_chat_id.is_none() {
            tracing::warn!("No moderator chat configured; submissions will fail until MOD_CHAT_ID is set");
        }
        if config.moderation.channel_id.is_none() {
            tracing::warn!("No public channel configured; approvals will fail until CHANNEL_ID is set");
        }

        Ok(Self::new(Arc::new(store), Arc::new(messenger), config))
    }
}

/// Open (creating if needed) the draft database.
pub async fn open_store(config: &AppConfig, data_dir: &Path) -> anyhow::Result<SqliteDraftStore> {
    tokio::fs::create_dir_all(data_dir)
        .await
        .with_context(|| format!("failed to create data directory {}", data_dir.display()))?;

    let url = resolve_database_url(config, data_dir);
    let pool = DatabasePool::new(&url)
        .await
        .with_context(|| format!("failed to open database {url}"))?;

    Ok(SqliteDraftStore::new(pool))
}
