//! Application configuration types.
//!
//! `AppConfig` represents `config.toml` in the data directory. All fields
//! have defaults so an absent or partial file still yields a usable config;
//! environment overrides are applied by the loader in `catchpost-infra`.

use serde::{Deserialize, Serialize};

/// Top-level configuration.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct AppConfig {
    /// SQLite URL; derived from the data directory when absent.
    pub database_url: Option<String>,
    pub telegram: TelegramConfig,
    pub moderation: ModerationConfig,
    pub server: ServerConfig,
    pub wizard: WizardConfig,
}

/// Messaging platform connection settings.
///
/// The token itself is not part of the file schema; it is read from the
/// environment by the loader so it never lands in a config file by accident.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct TelegramConfig {
    /// Bot API base URL.
    pub api_base: String,
    /// Secret expected in the webhook's secret-token header.
    pub webhook_secret: Option<String>,
    /// Per-request timeout in seconds.
    pub timeout_secs: u64,
}

impl Default for TelegramConfig {
    fn default() -> Self {
        Self {
            api_base: "https://api.telegram.org".to_string(),
            webhook_secret: None,
            timeout_secs: 120,
        }
    }
}

/// Moderation and publication destinations.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct ModerationConfig {
    /// Chat where submissions are reviewed. Submissions fail without it.
    pub moderator_chat_id: Option<i64>,
    /// Public channel approved posts are published to.
    pub channel_id: Option<i64>,
    /// Line appended to every published post inviting further submissions.
    pub call_to_action: String,
}

impl Default for ModerationConfig {
    fn default() -> Self {
        Self {
            moderator_chat_id: None,
            channel_id: None,
            call_to_action: "📨 ПРЕДЛОЖИТЬ ПОСТ: https://t.me/MazaiiBot?start=post".to_string(),
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct ServerConfig {
    pub host: String,
    pub port: u16,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            host: "0.0.0.0".to_string(),
            port: 8080,
        }
    }
}

/// Dialogue presentation settings.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct WizardConfig {
    /// Link behind the greeting's "search spots" button; hidden when unset.
    pub search_url: Option<String>,
}
