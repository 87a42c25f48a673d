//! Application configuration loader for Catchpost.
//!
//! Reads `config.toml` from the data directory (`~/.catchpost/` by default)
//! and deserializes it into [`AppConfig`]. Falls back to defaults when the
//! file is missing or malformed, then layers environment overrides on top.

use std::path::{Path, PathBuf};

use catchpost_types::config::AppConfig;
use catchpost_types::error::ConfigError;
use secrecy::SecretString;

use crate::sqlite::pool::database_url_for;

/// Data directory: `CATCHPOST_DATA_DIR`, or `~/.catchpost`.
pub fn data_dir() -> PathBuf {
    if let Ok(dir) = std::env::var("CATCHPOST_DATA_DIR") {
        return PathBuf::from(dir);
    }
    dirs::home_dir()
        .unwrap_or_else(|| PathBuf::from("."))
        .join(".catchpost")
}

/// Load configuration from `{data_dir}/config.toml`.
///
/// - If the file does not exist, returns [`AppConfig::default()`].
/// - If the file exists but fails to read or parse, logs a warning and
///   returns the default.
pub async fn load_app_config(data_dir: &Path) -> AppConfig {
    let config_path = data_dir.join("config.toml");

    let content = match tokio::fs::read_to_string(&config_path).await {
        Ok(content) => content,
        Err(err) if err.kind() == std::io::ErrorKind::NotFound => {
            tracing::debug!("No config.toml found at {}, using defaults", config_path.display());
            return AppConfig::default();
        }
        Err(err) => {
            tracing::warn!("Failed to read {}: {err}, using defaults", config_path.display());
            return AppConfig::default();
        }
    };

    match toml::from_str::<AppConfig>(&content) {
        Ok(config) => config,
        Err(err) => {
            tracing::warn!(
                "Failed to parse {}: {err}, using defaults",
                config_path.display()
            );
            AppConfig::default()
        }
    }
}

/// Apply environment overrides to a loaded config.
///
/// `lookup` is usually `|k| std::env::var(k).ok()`; tests pass a map.
/// Unparseable numeric values are logged and ignored.
pub fn apply_env_overrides(config: &mut AppConfig, lookup: impl Fn(&str) -> Option<String>) {
    let first = |keys: &[&'static str]| first_set(&lookup, keys);

    if let Some((key, value)) = first(&["MOD_CHAT_ID", "MODERATORS_CHAT_ID"]) {
        if let Some(id) = parse_number(key, &value) {
            config.moderation.moderator_chat_id = Some(id);
        }
    }
    if let Some((key, value)) = first(&["CHANNEL_ID", "MAIN_CHANNEL_ID"]) {
        if let Some(id) = parse_number(key, &value) {
            config.moderation.channel_id = Some(id);
        }
    }
    if let Some((key, value)) = first(&["PORT"]) {
        if let Some(port) = parse_number(key, &value) {
            config.server.port = port;
        }
    }
    if let Some((_, value)) = first(&["WEBHOOK_SECRET"]) {
        config.telegram.webhook_secret = Some(value.trim().to_string());
    }
    if let Some((_, value)) = first(&["CATCHPOST_DATABASE_URL"]) {
        config.database_url = Some(value.trim().to_string());
    }
}

/// First of `keys` that is set to a non-blank value.
fn first_set(
    lookup: &impl Fn(&str) -> Option<String>,
    keys: &[&'static str],
) -> Option<(&'static str, String)> {
    keys.iter().find_map(|&key| {
        lookup(key)
            .filter(|v| !v.trim().is_empty())
            .map(|v| (key, v))
    })
}

fn parse_number<T: std::str::FromStr>(key: &str, value: &str) -> Option<T>
where
    T::Err: std::fmt::Display,
{
    match value.trim().parse() {
        Ok(n) => Some(n),
        Err(err) => {
            tracing::warn!(key, value, "Ignoring invalid numeric setting: {err}");
            None
        }
    }
}

/// Read the bot token from `TELEGRAM_BOT_TOKEN`.
pub fn load_bot_token(lookup: impl Fn(&str) -> Option<String>) -> Result<SecretString, ConfigError> {
    lookup("TELEGRAM_BOT_TOKEN")
        .map(|t| t.trim().to_string())
        .filter(|t| !t.is_empty())
        .map(SecretString::from)
        .ok_or(ConfigError::Missing("TELEGRAM_BOT_TOKEN"))
}

/// The configured database URL, or `catchpost.db` in the data directory.
pub fn resolve_database_url(config: &AppConfig, data_dir: &Path) -> String {
    config
        .database_url
        .clone()
        .unwrap_or_else(|| database_url_for(data_dir))
}

#[cfg(test)]
mod tests {
    use super::*;
    use secrecy::ExposeSecret;
    use std::collections::HashMap;
    use tempfile::TempDir;

    fn env(pairs: &[(&str, &str)]) -> impl Fn(&str) -> Option<String> {
        let map: HashMap<String, String> = pairs
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        move |key| map.get(key).cloned()
    }

    #[tokio::test]
    async fn load_app_config_missing_file_returns_default() {
        let tmp = TempDir::new().unwrap();
        let config = load_app_config(tmp.path()).await;
        assert_eq!(config.server.port, 8080);
        assert!(config.moderation.moderator_chat_id.is_none());
    }

    #[tokio::test]
    async fn load_app_config_valid_toml_returns_parsed() {
        let tmp = TempDir::new().unwrap();
        tokio::fs::write(
            tmp.path().join("config.toml"),
            r#"
[moderation]
moderator_chat_id = -1001
channel_id = -1002
call_to_action = "Пишите нам"

[server]
port = 9000
"#,
        )
        .await
        .unwrap();

        let config = load_app_config(tmp.path()).await;
        assert_eq!(config.moderation.moderator_chat_id, Some(-1001));
        assert_eq!(config.moderation.channel_id, Some(-1002));
        assert_eq!(config.moderation.call_to_action, "Пишите нам");
        assert_eq!(config.server.port, 9000);
    }

    #[tokio::test]
    async fn load_app_config_invalid_toml_returns_default() {
        let tmp = TempDir::new().unwrap();
        tokio::fs::write(tmp.path().join("config.toml"), "this is not { valid toml !!!")
            .await
            .unwrap();

        let config = load_app_config(tmp.path()).await;
        assert_eq!(config.server.port, 8080);
    }

    #[test]
    fn env_overrides_replace_file_values() {
        let mut config = AppConfig::default();
        config.moderation.moderator_chat_id = Some(1);

        apply_env_overrides(
            &mut config,
            env(&[
                ("MOD_CHAT_ID", "-100500"),
                ("MAIN_CHANNEL_ID", "-100600"),
                ("PORT", "3000"),
                ("WEBHOOK_SECRET", "s3cret"),
                ("CATCHPOST_DATABASE_URL", "sqlite::memory:"),
            ]),
        );

        assert_eq!(config.moderation.moderator_chat_id, Some(-100500));
        assert_eq!(config.moderation.channel_id, Some(-100600));
        assert_eq!(config.server.port, 3000);
        assert_eq!(config.telegram.webhook_secret.as_deref(), Some("s3cret"));
        assert_eq!(config.database_url.as_deref(), Some("sqlite::memory:"));
    }

    #[test]
    fn env_primary_name_wins_over_alias() {
        let mut config = AppConfig::default();
        apply_env_overrides(
            &mut config,
            env(&[("MOD_CHAT_ID", "-1"), ("MODERATORS_CHAT_ID", "-2")]),
        );
        assert_eq!(config.moderation.moderator_chat_id, Some(-1));
    }

    #[test]
    fn env_invalid_numbers_are_ignored() {
        let mut config = AppConfig::default();
        config.moderation.channel_id = Some(-7);
        apply_env_overrides(&mut config, env(&[("CHANNEL_ID", "@channel"), ("PORT", "99999")]));
        assert_eq!(config.moderation.channel_id, Some(-7));
        assert_eq!(config.server.port, 8080);
    }

    #[test]
    fn bot_token_required() {
        let err = load_bot_token(env(&[])).unwrap_err();
        assert!(matches!(err, ConfigError::Missing("TELEGRAM_BOT_TOKEN")));
        assert!(load_bot_token(env(&[("TELEGRAM_BOT_TOKEN", "  ")])).is_err());

        let token = load_bot_token(env(&[("TELEGRAM_BOT_TOKEN", "123:abc")])).unwrap();
        assert_eq!(token.expose_secret(), "123:abc");
    }

    #[test]
    fn database_url_falls_back_to_data_dir() {
        let mut config = AppConfig::default();
        let url = resolve_database_url(&config, Path::new("/data"));
        assert_eq!(url, "sqlite:///data/catchpost.db");

        config.database_url = Some("sqlite:///elsewhere.db".to_string());
        assert_eq!(resolve_database_url(&config, Path::new("/data")), "sqlite:///elsewhere.db");
    }
}
