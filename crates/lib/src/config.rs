//! Configuration types and loading.
//!
//! Config is loaded from a JSON file (e.g. `~/.hello-bot/config.json`) and environment.
//! The bot token is the only required setting; everything else has a default.

use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use std::path::PathBuf;

/// Default Telegram Bot API endpoint.
pub const TELEGRAM_API_BASE: &str = "https://api.telegram.org";

/// Top-level application config.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Config {
    /// HTTP host settings.
    #[serde(default)]
    pub server: ServerConfig,

    /// Telegram bot settings.
    #[serde(default)]
    pub telegram: TelegramConfig,
}

/// Bind address and port for the HTTP host.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ServerConfig {
    /// Port for HTTP (default 8080).
    #[serde(default = "default_server_port")]
    pub port: u16,

    /// Bind address (default "127.0.0.1").
    #[serde(default = "default_server_bind")]
    pub bind: String,
}

fn default_server_port() -> u16 {
    8080
}

fn default_server_bind() -> String {
    "127.0.0.1".to_string()
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            port: default_server_port(),
            bind: default_server_bind(),
        }
    }
}

/// Telegram bot config.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TelegramConfig {
    /// Bot token from BotFather. Overridden by BOT_TOKEN env when set.
    pub bot_token: Option<String>,
    /// Bot username without the leading '@'. When set, `/help@other_bot` is not treated as a command.
    pub bot_username: Option<String>,
    /// Bot API base URL. Overridden by TELEGRAM_API_BASE env; defaults to the public endpoint.
    pub api_base: Option<String>,
    /// Public URL of the deployed function, used by `webhook set` when no URL is given.
    pub webhook_url: Option<String>,
}

fn non_empty(s: &str) -> Option<String> {
    let t = s.trim();
    if t.is_empty() {
        None
    } else {
        Some(t.to_string())
    }
}

/// Resolve the bot token: env BOT_TOKEN overrides config.
pub fn resolve_bot_token(config: &Config) -> Option<String> {
    std::env::var("BOT_TOKEN")
        .ok()
        .and_then(|s| non_empty(&s))
        .or_else(|| config.telegram.bot_token.as_deref().and_then(non_empty))
}

/// Resolve the Bot API base URL: env TELEGRAM_API_BASE overrides config, then the public default.
/// Any trailing '/' is dropped so method URLs can be built with `format!("{}/bot{}/...")`.
pub fn resolve_api_base(config: &Config) -> String {
    std::env::var("TELEGRAM_API_BASE")
        .ok()
        .and_then(|s| non_empty(&s))
        .or_else(|| config.telegram.api_base.as_deref().and_then(non_empty))
        .unwrap_or_else(|| TELEGRAM_API_BASE.to_string())
        .trim_end_matches('/')
        .to_string()
}

/// Bot username with any leading '@' removed; None when unset or blank.
pub fn resolve_bot_username(config: &Config) -> Option<String> {
    config
        .telegram
        .bot_username
        .as_deref()
        .map(|s| s.trim().trim_start_matches('@'))
        .and_then(non_empty)
}

/// Resolve config path from env or default.
pub fn default_config_path() -> PathBuf {
    std::env::var("HELLO_BOT_CONFIG_PATH")
        .map(PathBuf::from)
        .unwrap_or_else(|_| {
            dirs::home_dir()
                .map(|h| h.join(".hello-bot").join("config.json"))
                .unwrap_or_else(|| PathBuf::from("config.json"))
        })
}

/// Load config from the given path, or the default path (HELLO_BOT_CONFIG_PATH). Missing file => default config.
/// Returns the config and the path that was used.
pub fn load_config(path: Option<PathBuf>) -> Result<(Config, PathBuf)> {
    let path = path.unwrap_or_else(default_config_path);
    let config = if !path.exists() {
        log::debug!("config file not found, using defaults: {}", path.display());
        Config::default()
    } else {
        let s = std::fs::read_to_string(&path)
            .with_context(|| format!("reading config from {}", path.display()))?;
        serde_json::from_str(&s)
            .with_context(|| format!("parsing config from {}", path.display()))?
    };
    Ok((config, path))
}
