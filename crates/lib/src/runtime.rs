//! Process-wide dispatcher, created on first use (cold start) and reused afterwards.

use crate::channels::TelegramChannel;
use crate::config::{self, Config};
use crate::handler::Dispatcher;
use anyhow::Result;
use std::sync::Arc;
use tokio::sync::OnceCell;

static DISPATCHER: OnceCell<Dispatcher> = OnceCell::const_new();

/// Build a dispatcher over a Telegram channel. Fails when no bot token is configured.
pub fn build_dispatcher(config: &Config) -> Result<Dispatcher> {
    let channel = TelegramChannel::from_config(config);
    if !channel.has_token() {
        anyhow::bail!("bot token not configured: set BOT_TOKEN or telegram.botToken");
    }
    log::info!("telegram channel initialized");
    Ok(Dispatcher::new(
        Arc::new(channel),
        config::resolve_bot_username(config),
    ))
}

/// The shared dispatcher. Concurrent first calls initialize it exactly once;
/// later calls ignore `config` and return the existing instance.
pub async fn dispatcher(config: &Config) -> Result<&'static Dispatcher> {
    DISPATCHER
        .get_or_try_init(|| async { build_dispatcher(config) })
        .await
}
