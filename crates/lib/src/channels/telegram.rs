//! Telegram channel: sendMessage and webhook management via the Bot API.

use crate::channels::outbound::OutboundChannel;
use crate::config::{self, Config};
use crate::error::DeliverError;
use async_trait::async_trait;
use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};

/// Envelope of every Bot API response.
#[derive(Debug, Deserialize)]
struct ApiResponse<T> {
    ok: bool,
    #[serde(default)]
    description: Option<String>,
    result: Option<T>,
}

/// getWebhookInfo result.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct WebhookInfo {
    /// Empty when no webhook is set.
    #[serde(default)]
    pub url: String,
    #[serde(default)]
    pub pending_update_count: i64,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub last_error_date: Option<i64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub last_error_message: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub allowed_updates: Option<Vec<String>>,
}

impl WebhookInfo {
    /// True when the webhook points at `expected` (ignoring surrounding whitespace and a trailing '/').
    pub fn points_to(&self, expected: &str) -> bool {
        let norm = |s: &str| s.trim().trim_end_matches('/').to_string();
        !self.url.trim().is_empty() && norm(&self.url) == norm(expected)
    }
}

/// Telegram channel connector: one reqwest client reused for every call.
pub struct TelegramChannel {
    id: String,
    token: Option<String>,
    api_base: String,
    client: reqwest::Client,
}

impl TelegramChannel {
    pub fn new(token: Option<String>, api_base: impl Into<String>) -> Self {
        Self {
            id: "telegram".to_string(),
            token,
            api_base: api_base.into(),
            client: reqwest::Client::new(),
        }
    }

    /// Build from config: token from BOT_TOKEN or config, API base from TELEGRAM_API_BASE or config.
    pub fn from_config(config: &Config) -> Self {
        Self::new(
            config::resolve_bot_token(config),
            config::resolve_api_base(config),
        )
    }

    pub fn has_token(&self) -> bool {
        self.token.is_some()
    }

    /// POST a Bot API method and unwrap the `{ok, result}` envelope.
    async fn call<T: DeserializeOwned>(
        &self,
        method: &'static str,
        body: Option<serde_json::Value>,
    ) -> Result<Option<T>, DeliverError> {
        let token = self.token.as_ref().ok_or(DeliverError::NotConfigured)?;
        // The URL embeds the token; transport errors are stored without it.
        let url = format!("{}/bot{}/{}", self.api_base, token, method);
        let req = self.client.post(&url);
        let req = match body {
            Some(b) => req.json(&b),
            None => req,
        };
        let res = req
            .send()
            .await
            .map_err(|e| DeliverError::Transport {
                method,
                source: e.without_url(),
            })?;
        if !res.status().is_success() {
            let status = res.status().as_u16();
            let body = res.text().await.unwrap_or_default();
            return Err(DeliverError::Status {
                method,
                status,
                body,
            });
        }
        let data: ApiResponse<T> = res
            .json()
            .await
            .map_err(|e| DeliverError::Transport {
                method,
                source: e.without_url(),
            })?;
        if !data.ok {
            return Err(DeliverError::Api {
                method,
                description: data.description.unwrap_or_default(),
            });
        }
        Ok(data.result)
    }

    /// Send a text message to a chat via sendMessage API.
    pub async fn send_message(&self, chat_id: &str, text: &str) -> Result<(), DeliverError> {
        let body = serde_json::json!({ "chat_id": chat_id, "text": text });
        self.call::<serde_json::Value>("sendMessage", Some(body)).await?;
        log::debug!("telegram: sent reply to chat {}", chat_id);
        Ok(())
    }

    /// Current webhook status (getWebhookInfo).
    pub async fn get_webhook_info(&self) -> Result<WebhookInfo, DeliverError> {
        Ok(self
            .call::<WebhookInfo>("getWebhookInfo", None)
            .await?
            .unwrap_or_default())
    }

    /// Set webhook URL. Telegram then POSTs message updates to the URL.
    pub async fn set_webhook(&self, url: &str) -> Result<(), DeliverError> {
        let body = serde_json::json!({ "url": url, "allowed_updates": ["message"] });
        self.call::<bool>("setWebhook", Some(body)).await?;
        Ok(())
    }

    /// Remove the webhook.
    pub async fn delete_webhook(&self) -> Result<(), DeliverError> {
        self.call::<bool>("deleteWebhook", None).await?;
        Ok(())
    }
}

#[async_trait]
impl OutboundChannel for TelegramChannel {
    fn id(&self) -> &str {
        &self.id
    }

    async fn send_message(&self, conversation_id: &str, text: &str) -> Result<(), DeliverError> {
        TelegramChannel::send_message(self, conversation_id, text).await
    }
}
