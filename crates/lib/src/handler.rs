//! Webhook dispatcher: one inbound event in, at most one reply out, one HTTP ack back.
//!
//! The event envelope mirrors what an HTTP-triggered cloud function receives:
//! `{"httpMethod": "POST", "body": "<update json>", "isBase64Encoded": false}`.

use crate::channels::{InboundMessage, OutboundChannel, TelegramUpdate};
use crate::dispatch::{self, ReplyRule};
use crate::error::{DecodeError, HandlerError};
use base64::Engine;
use serde::{Deserialize, Serialize};
use std::sync::Arc;

/// HTTP-trigger event delivered by the hosting platform.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct WebhookEvent {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub http_method: Option<String>,
    /// Serialized Telegram update.
    #[serde(default)]
    pub body: String,
    /// When true, `body` is base64 of the update JSON.
    #[serde(default)]
    pub is_base64_encoded: bool,
}

impl WebhookEvent {
    /// Wrap a raw update body (as Telegram POSTs it) into an event.
    pub fn from_body(body: impl Into<String>) -> Self {
        Self {
            http_method: Some("POST".to_string()),
            body: body.into(),
            is_base64_encoded: false,
        }
    }

    /// Decode the body into a Telegram update.
    pub fn decode(&self) -> Result<TelegramUpdate, DecodeError> {
        if self.is_base64_encoded {
            let bytes = base64::engine::general_purpose::STANDARD.decode(self.body.trim())?;
            let text = String::from_utf8(bytes)?;
            Ok(serde_json::from_str(&text)?)
        } else {
            Ok(serde_json::from_str(&self.body)?)
        }
    }
}

/// Function result returned to the hosting platform.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct HttpResponse {
    pub status_code: u16,
    pub body: String,
}

impl HttpResponse {
    /// `{statusCode: 200, body: ""}`.
    pub fn ok() -> Self {
        Self {
            status_code: 200,
            body: String::new(),
        }
    }
}

/// Routes decoded messages to the reply rules and sends the reply.
pub struct Dispatcher {
    channel: Arc<dyn OutboundChannel>,
    bot_username: Option<String>,
}

impl Dispatcher {
    pub fn new(channel: Arc<dyn OutboundChannel>, bot_username: Option<String>) -> Self {
        Self {
            channel,
            bot_username,
        }
    }

    /// Reply rule for a message, honoring the configured bot username for `@mention` commands.
    pub fn rule_for(&self, msg: &InboundMessage) -> ReplyRule {
        dispatch::classify(&msg.text, self.bot_username.as_deref())
    }

    /// Handle one event. The reply send is awaited before the 200 is returned;
    /// any decode or delivery failure is returned as-is.
    pub async fn handle(&self, event: &WebhookEvent) -> Result<HttpResponse, HandlerError> {
        let update = event.decode()?;
        let Some(msg) = update.inbound_message() else {
            log::debug!("update {} carries no text message, nothing to reply", update.update_id);
            return Ok(HttpResponse::ok());
        };
        let rule = self.rule_for(&msg);
        log::debug!(
            "update {}: {:?} reply to {} via {}",
            update.update_id,
            rule,
            msg.conversation_id,
            self.channel.id()
        );
        let reply = rule.reply(&msg.sender_handle);
        self.channel
            .send_message(&msg.conversation_id, &reply)
            .await?;
        Ok(HttpResponse::ok())
    }
}
