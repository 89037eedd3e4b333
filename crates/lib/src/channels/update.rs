//! Telegram update payload (webhook POST body).
//!
//! Only the fields the dispatcher reads are modelled; unknown fields are ignored.

use crate::channels::inbound::InboundMessage;
use serde::Deserialize;

#[derive(Debug, Clone, Deserialize)]
pub struct TelegramUpdate {
    #[serde(default)]
    pub update_id: i64,
    #[serde(default)]
    pub message: Option<TelegramMessage>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct TelegramMessage {
    #[serde(default)]
    pub message_id: i64,
    pub chat: TelegramChat,
    #[serde(default)]
    pub from: Option<TelegramUser>,
    #[serde(default)]
    pub text: Option<String>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct TelegramChat {
    pub id: i64,
}

#[derive(Debug, Clone, Deserialize)]
pub struct TelegramUser {
    #[serde(default)]
    pub id: i64,
    #[serde(default)]
    pub first_name: String,
    #[serde(default)]
    pub username: Option<String>,
}

impl TelegramUser {
    /// Username when present, otherwise first name.
    pub fn handle(&self) -> &str {
        self.username.as_deref().unwrap_or(&self.first_name)
    }
}

impl TelegramUpdate {
    /// The text message carried by this update, if any. Edited messages, callback
    /// queries and non-text messages yield None.
    pub fn inbound_message(&self) -> Option<InboundMessage> {
        let msg = self.message.as_ref()?;
        let text = msg.text.as_ref()?;
        Some(InboundMessage {
            conversation_id: msg.chat.id.to_string(),
            sender_handle: msg
                .from
                .as_ref()
                .map(|u| u.handle().to_string())
                .unwrap_or_default(),
            text: text.clone(),
        })
    }
}
