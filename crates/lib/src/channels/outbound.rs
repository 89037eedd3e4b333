//! Outbound channel: the one capability the dispatcher consumes.

use crate::error::DeliverError;
use async_trait::async_trait;

/// Sends reply text to the conversation an inbound message came from.
#[async_trait]
pub trait OutboundChannel: Send + Sync {
    /// Channel id (e.g. "telegram").
    fn id(&self) -> &str;

    /// Send a text message to a conversation (e.g. Telegram chat_id).
    async fn send_message(&self, conversation_id: &str, text: &str) -> Result<(), DeliverError>;
}
