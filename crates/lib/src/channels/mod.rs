//! Communication channels (Telegram).
//!
//! Inbound: Telegram update payloads are normalized into [`InboundMessage`].
//! Outbound: replies go through the [`OutboundChannel`] trait; [`TelegramChannel`]
//! implements it on top of the Bot API.

mod inbound;
mod outbound;
mod telegram;
mod update;

pub use inbound::InboundMessage;
pub use outbound::OutboundChannel;
pub use telegram::{TelegramChannel, WebhookInfo};
pub use update::{TelegramChat, TelegramMessage, TelegramUpdate, TelegramUser};
