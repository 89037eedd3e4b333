//! Inbound message from a channel: the part of an update the dispatcher needs.

/// A text message from a channel, ready to be classified and answered.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct InboundMessage {
    /// Where the reply goes (Telegram chat id).
    pub conversation_id: String,
    /// Sender display handle, interpolated as-is into replies.
    pub sender_handle: String,
    pub text: String,
}
