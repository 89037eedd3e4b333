//! Error types for the webhook dispatcher.
//!
//! Neither error is recovered inside the library; the host decides how a
//! failed invocation is surfaced (HTTP 500, non-zero exit code).

use thiserror::Error;

/// The inbound event body could not be turned into a Telegram update.
#[derive(Debug, Error)]
pub enum DecodeError {
    #[error("event body is not valid base64: {0}")]
    Base64(#[from] base64::DecodeError),

    #[error("event body is not valid UTF-8: {0}")]
    Utf8(#[from] std::string::FromUtf8Error),

    #[error("event body is not a valid update: {0}")]
    Json(#[from] serde_json::Error),
}

/// The reply could not be delivered through the outbound channel.
#[derive(Debug, Error)]
pub enum DeliverError {
    /// The bot token is missing, so no request was made.
    #[error("telegram bot token not configured")]
    NotConfigured,

    #[error("request to {method} failed: {source}")]
    Transport {
        method: &'static str,
        #[source]
        source: reqwest::Error,
    },

    #[error("{method} failed: {status} {body}")]
    Status {
        method: &'static str,
        status: u16,
        body: String,
    },

    /// HTTP succeeded but the Bot API answered `ok: false`.
    #[error("{method} returned ok: false: {description}")]
    Api {
        method: &'static str,
        description: String,
    },
}

/// Failure of one `handle` invocation.
#[derive(Debug, Error)]
pub enum HandlerError {
    #[error("decode failed: {0}")]
    Decode(#[from] DecodeError),

    #[error("deliver failed: {0}")]
    Deliver(#[from] DeliverError),
}
