//! Hello Bot core library: Telegram update decoding, reply rules, the webhook
//! dispatcher, and the HTTP host used by the CLI.

pub mod channels;
pub mod config;
pub mod dispatch;
pub mod error;
pub mod handler;
pub mod runtime;
pub mod server;
