//! Reply rules: classify an inbound text and render the canned reply.
//!
//! Pure functions, no I/O. The start command wins over help, help over plain text.

/// Greeting sent for `/start`. The sender handle is never interpolated here.
pub const START_GREETING: &str = "Hello. \nMy name is Hello Telegram Bot \nDeloyed by SourceCraft CI and Powered by Yandex Cloud Function.";

/// Which canned reply an inbound message gets.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ReplyRule {
    Start,
    Help,
    Text,
}

impl ReplyRule {
    /// Render the reply text. `sender_handle` is inserted literally.
    pub fn reply(self, sender_handle: &str) -> String {
        match self {
            ReplyRule::Start => START_GREETING.to_string(),
            ReplyRule::Help => format!(
                "Hello, {}.\nI can say Hello and nothing more",
                sender_handle
            ),
            ReplyRule::Text => format!("Hello, {}", sender_handle),
        }
    }
}

/// Split a bot command off the front of a message: `/help@my_bot args` -> ("help", Some("my_bot")).
/// Returns None when the text does not start with '/' or the command name is empty.
pub fn parse_command(text: &str) -> Option<(&str, Option<&str>)> {
    let first = text.split_whitespace().next()?;
    if !text.starts_with('/') {
        return None;
    }
    let name = &first[1..];
    let (name, mention) = match name.split_once('@') {
        Some((n, m)) => (n, Some(m)),
        None => (name, None),
    };
    if name.is_empty() {
        return None;
    }
    Some((name, mention))
}

/// Classify message text. When `bot_username` is set, a command mentioning a
/// different bot is treated as plain text.
pub fn classify(text: &str, bot_username: Option<&str>) -> ReplyRule {
    let Some((name, mention)) = parse_command(text) else {
        return ReplyRule::Text;
    };
    if let (Some(m), Some(me)) = (mention, bot_username) {
        if !m.eq_ignore_ascii_case(me) {
            return ReplyRule::Text;
        }
    }
    match name {
        "start" => ReplyRule::Start,
        "help" => ReplyRule::Help,
        _ => ReplyRule::Text,
    }
}
