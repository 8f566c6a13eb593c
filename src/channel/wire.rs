//! Chat payload conventions and channel framing
//!
//! Payloads are plain strings. Chat lines carry the author as a
//! `"name: text"` prefix and game announcements use the reserved `"Bot: "`
//! prefix. On the socket each payload travels inside a JSON frame
//! `{"event": "<name>", "data": "<payload>"}`.

use serde::{Deserialize, Serialize};

/// Prefix marking messages synthesized by the guessing game
pub const BOT_PREFIX: &str = "Bot: ";

/// Classified inbound payload
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Inbound<'a> {
    /// Nothing but whitespace
    Blank,
    /// Game announcement, prefix stripped
    Bot(&'a str),
    /// Peer chat, kept verbatim
    Chat(&'a str),
}

pub fn chat_payload(author: &str, text: &str) -> String {
    format!("{author}: {text}")
}

pub fn bot_payload(text: &str) -> String {
    format!("{BOT_PREFIX}{text}")
}

pub fn classify(payload: &str) -> Inbound<'_> {
    if payload.trim().is_empty() {
        return Inbound::Blank;
    }
    match payload.strip_prefix(BOT_PREFIX) {
        Some(text) if text.trim().is_empty() => Inbound::Blank,
        Some(text) => Inbound::Bot(text),
        None => Inbound::Chat(payload),
    }
}

/// One event on the socket
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Frame {
    pub event: String,
    pub data: String,
}

impl Frame {
    pub fn new(event: impl Into<String>, data: impl Into<String>) -> Self {
        Self {
            event: event.into(),
            data: data.into(),
        }
    }

    pub fn encode(&self) -> Result<String, serde_json::Error> {
        serde_json::to_string(self)
    }

    pub fn decode(raw: &str) -> Result<Self, serde_json::Error> {
        serde_json::from_str(raw)
    }
}
