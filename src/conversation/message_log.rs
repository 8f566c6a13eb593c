//! Append-only message log

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Who authored a message
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Origin {
    /// The local user
    Own,
    /// Another participant on the channel
    Peer,
    /// Synthesized by the guessing game, locally or by a peer's client
    Bot,
}

/// A logged message. Immutable once appended.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Message {
    /// Position in the log, starting at 1
    pub sequence: u64,
    pub origin: Origin,
    pub text: String,
    pub sent_at: DateTime<Utc>,
}

/// Ordered store of every message the engine has accepted.
///
/// Append order is display order; there is no API to remove or edit entries.
#[derive(Debug, Default, Clone)]
pub struct MessageLog {
    messages: Vec<Message>,
}

impl MessageLog {
    pub fn append(&mut self, origin: Origin, text: impl Into<String>, sent_at: DateTime<Utc>) -> &Message {
        let sequence = self.messages.len() as u64 + 1;
        self.messages.push(Message {
            sequence,
            origin,
            text: text.into(),
            sent_at,
        });
        &self.messages[self.messages.len() - 1]
    }

    pub fn all(&self) -> &[Message] {
        &self.messages
    }
}
