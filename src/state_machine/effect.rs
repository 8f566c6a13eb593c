//! Effects produced by state transitions

use crate::channel::wire;
use crate::conversation::Origin;

/// Effects to be executed after state transition, in order
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Effect {
    /// Append a message to the log
    AppendMessage { origin: Origin, text: String },

    /// Score text and add it to the analytics series
    RecordAnalytics { text: String },

    /// Add a leaderboard entry for a correct guess
    AwardPoint { user: String },

    /// Transmit a payload to peers
    SendToChannel { payload: String },

    /// Play text through the speech synthesizer
    Speak { text: String },
}

impl Effect {
    pub fn append(origin: Origin, text: impl Into<String>) -> Self {
        Effect::AppendMessage {
            origin,
            text: text.into(),
        }
    }

    /// Effects for a bot message produced by this client: log it, share it
    /// with peers and read it aloud. Bot text is never scored.
    pub fn bot_message(text: &str) -> [Self; 3] {
        [
            Effect::append(Origin::Bot, text),
            Effect::SendToChannel {
                payload: wire::bot_payload(text),
            },
            Effect::Speak {
                text: text.to_string(),
            },
        ]
    }
}
