//! Events that can reach the conversation engine

use crate::game::WordEntry;

/// Where a local submission came from
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum InputSource {
    Keyboard,
    /// Final transcript from speech recognition
    Voice,
}

/// Events that trigger state transitions
#[derive(Debug, Clone)]
pub enum Event {
    /// Text submitted by the local user
    LocalSubmit { text: String, source: InputSource },

    /// Payload received from the chat channel
    RemoteMessage { payload: String },

    /// Request to start a round with an already chosen entry
    StartGame { entry: WordEntry },
}

impl Event {
    pub fn typed(text: impl Into<String>) -> Self {
        Event::LocalSubmit {
            text: text.into(),
            source: InputSource::Keyboard,
        }
    }

    pub fn spoken(text: impl Into<String>) -> Self {
        Event::LocalSubmit {
            text: text.into(),
            source: InputSource::Voice,
        }
    }

    pub fn remote(payload: impl Into<String>) -> Self {
        Event::RemoteMessage {
            payload: payload.into(),
        }
    }

    /// Short label for logging
    pub fn kind(&self) -> &'static str {
        match self {
            Event::LocalSubmit { .. } => "local_submit",
            Event::RemoteMessage { .. } => "remote_message",
            Event::StartGame { .. } => "start_game",
        }
    }
}
