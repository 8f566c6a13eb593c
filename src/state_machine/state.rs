//! Guessing-game state and session context

use crate::game::WordEntry;
use serde::{Deserialize, Serialize};

/// Display name used when the user has not set one
pub const FALLBACK_DISPLAY_NAME: &str = "You";

/// An active round of the guessing game
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct GameRound {
    /// Always lowercase
    pub target_word: String,
    pub hint: String,
}

impl GameRound {
    pub fn from_entry(entry: &WordEntry) -> Self {
        Self {
            target_word: entry.word.trim().to_lowercase(),
            hint: entry.hint.clone(),
        }
    }

    /// Case-insensitive comparison against the target, ignoring surrounding whitespace
    pub fn is_correct(&self, guess: &str) -> bool {
        guess.trim().to_lowercase() == self.target_word
    }
}

/// Game state
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum GameState {
    /// No round in progress; local input is plain chat
    #[default]
    Idle,

    /// A round is running; local input is treated as a guess
    RoundActive { round: GameRound },
}

impl GameState {
    pub fn is_active(&self) -> bool {
        matches!(self, GameState::RoundActive { .. })
    }

    pub fn round(&self) -> Option<&GameRound> {
        match self {
            GameState::Idle => None,
            GameState::RoundActive { round } => Some(round),
        }
    }
}

/// Context for a chat session (immutable configuration)
#[derive(Debug, Clone, Default)]
pub struct ChatContext {
    pub username: Option<String>,
}

impl ChatContext {
    pub fn new(username: Option<String>) -> Self {
        Self {
            username: username.filter(|name| !name.trim().is_empty()),
        }
    }

    /// Name used on the wire and on the leaderboard
    pub fn display_name(&self) -> &str {
        self.username.as_deref().unwrap_or(FALLBACK_DISPLAY_NAME)
    }
}
