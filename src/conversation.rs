//! Conversation state owned by the engine
//!
//! The message log, the analytics series, the leaderboard and the current
//! game state live together here so that one event updates all of them in a
//! single step. Only the runtime holds a mutable `ConversationState`.

pub mod analytics;
pub mod leaderboard;
pub mod message_log;

pub use analytics::{AnalyticsPoint, AnalyticsSeries, SentimentSummary};
pub use leaderboard::{Leaderboard, LeaderboardEntry};
pub use message_log::{Message, MessageLog, Origin};

use crate::state_machine::{Effect, GameState};
use chrono::Utc;
use serde::Serialize;

/// Change notifications for read-only consumers (console, dashboards)
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum ChatUpdate {
    MessageAppended { message: Message },
    AnalyticsRecorded { point: AnalyticsPoint },
    LeaderboardUpdated { entry: LeaderboardEntry },
    RoundStarted { hint: String },
    RoundEnded,
}

#[derive(Debug, Default, Clone)]
pub struct ConversationState {
    messages: MessageLog,
    analytics: AnalyticsSeries,
    leaderboard: Leaderboard,
    game: GameState,
}

impl ConversationState {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn messages(&self) -> &[Message] {
        self.messages.all()
    }

    pub fn analytics(&self) -> &AnalyticsSeries {
        &self.analytics
    }

    pub fn leaderboard(&self) -> &[LeaderboardEntry] {
        self.leaderboard.entries()
    }

    pub fn game(&self) -> &GameState {
        &self.game
    }

    /// Apply a state-changing effect. Outbound effects are the runtime's
    /// business and leave the state untouched.
    pub fn apply(&mut self, effect: &Effect) -> Option<ChatUpdate> {
        match effect {
            Effect::AppendMessage { origin, text } => {
                let message = self.messages.append(*origin, text.clone(), Utc::now()).clone();
                Some(ChatUpdate::MessageAppended { message })
            }
            Effect::RecordAnalytics { text } => {
                let point = self.analytics.record(text);
                Some(ChatUpdate::AnalyticsRecorded { point })
            }
            Effect::AwardPoint { user } => {
                let entry = self.leaderboard.award(user.clone());
                Some(ChatUpdate::LeaderboardUpdated { entry })
            }
            Effect::SendToChannel { .. } | Effect::Speak { .. } => None,
        }
    }

    /// Replace the game state, reporting round start/end
    pub fn set_game(&mut self, new_state: GameState) -> Option<ChatUpdate> {
        let update = match (&self.game, &new_state) {
            (GameState::Idle, GameState::RoundActive { round }) => Some(ChatUpdate::RoundStarted {
                hint: round.hint.clone(),
            }),
            (GameState::RoundActive { .. }, GameState::Idle) => Some(ChatUpdate::RoundEnded),
            _ => None,
        };
        self.game = new_state;
        update
    }
}
