//! Pure state transition function

use super::{ChatContext, Effect, Event, GameRound, GameState};
use crate::channel::wire::{self, Inbound};
use crate::conversation::Origin;
use thiserror::Error;

/// Result of a state transition
#[derive(Debug)]
pub struct TransitionResult {
    pub new_state: GameState,
    pub effects: Vec<Effect>,
}

impl TransitionResult {
    pub fn new(state: GameState) -> Self {
        Self {
            new_state: state,
            effects: vec![],
        }
    }

    pub fn with_effect(mut self, effect: Effect) -> Self {
        self.effects.push(effect);
        self
    }

    pub fn with_effects(mut self, effects: impl IntoIterator<Item = Effect>) -> Self {
        self.effects.extend(effects);
        self
    }
}

/// Events the engine refuses. Both are recovered locally.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum TransitionError {
    #[error("A round is already in progress")]
    InvalidRoundStart,
    #[error("Nothing to send: message is blank")]
    EmptySubmission,
}

pub fn round_start_message(round: &GameRound) -> String {
    format!("Let's play a game! Guess the word: {}", round.hint)
}

pub fn correct_guess_message(round: &GameRound) -> String {
    format!("Correct! 🎉 The word was: {}", round.target_word)
}

pub fn wrong_guess_message(round: &GameRound) -> String {
    format!("Not quite! Try again. Hint: {}", round.hint)
}

/// Pure transition function
///
/// Given the same inputs it always produces the same outputs and performs
/// no I/O. Randomness (choosing the word) happens before the event is built.
pub fn transition(
    state: &GameState,
    context: &ChatContext,
    event: Event,
) -> Result<TransitionResult, TransitionError> {
    match (state, event) {
        // ============================================================
        // Local input
        // ============================================================
        (_, Event::LocalSubmit { text, .. }) if text.trim().is_empty() => {
            Err(TransitionError::EmptySubmission)
        }

        // RoundActive + LocalSubmit -> guess
        (GameState::RoundActive { round }, Event::LocalSubmit { text, .. }) => {
            Ok(check_guess(round, context, &text))
        }

        // Idle + LocalSubmit -> plain chat, scored
        (GameState::Idle, Event::LocalSubmit { text, .. }) => {
            let payload = wire::chat_payload(context.display_name(), &text);
            Ok(TransitionResult::new(GameState::Idle)
                .with_effect(Effect::append(Origin::Own, text.clone()))
                .with_effect(Effect::RecordAnalytics { text })
                .with_effect(Effect::SendToChannel { payload }))
        }

        // ============================================================
        // Remote input (never a guess)
        // ============================================================
        (_, Event::RemoteMessage { payload }) => match wire::classify(&payload) {
            Inbound::Blank => Err(TransitionError::EmptySubmission),
            Inbound::Bot(text) => {
                let text = text.to_string();
                Ok(TransitionResult::new(state.clone())
                    .with_effect(Effect::append(Origin::Bot, text.clone()))
                    .with_effect(Effect::Speak { text }))
            }
            Inbound::Chat(text) => {
                let text = text.to_string();
                Ok(TransitionResult::new(state.clone())
                    .with_effect(Effect::append(Origin::Peer, text.clone()))
                    .with_effect(Effect::RecordAnalytics { text }))
            }
        },

        // ============================================================
        // Round lifecycle
        // ============================================================
        (GameState::Idle, Event::StartGame { entry }) => {
            let round = GameRound::from_entry(&entry);
            let announcement = round_start_message(&round);
            Ok(TransitionResult::new(GameState::RoundActive { round })
                .with_effects(Effect::bot_message(&announcement)))
        }

        (GameState::RoundActive { .. }, Event::StartGame { .. }) => {
            Err(TransitionError::InvalidRoundStart)
        }
    }
}

fn check_guess(round: &GameRound, context: &ChatContext, guess: &str) -> TransitionResult {
    if round.is_correct(guess) {
        TransitionResult::new(GameState::Idle)
            .with_effects(Effect::bot_message(&correct_guess_message(round)))
            .with_effect(Effect::AwardPoint {
                user: context.display_name().to_string(),
            })
    } else {
        TransitionResult::new(GameState::RoundActive {
            round: round.clone(),
        })
        .with_effects(Effect::bot_message(&wrong_guess_message(round)))
    }
}
