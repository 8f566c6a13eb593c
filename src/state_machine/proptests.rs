//! Property-based tests for the state machine
//!
//! These drive `transition` and `ConversationState::apply` together, the
//! same way the runtime does, minus the outbound I/O.

use super::*;
use crate::conversation::{ConversationState, Origin};
use crate::game::WordEntry;
use crate::sentiment;
use proptest::prelude::*;

// ============================================================================
// Test Helpers
// ============================================================================

fn test_context() -> ChatContext {
    ChatContext::new(Some("Ada".to_string()))
}

fn active(word: &str, hint: &str) -> GameState {
    GameState::RoundActive {
        round: GameRound::from_entry(&WordEntry::new(word, hint)),
    }
}

/// Run one event through the transition and apply its effects
fn step(state: &mut ConversationState, ctx: &ChatContext, event: Event) -> Option<Vec<Effect>> {
    let result = transition(state.game(), ctx, event).ok()?;
    state.set_game(result.new_state);
    for effect in &result.effects {
        state.apply(effect);
    }
    Some(result.effects)
}

// ============================================================================
// Arbitrary Generators
// ============================================================================

fn arb_word_entry() -> impl Strategy<Value = WordEntry> {
    ("[a-zA-Z]{1,10}", "[a-zA-Z ]{1,30}").prop_map(|(word, hint)| WordEntry::new(word, hint))
}

fn arb_text() -> impl Strategy<Value = String> {
    prop_oneof![
        "[a-zA-Z ]{0,30}",
        Just("I love this".to_string()),
        Just("bad and terrible".to_string()),
        Just("great good amazing".to_string()),
        Just(String::new()),
        Just("   ".to_string()),
    ]
}

fn arb_event() -> impl Strategy<Value = Event> {
    prop_oneof![
        arb_text().prop_map(Event::typed),
        arb_text().prop_map(Event::spoken),
        arb_text().prop_map(Event::remote),
        arb_text().prop_map(|t| Event::remote(format!("Bot: {t}"))),
        arb_word_entry().prop_map(|entry| Event::StartGame { entry }),
    ]
}

fn count_awards(effects: &[Effect]) -> usize {
    effects
        .iter()
        .filter(|e| matches!(e, Effect::AwardPoint { .. }))
        .count()
}

fn count_bot_appends(effects: &[Effect]) -> usize {
    effects
        .iter()
        .filter(|e| {
            matches!(
                e,
                Effect::AppendMessage {
                    origin: Origin::Bot,
                    ..
                }
            )
        })
        .count()
}

// ============================================================================
// Properties
// ============================================================================

proptest! {
    #![proptest_config(ProptestConfig::with_cases(500))]

    #[test]
    fn prop_score_is_deterministic(text in ".{0,80}") {
        prop_assert_eq!(sentiment::score(&text), sentiment::score(&text));
    }

    #[test]
    fn prop_score_ignores_token_order(words in proptest::collection::vec("[a-z]{1,8}|good|bad|love|hate", 0..12)) {
        let forward = words.join(" ");
        let mut reversed = words.clone();
        reversed.reverse();
        prop_assert_eq!(sentiment::score(&forward), sentiment::score(&reversed.join(" ")));
    }

    // Analytics never outgrows the log; equal exactly when no bot message was logged
    #[test]
    fn prop_analytics_bounded_by_log(events in proptest::collection::vec(arb_event(), 0..40)) {
        let mut state = ConversationState::new();
        let ctx = test_context();

        for event in events {
            step(&mut state, &ctx, event);
            let logged = state.messages().len();
            let scored = state.analytics().len();
            let bots = state.messages().iter().filter(|m| m.origin == Origin::Bot).count();

            prop_assert!(scored <= logged);
            prop_assert_eq!(scored + bots, logged);
        }
    }

    // Analytics order follows log order restricted to scored messages
    #[test]
    fn prop_analytics_follows_log_order(events in proptest::collection::vec(arb_event(), 0..40)) {
        let mut state = ConversationState::new();
        let ctx = test_context();
        for event in events {
            step(&mut state, &ctx, event);
        }

        let scored_texts: Vec<&str> = state
            .messages()
            .iter()
            .filter(|m| m.origin != Origin::Bot)
            .map(|m| m.text.as_str())
            .collect();
        let series_texts: Vec<&str> = state
            .analytics()
            .series()
            .iter()
            .map(|p| p.source_text.as_str())
            .collect();
        prop_assert_eq!(scored_texts, series_texts);
    }

    // Blank local input never reaches the log
    #[test]
    fn prop_blank_submission_is_ignored(blank in "[ \t\n]{0,5}", start_active in any::<bool>()) {
        let game = if start_active { active("cat", "pet") } else { GameState::Idle };
        let result = transition(&game, &test_context(), Event::typed(blank));
        prop_assert_eq!(result.unwrap_err(), TransitionError::EmptySubmission);
    }

    // Starting while a round runs never changes the round and emits nothing
    #[test]
    fn prop_start_while_active_is_rejected(current in arb_word_entry(), next in arb_word_entry()) {
        let game = GameState::RoundActive { round: GameRound::from_entry(&current) };
        let result = transition(&game, &test_context(), Event::StartGame { entry: next });
        prop_assert_eq!(result.unwrap_err(), TransitionError::InvalidRoundStart);

        let mut state = ConversationState::new();
        state.set_game(game.clone());
        let effects = step(&mut state, &test_context(), Event::StartGame { entry: current });
        prop_assert!(effects.is_none());
        prop_assert_eq!(state.game(), &game);
        prop_assert!(state.messages().is_empty());
    }

    // A correct guess ends the round with exactly one award and no analytics
    #[test]
    fn prop_correct_guess_awards_once(entry in arb_word_entry(), upper in any::<bool>()) {
        let game = GameState::RoundActive { round: GameRound::from_entry(&entry) };
        let guess = if upper { entry.word.to_uppercase() } else { entry.word.to_lowercase() };

        let result = transition(&game, &test_context(), Event::typed(guess)).unwrap();
        prop_assert_eq!(&result.new_state, &GameState::Idle);
        prop_assert_eq!(count_awards(&result.effects), 1);
        prop_assert_eq!(count_bot_appends(&result.effects), 1);
        let scored = result
            .effects
            .iter()
            .any(|e| matches!(e, Effect::RecordAnalytics { .. }));
        prop_assert!(!scored);
    }

    // A wrong guess keeps the round and awards nothing
    #[test]
    fn prop_wrong_guess_keeps_round(entry in arb_word_entry(), guess in "[0-9]{1,6}") {
        let game = GameState::RoundActive { round: GameRound::from_entry(&entry) };

        let result = transition(&game, &test_context(), Event::typed(guess)).unwrap();
        prop_assert_eq!(&result.new_state, &game);
        prop_assert_eq!(count_awards(&result.effects), 0);
        prop_assert_eq!(count_bot_appends(&result.effects), 1);
    }

    // Leaderboard length equals the number of rounds won
    #[test]
    fn prop_leaderboard_counts_wins(entries in proptest::collection::vec(arb_word_entry(), 1..6)) {
        let mut state = ConversationState::new();
        let ctx = test_context();

        for entry in &entries {
            step(&mut state, &ctx, Event::StartGame { entry: entry.clone() });
            step(&mut state, &ctx, Event::typed("0"));
            step(&mut state, &ctx, Event::typed(entry.word.to_uppercase()));
            prop_assert!(!state.game().is_active());
        }

        prop_assert_eq!(state.leaderboard().len(), entries.len());
        prop_assert!(state.leaderboard().iter().all(|e| e.user == "Ada" && e.score == 1));
        prop_assert!(state.analytics().is_empty());
    }

    // Remote traffic never changes the game state
    #[test]
    fn prop_remote_never_guesses(payload in arb_text(), word in "[a-z]{1,8}") {
        let game = active(&word, "hint");
        if let Ok(result) = transition(&game, &test_context(), Event::remote(payload)) {
            prop_assert_eq!(&result.new_state, &game);
            prop_assert_eq!(count_awards(&result.effects), 0);
        }

        let won = transition(&game, &test_context(), Event::remote(word)).unwrap();
        prop_assert_eq!(&won.new_state, &game);
    }
}
