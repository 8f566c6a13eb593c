//! Conversation runtime executor

use super::traits::{ChannelSink, SpeechOutput};
use crate::conversation::{ChatUpdate, ConversationState};
use crate::state_machine::{transition, ChatContext, Effect, Event, TransitionError};
use tokio::sync::{broadcast, mpsc};
use tokio_util::sync::CancellationToken;

/// Single consumer of the event queue and sole writer of `ConversationState`.
///
/// Each event is handled to completion (transition, then every effect in
/// order) before the next one is received.
pub struct ConversationRuntime<C, S>
where
    C: ChannelSink + 'static,
    S: SpeechOutput + 'static,
{
    context: ChatContext,
    state: ConversationState,
    channel: C,
    speech: S,
    event_rx: mpsc::Receiver<Event>,
    broadcast_tx: broadcast::Sender<ChatUpdate>,
    cancel: CancellationToken,
}

impl<C, S> ConversationRuntime<C, S>
where
    C: ChannelSink + 'static,
    S: SpeechOutput + 'static,
{
    pub fn new(
        context: ChatContext,
        channel: C,
        speech: S,
        event_rx: mpsc::Receiver<Event>,
        broadcast_tx: broadcast::Sender<ChatUpdate>,
        cancel: CancellationToken,
    ) -> Self {
        Self {
            context,
            state: ConversationState::new(),
            channel,
            speech,
            event_rx,
            broadcast_tx,
            cancel,
        }
    }

    /// Process events until cancelled or every sender is gone, then hand
    /// back the final state.
    pub async fn run(mut self) -> ConversationState {
        tracing::info!(user = %self.context.display_name(), "Starting conversation runtime");

        loop {
            tokio::select! {
                biased;
                () = self.cancel.cancelled() => break,
                maybe_event = self.event_rx.recv() => {
                    let Some(event) = maybe_event else { break };
                    let kind = event.kind();
                    if let Err(e) = self.process_event(event).await {
                        // Both rejections are expected user behavior, not failures
                        tracing::debug!(event = kind, error = %e, "Event ignored");
                    }
                }
            }
        }

        tracing::info!(
            messages = self.state.messages().len(),
            scored = self.state.analytics().len(),
            wins = self.state.leaderboard().len(),
            round_active = self.state.game().is_active(),
            "Conversation runtime stopped"
        );
        self.state
    }

    pub async fn process_event(&mut self, event: Event) -> Result<(), TransitionError> {
        let result = transition(self.state.game(), &self.context, event)?;

        if let Some(update) = self.state.set_game(result.new_state) {
            self.notify(update);
        }

        for effect in result.effects {
            self.execute_effect(effect).await;
        }

        Ok(())
    }

    async fn execute_effect(&mut self, effect: Effect) {
        match effect {
            Effect::SendToChannel { payload } => {
                if let Err(e) = self.channel.send(payload).await {
                    tracing::warn!(error = %e, "Failed to hand message to channel");
                }
            }
            Effect::Speak { text } => self.speech.speak(&text),
            effect => {
                if let Some(update) = self.state.apply(&effect) {
                    self.notify(update);
                }
            }
        }
    }

    fn notify(&self, update: ChatUpdate) {
        // No subscribers is fine
        let _ = self.broadcast_tx.send(update);
    }
}
