//! Runtime for the conversation engine
//!
//! The executor owns the state and drains one event queue. Everything else
//! (console, channel reader, voice capture) talks to it through a
//! `ConversationHandle` and listens to `ChatUpdate` broadcasts.

mod executor;
pub mod traits;


pub use executor::ConversationRuntime;
pub use traits::*;

use crate::conversation::ChatUpdate;
use crate::game::{WordPicker, WordTable};
use crate::state_machine::{Event, InputSource};
use std::sync::Arc;
use thiserror::Error;
use tokio::sync::{broadcast, mpsc};

/// Capacity of the `ChatUpdate` broadcast channel
pub const BROADCAST_CAPACITY: usize = 256;

#[derive(Debug, Error)]
#[error("Conversation engine has stopped")]
pub struct EngineClosed;

/// Handle to submit events to a running conversation
#[derive(Clone)]
pub struct ConversationHandle {
    event_tx: mpsc::Sender<Event>,
    broadcast_tx: broadcast::Sender<ChatUpdate>,
    words: Arc<WordTable>,
    picker: Arc<dyn WordPicker>,
}

impl ConversationHandle {
    pub fn new(
        event_tx: mpsc::Sender<Event>,
        broadcast_tx: broadcast::Sender<ChatUpdate>,
        words: Arc<WordTable>,
        picker: Arc<dyn WordPicker>,
    ) -> Self {
        Self {
            event_tx,
            broadcast_tx,
            words,
            picker,
        }
    }

    pub async fn submit(&self, text: impl Into<String>, source: InputSource) -> Result<(), EngineClosed> {
        let event = match source {
            InputSource::Keyboard => Event::typed(text),
            InputSource::Voice => Event::spoken(text),
        };
        self.send(event).await
    }

    /// Pick a word and ask the engine to start a round. The engine refuses
    /// if a round is already running.
    pub async fn start_game(&self) -> Result<(), EngineClosed> {
        let entry = self.picker.pick(&self.words).clone();
        tracing::debug!(hint = %entry.hint, "Requesting new round");
        self.send(Event::StartGame { entry }).await
    }

    pub async fn send(&self, event: Event) -> Result<(), EngineClosed> {
        self.event_tx.send(event).await.map_err(|_| EngineClosed)
    }

    pub fn subscribe(&self) -> broadcast::Receiver<ChatUpdate> {
        self.broadcast_tx.subscribe()
    }

    /// Raw queue sender for producers that build their own events
    pub fn event_sender(&self) -> mpsc::Sender<Event> {
        self.event_tx.clone()
    }
}
