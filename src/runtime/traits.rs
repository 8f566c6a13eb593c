//! Trait abstractions for runtime I/O
//!
//! These traits enable testing the executor with mock implementations.

use crate::channel::ChannelError;
use crate::voice::Capability;
use async_trait::async_trait;
use std::sync::Arc;

/// Outbound side of the chat channel
#[async_trait]
pub trait ChannelSink: Send + Sync {
    /// Hand a payload to the transport. Delivery and reconnection are the
    /// transport's concern; at most one frame is emitted per call.
    ///
    /// Must not wait for queue space or for the connection: the engine calls
    /// this while handling an event.
    async fn send(&self, payload: String) -> Result<(), ChannelError>;
}

/// Text-to-speech playback
pub trait SpeechOutput: Send + Sync {
    fn capability(&self) -> Capability;

    /// Start playback and return immediately. Overlapping requests are not
    /// queued or cancelled here. Unsupported backends no-op.
    fn speak(&self, text: &str);
}

// ============================================================================
// Arc implementations for trait objects
// ============================================================================

#[async_trait]
impl<T: ChannelSink + ?Sized> ChannelSink for Arc<T> {
    async fn send(&self, payload: String) -> Result<(), ChannelError> {
        (**self).send(payload).await
    }
}

impl<T: SpeechOutput + ?Sized> SpeechOutput for Arc<T> {
    fn capability(&self) -> Capability {
        (**self).capability()
    }

    fn speak(&self, text: &str) {
        (**self).speak(text);
    }
}
