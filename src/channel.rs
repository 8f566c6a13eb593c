//! WebSocket chat channel
//!
//! One background task owns the socket. It forwards inbound frames for the
//! configured event name to the engine queue and drains the outbound queue
//! onto the socket, reconnecting with exponential backoff when the
//! connection drops.

pub mod wire;

use crate::runtime::ChannelSink;
use crate::state_machine::Event;
use async_trait::async_trait;
use futures::{SinkExt, StreamExt};
use std::time::Duration;
use thiserror::Error;
use tokio::net::TcpStream;
use tokio::sync::mpsc;
use tokio::sync::mpsc::error::TrySendError;
use tokio::task::JoinHandle;
use tokio_tungstenite::tungstenite::{self, protocol::Message};
use tokio_tungstenite::{connect_async, MaybeTlsStream, WebSocketStream};
use tokio_util::sync::CancellationToken;
use wire::Frame;

const MAX_RECONNECT_DELAY: Duration = Duration::from_secs(30);

#[derive(Debug, Error)]
pub enum ChannelError {
    #[error("Failed to connect to {url}: {source}")]
    Connect {
        url: String,
        #[source]
        source: tungstenite::Error,
    },
    #[error("WebSocket error: {0}")]
    Protocol(#[from] tungstenite::Error),
    #[error("Malformed frame: {0}")]
    Codec(#[from] serde_json::Error),
    #[error("Server closed the connection")]
    Disconnected,
    #[error("Outbound queue is full; message dropped")]
    QueueFull,
    #[error("Channel adapter has shut down")]
    Closed,
}

#[derive(Debug, Clone)]
pub struct ChannelConfig {
    pub url: String,
    /// Event name carrying chat payloads
    pub event: String,
    pub queue_capacity: usize,
}

/// Outbound handle; cheap to clone
#[derive(Debug, Clone)]
pub struct ChannelHandle {
    outbound_tx: mpsc::Sender<String>,
}

#[async_trait]
impl ChannelSink for ChannelHandle {
    async fn send(&self, payload: String) -> Result<(), ChannelError> {
        self.outbound_tx.try_send(payload).map_err(|e| match e {
            TrySendError::Full(_) => ChannelError::QueueFull,
            TrySendError::Closed(_) => ChannelError::Closed,
        })
    }
}

/// Start the connection task
pub fn spawn(
    config: ChannelConfig,
    inbound: mpsc::Sender<Event>,
    cancel: CancellationToken,
) -> (ChannelHandle, JoinHandle<()>) {
    let (outbound_tx, outbound_rx) = mpsc::channel(config.queue_capacity);
    let task = tokio::spawn(connection_loop(config, outbound_rx, inbound, cancel));
    (ChannelHandle { outbound_tx }, task)
}

/// Backoff before reconnect attempt `attempt` (1-based): 1s, 2s, 4s, ... capped at 30s
fn reconnect_delay(attempt: u32) -> Duration {
    let exponent = attempt.clamp(1, 6) - 1;
    Duration::from_secs(1 << exponent).min(MAX_RECONNECT_DELAY)
}

enum SessionEnd {
    Shutdown,
    Disconnected(ChannelError),
}

async fn connection_loop(
    config: ChannelConfig,
    mut outbound_rx: mpsc::Receiver<String>,
    inbound: mpsc::Sender<Event>,
    cancel: CancellationToken,
) {
    let mut attempt: u32 = 0;

    loop {
        let connected = tokio::select! {
            biased;
            () = cancel.cancelled() => break,
            result = connect_async(config.url.as_str()) => result,
        };

        match connected {
            Ok((socket, _response)) => {
                attempt = 0;
                tracing::info!(url = %config.url, "Connected to chat server");
                match session(socket, &config, &mut outbound_rx, &inbound, &cancel).await {
                    SessionEnd::Shutdown => break,
                    SessionEnd::Disconnected(e) => {
                        tracing::warn!(error = %e, "Chat connection lost");
                    }
                }
            }
            Err(source) => {
                let e = ChannelError::Connect {
                    url: config.url.clone(),
                    source,
                };
                tracing::warn!(error = %e, "Chat server unreachable");
            }
        }

        attempt = attempt.saturating_add(1);
        let delay = reconnect_delay(attempt);
        tracing::debug!(attempt, ?delay, "Reconnecting");
        tokio::select! {
            biased;
            () = cancel.cancelled() => break,
            () = tokio::time::sleep(delay) => {}
        }
    }

    tracing::info!("Chat channel stopped");
}

async fn session(
    socket: WebSocketStream<MaybeTlsStream<TcpStream>>,
    config: &ChannelConfig,
    outbound_rx: &mut mpsc::Receiver<String>,
    inbound: &mpsc::Sender<Event>,
    cancel: &CancellationToken,
) -> SessionEnd {
    let (mut write, mut read) = socket.split();

    loop {
        tokio::select! {
            biased;

            () = cancel.cancelled() => {
                let _ = write.send(Message::Close(None)).await;
                return SessionEnd::Shutdown;
            }

            payload = outbound_rx.recv() => {
                let Some(payload) = payload else {
                    return SessionEnd::Shutdown;
                };
                let encoded = match Frame::new(config.event.clone(), payload).encode() {
                    Ok(encoded) => encoded,
                    Err(e) => {
                        tracing::warn!(error = %e, "Dropping unencodable payload");
                        continue;
                    }
                };
                if let Err(e) = write.send(Message::text(encoded)).await {
                    return SessionEnd::Disconnected(e.into());
                }
            }

            message = read.next() => match message {
                Some(Ok(Message::Text(text))) => match Frame::decode(text.as_str()) {
                    Ok(frame) if frame.event == config.event => {
                        tokio::select! {
                            biased;
                            () = cancel.cancelled() => {
                                let _ = write.send(Message::Close(None)).await;
                                return SessionEnd::Shutdown;
                            }
                            sent = inbound.send(Event::remote(frame.data)) => {
                                if sent.is_err() {
                                    // Engine is gone
                                    return SessionEnd::Shutdown;
                                }
                            }
                        }
                    }
                    Ok(frame) => {
                        tracing::debug!(event = %frame.event, "Ignoring frame for other event");
                    }
                    Err(e) => {
                        tracing::debug!(error = %ChannelError::Codec(e), "Ignoring malformed frame");
                    }
                },
                Some(Ok(Message::Close(_))) | None => {
                    return SessionEnd::Disconnected(ChannelError::Disconnected);
                }
                // Ping/pong are answered by tungstenite; binary frames are not ours
                Some(Ok(_)) => {}
                Some(Err(e)) => return SessionEnd::Disconnected(e.into()),
            }
        }
    }
}
