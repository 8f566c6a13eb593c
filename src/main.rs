//! swiftchats - terminal chat client
//!
//! Joins a WebSocket chat room, scores every chat line with a small
//! sentiment lexicon, runs a word-guessing game, and optionally bridges
//! voice input and spoken bot replies.

mod channel;
mod config;
mod console;
mod conversation;
mod game;
mod runtime;
mod sentiment;
mod state_machine;
mod voice;

use channel::ChannelConfig;
use config::ChatConfig;
use game::RandomPicker;
use runtime::{ConversationHandle, ConversationRuntime, SpeechOutput, BROADCAST_CAPACITY};
use state_machine::ChatContext;
use std::sync::Arc;
use tokio::sync::{broadcast, mpsc};
use tokio_util::sync::CancellationToken;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};
use voice::{CommandRecognizer, CommandSpeaker, VoiceCapture};

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    // Logs go to stderr; stdout is the chat
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "swiftchats=info".into()),
        )
        .with(
            tracing_subscriber::fmt::layer()
                .json()
                .with_current_span(false)
                .with_span_list(false)
                .with_writer(std::io::stderr),
        )
        .init();

    // Configuration
    let config = ChatConfig::from_env()?;
    let words = Arc::new(config.word_table()?);
    tracing::info!(
        server = %config.server_url,
        event = %config.channel_event,
        words = words.len(),
        "Starting chat client"
    );

    let context = ChatContext::new(config.username.clone());
    let own_name = context.display_name().to_string();
    let cancel = CancellationToken::new();

    let (event_tx, event_rx) = mpsc::channel(config.queue_capacity);
    let (broadcast_tx, _) = broadcast::channel(BROADCAST_CAPACITY);

    // Socket adapter feeds remote messages into the same queue
    let (channel, channel_task) = channel::spawn(
        ChannelConfig {
            url: config.server_url.clone(),
            event: config.channel_event.clone(),
            queue_capacity: config.queue_capacity,
        },
        event_tx.clone(),
        cancel.clone(),
    );

    let speech = CommandSpeaker::from_config(config.tts_command.as_deref());
    if !speech.capability().is_supported() {
        tracing::info!("Bot replies will be shown but not spoken. Set SWIFTCHATS_TTS_COMMAND to enable.");
    }

    let runtime = ConversationRuntime::new(
        context,
        channel,
        speech,
        event_rx,
        broadcast_tx.clone(),
        cancel.clone(),
    );
    let runtime_task = tokio::spawn(runtime.run());

    let handle = ConversationHandle::new(event_tx, broadcast_tx, words, Arc::new(RandomPicker));
    let mut voice = VoiceCapture::new(
        Arc::new(CommandRecognizer::new(config.stt_command.clone())),
        handle.event_sender(),
        cancel.clone(),
    );

    let interrupt = cancel.clone();
    tokio::spawn(async move {
        if tokio::signal::ctrl_c().await.is_ok() {
            tracing::info!("Interrupted, shutting down");
            interrupt.cancel();
        }
    });

    let console_result = console::run(&handle, &mut voice, &own_name, &cancel).await;

    cancel.cancel();
    let state = runtime_task.await?;
    if let Err(e) = channel_task.await {
        tracing::warn!(error = %e, "Channel task failed");
    }

    if let Some(round) = state.game().round() {
        println!("Unsolved round. The word was: {}", round.target_word);
    }
    if state.analytics().is_empty() {
        println!("Session over: {} messages.", state.messages().len());
    } else {
        let summary = state.analytics().summary();
        println!(
            "Session over: {} messages, {} scored (total sentiment {}).",
            state.messages().len(),
            summary.count,
            summary.total
        );
    }
    for entry in state.leaderboard() {
        println!("  {} +{}", entry.user, entry.score);
    }

    console_result?;
    Ok(())
}
