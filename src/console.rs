//! Line-oriented terminal front end
//!
//! Reads commands and chat from stdin, prints `ChatUpdate`s to stdout, and
//! keeps a read-only dashboard view for `/stats` and `/leaderboard`.

use crate::conversation::{
    AnalyticsPoint, ChatUpdate, LeaderboardEntry, Message, Origin, SentimentSummary,
};
use crate::runtime::{ConversationHandle, EngineClosed};
use crate::state_machine::InputSource;
use crate::voice::{CaptureState, VoiceCapture, VoiceError};
use chrono::Local;
use futures::StreamExt;
use std::io::BufRead;
use tokio::sync::mpsc;
use tokio_stream::wrappers::errors::BroadcastStreamRecvError;
use tokio_stream::wrappers::BroadcastStream;
use tokio_util::sync::CancellationToken;

/// Number of recent analytics points shown by `/stats`
const RECENT_POINTS: usize = 5;

const HELP: &str = "\
Commands:
  /game         start a word-guessing round
  /voice        start or stop voice input
  /stats        sentiment summary
  /leaderboard  game winners
  /help         this list
  /quit         leave the chat
Anything else is sent as a message (or a guess while a round is running).";

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ConsoleCommand {
    Chat(String),
    StartGame,
    ToggleVoice,
    Stats,
    Leaderboard,
    Help,
    Quit,
    Unknown(String),
}

impl ConsoleCommand {
    pub fn parse(line: &str) -> Self {
        let trimmed = line.trim();
        let Some(command) = trimmed.strip_prefix('/') else {
            return ConsoleCommand::Chat(line.to_string());
        };

        match command.to_lowercase().as_str() {
            "game" | "start" => ConsoleCommand::StartGame,
            "voice" | "mic" => ConsoleCommand::ToggleVoice,
            "stats" | "dashboard" => ConsoleCommand::Stats,
            "leaderboard" | "scores" => ConsoleCommand::Leaderboard,
            "help" | "?" => ConsoleCommand::Help,
            "quit" | "exit" => ConsoleCommand::Quit,
            _ => ConsoleCommand::Unknown(trimmed.to_string()),
        }
    }
}

/// Dashboard state folded from `ChatUpdate`s
#[derive(Debug, Default, Clone)]
pub struct DashboardView {
    analytics: Vec<AnalyticsPoint>,
    summary: SentimentSummary,
    leaderboard: Vec<LeaderboardEntry>,
    round_hint: Option<String>,
}

impl DashboardView {
    pub fn observe(&mut self, update: &ChatUpdate) {
        match update {
            ChatUpdate::AnalyticsRecorded { point } => {
                self.summary.add(point.sentiment_score);
                self.analytics.push(point.clone());
            }
            ChatUpdate::LeaderboardUpdated { entry } => self.leaderboard.push(entry.clone()),
            ChatUpdate::RoundStarted { hint } => self.round_hint = Some(hint.clone()),
            ChatUpdate::RoundEnded => self.round_hint = None,
            ChatUpdate::MessageAppended { .. } => {}
        }
    }

    pub fn round_hint(&self) -> Option<&str> {
        self.round_hint.as_deref()
    }

    pub fn render_stats(&self) -> String {
        let Some(mean) = self.summary.mean() else {
            return "No messages scored yet.".to_string();
        };

        let mut out = format!(
            "Sentiment: {} messages, total {}, mean {mean:.2} ({} positive, {} negative, {} neutral)",
            self.summary.count,
            self.summary.total,
            self.summary.positive,
            self.summary.negative,
            self.summary.neutral,
        );
        let skip = self.analytics.len().saturating_sub(RECENT_POINTS);
        for point in self.analytics.iter().skip(skip) {
            out.push_str(&format!(
                "\n  {} {:+} {}",
                point.timestamp, point.sentiment_score, point.source_text
            ));
        }
        out
    }

    pub fn render_leaderboard(&self) -> String {
        if self.leaderboard.is_empty() {
            return "No winners yet.".to_string();
        }
        self.leaderboard
            .iter()
            .enumerate()
            .map(|(i, entry)| format!("{}. {} ({})", i + 1, entry.user, entry.score))
            .collect::<Vec<_>>()
            .join("\n")
    }
}

pub fn render_message(message: &Message, own_name: &str) -> String {
    let time = message.sent_at.with_timezone(&Local).format("%H:%M:%S");
    match message.origin {
        Origin::Own => format!("[{time}] {own_name}: {}", message.text),
        Origin::Peer => format!("[{time}] {}", message.text),
        Origin::Bot => format!("[{time}] Bot: {}", message.text),
    }
}

/// Line to print for an update, if any
pub fn render_update(update: &ChatUpdate, own_name: &str) -> Option<String> {
    match update {
        ChatUpdate::MessageAppended { message } => Some(render_message(message, own_name)),
        ChatUpdate::LeaderboardUpdated { entry } => {
            Some(format!("*** {} scores {} point", entry.user, entry.score))
        }
        ChatUpdate::RoundStarted { .. } => Some("*** Round started: type your guesses".to_string()),
        ChatUpdate::RoundEnded => Some("*** Round over".to_string()),
        ChatUpdate::AnalyticsRecorded { .. } => None,
    }
}

/// Drive the console until `/quit`, end of input, or shutdown
pub async fn run(
    handle: &ConversationHandle,
    voice: &mut VoiceCapture,
    own_name: &str,
    cancel: &CancellationToken,
) -> Result<(), EngineClosed> {
    let mut updates = BroadcastStream::new(handle.subscribe());
    let mut lines = spawn_stdin_reader();
    let mut view = DashboardView::default();

    println!("Connected as {own_name}. Type /help for commands.");

    let result = loop {
        tokio::select! {
            () = cancel.cancelled() => break Ok(()),

            update = updates.next() => match update {
                Some(Ok(update)) => {
                    if let Some(line) = render_update(&update, own_name) {
                        println!("{line}");
                    }
                    view.observe(&update);
                }
                Some(Err(BroadcastStreamRecvError::Lagged(skipped))) => {
                    tracing::warn!(skipped, "Console fell behind; some updates were not shown");
                }
                None => break Err(EngineClosed),
            },

            line = lines.recv() => {
                let Some(line) = line else { break Ok(()) };
                if let Err(e) = handle_line(&line, handle, voice, &view).await {
                    break Err(e);
                }
                if ConsoleCommand::parse(&line) == ConsoleCommand::Quit {
                    break Ok(());
                }
            }
        }
    };

    voice.stop().await;
    result
}

/// Lines from stdin, read on a detached thread
fn spawn_stdin_reader() -> mpsc::Receiver<String> {
    let (tx, rx) = mpsc::channel(16);
    std::thread::spawn(move || {
        for line in std::io::stdin().lock().lines() {
            match line {
                Ok(line) => {
                    if tx.blocking_send(line).is_err() {
                        break;
                    }
                }
                Err(e) => {
                    tracing::warn!(error = %e, "Failed to read from stdin");
                    break;
                }
            }
        }
    });
    rx
}

async fn handle_line(
    line: &str,
    handle: &ConversationHandle,
    voice: &mut VoiceCapture,
    view: &DashboardView,
) -> Result<(), EngineClosed> {
    match ConsoleCommand::parse(line) {
        ConsoleCommand::Chat(text) => handle.submit(text, InputSource::Keyboard).await?,
        ConsoleCommand::StartGame => {
            if let Some(hint) = view.round_hint() {
                println!("A round is already running. Hint: {hint}");
            } else {
                handle.start_game().await?;
            }
        }
        ConsoleCommand::ToggleVoice => match voice.toggle().await {
            Ok(CaptureState::Listening) => println!("Listening... (/voice to stop)"),
            Ok(CaptureState::Stopped) => println!("Voice input stopped."),
            Err(VoiceError::Unsupported { .. }) => {
                println!("Speech recognition is not available. Set SWIFTCHATS_STT_COMMAND.");
            }
            Err(e) => println!("Could not start voice input: {e}"),
        },
        ConsoleCommand::Stats => println!("{}", view.render_stats()),
        ConsoleCommand::Leaderboard => println!("{}", view.render_leaderboard()),
        ConsoleCommand::Help => println!("{HELP}"),
        ConsoleCommand::Quit => {}
        ConsoleCommand::Unknown(command) => println!("Unknown command {command}. Type /help."),
    }
    Ok(())
}
