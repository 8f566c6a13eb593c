//! Speech-to-text capture

use super::{Capability, VoiceError};
use crate::state_machine::Event;
use futures::stream::{self, BoxStream, StreamExt};
use std::process::Stdio;
use std::sync::Arc;
use tokio::io::{AsyncBufReadExt, BufReader};
use tokio::process::Command;
use tokio::sync::mpsc;
use tokio::task::JoinHandle;
use tokio_util::sync::CancellationToken;

/// A recognition result. Only final results are ever submitted.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Transcript {
    pub text: String,
    pub is_final: bool,
}

impl Transcript {
    pub fn final_result(text: impl Into<String>) -> Self {
        Self {
            text: text.into(),
            is_final: true,
        }
    }

    #[cfg(test)]
    pub fn interim(text: impl Into<String>) -> Self {
        Self {
            text: text.into(),
            is_final: false,
        }
    }
}

pub type TranscriptStream = BoxStream<'static, Result<Transcript, VoiceError>>;

/// Source of transcripts for one capture session
pub trait SpeechRecognizer: Send + Sync {
    fn capability(&self) -> Capability;

    /// Begin recognition. Dropping the stream ends the session.
    fn open(&self) -> Result<TranscriptStream, VoiceError>;
}

/// Runs a shell command and treats each stdout line as a final transcript
#[derive(Debug, Clone)]
pub struct CommandRecognizer {
    command: Option<String>,
}

impl CommandRecognizer {
    pub fn new(command: Option<String>) -> Self {
        Self { command }
    }
}

impl SpeechRecognizer for CommandRecognizer {
    fn capability(&self) -> Capability {
        if self.command.is_some() {
            Capability::Supported
        } else {
            Capability::Unsupported
        }
    }

    fn open(&self) -> Result<TranscriptStream, VoiceError> {
        let Some(command) = &self.command else {
            return Err(VoiceError::Unsupported {
                capability: "speech recognition",
            });
        };

        let mut child = Command::new("sh")
            .args(["-c", command])
            .stdin(Stdio::null())
            .stdout(Stdio::piped())
            .stderr(Stdio::null())
            .kill_on_drop(true)
            .spawn()
            .map_err(|source| VoiceError::Spawn {
                program: command.clone(),
                source,
            })?;

        let stdout = child
            .stdout
            .take()
            .ok_or_else(|| std::io::Error::other("recognizer stdout was not captured"))?;
        let lines = BufReader::new(stdout).lines();

        // The child rides along with the stream so dropping the stream kills it
        let transcripts = stream::unfold(Some((child, lines)), |session| async move {
            let (child, mut lines) = session?;
            match lines.next_line().await {
                Ok(Some(line)) => Some((Ok(Transcript::final_result(line)), Some((child, lines)))),
                Ok(None) => None,
                Err(e) => Some((Err(VoiceError::Io(e)), None)),
            }
        });

        Ok(transcripts.boxed())
    }
}

/// Whether a capture session is running
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CaptureState {
    Listening,
    Stopped,
}

struct CaptureSession {
    cancel: CancellationToken,
    task: JoinHandle<()>,
}

/// Start/stop toggle around a recognizer.
///
/// Final, non-blank transcripts are queued to the engine as voice
/// submissions. Interim results are dropped, and stopping discards anything
/// not yet finalized.
pub struct VoiceCapture {
    recognizer: Arc<dyn SpeechRecognizer>,
    event_tx: mpsc::Sender<Event>,
    shutdown: CancellationToken,
    session: Option<CaptureSession>,
    unsupported_reported: bool,
}

impl VoiceCapture {
    pub fn new(
        recognizer: Arc<dyn SpeechRecognizer>,
        event_tx: mpsc::Sender<Event>,
        shutdown: CancellationToken,
    ) -> Self {
        Self {
            recognizer,
            event_tx,
            shutdown,
            session: None,
            unsupported_reported: false,
        }
    }

    pub fn is_listening(&self) -> bool {
        self.session
            .as_ref()
            .is_some_and(|session| !session.task.is_finished())
    }

    pub fn start(&mut self) -> Result<(), VoiceError> {
        if self.is_listening() {
            return Ok(());
        }

        if !self.recognizer.capability().is_supported() {
            if !self.unsupported_reported {
                self.unsupported_reported = true;
                tracing::warn!("Speech recognition is not supported here; voice input disabled");
            }
            return Err(VoiceError::Unsupported {
                capability: "speech recognition",
            });
        }

        let transcripts = self.recognizer.open()?;
        let cancel = self.shutdown.child_token();
        let task = tokio::spawn(forward_transcripts(
            transcripts,
            self.event_tx.clone(),
            cancel.clone(),
        ));
        self.session = Some(CaptureSession { cancel, task });

        tracing::info!("Voice capture started");
        Ok(())
    }

    pub async fn stop(&mut self) {
        if let Some(session) = self.session.take() {
            session.cancel.cancel();
            if let Err(e) = session.task.await {
                tracing::warn!(error = %e, "Voice capture task failed");
            }
            tracing::info!("Voice capture stopped");
        }
    }

    pub async fn toggle(&mut self) -> Result<CaptureState, VoiceError> {
        if self.is_listening() {
            self.stop().await;
            Ok(CaptureState::Stopped)
        } else {
            self.start()?;
            Ok(CaptureState::Listening)
        }
    }
}

async fn forward_transcripts(
    mut transcripts: TranscriptStream,
    event_tx: mpsc::Sender<Event>,
    cancel: CancellationToken,
) {
    loop {
        tokio::select! {
            biased;
            () = cancel.cancelled() => break,
            item = transcripts.next() => match item {
                Some(Ok(transcript)) if transcript.is_final => {
                    let text = transcript.text.trim();
                    if text.is_empty() {
                        continue;
                    }
                    tokio::select! {
                        biased;
                        () = cancel.cancelled() => break,
                        sent = event_tx.send(Event::spoken(text)) => {
                            if sent.is_err() {
                                break;
                            }
                        }
                    }
                }
                Some(Ok(transcript)) => {
                    tracing::trace!(text = %transcript.text, "Discarding interim transcript");
                }
                Some(Err(e)) => {
                    tracing::warn!(error = %e, "Speech recognizer failed");
                    break;
                }
                None => {
                    tracing::info!("Speech recognizer finished");
                    break;
                }
            }
        }
    }
}
