//! Text-to-speech playback through an external synthesizer

use super::Capability;
use crate::runtime::SpeechOutput;
use std::path::PathBuf;
use std::process::Stdio;
use std::sync::atomic::{AtomicBool, Ordering};
use tokio::process::Command;

/// Synthesizers tried, in order, when none is configured
const KNOWN_SYNTHESIZERS: [&str; 3] = ["espeak-ng", "espeak", "say"];

#[derive(Debug, Clone)]
enum Backend {
    /// Shell command; the text is passed as `$1`
    Shell(String),
    /// Binary found on PATH; the text is its only argument
    Binary(PathBuf),
}

/// Speaks each utterance by spawning a synthesizer process.
///
/// Playback is fire-and-forget: the child is reaped in the background and
/// overlapping utterances simply overlap.
#[derive(Debug)]
pub struct CommandSpeaker {
    backend: Option<Backend>,
    warned: AtomicBool,
}

impl CommandSpeaker {
    /// Use the configured command, or look for a known synthesizer on PATH
    pub fn from_config(command: Option<&str>) -> Self {
        let backend = match command {
            Some(command) => Some(Backend::Shell(command.to_string())),
            None => KNOWN_SYNTHESIZERS
                .iter()
                .find_map(|name| which::which(name).ok())
                .map(Backend::Binary),
        };

        match &backend {
            Some(Backend::Shell(command)) => tracing::info!(%command, "Using configured speech synthesizer"),
            Some(Backend::Binary(path)) => tracing::info!(path = %path.display(), "Found speech synthesizer"),
            None => tracing::debug!("No speech synthesizer available"),
        }

        Self {
            backend,
            warned: AtomicBool::new(false),
        }
    }

    #[cfg(test)]
    pub fn disabled() -> Self {
        Self {
            backend: None,
            warned: AtomicBool::new(false),
        }
    }

    fn command_for(backend: &Backend, text: &str) -> Command {
        let mut cmd = match backend {
            Backend::Shell(command) => {
                let mut cmd = Command::new("sh");
                cmd.arg("-c")
                    .arg(format!("{command} \"$1\""))
                    .arg("swiftchats-tts")
                    .arg(text);
                cmd
            }
            Backend::Binary(path) => {
                let mut cmd = Command::new(path);
                cmd.arg(text);
                cmd
            }
        };
        cmd.stdin(Stdio::null())
            .stdout(Stdio::null())
            .stderr(Stdio::null());
        cmd
    }
}

impl SpeechOutput for CommandSpeaker {
    fn capability(&self) -> Capability {
        if self.backend.is_some() {
            Capability::Supported
        } else {
            Capability::Unsupported
        }
    }

    fn speak(&self, text: &str) {
        let Some(backend) = &self.backend else {
            if !self.warned.swap(true, Ordering::Relaxed) {
                tracing::warn!("Speech synthesis is not supported here; bot replies will not be spoken");
            }
            return;
        };

        let mut child = match Self::command_for(backend, text).spawn() {
            Ok(child) => child,
            Err(e) => {
                tracing::warn!(error = %e, "Failed to start speech synthesizer");
                return;
            }
        };

        tokio::spawn(async move {
            match child.wait().await {
                Ok(status) if !status.success() => {
                    tracing::warn!(%status, "Speech synthesizer exited with failure");
                }
                Ok(_) => {}
                Err(e) => tracing::warn!(error = %e, "Failed to wait for speech synthesizer"),
            }
        });
    }
}
