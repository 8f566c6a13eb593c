//! Voice input and output bridging
//!
//! Both directions are backed by external programs: a speech recognizer
//! whose stdout lines are transcripts, and a synthesizer invoked once per
//! utterance. Missing backends are reported once and the feature stays off.

pub mod input;
pub mod output;

pub use input::{CaptureState, CommandRecognizer, VoiceCapture};
pub use output::CommandSpeaker;

use std::io;
use thiserror::Error;

/// Whether the host can provide a voice feature
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Capability {
    Supported,
    Unsupported,
}

impl Capability {
    pub fn is_supported(self) -> bool {
        self == Capability::Supported
    }
}

#[derive(Debug, Error)]
pub enum VoiceError {
    #[error("{capability} is not supported in this environment")]
    Unsupported { capability: &'static str },
    #[error("Failed to start {program}: {source}")]
    Spawn {
        program: String,
        #[source]
        source: io::Error,
    },
    #[error("Speech backend I/O error: {0}")]
    Io(#[from] io::Error),
}
