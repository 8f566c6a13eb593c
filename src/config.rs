//! Environment-driven configuration

use crate::game::WordTable;
use std::path::PathBuf;
use thiserror::Error;

const DEFAULT_SERVER_URL: &str = "ws://localhost:5000";
const DEFAULT_CHANNEL_EVENT: &str = "chat message";
const DEFAULT_QUEUE_CAPACITY: usize = 64;

#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("Invalid value for {var}: {value:?}")]
    InvalidValue { var: &'static str, value: String },
    #[error("Failed to load word table {path}: {reason}")]
    WordTable { path: PathBuf, reason: String },
    #[error("Word table must contain at least one entry")]
    EmptyWordTable,
    #[error("Word table entry with hint {hint:?} has a blank word")]
    BlankWord { hint: String },
}

/// Client configuration, read once at startup
#[derive(Debug, Clone)]
pub struct ChatConfig {
    pub server_url: String,
    pub username: Option<String>,
    pub channel_event: String,
    pub words_path: Option<PathBuf>,
    pub tts_command: Option<String>,
    pub stt_command: Option<String>,
    pub queue_capacity: usize,
}

impl Default for ChatConfig {
    fn default() -> Self {
        Self {
            server_url: DEFAULT_SERVER_URL.to_string(),
            username: None,
            channel_event: DEFAULT_CHANNEL_EVENT.to_string(),
            words_path: None,
            tts_command: None,
            stt_command: None,
            queue_capacity: DEFAULT_QUEUE_CAPACITY,
        }
    }
}

impl ChatConfig {
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_lookup(|var| std::env::var(var).ok())
    }

    /// Build from an arbitrary variable lookup. Blank values count as unset.
    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Result<Self, ConfigError> {
        let get = |var: &str| {
            lookup(var)
                .map(|v| v.trim().to_string())
                .filter(|v| !v.is_empty())
        };

        let defaults = Self::default();

        let queue_capacity = match get("SWIFTCHATS_QUEUE_CAPACITY") {
            Some(raw) => match raw.parse::<usize>() {
                Ok(n) if n > 0 => n,
                _ => {
                    return Err(ConfigError::InvalidValue {
                        var: "SWIFTCHATS_QUEUE_CAPACITY",
                        value: raw,
                    })
                }
            },
            None => defaults.queue_capacity,
        };

        let server_url = get("SWIFTCHATS_SERVER_URL").unwrap_or(defaults.server_url);
        if !(server_url.starts_with("ws://") || server_url.starts_with("wss://")) {
            return Err(ConfigError::InvalidValue {
                var: "SWIFTCHATS_SERVER_URL",
                value: server_url,
            });
        }

        Ok(Self {
            server_url,
            username: get("SWIFTCHATS_USERNAME"),
            channel_event: get("SWIFTCHATS_CHANNEL_EVENT").unwrap_or(defaults.channel_event),
            words_path: get("SWIFTCHATS_WORDS").map(PathBuf::from),
            tts_command: get("SWIFTCHATS_TTS_COMMAND"),
            stt_command: get("SWIFTCHATS_STT_COMMAND"),
            queue_capacity,
        })
    }

    /// The configured word table, or the built-in one
    pub fn word_table(&self) -> Result<WordTable, ConfigError> {
        match &self.words_path {
            Some(path) => WordTable::load(path),
            None => Ok(WordTable::builtin()),
        }
    }
}
