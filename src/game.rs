//! Candidate words for the guessing game

use crate::config::ConfigError;
use rand::seq::SliceRandom;
use serde::{Deserialize, Serialize};
use std::path::Path;

/// A word players have to guess, with the hint shown to them
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct WordEntry {
    pub word: String,
    pub hint: String,
}

impl WordEntry {
    pub fn new(word: impl Into<String>, hint: impl Into<String>) -> Self {
        Self {
            word: word.into(),
            hint: hint.into(),
        }
    }
}

/// Read-only table of candidate words.
///
/// Never empty; every word is trimmed, lowercase and non-blank.
#[derive(Debug, Clone)]
pub struct WordTable {
    entries: Vec<WordEntry>,
}

impl WordTable {
    pub fn new(entries: Vec<WordEntry>) -> Result<Self, ConfigError> {
        if entries.is_empty() {
            return Err(ConfigError::EmptyWordTable);
        }

        let entries = entries
            .into_iter()
            .map(|entry| {
                let word = entry.word.trim().to_lowercase();
                if word.is_empty() {
                    return Err(ConfigError::BlankWord { hint: entry.hint });
                }
                Ok(WordEntry {
                    word,
                    hint: entry.hint,
                })
            })
            .collect::<Result<Vec<_>, _>>()?;

        Ok(Self { entries })
    }

    /// The table used when no word file is configured
    pub fn builtin() -> Self {
        Self {
            entries: vec![
                WordEntry::new("cat", "It's a common household pet"),
                WordEntry::new("river", "A flowing body of water"),
                WordEntry::new("sun", "Shines bright during the day"),
            ],
        }
    }

    /// Load a JSON array of `{"word": ..., "hint": ...}` objects
    pub fn load(path: &Path) -> Result<Self, ConfigError> {
        let raw = std::fs::read_to_string(path).map_err(|e| ConfigError::WordTable {
            path: path.to_path_buf(),
            reason: e.to_string(),
        })?;
        let entries: Vec<WordEntry> =
            serde_json::from_str(&raw).map_err(|e| ConfigError::WordTable {
                path: path.to_path_buf(),
                reason: e.to_string(),
            })?;
        Self::new(entries)
    }

    pub fn entries(&self) -> &[WordEntry] {
        &self.entries
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }
}

/// Chooses the entry for a new round
pub trait WordPicker: Send + Sync {
    fn pick<'a>(&self, table: &'a WordTable) -> &'a WordEntry;
}

/// Uniformly random choice from the table
#[derive(Debug, Default, Clone, Copy)]
pub struct RandomPicker;

impl WordPicker for RandomPicker {
    fn pick<'a>(&self, table: &'a WordTable) -> &'a WordEntry {
        // The table is never empty, so the fallback is unreachable in practice
        let entries = table.entries();
        entries
            .choose(&mut rand::thread_rng())
            .unwrap_or(&entries[0])
    }
}
