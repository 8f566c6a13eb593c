//! Guessing-game wins

use serde::{Deserialize, Serialize};

/// Points awarded for one correct guess
pub const POINTS_PER_WIN: u32 = 1;

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct LeaderboardEntry {
    pub user: String,
    pub score: u32,
}

/// Append-only list of wins. Repeated wins by one user stay separate entries.
#[derive(Debug, Default, Clone)]
pub struct Leaderboard {
    entries: Vec<LeaderboardEntry>,
}

impl Leaderboard {
    pub fn award(&mut self, user: impl Into<String>) -> LeaderboardEntry {
        let entry = LeaderboardEntry {
            user: user.into(),
            score: POINTS_PER_WIN,
        };
        self.entries.push(entry.clone());
        entry
    }

    pub fn entries(&self) -> &[LeaderboardEntry] {
        &self.entries
    }
}
