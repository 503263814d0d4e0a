//! Finished game records
//!
//! Games arrive through the record sink ([`sync`]), are stored with their
//! remaining-count trace when the client computed one, and can have missing
//! traces filled in later ([`backfill`]).

pub mod backfill;
pub mod sync;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

pub use backfill::{BackfillReport, FilledGame, SkippedGame, backfill_remaining_counts};
pub use sync::{Rejection, SyncReport, SyncRequest, known_users, store_games, sync_games};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Outcome {
    Win,
    Loss,
}

impl Outcome {
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Win => "win",
            Self::Loss => "loss",
        }
    }
}

impl fmt::Display for Outcome {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Outcome {
    type Err = String;

    /// Case-insensitive
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "win" => Ok(Self::Win),
            "loss" => Ok(Self::Loss),
            _ => Err("outcome must be 'win' or 'loss'.".to_string()),
        }
    }
}

/// One finished game, normalised for storage
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct GameRecord {
    pub client_game_id: String,
    pub device_id: String,
    pub username: Option<String>,
    pub start_time: DateTime<Utc>,
    pub end_time: DateTime<Utc>,
    pub target_word: String,
    pub outcome: Outcome,
    pub guesses_count: u32,
    pub guesses: Vec<String>,
    pub remaining_counts: Option<Vec<usize>>,
}
