//! Game-record sink
//!
//! Clients upload finished games in batches. Each game is validated on its
//! own: a bad game is rejected with a reason while the rest of the batch is
//! still stored. The whole batch is written in one transaction.

use super::{GameRecord, Outcome};
use crate::config::MAX_SYNC_BATCH;
use crate::error::{Error, Result};
use crate::rooms::normalize_username;
use crate::storage::{Database, games};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

const REQUIRED_FIELDS: [&str; 7] = [
    "client_game_id",
    "device_id",
    "start_time",
    "end_time",
    "target_word",
    "outcome",
    "guesses",
];

/// Upload body: `{"games": [...]}`
#[derive(Debug, Clone, Default, Deserialize)]
pub struct SyncRequest {
    #[serde(default)]
    pub games: Vec<Value>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Rejection {
    pub client_game_id: Option<String>,
    pub reason: String,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct SyncReport {
    pub received_count: usize,
    pub accepted_count: usize,
    pub rejected_count: usize,
    pub acked_ids: Vec<String>,
    pub rejected: Vec<Rejection>,
}

/// Validate and store a batch of raw game payloads
///
/// # Errors
///
/// Validation error for an empty batch or one larger than
/// [`MAX_SYNC_BATCH`]; store errors roll the batch back and propagate.
pub fn sync_games(db: &Database, raw_games: &[Value]) -> Result<SyncReport> {
    if raw_games.is_empty() {
        return Err(Error::validation(
            "request must include games array with at least one item",
        ));
    }
    if raw_games.len() > MAX_SYNC_BATCH {
        return Err(Error::validation(format!(
            "maximum batch size is {MAX_SYNC_BATCH} games"
        )));
    }

    let mut report = SyncReport {
        received_count: raw_games.len(),
        ..SyncReport::default()
    };
    let mut accepted = Vec::with_capacity(raw_games.len());

    for raw in raw_games {
        match normalize_game(raw) {
            Ok(game) => accepted.push(game),
            Err(reason) => {
                tracing::debug!(%reason, "rejected game");
                report.rejected.push(Rejection {
                    client_game_id: raw
                        .get("client_game_id")
                        .and_then(scalar_text)
                        .filter(|id| !id.is_empty()),
                    reason,
                });
            }
        }
    }

    store_games(db, &accepted)?;

    report.acked_ids = accepted.into_iter().map(|g| g.client_game_id).collect();
    report.accepted_count = report.acked_ids.len();
    report.rejected_count = report.rejected.len();
    tracing::info!(
        received = report.received_count,
        accepted = report.accepted_count,
        rejected = report.rejected_count,
        "synced games"
    );
    Ok(report)
}

/// Store already-normalised games in one transaction
///
/// # Errors
///
/// Store errors roll back every game in the call.
pub fn store_games(db: &Database, games: &[GameRecord]) -> Result<()> {
    let tx = db.transaction()?;
    let now = Utc::now();
    for game in games {
        games::upsert_game(&tx, game, now)?;
    }
    tx.commit()?;
    Ok(())
}

/// Distinct usernames that have stored games
///
/// # Errors
///
/// Store errors propagate.
pub fn known_users(db: &Database) -> Result<Vec<String>> {
    games::known_users(db.connection())
}

/// Turn one raw payload into a record, or explain why not
fn normalize_game(raw: &Value) -> std::result::Result<GameRecord, String> {
    let Some(fields) = raw.as_object() else {
        return Err("Game payload must be an object.".to_string());
    };
    if let Some(missing) = REQUIRED_FIELDS.iter().find(|f| !fields.contains_key(**f)) {
        return Err(format!("Missing required field: {missing}"));
    }

    let outcome: Outcome = text_field(fields, "outcome")?.parse()?;

    let guesses: Vec<String> = fields["guesses"]
        .as_array()
        .and_then(|items| items.iter().map(scalar_text).collect::<Option<Vec<_>>>())
        .ok_or_else(|| "guesses must be an array of lowercase words.".to_string())?
        .into_iter()
        .map(|g| g.to_lowercase())
        .collect();

    let start_time = timestamp(&fields["start_time"]);
    let end_time = timestamp(&fields["end_time"]);
    let (Some(start_time), Some(end_time)) = (start_time, end_time) else {
        return Err("Invalid start_time or end_time.".to_string());
    };

    let guesses_count = match fields.get("guesses_count").and_then(Value::as_u64) {
        Some(n) if n > 0 => u32::try_from(n).map_err(|_| "guesses_count out of range.".to_string())?,
        _ => u32::try_from(guesses.len()).map_err(|_| "too many guesses.".to_string())?,
    };

    let remaining_counts = match fields.get("remaining_counts") {
        Some(Value::Array(items)) => {
            let counts: Vec<usize> = items
                .iter()
                .map(|item| item.as_u64().map(|n| n as usize))
                .collect::<Option<_>>()
                .ok_or_else(|| "remaining_counts must be non-negative integers.".to_string())?;
            if counts.len() != guesses.len() {
                return Err(format!(
                    "remaining_counts has {} entries for {} guesses.",
                    counts.len(),
                    guesses.len()
                ));
            }
            Some(counts)
        }
        _ => None,
    };

    Ok(GameRecord {
        client_game_id: text_field(fields, "client_game_id")?,
        device_id: text_field(fields, "device_id")?,
        username: fields
            .get("username")
            .and_then(Value::as_str)
            .and_then(normalize_username),
        start_time,
        end_time,
        target_word: text_field(fields, "target_word")?.to_lowercase(),
        outcome,
        guesses_count,
        guesses,
        remaining_counts,
    })
}

fn text_field(fields: &Map<String, Value>, name: &str) -> std::result::Result<String, String> {
    fields
        .get(name)
        .and_then(scalar_text)
        .ok_or_else(|| format!("{name} must be a string."))
}

/// Strings and numbers are accepted where text is expected
fn scalar_text(value: &Value) -> Option<String> {
    match value {
        Value::String(s) => Some(s.clone()),
        Value::Number(n) => Some(n.to_string()),
        _ => None,
    }
}

fn timestamp(value: &Value) -> Option<DateTime<Utc>> {
    let raw = value.as_str()?;
    DateTime::parse_from_rfc3339(raw)
        .ok()
        .map(|dt| dt.with_timezone(&Utc))
}
