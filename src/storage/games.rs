//! Game record queries

use super::{format_timestamp, parse_timestamp};
use crate::error::Result;
use crate::games::{GameRecord, Outcome};
use crate::solver::TraceRequest;
use chrono::{DateTime, Utc};
use rusqlite::{Connection, params};

sql_text_enum!(Outcome);

/// Insert or update a game keyed by its client id
///
/// A stored remaining-count trace survives an update that carries none.
pub fn upsert_game(conn: &Connection, game: &GameRecord, now: DateTime<Utc>) -> Result<()> {
    let guesses_json = serde_json::to_string(&game.guesses)?;
    let remaining_json = game
        .remaining_counts
        .as_ref()
        .map(serde_json::to_string)
        .transpose()?;
    let now = format_timestamp(now);

    conn.execute(
        "INSERT INTO wordle_games (
             client_game_id, device_id, username, start_time, end_time, target_word,
             outcome, guesses_count, guesses_json, remaining_counts_json, created_at, updated_at
         ) VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8, ?9, ?10, ?11, ?11)
         ON CONFLICT (client_game_id) DO UPDATE SET
             device_id = excluded.device_id,
             username = COALESCE(excluded.username, wordle_games.username),
             start_time = excluded.start_time,
             end_time = excluded.end_time,
             target_word = excluded.target_word,
             outcome = excluded.outcome,
             guesses_count = excluded.guesses_count,
             guesses_json = excluded.guesses_json,
             remaining_counts_json = COALESCE(excluded.remaining_counts_json, wordle_games.remaining_counts_json),
             updated_at = excluded.updated_at",
        params![
            game.client_game_id,
            game.device_id,
            game.username,
            format_timestamp(game.start_time),
            format_timestamp(game.end_time),
            game.target_word,
            game.outcome,
            game.guesses_count,
            guesses_json,
            remaining_json,
            now,
        ],
    )?;
    Ok(())
}

/// Games with no stored trace, by id
pub fn games_missing_counts(conn: &Connection) -> Result<Vec<TraceRequest>> {
    let mut stmt = conn.prepare(
        "SELECT id, target_word, guesses_json FROM wordle_games
         WHERE remaining_counts_json IS NULL ORDER BY id",
    )?;
    let rows = stmt.query_map([], |row| {
        Ok((
            row.get::<_, i64>(0)?,
            row.get::<_, String>(1)?,
            row.get::<_, String>(2)?,
        ))
    })?;

    let mut requests = Vec::new();
    for row in rows {
        let (game_id, target_word, guesses_json) = row?;
        requests.push(TraceRequest {
            game_id,
            target_word,
            guesses: serde_json::from_str(&guesses_json)?,
        });
    }
    Ok(requests)
}

/// Fill in a missing trace; a row that already has one is left alone
pub fn store_remaining_counts(conn: &Connection, game_id: i64, counts: &[usize]) -> Result<bool> {
    let updated = conn.execute(
        "UPDATE wordle_games SET remaining_counts_json = ?2
         WHERE id = ?1 AND remaining_counts_json IS NULL",
        params![game_id, serde_json::to_string(counts)?],
    )?;
    Ok(updated > 0)
}

/// The columns statistics are computed from
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct GameRow {
    pub outcome: Outcome,
    pub guesses_count: u32,
    pub first_word: Option<String>,
    pub remaining_counts: Option<Vec<usize>>,
}

/// Stored games in end-time order, optionally for a single user
pub fn game_rows(conn: &Connection, username: Option<&str>) -> Result<Vec<GameRow>> {
    let mut stmt = conn.prepare(
        "SELECT outcome, guesses_count, guesses_json, remaining_counts_json
         FROM wordle_games
         WHERE ?1 IS NULL OR LOWER(username) = LOWER(?1)
         ORDER BY end_time ASC, id ASC",
    )?;
    let rows = stmt.query_map([username], |row| {
        Ok((
            row.get::<_, Outcome>(0)?,
            row.get::<_, u32>(1)?,
            row.get::<_, String>(2)?,
            row.get::<_, Option<String>>(3)?,
        ))
    })?;

    let mut games = Vec::new();
    for row in rows {
        let (outcome, guesses_count, guesses_json, remaining_json) = row?;
        let guesses: Vec<String> = serde_json::from_str(&guesses_json)?;
        games.push(GameRow {
            outcome,
            guesses_count,
            first_word: guesses.into_iter().next().map(|w| w.to_lowercase()),
            remaining_counts: remaining_json
                .map(|json| serde_json::from_str(&json))
                .transpose()?,
        });
    }
    Ok(games)
}

/// Load one stored game by client id
pub fn load_game(conn: &Connection, client_game_id: &str) -> Result<Option<GameRecord>> {
    let mut stmt = conn.prepare(
        "SELECT client_game_id, device_id, username, start_time, end_time, target_word,
                outcome, guesses_count, guesses_json, remaining_counts_json
         FROM wordle_games WHERE client_game_id = ?1",
    )?;
    let mut rows = stmt.query([client_game_id])?;
    let Some(row) = rows.next()? else {
        return Ok(None);
    };

    let start_time: String = row.get(3)?;
    let end_time: String = row.get(4)?;
    let guesses_json: String = row.get(8)?;
    let remaining_json: Option<String> = row.get(9)?;

    Ok(Some(GameRecord {
        client_game_id: row.get(0)?,
        device_id: row.get(1)?,
        username: row.get(2)?,
        start_time: parse_timestamp(3, &start_time)?,
        end_time: parse_timestamp(4, &end_time)?,
        target_word: row.get(5)?,
        outcome: row.get(6)?,
        guesses_count: row.get(7)?,
        guesses: serde_json::from_str(&guesses_json)?,
        remaining_counts: remaining_json
            .map(|json| serde_json::from_str(&json))
            .transpose()?,
    }))
}

/// Distinct non-empty usernames, lowercased and sorted
pub fn known_users(conn: &Connection) -> Result<Vec<String>> {
    let mut stmt = conn.prepare(
        "SELECT DISTINCT LOWER(username) AS u FROM wordle_games
         WHERE username IS NOT NULL AND username <> ''
         ORDER BY u ASC",
    )?;
    let users = stmt
        .query_map([], |row| row.get(0))?
        .collect::<rusqlite::Result<Vec<String>>>()?;
    Ok(users)
}
