//! Lobby presence queries

use super::format_timestamp;
use chrono::{DateTime, Utc};
use rusqlite::{Connection, Result, params};

pub fn touch(conn: &Connection, username: &str, now: DateTime<Utc>) -> Result<()> {
    conn.execute(
        "INSERT INTO multiplayer_lobby (username, last_seen) VALUES (?1, ?2)
         ON CONFLICT (username) DO UPDATE SET last_seen = excluded.last_seen",
        params![username, format_timestamp(now)],
    )?;
    Ok(())
}

/// Usernames seen strictly after `cutoff`, ascending
pub fn seen_since(conn: &Connection, cutoff: DateTime<Utc>) -> Result<Vec<String>> {
    let mut stmt = conn.prepare(
        "SELECT username FROM multiplayer_lobby WHERE last_seen > ?1 ORDER BY username ASC",
    )?;
    stmt.query_map([format_timestamp(cutoff)], |row| row.get(0))?
        .collect()
}
