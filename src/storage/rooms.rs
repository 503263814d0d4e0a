//! Room and player queries
//!
//! Every function takes a `&Connection` so it can run inside a caller-owned
//! transaction (a `Transaction` derefs to `Connection`).

use super::{format_timestamp, parse_optional_timestamp, parse_timestamp};
use crate::rooms::{Player, PlayerStatus, Role, Room, RoomStatus};
use chrono::{DateTime, Utc};
use rusqlite::{Connection, OptionalExtension, Result, Row, params};
use uuid::Uuid;

sql_text_enum!(RoomStatus);
sql_text_enum!(Role);
sql_text_enum!(PlayerStatus);

fn room_id_text(room_id: Uuid) -> String {
    room_id.hyphenated().to_string()
}

pub fn insert_room(conn: &Connection, room_id: Uuid, host: &str, now: DateTime<Utc>) -> Result<()> {
    conn.execute(
        "INSERT INTO multiplayer_rooms (id, host_username, status, created_at) VALUES (?1, ?2, ?3, ?4)",
        params![room_id_text(room_id), host, RoomStatus::Lobby, format_timestamp(now)],
    )?;
    Ok(())
}

/// Insert a player row; returns false if (room, username) already existed
pub fn insert_player(
    conn: &Connection,
    room_id: Uuid,
    username: &str,
    role: Role,
    status: PlayerStatus,
) -> Result<bool> {
    let inserted = conn.execute(
        "INSERT OR IGNORE INTO multiplayer_players (room_id, username, role, status) VALUES (?1, ?2, ?3, ?4)",
        params![room_id_text(room_id), username, role, status],
    )?;
    Ok(inserted > 0)
}

/// Set one player's status unconditionally; returns rows affected
pub fn set_player_status(
    conn: &Connection,
    room_id: Uuid,
    username: &str,
    status: PlayerStatus,
) -> Result<usize> {
    conn.execute(
        "UPDATE multiplayer_players SET status = ?3 WHERE room_id = ?1 AND username = ?2",
        params![room_id_text(room_id), username, status],
    )
}

/// Move a lobby room to active with its target; returns rows affected
pub fn start_room(
    conn: &Connection,
    room_id: Uuid,
    target_word: &str,
    now: DateTime<Utc>,
) -> Result<usize> {
    conn.execute(
        "UPDATE multiplayer_rooms SET status = ?2, target_word = ?3, started_at = ?4
         WHERE id = ?1 AND status = ?5",
        params![
            room_id_text(room_id),
            RoomStatus::Active,
            target_word,
            format_timestamp(now),
            RoomStatus::Lobby
        ],
    )
}

/// Promote every accepted player to playing; returns how many were promoted
pub fn promote_accepted(conn: &Connection, room_id: Uuid) -> Result<usize> {
    conn.execute(
        "UPDATE multiplayer_players SET status = ?2 WHERE room_id = ?1 AND status = ?3",
        params![
            room_id_text(room_id),
            PlayerStatus::Playing,
            PlayerStatus::Accepted
        ],
    )
}

/// Compare-and-swap an active room to complete
///
/// Returns 1 for the single caller that won the swap and 0 for everyone else.
pub fn complete_if_active(conn: &Connection, room_id: Uuid, now: DateTime<Utc>) -> Result<usize> {
    conn.execute(
        "UPDATE multiplayer_rooms SET status = ?2, ended_at = ?3 WHERE id = ?1 AND status = ?4",
        params![
            room_id_text(room_id),
            RoomStatus::Complete,
            format_timestamp(now),
            RoomStatus::Active
        ],
    )
}

pub fn record_win(
    conn: &Connection,
    room_id: Uuid,
    username: &str,
    guesses_count: u32,
    now: DateTime<Utc>,
) -> Result<usize> {
    conn.execute(
        "UPDATE multiplayer_players SET status = ?3, guesses_count = ?4, finished_at = ?5
         WHERE room_id = ?1 AND username = ?2",
        params![
            room_id_text(room_id),
            username,
            PlayerStatus::Won,
            guesses_count,
            format_timestamp(now)
        ],
    )
}

/// Everyone still playing after a win has lost
pub fn mark_remaining_lost(conn: &Connection, room_id: Uuid, now: DateTime<Utc>) -> Result<usize> {
    conn.execute(
        "UPDATE multiplayer_players SET status = ?2, finished_at = ?3 WHERE room_id = ?1 AND status = ?4",
        params![
            room_id_text(room_id),
            PlayerStatus::Lost,
            format_timestamp(now),
            PlayerStatus::Playing
        ],
    )
}

/// Abandon a room regardless of its current status
pub fn abandon_room(conn: &Connection, room_id: Uuid, now: DateTime<Utc>) -> Result<usize> {
    conn.execute(
        "UPDATE multiplayer_rooms SET status = ?2, ended_at = ?3 WHERE id = ?1",
        params![
            room_id_text(room_id),
            RoomStatus::Abandoned,
            format_timestamp(now)
        ],
    )
}

pub fn room_status(conn: &Connection, room_id: Uuid) -> Result<Option<RoomStatus>> {
    conn.query_row(
        "SELECT status FROM multiplayer_rooms WHERE id = ?1",
        [room_id_text(room_id)],
        |row| row.get(0),
    )
    .optional()
}

pub fn load_room(conn: &Connection, room_id: Uuid) -> Result<Option<Room>> {
    conn.query_row(
        "SELECT id, host_username, status, target_word, created_at, started_at, ended_at
         FROM multiplayer_rooms WHERE id = ?1",
        [room_id_text(room_id)],
        room_from_row,
    )
    .optional()
}

/// Players of a room, invitees by username then the host
pub fn load_players(conn: &Connection, room_id: Uuid) -> Result<Vec<Player>> {
    let mut stmt = conn.prepare(
        "SELECT username, role, status, guesses_count, finished_at
         FROM multiplayer_players WHERE room_id = ?1
         ORDER BY role DESC, username ASC",
    )?;
    let rows = stmt.query_map([room_id_text(room_id)], |row| {
        Ok(Player {
            username: row.get(0)?,
            role: row.get(1)?,
            status: row.get(2)?,
            guesses_count: row.get(3)?,
            finished_at: parse_optional_timestamp(4, row.get(4)?)?,
        })
    })?;
    rows.collect()
}

fn room_from_row(row: &Row<'_>) -> Result<Room> {
    let id: String = row.get(0)?;
    let id = Uuid::parse_str(&id).map_err(|e| {
        rusqlite::Error::FromSqlConversionFailure(0, rusqlite::types::Type::Text, Box::new(e))
    })?;
    let created_at: String = row.get(4)?;

    Ok(Room {
        id,
        host_username: row.get(1)?,
        status: row.get(2)?,
        target_word: row.get(3)?,
        created_at: parse_timestamp(4, &created_at)?,
        started_at: parse_optional_timestamp(5, row.get(5)?)?,
        ended_at: parse_optional_timestamp(6, row.get(6)?)?,
    })
}

/// One completed match seen from a single participant
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MatchRow {
    pub room_id: String,
    pub ended_at: Option<String>,
    pub won: bool,
    pub opponents: Vec<String>,
}

/// Completed rooms `username` took part in against at least one opponent,
/// oldest first
///
/// Opponents are the other participants (playing, won or lost), sorted.
pub fn completed_matches(conn: &Connection, username: &str) -> Result<Vec<MatchRow>> {
    let mut stmt = conn.prepare(
        "SELECT mr.id, mr.ended_at, me.status, other.username
         FROM multiplayer_rooms mr
         JOIN multiplayer_players me
           ON me.room_id = mr.id AND me.username = ?1
          AND me.status IN ('playing', 'won', 'lost')
         JOIN multiplayer_players other
           ON other.room_id = mr.id AND other.username != ?1
          AND other.status IN ('playing', 'won', 'lost')
         WHERE mr.status = 'complete'
         ORDER BY mr.ended_at ASC, mr.id ASC, other.username ASC",
    )?;

    let rows = stmt.query_map([username], |row| {
        Ok((
            row.get::<_, String>(0)?,
            row.get::<_, Option<String>>(1)?,
            row.get::<_, PlayerStatus>(2)?,
            row.get::<_, String>(3)?,
        ))
    })?;

    let mut matches: Vec<MatchRow> = Vec::new();
    for row in rows {
        let (room_id, ended_at, status, opponent) = row?;
        let is_same_room = matches.last().is_some_and(|m| m.room_id == room_id);
        if !is_same_room {
            matches.push(MatchRow {
                room_id,
                ended_at,
                won: status == PlayerStatus::Won,
                opponents: Vec::new(),
            });
        }
        if let Some(current) = matches.last_mut() {
            current.opponents.push(opponent);
        }
    }
    Ok(matches)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::storage::Database;

    fn setup() -> (Database, Uuid) {
        let db = Database::open_in_memory().unwrap();
        let room_id = Uuid::new_v4();
        let conn = db.connection();
        insert_room(conn, room_id, "ann", Utc::now()).unwrap();
        insert_player(conn, room_id, "ann", Role::Host, PlayerStatus::Accepted).unwrap();
        insert_player(conn, room_id, "bob", Role::Player, PlayerStatus::Invited).unwrap();
        (db, room_id)
    }

    #[test]
    fn duplicate_player_insert_is_ignored() {
        let (db, room_id) = setup();
        let again =
            insert_player(db.connection(), room_id, "bob", Role::Player, PlayerStatus::Invited)
                .unwrap();
        assert!(!again);
        assert_eq!(load_players(db.connection(), room_id).unwrap().len(), 2);
    }

    #[test]
    fn players_listed_before_host() {
        let (db, room_id) = setup();
        insert_player(db.connection(), room_id, "aaron", Role::Player, PlayerStatus::Invited)
            .unwrap();
        let names: Vec<String> = load_players(db.connection(), room_id)
            .unwrap()
            .into_iter()
            .map(|p| p.username)
            .collect();
        assert_eq!(names, ["aaron", "bob", "ann"]);
    }

    #[test]
    fn room_round_trips() {
        let (db, room_id) = setup();
        let room = load_room(db.connection(), room_id).unwrap().unwrap();
        assert_eq!(room.id, room_id);
        assert_eq!(room.status, RoomStatus::Lobby);
        assert_eq!(room.host_username, "ann");
        assert!(room.target_word.is_none());
        assert!(load_room(db.connection(), Uuid::new_v4()).unwrap().is_none());
    }

    #[test]
    fn start_only_applies_to_lobby() {
        let (db, room_id) = setup();
        assert_eq!(start_room(db.connection(), room_id, "crane", Utc::now()).unwrap(), 1);
        assert_eq!(start_room(db.connection(), room_id, "slate", Utc::now()).unwrap(), 0);
        let room = load_room(db.connection(), room_id).unwrap().unwrap();
        assert_eq!(room.target_word.as_deref(), Some("crane"));
    }

    #[test]
    fn complete_swap_succeeds_once() {
        let (db, room_id) = setup();
        start_room(db.connection(), room_id, "crane", Utc::now()).unwrap();
        assert_eq!(complete_if_active(db.connection(), room_id, Utc::now()).unwrap(), 1);
        assert_eq!(complete_if_active(db.connection(), room_id, Utc::now()).unwrap(), 0);
        assert_eq!(
            room_status(db.connection(), room_id).unwrap(),
            Some(RoomStatus::Complete)
        );
    }

    #[test]
    fn completed_matches_group_opponents() {
        let (db, room_id) = setup();
        let conn = db.connection();
        insert_player(conn, room_id, "cat", Role::Player, PlayerStatus::Declined).unwrap();
        set_player_status(conn, room_id, "bob", PlayerStatus::Accepted).unwrap();
        start_room(conn, room_id, "crane", Utc::now()).unwrap();
        promote_accepted(conn, room_id).unwrap();
        complete_if_active(conn, room_id, Utc::now()).unwrap();
        record_win(conn, room_id, "bob", 4, Utc::now()).unwrap();
        mark_remaining_lost(conn, room_id, Utc::now()).unwrap();

        let ann = completed_matches(conn, "ann").unwrap();
        assert_eq!(ann.len(), 1);
        assert!(!ann[0].won);
        assert_eq!(ann[0].opponents, ["bob"]);

        let bob = completed_matches(conn, "bob").unwrap();
        assert!(bob[0].won);
        assert_eq!(bob[0].opponents, ["ann"]);

        assert!(completed_matches(conn, "cat").unwrap().is_empty());
    }
}
