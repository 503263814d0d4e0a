//! Persistent storage using SQLite (rusqlite)
//!
//! This module provides:
//! - the process-wide [`Database`] handle, opened explicitly and injected into
//!   every component that needs it
//! - schema creation and versioning
//! - per-table query helpers (`rooms`, `games`, `lobby`)
//!
//! Timestamps are stored as RFC 3339 UTC strings with millisecond precision, so
//! lexicographic order equals chronological order.

/// Store a string-backed enum as TEXT via its `as_str`/`FromStr` pair
macro_rules! sql_text_enum {
    ($name:ty) => {
        impl rusqlite::types::ToSql for $name {
            fn to_sql(&self) -> rusqlite::Result<rusqlite::types::ToSqlOutput<'_>> {
                Ok(rusqlite::types::ToSqlOutput::from(self.as_str()))
            }
        }

        impl rusqlite::types::FromSql for $name {
            fn column_result(
                value: rusqlite::types::ValueRef<'_>,
            ) -> rusqlite::types::FromSqlResult<Self> {
                value
                    .as_str()?
                    .parse()
                    .map_err(|e: String| rusqlite::types::FromSqlError::Other(e.into()))
            }
        }
    };
}

pub mod games;
pub mod lobby;
pub mod rooms;

use crate::error::{Error, Result};
use chrono::{DateTime, SecondsFormat, Utc};
use rusqlite::types::Type;
use rusqlite::{Connection, Transaction, TransactionBehavior};
use std::path::Path;

/// Current schema version. Bump this when making schema changes.
/// Version history:
/// - v1: rooms, players, games, lobby presence
const SCHEMA_VERSION: u32 = 1;

/// Handle to the relational store
pub struct Database {
    conn: Connection,
}

impl Database {
    /// Open or create the database at `path`, creating parent directories
    ///
    /// # Errors
    ///
    /// Fails if the directory cannot be created, the file cannot be opened or
    /// the schema is newer than this build supports.
    pub fn open(path: &Path) -> Result<Self> {
        if let Some(parent) = path.parent()
            && !parent.as_os_str().is_empty()
        {
            std::fs::create_dir_all(parent)?;
        }

        let conn = Connection::open(path)?;
        conn.busy_timeout(std::time::Duration::from_secs(10))?;
        Self::with_connection(conn)
    }

    /// Open an in-memory database (tests and dry runs)
    ///
    /// # Errors
    ///
    /// Fails only if SQLite cannot allocate the database.
    pub fn open_in_memory() -> Result<Self> {
        Self::with_connection(Connection::open_in_memory()?)
    }

    fn with_connection(conn: Connection) -> Result<Self> {
        conn.execute_batch("PRAGMA foreign_keys = ON;")?;
        let db = Self { conn };
        db.initialize_schema()?;
        Ok(db)
    }

    /// Raw connection for read-only queries
    #[must_use]
    pub fn connection(&self) -> &Connection {
        &self.conn
    }

    /// Begin a write transaction
    ///
    /// The transaction is IMMEDIATE: the write lock is taken at BEGIN, so two
    /// concurrent read-then-write units serialise instead of interleaving.
    /// Dropping the transaction without committing rolls it back.
    ///
    /// # Errors
    ///
    /// Returns a store error if the lock cannot be acquired.
    pub fn transaction(&self) -> Result<Transaction<'_>> {
        Ok(Transaction::new_unchecked(
            &self.conn,
            TransactionBehavior::Immediate,
        )?)
    }

    /// Close the database, surfacing any error SQLite reports on shutdown
    ///
    /// # Errors
    ///
    /// Returns the store error reported by SQLite.
    pub fn close(self) -> Result<()> {
        self.conn.close().map_err(|(_, e)| Error::Store(e))
    }

    fn initialize_schema(&self) -> Result<()> {
        let current_version = self.schema_version()?;

        if current_version == 0 {
            self.create_schema_v1()?;
        } else if current_version > SCHEMA_VERSION {
            return Err(Error::FutureSchema {
                found: current_version,
                supported: SCHEMA_VERSION,
            });
        }

        Ok(())
    }

    fn schema_version(&self) -> Result<u32> {
        let table_exists: bool = self.conn.query_row(
            "SELECT COUNT(*) > 0 FROM sqlite_master WHERE type='table' AND name='meta'",
            [],
            |row| row.get(0),
        )?;

        if !table_exists {
            return Ok(0);
        }

        let version: u32 = self
            .conn
            .query_row("SELECT schema_version FROM meta LIMIT 1", [], |row| {
                row.get(0)
            })
            .unwrap_or(0);

        Ok(version)
    }

    fn create_schema_v1(&self) -> Result<()> {
        self.conn.execute_batch(
            r"
            CREATE TABLE IF NOT EXISTS meta (
                schema_version INTEGER NOT NULL
            );

            CREATE TABLE IF NOT EXISTS multiplayer_rooms (
                id TEXT PRIMARY KEY,
                host_username TEXT NOT NULL,
                status TEXT NOT NULL DEFAULT 'lobby',
                target_word TEXT,
                created_at TEXT NOT NULL,
                started_at TEXT,
                ended_at TEXT
            );

            -- One row per (room, username); the unique key makes invites idempotent
            CREATE TABLE IF NOT EXISTS multiplayer_players (
                id INTEGER PRIMARY KEY AUTOINCREMENT,
                room_id TEXT NOT NULL REFERENCES multiplayer_rooms(id) ON DELETE CASCADE,
                username TEXT NOT NULL,
                role TEXT NOT NULL DEFAULT 'player',
                status TEXT NOT NULL DEFAULT 'invited',
                guesses_count INTEGER,
                finished_at TEXT,
                UNIQUE (room_id, username)
            );

            CREATE TABLE IF NOT EXISTS wordle_games (
                id INTEGER PRIMARY KEY AUTOINCREMENT,
                client_game_id TEXT UNIQUE NOT NULL,
                device_id TEXT NOT NULL,
                username TEXT,
                start_time TEXT NOT NULL,
                end_time TEXT NOT NULL,
                target_word TEXT NOT NULL,
                outcome TEXT NOT NULL,
                guesses_count INTEGER NOT NULL,
                guesses_json TEXT NOT NULL,
                remaining_counts_json TEXT,
                created_at TEXT NOT NULL,
                updated_at TEXT NOT NULL
            );

            CREATE INDEX IF NOT EXISTS idx_wordle_games_device_id ON wordle_games (device_id);
            CREATE INDEX IF NOT EXISTS idx_wordle_games_end_time ON wordle_games (end_time DESC);
            CREATE INDEX IF NOT EXISTS idx_wordle_games_username ON wordle_games (username);

            CREATE TABLE IF NOT EXISTS multiplayer_lobby (
                username TEXT PRIMARY KEY,
                last_seen TEXT NOT NULL
            );
            ",
        )?;

        self.conn.execute(
            "INSERT INTO meta (schema_version) VALUES (?1)",
            [SCHEMA_VERSION],
        )?;

        Ok(())
    }
}

/// Format a timestamp for storage
#[must_use]
pub fn format_timestamp(at: DateTime<Utc>) -> String {
    at.to_rfc3339_opts(SecondsFormat::Millis, true)
}

/// Parse a stored timestamp column
pub(crate) fn parse_timestamp(column: usize, raw: &str) -> rusqlite::Result<DateTime<Utc>> {
    DateTime::parse_from_rfc3339(raw)
        .map(|dt| dt.with_timezone(&Utc))
        .map_err(|e| rusqlite::Error::FromSqlConversionFailure(column, Type::Text, Box::new(e)))
}

/// Parse an optional stored timestamp column
pub(crate) fn parse_optional_timestamp(
    column: usize,
    raw: Option<String>,
) -> rusqlite::Result<Option<DateTime<Utc>>> {
    raw.map(|s| parse_timestamp(column, &s)).transpose()
}
