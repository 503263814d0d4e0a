//! Lobby presence via heartbeats

use crate::error::{Error, Result};
use crate::notify::{Event, LOBBY_CHANNEL, Notifier, publish_quietly};
use crate::rooms::normalize_username;
use crate::storage::{Database, lobby};
use chrono::{DateTime, Utc};
use serde::Serialize;
use std::time::Duration;

/// A recorded heartbeat
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Presence {
    pub username: String,
    pub last_seen: DateTime<Utc>,
}

/// Mark `username` as present and tell lobby subscribers
///
/// # Errors
///
/// Validation error for an empty username; store errors propagate.
pub fn heartbeat<N: Notifier + ?Sized>(db: &Database, notifier: &N, username: &str) -> Result<Presence> {
    heartbeat_at(db, notifier, username, Utc::now())
}

pub(crate) fn heartbeat_at<N: Notifier + ?Sized>(
    db: &Database,
    notifier: &N,
    username: &str,
    now: DateTime<Utc>,
) -> Result<Presence> {
    let username = normalize_username(username).ok_or_else(|| Error::validation("username required"))?;
    lobby::touch(db.connection(), &username, now)?;
    tracing::debug!(%username, "heartbeat");

    publish_quietly(
        notifier,
        LOBBY_CHANNEL,
        Event::LobbyUpdate {
            username: username.clone(),
        },
    );
    Ok(Presence {
        username,
        last_seen: now,
    })
}

/// Players seen within `window`, ascending
///
/// # Errors
///
/// Store errors propagate.
pub fn online_players(db: &Database, window: Duration) -> Result<Vec<String>> {
    online_players_at(db, window, Utc::now())
}

pub(crate) fn online_players_at(
    db: &Database,
    window: Duration,
    now: DateTime<Utc>,
) -> Result<Vec<String>> {
    let window = chrono::Duration::from_std(window)
        .map_err(|_| Error::validation("presence window out of range"))?;
    Ok(lobby::seen_since(db.connection(), now - window)?)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::notify::{BroadcastHub, NullNotifier};

    #[test]
    fn heartbeat_normalises_and_announces() {
        let db = Database::open_in_memory().unwrap();
        let hub = BroadcastHub::default();
        let mut rx = hub.subscribe(LOBBY_CHANNEL).unwrap();

        let presence = heartbeat(&db, &hub, " Ann ").unwrap();
        assert_eq!(presence.username, "ann");
        let n = rx.try_recv().unwrap();
        assert_eq!(n.event, "lobby-update");
        assert_eq!(n.payload["username"], "ann");
    }

    #[test]
    fn heartbeat_reports_when_it_was_seen() {
        let db = Database::open_in_memory().unwrap();
        let now = Utc::now();
        let presence = heartbeat_at(&db, &NullNotifier, "Ann", now).unwrap();
        assert_eq!(
            presence,
            Presence {
                username: "ann".into(),
                last_seen: now,
            }
        );
        assert_eq!(
            serde_json::to_value(&presence).unwrap()["username"],
            serde_json::json!("ann")
        );
    }

    #[test]
    fn empty_username_is_rejected() {
        let db = Database::open_in_memory().unwrap();
        assert!(matches!(
            heartbeat(&db, &NullNotifier, "  "),
            Err(Error::Validation(_))
        ));
    }

    #[test]
    fn only_recent_players_are_online() {
        let db = Database::open_in_memory().unwrap();
        let now = Utc::now();
        heartbeat_at(&db, &NullNotifier, "zoe", now).unwrap();
        heartbeat_at(&db, &NullNotifier, "amy", now - chrono::Duration::seconds(5)).unwrap();
        heartbeat_at(&db, &NullNotifier, "old", now - chrono::Duration::seconds(60)).unwrap();

        let online = online_players_at(&db, Duration::from_secs(15), now).unwrap();
        assert_eq!(online, ["amy", "zoe"]);
    }

    #[test]
    fn repeated_heartbeats_refresh_presence() {
        let db = Database::open_in_memory().unwrap();
        let now = Utc::now();
        heartbeat_at(&db, &NullNotifier, "ann", now - chrono::Duration::seconds(60)).unwrap();
        assert!(online_players_at(&db, Duration::from_secs(15), now).unwrap().is_empty());
        heartbeat_at(&db, &NullNotifier, "ann", now).unwrap();
        assert_eq!(online_players_at(&db, Duration::from_secs(15), now).unwrap(), ["ann"]);
    }
}
