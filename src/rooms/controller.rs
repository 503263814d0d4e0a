//! Room lifecycle controller
//!
//! Each action runs in exactly one IMMEDIATE transaction. Notifications are
//! published only after that transaction commits, and their failures are
//! swallowed.

use super::action::RoomAction;
use super::model::{PlayerStatus, Role, RoomStatus, RoomView, normalize_username};
use crate::error::{Error, Result};
use crate::notify::{Event, LOBBY_CHANNEL, Notifier, publish_quietly, room_channel};
use crate::storage::{Database, rooms};
use chrono::Utc;
use rusqlite::Connection;
use serde::Serialize;
use uuid::Uuid;

/// Result of a state-changing action
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct ActionOutcome {
    pub ok: bool,
    /// Set when `win` found the room already complete; nothing was written
    #[serde(skip_serializing_if = "std::ops::Not::not")]
    pub already_won: bool,
}

impl ActionOutcome {
    const DONE: Self = Self {
        ok: true,
        already_won: false,
    };
    const ALREADY_WON: Self = Self {
        ok: true,
        already_won: true,
    };
}

/// Response to a dispatched [`RoomAction`]
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(untagged)]
pub enum ActionResponse {
    Created { room_id: Uuid },
    Room(RoomView),
    Done(ActionOutcome),
}

/// Applies room actions against the store, announcing each change
pub struct RoomController<'a, N: Notifier + ?Sized> {
    db: &'a Database,
    notifier: &'a N,
}

impl<'a, N: Notifier + ?Sized> RoomController<'a, N> {
    pub const fn new(db: &'a Database, notifier: &'a N) -> Self {
        Self { db, notifier }
    }

    /// Dispatch a parsed request
    ///
    /// # Errors
    ///
    /// Whatever the individual action returns.
    pub fn apply(&self, action: RoomAction) -> Result<ActionResponse> {
        tracing::debug!(action = action.name(), "room action");
        match action {
            RoomAction::Create { host, invitees } => self
                .create(&host, &invitees)
                .map(|room_id| ActionResponse::Created { room_id }),
            RoomAction::Get { room_id } => self.get(room_id).map(ActionResponse::Room),
            RoomAction::Accept { room_id, username } => {
                self.accept(room_id, &username).map(ActionResponse::Done)
            }
            RoomAction::Decline { room_id, username } => {
                self.decline(room_id, &username).map(ActionResponse::Done)
            }
            RoomAction::Start {
                room_id,
                target_word,
            } => self.start(room_id, &target_word).map(ActionResponse::Done),
            RoomAction::Win {
                room_id,
                username,
                guesses_count,
            } => self
                .win(room_id, &username, guesses_count)
                .map(ActionResponse::Done),
            RoomAction::Abandon { room_id } => self.abandon(room_id).map(ActionResponse::Done),
        }
    }

    /// Open a room in the lobby with the host accepted and everyone else invited
    ///
    /// Duplicate invitees, and the host listed as an invitee, collapse into a
    /// single row. One invite is published per invitee actually added.
    ///
    /// # Errors
    ///
    /// Validation error when the host is missing or no invitee other than the
    /// host remains; nothing is written in that case.
    pub fn create<S: AsRef<str>>(&self, host: &str, invitees: &[S]) -> Result<Uuid> {
        let host = normalize_username(host).ok_or_else(|| Error::validation("username required"))?;
        let invitees: Vec<String> = invitees
            .iter()
            .filter_map(|i| normalize_username(i.as_ref()))
            .filter(|i| *i != host)
            .collect();
        if invitees.is_empty() {
            return Err(Error::validation("invitees required"));
        }

        let room_id = Uuid::new_v4();
        let tx = self.db.transaction()?;
        rooms::insert_room(&tx, room_id, &host, Utc::now())?;
        rooms::insert_player(&tx, room_id, &host, Role::Host, PlayerStatus::Accepted)?;

        let mut invited = Vec::with_capacity(invitees.len());
        for invitee in invitees {
            if rooms::insert_player(&tx, room_id, &invitee, Role::Player, PlayerStatus::Invited)? {
                invited.push(invitee);
            }
        }
        tx.commit()?;

        tracing::info!(%room_id, %host, invited = invited.len(), "room created");
        for invitee in invited {
            self.notify(
                LOBBY_CHANNEL,
                Event::Invite {
                    invitee,
                    host: host.clone(),
                    room_id,
                },
            );
        }
        Ok(room_id)
    }

    /// Room and players, invitees by username then the host
    ///
    /// # Errors
    ///
    /// Not-found error for an unknown room.
    pub fn get(&self, room_id: Uuid) -> Result<RoomView> {
        load_view(self.db.connection(), room_id)
    }

    /// # Errors
    ///
    /// Validation error for an empty username, not-found error for an
    /// unknown room or player.
    pub fn accept(&self, room_id: Uuid, username: &str) -> Result<ActionOutcome> {
        self.set_player_status(room_id, username, PlayerStatus::Accepted)
    }

    /// # Errors
    ///
    /// Same as [`Self::accept`].
    pub fn decline(&self, room_id: Uuid, username: &str) -> Result<ActionOutcome> {
        self.set_player_status(room_id, username, PlayerStatus::Declined)
    }

    /// Replies are applied whatever the room's status, and may be changed
    fn set_player_status(
        &self,
        room_id: Uuid,
        username: &str,
        status: PlayerStatus,
    ) -> Result<ActionOutcome> {
        let username =
            normalize_username(username).ok_or_else(|| Error::validation("username required"))?;

        let tx = self.db.transaction()?;
        require_room(&tx, room_id)?;
        if rooms::set_player_status(&tx, room_id, &username, status)? == 0 {
            return Err(Error::NotFound(format!("player {username} in room {room_id}")));
        }
        let players = rooms::load_players(&tx, room_id)?;
        tx.commit()?;

        tracing::info!(%room_id, %username, %status, "player status");
        self.notify(&room_channel(room_id), Event::PlayerStatus { players });
        Ok(ActionOutcome::DONE)
    }

    /// Move the room to active and promote accepted players to playing
    ///
    /// Invited and declined players are left behind.
    ///
    /// # Errors
    ///
    /// Validation error for an empty target, not-found error for an unknown
    /// room, conflict if the room has already left the lobby.
    pub fn start(&self, room_id: Uuid, target_word: &str) -> Result<ActionOutcome> {
        let target_word = target_word.trim().to_lowercase();
        if target_word.is_empty() {
            return Err(Error::validation("target_word required"));
        }

        let tx = self.db.transaction()?;
        if rooms::start_room(&tx, room_id, &target_word, Utc::now())? == 0 {
            let status = require_room(&tx, room_id)?;
            return Err(Error::Conflict(format!("room {room_id} is {status}, not lobby")));
        }
        let playing = rooms::promote_accepted(&tx, room_id)?;
        tx.commit()?;

        tracing::info!(%room_id, playing, "game started");
        self.notify(
            &room_channel(room_id),
            Event::GameStart {
                target_word,
                room_id,
            },
        );
        Ok(ActionOutcome::DONE)
    }

    /// Record `username` as the winner; the first caller wins
    ///
    /// The room is moved from active to complete with a single conditional
    /// update, so of two concurrent calls exactly one succeeds and the other
    /// sees `already_won`. Everyone else still playing is marked lost.
    ///
    /// # Errors
    ///
    /// Validation error for an empty username, not-found error for an
    /// unknown room or player, conflict if the room is not active.
    pub fn win(&self, room_id: Uuid, username: &str, guesses_count: u32) -> Result<ActionOutcome> {
        let username =
            normalize_username(username).ok_or_else(|| Error::validation("username required"))?;

        let tx = self.db.transaction()?;
        let now = Utc::now();
        if rooms::complete_if_active(&tx, room_id, now)? == 0 {
            return match require_room(&tx, room_id)? {
                RoomStatus::Complete => {
                    tracing::info!(%room_id, %username, "win ignored, room already complete");
                    Ok(ActionOutcome::ALREADY_WON)
                }
                status => Err(Error::Conflict(format!("room {room_id} is {status}, not active"))),
            };
        }

        if rooms::record_win(&tx, room_id, &username, guesses_count, now)? == 0 {
            return Err(Error::NotFound(format!("player {username} in room {room_id}")));
        }
        let losers = rooms::mark_remaining_lost(&tx, room_id, now)?;
        let target_word = rooms::load_room(&tx, room_id)?.and_then(|room| room.target_word);
        tx.commit()?;

        tracing::info!(%room_id, winner = %username, guesses_count, losers, "room complete");
        self.notify(
            &room_channel(room_id),
            Event::PlayerWon {
                winner: username,
                target_word,
                guesses_count,
            },
        );
        Ok(ActionOutcome::DONE)
    }

    /// Abandon the room whatever its status
    ///
    /// A complete room may be abandoned too, which overwrites its end time.
    ///
    /// # Errors
    ///
    /// Not-found error for an unknown room.
    pub fn abandon(&self, room_id: Uuid) -> Result<ActionOutcome> {
        let tx = self.db.transaction()?;
        if rooms::abandon_room(&tx, room_id, Utc::now())? == 0 {
            return Err(not_found(room_id));
        }
        tx.commit()?;

        tracing::info!(%room_id, "room abandoned");
        self.notify(&room_channel(room_id), Event::RoomAbandoned { room_id });
        Ok(ActionOutcome::DONE)
    }

    fn notify(&self, channel: &str, event: Event) {
        publish_quietly(self.notifier, channel, event);
    }
}

fn not_found(room_id: Uuid) -> Error {
    Error::NotFound(format!("room {room_id}"))
}

fn require_room(conn: &Connection, room_id: Uuid) -> Result<RoomStatus> {
    rooms::room_status(conn, room_id)?.ok_or_else(|| not_found(room_id))
}

fn load_view(conn: &Connection, room_id: Uuid) -> Result<RoomView> {
    let room = rooms::load_room(conn, room_id)?.ok_or_else(|| not_found(room_id))?;
    let players = rooms::load_players(conn, room_id)?;
    Ok(RoomView { room, players })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::notify::{BroadcastHub, NullNotifier};

    fn open_room(db: &Database) -> Uuid {
        RoomController::new(db, &NullNotifier)
            .create("Ann", &["bob", "cat"])
            .unwrap()
    }

    #[test]
    fn create_collapses_duplicates_and_host() {
        let db = Database::open_in_memory().unwrap();
        let hub = BroadcastHub::default();
        let mut lobby = hub.subscribe(LOBBY_CHANNEL).unwrap();
        let controller = RoomController::new(&db, &hub);

        let room_id = controller
            .create("ann", &["Bob", "bob", "ANN", " cat "])
            .unwrap();
        let view = controller.get(room_id).unwrap();

        assert_eq!(view.room.status, RoomStatus::Lobby);
        let names: Vec<_> = view.players.iter().map(|p| p.username.as_str()).collect();
        assert_eq!(names, ["bob", "cat", "ann"]);
        let host = view.player("ann").unwrap();
        assert_eq!(host.role, Role::Host);
        assert_eq!(host.status, PlayerStatus::Accepted);

        let invites: Vec<_> = std::iter::from_fn(|| lobby.try_recv().ok())
            .map(|n| n.payload["invitee"].as_str().unwrap_or_default().to_string())
            .collect();
        assert_eq!(invites, ["bob", "cat"]);
    }

    #[test]
    fn create_requires_host_and_invitees() {
        let db = Database::open_in_memory().unwrap();
        let controller = RoomController::new(&db, &NullNotifier);
        let none: [&str; 0] = [];
        assert!(matches!(controller.create("ann", &none), Err(Error::Validation(_))));
        assert!(matches!(controller.create("ann", &["ann"]), Err(Error::Validation(_))));
        assert!(matches!(controller.create(" ", &["bob"]), Err(Error::Validation(_))));

        let rooms: i64 = db
            .connection()
            .query_row("SELECT COUNT(*) FROM multiplayer_rooms", [], |row| row.get(0))
            .unwrap();
        assert_eq!(rooms, 0);
    }

    #[test]
    fn accept_and_decline_are_repeatable() {
        let db = Database::open_in_memory().unwrap();
        let room_id = open_room(&db);
        let controller = RoomController::new(&db, &NullNotifier);

        controller.decline(room_id, "bob").unwrap();
        controller.accept(room_id, "bob").unwrap();
        controller.accept(room_id, "BOB").unwrap();

        let view = controller.get(room_id).unwrap();
        assert_eq!(view.player("bob").unwrap().status, PlayerStatus::Accepted);
        assert!(matches!(
            controller.accept(room_id, "zed"),
            Err(Error::NotFound(_))
        ));
    }

    #[test]
    fn start_twice_conflicts() {
        let db = Database::open_in_memory().unwrap();
        let room_id = open_room(&db);
        let controller = RoomController::new(&db, &NullNotifier);

        controller.start(room_id, "CRANE").unwrap();
        assert_eq!(
            controller.get(room_id).unwrap().room.target_word.as_deref(),
            Some("crane")
        );
        assert!(matches!(
            controller.start(room_id, "slate"),
            Err(Error::Conflict(_))
        ));
        assert!(matches!(controller.start(room_id, ""), Err(Error::Validation(_))));
    }

    #[test]
    fn win_marks_other_players_lost() {
        let db = Database::open_in_memory().unwrap();
        let room_id = open_room(&db);
        let controller = RoomController::new(&db, &NullNotifier);
        controller.accept(room_id, "bob").unwrap();
        controller.start(room_id, "crane").unwrap();

        let outcome = controller.win(room_id, "bob", 4).unwrap();
        assert!(!outcome.already_won);

        let view = controller.get(room_id).unwrap();
        assert_eq!(view.room.status, RoomStatus::Complete);
        assert!(view.room.ended_at.is_some());
        let bob = view.player("bob").unwrap();
        assert_eq!(bob.status, PlayerStatus::Won);
        assert_eq!(bob.guesses_count, Some(4));
        assert_eq!(view.player("ann").unwrap().status, PlayerStatus::Lost);
        assert_eq!(view.player("cat").unwrap().status, PlayerStatus::Invited);
    }

    #[test]
    fn win_before_start_conflicts() {
        let db = Database::open_in_memory().unwrap();
        let room_id = open_room(&db);
        let controller = RoomController::new(&db, &NullNotifier);
        assert!(matches!(
            controller.win(room_id, "ann", 3),
            Err(Error::Conflict(_))
        ));
        assert_eq!(controller.get(room_id).unwrap().room.status, RoomStatus::Lobby);
    }

    #[test]
    fn win_by_stranger_rolls_back() {
        let db = Database::open_in_memory().unwrap();
        let room_id = open_room(&db);
        let controller = RoomController::new(&db, &NullNotifier);
        controller.start(room_id, "crane").unwrap();

        assert!(matches!(
            controller.win(room_id, "zed", 3),
            Err(Error::NotFound(_))
        ));
        assert_eq!(controller.get(room_id).unwrap().room.status, RoomStatus::Active);
    }

    #[test]
    fn complete_room_can_still_be_abandoned() {
        let db = Database::open_in_memory().unwrap();
        let hub = BroadcastHub::default();
        let room_id = open_room(&db);
        let mut room = hub.subscribe(&room_channel(room_id)).unwrap();
        let controller = RoomController::new(&db, &hub);
        controller.accept(room_id, "bob").unwrap();
        controller.start(room_id, "crane").unwrap();
        controller.win(room_id, "bob", 3).unwrap();
        let won_at = controller.get(room_id).unwrap().room.ended_at.unwrap();

        std::thread::sleep(std::time::Duration::from_millis(5));
        assert_eq!(controller.abandon(room_id).unwrap(), ActionOutcome::DONE);

        let view = controller.get(room_id).unwrap();
        assert_eq!(view.room.status, RoomStatus::Abandoned);
        assert!(view.room.ended_at.unwrap() > won_at);

        let events: Vec<_> = std::iter::from_fn(|| room.try_recv().ok()).collect();
        let last = events.last().unwrap();
        assert_eq!(last.event, "room-abandoned");
        assert_eq!(last.payload["room_id"], room_id.to_string());
    }

    #[test]
    fn unknown_room_is_not_found() {
        let db = Database::open_in_memory().unwrap();
        let controller = RoomController::new(&db, &NullNotifier);
        let id = Uuid::new_v4();
        assert!(matches!(controller.get(id), Err(Error::NotFound(_))));
        assert!(matches!(controller.accept(id, "ann"), Err(Error::NotFound(_))));
        assert!(matches!(controller.start(id, "crane"), Err(Error::NotFound(_))));
        assert!(matches!(controller.win(id, "ann", 1), Err(Error::NotFound(_))));
        assert!(matches!(controller.abandon(id), Err(Error::NotFound(_))));
    }

    #[test]
    fn apply_dispatches() {
        let db = Database::open_in_memory().unwrap();
        let controller = RoomController::new(&db, &NullNotifier);
        let created = controller
            .apply(RoomAction::Create {
                host: "ann".into(),
                invitees: vec!["bob".into()],
            })
            .unwrap();
        let ActionResponse::Created { room_id } = created else {
            panic!("expected a created room, got {created:?}");
        };

        let done = controller.apply(RoomAction::Abandon { room_id }).unwrap();
        assert_eq!(done, ActionResponse::Done(ActionOutcome::DONE));
        assert_eq!(
            serde_json::to_value(&done).unwrap(),
            serde_json::json!({"ok": true})
        );
    }
}
