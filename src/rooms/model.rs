//! Room and player records

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;
use uuid::Uuid;

macro_rules! string_enum {
    ($name:ident { $($variant:ident => $text:literal),+ $(,)? }) => {
        impl $name {
            #[must_use]
            pub const fn as_str(self) -> &'static str {
                match self {
                    $(Self::$variant => $text),+
                }
            }
        }

        impl fmt::Display for $name {
            fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                f.write_str(self.as_str())
            }
        }

        impl FromStr for $name {
            type Err = String;

            fn from_str(s: &str) -> Result<Self, Self::Err> {
                match s {
                    $($text => Ok(Self::$variant),)+
                    other => Err(format!(concat!("unknown ", stringify!($name), ": {}"), other)),
                }
            }
        }
    };
}

/// Lifecycle state of a room
///
/// `Lobby -> Active -> Complete`, with `Abandoned` reachable from either
/// non-terminal state.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum RoomStatus {
    Lobby,
    Active,
    Complete,
    Abandoned,
}

string_enum!(RoomStatus {
    Lobby => "lobby",
    Active => "active",
    Complete => "complete",
    Abandoned => "abandoned",
});

impl RoomStatus {
    #[must_use]
    pub const fn is_terminal(self) -> bool {
        matches!(self, Self::Complete | Self::Abandoned)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Role {
    Host,
    Player,
}

string_enum!(Role {
    Host => "host",
    Player => "player",
});

/// Status of one player within a room
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum PlayerStatus {
    Invited,
    Accepted,
    Declined,
    Playing,
    Won,
    Lost,
}

string_enum!(PlayerStatus {
    Invited => "invited",
    Accepted => "accepted",
    Declined => "declined",
    Playing => "playing",
    Won => "won",
    Lost => "lost",
});

impl PlayerStatus {
    /// Took part in the started game
    #[must_use]
    pub const fn is_participant(self) -> bool {
        matches!(self, Self::Playing | Self::Won | Self::Lost)
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Room {
    pub id: Uuid,
    pub host_username: String,
    pub status: RoomStatus,
    pub target_word: Option<String>,
    pub created_at: DateTime<Utc>,
    pub started_at: Option<DateTime<Utc>>,
    pub ended_at: Option<DateTime<Utc>>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Player {
    pub username: String,
    pub role: Role,
    pub status: PlayerStatus,
    pub guesses_count: Option<u32>,
    pub finished_at: Option<DateTime<Utc>>,
}

/// A room together with its players, invitees by username then the host
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RoomView {
    pub room: Room,
    pub players: Vec<Player>,
}

impl RoomView {
    #[must_use]
    pub fn player(&self, username: &str) -> Option<&Player> {
        self.players.iter().find(|p| p.username == username)
    }

    /// The recorded winner, if any
    #[must_use]
    pub fn winner(&self) -> Option<&Player> {
        self.players.iter().find(|p| p.status == PlayerStatus::Won)
    }
}

/// Normalise a username: trimmed and lowercased, `None` when empty
#[must_use]
pub fn normalize_username(raw: &str) -> Option<String> {
    let trimmed = raw.trim();
    if trimmed.is_empty() {
        None
    } else {
        Some(trimmed.to_lowercase())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn status_strings_round_trip() {
        for status in [
            RoomStatus::Lobby,
            RoomStatus::Active,
            RoomStatus::Complete,
            RoomStatus::Abandoned,
        ] {
            assert_eq!(status.as_str().parse::<RoomStatus>(), Ok(status));
        }
        assert_eq!("won".parse::<PlayerStatus>(), Ok(PlayerStatus::Won));
        assert_eq!("host".parse::<Role>(), Ok(Role::Host));
        assert!("finished".parse::<RoomStatus>().is_err());
    }

    #[test]
    fn terminal_states() {
        assert!(RoomStatus::Complete.is_terminal());
        assert!(RoomStatus::Abandoned.is_terminal());
        assert!(!RoomStatus::Lobby.is_terminal());
        assert!(!RoomStatus::Active.is_terminal());
    }

    #[test]
    fn participants_exclude_lobby_statuses() {
        assert!(PlayerStatus::Playing.is_participant());
        assert!(PlayerStatus::Lost.is_participant());
        assert!(!PlayerStatus::Invited.is_participant());
        assert!(!PlayerStatus::Declined.is_participant());
    }

    #[test]
    fn usernames_are_normalised() {
        assert_eq!(normalize_username("  Alice "), Some("alice".to_string()));
        assert_eq!(normalize_username("   "), None);
    }

    #[test]
    fn statuses_serialize_lowercase() {
        assert_eq!(
            serde_json::to_string(&PlayerStatus::Accepted).unwrap(),
            "\"accepted\""
        );
    }
}
