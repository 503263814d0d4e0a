//! Parsing loosely-typed room requests into typed actions

use crate::error::{Error, Result};
use serde::Deserialize;
use uuid::Uuid;

/// A room request as submitted by a client
///
/// `username` is the host for `create` and the acting player otherwise.
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
pub struct RoomRequest {
    pub action: Option<String>,
    pub room_id: Option<String>,
    pub username: Option<String>,
    #[serde(default)]
    pub invitees: Vec<String>,
    pub target_word: Option<String>,
    pub guesses_count: Option<u32>,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RoomAction {
    Create {
        host: String,
        invitees: Vec<String>,
    },
    Get {
        room_id: Uuid,
    },
    Accept {
        room_id: Uuid,
        username: String,
    },
    Decline {
        room_id: Uuid,
        username: String,
    },
    Start {
        room_id: Uuid,
        target_word: String,
    },
    Win {
        room_id: Uuid,
        username: String,
        guesses_count: u32,
    },
    Abandon {
        room_id: Uuid,
    },
}

impl RoomAction {
    #[must_use]
    pub const fn name(&self) -> &'static str {
        match self {
            Self::Create { .. } => "create",
            Self::Get { .. } => "get",
            Self::Accept { .. } => "accept",
            Self::Decline { .. } => "decline",
            Self::Start { .. } => "start",
            Self::Win { .. } => "win",
            Self::Abandon { .. } => "abandon",
        }
    }
}

impl TryFrom<RoomRequest> for RoomAction {
    type Error = Error;

    fn try_from(req: RoomRequest) -> Result<Self> {
        let action = req
            .action
            .as_deref()
            .map(str::trim)
            .filter(|a| !a.is_empty())
            .ok_or_else(|| Error::validation("action required"))?;

        if action == "create" {
            return Ok(Self::Create {
                host: required(req.username, "username")?,
                invitees: req.invitees,
            });
        }

        let room_id = parse_room_id(req.room_id.as_deref())?;
        match action {
            "get" => Ok(Self::Get { room_id }),
            "accept" => Ok(Self::Accept {
                room_id,
                username: required(req.username, "username")?,
            }),
            "decline" => Ok(Self::Decline {
                room_id,
                username: required(req.username, "username")?,
            }),
            "start" => Ok(Self::Start {
                room_id,
                target_word: required(req.target_word, "target_word")?,
            }),
            "win" => Ok(Self::Win {
                room_id,
                username: required(req.username, "username")?,
                guesses_count: req
                    .guesses_count
                    .ok_or_else(|| Error::validation("guesses_count required"))?,
            }),
            "abandon" => Ok(Self::Abandon { room_id }),
            other => Err(Error::validation(format!("unknown action: {other}"))),
        }
    }
}

/// Parse a room id, treating absence and malformed ids alike as bad input
///
/// # Errors
///
/// Returns a validation error when the id is missing or not a UUID.
pub fn parse_room_id(raw: Option<&str>) -> Result<Uuid> {
    let raw = raw
        .map(str::trim)
        .filter(|r| !r.is_empty())
        .ok_or_else(|| Error::validation("room_id required"))?;
    Uuid::parse_str(raw).map_err(|_| Error::validation(format!("invalid room_id: {raw}")))
}

fn required(value: Option<String>, field: &str) -> Result<String> {
    value
        .filter(|v| !v.trim().is_empty())
        .ok_or_else(|| Error::validation(format!("{field} required")))
}
