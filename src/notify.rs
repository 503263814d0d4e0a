//! Fan-out notifications
//!
//! Room and lobby changes are announced on named channels. Delivery is a
//! liveness hint only: persisted state stays the source of truth, and a
//! failed publish never fails the action that triggered it.

use crate::rooms::Player;
use rustc_hash::FxHashMap;
use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::sync::Mutex;
use thiserror::Error;
use tokio::sync::broadcast;
use uuid::Uuid;

/// Channel carrying invites and presence changes
pub const LOBBY_CHANNEL: &str = "wordle-lobby";

/// Per-room channel name
#[must_use]
pub fn room_channel(room_id: Uuid) -> String {
    format!("wordle-room-{room_id}")
}

/// A published event as seen by subscribers
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Notification {
    pub channel: String,
    pub event: String,
    pub payload: Value,
}

#[derive(Debug, Error)]
pub enum NotifyError {
    #[error("no subscribers on channel {0}")]
    NoSubscribers(String),

    #[error("notification hub unavailable")]
    Unavailable,

    #[error("could not encode payload: {0}")]
    Encode(#[from] serde_json::Error),
}

/// Best-effort publish/subscribe sink
///
/// Implementations must return promptly: `publish` may hand the message to a
/// buffer or drop it, but never waits on a subscriber. Errors are advisory and
/// callers are expected to discard them.
pub trait Notifier: Send + Sync {
    /// Publish one notification
    ///
    /// # Errors
    ///
    /// Reports why the notification was not delivered.
    fn publish(&self, notification: Notification) -> Result<(), NotifyError>;
}

/// Events emitted by the room controller and lobby
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(untagged)]
pub enum Event {
    Invite {
        invitee: String,
        host: String,
        room_id: Uuid,
    },
    PlayerStatus {
        players: Vec<Player>,
    },
    GameStart {
        target_word: String,
        room_id: Uuid,
    },
    PlayerWon {
        winner: String,
        target_word: Option<String>,
        guesses_count: u32,
    },
    RoomAbandoned {
        room_id: Uuid,
    },
    LobbyUpdate {
        username: String,
    },
}

impl Event {
    /// Wire name of the event
    #[must_use]
    pub const fn name(&self) -> &'static str {
        match self {
            Self::Invite { .. } => "invite",
            Self::PlayerStatus { .. } => "player-status",
            Self::GameStart { .. } => "game-start",
            Self::PlayerWon { .. } => "player-won",
            Self::RoomAbandoned { .. } => "room-abandoned",
            Self::LobbyUpdate { .. } => "lobby-update",
        }
    }

    /// Build the notification for `channel`
    ///
    /// # Errors
    ///
    /// Fails only if the payload cannot be encoded as JSON.
    pub fn into_notification(self, channel: &str) -> Result<Notification, NotifyError> {
        Ok(Notification {
            channel: channel.to_string(),
            event: self.name().to_string(),
            payload: serde_json::to_value(&self)?,
        })
    }
}

/// Publish and discard any failure, logging it at debug level
pub fn publish_quietly<N: Notifier + ?Sized>(notifier: &N, channel: &str, event: Event) {
    let name = event.name();
    let result = event
        .into_notification(channel)
        .and_then(|notification| notifier.publish(notification));
    if let Err(e) = result {
        tracing::debug!(channel, event = name, error = %e, "notification dropped");
    }
}

/// In-process fan-out over `tokio::sync::broadcast`
///
/// One sender per channel, created on first publish or subscribe. Slow
/// receivers lag and lose the oldest messages rather than blocking publishers.
pub struct BroadcastHub {
    capacity: usize,
    channels: Mutex<FxHashMap<String, broadcast::Sender<Notification>>>,
}

impl BroadcastHub {
    pub const DEFAULT_CAPACITY: usize = 64;

    #[must_use]
    pub fn new(capacity: usize) -> Self {
        Self {
            capacity: capacity.max(1),
            channels: Mutex::new(FxHashMap::default()),
        }
    }

    /// Receive every notification published to `channel` from now on
    ///
    /// # Errors
    ///
    /// Returns [`NotifyError::Unavailable`] if the channel table is poisoned.
    pub fn subscribe(&self, channel: &str) -> Result<broadcast::Receiver<Notification>, NotifyError> {
        let mut channels = self.channels.lock().map_err(|_| NotifyError::Unavailable)?;
        let sender = channels
            .entry(channel.to_string())
            .or_insert_with(|| broadcast::channel(self.capacity).0);
        Ok(sender.subscribe())
    }

    /// Live subscriber count for `channel`
    #[must_use]
    pub fn subscriber_count(&self, channel: &str) -> usize {
        self.channels
            .lock()
            .ok()
            .and_then(|channels| channels.get(channel).map(broadcast::Sender::receiver_count))
            .unwrap_or(0)
    }
}

impl Default for BroadcastHub {
    fn default() -> Self {
        Self::new(Self::DEFAULT_CAPACITY)
    }
}

impl Notifier for BroadcastHub {
    fn publish(&self, notification: Notification) -> Result<(), NotifyError> {
        let channels = self.channels.lock().map_err(|_| NotifyError::Unavailable)?;
        let sender = channels
            .get(&notification.channel)
            .ok_or_else(|| NotifyError::NoSubscribers(notification.channel.clone()))?;
        sender
            .send(notification)
            .map(|_| ())
            .map_err(|e| NotifyError::NoSubscribers(e.0.channel))
    }
}

/// Writes each notification to the tracing log
#[derive(Debug, Default, Clone, Copy)]
pub struct LogNotifier;

impl Notifier for LogNotifier {
    fn publish(&self, notification: Notification) -> Result<(), NotifyError> {
        tracing::info!(
            channel = %notification.channel,
            event = %notification.event,
            payload = %notification.payload,
            "notify"
        );
        Ok(())
    }
}

/// Drops every notification
#[derive(Debug, Default, Clone, Copy)]
pub struct NullNotifier;

impl Notifier for NullNotifier {
    fn publish(&self, _notification: Notification) -> Result<(), NotifyError> {
        Ok(())
    }
}
