//! Multiplayer rooms
//!
//! A room moves `lobby -> active -> complete`, or to `abandoned` from either
//! non-terminal state. The [`RoomController`] is the only writer.

pub mod action;
pub mod controller;
mod model;

pub use action::{RoomAction, RoomRequest};
pub use controller::{ActionOutcome, ActionResponse, RoomController};
pub use model::{Player, PlayerStatus, Role, Room, RoomStatus, RoomView, normalize_username};
