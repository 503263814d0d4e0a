//! Wordle Rooms
//!
//! Backend for a five-letter word game: game-record sync, player statistics,
//! lobby presence, multiplayer rooms and remaining-word analytics.
//!
//! # Quick Start
//!
//! ```rust
//! use wordle_rooms::core::{Feedback, Word};
//! use wordle_rooms::solver::remaining_counts;
//! use wordle_rooms::wordlists::{Dictionary, loader::words_from_slice};
//!
//! let guess = Word::new("sheep").unwrap();
//! let target = Word::new("speed").unwrap();
//! assert_eq!(Feedback::evaluate(&guess, &target).to_string(), "G-GGY");
//!
//! let dictionary = Dictionary::new(words_from_slice(&["crane", "crate", "grate", "slate"]));
//! let counts = remaining_counts(&dictionary, "grate", &["slate", "grate"]).unwrap();
//! assert_eq!(counts, vec![2, 1]);
//! ```

// Core domain types
pub mod core;

// Remaining-word analysis
pub mod solver;

// Word lists
pub mod wordlists;

// Persistence
pub mod storage;

// Realtime fan-out
pub mod notify;

// Multiplayer room lifecycle
pub mod rooms;

// Game records: sync and backfill
pub mod games;

// Presence
pub mod lobby;

// Player statistics
pub mod stats;

pub mod config;
pub mod error;

// Command implementations
pub mod commands;

// Terminal output formatting
pub mod output;

// Interactive TUI interface
pub mod interactive;

pub use error::{Error, Result};
