//! Core domain types for the word game
//!
//! This module contains the fundamental domain types with no storage or I/O.
//! All types here are pure, testable, and have clear mathematical properties.

mod feedback;
mod word;

pub use feedback::{Feedback, TileState};
pub use word::{ALPHABET, WORD_LENGTH, Word, WordError, letter_index};
