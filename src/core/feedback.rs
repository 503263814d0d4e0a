//! Tile feedback evaluation and representation
//!
//! Each guess is scored position by position against the target:
//! - `Correct`: right letter, right position
//! - `Present`: letter occurs elsewhere in the target
//! - `Absent`: letter does not occur (or all its occurrences are used up)
//!
//! The evaluator must agree tile-for-tile with the game client, because the
//! remaining-possibility analytics are compared against what players saw.

use super::word::{ALPHABET, WORD_LENGTH, Word, letter_index};
use serde::{Deserialize, Serialize};
use std::fmt;

/// Classification of a single tile
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum TileState {
    Correct,
    Present,
    Absent,
}

impl TileState {
    /// Correct and present tiles both prove the letter is in the target
    #[inline]
    #[must_use]
    pub const fn is_hit(self) -> bool {
        matches!(self, Self::Correct | Self::Present)
    }

    #[must_use]
    pub const fn emoji(self) -> char {
        match self {
            Self::Correct => '🟩',
            Self::Present => '🟨',
            Self::Absent => '⬜',
        }
    }
}

/// Feedback for one guess: one tile state per position
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Feedback([TileState; WORD_LENGTH]);

impl Feedback {
    /// All tiles correct
    pub const SOLVED: Self = Self([TileState::Correct; WORD_LENGTH]);

    #[must_use]
    pub const fn new(tiles: [TileState; WORD_LENGTH]) -> Self {
        Self(tiles)
    }

    /// Score `guess` against `target`
    ///
    /// # Algorithm
    /// 1. Every tile starts `Absent`
    /// 2. Exact position matches become `Correct`; letters of the target are tallied
    /// 3. Letters consumed by `Correct` tiles are tallied
    /// 4. Left to right, a non-correct tile becomes `Present` while its letter still
    ///    has unconsumed occurrences in the target
    ///
    /// A letter occurring k times in the target is therefore reported as a hit at
    /// most k times, with exact matches taking priority over earlier misplaced copies.
    ///
    /// # Examples
    /// ```
    /// use wordle_rooms::core::{Feedback, TileState::*, Word};
    ///
    /// let guess = Word::new("sheep").unwrap();
    /// let target = Word::new("speed").unwrap();
    /// let feedback = Feedback::evaluate(&guess, &target);
    ///
    /// assert_eq!(feedback.tiles(), &[Correct, Absent, Correct, Correct, Present]);
    /// ```
    #[must_use]
    pub fn evaluate(guess: &Word, target: &Word) -> Self {
        let mut tiles = [TileState::Absent; WORD_LENGTH];
        let mut target_counts = [0u8; ALPHABET];
        let mut consumed = [0u8; ALPHABET];

        // Allow: Index needed to compare guess[i] with target[i] and set tiles[i]
        #[allow(clippy::needless_range_loop)]
        for i in 0..WORD_LENGTH {
            if guess.char_at(i) == target.char_at(i) {
                tiles[i] = TileState::Correct;
            }
            target_counts[letter_index(target.char_at(i))] += 1;
        }

        for (tile, &letter) in tiles.iter().zip(guess.chars()) {
            if *tile == TileState::Correct {
                consumed[letter_index(letter)] += 1;
            }
        }

        for (tile, &letter) in tiles.iter_mut().zip(guess.chars()) {
            if *tile == TileState::Correct {
                continue;
            }
            let idx = letter_index(letter);
            if consumed[idx] < target_counts[idx] {
                *tile = TileState::Present;
                consumed[idx] += 1;
            }
        }

        Self(tiles)
    }

    #[inline]
    #[must_use]
    pub const fn tiles(&self) -> &[TileState; WORD_LENGTH] {
        &self.0
    }

    #[inline]
    #[must_use]
    pub fn is_solved(&self) -> bool {
        *self == Self::SOLVED
    }

    #[must_use]
    pub fn count_correct(&self) -> usize {
        self.0.iter().filter(|&&t| t == TileState::Correct).count()
    }

    #[must_use]
    pub fn count_present(&self) -> usize {
        self.0.iter().filter(|&&t| t == TileState::Present).count()
    }

    /// Parse feedback from a string like "GY-GY" or "🟩🟨⬜🟩🟨"
    ///
    /// Accepts:
    /// - 'G'/'g'/🟩 for correct
    /// - 'Y'/'y'/🟨 for present
    /// - '-'/'_'/⬜ for absent
    ///
    /// # Examples
    /// ```
    /// use wordle_rooms::core::Feedback;
    ///
    /// let p1 = Feedback::parse("GY-GY").unwrap();
    /// let p2 = Feedback::parse("🟩🟨⬜🟩🟨").unwrap();
    /// assert_eq!(p1, p2);
    /// ```
    #[must_use]
    pub fn parse(s: &str) -> Option<Self> {
        let mut tiles = [TileState::Absent; WORD_LENGTH];
        let mut chars = s.chars();

        for tile in &mut tiles {
            *tile = match chars.next()? {
                'G' | 'g' | '🟩' => TileState::Correct,
                'Y' | 'y' | '🟨' => TileState::Present,
                '-' | '_' | '⬜' => TileState::Absent,
                _ => return None,
            };
        }

        if chars.next().is_some() {
            return None;
        }

        Some(Self(tiles))
    }

    /// Render as an emoji string like "🟩🟨⬜🟩🟨"
    #[must_use]
    pub fn to_emoji(self) -> String {
        self.0.iter().map(|t| t.emoji()).collect()
    }
}

impl fmt::Display for Feedback {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for tile in &self.0 {
            let ch = match tile {
                TileState::Correct => 'G',
                TileState::Present => 'Y',
                TileState::Absent => '-',
            };
            write!(f, "{ch}")?;
        }
        Ok(())
    }
}
