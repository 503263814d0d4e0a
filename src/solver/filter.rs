//! Candidate filtering
//!
//! Narrows the dictionary to the words still consistent with every piece of
//! feedback observed so far. The rules mirror the game client's counter:
//!
//! - each guess gives a lower bound on every guessed letter (its correct and
//!   present tiles),
//! - an absent tile for a letter turns that lower bound into an exact count,
//! - correct tiles pin their position, present tiles exclude theirs.

use crate::core::{ALPHABET, Feedback, TileState, WORD_LENGTH, Word, letter_index};
use crate::wordlists::Dictionary;
use serde::{Deserialize, Serialize};

/// One guess together with the feedback it received
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct GuessEntry {
    pub guess: Word,
    pub feedback: Feedback,
}

impl GuessEntry {
    #[must_use]
    pub const fn new(guess: Word, feedback: Feedback) -> Self {
        Self { guess, feedback }
    }

    /// Score `guess` against `target` and pair the two
    #[must_use]
    pub fn scored(guess: Word, target: &Word) -> Self {
        let feedback = Feedback::evaluate(&guess, target);
        Self { guess, feedback }
    }
}

/// Per-letter bound derived from a single guess
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
struct LetterBound {
    letter: u8,
    min: u8,
    exact: bool,
}

/// Constraints implied by one [`GuessEntry`], precomputed for a dictionary scan
#[derive(Debug, Clone)]
pub struct LetterConstraints {
    guess: [u8; WORD_LENGTH],
    tiles: [TileState; WORD_LENGTH],
    bounds: Vec<LetterBound>,
}

impl LetterConstraints {
    #[must_use]
    pub fn from_entry(entry: &GuessEntry) -> Self {
        let guess = *entry.guess.chars();
        let tiles = *entry.feedback.tiles();

        let mut min_counts = [0u8; ALPHABET];
        let mut has_absent = [false; ALPHABET];
        for (&letter, tile) in guess.iter().zip(&tiles) {
            let idx = letter_index(letter);
            if tile.is_hit() {
                min_counts[idx] += 1;
            } else {
                has_absent[idx] = true;
            }
        }

        let mut bounds: Vec<LetterBound> = Vec::with_capacity(WORD_LENGTH);
        for &letter in &guess {
            if bounds.iter().any(|b| b.letter == letter) {
                continue;
            }
            let idx = letter_index(letter);
            bounds.push(LetterBound {
                letter,
                min: min_counts[idx],
                exact: has_absent[idx],
            });
        }

        Self {
            guess,
            tiles,
            bounds,
        }
    }

    /// Whether `word` could still be the target given this guess's feedback
    #[must_use]
    pub fn admits(&self, word: &Word) -> bool {
        for bound in &self.bounds {
            let count = word.count_of(bound.letter);
            if count < bound.min || (bound.exact && count > bound.min) {
                return false;
            }
        }

        self.guess
            .iter()
            .zip(&self.tiles)
            .zip(word.chars())
            .all(|((&guessed, tile), &actual)| match tile {
                TileState::Correct => actual == guessed,
                TileState::Present => actual != guessed,
                TileState::Absent => true,
            })
    }
}

/// Dictionary-backed candidate filter
#[derive(Debug, Clone, Copy)]
pub struct CandidateFilter<'a> {
    words: &'a [Word],
}

impl<'a> CandidateFilter<'a> {
    #[must_use]
    pub fn new(dictionary: &'a Dictionary) -> Self {
        Self {
            words: dictionary.words(),
        }
    }

    /// Filter over an arbitrary word slice instead of a [`Dictionary`]
    #[must_use]
    pub const fn over(words: &'a [Word]) -> Self {
        Self { words }
    }

    /// All words consistent with every entry of `history`
    ///
    /// An empty history returns the whole word list in order.
    #[must_use]
    pub fn candidates(&self, history: &[GuessEntry]) -> Vec<&'a Word> {
        let constraints: Vec<LetterConstraints> =
            history.iter().map(LetterConstraints::from_entry).collect();

        self.words
            .iter()
            .filter(|word| constraints.iter().all(|c| c.admits(word)))
            .collect()
    }

    /// Number of words consistent with `history`
    #[must_use]
    pub fn count(&self, history: &[GuessEntry]) -> usize {
        let constraints: Vec<LetterConstraints> =
            history.iter().map(LetterConstraints::from_entry).collect();

        self.words
            .iter()
            .filter(|word| constraints.iter().all(|c| c.admits(word)))
            .count()
    }

    /// Apply one more entry to an already-filtered candidate list
    ///
    /// Entries are conjunctive, so narrowing the previous survivors gives the
    /// same set as re-filtering the whole dictionary with the longer history.
    #[must_use]
    pub fn narrow(candidates: &[&'a Word], entry: &GuessEntry) -> Vec<&'a Word> {
        let constraints = LetterConstraints::from_entry(entry);
        candidates
            .iter()
            .copied()
            .filter(|word| constraints.admits(word))
            .collect()
    }
}
