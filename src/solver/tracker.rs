//! Possibility tracking across one game
//!
//! Scores each guess against the known target, accumulates the history and
//! records how many dictionary words remain after every guess. The resulting
//! trace is informational; it never affects whether a guess is accepted.

use super::filter::{CandidateFilter, GuessEntry};
use crate::core::{Feedback, Word, WordError};
use crate::wordlists::Dictionary;

/// Outcome of pushing a single guess
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TrackedGuess {
    pub feedback: Feedback,
    pub remaining: usize,
}

/// Incremental remaining-candidate tracker for one game
pub struct PossibilityTracker<'a> {
    target: Word,
    history: Vec<GuessEntry>,
    candidates: Vec<&'a Word>,
    remaining_counts: Vec<usize>,
}

impl<'a> PossibilityTracker<'a> {
    #[must_use]
    pub fn new(dictionary: &'a Dictionary, target: Word) -> Self {
        Self::over(dictionary.words(), target)
    }

    /// Track against an arbitrary word slice instead of a [`Dictionary`]
    #[must_use]
    pub fn over(words: &'a [Word], target: Word) -> Self {
        Self {
            target,
            history: Vec::new(),
            candidates: CandidateFilter::over(words).candidates(&[]),
            remaining_counts: Vec::new(),
        }
    }

    /// Score `guess`, narrow the candidates and record the remaining count
    pub fn push(&mut self, guess: Word) -> TrackedGuess {
        let entry = GuessEntry::scored(guess, &self.target);
        self.candidates = CandidateFilter::narrow(&self.candidates, &entry);

        let tracked = TrackedGuess {
            feedback: entry.feedback,
            remaining: self.candidates.len(),
        };
        self.history.push(entry);
        self.remaining_counts.push(tracked.remaining);
        tracked
    }

    #[must_use]
    pub fn target(&self) -> &Word {
        &self.target
    }

    #[must_use]
    pub fn history(&self) -> &[GuessEntry] {
        &self.history
    }

    /// Words still consistent with every guess so far
    #[must_use]
    pub fn candidates(&self) -> &[&'a Word] {
        &self.candidates
    }

    /// Remaining count after each guess, one entry per guess
    #[must_use]
    pub fn remaining_counts(&self) -> &[usize] {
        &self.remaining_counts
    }

    #[must_use]
    pub fn is_solved(&self) -> bool {
        self.history.last().is_some_and(|e| e.feedback.is_solved())
    }

    #[must_use]
    pub fn into_remaining_counts(self) -> Vec<usize> {
        self.remaining_counts
    }
}

/// Compute the remaining-count trace for a whole game
///
/// # Errors
///
/// Returns `WordError` if the target or any guess is not a valid word.
///
/// # Examples
/// ```
/// use wordle_rooms::solver::remaining_counts;
/// use wordle_rooms::wordlists::{loader::words_from_slice, Dictionary};
///
/// let dictionary = Dictionary::new(words_from_slice(&["crane", "crate", "grate", "slate"]));
/// let counts = remaining_counts(&dictionary, "grate", &["slate", "grate"]).unwrap();
/// assert_eq!(counts, vec![2, 1]);
/// ```
pub fn remaining_counts<S: AsRef<str>>(
    dictionary: &Dictionary,
    target: &str,
    guesses: &[S],
) -> Result<Vec<usize>, WordError> {
    let target = Word::new(target)?;
    let guesses = guesses
        .iter()
        .map(Word::new)
        .collect::<Result<Vec<_>, _>>()?;

    let mut tracker = PossibilityTracker::new(dictionary, target);
    for guess in guesses {
        tracker.push(guess);
    }
    Ok(tracker.into_remaining_counts())
}
