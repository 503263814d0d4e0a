//! Remaining-possibilities trace for one game
//!
//! Replays a guess list against a known target and reports, for every guess,
//! the feedback it earned and how many dictionary words were still possible.

use crate::core::{Feedback, Word, WordError};
use crate::solver::PossibilityTracker;
use crate::wordlists::Dictionary;
use serde::Serialize;

/// Trace of a replayed game
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct GameTrace {
    pub target: String,
    pub dictionary_size: usize,
    pub steps: Vec<TraceStep>,
    pub solved: bool,
}

impl GameTrace {
    /// The remaining-count sequence stored with a game record
    #[must_use]
    pub fn remaining_counts(&self) -> Vec<usize> {
        self.steps.iter().map(|s| s.candidates_after).collect()
    }
}

/// A single guess in the trace
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct TraceStep {
    pub guess: String,
    pub feedback: Feedback,
    pub candidates_before: usize,
    pub candidates_after: usize,
}

/// Replay `guesses` against `target`
///
/// # Errors
///
/// Returns a [`WordError`] if the target or any guess is not a 5-letter word.
pub fn trace_game<S: AsRef<str>>(
    dictionary: &Dictionary,
    target: &str,
    guesses: &[S],
) -> Result<GameTrace, WordError> {
    let target_word = Word::new(target)?;
    let guesses = guesses
        .iter()
        .map(Word::new)
        .collect::<Result<Vec<_>, _>>()?;

    let mut tracker = PossibilityTracker::new(dictionary, target_word);
    let mut steps = Vec::with_capacity(guesses.len());

    for guess in guesses {
        let candidates_before = tracker.candidates().len();
        let text = guess.text().to_string();
        let tracked = tracker.push(guess);
        steps.push(TraceStep {
            guess: text,
            feedback: tracked.feedback,
            candidates_before,
            candidates_after: tracked.remaining,
        });
    }

    Ok(GameTrace {
        target: tracker.target().text().to_string(),
        dictionary_size: dictionary.len(),
        solved: tracker.is_solved(),
        steps,
    })
}
