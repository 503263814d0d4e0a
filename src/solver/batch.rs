//! Batch recomputation of remaining-count traces
//!
//! Games are independent, so traces are computed in parallel with rayon. Each
//! worker only reads the shared dictionary.

use super::tracker::remaining_counts;
use crate::core::WordError;
use crate::wordlists::Dictionary;
use rayon::prelude::*;

/// A stored game whose trace should be (re)computed
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TraceRequest {
    pub game_id: i64,
    pub target_word: String,
    pub guesses: Vec<String>,
}

/// Result of recomputing one game's trace
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TraceResult {
    pub game_id: i64,
    pub target_word: String,
    pub counts: Result<Vec<usize>, WordError>,
}

/// Compute traces for every request, preserving input order
///
/// `on_done` is invoked once per finished game from whichever worker finished
/// it, which makes it suitable for driving a progress bar.
pub fn recompute_all<F>(
    dictionary: &Dictionary,
    requests: &[TraceRequest],
    on_done: F,
) -> Vec<TraceResult>
where
    F: Fn() + Sync,
{
    requests
        .par_iter()
        .map(|request| {
            let counts = remaining_counts(dictionary, &request.target_word, &request.guesses);
            on_done();
            TraceResult {
                game_id: request.game_id,
                target_word: request.target_word.clone(),
                counts,
            }
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::wordlists::loader::words_from_slice;
    use std::sync::atomic::{AtomicUsize, Ordering};

    fn request(game_id: i64, target: &str, guesses: &[&str]) -> TraceRequest {
        TraceRequest {
            game_id,
            target_word: target.to_string(),
            guesses: guesses.iter().map(ToString::to_string).collect(),
        }
    }

    #[test]
    fn recompute_preserves_order_and_reports_progress() {
        let dictionary = Dictionary::new(words_from_slice(&[
            "flush", "blush", "plush", "crane", "crate", "grate", "slate",
        ]));
        let requests = vec![
            request(7, "blush", &["flush", "blush"]),
            request(3, "grate", &["slate", "grate"]),
            request(9, "crate", &["cr@te"]),
        ];
        let done = AtomicUsize::new(0);

        let results = recompute_all(&dictionary, &requests, || {
            done.fetch_add(1, Ordering::Relaxed);
        });

        assert_eq!(done.load(Ordering::Relaxed), 3);
        assert_eq!(
            results.iter().map(|r| r.game_id).collect::<Vec<_>>(),
            [7, 3, 9]
        );
        assert_eq!(results[0].counts, Ok(vec![2, 1]));
        assert_eq!(results[1].counts, Ok(vec![2, 1]));
        assert!(results[2].counts.is_err());
    }
}
