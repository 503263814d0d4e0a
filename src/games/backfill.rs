//! Fill in remaining-count traces for stored games that lack one

use crate::error::Result;
use crate::solver::recompute_all;
use crate::storage::{Database, games};
use crate::wordlists::Dictionary;
use serde::Serialize;

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct FilledGame {
    pub game_id: i64,
    pub target_word: String,
    pub remaining_counts: Vec<usize>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct SkippedGame {
    pub game_id: i64,
    pub reason: String,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct BackfillReport {
    pub filled: Vec<FilledGame>,
    pub skipped: Vec<SkippedGame>,
}

impl BackfillReport {
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.filled.is_empty() && self.skipped.is_empty()
    }
}

/// Compute and store traces for every game whose trace is missing
///
/// Traces are computed in parallel; `on_progress(total)` is called once before
/// work starts and `on_done` once per finished game. Rows that already have a
/// trace are never rewritten. Games with malformed words are skipped.
///
/// # Errors
///
/// Store errors roll back every write of this run.
pub fn backfill_remaining_counts<P, F>(
    db: &Database,
    dictionary: &Dictionary,
    on_progress: P,
    on_done: F,
) -> Result<BackfillReport>
where
    P: FnOnce(usize),
    F: Fn() + Sync,
{
    let pending = games::games_missing_counts(db.connection())?;
    on_progress(pending.len());
    if pending.is_empty() {
        return Ok(BackfillReport::default());
    }

    let results = recompute_all(dictionary, &pending, on_done);

    let mut report = BackfillReport::default();
    let tx = db.transaction()?;
    for result in results {
        match result.counts {
            Ok(counts) => {
                if games::store_remaining_counts(&tx, result.game_id, &counts)? {
                    report.filled.push(FilledGame {
                        game_id: result.game_id,
                        target_word: result.target_word,
                        remaining_counts: counts,
                    });
                }
            }
            Err(e) => {
                tracing::warn!(game_id = result.game_id, error = %e, "skipping game");
                report.skipped.push(SkippedGame {
                    game_id: result.game_id,
                    reason: e.to_string(),
                });
            }
        }
    }
    tx.commit()?;

    tracing::info!(
        filled = report.filled.len(),
        skipped = report.skipped.len(),
        "backfill complete"
    );
    Ok(report)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::games::{GameRecord, Outcome, store_games};
    use crate::storage::games::load_game;
    use crate::wordlists::loader::words_from_slice;
    use chrono::Utc;

    fn game(id: &str, target: &str, guesses: &[&str], counts: Option<Vec<usize>>) -> GameRecord {
        GameRecord {
            client_game_id: id.to_string(),
            device_id: "dev".to_string(),
            username: None,
            start_time: Utc::now(),
            end_time: Utc::now(),
            target_word: target.to_string(),
            outcome: Outcome::Win,
            guesses_count: guesses.len() as u32,
            guesses: guesses.iter().map(ToString::to_string).collect(),
            remaining_counts: counts,
        }
    }

    #[test]
    fn fills_only_missing_traces() {
        let db = Database::open_in_memory().unwrap();
        let dictionary = Dictionary::new(words_from_slice(&["crane", "crate", "grate", "slate"]));
        store_games(
            &db,
            &[
                game("new", "grate", &["slate", "grate"], None),
                game("done", "crane", &["slate", "crane"], Some(vec![99, 1])),
                game("junk", "crane", &["xx"], None),
            ],
        )
        .unwrap();

        let mut total = 0;
        let report = backfill_remaining_counts(&db, &dictionary, |n| total = n, || {}).unwrap();

        assert_eq!(total, 2);
        assert_eq!(report.filled.len(), 1);
        assert_eq!(report.filled[0].remaining_counts, vec![2, 1]);
        assert_eq!(report.skipped.len(), 1);

        let done = load_game(db.connection(), "done").unwrap().unwrap();
        assert_eq!(done.remaining_counts, Some(vec![99, 1]));
        let junk = load_game(db.connection(), "junk").unwrap().unwrap();
        assert_eq!(junk.remaining_counts, None);
    }

    #[test]
    fn nothing_to_do() {
        let db = Database::open_in_memory().unwrap();
        let dictionary = Dictionary::new(words_from_slice(&["crane"]));
        let report = backfill_remaining_counts(&db, &dictionary, |_| {}, || {}).unwrap();
        assert!(report.is_empty());
    }
}
