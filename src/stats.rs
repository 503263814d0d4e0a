//! Aggregate statistics over stored games and completed rooms

use crate::config::Config;
use crate::error::Result;
use crate::games::Outcome;
use crate::rooms::normalize_username;
use crate::storage::Database;
use crate::storage::games::{GameRow, game_rows};
use crate::storage::rooms::{MatchRow, completed_matches};
use rustc_hash::FxHashMap;
use serde::Serialize;
use std::cmp::Ordering;
use std::collections::BTreeMap;

const TOP_N: usize = 5;

/// Minimum sample sizes before a ranking row is shown
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Thresholds {
    pub min_first_word_games: usize,
    pub min_h2h_games: usize,
}

impl From<&Config> for Thresholds {
    fn from(config: &Config) -> Self {
        Self {
            min_first_word_games: config.min_first_word_games,
            min_h2h_games: config.min_h2h_games,
        }
    }
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct Streaks {
    pub current: usize,
    pub best: usize,
}

/// Current and best run of wins, oldest result first
pub fn streaks<I: IntoIterator<Item = bool>>(results: I) -> Streaks {
    let mut streaks = Streaks::default();
    for won in results {
        if won {
            streaks.current += 1;
            streaks.best = streaks.best.max(streaks.current);
        } else {
            streaks.current = 0;
        }
    }
    streaks
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct StarterShare {
    pub word: String,
    pub count: usize,
    pub pct: u32,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct FirstWordScore {
    pub word: String,
    pub uses: usize,
    pub avg_remaining: f64,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct GuessAverage {
    /// 1-based
    pub guess_num: usize,
    pub avg_remaining: f64,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct SoloStats {
    pub total_games: usize,
    pub wins: usize,
    pub win_pct: u32,
    pub current_streak: usize,
    pub best_streak: usize,
    /// Wins keyed by guess count, plus a `loss` bucket
    pub distribution: BTreeMap<String, usize>,
    pub top_starters: Vec<StarterShare>,
    pub best_first_words: Vec<FirstWordScore>,
    pub worst_first_words: Vec<FirstWordScore>,
    pub possibilities_per_guess: Vec<GuessAverage>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct HeadToHead {
    pub opponents: Vec<String>,
    pub wins: usize,
    pub losses: usize,
    pub win_pct: u32,
    pub current_streak: usize,
    pub best_streak: usize,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct MultiplayerStats {
    pub matches: usize,
    pub wins: usize,
    pub losses: usize,
    pub win_pct: u32,
    pub current_streak: usize,
    pub best_streak: usize,
    pub head_to_head: Vec<HeadToHead>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct StatsReport {
    pub username: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub me: Option<SoloStats>,
    pub overall: SoloStats,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub multiplayer: Option<MultiplayerStats>,
}

/// Overall stats, plus solo and multiplayer stats for `username` if given
///
/// # Errors
///
/// Store errors propagate.
pub fn compute(db: &Database, username: Option<&str>, thresholds: Thresholds) -> Result<StatsReport> {
    let conn = db.connection();
    let username = username.and_then(normalize_username);

    let overall = summarize(&game_rows(conn, None)?, thresholds);
    let (me, multiplayer) = match &username {
        Some(user) => (
            Some(summarize(&game_rows(conn, Some(user))?, thresholds)),
            Some(multiplayer(&completed_matches(conn, user)?, thresholds)),
        ),
        None => (None, None),
    };

    Ok(StatsReport {
        username,
        me,
        overall,
        multiplayer,
    })
}

/// Solo statistics over games in end-time order
#[must_use]
pub fn summarize(games: &[GameRow], thresholds: Thresholds) -> SoloStats {
    let total_games = games.len();
    let wins = games.iter().filter(|g| g.outcome == Outcome::Win).count();
    let run = streaks(games.iter().map(|g| g.outcome == Outcome::Win));

    let mut distribution = BTreeMap::new();
    let mut starters: FxHashMap<&str, usize> = FxHashMap::default();
    for game in games {
        let bucket = match game.outcome {
            Outcome::Win => game.guesses_count.to_string(),
            Outcome::Loss => "loss".to_string(),
        };
        *distribution.entry(bucket).or_insert(0) += 1;
        *starters
            .entry(game.first_word.as_deref().unwrap_or("?"))
            .or_insert(0) += 1;
    }

    let mut top_starters: Vec<StarterShare> = starters
        .into_iter()
        .map(|(word, count)| StarterShare {
            word: word.to_string(),
            count,
            pct: percent(count, total_games),
        })
        .collect();
    top_starters.sort_by(|a, b| b.count.cmp(&a.count).then_with(|| a.word.cmp(&b.word)));
    top_starters.truncate(TOP_N);

    let scores = first_word_scores(games, thresholds.min_first_word_games);
    let mut best_first_words = scores.clone();
    best_first_words.sort_by(|a, b| by_average(a, b).then_with(|| a.word.cmp(&b.word)));
    best_first_words.truncate(TOP_N);
    let mut worst_first_words = scores;
    worst_first_words.sort_by(|a, b| by_average(b, a).then_with(|| a.word.cmp(&b.word)));
    worst_first_words.truncate(TOP_N);

    SoloStats {
        total_games,
        wins,
        win_pct: percent(wins, total_games),
        current_streak: run.current,
        best_streak: run.best,
        distribution,
        top_starters,
        best_first_words,
        worst_first_words,
        possibilities_per_guess: possibilities_per_guess(games),
    }
}

/// Average first-guess remaining count per starting word
fn first_word_scores(games: &[GameRow], min_games: usize) -> Vec<FirstWordScore> {
    let mut by_word: FxHashMap<&str, (usize, usize)> = FxHashMap::default();
    for game in games {
        let Some(first_count) = game.remaining_counts.as_ref().and_then(|c| c.first()) else {
            continue;
        };
        let entry = by_word
            .entry(game.first_word.as_deref().unwrap_or("?"))
            .or_insert((0, 0));
        entry.0 += 1;
        entry.1 += first_count;
    }

    by_word
        .into_iter()
        .filter(|(_, (uses, _))| *uses >= min_games.max(1))
        .map(|(word, (uses, sum))| FirstWordScore {
            word: word.to_string(),
            uses,
            avg_remaining: round1(sum as f64 / uses as f64),
        })
        .collect()
}

fn possibilities_per_guess(games: &[GameRow]) -> Vec<GuessAverage> {
    let mut sums: Vec<(usize, usize)> = Vec::new();
    for counts in games.iter().filter_map(|g| g.remaining_counts.as_ref()) {
        if sums.len() < counts.len() {
            sums.resize(counts.len(), (0, 0));
        }
        for (slot, count) in sums.iter_mut().zip(counts) {
            slot.0 += count;
            slot.1 += 1;
        }
    }

    sums.into_iter()
        .enumerate()
        .map(|(i, (sum, n))| GuessAverage {
            guess_num: i + 1,
            avg_remaining: round1(sum as f64 / n as f64),
        })
        .collect()
}

/// Multiplayer record for one player, matches oldest first
#[must_use]
pub fn multiplayer(matches: &[MatchRow], thresholds: Thresholds) -> MultiplayerStats {
    let wins = matches.iter().filter(|m| m.won).count();
    let run = streaks(matches.iter().map(|m| m.won));

    let mut groups: BTreeMap<Vec<String>, Vec<bool>> = BTreeMap::new();
    for m in matches.iter().filter(|m| !m.opponents.is_empty()) {
        let mut key = m.opponents.clone();
        key.sort();
        groups.entry(key).or_default().push(m.won);
    }

    let mut head_to_head: Vec<HeadToHead> = groups
        .into_iter()
        .filter(|(_, results)| results.len() >= thresholds.min_h2h_games)
        .map(|(opponents, results)| {
            let wins = results.iter().filter(|w| **w).count();
            let run = streaks(results.iter().copied());
            HeadToHead {
                opponents,
                wins,
                losses: results.len() - wins,
                win_pct: percent(wins, results.len()),
                current_streak: run.current,
                best_streak: run.best,
            }
        })
        .collect();
    // 1v1 first, then larger groups; most games first within each
    head_to_head.sort_by(|a, b| {
        a.opponents
            .len()
            .cmp(&b.opponents.len())
            .then_with(|| (b.wins + b.losses).cmp(&(a.wins + a.losses)))
    });

    MultiplayerStats {
        matches: matches.len(),
        wins,
        losses: matches.len() - wins,
        win_pct: percent(wins, matches.len()),
        current_streak: run.current,
        best_streak: run.best,
        head_to_head,
    }
}

fn percent(part: usize, whole: usize) -> u32 {
    if whole == 0 {
        0
    } else {
        (part as f64 / whole as f64 * 100.0).round() as u32
    }
}

fn round1(value: f64) -> f64 {
    (value * 10.0).round() / 10.0
}

fn by_average(a: &FirstWordScore, b: &FirstWordScore) -> Ordering {
    a.avg_remaining.total_cmp(&b.avg_remaining)
}

#[cfg(test)]
mod tests {
    use super::*;

    const THRESHOLDS: Thresholds = Thresholds {
        min_first_word_games: 2,
        min_h2h_games: 2,
    };

    fn game(outcome: Outcome, guesses: u32, first: &str, counts: Option<Vec<usize>>) -> GameRow {
        GameRow {
            outcome,
            guesses_count: guesses,
            first_word: Some(first.to_string()),
            remaining_counts: counts,
        }
    }

    fn mp(won: bool, opponents: &[&str]) -> MatchRow {
        MatchRow {
            room_id: String::new(),
            ended_at: None,
            won,
            opponents: opponents.iter().map(ToString::to_string).collect(),
        }
    }

    #[test]
    fn streaks_track_runs() {
        assert_eq!(streaks([]), Streaks { current: 0, best: 0 });
        assert_eq!(
            streaks([true, true, false, true, true, true, false, true]),
            Streaks { current: 1, best: 3 }
        );
        assert_eq!(streaks([false, true, true]), Streaks { current: 2, best: 2 });
    }

    #[test]
    fn distribution_and_starters() {
        let games = [
            game(Outcome::Win, 3, "crane", None),
            game(Outcome::Win, 3, "slate", None),
            game(Outcome::Loss, 6, "crane", None),
            game(Outcome::Win, 4, "crane", None),
        ];
        let stats = summarize(&games, THRESHOLDS);

        assert_eq!(stats.total_games, 4);
        assert_eq!(stats.wins, 3);
        assert_eq!(stats.win_pct, 75);
        assert_eq!(stats.current_streak, 1);
        assert_eq!(stats.best_streak, 2);
        assert_eq!(stats.distribution.get("3"), Some(&2));
        assert_eq!(stats.distribution.get("4"), Some(&1));
        assert_eq!(stats.distribution.get("loss"), Some(&1));
        assert_eq!(stats.distribution.get("6"), None);
        assert_eq!(
            stats.top_starters[0],
            StarterShare {
                word: "crane".into(),
                count: 3,
                pct: 75
            }
        );
    }

    #[test]
    fn first_word_rankings_respect_minimum() {
        let games = [
            game(Outcome::Win, 3, "crane", Some(vec![10, 2, 1])),
            game(Outcome::Win, 3, "crane", Some(vec![15, 3, 1])),
            game(Outcome::Win, 2, "slate", Some(vec![40, 1])),
            game(Outcome::Win, 2, "slate", Some(vec![45, 1])),
            game(Outcome::Win, 2, "audio", Some(vec![99, 1])),
            game(Outcome::Win, 2, "audio", None),
        ];
        let stats = summarize(&games, THRESHOLDS);

        let best: Vec<_> = stats.best_first_words.iter().map(|s| s.word.as_str()).collect();
        assert_eq!(best, ["crane", "slate"]);
        assert!((stats.best_first_words[0].avg_remaining - 12.5).abs() < f64::EPSILON);
        assert_eq!(stats.worst_first_words[0].word, "slate");
        assert_eq!(stats.worst_first_words[0].uses, 2);
    }

    #[test]
    fn possibilities_average_by_guess_number() {
        let games = [
            game(Outcome::Win, 3, "crane", Some(vec![10, 2, 1])),
            game(Outcome::Win, 2, "crane", Some(vec![15, 1])),
            game(Outcome::Loss, 6, "crane", None),
        ];
        let per_guess = summarize(&games, THRESHOLDS).possibilities_per_guess;
        assert_eq!(
            per_guess,
            vec![
                GuessAverage { guess_num: 1, avg_remaining: 12.5 },
                GuessAverage { guess_num: 2, avg_remaining: 1.5 },
                GuessAverage { guess_num: 3, avg_remaining: 1.0 },
            ]
        );
    }

    #[test]
    fn empty_history_is_all_zero() {
        let stats = summarize(&[], THRESHOLDS);
        assert_eq!(stats.win_pct, 0);
        assert!(stats.top_starters.is_empty());
        assert!(stats.possibilities_per_guess.is_empty());
    }

    #[test]
    fn head_to_head_sorting_and_threshold() {
        let matches = [
            mp(true, &["bob", "cat"]),
            mp(false, &["cat", "bob"]),
            mp(true, &["bob", "cat"]),
            mp(true, &["dan"]),
            mp(false, &["dan"]),
            mp(true, &["eve"]),
            mp(true, &["bob"]),
            mp(true, &["bob"]),
        ];
        let stats = multiplayer(&matches, THRESHOLDS);

        assert_eq!(stats.matches, 8);
        assert_eq!(stats.wins, 6);
        assert_eq!(stats.losses, 2);
        assert_eq!(stats.win_pct, 75);
        assert_eq!(stats.current_streak, 3);

        let groups: Vec<Vec<String>> = stats.head_to_head.iter().map(|h| h.opponents.clone()).collect();
        assert_eq!(
            groups,
            vec![
                vec!["bob".to_string()],
                vec!["dan".to_string()],
                vec!["bob".to_string(), "cat".to_string()],
            ]
        );
        let trio = &stats.head_to_head[2];
        assert_eq!((trio.wins, trio.losses, trio.win_pct), (2, 1, 67));
        assert_eq!(trio.best_streak, 1);
    }

    #[test]
    fn compute_reads_the_store() {
        use crate::games::{GameRecord, store_games};
        use chrono::Utc;

        let db = Database::open_in_memory().unwrap();
        let record = GameRecord {
            client_game_id: "g1".into(),
            device_id: "d".into(),
            username: Some("ann".into()),
            start_time: Utc::now(),
            end_time: Utc::now(),
            target_word: "crane".into(),
            outcome: Outcome::Win,
            guesses_count: 2,
            guesses: vec!["slate".into(), "crane".into()],
            remaining_counts: Some(vec![8, 1]),
        };
        store_games(&db, &[record]).unwrap();

        let report = compute(&db, Some("ANN"), THRESHOLDS).unwrap();
        assert_eq!(report.username.as_deref(), Some("ann"));
        assert_eq!(report.me.as_ref().map(|m| m.total_games), Some(1));
        assert_eq!(report.overall.total_games, 1);
        assert_eq!(report.multiplayer.as_ref().map(|m| m.matches), Some(0));

        let anonymous = compute(&db, None, THRESHOLDS).unwrap();
        assert!(anonymous.me.is_none());
    }
}
