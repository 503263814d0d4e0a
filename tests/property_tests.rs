//! Property-based tests for feedback scoring and candidate narrowing.
//!
//! These tests use proptest to check the solver invariants across many
//! generated words and guess sequences.

use proptest::prelude::*;
use std::sync::LazyLock;
use wordle_rooms::core::{Feedback, TileState, Word};
use wordle_rooms::solver::{CandidateFilter, GuessEntry, PossibilityTracker};
use wordle_rooms::wordlists::Dictionary;

static DICTIONARY: LazyLock<Dictionary> = LazyLock::new(Dictionary::embedded);

// A small alphabet so repeated letters show up often
prop_compose! {
    fn arbitrary_word()(text in "[aelst]{5}") -> Word {
        Word::new(&text).unwrap()
    }
}

prop_compose! {
    fn dictionary_word()(index in 0..DICTIONARY.len()) -> Word {
        DICTIONARY.words()[index].clone()
    }
}

proptest! {
    #[test]
    fn hits_per_letter_match_shared_count(guess in arbitrary_word(), target in arbitrary_word()) {
        let feedback = Feedback::evaluate(&guess, &target);
        for &letter in guess.chars() {
            let hits = guess
                .chars()
                .iter()
                .zip(feedback.tiles())
                .filter(|&(&l, tile)| l == letter && tile.is_hit())
                .count();
            let shared = guess.count_of(letter).min(target.count_of(letter)) as usize;
            prop_assert_eq!(hits, shared);
        }
    }

    #[test]
    fn correct_tiles_match_positions(guess in arbitrary_word(), target in arbitrary_word()) {
        let feedback = Feedback::evaluate(&guess, &target);
        for (i, tile) in feedback.tiles().iter().enumerate() {
            prop_assert_eq!(
                *tile == TileState::Correct,
                guess.char_at(i) == target.char_at(i)
            );
        }
    }

    #[test]
    fn word_scores_solved_against_itself(word in arbitrary_word()) {
        prop_assert!(Feedback::evaluate(&word, &word).is_solved());
    }

    #[test]
    fn target_is_never_filtered_out(
        target in dictionary_word(),
        guesses in prop::collection::vec(dictionary_word(), 1..6),
    ) {
        let history: Vec<GuessEntry> = guesses
            .into_iter()
            .map(|guess| GuessEntry::scored(guess, &target))
            .collect();
        let candidates = CandidateFilter::new(&DICTIONARY).candidates(&history);
        prop_assert!(candidates.contains(&&target));
    }

    #[test]
    fn extra_entry_never_grows_candidates(
        scored in prop::collection::vec((dictionary_word(), dictionary_word()), 0..4),
        guess in dictionary_word(),
        target in dictionary_word(),
    ) {
        // Each entry is scored against its own target, so the history may be
        // inconsistent; the filter must still only shrink.
        let mut history: Vec<GuessEntry> = scored
            .into_iter()
            .map(|(guess, target)| GuessEntry::scored(guess, &target))
            .collect();
        let filter = CandidateFilter::new(&DICTIONARY);
        let before = filter.count(&history);

        history.push(GuessEntry::scored(guess, &target));
        prop_assert!(filter.count(&history) <= before);
    }

    #[test]
    fn remaining_counts_never_grow(
        target in dictionary_word(),
        guesses in prop::collection::vec(dictionary_word(), 1..6),
    ) {
        let mut tracker = PossibilityTracker::new(&DICTIONARY, target);
        for guess in guesses {
            tracker.push(guess);
        }
        let counts = tracker.remaining_counts();
        prop_assert!(counts.iter().all(|&c| c >= 1));
        prop_assert!(counts.windows(2).all(|pair| pair[1] <= pair[0]));
    }

    #[test]
    fn guessing_the_target_leaves_one(
        target in dictionary_word(),
        openers in prop::collection::vec(dictionary_word(), 0..4),
    ) {
        let mut tracker = PossibilityTracker::new(&DICTIONARY, target.clone());
        for guess in openers {
            tracker.push(guess);
        }
        let last = tracker.push(target);
        prop_assert!(last.feedback.is_solved());
        prop_assert_eq!(last.remaining, 1);
    }
}

#[test]
fn repeated_letters_score_like_the_client() {
    let feedback = Feedback::evaluate(&Word::new("sheep").unwrap(), &Word::new("speed").unwrap());
    assert_eq!(feedback.to_string(), "G-GGY");

    let speed_like = CandidateFilter::new(&DICTIONARY)
        .candidates(&[GuessEntry::new(Word::new("sheep").unwrap(), feedback)]);
    assert!(speed_like.iter().any(|w| w.text() == "speed"));
    assert!(speed_like.iter().all(|w| w.count_of(b'e') >= 2 && w.count_of(b'h') == 0));
}
