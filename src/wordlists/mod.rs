//! Word lists and the game dictionary
//!
//! The dictionary is the fixed, ordered list of target words. It is built once
//! at startup and shared by reference; nothing mutates it afterwards.

mod embedded;
pub mod loader;

pub use embedded::{WORDS, WORDS_COUNT};

use crate::core::Word;
use rustc_hash::FxHashSet;
use std::io;
use std::path::Path;

/// Ordered, immutable set of candidate target words
///
/// Guess validation may accept more words than the dictionary holds (the
/// client's "valid guesses" list); those extra words never become candidates.
#[derive(Debug, Clone)]
pub struct Dictionary {
    words: Vec<Word>,
    valid_guesses: FxHashSet<String>,
}

impl Dictionary {
    /// Build from a list of words, preserving order
    #[must_use]
    pub fn new(words: Vec<Word>) -> Self {
        let valid_guesses = words.iter().map(|w| w.text().to_string()).collect();
        Self {
            words,
            valid_guesses,
        }
    }

    /// The dictionary compiled into the binary
    #[must_use]
    pub fn embedded() -> Self {
        Self::new(loader::words_from_slice(WORDS))
    }

    /// Load a dictionary from a file with one word per line
    ///
    /// # Errors
    ///
    /// Returns an I/O error if the file cannot be read.
    pub fn from_file<P: AsRef<Path>>(path: P) -> io::Result<Self> {
        loader::load_from_file(path).map(Self::new)
    }

    /// Accept additional words as guesses without making them candidates
    #[must_use]
    pub fn with_extra_guesses(mut self, extra: &[Word]) -> Self {
        self.valid_guesses
            .extend(extra.iter().map(|w| w.text().to_string()));
        self
    }

    #[inline]
    #[must_use]
    pub fn words(&self) -> &[Word] {
        &self.words
    }

    #[inline]
    #[must_use]
    pub fn len(&self) -> usize {
        self.words.len()
    }

    #[inline]
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.words.is_empty()
    }

    /// Whether `word` may be submitted as a guess
    #[must_use]
    pub fn is_valid_guess(&self, word: &str) -> bool {
        self.valid_guesses.contains(word)
    }

    /// Pick a uniformly random target word
    pub fn random_target<R: rand::Rng + ?Sized>(&self, rng: &mut R) -> Option<&Word> {
        use rand::seq::IndexedRandom;
        self.words.choose(rng)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn words_count_matches_const() {
        assert_eq!(WORDS.len(), WORDS_COUNT);
    }

    #[test]
    fn embedded_words_are_valid() {
        for &word in WORDS {
            assert_eq!(word.len(), 5, "Word '{word}' is not 5 letters");
            assert!(
                word.chars().all(|c| c.is_ascii_lowercase()),
                "Word '{word}' contains non-lowercase chars"
            );
        }
    }

    #[test]
    fn embedded_dictionary_keeps_every_word() {
        let dictionary = Dictionary::embedded();
        assert_eq!(dictionary.len(), WORDS_COUNT);
        assert!(!dictionary.is_empty());
        assert!(dictionary.is_valid_guess(WORDS[0]));
    }

    #[test]
    fn extra_guesses_are_valid_but_not_candidates() {
        let dictionary = Dictionary::new(loader::words_from_slice(&["crane", "slate"]))
            .with_extra_guesses(&loader::words_from_slice(&["xylyl"]));

        assert!(dictionary.is_valid_guess("xylyl"));
        assert!(dictionary.is_valid_guess("crane"));
        assert!(!dictionary.is_valid_guess("zzzzz"));
        assert_eq!(dictionary.len(), 2);
    }

    #[test]
    fn random_target_comes_from_dictionary() {
        let dictionary = Dictionary::new(loader::words_from_slice(&["crane", "slate"]));
        let target = dictionary.random_target(&mut rand::rng()).unwrap();
        assert!(dictionary.words().contains(target));

        assert!(Dictionary::new(Vec::new())
            .random_target(&mut rand::rng())
            .is_none());
    }
}
