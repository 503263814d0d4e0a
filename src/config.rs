//! Runtime configuration
//!
//! The CLI fills a [`Config`] from flags and environment variables; library
//! code and tests use [`Config::default`].

use crate::error::{Error, Result};
use crate::wordlists::{Dictionary, loader};
use directories::ProjectDirs;
use std::path::PathBuf;
use std::time::Duration;

/// Players seen within this window are reported as online
pub const DEFAULT_PRESENCE_WINDOW: Duration = Duration::from_secs(15);

/// Games a starting word needs before it is ranked as a best/worst first word
pub const DEFAULT_MIN_FIRST_WORD_GAMES: usize = 3;

/// Matches against one opponent group before it appears in head-to-head stats
pub const DEFAULT_MIN_H2H_GAMES: usize = 3;

/// Largest batch accepted by the game-record sink
pub const MAX_SYNC_BATCH: usize = 100;

/// Where the dictionary comes from
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum WordlistSource {
    Embedded,
    File(PathBuf),
}

impl WordlistSource {
    /// `"embedded"` selects the built-in list, anything else is a path
    #[must_use]
    pub fn from_arg(arg: &str) -> Self {
        match arg {
            "embedded" | "" => Self::Embedded,
            path => Self::File(PathBuf::from(path)),
        }
    }
}

#[derive(Debug, Clone)]
pub struct Config {
    pub db_path: Option<PathBuf>,
    pub wordlist: WordlistSource,
    pub valid_guesses: Option<PathBuf>,
    pub presence_window: Duration,
    pub min_first_word_games: usize,
    pub min_h2h_games: usize,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            db_path: None,
            wordlist: WordlistSource::Embedded,
            valid_guesses: None,
            presence_window: DEFAULT_PRESENCE_WINDOW,
            min_first_word_games: DEFAULT_MIN_FIRST_WORD_GAMES,
            min_h2h_games: DEFAULT_MIN_H2H_GAMES,
        }
    }
}

impl Config {
    /// Database location: explicit path, else the OS data directory
    ///
    /// - Linux: `$XDG_DATA_HOME/wordle_rooms/wordle.db`
    /// - macOS: `~/Library/Application Support/wordle_rooms/wordle.db`
    ///
    /// # Errors
    ///
    /// Returns [`Error::NoDataDirectory`] when no path was given and the OS
    /// data directory cannot be determined.
    pub fn resolve_db_path(&self) -> Result<PathBuf> {
        if let Some(path) = &self.db_path {
            return Ok(path.clone());
        }
        ProjectDirs::from("", "", "wordle_rooms")
            .map(|dirs| dirs.data_dir().join("wordle.db"))
            .ok_or(Error::NoDataDirectory)
    }

    /// Build the process dictionary once, merging any extra valid guesses
    ///
    /// # Errors
    ///
    /// Returns an I/O error for unreadable lists and a validation error when
    /// the resulting dictionary is empty.
    pub fn load_dictionary(&self) -> Result<Dictionary> {
        let dictionary = match &self.wordlist {
            WordlistSource::Embedded => Dictionary::embedded(),
            WordlistSource::File(path) => Dictionary::from_file(path)?,
        };
        if dictionary.is_empty() {
            return Err(Error::validation("dictionary contains no 5-letter words"));
        }

        match &self.valid_guesses {
            Some(path) => Ok(dictionary.with_extra_guesses(&loader::load_from_file(path)?)),
            None => Ok(dictionary),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults() {
        let config = Config::default();
        assert_eq!(config.presence_window, Duration::from_secs(15));
        assert_eq!(config.min_first_word_games, 3);
        assert_eq!(config.min_h2h_games, 3);
        assert_eq!(config.wordlist, WordlistSource::Embedded);
    }

    #[test]
    fn explicit_db_path_wins() {
        let config = Config {
            db_path: Some(PathBuf::from("/tmp/x.db")),
            ..Config::default()
        };
        assert_eq!(config.resolve_db_path().unwrap(), PathBuf::from("/tmp/x.db"));
    }

    #[test]
    fn embedded_dictionary_loads() {
        let dictionary = Config::default().load_dictionary().unwrap();
        assert!(!dictionary.is_empty());
    }

    #[test]
    fn missing_wordlist_file_errors() {
        let config = Config {
            wordlist: WordlistSource::File(PathBuf::from("/definitely/not/here.txt")),
            ..Config::default()
        };
        assert!(matches!(config.load_dictionary(), Err(Error::Io(_))));
    }

    #[test]
    fn wordlist_arg_parsing() {
        assert_eq!(WordlistSource::from_arg("embedded"), WordlistSource::Embedded);
        assert_eq!(
            WordlistSource::from_arg("data/words.txt"),
            WordlistSource::File(PathBuf::from("data/words.txt"))
        );
    }
}
