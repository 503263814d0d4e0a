//! TUI application state and logic

use crate::core::{Feedback, WORD_LENGTH, Word};
use crate::games::{GameRecord, Outcome, store_games};
use crate::solver::PossibilityTracker;
use crate::storage::Database;
use crate::wordlists::Dictionary;
use anyhow::{Context, Result};
use chrono::{DateTime, Utc};
use crossterm::{
    event::{self, DisableMouseCapture, EnableMouseCapture, Event, KeyCode, KeyEventKind, KeyModifiers},
    execute,
    terminal::{EnterAlternateScreen, LeaveAlternateScreen, disable_raw_mode, enable_raw_mode},
};
use ratatui::{Terminal, backend::CrosstermBackend};
use std::io;
use uuid::Uuid;

pub const MAX_ATTEMPTS: usize = 6;

/// Application state
pub struct App<'a> {
    pub dictionary: &'a Dictionary,
    pub tracker: PossibilityTracker<'a>,
    pub phase: Phase,
    pub input_buffer: String,
    pub messages: Vec<Message>,
    pub stats: Statistics,
    pub should_quit: bool,
    pub username: Option<String>,
    pub device_id: String,
    /// Games finished this session, in order
    pub completed: Vec<GameRecord>,
    started_at: DateTime<Utc>,
    db: Option<&'a Database>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Phase {
    Guessing,
    Won,
    Lost,
}

#[derive(Debug, Clone)]
pub struct Message {
    pub text: String,
    pub style: MessageStyle,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MessageStyle {
    Info,
    Success,
    Error,
}

#[derive(Debug, Default, Clone)]
pub struct Statistics {
    pub total_games: usize,
    pub games_won: usize,
    pub guess_distribution: [usize; MAX_ATTEMPTS + 1],
}

impl<'a> App<'a> {
    /// Start a session with a random target
    ///
    /// # Errors
    ///
    /// Fails if the dictionary is empty.
    pub fn new(dictionary: &'a Dictionary, db: Option<&'a Database>) -> Result<Self> {
        let target = random_target(dictionary)?;
        Ok(Self::with_target(dictionary, target, db))
    }

    #[must_use]
    pub fn with_target(dictionary: &'a Dictionary, target: Word, db: Option<&'a Database>) -> Self {
        Self {
            dictionary,
            tracker: PossibilityTracker::new(dictionary, target),
            phase: Phase::Guessing,
            input_buffer: String::new(),
            messages: vec![Message {
                text: format!(
                    "Guess the {WORD_LENGTH}-letter word in {MAX_ATTEMPTS} tries. Esc quits."
                ),
                style: MessageStyle::Info,
            }],
            stats: Statistics::default(),
            should_quit: false,
            username: None,
            device_id: "terminal".to_string(),
            completed: Vec::new(),
            started_at: Utc::now(),
            db,
        }
    }

    #[must_use]
    pub fn with_player(mut self, username: Option<String>, device_id: String) -> Self {
        self.username = username;
        self.device_id = device_id;
        self
    }

    #[must_use]
    pub fn attempts_left(&self) -> usize {
        MAX_ATTEMPTS.saturating_sub(self.tracker.history().len())
    }

    #[must_use]
    pub fn candidates_count(&self) -> usize {
        self.tracker.candidates().len()
    }

    pub fn handle_key(&mut self, code: KeyCode, modifiers: KeyModifiers) {
        if code == KeyCode::Char('c') && modifiers.contains(KeyModifiers::CONTROL) {
            self.should_quit = true;
            return;
        }

        match self.phase {
            Phase::Won | Phase::Lost => match code {
                KeyCode::Char('q') | KeyCode::Esc => self.should_quit = true,
                KeyCode::Char('n') => self.new_game(),
                _ => {}
            },
            Phase::Guessing => match code {
                KeyCode::Esc => self.should_quit = true,
                KeyCode::Char(c) if c.is_ascii_alphabetic() => {
                    if self.input_buffer.len() < WORD_LENGTH {
                        self.input_buffer.push(c.to_ascii_lowercase());
                    }
                }
                KeyCode::Backspace => {
                    self.input_buffer.pop();
                }
                KeyCode::Enter => self.submit_guess(),
                _ => {}
            },
        }
    }

    pub fn submit_guess(&mut self) {
        let input = std::mem::take(&mut self.input_buffer);
        if input.len() != WORD_LENGTH {
            self.add_message(&format!("Guess must be {WORD_LENGTH} letters!"), MessageStyle::Error);
            self.input_buffer = input;
            return;
        }
        if !self.dictionary.is_valid_guess(&input) {
            self.add_message(
                &format!("'{}' is not in the word list!", input.to_uppercase()),
                MessageStyle::Error,
            );
            self.input_buffer = input;
            return;
        }
        let Ok(guess) = Word::new(&input) else {
            self.add_message("Invalid word format!", MessageStyle::Error);
            return;
        };

        let tracked = self.tracker.push(guess);
        if tracked.feedback.is_solved() {
            self.finish(Outcome::Win);
        } else if self.attempts_left() == 0 {
            self.finish(Outcome::Loss);
        } else {
            self.add_message(
                &format!("{} possible words remain", tracked.remaining),
                MessageStyle::Info,
            );
        }
    }

    fn finish(&mut self, outcome: Outcome) {
        let guesses = self.tracker.history().len();
        self.stats.total_games += 1;
        match outcome {
            Outcome::Win => {
                self.phase = Phase::Won;
                self.stats.games_won += 1;
                self.stats.guess_distribution[guesses.min(MAX_ATTEMPTS)] += 1;
                let celebration = match guesses {
                    1 => "🎯 HOLE IN ONE! Extraordinary! 🌟",
                    2 => "🔥 MAGNIFICENT! Two guesses! 🔥",
                    3 => "✨ SPLENDID! Three guesses! ✨",
                    4 => "👏 GREAT JOB! Four guesses! 👏",
                    5 => "🎉 NICE WORK! Five guesses! 🎉",
                    _ => "😅 PHEW! Got it in six! 😅",
                };
                self.add_message(celebration, MessageStyle::Success);
            }
            Outcome::Loss => {
                self.phase = Phase::Lost;
                let target = self.tracker.target().text().to_uppercase();
                self.add_message(&format!("Out of guesses. The word was {target}."), MessageStyle::Error);
            }
        }

        let record = self.record(outcome);
        if let Some(db) = self.db {
            match store_games(db, std::slice::from_ref(&record)) {
                Ok(()) => self.add_message("Game saved.", MessageStyle::Info),
                Err(e) => self.add_message(&format!("Could not save game: {e}"), MessageStyle::Error),
            }
        }
        self.completed.push(record);
        self.add_message("Press 'n' for new game or 'q' to quit.", MessageStyle::Info);
    }

    fn record(&self, outcome: Outcome) -> GameRecord {
        let guesses: Vec<String> = self
            .tracker
            .history()
            .iter()
            .map(|entry| entry.guess.text().to_string())
            .collect();
        GameRecord {
            client_game_id: Uuid::new_v4().to_string(),
            device_id: self.device_id.clone(),
            username: self.username.clone(),
            start_time: self.started_at,
            end_time: Utc::now(),
            target_word: self.tracker.target().text().to_string(),
            outcome,
            guesses_count: guesses.len() as u32,
            guesses,
            remaining_counts: Some(self.tracker.remaining_counts().to_vec()),
        }
    }

    pub fn new_game(&mut self) {
        match random_target(self.dictionary) {
            Ok(target) => self.restart(target),
            Err(e) => self.add_message(&e.to_string(), MessageStyle::Error),
        }
    }

    pub fn restart(&mut self, target: Word) {
        self.tracker = PossibilityTracker::new(self.dictionary, target);
        self.phase = Phase::Guessing;
        self.input_buffer.clear();
        self.messages.clear();
        self.started_at = Utc::now();
        self.add_message("New game started!", MessageStyle::Info);
    }

    pub fn add_message(&mut self, text: &str, style: MessageStyle) {
        self.messages.push(Message {
            text: text.to_string(),
            style,
        });

        // Keep only last 5 messages
        if self.messages.len() > 5 {
            self.messages.remove(0);
        }
    }

    /// Feedback rows played so far, for rendering
    #[must_use]
    pub fn board(&self) -> Vec<(String, Feedback, usize)> {
        self.tracker
            .history()
            .iter()
            .zip(self.tracker.remaining_counts())
            .map(|(entry, remaining)| (entry.guess.text().to_string(), entry.feedback, *remaining))
            .collect()
    }
}

fn random_target(dictionary: &Dictionary) -> Result<Word> {
    dictionary
        .random_target(&mut rand::rng())
        .cloned()
        .context("dictionary is empty")
}

/// Run the TUI application
///
/// # Errors
///
/// Returns an error if terminal setup/cleanup fails or if there's an I/O error
/// during rendering or event handling.
pub fn run_tui(app: App) -> Result<()> {
    // Setup terminal
    enable_raw_mode()?;
    let mut stdout = io::stdout();
    execute!(stdout, EnterAlternateScreen, EnableMouseCapture)?;
    let backend = CrosstermBackend::new(stdout);
    let mut terminal = Terminal::new(backend)?;

    // Run app
    let res = run_app(&mut terminal, app);

    // Restore terminal
    disable_raw_mode()?;
    execute!(
        terminal.backend_mut(),
        LeaveAlternateScreen,
        DisableMouseCapture
    )?;
    terminal.show_cursor()?;

    res
}

fn run_app<B: ratatui::backend::Backend>(terminal: &mut Terminal<B>, mut app: App) -> Result<()> {
    loop {
        terminal.draw(|f| super::rendering::ui(f, &app))?;

        if let Event::Key(key) = event::read()? {
            // Only process key press events (fixes Windows double-input bug)
            if key.kind == KeyEventKind::Press {
                app.handle_key(key.code, key.modifiers);
            }
        }

        if app.should_quit {
            break;
        }
    }

    Ok(())
}
