//! Formatting utilities for terminal output

use crate::core::{Feedback, TileState};
use crate::rooms::{PlayerStatus, RoomStatus};
use colored::{ColoredString, Colorize};

/// Color a guess tile by tile
#[must_use]
pub fn colored_guess(guess: &str, feedback: Feedback) -> String {
    guess
        .chars()
        .zip(feedback.tiles())
        .map(|(ch, tile)| colored_tile(ch, *tile).to_string())
        .collect()
}

fn colored_tile(ch: char, tile: TileState) -> ColoredString {
    let text = format!(" {} ", ch.to_ascii_uppercase());
    match tile {
        TileState::Correct => text.black().on_green().bold(),
        TileState::Present => text.black().on_yellow().bold(),
        TileState::Absent => text.white().on_bright_black(),
    }
}

/// Create a progress bar string
#[must_use]
pub fn create_progress_bar(value: f64, max: f64, width: usize) -> String {
    if max <= 0.0 {
        return "░".repeat(width);
    }
    // Cast is safe: values are clamped to [0, width]
    let filled = ((value / max) * width as f64) as usize;
    let filled = filled.min(width);

    format!("{}{}", "█".repeat(filled), "░".repeat(width - filled))
}

#[must_use]
pub fn room_status_label(status: RoomStatus) -> ColoredString {
    match status {
        RoomStatus::Lobby => status.as_str().cyan(),
        RoomStatus::Active => status.as_str().green().bold(),
        RoomStatus::Complete => status.as_str().bright_blue(),
        RoomStatus::Abandoned => status.as_str().bright_black(),
    }
}

#[must_use]
pub fn player_status_label(status: PlayerStatus) -> ColoredString {
    match status {
        PlayerStatus::Invited => status.as_str().yellow(),
        PlayerStatus::Accepted | PlayerStatus::Playing => status.as_str().green(),
        PlayerStatus::Declined | PlayerStatus::Lost => status.as_str().red(),
        PlayerStatus::Won => status.as_str().bright_green().bold(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn progress_bar_empty() {
        assert_eq!(create_progress_bar(0.0, 100.0, 10), "░░░░░░░░░░");
    }

    #[test]
    fn progress_bar_full() {
        assert_eq!(create_progress_bar(100.0, 100.0, 10), "██████████");
    }

    #[test]
    fn progress_bar_half() {
        assert_eq!(create_progress_bar(50.0, 100.0, 10), "█████░░░░░");
    }

    #[test]
    fn progress_bar_zero_max() {
        assert_eq!(create_progress_bar(3.0, 0.0, 4), "░░░░");
    }

    #[test]
    fn colored_guess_keeps_letters() {
        colored::control::set_override(false);
        let rendered = colored_guess("crane", Feedback::SOLVED);
        assert_eq!(rendered, " C  R  A  N  E ");
    }
}
