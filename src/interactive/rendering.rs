//! TUI rendering with ratatui
//!
//! Game board on the left, remaining-possibility tracking on the right.

use super::app::{App, MAX_ATTEMPTS, MessageStyle, Phase};
use crate::core::{TileState, WORD_LENGTH};
use ratatui::{
    Frame,
    layout::{Alignment, Constraint, Direction, Layout, Rect},
    style::{Color, Modifier, Style},
    text::{Line, Span},
    widgets::{Block, BorderType, Borders, Gauge, List, ListItem, Paragraph},
};

/// Main UI rendering function
pub fn ui(f: &mut Frame, app: &App) {
    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Length(3), // Header
            Constraint::Min(10),   // Main content
            Constraint::Length(3), // Input area
            Constraint::Length(3), // Status bar
        ])
        .split(f.area());

    render_header(f, chunks[0]);

    let main_chunks = Layout::default()
        .direction(Direction::Horizontal)
        .constraints([
            Constraint::Percentage(55), // Board
            Constraint::Percentage(45), // Possibilities + messages
        ])
        .split(chunks[1]);

    render_board(f, app, main_chunks[0]);
    render_info_panel(f, app, main_chunks[1]);
    render_input(f, app, chunks[2]);
    render_status(f, app, chunks[3]);
}

fn render_header(f: &mut Frame, area: Rect) {
    let header = Paragraph::new("🟩 WORDLE 🟨")
        .style(
            Style::default()
                .fg(Color::Cyan)
                .add_modifier(Modifier::BOLD),
        )
        .alignment(Alignment::Center)
        .block(
            Block::default()
                .borders(Borders::ALL)
                .border_type(BorderType::Rounded)
                .style(Style::default().fg(Color::Cyan)),
        );
    f.render_widget(header, area);
}

fn tile_style(tile: TileState) -> Style {
    let bg = match tile {
        TileState::Correct => Color::Green,
        TileState::Present => Color::Yellow,
        TileState::Absent => Color::DarkGray,
    };
    Style::new().fg(Color::Black).bg(bg).add_modifier(Modifier::BOLD)
}

fn render_board(f: &mut Frame, app: &App, area: Rect) {
    let board = app.board();
    let mut lines: Vec<Line> = Vec::with_capacity(MAX_ATTEMPTS * 2);

    for row in 0..MAX_ATTEMPTS {
        let spans: Vec<Span> = if let Some((guess, feedback, remaining)) = board.get(row) {
            let mut spans: Vec<Span> = guess
                .chars()
                .zip(feedback.tiles())
                .map(|(ch, tile)| {
                    Span::styled(format!(" {} ", ch.to_ascii_uppercase()), tile_style(*tile))
                })
                .collect();
            spans.push(Span::styled(
                format!("  {remaining} left"),
                Style::default().fg(Color::Cyan),
            ));
            spans
        } else if row == board.len() && app.phase == Phase::Guessing {
            let typed: Vec<char> = app.input_buffer.chars().collect();
            (0..WORD_LENGTH)
                .map(|i| {
                    let ch = typed.get(i).map_or('_', char::to_ascii_uppercase);
                    Span::styled(format!(" {ch} "), Style::default().fg(Color::White))
                })
                .collect()
        } else {
            (0..WORD_LENGTH)
                .map(|_| Span::styled(" · ", Style::default().fg(Color::DarkGray)))
                .collect()
        };
        lines.push(Line::from(spans));
        lines.push(Line::from(""));
    }

    let paragraph = Paragraph::new(lines).alignment(Alignment::Center).block(
        Block::default()
            .title(" Board ")
            .borders(Borders::ALL)
            .border_type(BorderType::Rounded),
    );
    f.render_widget(paragraph, area);
}

fn render_info_panel(f: &mut Frame, app: &App, area: Rect) {
    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Length(3),      // Possibility gauge
            Constraint::Percentage(50), // Candidates
            Constraint::Min(5),         // Messages
        ])
        .split(area);

    render_possibilities(f, app, chunks[0]);
    render_candidates(f, app, chunks[1]);
    render_messages(f, app, chunks[2]);
}

fn render_possibilities(f: &mut Frame, app: &App, area: Rect) {
    let total = app.dictionary.len().max(1);
    let remaining = app.candidates_count();
    let eliminated_pct = (100 - remaining * 100 / total) as u16;

    let gauge = Gauge::default()
        .block(
            Block::default()
                .title(" Possible Words ")
                .borders(Borders::ALL)
                .border_type(BorderType::Rounded),
        )
        .gauge_style(Style::default().fg(Color::Cyan))
        .percent(eliminated_pct)
        .label(format!("{remaining}/{total} remain"));

    f.render_widget(gauge, area);
}

fn render_candidates(f: &mut Frame, app: &App, area: Rect) {
    let candidates = app.tracker.candidates();

    let content = if app.phase != Phase::Guessing {
        vec![Line::from(vec![
            Span::raw("Answer: "),
            Span::styled(
                app.tracker.target().text().to_uppercase(),
                Style::default()
                    .fg(Color::Yellow)
                    .add_modifier(Modifier::BOLD),
            ),
        ])]
    } else if app.tracker.history().is_empty() {
        vec![Line::from("Make a guess to start narrowing it down")]
    } else if candidates.len() <= 12 {
        candidates
            .iter()
            .map(|w| Line::from(format!("  {}", w.text().to_uppercase())))
            .collect()
    } else {
        vec![Line::from(format!(
            "{} candidates remaining",
            candidates.len()
        ))]
    };

    let paragraph = Paragraph::new(content).block(
        Block::default()
            .title(" Candidates ")
            .borders(Borders::ALL)
            .style(Style::default().fg(Color::Green)),
    );
    f.render_widget(paragraph, area);
}

fn render_messages(f: &mut Frame, app: &App, area: Rect) {
    let messages: Vec<ListItem> = app
        .messages
        .iter()
        .rev()
        .map(|msg| {
            let style = match msg.style {
                MessageStyle::Info => Style::default().fg(Color::White),
                MessageStyle::Success => Style::default().fg(Color::Green),
                MessageStyle::Error => Style::default().fg(Color::Red),
            };
            ListItem::new(msg.text.clone()).style(style)
        })
        .collect();

    let messages_list =
        List::new(messages).block(Block::default().title(" Messages ").borders(Borders::ALL));
    f.render_widget(messages_list, area);
}

fn render_input(f: &mut Frame, app: &App, area: Rect) {
    let (title, content, color) = match app.phase {
        Phase::Won => (
            " 🎉 CONGRATULATIONS! 🎉 | Press 'n' for new game or 'q' to quit ",
            "",
            Color::Green,
        ),
        Phase::Lost => (
            " Better luck next time | Press 'n' for new game or 'q' to quit ",
            "",
            Color::Red,
        ),
        Phase::Guessing => (
            " Type your guess | Enter to submit, Esc to quit ",
            app.input_buffer.as_str(),
            Color::Yellow,
        ),
    };

    let input = Paragraph::new(content)
        .style(Style::default().fg(color).add_modifier(Modifier::BOLD))
        .block(
            Block::default()
                .title(title)
                .borders(Borders::ALL)
                .border_type(BorderType::Double)
                .style(Style::default().fg(color)),
        );
    f.render_widget(input, area);
}

fn render_status(f: &mut Frame, app: &App, area: Rect) {
    let chunks = Layout::default()
        .direction(Direction::Horizontal)
        .constraints([
            Constraint::Percentage(34),
            Constraint::Percentage(33),
            Constraint::Percentage(33),
        ])
        .split(area);

    let player = app.username.as_deref().unwrap_or("guest");
    let player = Paragraph::new(format!("Player: {player}")).alignment(Alignment::Center);
    f.render_widget(player, chunks[0]);

    let stats_text = format!(
        "Games: {} | Win Rate: {:.0}%",
        app.stats.total_games,
        if app.stats.total_games > 0 {
            app.stats.games_won as f64 / app.stats.total_games as f64 * 100.0
        } else {
            0.0
        }
    );
    f.render_widget(Paragraph::new(stats_text).alignment(Alignment::Center), chunks[1]);

    let attempts = Paragraph::new(format!("Attempts left: {}", app.attempts_left()))
        .alignment(Alignment::Center)
        .style(Style::default().fg(Color::DarkGray));
    f.render_widget(attempts, chunks[2]);
}
