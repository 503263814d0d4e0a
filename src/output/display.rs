//! Display functions for command results

use super::formatters::{colored_guess, create_progress_bar, player_status_label, room_status_label};
use crate::commands::GameTrace;
use crate::games::{BackfillReport, SyncReport};
use crate::rooms::{ActionOutcome, RoomView};
use crate::stats::{MultiplayerStats, SoloStats, StatsReport};
use colored::Colorize;

/// Print a replayed game with per-guess remaining counts
pub fn print_trace(trace: &GameTrace) {
    println!("\n{}", "─".repeat(60).cyan());
    println!(
        "Target: {}   ({} words in dictionary)",
        trace.target.to_uppercase().bright_yellow().bold(),
        trace.dictionary_size
    );
    println!("{}", "─".repeat(60).cyan());

    for (i, step) in trace.steps.iter().enumerate() {
        println!(
            "\n{:>2}. {}  {}",
            i + 1,
            colored_guess(&step.guess, step.feedback),
            step.feedback.to_emoji()
        );
        println!(
            "    Possible words: {} → {}",
            step.candidates_before,
            step.candidates_after.to_string().bright_yellow()
        );
    }

    println!();
    if trace.solved {
        println!(
            "{}",
            format!("✅ Solved in {} guesses", trace.steps.len()).green().bold()
        );
    } else {
        println!("{}", "❌ Not solved".red().bold());
    }
}

pub fn print_sync_report(report: &SyncReport) {
    println!(
        "📥 Received {}, accepted {}, rejected {}",
        report.received_count,
        report.accepted_count.to_string().green(),
        report.rejected_count.to_string().red()
    );
    for rejection in &report.rejected {
        println!(
            "   {} {}: {}",
            "✗".red(),
            rejection.client_game_id.as_deref().unwrap_or("<no id>"),
            rejection.reason
        );
    }
}

pub fn print_backfill_report(report: &BackfillReport) {
    if report.is_empty() {
        println!("No rows need backfilling: every game already has a trace.");
        return;
    }
    for game in &report.filled {
        println!(
            "  id={}  {}  counts={:?}",
            game.game_id, game.target_word, game.remaining_counts
        );
    }
    for skipped in &report.skipped {
        println!(
            "  {} id={}  {}",
            "skipped".yellow(),
            skipped.game_id,
            skipped.reason
        );
    }
    println!(
        "\n{}",
        format!(
            "Backfill complete: {} filled, {} skipped",
            report.filled.len(),
            report.skipped.len()
        )
        .green()
        .bold()
    );
}

/// Print solo and multiplayer statistics
pub fn print_stats(report: &StatsReport) {
    if let (Some(user), Some(me)) = (&report.username, &report.me) {
        print_solo(&format!("Stats for {user}"), me);
    }
    print_solo("Overall", &report.overall);
    if let Some(mp) = &report.multiplayer {
        print_multiplayer(mp);
    }
}

fn print_solo(title: &str, stats: &SoloStats) {
    println!("\n{}", "═".repeat(60).cyan());
    println!(" {} ", title.bright_cyan().bold());
    println!("{}", "═".repeat(60).cyan());

    println!("\n📊 {}", "Games:".bright_cyan().bold());
    println!("   Played:          {}", stats.total_games);
    println!(
        "   Won:             {} ({}%)",
        stats.wins,
        stats.win_pct.to_string().bright_yellow().bold()
    );
    println!("   Current streak:  {}", stats.current_streak);
    println!("   Best streak:     {}", stats.best_streak);

    if !stats.distribution.is_empty() {
        println!("\n📈 {}", "Distribution:".bright_cyan().bold());
        let max = stats.distribution.values().copied().max().unwrap_or(0) as f64;
        for (bucket, count) in &stats.distribution {
            let bar = create_progress_bar(*count as f64, max, 30);
            let bar = if bucket == "loss" { bar.red() } else { bar.green() };
            println!("   {bucket:>4}: {bar} {count}");
        }
    }

    if !stats.top_starters.is_empty() {
        println!("\n🚀 {}", "Top starting words:".bright_cyan().bold());
        for starter in &stats.top_starters {
            println!(
                "   {}  {:>4} games ({}%)",
                starter.word.to_uppercase(),
                starter.count,
                starter.pct
            );
        }
    }

    for (label, words) in [
        ("Best first words:", &stats.best_first_words),
        ("Worst first words:", &stats.worst_first_words),
    ] {
        if words.is_empty() {
            continue;
        }
        println!("\n🎯 {}", label.bright_cyan().bold());
        for score in words {
            println!(
                "   {}  {:>6.1} left on average ({} games)",
                score.word.to_uppercase(),
                score.avg_remaining,
                score.uses
            );
        }
    }

    if !stats.possibilities_per_guess.is_empty() {
        println!("\n🔎 {}", "Possibilities per guess:".bright_cyan().bold());
        for avg in &stats.possibilities_per_guess {
            println!("   Guess {}: {:.1}", avg.guess_num, avg.avg_remaining);
        }
    }
}

fn print_multiplayer(stats: &MultiplayerStats) {
    println!("\n{}", "═".repeat(60).cyan());
    println!(" {} ", "Multiplayer".bright_cyan().bold());
    println!("{}", "═".repeat(60).cyan());
    println!(
        "\n   Matches: {}   Wins: {}   Losses: {}   Win%: {}",
        stats.matches,
        stats.wins.to_string().green(),
        stats.losses.to_string().red(),
        stats.win_pct
    );
    println!(
        "   Current streak: {}   Best streak: {}",
        stats.current_streak, stats.best_streak
    );

    if !stats.head_to_head.is_empty() {
        println!("\n⚔️  {}", "Head to head:".bright_cyan().bold());
        for h2h in &stats.head_to_head {
            println!(
                "   vs {:<24} {}-{} ({}%)  streak {} / best {}",
                h2h.opponents.join(", "),
                h2h.wins,
                h2h.losses,
                h2h.win_pct,
                h2h.current_streak,
                h2h.best_streak
            );
        }
    }
}

/// Print a room and its players
pub fn print_room(view: &RoomView) {
    let room = &view.room;
    println!(
        "\nRoom {} [{}]",
        room.id.to_string().bright_yellow(),
        room_status_label(room.status)
    );
    println!("   Host:     {}", room.host_username);
    if let Some(target) = &room.target_word {
        println!("   Target:   {}", target.to_uppercase());
    }
    println!("   Created:  {}", room.created_at.to_rfc3339());
    if let Some(started) = room.started_at {
        println!("   Started:  {}", started.to_rfc3339());
    }
    if let Some(ended) = room.ended_at {
        println!("   Ended:    {}", ended.to_rfc3339());
    }

    println!("\n   Players:");
    for player in &view.players {
        let guesses = player
            .guesses_count
            .map(|n| format!(" in {n}"))
            .unwrap_or_default();
        println!(
            "   - {:<16} {:<7} {}{}",
            player.username,
            player.role.as_str(),
            player_status_label(player.status),
            guesses
        );
    }
}

pub fn print_action_outcome(action: &str, outcome: ActionOutcome) {
    if outcome.already_won {
        println!("{} {}", "⚠".yellow(), "Room already has a winner; nothing changed".yellow());
    } else {
        println!("{} {action}", "✓".green());
    }
}

/// Print a titled list of names
pub fn print_names(title: &str, names: &[String]) {
    println!("{} ({})", title.bright_cyan().bold(), names.len());
    for name in names {
        println!("   {name}");
    }
}
