//! Wordle Rooms - CLI
//!
//! Local front end for the game backend: play in the terminal, sync and
//! backfill game records, inspect stats and drive multiplayer rooms.

use anyhow::{Context, Result};
use clap::{Args, Parser, Subcommand};
use serde::Serialize;
use std::path::PathBuf;
use std::time::Duration;
use tracing_subscriber::EnvFilter;
use wordle_rooms::{
    commands::{load_games_file, run_backfill, trace_game},
    config::{Config, WordlistSource},
    games::{known_users, sync_games},
    interactive::{App, run_tui},
    lobby::{heartbeat, online_players},
    notify::LogNotifier,
    output::{
        print_action_outcome, print_backfill_report, print_names, print_room, print_stats,
        print_sync_report, print_trace,
    },
    rooms::{ActionResponse, RoomAction, RoomController, RoomRequest, normalize_username},
    stats::{self, Thresholds},
    storage::Database,
    wordlists::Dictionary,
};

#[derive(Parser)]
#[command(
    name = "wordle_rooms",
    about = "Word game backend: game records, stats, lobby presence and multiplayer rooms",
    version,
    author
)]
struct Cli {
    #[command(subcommand)]
    command: Option<Commands>,

    /// SQLite database file (default: OS data directory)
    #[arg(long, global = true, env = "WORDLE_DB_PATH")]
    db: Option<PathBuf>,

    /// Wordlist: 'embedded' (default) or path to a file of 5-letter words
    #[arg(short = 'w', long, global = true, env = "WORDLE_WORDLIST", default_value = "embedded")]
    wordlist: String,

    /// Extra words accepted as guesses but never chosen as targets
    #[arg(long, global = true, env = "WORDLE_VALID_GUESSES")]
    valid_guesses: Option<PathBuf>,

    /// Seconds since the last heartbeat during which a player counts as online
    #[arg(long, global = true, env = "WORDLE_PRESENCE_WINDOW_SECS", default_value_t = 15)]
    presence_window_secs: u64,

    /// Games a first word needs before it is ranked
    #[arg(long, global = true, default_value_t = 3)]
    min_first_word_games: usize,

    /// Matches against an opponent group before it shows in head-to-head
    #[arg(long, global = true, default_value_t = 3)]
    min_h2h_games: usize,

    /// Debug-level logging (RUST_LOG overrides)
    #[arg(short, long, global = true)]
    verbose: bool,

    /// Print results as JSON
    #[arg(long, global = true)]
    json: bool,
}

#[derive(Subcommand)]
enum Commands {
    /// Interactive TUI game (default)
    Play {
        /// Save finished games under this player
        #[arg(short, long)]
        user: Option<String>,
    },

    /// Show how many words remained possible after each guess
    Remaining {
        /// The target word
        target: String,

        /// Guesses in the order they were played
        #[arg(required = true)]
        guesses: Vec<String>,
    },

    /// Fill in remaining-word counts for stored games that lack them
    Backfill {
        /// Hide the progress bar
        #[arg(short, long)]
        quiet: bool,
    },

    /// Import game records from a JSON file
    Sync {
        /// File holding an array of games or {"games": [...]}
        file: PathBuf,
    },

    /// Player statistics
    Stats {
        /// Restrict to one player (default: everyone)
        #[arg(short, long)]
        user: Option<String>,
    },

    /// List players with stored games
    Users,

    /// Record a lobby heartbeat for a player
    Heartbeat {
        user: String,
    },

    /// List players seen within the presence window
    Online,

    /// Multiplayer rooms
    #[command(subcommand)]
    Room(RoomCommand),
}

#[derive(Subcommand)]
enum RoomCommand {
    /// Open a room and invite players
    Create {
        #[arg(long)]
        host: String,

        /// Player to invite (repeatable)
        #[arg(long = "invite", required = true)]
        invitees: Vec<String>,
    },

    /// Show a room and its players
    Show { room_id: String },

    /// Accept an invitation
    Accept(PlayerArgs),

    /// Decline an invitation
    Decline(PlayerArgs),

    /// Start the game for everyone who accepted
    Start {
        room_id: String,

        /// Target word (default: random from the dictionary)
        #[arg(long)]
        target: Option<String>,
    },

    /// Claim the win
    Win {
        #[command(flatten)]
        player: PlayerArgs,

        /// Guesses the winner needed
        #[arg(long)]
        guesses: u32,
    },

    /// Abandon the room
    Abandon { room_id: String },

    /// Apply a raw JSON request, e.g. '{"action":"get","room_id":"..."}'
    Request { body: String },
}

#[derive(Args)]
struct PlayerArgs {
    room_id: String,
    user: String,
}

impl Cli {
    fn config(&self) -> Config {
        Config {
            db_path: self.db.clone(),
            wordlist: WordlistSource::from_arg(&self.wordlist),
            valid_guesses: self.valid_guesses.clone(),
            presence_window: Duration::from_secs(self.presence_window_secs),
            min_first_word_games: self.min_first_word_games,
            min_h2h_games: self.min_h2h_games,
        }
    }
}

fn init_tracing(verbose: bool) {
    let default = if verbose { "debug" } else { "info" };
    tracing_subscriber::fmt()
        .with_writer(std::io::stderr)
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| default.into()))
        .init();
}

fn main() -> Result<()> {
    let cli = Cli::parse();
    init_tracing(cli.verbose);

    let config = cli.config();
    let json = cli.json;

    // Default to Play mode if no command given
    let command = cli.command.unwrap_or(Commands::Play { user: None });

    match command {
        Commands::Play { user } => run_play_command(&config, user.as_deref()),
        Commands::Remaining { target, guesses } => {
            run_remaining_command(&config, &target, &guesses, json)
        }
        Commands::Backfill { quiet } => run_backfill_command(&config, quiet || json, json),
        Commands::Sync { file } => run_sync_command(&config, &file, json),
        Commands::Stats { user } => run_stats_command(&config, user.as_deref(), json),
        Commands::Users => {
            let db = open_db(&config)?;
            let users = known_users(&db)?;
            emit(json, &users, |u| print_names("Players", u))
        }
        Commands::Heartbeat { user } => {
            let db = open_db(&config)?;
            let presence = heartbeat(&db, &LogNotifier, &user)?;
            emit(json, &presence, |p| {
                println!("{} seen at {}", p.username, p.last_seen.to_rfc3339());
            })
        }
        Commands::Online => {
            let db = open_db(&config)?;
            let online = online_players(&db, config.presence_window)?;
            emit(json, &online, |o| print_names("Online", o))
        }
        Commands::Room(room) => run_room_command(&config, room, json),
    }
}

fn open_db(config: &Config) -> Result<Database> {
    let path = config.resolve_db_path()?;
    Database::open(&path).with_context(|| format!("opening database {}", path.display()))
}

fn load_dictionary(config: &Config) -> Result<Dictionary> {
    config.load_dictionary().context("loading word list")
}

/// Print `value` as JSON, or hand it to the human-readable printer
fn emit<T: Serialize + ?Sized>(json: bool, value: &T, print: impl FnOnce(&T)) -> Result<()> {
    if json {
        println!("{}", serde_json::to_string_pretty(value)?);
    } else {
        print(value);
    }
    Ok(())
}

fn run_play_command(config: &Config, user: Option<&str>) -> Result<()> {
    let dictionary = load_dictionary(config)?;
    let db = open_db(config)?;
    let username = user.and_then(normalize_username);

    let app = App::new(&dictionary, Some(&db))?.with_player(username, "terminal".to_string());
    run_tui(app)
}

fn run_remaining_command(
    config: &Config,
    target: &str,
    guesses: &[String],
    json: bool,
) -> Result<()> {
    let dictionary = load_dictionary(config)?;
    let trace = trace_game(&dictionary, target, guesses)?;
    emit(json, &trace, print_trace)
}

fn run_backfill_command(config: &Config, quiet: bool, json: bool) -> Result<()> {
    let dictionary = load_dictionary(config)?;
    let db = open_db(config)?;
    let report = run_backfill(&db, &dictionary, quiet)?;
    db.close()?;
    emit(json, &report, print_backfill_report)
}

fn run_sync_command(config: &Config, file: &std::path::Path, json: bool) -> Result<()> {
    let games = load_games_file(file)?;
    let db = open_db(config)?;
    let report = sync_games(&db, &games)?;
    db.close()?;
    emit(json, &report, print_sync_report)
}

fn run_stats_command(config: &Config, user: Option<&str>, json: bool) -> Result<()> {
    let db = open_db(config)?;
    let report = stats::compute(&db, user, Thresholds::from(config))?;
    emit(json, &report, print_stats)
}

fn run_room_command(config: &Config, command: RoomCommand, json: bool) -> Result<()> {
    let request = match command {
        RoomCommand::Create { host, invitees } => RoomRequest {
            action: Some("create".into()),
            username: Some(host),
            invitees,
            ..RoomRequest::default()
        },
        RoomCommand::Show { room_id } => room_request("get", room_id, None),
        RoomCommand::Accept(PlayerArgs { room_id, user }) => {
            room_request("accept", room_id, Some(user))
        }
        RoomCommand::Decline(PlayerArgs { room_id, user }) => {
            room_request("decline", room_id, Some(user))
        }
        RoomCommand::Start { room_id, target } => {
            let target = match target {
                Some(word) => word,
                None => load_dictionary(config)?
                    .random_target(&mut rand::rng())
                    .map(|w| w.text().to_string())
                    .context("dictionary is empty")?,
            };
            RoomRequest {
                target_word: Some(target),
                ..room_request("start", room_id, None)
            }
        }
        RoomCommand::Win { player, guesses } => RoomRequest {
            guesses_count: Some(guesses),
            ..room_request("win", player.room_id, Some(player.user))
        },
        RoomCommand::Abandon { room_id } => room_request("abandon", room_id, None),
        RoomCommand::Request { body } => {
            serde_json::from_str(&body).context("room request must be a JSON object")?
        }
    };

    let action = RoomAction::try_from(request)?;
    let name = action.name();
    let db = open_db(config)?;
    let response = RoomController::new(&db, &LogNotifier).apply(action)?;

    emit(json, &response, |response| match response {
        ActionResponse::Created { room_id } => println!("Created room {room_id}"),
        ActionResponse::Room(view) => print_room(view),
        ActionResponse::Done(outcome) => print_action_outcome(name, *outcome),
    })
}

fn room_request(action: &str, room_id: String, username: Option<String>) -> RoomRequest {
    RoomRequest {
        action: Some(action.into()),
        room_id: Some(room_id),
        username,
        ..RoomRequest::default()
    }
}
