//! Command implementations

pub mod backfill;
pub mod records;
pub mod trace;

pub use backfill::run_backfill;
pub use records::{load_games_file, parse_games};
pub use trace::{GameTrace, TraceStep, trace_game};
