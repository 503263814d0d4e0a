//! Interactive TUI for local play

mod app;
mod rendering;

pub use app::{App, MAX_ATTEMPTS, Phase, run_tui};
