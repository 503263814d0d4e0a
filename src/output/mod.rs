//! Terminal output formatting
//!
//! Display utilities for CLI results and pretty-printing.

pub mod display;
pub mod formatters;

pub use display::{
    print_action_outcome, print_backfill_report, print_names, print_room, print_stats,
    print_sync_report, print_trace,
};
