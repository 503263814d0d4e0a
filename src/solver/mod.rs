//! Remaining-possibility solver
//!
//! Candidate filtering over the dictionary, per-game possibility tracking and
//! parallel batch recomputation of stored traces.

pub mod batch;
mod filter;
mod tracker;

pub use batch::{TraceRequest, TraceResult, recompute_all};
pub use filter::{CandidateFilter, GuessEntry, LetterConstraints};
pub use tracker::{PossibilityTracker, TrackedGuess, remaining_counts};
