//! Backfill command: compute missing remaining-count traces with a progress bar

use crate::error::Result;
use crate::games::{BackfillReport, backfill_remaining_counts};
use crate::storage::Database;
use crate::wordlists::Dictionary;
use indicatif::{ProgressBar, ProgressStyle};

/// Fill every missing trace, showing progress on stderr unless `quiet`
///
/// # Errors
///
/// Store errors propagate; nothing from this run is kept in that case.
pub fn run_backfill(db: &Database, dictionary: &Dictionary, quiet: bool) -> Result<BackfillReport> {
    let pb = if quiet {
        ProgressBar::hidden()
    } else {
        ProgressBar::new(0)
    };
    if let Ok(style) = ProgressStyle::default_bar()
        .template("{spinner:.green} [{bar:40.cyan/blue}] {pos}/{len} ({percent}%) | {msg}")
    {
        pb.set_style(style.progress_chars("█▓▒░"));
    }

    let report = backfill_remaining_counts(
        db,
        dictionary,
        |total| {
            pb.set_length(total as u64);
            pb.set_message(format!("{total} games without a trace"));
        },
        || pb.inc(1),
    )?;

    pb.finish_with_message(format!(
        "{} filled, {} skipped",
        report.filled.len(),
        report.skipped.len()
    ));
    Ok(report)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::wordlists::loader::words_from_slice;

    #[test]
    fn quiet_backfill_on_empty_store() {
        let db = Database::open_in_memory().unwrap();
        let dictionary = Dictionary::new(words_from_slice(&["crane"]));
        let report = run_backfill(&db, &dictionary, true).unwrap();
        assert!(report.is_empty());
    }
}
