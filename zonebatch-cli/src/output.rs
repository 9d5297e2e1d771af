//! Progress bar and bulk result rendering

use std::io::{self, Write};
use std::sync::Arc;

use colored::Colorize;
use zonebatch_core::{BulkProgress, BulkResult, ProgressCallback};

const BAR_WIDTH: usize = 28;
const MAX_ERROR_LINES: usize = 10;

/// Single-line progress bar, rewritten in place on every settlement.
pub fn progress_bar() -> ProgressCallback {
    Arc::new(|progress: &BulkProgress| {
        let filled = if progress.total == 0 {
            BAR_WIDTH
        } else {
            BAR_WIDTH * progress.completed / progress.total
        };
        print!(
            "\r[{}{}] {}/{} (ok {}, failed {})",
            "#".repeat(filled),
            "-".repeat(BAR_WIDTH - filled),
            progress.completed,
            progress.total,
            progress.succeeded,
            progress.failed
        );
        let _ = io::stdout().flush();
    })
}

/// Print the terminal summary of a bulk run.
///
/// Partial failures print a warning summary plus up to the first 10 error
/// lines with a truncation notice.
pub fn print_bulk_summary<T>(verb: &str, result: &BulkResult<T>) {
    if result.total > 0 {
        println!(); // end the progress line
    }
    let dry = if result.dry_run { " (dry run)" } else { "" };

    if result.success {
        println!(
            "{} {verb}: {} of {} item(s){dry}",
            "✓".green(),
            result.succeeded,
            result.total
        );
        return;
    }

    println!(
        "{} {verb} finished with failures{dry}: succeeded: {}, failed: {}",
        "⚠".yellow(),
        result.succeeded,
        result.failed
    );
    for error in result.errors.iter().take(MAX_ERROR_LINES) {
        eprintln!("  {} {}: {}", "✗".red(), error.item, error.error);
    }
    if result.errors.len() > MAX_ERROR_LINES {
        eprintln!("  ...and {} more", result.errors.len() - MAX_ERROR_LINES);
    }
}
