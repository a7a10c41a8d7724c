/*!
 * Human-readable run summaries.
 *
 * The controller returns structured results; this module turns them into
 * the text printed on stdout. Nothing here touches the filesystem.
 */

use std::collections::BTreeMap;
use std::fmt::Write as _;
use std::time::Duration;

use crate::app_controller::{DocumentFailure, MergeRun, PruneRun};
use crate::errors::AppError;
use crate::language_utils;
use crate::record_filter::{CategoryPair, FilterSummary};

/// Format a duration like "1m 5s" or "0.250s"
pub fn format_duration(duration: Duration) -> String {
    let total_seconds = duration.as_secs();
    let hours = total_seconds / 3600;
    let minutes = (total_seconds % 3600) / 60;
    let seconds = total_seconds % 60;

    if hours > 0 {
        format!("{}h {}m {}s", hours, minutes, seconds)
    } else if minutes > 0 {
        format!("{}m {}s", minutes, seconds)
    } else {
        format!("{}.{:03}s", seconds, duration.subsec_millis())
    }
}

fn write_breakdown(out: &mut String, title: &str, counts: &BTreeMap<CategoryPair, usize>) {
    if counts.is_empty() {
        return;
    }
    let _ = writeln!(out, "  {}:", title);
    for (pair, count) in counts {
        let _ = writeln!(out, "    - {}: {}", pair, count);
    }
}

/// Counts for a single catalog: total, removed, kept and the per-pair breakdown
pub fn format_filter_summary(summary: &FilterSummary) -> String {
    let mut out = String::new();
    let _ = writeln!(out, "  Total conversions: {}", summary.total);
    let _ = writeln!(out, "  Removed: {}", summary.removed);
    let _ = writeln!(out, "  Kept: {}", summary.kept);
    write_breakdown(&mut out, "Removed by category", &summary.removed_by_pair);
    write_breakdown(&mut out, "Kept by category", &summary.kept_by_pair);
    out
}

fn write_failures(out: &mut String, failures: &[DocumentFailure]) {
    if failures.is_empty() {
        return;
    }
    let _ = writeln!(out, "\nFailures ({}):", failures.len());
    for failure in failures {
        let _ = writeln!(out, "  {}: {}", failure.path.display(), failure.error);
        // Backup copies fail under their own name
        if let AppError::Document(error) = &failure.error {
            if error.path() != failure.path {
                let _ = writeln!(out, "    (affected file: {})", error.path().display());
            }
        }
    }
}

pub fn format_prune_run(run: &PruneRun) -> String {
    let mut out = String::new();

    for catalog in &run.catalogs {
        let _ = writeln!(out, "Catalog {}", catalog.path.display());

        if !catalog.removed.is_empty() {
            let _ = writeln!(out, "  Removed conversions ({}):", catalog.removed.len());
            for (i, label) in catalog.removed.iter().enumerate() {
                let _ = writeln!(out, "    {}. {}", i + 1, label);
            }
        }

        out.push_str(&format_filter_summary(&catalog.summary));

        if catalog.written {
            let _ = writeln!(out, "  Updated {}", catalog.path.display());
        } else if run.dry_run && catalog.summary.removed > 0 {
            let _ = writeln!(out, "  Dry run: file not written");
        } else {
            let _ = writeln!(out, "  Unchanged");
        }
        if let Some(backup) = &catalog.backup {
            let _ = writeln!(out, "  Backup: {}", backup.display());
        }
    }

    write_failures(&mut out, &run.failures);
    let _ = writeln!(out, "\nCompleted in {}", format_duration(run.elapsed));
    out
}

fn join_locales<'a>(keys: impl Iterator<Item = &'a String>) -> String {
    keys.map(|key| language_utils::display_locale(key))
        .collect::<Vec<_>>()
        .join(", ")
}

pub fn format_merge_run(run: &MergeRun) -> String {
    let mut out = String::new();
    let outcome = &run.outcome;

    let _ = writeln!(out, "Merged field '{}'", run.target_field);
    let _ = writeln!(out, "  Updated ({}): {}", outcome.updated.len(), join_locales(outcome.updated.iter()));
    if !outcome.skipped.is_empty() {
        let _ = writeln!(
            out,
            "  Skipped, not found ({}): {}",
            outcome.skipped.len(),
            join_locales(outcome.skipped.iter())
        );
    }
    if !outcome.untouched.is_empty() {
        let _ = writeln!(
            out,
            "  Untouched ({}): {}",
            outcome.untouched.len(),
            join_locales(outcome.untouched.iter())
        );
    }

    if run.dry_run {
        let _ = writeln!(out, "  Dry run: no files written");
    } else {
        let _ = writeln!(out, "  Written: {}", run.written.len());
    }
    if !run.backups.is_empty() {
        let _ = writeln!(out, "  Backups: {}", run.backups.len());
    }

    write_failures(&mut out, &run.failures);
    let _ = writeln!(out, "\nCompleted in {}", format_duration(run.elapsed));
    out
}
