//! Age-based scanning and cleanup.
//!
//! A file is "old" when its last-modified time is strictly before
//! `now - days`. The scanner is a lazy, one-shot iterator over the walk;
//! the archiver reuses it.

use crate::config::CompiledFilters;
use crate::paths::Root;
use crate::report::{OldFileEntry, OldFilesReport, to_mb};
use crate::walk::{self, FileEntry};
use std::fs;
use std::io;
use std::path::Path;
use std::time::{Duration, SystemTime};
use tracing::{debug, info, warn};

const SECONDS_PER_DAY: u64 = 24 * 60 * 60;

/// The instant `days` before `now`, or `None` if that predates the clock.
pub fn cutoff(now: SystemTime, days: u64) -> Option<SystemTime> {
    now.checked_sub(Duration::from_secs(days.saturating_mul(SECONDS_PER_DAY)))
}

/// Whole days elapsed between `modified` and `now`; 0 for future times.
pub fn age_in_days(now: SystemTime, modified: SystemTime) -> u64 {
    now.duration_since(modified)
        .map(|elapsed| elapsed.as_secs() / SECONDS_PER_DAY)
        .unwrap_or(0)
}

/// Yields every file older than `days`, with its age in days.
pub fn scan<'a>(
    root: &'a Root,
    filters: &'a CompiledFilters,
    days: u64,
) -> impl Iterator<Item = (FileEntry, u64)> + 'a {
    scan_at(root, filters, days, SystemTime::now())
}

/// [`scan`] against a fixed clock.
pub fn scan_at<'a>(
    root: &'a Root,
    filters: &'a CompiledFilters,
    days: u64,
    now: SystemTime,
) -> impl Iterator<Item = (FileEntry, u64)> + 'a {
    let cutoff = cutoff(now, days);
    walk::files(root, filters).filter_map(move |entry| {
        let cutoff = cutoff?;
        (entry.modified < cutoff).then(|| {
            let age = age_in_days(now, entry.modified);
            (entry, age)
        })
    })
}

/// Lists files older than `days`, deleting them when `delete` is set.
///
/// Deletion failures are logged and do not stop the rest of the cleanup.
pub fn clean_old_files(
    root: &Root,
    filters: &CompiledFilters,
    days: u64,
    delete: bool,
) -> OldFilesReport {
    clean_old_files_at(root, filters, days, delete, SystemTime::now())
}

pub(crate) fn clean_old_files_at(
    root: &Root,
    filters: &CompiledFilters,
    days: u64,
    delete: bool,
    now: SystemTime,
) -> OldFilesReport {
    clean_with(root, filters, days, delete, now, |path| fs::remove_file(path))
}

fn clean_with<D>(
    root: &Root,
    filters: &CompiledFilters,
    days: u64,
    delete: bool,
    now: SystemTime,
    mut remove: D,
) -> OldFilesReport
where
    D: FnMut(&Path) -> io::Result<()>,
{
    let old: Vec<(FileEntry, u64)> = scan_at(root, filters, days, now).collect();

    let mut old_files = Vec::with_capacity(old.len());
    let mut total_size = 0u64;

    for (entry, age_days) in old {
        total_size += entry.size;
        old_files.push(OldFileEntry {
            file: entry.relative_display(),
            age_days,
            size: entry.size,
        });

        if delete {
            match remove(&entry.path) {
                Ok(()) => debug!(path = %entry.path.display(), "deleted old file"),
                Err(e) => warn!("Could not delete {}: {}", entry.path.display(), e),
            }
        }
    }

    info!(
        count = old_files.len(),
        days, delete, "old file scan of {} complete",
        root.path().display()
    );

    OldFilesReport {
        count: old_files.len(),
        total_size_mb: to_mb(total_size),
        old_files,
        deleted: delete,
        days_threshold: days,
    }
}
