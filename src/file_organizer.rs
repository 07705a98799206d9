//! Reorganization of a root by file type or by modification month.
//!
//! Both organizers walk the whole tree, pick a destination folder for each
//! file and hand it to the collision-safe mover. A file whose parent already
//! is its destination is skipped, so running an organizer twice moves
//! nothing the second time. In dry-run mode the report is built without
//! touching the disk.

use crate::config::CompiledFilters;
use crate::file_category::FileMapper;
use crate::mover::{self, MoveOutcome};
use crate::paths::Root;
use crate::report::{DateOrganizeReport, OrganizeReport, TypeOrganizeReport};
use crate::walk::{self, FileEntry};
use chrono::{DateTime, Local};
use std::path::PathBuf;
use tracing::{debug, info, warn};

/// Where a file should end up: a label for the report and the directory.
struct Destination {
    folder: String,
    dir: PathBuf,
}

/// Moves every file into `root/<Category>`.
pub fn organize_by_type(
    root: &Root,
    filters: &CompiledFilters,
    mapper: &FileMapper,
    dry_run: bool,
) -> TypeOrganizeReport {
    let report = organize_with(root, filters, dry_run, |entry| {
        let category = mapper.categorize(entry.extension.as_deref());
        Destination {
            folder: category.dir_name().to_string(),
            dir: root.join(category.dir_name()),
        }
    });

    TypeOrganizeReport {
        categories: report.folders,
        report,
    }
}

/// Moves every file into `root/<YYYY>/<MM-Month>` by modification time.
pub fn organize_by_date(root: &Root, filters: &CompiledFilters, dry_run: bool) -> DateOrganizeReport {
    let report = organize_with(root, filters, dry_run, |entry| {
        let (year, month) = date_folder(entry);
        Destination {
            folder: format!("{year}/{month}"),
            dir: root.join(year).join(month),
        }
    });

    DateOrganizeReport {
        date_folders: report.folders,
        report,
    }
}

/// Year and `MM-Month` folder names for a file's local modification date.
fn date_folder(entry: &FileEntry) -> (String, String) {
    let modified: DateTime<Local> = entry.modified.into();
    (
        modified.format("%Y").to_string(),
        modified.format("%m-%B").to_string(),
    )
}

fn organize_with(
    root: &Root,
    filters: &CompiledFilters,
    dry_run: bool,
    destination_of: impl Fn(&FileEntry) -> Destination,
) -> OrganizeReport {
    let mut report = OrganizeReport::new(dry_run);

    // Snapshot first: moved files must not be revisited.
    for entry in walk::snapshot(root, filters) {
        let destination = destination_of(&entry);

        if entry.path.parent() == Some(destination.dir.as_path()) {
            continue;
        }

        if dry_run {
            debug!(file = %entry.relative_display(), to = %destination.folder, "would move");
            report.record(destination.folder, entry.file_name());
            continue;
        }

        match mover::move_into(&entry.path, &destination.dir) {
            Ok(MoveOutcome::Moved(to)) => {
                let final_name = to
                    .file_name()
                    .map(|n| n.to_string_lossy().into_owned())
                    .unwrap_or_else(|| entry.file_name());
                report.record(destination.folder, final_name);
            }
            Ok(MoveOutcome::LeftInPlace) => {}
            Err(e) => {
                warn!("Could not organize {}: {}", entry.path.display(), e);
                report.errors.push(format!("{}: {}", entry.file_name(), e));
            }
        }
    }

    info!(
        moved = report.total_files,
        folders = report.folders,
        errors = report.errors.len(),
        dry_run,
        "organized {}",
        root.path().display()
    );
    report
}
