//! Expanding ZIP containers found anywhere under the root.

use crate::config::CompiledFilters;
use crate::paths::Root;
use crate::report::{ExtractReport, ExtractedArchive};
use crate::walk::{self, FileEntry};
use std::fs::{self, File};
use std::path::{Path, PathBuf};
use tracing::{debug, info, warn};
use zip::ZipArchive;

/// Extensions recognised as containers.
pub const CONTAINER_EXTENSIONS: &[&str] = &["zip"];

pub fn is_container(entry: &FileEntry) -> bool {
    entry
        .extension
        .as_deref()
        .is_some_and(|ext| CONTAINER_EXTENSIONS.contains(&ext))
}

/// Sibling directory a container expands into: `a/b.zip` -> `a/b/`.
pub fn extraction_dir(container: &Path) -> Option<PathBuf> {
    let stem = container.file_stem()?;
    Some(container.parent()?.join(stem))
}

/// Expands every container under `root`; with `delete_after`, removes each
/// container whose expansion fully succeeded.
pub fn extract_all(root: &Root, filters: &CompiledFilters, delete_after: bool) -> ExtractReport {
    // Snapshot so containers unpacked by this call are not picked up again.
    let containers: Vec<FileEntry> = walk::files(root, filters).filter(is_container).collect();

    let mut extracted = Vec::new();
    let mut errors = Vec::new();

    for container in containers {
        let Some(target) = extraction_dir(&container.path) else {
            continue;
        };

        if let Err(e) = expand(&container.path, &target) {
            warn!("Could not extract {}: {}", container.path.display(), e);
            errors.push(format!("{}: {}", container.file_name(), e));
            continue;
        }
        debug!(archive = %container.relative_display(), "extracted");

        extracted.push(ExtractedArchive {
            archive: container.relative_display(),
            extracted_to: root.display_relative(&target),
        });

        if delete_after && let Err(e) = fs::remove_file(&container.path) {
            errors.push(format!("{}: {}", container.file_name(), e));
        }
    }

    info!(
        extracted = extracted.len(),
        errors = errors.len(),
        "extracted archives in {}",
        root.path().display()
    );

    ExtractReport {
        count: extracted.len(),
        extracted,
        errors,
        deleted_archives: delete_after,
    }
}

fn expand(container: &Path, target: &Path) -> zip::result::ZipResult<()> {
    let mut archive = ZipArchive::new(File::open(container)?)?;
    archive.extract(target)
}
