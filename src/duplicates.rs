//! Duplicate detection by content digest.
//!
//! Files are grouped by [`ContentDigest`]. Within a group the most recently
//! modified file is kept; ties go to the file visited first by the walk.

use crate::config::CompiledFilters;
use crate::error::FileError;
use crate::hasher::{self, ContentDigest};
use crate::paths::Root;
use crate::report::{DuplicateEntry, DuplicateReport, to_mb};
use crate::walk::{self, FileEntry};
use std::collections::HashMap;
use std::fs;
use std::io;
use std::path::Path;
use tracing::{debug, info, warn};

/// Files sharing one digest, in walk order.
#[derive(Debug, Clone)]
pub struct DuplicateGroup {
    pub digest: ContentDigest,
    pub files: Vec<FileEntry>,
}

impl DuplicateGroup {
    /// Orders members newest first; the sort is stable so equal mtimes keep
    /// walk order. Index 0 is the survivor.
    fn elect(&mut self) {
        self.files.sort_by(|a, b| b.modified.cmp(&a.modified));
    }

    pub fn keep(&self) -> &FileEntry {
        &self.files[0]
    }

    pub fn duplicates(&self) -> &[FileEntry] {
        &self.files[1..]
    }
}

/// Walks the root and groups files with identical content.
///
/// Files that cannot be hashed are logged and left out. Only groups with
/// two or more members are returned, in the order their first member was
/// walked, already sorted so that [`DuplicateGroup::keep`] is the survivor.
pub fn group_duplicates(root: &Root, filters: &CompiledFilters) -> Vec<DuplicateGroup> {
    group_duplicates_with(root, filters, hasher::digest)
}

fn group_duplicates_with<H>(
    root: &Root,
    filters: &CompiledFilters,
    mut hash: H,
) -> Vec<DuplicateGroup>
where
    H: FnMut(&Path) -> Result<ContentDigest, FileError>,
{
    let mut index: HashMap<ContentDigest, usize> = HashMap::new();
    let mut groups: Vec<DuplicateGroup> = Vec::new();

    for entry in walk::files(root, filters) {
        let digest = match hash(&entry.path) {
            Ok(digest) => digest,
            Err(e) => {
                warn!("Skipping unhashable file {}", e);
                continue;
            }
        };

        match index.get(&digest) {
            Some(&slot) => groups[slot].files.push(entry),
            None => {
                index.insert(digest, groups.len());
                groups.push(DuplicateGroup {
                    digest,
                    files: vec![entry],
                });
            }
        }
    }

    groups.retain(|group| group.files.len() > 1);
    for group in &mut groups {
        group.elect();
    }
    groups
}

/// Reports every duplicate and, when `delete` is set, removes them.
///
/// A duplicate that cannot be deleted is logged and skipped; the call still
/// succeeds and the file stays listed.
pub fn find_duplicates(root: &Root, filters: &CompiledFilters, delete: bool) -> DuplicateReport {
    summarize(root, group_duplicates(root, filters), delete, |path| fs::remove_file(path))
}

fn summarize<D>(
    root: &Root,
    groups: Vec<DuplicateGroup>,
    delete: bool,
    mut remove: D,
) -> DuplicateReport
where
    D: FnMut(&Path) -> io::Result<()>,
{
    let mut duplicates = Vec::new();
    let mut space_saved = 0u64;

    for group in &groups {
        let keep = group.keep();
        for dup in group.duplicates() {
            duplicates.push(DuplicateEntry {
                file: dup.relative_display(),
                size: dup.size,
                original: keep.relative_display(),
            });
            space_saved += dup.size;

            if delete {
                match remove(&dup.path) {
                    Ok(()) => debug!(path = %dup.path.display(), digest = %group.digest, "deleted duplicate"),
                    Err(e) => warn!("Could not delete duplicate {}: {}", dup.path.display(), e),
                }
            }
        }
    }

    info!(
        groups = groups.len(),
        duplicates = duplicates.len(),
        space_saved,
        "duplicate scan of {} complete",
        root.path().display()
    );

    DuplicateReport {
        count: duplicates.len(),
        duplicates,
        space_saved_mb: to_mb(space_saved),
        deleted: delete,
        space_saved_bytes: space_saved,
    }
}
