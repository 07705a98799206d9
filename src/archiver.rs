//! Bundling old files into a single ZIP container.
//!
//! The container is created first; failing to create or finalize it fails
//! the whole call. Individual files that cannot be read or written are
//! skipped and stay where they are. Originals are removed only once the
//! container has been finalized with their entries in it.

use crate::config::CompiledFilters;
use crate::error::{EngineError, EngineResult, FileError};
use crate::mover;
use crate::paths::Root;
use crate::report::{ArchiveReport, compression_ratio, to_mb};
use crate::retention;
use crate::walk::FileEntry;
use chrono::Local;
use std::fs::{self, File};
use std::io::{self, Read};
use std::path::{Component, Path, PathBuf};
use std::time::SystemTime;
use tracing::{debug, info, warn};
use zip::write::SimpleFileOptions;
use zip::{CompressionMethod, ZipWriter};

/// How many archived paths are echoed back in the report.
pub const SAMPLE_SIZE: usize = 20;

/// `archive_YYYY-MM-DD.zip` for today's local date.
pub fn default_archive_name() -> String {
    format!("archive_{}.zip", Local::now().format("%Y-%m-%d"))
}

/// Archives every file older than `days` into `root/<archive_name>`.
pub fn archive_old_files(
    root: &Root,
    filters: &CompiledFilters,
    days: u64,
    archive_name: Option<&str>,
) -> EngineResult<ArchiveReport> {
    archive_old_files_at(root, filters, days, archive_name, SystemTime::now())
}

pub(crate) fn archive_old_files_at(
    root: &Root,
    filters: &CompiledFilters,
    days: u64,
    archive_name: Option<&str>,
    now: SystemTime,
) -> EngineResult<ArchiveReport> {
    archive_with(root, filters, days, archive_name, now, |path| File::open(path))
}

/// The archiving loop with the source opener supplied by the caller.
fn archive_with<O, R>(
    root: &Root,
    filters: &CompiledFilters,
    days: u64,
    archive_name: Option<&str>,
    now: SystemTime,
    mut open: O,
) -> EngineResult<ArchiveReport>
where
    O: FnMut(&Path) -> io::Result<R>,
    R: Read,
{
    let requested = match archive_name {
        Some(name) => normalize_name(root, name)?,
        None => default_archive_name(),
    };
    let archive_path = mover::free_destination(root.path(), Path::new(&requested));
    let archive_name = archive_path
        .file_name()
        .map(|n| n.to_string_lossy().into_owned())
        .unwrap_or(requested);

    let file = File::create_new(&archive_path).map_err(|e| creation_error(&archive_path, e))?;
    let mut zip = ZipWriter::new(file);

    let candidates: Vec<FileEntry> = retention::scan_at(root, filters, days, now)
        .map(|(entry, _)| entry)
        .filter(|entry| entry.path != archive_path)
        .collect();

    let mut written: Vec<FileEntry> = Vec::new();
    for entry in candidates {
        let written_entry = open(&entry.path)
            .map_err(|e| FileError::io(&entry.path, e))
            .and_then(|mut source| write_entry(&mut zip, &entry, &mut source));
        match written_entry {
            Ok(()) => {
                debug!(file = %entry.relative_display(), "archived");
                written.push(entry);
            }
            Err(e) => warn!("Could not archive {}", e),
        }
    }

    if let Err(e) = zip.finish() {
        // An unfinalized container is unreadable; do not leave it behind.
        let _ = fs::remove_file(&archive_path);
        return Err(creation_error(&archive_path, e));
    }

    for entry in &written {
        if let Err(e) = fs::remove_file(&entry.path) {
            warn!("Archived {} but could not remove it: {}", entry.path.display(), e);
        }
    }

    let original_size: u64 = written.iter().map(|e| e.size).sum();
    let archive_size = fs::metadata(&archive_path)
        .map(|m| m.len())
        .map_err(|e| creation_error(&archive_path, e))?;

    info!(
        archive = %archive_name,
        archived = written.len(),
        original_size,
        archive_size,
        "archived old files in {}",
        root.path().display()
    );

    Ok(ArchiveReport {
        archive_name,
        archived_files: written.len(),
        original_size_mb: to_mb(original_size),
        archive_size_mb: to_mb(archive_size),
        compression_ratio: compression_ratio(original_size, archive_size),
        files: written
            .iter()
            .take(SAMPLE_SIZE)
            .map(FileEntry::relative_display)
            .collect(),
    })
}

/// Requires a single plain file name and makes sure it ends in `.zip`.
fn normalize_name(root: &Root, name: &str) -> EngineResult<String> {
    let trimmed = name.trim();
    let mut components = Path::new(trimmed).components();
    let is_plain = matches!(
        (components.next(), components.next()),
        (Some(Component::Normal(_)), None)
    );
    // `components()` drops a trailing separator, so "Images/" would pass.
    let is_bare_name = Path::new(trimmed)
        .file_name()
        .is_some_and(|file_name| file_name == trimmed)
        && !trimmed.ends_with(['/', '\\']);
    if !is_plain || !is_bare_name {
        return Err(EngineError::ArchiveCreation {
            path: root.join(trimmed),
            reason: "archive name must be a plain file name".to_string(),
        });
    }

    let has_zip_extension = Path::new(trimmed)
        .extension()
        .is_some_and(|ext| ext.eq_ignore_ascii_case("zip"));
    Ok(if has_zip_extension {
        trimmed.to_string()
    } else {
        format!("{trimmed}.zip")
    })
}

fn write_entry(
    zip: &mut ZipWriter<File>,
    entry: &FileEntry,
    source: &mut impl Read,
) -> Result<(), FileError> {
    let options = SimpleFileOptions::default()
        .compression_method(CompressionMethod::Deflated)
        .large_file(entry.size >= u64::from(u32::MAX));
    zip.start_file(entry.relative_display(), options)
        .map_err(|e| FileError::Archive {
            path: entry.path.clone(),
            reason: e.to_string(),
        })?;

    if let Err(e) = io::copy(source, zip) {
        if let Err(abort) = zip.abort_file() {
            warn!("Could not roll back entry for {}: {}", entry.path.display(), abort);
        }
        return Err(FileError::io(&entry.path, e));
    }
    Ok(())
}

fn creation_error(path: &Path, reason: impl ToString) -> EngineError {
    EngineError::ArchiveCreation {
        path: PathBuf::from(path),
        reason: reason.to_string(),
    }
}
