//! Report payloads returned by every operation.
//!
//! Reports are built fresh per call and serialize to the `data` object of
//! the tool envelope. Byte totals are surfaced in binary megabytes.

use serde::Serialize;
use std::collections::BTreeMap;

const BYTES_PER_MB: f64 = 1024.0 * 1024.0;

/// Converts bytes to binary megabytes rounded to 2 decimals.
pub fn to_mb(bytes: u64) -> f64 {
    round_to(bytes as f64 / BYTES_PER_MB, 2)
}

/// `(1 - archive/original) * 100` rounded to 1 decimal, or 0 for an empty
/// original.
pub fn compression_ratio(original_bytes: u64, archive_bytes: u64) -> f64 {
    if original_bytes == 0 {
        return 0.0;
    }
    round_to(
        (1.0 - archive_bytes as f64 / original_bytes as f64) * 100.0,
        1,
    )
}

fn round_to(value: f64, decimals: i32) -> f64 {
    let factor = 10f64.powi(decimals);
    (value * factor).round() / factor
}

/// Result of organizing by type or by date.
#[derive(Debug, Clone, Default, Serialize)]
pub struct OrganizeReport {
    /// Destination folder (category or `YYYY/MM-Month`) to file names.
    pub moved_files: BTreeMap<String, Vec<String>>,
    pub total_files: usize,
    /// Number of distinct destination folders touched.
    #[serde(skip)]
    pub folders: usize,
    pub errors: Vec<String>,
    pub dry_run: bool,
}

impl OrganizeReport {
    pub fn new(dry_run: bool) -> Self {
        Self {
            dry_run,
            ..Self::default()
        }
    }

    pub fn record(&mut self, folder: String, file_name: String) {
        self.moved_files.entry(folder).or_default().push(file_name);
        self.total_files += 1;
        self.folders = self.moved_files.len();
    }
}

/// Organize-by-type payload: `categories` counts the category folders.
#[derive(Debug, Clone, Serialize)]
pub struct TypeOrganizeReport {
    #[serde(flatten)]
    pub report: OrganizeReport,
    pub categories: usize,
}

/// Organize-by-date payload: `date_folders` counts the month folders.
#[derive(Debug, Clone, Serialize)]
pub struct DateOrganizeReport {
    #[serde(flatten)]
    pub report: OrganizeReport,
    pub date_folders: usize,
}

/// One file that duplicates an earlier-elected survivor.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct DuplicateEntry {
    /// The duplicate's relative path.
    pub file: String,
    pub size: u64,
    /// Relative path of the copy that is kept.
    pub original: String,
}

#[derive(Debug, Clone, Serialize)]
pub struct DuplicateReport {
    pub duplicates: Vec<DuplicateEntry>,
    pub count: usize,
    pub space_saved_mb: f64,
    pub deleted: bool,
    #[serde(skip)]
    pub space_saved_bytes: u64,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct OldFileEntry {
    pub file: String,
    pub age_days: u64,
    pub size: u64,
}

#[derive(Debug, Clone, Serialize)]
pub struct OldFilesReport {
    pub old_files: Vec<OldFileEntry>,
    pub count: usize,
    pub total_size_mb: f64,
    pub deleted: bool,
    pub days_threshold: u64,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct CategoryStats {
    pub count: usize,
    pub size_mb: f64,
    #[serde(skip)]
    pub size: u64,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct LargeFile {
    pub file: String,
    pub size_mb: f64,
}

#[derive(Debug, Clone, Serialize)]
pub struct FolderStats {
    pub total_files: usize,
    pub total_size_mb: f64,
    pub by_category: BTreeMap<String, CategoryStats>,
    pub largest_files: Vec<LargeFile>,
    #[serde(skip)]
    pub total_size: u64,
}

#[derive(Debug, Clone, Serialize)]
pub struct ArchiveReport {
    pub archive_name: String,
    pub archived_files: usize,
    pub original_size_mb: f64,
    pub archive_size_mb: f64,
    pub compression_ratio: f64,
    /// Up to the first 20 archived relative paths.
    pub files: Vec<String>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ExtractedArchive {
    pub archive: String,
    pub extracted_to: String,
}

#[derive(Debug, Clone, Serialize)]
pub struct ExtractReport {
    pub extracted: Vec<ExtractedArchive>,
    pub count: usize,
    pub errors: Vec<String>,
    pub deleted_archives: bool,
}
