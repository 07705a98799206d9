//! Tree walking.
//!
//! Every operation re-walks the root; nothing here is cached between calls.
//! Entries are visited sorted by file name so the enumeration order is
//! stable for a given tree.

use crate::config::CompiledFilters;
use crate::paths::Root;
use std::path::{Path, PathBuf};
use std::time::SystemTime;
use tracing::warn;
use walkdir::WalkDir;

/// One regular file seen during a walk.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FileEntry {
    /// Absolute path of the file.
    pub path: PathBuf,
    /// Path below the root.
    pub relative: PathBuf,
    /// Size in bytes.
    pub size: u64,
    /// Last-modified time.
    pub modified: SystemTime,
    /// Lower-cased extension without the dot, if any.
    pub extension: Option<String>,
}

impl FileEntry {
    /// Builds an entry from a path, reading its metadata.
    pub fn from_path(root: &Path, path: &Path) -> std::io::Result<Self> {
        let metadata = path.metadata()?;
        let relative = path.strip_prefix(root).unwrap_or(path).to_path_buf();
        Ok(Self {
            path: path.to_path_buf(),
            relative,
            size: metadata.len(),
            modified: metadata.modified()?,
            extension: path
                .extension()
                .map(|ext| ext.to_string_lossy().to_lowercase()),
        })
    }

    /// Final path component as text.
    pub fn file_name(&self) -> String {
        self.path
            .file_name()
            .map(|n| n.to_string_lossy().into_owned())
            .unwrap_or_default()
    }

    /// Relative path rendered with `/` separators.
    pub fn relative_display(&self) -> String {
        self.relative
            .components()
            .map(|c| c.as_os_str().to_string_lossy())
            .collect::<Vec<_>>()
            .join("/")
    }
}

/// Lazily yields every regular file below `root` that passes `filters`.
///
/// Unreadable directories and files that vanish mid-walk are logged and
/// skipped; they never end the walk.
pub fn files<'a>(
    root: &'a Root,
    filters: &'a CompiledFilters,
) -> impl Iterator<Item = FileEntry> + 'a {
    WalkDir::new(root.path())
        .min_depth(1)
        .sort_by_file_name()
        .into_iter()
        .filter_map(|entry| match entry {
            Ok(entry) => Some(entry),
            Err(err) => {
                warn!("Skipping unreadable entry: {}", err);
                None
            }
        })
        .filter(|entry| entry.file_type().is_file())
        .filter_map(move |entry| {
            let relative = entry.path().strip_prefix(root.path()).ok()?;
            if !filters.should_include(relative) {
                return None;
            }
            match FileEntry::from_path(root.path(), entry.path()) {
                Ok(file) => Some(file),
                Err(err) => {
                    warn!("Skipping {}: {}", entry.path().display(), err);
                    None
                }
            }
        })
}

/// Collects the walk up front, for operations that mutate the tree.
pub fn snapshot(root: &Root, filters: &CompiledFilters) -> Vec<FileEntry> {
    files(root, filters).collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::{ExcludeRules, FilterRules, IncludeRules};
    use std::fs;
    use tempfile::TempDir;

    #[test]
    fn test_walk_is_recursive_and_sorted() {
        let temp_dir = TempDir::new().expect("Failed to create temp directory");
        fs::create_dir(temp_dir.path().join("sub")).unwrap();
        fs::write(temp_dir.path().join("b.txt"), "b").unwrap();
        fs::write(temp_dir.path().join("a.TXT"), "aa").unwrap();
        fs::write(temp_dir.path().join("sub").join("c"), "ccc").unwrap();

        let root = Root::open(temp_dir.path()).unwrap();
        let entries = snapshot(&root, &CompiledFilters::allow_all());

        let names: Vec<_> = entries.iter().map(|e| e.relative_display()).collect();
        assert_eq!(names, vec!["a.TXT", "b.txt", "sub/c"]);
        assert_eq!(entries[0].extension.as_deref(), Some("txt"));
        assert_eq!(entries[0].size, 2);
        assert_eq!(entries[2].extension, None);
    }

    #[test]
    fn test_walk_applies_filters_to_relative_paths() {
        let temp_dir = TempDir::new().expect("Failed to create temp directory");
        fs::create_dir(temp_dir.path().join("cache")).unwrap();
        fs::write(temp_dir.path().join("cache").join("x.bin"), "x").unwrap();
        fs::write(temp_dir.path().join("keep.bin"), "k").unwrap();

        let filters = CompiledFilters::new(&FilterRules {
            enable_hidden_files: true,
            exclude: ExcludeRules {
                patterns: vec!["cache/**".to_string()],
                ..Default::default()
            },
            include: IncludeRules::default(),
        })
        .unwrap();

        let root = Root::open(temp_dir.path()).unwrap();
        let entries = snapshot(&root, &filters);
        assert_eq!(entries.len(), 1);
        assert_eq!(entries[0].file_name(), "keep.bin");
    }

    #[test]
    fn test_walk_skips_directories() {
        let temp_dir = TempDir::new().expect("Failed to create temp directory");
        fs::create_dir_all(temp_dir.path().join("empty").join("nested")).unwrap();

        let root = Root::open(temp_dir.path()).unwrap();
        assert!(snapshot(&root, &CompiledFilters::allow_all()).is_empty());
    }
}
