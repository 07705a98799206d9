//! Folder statistics: totals, per-category breakdown, largest files.

use crate::config::CompiledFilters;
use crate::file_category::FileMapper;
use crate::paths::Root;
use crate::report::{CategoryStats, FolderStats, LargeFile, to_mb};
use crate::walk;
use std::collections::BTreeMap;

/// How many of the largest files are listed.
pub const LARGEST_FILES: usize = 10;

pub fn folder_stats(root: &Root, filters: &CompiledFilters, mapper: &FileMapper) -> FolderStats {
    let mut by_category: BTreeMap<String, CategoryStats> = BTreeMap::new();
    let mut total_size = 0u64;
    let mut sizes = Vec::new();

    for entry in walk::files(root, filters) {
        let category = mapper.categorize(entry.extension.as_deref());
        let stats = by_category
            .entry(category.dir_name().to_string())
            .or_default();
        stats.count += 1;
        stats.size += entry.size;
        total_size += entry.size;
        sizes.push((entry.relative_display(), entry.size));
    }

    for stats in by_category.values_mut() {
        stats.size_mb = to_mb(stats.size);
    }

    // Stable: equal sizes keep walk order.
    sizes.sort_by(|a, b| b.1.cmp(&a.1));
    let largest_files = sizes
        .iter()
        .take(LARGEST_FILES)
        .map(|(file, size)| LargeFile {
            file: file.clone(),
            size_mb: to_mb(*size),
        })
        .collect();

    FolderStats {
        total_files: sizes.len(),
        total_size_mb: to_mb(total_size),
        by_category,
        largest_files,
        total_size,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;
    use tempfile::TempDir;

    #[test]
    fn test_stats_breakdown() {
        let temp_dir = TempDir::new().expect("Failed to create temp directory");
        fs::create_dir(temp_dir.path().join("nested")).unwrap();
        fs::write(temp_dir.path().join("a.png"), vec![0u8; 300]).unwrap();
        fs::write(temp_dir.path().join("nested").join("b.jpg"), vec![0u8; 100]).unwrap();
        fs::write(temp_dir.path().join("c.pdf"), vec![0u8; 200]).unwrap();

        let root = Root::open(temp_dir.path()).unwrap();
        let stats = folder_stats(&root, &CompiledFilters::allow_all(), &FileMapper::default());

        assert_eq!(stats.total_files, 3);
        assert_eq!(stats.total_size, 600);
        assert_eq!(stats.by_category["Images"].count, 2);
        assert_eq!(stats.by_category["Images"].size, 400);
        assert_eq!(stats.by_category["Documents"].count, 1);
        let order: Vec<_> = stats.largest_files.iter().map(|f| f.file.as_str()).collect();
        assert_eq!(order, vec!["a.png", "c.pdf", "nested/b.jpg"]);
    }

    #[test]
    fn test_largest_files_capped_at_ten() {
        let temp_dir = TempDir::new().expect("Failed to create temp directory");
        for i in 0..15 {
            fs::write(temp_dir.path().join(format!("f{i:02}.bin")), vec![0u8; i]).unwrap();
        }

        let root = Root::open(temp_dir.path()).unwrap();
        let stats = folder_stats(&root, &CompiledFilters::allow_all(), &FileMapper::default());

        assert_eq!(stats.total_files, 15);
        assert_eq!(stats.largest_files.len(), LARGEST_FILES);
        assert_eq!(stats.largest_files[0].file, "f14.bin");
    }

    #[test]
    fn test_empty_folder() {
        let temp_dir = TempDir::new().expect("Failed to create temp directory");
        let root = Root::open(temp_dir.path()).unwrap();
        let stats = folder_stats(&root, &CompiledFilters::allow_all(), &FileMapper::default());
        assert_eq!(stats.total_files, 0);
        assert!(stats.by_category.is_empty());
        assert!(stats.largest_files.is_empty());
    }
}
