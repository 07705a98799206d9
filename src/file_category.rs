//! File categorization by extension.
//!
//! This module maps lower-cased file extensions to one of a fixed set of
//! categories (e.g., "Images", "Documents", "Programs"). Anything the table
//! does not know about lands in `Category::Other`.
//!
//! # Examples
//!
//! ```
//! use dlsweep::file_category::{Category, FileMapper};
//!
//! let mapper = FileMapper::default();
//! assert_eq!(mapper.categorize(Some("png")), Category::Images);
//! assert_eq!(mapper.categorize(Some("exe")), Category::Programs);
//! assert_eq!(mapper.categorize(None), Category::Other);
//! ```

use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::fmt;

/// Represents a broad file category.
///
/// The category name doubles as the name of the folder files are organized
/// into, directly under the root.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub enum Category {
    /// Image files (PNG, JPG, GIF, etc.)
    Images,
    /// Document files (PDF, DOCX, TXT, spreadsheets, slides)
    Documents,
    /// Video files (MP4, MKV, AVI, etc.)
    Videos,
    /// Audio files (MP3, WAV, FLAC, etc.)
    Audio,
    /// Archive files (ZIP, RAR, 7Z, etc.)
    Archives,
    /// Code and markup files
    Code,
    /// Installers and executables
    Programs,
    /// Unknown or uncategorized files
    Other,
}

impl Category {
    pub const ALL: [Category; 8] = [
        Category::Images,
        Category::Documents,
        Category::Videos,
        Category::Audio,
        Category::Archives,
        Category::Code,
        Category::Programs,
        Category::Other,
    ];

    /// Returns the directory name for this category.
    ///
    /// # Examples
    ///
    /// ```
    /// use dlsweep::file_category::Category;
    ///
    /// assert_eq!(Category::Images.dir_name(), "Images");
    /// assert_eq!(Category::Other.dir_name(), "Other");
    /// ```
    pub fn dir_name(&self) -> &'static str {
        match self {
            Category::Images => "Images",
            Category::Documents => "Documents",
            Category::Videos => "Videos",
            Category::Audio => "Audio",
            Category::Archives => "Archives",
            Category::Code => "Code",
            Category::Programs => "Programs",
            Category::Other => "Other",
        }
    }
}

impl fmt::Display for Category {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.dir_name())
    }
}

/// The built-in extension table.
const STANDARD: &[(Category, &[&str])] = &[
    (
        Category::Images,
        &["jpg", "jpeg", "png", "gif", "bmp", "svg", "webp", "ico"],
    ),
    (
        Category::Documents,
        &[
            "pdf", "doc", "docx", "txt", "rtf", "odt", "xls", "xlsx", "ppt", "pptx",
        ],
    ),
    (
        Category::Videos,
        &["mp4", "avi", "mkv", "mov", "wmv", "flv", "webm"],
    ),
    (Category::Audio, &["mp3", "wav", "flac", "aac", "ogg", "m4a"]),
    (Category::Archives, &["zip", "rar", "7z", "tar", "gz", "bz2"]),
    (
        Category::Code,
        &[
            "py", "js", "java", "cpp", "c", "html", "css", "json", "xml", "sql",
        ],
    ),
    (
        Category::Programs,
        &["exe", "msi", "dmg", "deb", "rpm", "apk"],
    ),
];

/// Maps file extensions to categories.
///
/// Built once and then only read; callers that need different mappings
/// construct their own mapper and hand it to the engine.
#[derive(Debug, Clone)]
pub struct FileMapper {
    extension_map: HashMap<String, Category>,
}

impl FileMapper {
    /// Creates a new `FileMapper` with all standard mappings.
    pub fn new() -> Self {
        let mut mapper = Self::empty();
        mapper.populate_standard_mappings();
        mapper
    }

    /// Creates a mapper with no mappings at all; everything is `Other`.
    pub fn empty() -> Self {
        Self {
            extension_map: HashMap::new(),
        }
    }

    fn populate_standard_mappings(&mut self) {
        for (category, extensions) in STANDARD {
            for ext in *extensions {
                self.add_extension_mapping(ext, *category);
            }
        }
    }

    /// Adds (or replaces) a file extension to category mapping.
    ///
    /// A leading dot is ignored, so `".heic"` and `"heic"` are the same key.
    pub fn add_extension_mapping(&mut self, ext: &str, category: Category) {
        let key = ext.trim_start_matches('.').to_lowercase();
        self.extension_map.insert(key, category);
    }

    /// Maps a file extension to a category, if the table knows it.
    ///
    /// # Examples
    ///
    /// ```
    /// use dlsweep::file_category::{Category, FileMapper};
    ///
    /// let mapper = FileMapper::default();
    /// assert_eq!(mapper.extension_to_category("pdf"), Some(Category::Documents));
    /// assert_eq!(mapper.extension_to_category("PNG"), Some(Category::Images));
    /// assert_eq!(mapper.extension_to_category("xyz"), None);
    /// ```
    pub fn extension_to_category(&self, ext: &str) -> Option<Category> {
        self.extension_map.get(&ext.to_lowercase()).copied()
    }

    /// Determines the category for a file given its (lower-cased) extension.
    ///
    /// Total: a missing or unknown extension yields `Category::Other`.
    pub fn categorize(&self, ext: Option<&str>) -> Category {
        ext.and_then(|e| self.extension_to_category(e))
            .unwrap_or(Category::Other)
    }
}

impl Default for FileMapper {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_category_dir_names() {
        assert_eq!(Category::Images.dir_name(), "Images");
        assert_eq!(Category::Documents.dir_name(), "Documents");
        assert_eq!(Category::Videos.dir_name(), "Videos");
        assert_eq!(Category::Audio.dir_name(), "Audio");
        assert_eq!(Category::Archives.dir_name(), "Archives");
        assert_eq!(Category::Code.dir_name(), "Code");
        assert_eq!(Category::Programs.dir_name(), "Programs");
        assert_eq!(Category::Other.dir_name(), "Other");
    }

    #[test]
    fn test_extension_to_category() {
        let mapper = FileMapper::default();
        assert_eq!(
            mapper.extension_to_category("pdf"),
            Some(Category::Documents)
        );
        assert_eq!(mapper.extension_to_category("mp3"), Some(Category::Audio));
        assert_eq!(mapper.extension_to_category("sql"), Some(Category::Code));
        assert_eq!(mapper.extension_to_category("apk"), Some(Category::Programs));
        assert_eq!(mapper.extension_to_category("xlsx"), Some(Category::Documents));
    }

    #[test]
    fn test_extension_to_category_case_insensitive() {
        let mapper = FileMapper::default();
        assert_eq!(
            mapper.extension_to_category("PDF"),
            Some(Category::Documents)
        );
        assert_eq!(mapper.extension_to_category("Mp3"), Some(Category::Audio));
    }

    #[test]
    fn test_categorize_defaults_to_other() {
        let mapper = FileMapper::default();
        assert_eq!(mapper.categorize(None), Category::Other);
        assert_eq!(mapper.categorize(Some("xyz")), Category::Other);
        assert_eq!(mapper.categorize(Some("")), Category::Other);
    }

    #[test]
    fn test_categorize_is_deterministic() {
        let mapper = FileMapper::default();
        for ext in ["png", "docx", "mkv", "flac", "7z", "py", "dmg", "unknown"] {
            assert_eq!(mapper.categorize(Some(ext)), mapper.categorize(Some(ext)));
        }
    }

    #[test]
    fn test_every_standard_extension_maps_to_exactly_one_category() {
        let mut owner: HashMap<&str, Category> = HashMap::new();
        for (category, extensions) in STANDARD {
            assert_ne!(*category, Category::Other);
            for ext in *extensions {
                if let Some(previous) = owner.insert(*ext, *category) {
                    panic!("{ext} is listed under both {previous:?} and {category:?}");
                }
            }
        }

        let mapper = FileMapper::default();
        assert_eq!(mapper.extension_map.len(), owner.len());
        for (ext, category) in owner {
            assert_eq!(mapper.extension_to_category(ext), Some(category));
        }
    }

    #[test]
    fn test_custom_mapping() {
        let mut mapper = FileMapper::default();
        mapper.add_extension_mapping(".heic", Category::Images);
        mapper.add_extension_mapping("json", Category::Documents);

        assert_eq!(mapper.extension_to_category("heic"), Some(Category::Images));
        assert_eq!(
            mapper.extension_to_category("json"),
            Some(Category::Documents)
        );
    }

    #[test]
    fn test_empty_mapper_is_all_other() {
        let mapper = FileMapper::empty();
        assert_eq!(mapper.categorize(Some("png")), Category::Other);
    }
}
