//! The file-organization engine.
//!
//! `Engine` owns the immutable configuration every operation needs (the
//! extension table and the compiled filters) and exposes one method per
//! operation. Each method validates the root first and then re-walks the
//! tree; nothing is cached between calls.

use crate::archiver;
use crate::config::{CompiledFilters, Config, ConfigError};
use crate::duplicates;
use crate::error::EngineResult;
use crate::extractor;
use crate::file_category::FileMapper;
use crate::file_organizer;
use crate::paths::Root;
use crate::report::{
    ArchiveReport, DateOrganizeReport, DuplicateReport, ExtractReport, FolderStats,
    OldFilesReport, TypeOrganizeReport,
};
use crate::retention;
use crate::stats;
use std::path::Path;

pub const DEFAULT_CLEAN_DAYS: u64 = 90;
pub const DEFAULT_ARCHIVE_DAYS: u64 = 180;

#[derive(Debug, Clone, Default)]
pub struct Engine {
    mapper: FileMapper,
    filters: CompiledFilters,
}

impl Engine {
    pub fn new(mapper: FileMapper, filters: CompiledFilters) -> Self {
        Self { mapper, filters }
    }

    pub fn from_config(config: &Config) -> Result<Self, ConfigError> {
        Ok(Self::new(config.file_mapper(), config.compile_filters()?))
    }

    pub fn mapper(&self) -> &FileMapper {
        &self.mapper
    }

    pub fn organize_by_type(&self, root: &Path, dry_run: bool) -> EngineResult<TypeOrganizeReport> {
        let root = Root::open(root)?;
        Ok(file_organizer::organize_by_type(
            &root,
            &self.filters,
            &self.mapper,
            dry_run,
        ))
    }

    pub fn organize_by_date(&self, root: &Path, dry_run: bool) -> EngineResult<DateOrganizeReport> {
        let root = Root::open(root)?;
        Ok(file_organizer::organize_by_date(&root, &self.filters, dry_run))
    }

    pub fn find_duplicates(&self, root: &Path, delete: bool) -> EngineResult<DuplicateReport> {
        let root = Root::open(root)?;
        Ok(duplicates::find_duplicates(&root, &self.filters, delete))
    }

    pub fn clean_old_files(
        &self,
        root: &Path,
        days_old: u64,
        delete: bool,
    ) -> EngineResult<OldFilesReport> {
        let root = Root::open(root)?;
        Ok(retention::clean_old_files(
            &root,
            &self.filters,
            days_old,
            delete,
        ))
    }

    pub fn folder_stats(&self, root: &Path) -> EngineResult<FolderStats> {
        let root = Root::open(root)?;
        Ok(stats::folder_stats(&root, &self.filters, &self.mapper))
    }

    pub fn archive_old_files(
        &self,
        root: &Path,
        days_old: u64,
        archive_name: Option<&str>,
    ) -> EngineResult<ArchiveReport> {
        let root = Root::open(root)?;
        archiver::archive_old_files(&root, &self.filters, days_old, archive_name)
    }

    pub fn extract_archives(&self, root: &Path, delete_after: bool) -> EngineResult<ExtractReport> {
        let root = Root::open(root)?;
        Ok(extractor::extract_all(&root, &self.filters, delete_after))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::EngineError;

    #[test]
    fn test_every_operation_fails_fast_on_missing_root() {
        let engine = Engine::default();
        let missing = Path::new("/non/existent/downloads");

        assert!(matches!(
            engine.organize_by_type(missing, true),
            Err(EngineError::PathNotFound(_))
        ));
        assert!(matches!(
            engine.organize_by_date(missing, true),
            Err(EngineError::PathNotFound(_))
        ));
        assert!(matches!(
            engine.find_duplicates(missing, false),
            Err(EngineError::PathNotFound(_))
        ));
        assert!(matches!(
            engine.clean_old_files(missing, DEFAULT_CLEAN_DAYS, false),
            Err(EngineError::PathNotFound(_))
        ));
        assert!(matches!(
            engine.folder_stats(missing),
            Err(EngineError::PathNotFound(_))
        ));
        assert!(matches!(
            engine.archive_old_files(missing, DEFAULT_ARCHIVE_DAYS, None),
            Err(EngineError::PathNotFound(_))
        ));
        assert!(matches!(
            engine.extract_archives(missing, false),
            Err(EngineError::PathNotFound(_))
        ));
    }

    #[test]
    fn test_engine_uses_injected_mapper() {
        let temp_dir = tempfile::TempDir::new().unwrap();
        std::fs::write(temp_dir.path().join("photo.heic"), "x").unwrap();

        let config = Config::from_toml("[categories.extensions]\nheic = \"Images\"\n").unwrap();
        let engine = Engine::from_config(&config).unwrap();

        let report = engine.organize_by_type(temp_dir.path(), true).unwrap();
        assert!(report.report.moved_files.contains_key("Images"));
    }
}
