//! Collision-safe file relocation.
//!
//! Moves a file into a target directory without ever overwriting: if the
//! name is taken, `_1`, `_2`, ... is inserted before the extension until a
//! free name is found.

use crate::error::MoveError;
use std::ffi::OsString;
use std::fs;
use std::path::{Path, PathBuf};
use tracing::debug;

/// What happened to a file handed to [`move_into`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum MoveOutcome {
    /// The file now lives at this path.
    Moved(PathBuf),
    /// The file already sat in the target directory; nothing was done.
    LeftInPlace,
}

/// Moves `source` into `target_dir`, creating the directory (and parents)
/// if needed.
///
/// The source is untouched if the directory cannot be created or the
/// rename fails.
///
/// # Examples
///
/// ```no_run
/// use dlsweep::mover::{move_into, MoveOutcome};
/// use std::path::Path;
///
/// match move_into(Path::new("/tmp/dl/photo.png"), Path::new("/tmp/dl/Images")) {
///     Ok(MoveOutcome::Moved(to)) => println!("moved to {}", to.display()),
///     Ok(MoveOutcome::LeftInPlace) => println!("already organized"),
///     Err(e) => eprintln!("move failed: {}", e),
/// }
/// ```
pub fn move_into(source: &Path, target_dir: &Path) -> Result<MoveOutcome, MoveError> {
    if source.parent() == Some(target_dir) {
        return Ok(MoveOutcome::LeftInPlace);
    }

    let file_name = source
        .file_name()
        .ok_or_else(|| MoveError::NoFileName(source.to_path_buf()))?;

    fs::create_dir_all(target_dir).map_err(|e| MoveError::DirectoryCreation {
        path: target_dir.to_path_buf(),
        source: e,
    })?;

    let destination = free_destination(target_dir, Path::new(file_name));

    fs::rename(source, &destination).map_err(|e| MoveError::Rename {
        from: source.to_path_buf(),
        to: destination.clone(),
        source: e,
    })?;

    debug!(from = %source.display(), to = %destination.display(), "moved file");
    Ok(MoveOutcome::Moved(destination))
}

/// First path in `dir` for `name` that no directory entry occupies yet.
///
/// `report.pdf` becomes `report_1.pdf`, `report_2.pdf`, ...; a name without
/// an extension just gets the suffix appended.
pub fn free_destination(dir: &Path, name: &Path) -> PathBuf {
    let candidate = dir.join(name);
    if !is_taken(&candidate) {
        return candidate;
    }

    let stem = name.file_stem().unwrap_or(name.as_os_str());
    let extension = name.extension();

    (1u64..)
        .map(|counter| {
            let mut file_name = OsString::from(stem);
            file_name.push(format!("_{counter}"));
            if let Some(ext) = extension {
                file_name.push(".");
                file_name.push(ext);
            }
            dir.join(file_name)
        })
        .find(|path| !is_taken(path))
        .unwrap_or(candidate)
}

/// Any directory entry counts, including a dangling symlink.
fn is_taken(path: &Path) -> bool {
    fs::symlink_metadata(path).is_ok()
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[test]
    fn test_move_creates_directory() {
        let temp_dir = TempDir::new().expect("Failed to create temp directory");
        let base_path = temp_dir.path();

        let file_path = base_path.join("test.txt");
        fs::write(&file_path, "test content").expect("Failed to write test file");

        let target = base_path.join("Documents");
        let outcome = move_into(&file_path, &target).expect("Failed to move file");

        assert_eq!(outcome, MoveOutcome::Moved(target.join("test.txt")));
        assert!(target.is_dir());
        assert!(!file_path.exists());
        assert!(target.join("test.txt").exists());
    }

    #[test]
    fn test_move_creates_nested_directories() {
        let temp_dir = TempDir::new().expect("Failed to create temp directory");
        let file_path = temp_dir.path().join("clip.mp4");
        fs::write(&file_path, "x").unwrap();

        let target = temp_dir.path().join("2024").join("03-March");
        move_into(&file_path, &target).expect("Failed to move file");
        assert!(target.join("clip.mp4").exists());
    }

    #[test]
    fn test_collision_appends_counter() {
        let temp_dir = TempDir::new().expect("Failed to create temp directory");
        let target = temp_dir.path().join("Documents");
        fs::create_dir(&target).unwrap();
        fs::write(target.join("report.pdf"), "existing").unwrap();
        fs::write(target.join("report_1.pdf"), "existing too").unwrap();

        let incoming = temp_dir.path().join("report.pdf");
        fs::write(&incoming, "new").unwrap();

        let outcome = move_into(&incoming, &target).unwrap();
        assert_eq!(outcome, MoveOutcome::Moved(target.join("report_2.pdf")));
        assert_eq!(fs::read_to_string(target.join("report.pdf")).unwrap(), "existing");
        assert_eq!(
            fs::read_to_string(target.join("report_1.pdf")).unwrap(),
            "existing too"
        );
        assert_eq!(fs::read_to_string(target.join("report_2.pdf")).unwrap(), "new");
    }

    #[test]
    fn test_collision_without_extension() {
        let temp_dir = TempDir::new().expect("Failed to create temp directory");
        fs::write(temp_dir.path().join("README"), "a").unwrap();
        assert_eq!(
            free_destination(temp_dir.path(), Path::new("README")),
            temp_dir.path().join("README_1")
        );
    }

    #[test]
    fn test_file_already_in_target_is_left_in_place() {
        let temp_dir = TempDir::new().expect("Failed to create temp directory");
        let target = temp_dir.path().join("Images");
        fs::create_dir(&target).unwrap();
        let file_path = target.join("cat.png");
        fs::write(&file_path, "meow").unwrap();

        assert_eq!(
            move_into(&file_path, &target).unwrap(),
            MoveOutcome::LeftInPlace
        );
        assert!(file_path.exists());
    }

    #[test]
    fn test_move_fails_when_directory_cannot_be_created() {
        let temp_dir = TempDir::new().expect("Failed to create temp directory");
        let blocker = temp_dir.path().join("Images");
        fs::write(&blocker, "a file where a directory should be").unwrap();
        let file_path = temp_dir.path().join("cat.png");
        fs::write(&file_path, "meow").unwrap();

        let result = move_into(&file_path, &blocker.join("nested"));
        assert!(matches!(result, Err(MoveError::DirectoryCreation { .. })));
        assert!(file_path.exists(), "source must be untouched");
    }

    #[cfg(unix)]
    #[test]
    fn test_dangling_symlink_is_not_replaced() {
        let temp_dir = TempDir::new().expect("Failed to create temp directory");
        let target = temp_dir.path().join("Documents");
        fs::create_dir(&target).unwrap();
        std::os::unix::fs::symlink(temp_dir.path().join("gone"), target.join("notes.txt")).unwrap();

        let incoming = temp_dir.path().join("notes.txt");
        fs::write(&incoming, "new").unwrap();

        let outcome = move_into(&incoming, &target).unwrap();
        assert_eq!(outcome, MoveOutcome::Moved(target.join("notes_1.txt")));
        assert!(
            fs::symlink_metadata(target.join("notes.txt"))
                .unwrap()
                .file_type()
                .is_symlink()
        );
    }
}
