//! Error taxonomy for dlsweep.
//!
//! Whole-call failures (`EngineError`) stop an operation before it touches
//! anything. Per-file failures (`FileError`, `MoveError`) are collected into
//! the operation's report and the walk carries on.

use std::io;
use std::path::PathBuf;
use thiserror::Error;

pub use crate::config::ConfigError;

/// Failures that abort a whole operation.
#[derive(Error, Debug)]
pub enum EngineError {
    /// The root is missing or is not a directory.
    #[error("Path {} does not exist", .0.display())]
    PathNotFound(PathBuf),

    /// No root was given and no default downloads directory could be found.
    #[error("No root given and no default downloads directory could be determined")]
    NoDefaultRoot,

    /// The archive container itself could not be created or finalized.
    #[error("Failed to create archive {}: {reason}", path.display())]
    ArchiveCreation { path: PathBuf, reason: String },

    #[error(transparent)]
    Config(#[from] ConfigError),
}

/// A read, write or permission failure on a single file.
#[derive(Error, Debug)]
pub enum FileError {
    #[error("{}: {source}", path.display())]
    Io { path: PathBuf, source: io::Error },

    #[error("{}: {reason}", path.display())]
    Archive { path: PathBuf, reason: String },
}

impl FileError {
    pub fn io(path: impl Into<PathBuf>, source: io::Error) -> Self {
        Self::Io {
            path: path.into(),
            source,
        }
    }
}

/// Errors raised while relocating a file into a target directory.
///
/// When one of these is returned the source file has not been moved.
#[derive(Error, Debug)]
pub enum MoveError {
    /// Failed to create the destination directory.
    #[error("Failed to create directory {}: {source}", path.display())]
    DirectoryCreation { path: PathBuf, source: io::Error },

    /// Failed to rename the file into place.
    #[error("Failed to move {} to {}: {source}", from.display(), to.display())]
    Rename {
        from: PathBuf,
        to: PathBuf,
        source: io::Error,
    },

    /// The source path has no final component to reuse as a name.
    #[error("{} has no file name component", .0.display())]
    NoFileName(PathBuf),
}

pub type EngineResult<T> = Result<T, EngineError>;
