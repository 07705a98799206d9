//! Root resolution and validation.

use crate::error::{EngineError, EngineResult};
use std::path::{Path, PathBuf};

/// A directory that existed when an operation started.
///
/// Every operation is scoped to one `Root`; holding one means the
/// existence check has already passed.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Root {
    path: PathBuf,
}

impl Root {
    /// Validates that `path` is an existing directory.
    pub fn open(path: impl AsRef<Path>) -> EngineResult<Self> {
        let path = path.as_ref();
        if !path.is_dir() {
            return Err(EngineError::PathNotFound(path.to_path_buf()));
        }
        Ok(Self {
            path: path.to_path_buf(),
        })
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    pub fn join(&self, rel: impl AsRef<Path>) -> PathBuf {
        self.path.join(rel)
    }

    /// Renders `path` relative to the root with `/` separators.
    ///
    /// Paths outside the root are rendered in full.
    pub fn display_relative(&self, path: &Path) -> String {
        match path.strip_prefix(&self.path) {
            Ok(rel) => rel
                .components()
                .map(|c| c.as_os_str().to_string_lossy())
                .collect::<Vec<_>>()
                .join("/"),
            Err(_) => path.display().to_string(),
        }
    }
}

/// Picks the root for a request: the explicit argument, the configured
/// default, or the platform downloads directory, in that order.
#[derive(Debug, Clone, Default)]
pub struct PathResolver {
    default_root: Option<PathBuf>,
}

impl PathResolver {
    pub fn new(default_root: Option<PathBuf>) -> Self {
        Self { default_root }
    }

    /// Resolves and validates the root.
    pub fn resolve(&self, explicit: Option<&Path>) -> EngineResult<Root> {
        let path = match explicit {
            Some(p) => expand_home(p),
            None => self.default_path().ok_or(EngineError::NoDefaultRoot)?,
        };
        Root::open(path)
    }

    /// The root used when a request does not name one.
    pub fn default_path(&self) -> Option<PathBuf> {
        if let Some(root) = &self.default_root {
            return Some(expand_home(root));
        }
        platform_downloads_dir()
    }
}

/// The user's downloads directory, or `<home>/Downloads` when the
/// platform does not define one.
pub fn platform_downloads_dir() -> Option<PathBuf> {
    let user_dirs = directories::UserDirs::new()?;
    Some(
        user_dirs
            .download_dir()
            .map(Path::to_path_buf)
            .unwrap_or_else(|| user_dirs.home_dir().join("Downloads")),
    )
}

fn expand_home(path: &Path) -> PathBuf {
    let Ok(rest) = path.strip_prefix("~") else {
        return path.to_path_buf();
    };
    match directories::BaseDirs::new() {
        Some(base) => base.home_dir().join(rest),
        None => path.to_path_buf(),
    }
}
