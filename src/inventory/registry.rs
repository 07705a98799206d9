//! The JSON file recording what is installed.
//!
//! ```json
//! {"installed_software": {"git": {"version": "2.43.0", "installed_date": "...", "auto_update": false}}}
//! ```
//!
//! A missing or unparseable file reads as an empty registry. Every
//! read-modify-write holds one lock for its whole duration so concurrent
//! requests cannot lose each other's updates.

use super::InventoryError;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::fs;
use std::path::{Path, PathBuf};
use std::sync::{Mutex, MutexGuard};
use tracing::{debug, warn};

const REGISTRY_FILE: &str = "software_registry.json";

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct InstalledSoftware {
    pub version: String,
    pub installed_date: String,
    #[serde(default)]
    pub auto_update: bool,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct RegistryData {
    #[serde(default)]
    pub installed_software: BTreeMap<String, InstalledSoftware>,
}

#[derive(Debug)]
pub struct Registry {
    path: PathBuf,
    lock: Mutex<()>,
}

impl Registry {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self {
            path: path.into(),
            lock: Mutex::new(()),
        }
    }

    /// `<data_dir>/dlsweep/software_registry.json`.
    pub fn default_path() -> Option<PathBuf> {
        let base = directories::BaseDirs::new()?;
        Some(base.data_dir().join("dlsweep").join(REGISTRY_FILE))
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// A consistent snapshot of the registry.
    pub fn read(&self) -> RegistryData {
        let _guard = self.guard();
        self.load()
    }

    /// Runs `change` against the current contents and persists the result.
    ///
    /// Nothing is written when `change` fails.
    pub fn modify<T>(
        &self,
        change: impl FnOnce(&mut RegistryData) -> Result<T, InventoryError>,
    ) -> Result<T, InventoryError> {
        let _guard = self.guard();
        let mut data = self.load();
        let value = change(&mut data)?;
        self.save(&data)?;
        Ok(value)
    }

    fn guard(&self) -> MutexGuard<'_, ()> {
        // The guarded data lives on disk; a panicked holder leaves nothing torn in memory.
        self.lock.lock().unwrap_or_else(|poisoned| poisoned.into_inner())
    }

    fn load(&self) -> RegistryData {
        let content = match fs::read_to_string(&self.path) {
            Ok(content) => content,
            Err(_) => return RegistryData::default(),
        };
        match serde_json::from_str(&content) {
            Ok(data) => data,
            Err(e) => {
                warn!("Ignoring unreadable registry {}: {}", self.path.display(), e);
                RegistryData::default()
            }
        }
    }

    fn save(&self, data: &RegistryData) -> Result<(), InventoryError> {
        if let Some(parent) = self.path.parent()
            && !parent.as_os_str().is_empty()
        {
            fs::create_dir_all(parent).map_err(|e| InventoryError::Registry(e.to_string()))?;
        }
        let json = serde_json::to_string_pretty(data)
            .map_err(|e| InventoryError::Registry(e.to_string()))?;
        fs::write(&self.path, json).map_err(|e| InventoryError::Registry(e.to_string()))?;
        debug!(path = %self.path.display(), "saved registry");
        Ok(())
    }
}
