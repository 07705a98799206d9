//! Simulated software inventory.
//!
//! Installs and updates are bookkeeping only: the registry records the
//! catalog's latest version, nothing is downloaded or executed.

mod catalog;
mod registry;

pub use catalog::{Catalog, CatalogEntry};
pub use registry::{InstalledSoftware, Registry, RegistryData};

use chrono::Local;
use serde::Serialize;
use thiserror::Error;
use tracing::info;

/// Longest accepted software or task name, in characters.
pub const MAX_NAME_LEN: usize = 100;

#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum InventoryError {
    #[error("{0}")]
    InvalidInput(String),

    #[error("Software '{0}' not found")]
    SoftwareNotFound(String),

    #[error("Task '{task}' not found. Available tasks: {available}")]
    TaskNotFound { task: String, available: String },

    #[error("Software '{0}' is already installed")]
    AlreadyInstalled(String),

    #[error("Software '{0}' is not installed")]
    NotInstalled(String),

    #[error("Software '{name}' is already up to date (v{version})")]
    UpToDate { name: String, version: String },

    #[error("Registry error: {0}")]
    Registry(String),
}

impl InventoryError {
    /// Stable machine-readable code.
    pub fn code(&self) -> &'static str {
        match self {
            Self::InvalidInput(_) => "invalid_input",
            Self::SoftwareNotFound(_) | Self::TaskNotFound { .. } => "software_not_found",
            Self::AlreadyInstalled(_) => "already_installed",
            Self::NotInstalled(_) => "not_installed",
            Self::UpToDate { .. } => "up_to_date",
            Self::Registry(_) => "registry_error",
        }
    }
}

pub type InventoryResult<T> = Result<T, InventoryError>;

/// Trims, bounds and lower-cases a software or task name.
pub fn normalize_name(kind: &str, raw: &str) -> InventoryResult<String> {
    let trimmed = raw.trim();
    if trimmed.is_empty() {
        return Err(InventoryError::InvalidInput(format!(
            "{kind} cannot be empty or whitespace"
        )));
    }
    if trimmed.chars().count() > MAX_NAME_LEN {
        return Err(InventoryError::InvalidInput(format!(
            "{kind} must be at most {MAX_NAME_LEN} characters"
        )));
    }
    Ok(trimmed.to_lowercase())
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct InstallReport {
    pub software: String,
    pub version: String,
    pub status: &'static str,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct UninstallReport {
    pub software: String,
    pub status: &'static str,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct InstalledEntry {
    pub name: String,
    pub version: String,
    pub description: String,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct InstalledList {
    pub installed_software: Vec<InstalledEntry>,
    pub count: usize,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct AvailableUpdate {
    pub name: String,
    pub current_version: String,
    pub latest_version: String,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct UpdateCheck {
    pub available_updates: Vec<AvailableUpdate>,
    pub count: usize,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct UpdateReport {
    pub software: String,
    pub old_version: String,
    pub new_version: String,
    pub status: &'static str,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Recommendation {
    pub name: String,
    pub description: String,
    pub latest_version: String,
    pub installed: bool,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Recommendations {
    pub task: String,
    pub recommendations: Vec<Recommendation>,
    pub count: usize,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct AutoUpdateReport {
    pub software: String,
    pub auto_update: bool,
    pub status: String,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct SoftwareInfo {
    pub name: String,
    pub description: String,
    pub latest_version: String,
    pub current_version: Option<String>,
    pub installed: bool,
    pub auto_update: bool,
}

/// Catalog lookups plus the persistent registry.
#[derive(Debug)]
pub struct Inventory {
    catalog: Catalog,
    registry: Registry,
}

impl Inventory {
    pub fn new(catalog: Catalog, registry: Registry) -> Self {
        Self { catalog, registry }
    }

    pub fn catalog(&self) -> &Catalog {
        &self.catalog
    }

    pub fn registry(&self) -> &Registry {
        &self.registry
    }

    pub fn install(&self, raw_name: &str) -> InventoryResult<InstallReport> {
        let (name, entry) = self.lookup(raw_name)?;
        let version = entry.latest_version.clone();

        self.registry.modify(|data| {
            if data.installed_software.contains_key(&name) {
                return Err(InventoryError::AlreadyInstalled(name.clone()));
            }
            data.installed_software.insert(
                name.clone(),
                InstalledSoftware {
                    version: version.clone(),
                    installed_date: Local::now().to_rfc3339(),
                    auto_update: false,
                },
            );
            Ok(())
        })?;

        info!(software = %name, %version, "installed");
        Ok(InstallReport {
            software: name,
            version,
            status: "installed",
        })
    }

    pub fn uninstall(&self, raw_name: &str) -> InventoryResult<UninstallReport> {
        let (name, _) = self.lookup(raw_name)?;

        self.registry.modify(|data| {
            data.installed_software
                .remove(&name)
                .map(|_| ())
                .ok_or_else(|| InventoryError::NotInstalled(name.clone()))
        })?;

        info!(software = %name, "uninstalled");
        Ok(UninstallReport {
            software: name,
            status: "uninstalled",
        })
    }

    pub fn list(&self) -> InstalledList {
        let installed_software: Vec<InstalledEntry> = self
            .registry
            .read()
            .installed_software
            .into_iter()
            .map(|(name, installed)| InstalledEntry {
                description: self
                    .catalog
                    .get(&name)
                    .map(|e| e.description.clone())
                    .unwrap_or_default(),
                name,
                version: installed.version,
            })
            .collect();

        InstalledList {
            count: installed_software.len(),
            installed_software,
        }
    }

    pub fn check_updates(&self) -> UpdateCheck {
        let available_updates: Vec<AvailableUpdate> = self
            .registry
            .read()
            .installed_software
            .into_iter()
            .filter_map(|(name, installed)| {
                let latest = &self.catalog.get(&name)?.latest_version;
                (installed.version != *latest).then(|| AvailableUpdate {
                    latest_version: latest.clone(),
                    current_version: installed.version,
                    name,
                })
            })
            .collect();

        UpdateCheck {
            count: available_updates.len(),
            available_updates,
        }
    }

    pub fn update(&self, raw_name: &str) -> InventoryResult<UpdateReport> {
        let (name, entry) = self.lookup(raw_name)?;
        let latest = entry.latest_version.clone();

        let old_version = self.registry.modify(|data| {
            let installed = data
                .installed_software
                .get_mut(&name)
                .ok_or_else(|| InventoryError::NotInstalled(name.clone()))?;
            if installed.version == latest {
                return Err(InventoryError::UpToDate {
                    name: name.clone(),
                    version: latest.clone(),
                });
            }
            Ok(std::mem::replace(&mut installed.version, latest.clone()))
        })?;

        info!(software = %name, from = %old_version, to = %latest, "updated");
        Ok(UpdateReport {
            software: name,
            old_version,
            new_version: latest,
            status: "updated",
        })
    }

    pub fn recommend(&self, raw_task: &str) -> InventoryResult<Recommendations> {
        let task = normalize_name("Task", raw_task)?;
        let names = self
            .catalog
            .recommendations(&task)
            .ok_or_else(|| InventoryError::TaskNotFound {
                task: task.clone(),
                available: self.catalog.task_names().collect::<Vec<_>>().join(", "),
            })?;

        let installed = self.registry.read().installed_software;
        let recommendations: Vec<Recommendation> = names
            .iter()
            .map(|name| {
                let entry = self.catalog.get(name);
                Recommendation {
                    name: name.clone(),
                    description: entry.map(|e| e.description.clone()).unwrap_or_default(),
                    latest_version: entry.map(|e| e.latest_version.clone()).unwrap_or_default(),
                    installed: installed.contains_key(name),
                }
            })
            .collect();

        Ok(Recommendations {
            task,
            count: recommendations.len(),
            recommendations,
        })
    }

    pub fn set_auto_update(&self, raw_name: &str, enabled: bool) -> InventoryResult<AutoUpdateReport> {
        let (name, _) = self.lookup(raw_name)?;

        self.registry.modify(|data| {
            let installed = data
                .installed_software
                .get_mut(&name)
                .ok_or_else(|| InventoryError::NotInstalled(name.clone()))?;
            installed.auto_update = enabled;
            Ok(())
        })?;

        let state = if enabled { "enabled" } else { "disabled" };
        Ok(AutoUpdateReport {
            software: name,
            auto_update: enabled,
            status: format!("Auto-update {state}"),
        })
    }

    pub fn info(&self, raw_name: &str) -> InventoryResult<SoftwareInfo> {
        let (name, entry) = self.lookup(raw_name)?;
        let installed = self.registry.read().installed_software.remove(&name);

        Ok(SoftwareInfo {
            description: entry.description.clone(),
            latest_version: entry.latest_version.clone(),
            installed: installed.is_some(),
            auto_update: installed.as_ref().is_some_and(|i| i.auto_update),
            current_version: installed.map(|i| i.version),
            name,
        })
    }

    fn lookup(&self, raw_name: &str) -> InventoryResult<(String, &CatalogEntry)> {
        let name = normalize_name("Software name", raw_name)?;
        match self.catalog.get(&name) {
            Some(entry) => Ok((name, entry)),
            None => Err(InventoryError::SoftwareNotFound(name)),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    fn inventory() -> (TempDir, Inventory) {
        let temp_dir = TempDir::new().expect("Failed to create temp directory");
        let registry = Registry::new(temp_dir.path().join("registry.json"));
        (temp_dir, Inventory::new(Catalog::builtin(), registry))
    }

    #[test]
    fn test_name_validation() {
        assert_eq!(normalize_name("Software name", "  Git ").unwrap(), "git");
        assert_eq!(
            normalize_name("Software name", "   ").unwrap_err().code(),
            "invalid_input"
        );
        assert!(normalize_name("Software name", &"x".repeat(MAX_NAME_LEN)).is_ok());
        assert!(normalize_name("Software name", &"x".repeat(MAX_NAME_LEN + 1)).is_err());
    }

    #[test]
    fn test_install_then_reinstall() {
        let (_dir, inventory) = inventory();

        let report = inventory.install("Python").unwrap();
        assert_eq!(report.software, "python");
        assert_eq!(report.version, "3.11.0");

        let err = inventory.install("python").unwrap_err();
        assert_eq!(err.code(), "already_installed");
        assert_eq!(inventory.list().count, 1);
    }

    #[test]
    fn test_unknown_software() {
        let (_dir, inventory) = inventory();
        let err = inventory.install("emacs").unwrap_err();
        assert_eq!(err, InventoryError::SoftwareNotFound("emacs".to_string()));
        assert_eq!(err.to_string(), "Software 'emacs' not found");
    }

    #[test]
    fn test_uninstall_requires_install() {
        let (_dir, inventory) = inventory();
        assert_eq!(inventory.uninstall("git").unwrap_err().code(), "not_installed");

        inventory.install("git").unwrap();
        assert_eq!(inventory.uninstall("git").unwrap().status, "uninstalled");
        assert_eq!(inventory.list().count, 0);
    }

    #[test]
    fn test_update_flow() {
        let (_dir, inventory) = inventory();
        inventory.install("docker").unwrap();
        assert_eq!(inventory.update("docker").unwrap_err().code(), "up_to_date");
        assert_eq!(inventory.check_updates().count, 0);

        inventory
            .registry()
            .modify(|data| {
                data.installed_software.get_mut("docker").unwrap().version = "24.0.0".to_string();
                Ok(())
            })
            .unwrap();

        let check = inventory.check_updates();
        assert_eq!(check.count, 1);
        assert_eq!(check.available_updates[0].current_version, "24.0.0");

        let report = inventory.update("docker").unwrap();
        assert_eq!(report.old_version, "24.0.0");
        assert_eq!(report.new_version, "25.0.1");
        assert_eq!(inventory.check_updates().count, 0);
    }

    #[test]
    fn test_recommendations_mark_installed() {
        let (_dir, inventory) = inventory();
        inventory.install("git").unwrap();

        let recs = inventory.recommend(" Containerization ").unwrap();
        assert_eq!(recs.task, "containerization");
        assert_eq!(recs.count, 2);
        assert!(!recs.recommendations[0].installed);
        assert!(recs.recommendations[1].installed);

        let err = inventory.recommend("gardening").unwrap_err();
        assert_eq!(err.code(), "software_not_found");
        assert!(err.to_string().contains("web development"));
    }

    #[test]
    fn test_auto_update_and_info() {
        let (_dir, inventory) = inventory();
        assert_eq!(
            inventory.set_auto_update("java", true).unwrap_err().code(),
            "not_installed"
        );

        inventory.install("java").unwrap();
        let report = inventory.set_auto_update("java", true).unwrap();
        assert_eq!(report.status, "Auto-update enabled");

        let info = inventory.info("JAVA").unwrap();
        assert!(info.installed);
        assert!(info.auto_update);
        assert_eq!(info.current_version.as_deref(), Some("21.0.1"));

        let info = inventory.info("mysql").unwrap();
        assert!(!info.installed);
        assert_eq!(info.current_version, None);
    }
}
