//! Request/response layer over the engine and the inventory.
//!
//! Requests are JSON objects tagged by `"tool"`:
//!
//! ```json
//! {"tool": "clean-old-files", "root": "~/Downloads", "daysOld": 30, "delete": false}
//! ```
//!
//! Every response uses the same envelope: `{"ok": true, "data": {...}}` on
//! success, `{"ok": false, "error": "..."}` on failure.

use crate::config::{Config, ConfigError};
use crate::engine::{DEFAULT_ARCHIVE_DAYS, DEFAULT_CLEAN_DAYS, Engine};
use crate::error::EngineResult;
use crate::inventory::{Catalog, Inventory, InventoryResult, Registry};
use crate::paths::PathResolver;
use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::path::PathBuf;
use tracing::debug;

const FALLBACK_REGISTRY: &str = "software_registry.json";

fn default_clean_days() -> u64 {
    DEFAULT_CLEAN_DAYS
}

fn default_archive_days() -> u64 {
    DEFAULT_ARCHIVE_DAYS
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "tool", rename_all = "kebab-case", rename_all_fields = "camelCase")]
pub enum ToolRequest {
    OrganizeByType {
        #[serde(default)]
        root: Option<PathBuf>,
        #[serde(default)]
        dry_run: bool,
    },
    FindDuplicates {
        #[serde(default)]
        root: Option<PathBuf>,
        #[serde(default)]
        delete: bool,
    },
    CleanOldFiles {
        #[serde(default)]
        root: Option<PathBuf>,
        #[serde(default = "default_clean_days")]
        days_old: u64,
        #[serde(default)]
        delete: bool,
    },
    FolderStats {
        #[serde(default)]
        root: Option<PathBuf>,
    },
    OrganizeByDate {
        #[serde(default)]
        root: Option<PathBuf>,
        #[serde(default)]
        dry_run: bool,
    },
    ArchiveOldFiles {
        #[serde(default)]
        root: Option<PathBuf>,
        #[serde(default = "default_archive_days")]
        days_old: u64,
        #[serde(default)]
        archive_name: Option<String>,
    },
    ExtractArchives {
        #[serde(default)]
        root: Option<PathBuf>,
        #[serde(default)]
        delete_after: bool,
    },
    InstallSoftware {
        name: String,
    },
    UninstallSoftware {
        name: String,
    },
    ListInstalledSoftware,
    CheckUpdates,
    UpdateSoftware {
        name: String,
    },
    GetRecommendations {
        task: String,
    },
    SetAutoUpdate {
        name: String,
        enabled: bool,
    },
    GetSoftwareInfo {
        name: String,
    },
}

impl ToolRequest {
    /// The wire name of the tool.
    pub fn tool_name(&self) -> &'static str {
        match self {
            Self::OrganizeByType { .. } => "organize-by-type",
            Self::FindDuplicates { .. } => "find-duplicates",
            Self::CleanOldFiles { .. } => "clean-old-files",
            Self::FolderStats { .. } => "folder-stats",
            Self::OrganizeByDate { .. } => "organize-by-date",
            Self::ArchiveOldFiles { .. } => "archive-old-files",
            Self::ExtractArchives { .. } => "extract-archives",
            Self::InstallSoftware { .. } => "install-software",
            Self::UninstallSoftware { .. } => "uninstall-software",
            Self::ListInstalledSoftware => "list-installed-software",
            Self::CheckUpdates => "check-updates",
            Self::UpdateSoftware { .. } => "update-software",
            Self::GetRecommendations { .. } => "get-recommendations",
            Self::SetAutoUpdate { .. } => "set-auto-update",
            Self::GetSoftwareInfo { .. } => "get-software-info",
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ToolResponse {
    pub ok: bool,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub data: Option<Value>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
    /// Machine-readable code, present for inventory failures.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub code: Option<String>,
}

impl ToolResponse {
    pub fn success(data: impl Serialize) -> Self {
        match serde_json::to_value(data) {
            Ok(data) => Self {
                ok: true,
                data: Some(data),
                error: None,
                code: None,
            },
            Err(e) => Self::failure(format!("Failed to serialize result: {e}")),
        }
    }

    pub fn failure(error: impl Into<String>) -> Self {
        Self {
            ok: false,
            data: None,
            error: Some(error.into()),
            code: None,
        }
    }

    fn from_engine<T: Serialize>(result: EngineResult<T>) -> Self {
        match result {
            Ok(data) => Self::success(data),
            Err(e) => Self::failure(e.to_string()),
        }
    }

    fn from_inventory<T: Serialize>(result: InventoryResult<T>) -> Self {
        match result {
            Ok(data) => Self::success(data),
            Err(e) => Self {
                code: Some(e.code().to_string()),
                ..Self::failure(e.to_string())
            },
        }
    }
}

/// Routes requests to the engine or the inventory.
///
/// Shared by reference across worker threads; all of its state is either
/// immutable or internally locked.
#[derive(Debug)]
pub struct ToolDispatcher {
    engine: Engine,
    resolver: PathResolver,
    inventory: Inventory,
}

impl ToolDispatcher {
    pub fn new(engine: Engine, resolver: PathResolver, inventory: Inventory) -> Self {
        Self {
            engine,
            resolver,
            inventory,
        }
    }

    pub fn from_config(config: &Config) -> Result<Self, ConfigError> {
        let registry_path = config
            .registry_path
            .clone()
            .or_else(Registry::default_path)
            .unwrap_or_else(|| PathBuf::from(FALLBACK_REGISTRY));

        Ok(Self::new(
            Engine::from_config(config)?,
            PathResolver::new(config.default_root.clone()),
            Inventory::new(Catalog::builtin(), Registry::new(registry_path)),
        ))
    }

    pub fn handle(&self, request: ToolRequest) -> ToolResponse {
        debug!(tool = request.tool_name(), "handling request");
        let engine = &self.engine;
        let inventory = &self.inventory;

        match request {
            ToolRequest::OrganizeByType { root, dry_run } => {
                ToolResponse::from_engine(self.with_root(root, |r| engine.organize_by_type(r, dry_run)))
            }
            ToolRequest::FindDuplicates { root, delete } => {
                ToolResponse::from_engine(self.with_root(root, |r| engine.find_duplicates(r, delete)))
            }
            ToolRequest::CleanOldFiles {
                root,
                days_old,
                delete,
            } => ToolResponse::from_engine(
                self.with_root(root, |r| engine.clean_old_files(r, days_old, delete)),
            ),
            ToolRequest::FolderStats { root } => {
                ToolResponse::from_engine(self.with_root(root, |r| engine.folder_stats(r)))
            }
            ToolRequest::OrganizeByDate { root, dry_run } => {
                ToolResponse::from_engine(self.with_root(root, |r| engine.organize_by_date(r, dry_run)))
            }
            ToolRequest::ArchiveOldFiles {
                root,
                days_old,
                archive_name,
            } => ToolResponse::from_engine(self.with_root(root, |r| {
                engine.archive_old_files(r, days_old, archive_name.as_deref())
            })),
            ToolRequest::ExtractArchives { root, delete_after } => ToolResponse::from_engine(
                self.with_root(root, |r| engine.extract_archives(r, delete_after)),
            ),
            ToolRequest::InstallSoftware { name } => {
                ToolResponse::from_inventory(inventory.install(&name))
            }
            ToolRequest::UninstallSoftware { name } => {
                ToolResponse::from_inventory(inventory.uninstall(&name))
            }
            ToolRequest::ListInstalledSoftware => ToolResponse::success(inventory.list()),
            ToolRequest::CheckUpdates => ToolResponse::success(inventory.check_updates()),
            ToolRequest::UpdateSoftware { name } => {
                ToolResponse::from_inventory(inventory.update(&name))
            }
            ToolRequest::GetRecommendations { task } => {
                ToolResponse::from_inventory(inventory.recommend(&task))
            }
            ToolRequest::SetAutoUpdate { name, enabled } => {
                ToolResponse::from_inventory(inventory.set_auto_update(&name, enabled))
            }
            ToolRequest::GetSoftwareInfo { name } => {
                ToolResponse::from_inventory(inventory.info(&name))
            }
        }
    }

    fn with_root<T>(
        &self,
        root: Option<PathBuf>,
        operation: impl FnOnce(&std::path::Path) -> EngineResult<T>,
    ) -> EngineResult<T> {
        let root = self.resolver.resolve(root.as_deref())?;
        operation(root.path())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;
    use std::fs;
    use tempfile::TempDir;

    fn dispatcher(temp_dir: &TempDir) -> ToolDispatcher {
        ToolDispatcher::new(
            Engine::default(),
            PathResolver::new(Some(temp_dir.path().join("downloads"))),
            Inventory::new(
                Catalog::builtin(),
                Registry::new(temp_dir.path().join("registry.json")),
            ),
        )
    }

    #[test]
    fn test_request_defaults() {
        let request: ToolRequest =
            serde_json::from_value(json!({"tool": "clean-old-files"})).unwrap();
        assert_eq!(
            request,
            ToolRequest::CleanOldFiles {
                root: None,
                days_old: 90,
                delete: false
            }
        );

        let request: ToolRequest =
            serde_json::from_value(json!({"tool": "archive-old-files", "archiveName": "x"}))
                .unwrap();
        assert_eq!(
            request,
            ToolRequest::ArchiveOldFiles {
                root: None,
                days_old: 180,
                archive_name: Some("x".to_string())
            }
        );
    }

    #[test]
    fn test_request_camel_case_params() {
        let request: ToolRequest = serde_json::from_value(
            json!({"tool": "extract-archives", "root": "/tmp/x", "deleteAfter": true}),
        )
        .unwrap();
        assert_eq!(
            request,
            ToolRequest::ExtractArchives {
                root: Some(PathBuf::from("/tmp/x")),
                delete_after: true
            }
        );

        let request: ToolRequest =
            serde_json::from_value(json!({"tool": "list-installed-software"})).unwrap();
        assert_eq!(request.tool_name(), "list-installed-software");
    }

    #[test]
    fn test_unknown_tool_is_rejected() {
        assert!(serde_json::from_value::<ToolRequest>(json!({"tool": "format-disk"})).is_err());
    }

    #[test]
    fn test_missing_root_is_an_error_envelope() {
        let temp_dir = TempDir::new().unwrap();
        let response = dispatcher(&temp_dir).handle(ToolRequest::FolderStats {
            root: Some(temp_dir.path().join("missing")),
        });

        assert!(!response.ok);
        assert!(response.data.is_none());
        let error = response.error.unwrap();
        assert!(error.starts_with("Path "));
        assert!(error.ends_with("does not exist"));
    }

    #[test]
    fn test_default_root_is_used() {
        let temp_dir = TempDir::new().unwrap();
        fs::create_dir(temp_dir.path().join("downloads")).unwrap();
        fs::write(temp_dir.path().join("downloads").join("a.png"), "x").unwrap();

        let response = dispatcher(&temp_dir).handle(ToolRequest::FolderStats { root: None });

        assert!(response.ok);
        let data = response.data.unwrap();
        assert_eq!(data["total_files"], 1);
        assert_eq!(data["by_category"]["Images"]["count"], 1);
    }

    #[test]
    fn test_inventory_errors_carry_codes() {
        let temp_dir = TempDir::new().unwrap();
        let dispatcher = dispatcher(&temp_dir);

        let response = dispatcher.handle(ToolRequest::UninstallSoftware {
            name: "git".to_string(),
        });
        assert!(!response.ok);
        assert_eq!(response.code.as_deref(), Some("not_installed"));

        let response = dispatcher.handle(ToolRequest::InstallSoftware {
            name: "git".to_string(),
        });
        assert!(response.ok);
        assert_eq!(response.data.unwrap()["status"], "installed");
    }

    #[test]
    fn test_envelope_omits_absent_fields() {
        let json = serde_json::to_value(ToolResponse::failure("boom")).unwrap();
        assert_eq!(json, json!({"ok": false, "error": "boom"}));
    }
}
