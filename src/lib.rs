//! dlsweep - keeps a downloads folder tidy.
//!
//! This library organizes files by type or by modification month, finds
//! content duplicates, reports and removes old files, bundles old files
//! into ZIP archives, expands archives, and summarizes folder contents.
//! A small simulated software inventory rides along. Every operation is
//! reachable through the tagged [`tools::ToolRequest`] enum, which the CLI
//! and the JSON-lines server both use.

pub mod archiver;
pub mod cli;
pub mod config;
pub mod duplicates;
pub mod engine;
pub mod error;
pub mod extractor;
pub mod file_category;
pub mod file_organizer;
pub mod hasher;
pub mod inventory;
pub mod logging;
pub mod mover;
pub mod output;
pub mod paths;
pub mod report;
pub mod retention;
pub mod server;
pub mod stats;
pub mod tools;
pub mod walk;

pub use config::{CompiledFilters, Config, ConfigError};
pub use engine::Engine;
pub use error::{EngineError, EngineResult};
pub use file_category::{Category, FileMapper};
pub use inventory::{Inventory, InventoryError};
pub use paths::{PathResolver, Root};
pub use tools::{ToolDispatcher, ToolRequest, ToolResponse};
