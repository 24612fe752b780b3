//! Configuration System
//!
//! Layered configuration: built-in defaults, a global user file, the
//! workspace file at `.gat/config.toml`, and `GAT__SECTION__KEY`
//! environment overrides. Tests included.

use crate::logging::LoggingConfig;
use crate::store::DEFAULT_COMPRESSION_LEVEL;
use crate::tree::EntryOrder;
use serde::{Deserialize, Serialize};

mod facade;
mod merge;
mod sources;

pub use facade::{ConfigLoader, ENV_PREFIX, ENV_SEPARATOR};
pub use sources::global_file::global_config_path;
pub use sources::workspace_file::workspace_config_path;

/// Root configuration structure
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct GatConfig {
    /// Snapshot building
    #[serde(default)]
    pub snapshot: SnapshotConfig,

    /// Object storage
    #[serde(default)]
    pub store: StoreConfig,

    /// Logging configuration
    #[serde(default)]
    pub logging: LoggingConfig,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct SnapshotConfig {
    /// Row order inside tree objects: "filesystem" or "name"
    #[serde(default)]
    pub entry_order: EntryOrder,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct StoreConfig {
    /// zlib level, 0 (store only) to 9 (best)
    #[serde(default = "default_compression_level")]
    pub compression_level: u32,
}

fn default_compression_level() -> u32 {
    DEFAULT_COMPRESSION_LEVEL
}

impl Default for StoreConfig {
    fn default() -> Self {
        Self {
            compression_level: default_compression_level(),
        }
    }
}

/// Configuration validation errors
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ValidationError {
    Store(String),
    Logging(String),
}

impl std::fmt::Display for ValidationError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            ValidationError::Store(msg) => write!(f, "Store: {}", msg),
            ValidationError::Logging(msg) => write!(f, "Logging: {}", msg),
        }
    }
}

impl std::error::Error for ValidationError {}

impl StoreConfig {
    pub fn validate(&self) -> Result<(), String> {
        if self.compression_level > 9 {
            return Err(format!(
                "compression_level must be between 0 and 9, got {}",
                self.compression_level
            ));
        }
        Ok(())
    }
}

impl GatConfig {
    /// Validate the entire configuration
    pub fn validate(&self) -> Result<(), Vec<ValidationError>> {
        let mut errors = Vec::new();

        if let Err(e) = self.store.validate() {
            errors.push(ValidationError::Store(e));
        }
        if let Err(e) = self.logging.validate() {
            errors.push(ValidationError::Logging(e));
        }

        if errors.is_empty() {
            Ok(())
        } else {
            Err(errors)
        }
    }
}
