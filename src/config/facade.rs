//! Config loading entry point: layers every source and validates the result.

use super::merge::builder_with_defaults;
use super::sources::{global_file, workspace_file};
use super::GatConfig;
use config::{ConfigError, Environment, File};
use std::collections::HashMap;
use std::path::{Path, PathBuf};
use tracing::debug;

/// Prefix of environment overrides, e.g. `GAT__STORE__COMPRESSION_LEVEL=9`.
pub const ENV_PREFIX: &str = "GAT";
pub const ENV_SEPARATOR: &str = "__";

pub struct ConfigLoader;

impl ConfigLoader {
    /// Load configuration for a work tree: defaults, global file, workspace
    /// file, then `GAT__*` environment variables.
    pub fn load(work_tree: &Path) -> Result<GatConfig, ConfigError> {
        let global = global_file::global_config_path();
        Self::load_layers(work_tree, global.as_deref(), None)
    }

    /// Same layering with an explicit global file and environment map.
    ///
    /// `env: None` reads the process environment.
    pub fn load_layers(
        work_tree: &Path,
        global: Option<&Path>,
        env: Option<HashMap<String, String>>,
    ) -> Result<GatConfig, ConfigError> {
        let builder = builder_with_defaults()?;
        let builder = global_file::add_to_builder(builder, global)?;
        let builder = workspace_file::add_to_builder(builder, work_tree)?;
        let builder = builder.add_source(
            Environment::with_prefix(ENV_PREFIX)
                .separator(ENV_SEPARATOR)
                .try_parsing(true)
                .source(env),
        );

        let config: GatConfig = builder.build()?.try_deserialize()?;
        Self::validated(config)
    }

    /// Load a single explicit file on top of the defaults.
    pub fn load_from_file(path: &Path) -> Result<GatConfig, ConfigError> {
        debug!(config_path = %path.display(), "Loading configuration file");
        let config: GatConfig = builder_with_defaults()?
            .add_source(File::from(path).required(true))
            .build()?
            .try_deserialize()?;
        Self::validated(config)
    }

    pub fn global_config_path() -> Option<PathBuf> {
        global_file::global_config_path()
    }

    fn validated(config: GatConfig) -> Result<GatConfig, ConfigError> {
        config.validate().map_err(|errors| {
            let messages: Vec<String> = errors.iter().map(|e| e.to_string()).collect();
            ConfigError::Message(format!(
                "Configuration validation failed:\n{}",
                messages.join("\n")
            ))
        })?;
        Ok(config)
    }
}
