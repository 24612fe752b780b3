//! Workspace config file source: `<work tree>/.gat/config.toml`

use crate::repository::METADATA_DIR;
use config::builder::DefaultState;
use config::ConfigBuilder;
use config::ConfigError;
use config::File;
use std::path::{Path, PathBuf};

pub fn workspace_config_path(work_tree: &Path) -> PathBuf {
    work_tree.join(METADATA_DIR).join("config.toml")
}

/// Add the workspace config file to the builder if it exists.
pub fn add_to_builder(
    builder: ConfigBuilder<DefaultState>,
    work_tree: &Path,
) -> Result<ConfigBuilder<DefaultState>, ConfigError> {
    let path = workspace_config_path(work_tree);
    if path.is_file() {
        Ok(builder.add_source(File::from(path.as_path()).required(false)))
    } else {
        Ok(builder)
    }
}
