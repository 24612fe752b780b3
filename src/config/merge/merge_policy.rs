//! Merge rules: defaults, override order, conflict handling.

use crate::store::DEFAULT_COMPRESSION_LEVEL;
use config::Config;
use config::ConfigBuilder;
use config::ConfigError;

/// Create a Config builder with merge policy defaults applied.
///
/// Later sources override earlier ones key by key: defaults, then the global
/// file, then the workspace file, then `GAT__*` environment variables.
pub fn builder_with_defaults() -> Result<ConfigBuilder<config::builder::DefaultState>, ConfigError>
{
    Config::builder()
        .set_default("snapshot.entry_order", "filesystem")?
        .set_default("store.compression_level", i64::from(DEFAULT_COMPRESSION_LEVEL))?
        .set_default("logging.level", "warn")?
        .set_default("logging.format", "text")?
        .set_default("logging.output", "stderr")
}
