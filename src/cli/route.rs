//! CLI route: single route table and run context. Dispatches to the repository API and presentation.

use crate::api::{ObjectTarget, RepositoryApi};
use crate::cli::parse::Commands;
use crate::cli::presentation::{
    format_branch_creation, format_checkout_outcome, format_commit_outcome, format_log_json,
    format_log_text, format_status_json, format_status_text, format_verify_json,
    format_verify_text,
};
use crate::cli::{command_name, is_read_only};
use crate::config::{ConfigLoader, GatConfig};
use crate::error::ApiError;
use std::path::PathBuf;
use std::time::Instant;
use tracing::{debug, info, warn};

/// Runtime context for CLI execution: the opened repository and output options.
pub struct RunContext {
    api: RepositoryApi,
    color: bool,
}

impl RunContext {
    /// Load configuration, then create (if needed) and open the repository.
    pub fn new(workspace_root: PathBuf, config_path: Option<PathBuf>) -> Result<Self, ApiError> {
        let config = if let Some(ref cfg_path) = config_path {
            ConfigLoader::load_from_file(cfg_path)?
        } else {
            ConfigLoader::load(&workspace_root)?
        };
        Self::with_config(workspace_root, config)
    }

    pub fn with_config(workspace_root: PathBuf, config: GatConfig) -> Result<Self, ApiError> {
        let api = RepositoryApi::init(&workspace_root, config)?;
        Ok(Self { api, color: false })
    }

    /// Highlight hashes and branch names in text output.
    pub fn with_color(mut self, color: bool) -> Self {
        self.color = color;
        self
    }

    pub fn api(&self) -> &RepositoryApi {
        &self.api
    }

    /// Execute a CLI command via the single route table.
    pub fn execute(&self, command: &Commands) -> Result<String, ApiError> {
        let started = Instant::now();
        let name = command_name(command);
        let result = self.execute_inner(command);
        let duration_ms = started.elapsed().as_millis();

        match &result {
            Ok(_) if is_read_only(command) => debug!(command = name, duration_ms, "Command completed"),
            Ok(_) => info!(command = name, duration_ms, "Command completed"),
            Err(e) => warn!(command = name, duration_ms, error = %e, "Command failed"),
        }
        result
    }

    fn execute_inner(&self, command: &Commands) -> Result<String, ApiError> {
        match command {
            Commands::Init => Ok(format!(
                "Initialized gat repository in {}",
                self.api.repository().root().display()
            )),
            Commands::Commit { message } => {
                let outcome = self.api.commit(message)?;
                Ok(format_commit_outcome(&outcome, self.color))
            }
            Commands::Branch { name } => {
                let creation = self.api.create_branch(name)?;
                Ok(format_branch_creation(name, creation))
            }
            Commands::Checkout { name } => {
                let outcome = self.api.checkout(name)?;
                Ok(format_checkout_outcome(&outcome, self.color))
            }
            Commands::Revert { hash } => {
                let outcome = self.api.revert(hash)?;
                Ok(format_checkout_outcome(&outcome, self.color))
            }
            Commands::Log { format, limit } => {
                let entries = self.api.log(*limit)?;
                match output_format(format)? {
                    OutputFormat::Json => format_log_json(&entries),
                    OutputFormat::Text => Ok(format_log_text(&entries, self.color)),
                }
            }
            Commands::Status { format } => {
                let report = self.api.status()?;
                match output_format(format)? {
                    OutputFormat::Json => format_status_json(&report),
                    OutputFormat::Text => Ok(format_status_text(&report, self.color)),
                }
            }
            Commands::CatObject { hash, path } => {
                let target = match (hash, path) {
                    (_, Some(path)) => ObjectTarget::Path(path.clone()),
                    (Some(hash), None) => ObjectTarget::Id(hash.clone()),
                    (None, None) => {
                        return Err(ApiError::InvalidArgument(
                            "cat-object needs a hash or --path".to_string(),
                        ))
                    }
                };
                let bytes = self.api.cat_object(&target)?;
                Ok(String::from_utf8_lossy(&bytes).into_owned())
            }
            Commands::Verify { format } => {
                let report = self.api.verify()?;
                let rendered = match output_format(format)? {
                    OutputFormat::Json => format_verify_json(&report)?,
                    OutputFormat::Text => format_verify_text(&report),
                };
                if report.is_clean() {
                    Ok(rendered)
                } else {
                    Err(ApiError::VerificationFailed(rendered))
                }
            }
        }
    }
}

enum OutputFormat {
    Text,
    Json,
}

fn output_format(format: &str) -> Result<OutputFormat, ApiError> {
    match format {
        "text" => Ok(OutputFormat::Text),
        "json" => Ok(OutputFormat::Json),
        other => Err(ApiError::InvalidArgument(format!(
            "unknown output format '{}' (expected 'text' or 'json')",
            other
        ))),
    }
}
