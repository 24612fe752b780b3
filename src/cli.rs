//! CLI domain: parse, route, help, output, and presentation only.
//! No domain orchestration; single route table dispatches to the repository API.

mod help;
mod output;
mod parse;
mod presentation;
mod route;

pub use help::{command_name, is_read_only};
pub use output::map_error;
pub use parse::{Cli, Commands};
pub use presentation::{
    format_branch_creation, format_checkout_outcome, format_commit_outcome, format_log_json,
    format_log_text, format_status_json, format_status_text, format_verify_json,
    format_verify_text,
};
pub use route::RunContext;
