//! CLI presentation: text and json formatters per command family.

mod history;
mod outcome;
mod status;

pub use history::{format_log_json, format_log_text};
pub use outcome::{
    format_branch_creation, format_checkout_outcome, format_commit_outcome, format_verify_json,
    format_verify_text,
};
pub use status::{format_status_json, format_status_text};

use crate::types::ObjectId;
use owo_colors::OwoColorize;

/// A hash as shown to users, highlighted when color is on.
pub(crate) fn paint_hash(id: &ObjectId, color: bool) -> String {
    if color {
        id.yellow().to_string()
    } else {
        id.to_string()
    }
}
