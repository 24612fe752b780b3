//! Presentation of commit, branch, checkout and verify results.

use super::paint_hash;
use crate::api::{CheckoutOutcome, CommitOutcome, VerifyReport};
use crate::error::ApiError;
use crate::refs::BranchCreation;

pub fn format_commit_outcome(outcome: &CommitOutcome, color: bool) -> String {
    let kind = if outcome.parent.is_none() {
        " (root-commit)"
    } else {
        ""
    };
    format!(
        "[{}{}] {}",
        outcome.branch,
        kind,
        paint_hash(&outcome.commit, color)
    )
}

pub fn format_branch_creation(name: &str, creation: BranchCreation) -> String {
    match creation {
        BranchCreation::Created => format!("Switched to a new branch '{}'", name),
        BranchCreation::AlreadyExists => format!("Branch '{}' already exists", name),
    }
}

pub fn format_checkout_outcome(outcome: &CheckoutOutcome, color: bool) -> String {
    let s = &outcome.summary;
    format!(
        "On branch {} at {}\n  {} file(s) written, {} director(ies) created, {} entr(ies) removed",
        outcome.branch,
        paint_hash(&outcome.commit, color),
        s.files_written,
        s.dirs_created,
        s.entries_removed
    )
}

pub fn format_verify_text(report: &VerifyReport) -> String {
    if report.is_clean() {
        return format!("Verified {} object(s): all intact", report.checked);
    }
    let mut s = format!(
        "Verified {} object(s): {} failed",
        report.checked,
        report.failures.len()
    );
    for failure in &report.failures {
        s.push_str(&format!("\n  - {}: {}", failure.id, failure.error));
    }
    s
}

pub fn format_verify_json(report: &VerifyReport) -> Result<String, ApiError> {
    Ok(serde_json::to_string_pretty(report)?)
}
