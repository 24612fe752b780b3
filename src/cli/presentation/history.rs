//! Log presentation.

use super::paint_hash;
use crate::api::LogEntry;
use crate::error::ApiError;

pub fn format_log_text(entries: &[LogEntry], color: bool) -> String {
    if entries.is_empty() {
        return "No commits yet.".to_string();
    }

    let mut blocks = Vec::with_capacity(entries.len());
    for entry in entries {
        let date = entry
            .commit
            .time()
            .map(|t| t.format("%Y-%m-%d %H:%M:%S UTC").to_string())
            .unwrap_or_else(|| entry.commit.timestamp.to_string());

        let mut block = format!("commit {}\nDate:   {}\n", paint_hash(&entry.id, color), date);
        for line in entry.commit.message.lines() {
            block.push_str("\n    ");
            block.push_str(line);
        }
        blocks.push(block);
    }
    blocks.join("\n\n")
}

pub fn format_log_json(entries: &[LogEntry]) -> Result<String, ApiError> {
    Ok(serde_json::to_string_pretty(entries)?)
}
