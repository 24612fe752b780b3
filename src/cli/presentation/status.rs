//! Status presentation.

use super::paint_hash;
use crate::api::StatusReport;
use crate::error::ApiError;
use comfy_table::presets::UTF8_BORDERS_ONLY;
use comfy_table::Table;
use owo_colors::OwoColorize;

pub fn format_status_text(report: &StatusReport, color: bool) -> String {
    let branch = if color {
        report.branch.green().bold().to_string()
    } else {
        report.branch.clone()
    };
    let head = match &report.head {
        Some(id) => paint_hash(id, color),
        None => "(no commits yet)".to_string(),
    };

    let mut table = Table::new();
    table.load_preset(UTF8_BORDERS_ONLY);
    table.set_header(vec!["", "Branch", "Head"]);
    for b in &report.branches {
        let marker = if b.name == report.branch { "*" } else { "" };
        let head = b
            .head
            .as_ref()
            .map(|id| id.short().to_string())
            .unwrap_or_else(|| "-".to_string());
        table.add_row(vec![marker.to_string(), b.name.clone(), head]);
    }

    format!(
        "Work tree: {}\nOn branch {}\nHead: {}\nObjects: {}\n\n{}",
        report.work_tree.display(),
        branch,
        head,
        report.object_count,
        table
    )
}

pub fn format_status_json(report: &StatusReport) -> Result<String, ApiError> {
    Ok(serde_json::to_string_pretty(report)?)
}
