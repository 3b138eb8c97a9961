//! Full-file rendering of a plan's history.
//!
//! The file is always regenerated from scratch: header, the structured
//! comment block for every entry, then the freshly computed
//! human-readable table (newest first) with a totals footer.

use std::fmt::Write as _;

use crate::display::{LocalDateTime, Tokens};
use crate::models::ExecutionCostData;

use super::{totals, COLUMNS_COMMENT, COMMENT_SUFFIX, ENTRY_PREFIX, HISTORY_END, HISTORY_START};

pub(crate) fn render_history(plan_name: &str, entries: &[ExecutionCostData]) -> String {
    let mut out = String::new();

    let _ = writeln!(out, "# Execution History: {plan_name}");
    out.push_str(HISTORY_START);
    out.push('\n');
    out.push_str(COLUMNS_COMMENT);
    out.push('\n');
    for entry in entries {
        let _ = writeln!(out, "{ENTRY_PREFIX}{}{COMMENT_SUFFIX}", entry_line(entry));
    }
    out.push_str(HISTORY_END);
    out.push('\n');

    out.push_str("\n## Execution Summary\n\n");
    out.push_str("| Date | Model | Tokens (Sent/Received) | Cost | Notes |\n");
    out.push_str("| ---- | ----- | --------------------- | ---- | ----- |\n");

    let mut newest_first: Vec<&ExecutionCostData> = entries.iter().collect();
    newest_first.sort_by(|a, b| b.timestamp.cmp(&a.timestamp));
    for entry in newest_first {
        let _ = writeln!(
            out,
            "| {} | {} | {} / {} | ${:.4} | {} |",
            LocalDateTime(&entry.timestamp),
            cell(&entry.model),
            Tokens(entry.tokens_sent),
            Tokens(entry.tokens_received),
            entry.session_cost,
            cell(&entry.summary),
        );
    }

    let sums = totals(entries);
    let _ = writeln!(
        out,
        "\n**Total Cost:** ${:.4} | **Total Tokens:** {} sent, {} received | **Executions:** {}",
        sums.total_cost,
        Tokens(sums.tokens_sent),
        Tokens(sums.tokens_received),
        sums.executions,
    );

    out
}

/// One structured CSV payload. Only the summary field may contain commas
/// or newlines, and those are escaped; the model is sanitized instead so
/// the field positions stay fixed.
fn entry_line(entry: &ExecutionCostData) -> String {
    format!(
        "{},{},{},{},{},{},{}",
        entry.timestamp,
        entry.model.replace(',', " ").replace('\n', " ").trim(),
        entry.tokens_sent,
        entry.tokens_received,
        entry.message_cost,
        entry.session_cost,
        escape_summary(&entry.summary),
    )
}

/// Escapes a summary for the structured block: backslashes first, then
/// newlines as `\n` and commas as `\,`.
pub(crate) fn escape_summary(raw: &str) -> String {
    raw.replace('\\', r"\\")
        .replace('\r', "")
        .replace('\n', r"\n")
        .replace(',', r"\,")
}

/// A table cell must stay on one line and free of pipes.
fn cell(raw: &str) -> String {
    let line = raw.lines().next().unwrap_or("").trim().replace('|', "/");
    if line.is_empty() {
        "-".to_string()
    } else {
        line
    }
}
