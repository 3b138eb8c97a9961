//! Multi-strategy recovery parsing of history files.
//!
//! A history file may have been written by this store, by an earlier
//! format version, or mangled by hand-editing. Recovery runs an ordered
//! list of independent strategies and takes the first one that yields
//! entries:
//!
//! 1. current structured `EXEC_DATA` comment lines,
//! 2. legacy bare-CSV comment lines,
//! 3. regex extraction from the rendered human-readable table.

use jiff::civil::DateTime;
use once_cell::sync::Lazy;
use regex::Regex;

use crate::cost::{parse_decimal, parse_token_count};
use crate::models::ExecutionCostData;

use super::{COMMENT_SUFFIX, ENTRY_PREFIX};

type Strategy = fn(&str) -> Option<Vec<ExecutionCostData>>;

const STRATEGIES: &[(&str, Strategy)] = &[
    ("structured", parse_structured),
    ("legacy-comment", parse_legacy_comments),
    ("rendered-table", parse_table_rows),
];

/// Recovers every entry the file still holds, trying each strategy in
/// order of preference.
pub(crate) fn recover_entries(text: &str) -> Vec<ExecutionCostData> {
    if text.trim().is_empty() {
        return Vec::new();
    }
    for (name, strategy) in STRATEGIES {
        if let Some(entries) = strategy(text) {
            log::debug!("history recovered via {name}: {} entries", entries.len());
            return entries;
        }
    }
    log::warn!("no history entries recoverable from existing file content");
    Vec::new()
}

/// Current format: `<!-- EXEC_DATA: ts,model,sent,recv,msg,sess,summary -->`.
fn parse_structured(text: &str) -> Option<Vec<ExecutionCostData>> {
    let entries: Vec<ExecutionCostData> = text
        .lines()
        .filter_map(|line| {
            let body = line
                .trim()
                .strip_prefix(ENTRY_PREFIX)?
                .strip_suffix(COMMENT_SUFFIX)?;
            parse_entry_fields(body)
        })
        .collect();
    non_empty(entries)
}

/// Legacy format: the same CSV payload in a bare comment, without the
/// `EXEC_DATA` tag. The timestamp requirement on the first field filters
/// out the column-header comment and the history markers.
fn parse_legacy_comments(text: &str) -> Option<Vec<ExecutionCostData>> {
    let entries: Vec<ExecutionCostData> = text
        .lines()
        .filter_map(|line| {
            let body = line
                .trim()
                .strip_prefix("<!--")?
                .strip_suffix("-->")?
                .trim();
            if body.starts_with("EXEC_DATA:") {
                return None;
            }
            parse_entry_fields(body)
        })
        .collect();
    non_empty(entries)
}

/// Rendered table row, e.g.
/// `| 2024-01-01 10:00:00 | gpt-4 | 7.2k / 1.3k | $0.0100 | notes |`.
static TABLE_ROW_RE: Lazy<Regex> = Lazy::new(|| {
    Regex::new(
        r"(?m)^\|\s*(\d{4}-\d{2}-\d{2} \d{2}:\d{2}:\d{2})\s*\|([^|]*)\|([^|/]*)/([^|]*)\|\s*\$\s*([0-9.,]+)\s*\|([^|]*)\|",
    )
    .expect("table row regex")
});

/// Last resort: reconstruct entries from the human-readable table. Token
/// counts come back from `7.2k` notation, the cost column is the session
/// cost, and the per-message cost is not recoverable from this format.
fn parse_table_rows(text: &str) -> Option<Vec<ExecutionCostData>> {
    let entries: Vec<ExecutionCostData> = TABLE_ROW_RE
        .captures_iter(text)
        .filter_map(|caps| {
            let timestamp = DateTime::strptime("%Y-%m-%d %H:%M:%S", &caps[1]).ok()?;
            let model = caps[2].trim();
            let summary = caps[6].trim();
            Some(ExecutionCostData {
                timestamp,
                tokens_sent: parse_token_count(&caps[3]),
                tokens_received: parse_token_count(&caps[4]),
                message_cost: 0.0,
                session_cost: parse_decimal(&caps[5]),
                model: if model == "-" {
                    String::new()
                } else {
                    model.to_string()
                },
                summary: if summary == "-" {
                    String::new()
                } else {
                    summary.to_string()
                },
            })
        })
        .collect();
    non_empty(entries)
}

fn non_empty(entries: Vec<ExecutionCostData>) -> Option<Vec<ExecutionCostData>> {
    if entries.is_empty() {
        None
    } else {
        Some(entries)
    }
}

/// Parses the CSV payload shared by the structured and legacy formats.
fn parse_entry_fields(body: &str) -> Option<ExecutionCostData> {
    let fields = split_unescaped(body);
    if fields.len() < 6 {
        return None;
    }
    let timestamp: DateTime = fields[0].trim().parse().ok()?;

    Some(ExecutionCostData {
        timestamp,
        tokens_sent: fields[2].trim().parse().unwrap_or(0),
        tokens_received: fields[3].trim().parse().unwrap_or(0),
        message_cost: parse_decimal(&fields[4]),
        session_cost: parse_decimal(&fields[5]),
        model: fields[1].trim().to_string(),
        summary: fields
            .get(6)
            .map(|raw| unescape_summary(raw))
            .unwrap_or_default(),
    })
}

/// Splits on commas that are not escaped with a backslash. Escape
/// sequences are kept intact for [`unescape_summary`].
fn split_unescaped(body: &str) -> Vec<String> {
    let mut fields = Vec::new();
    let mut current = String::new();
    let mut chars = body.chars();

    while let Some(c) = chars.next() {
        match c {
            '\\' => {
                current.push('\\');
                if let Some(next) = chars.next() {
                    current.push(next);
                }
            }
            ',' => fields.push(std::mem::take(&mut current)),
            _ => current.push(c),
        }
    }
    fields.push(current);
    fields
}

/// Reverses the summary escaping applied by the renderer: `\n` back to a
/// newline, `\,` back to a comma, `\\` back to a backslash.
pub(crate) fn unescape_summary(raw: &str) -> String {
    let mut out = String::with_capacity(raw.len());
    let mut chars = raw.chars();

    while let Some(c) = chars.next() {
        if c != '\\' {
            out.push(c);
            continue;
        }
        match chars.next() {
            Some('n') => out.push('\n'),
            Some(',') => out.push(','),
            Some('\\') => out.push('\\'),
            Some(other) => {
                out.push('\\');
                out.push(other);
            }
            None => out.push('\\'),
        }
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_structured_entry_line() {
        let text =
            "<!-- EXEC_DATA: 2024-01-01T10:00:00,gpt-4,7200,1300,0.01,0.01,did the thing -->";
        let entries = parse_structured(text).unwrap();

        assert_eq!(entries.len(), 1);
        assert_eq!(entries[0].model, "gpt-4");
        assert_eq!(entries[0].tokens_sent, 7200);
        assert_eq!(entries[0].summary, "did the thing");
    }

    #[test]
    fn test_structured_skips_header_comment() {
        let text = "\
<!-- timestamp,model,tokensSent,tokensReceived,messageCost,sessionCost,summary -->
<!-- EXEC_DATA: 2024-01-01T10:00:00,gpt-4,7200,1300,0.01,0.01,ok -->
";
        assert_eq!(parse_structured(text).unwrap().len(), 1);
    }

    #[test]
    fn test_escaped_summary_round_trip() {
        let text = r"<!-- EXEC_DATA: 2024-01-01T10:00:00,gpt-4,1,2,0.1,0.2,first\, second\nline -->";
        let entries = parse_structured(text).unwrap();
        assert_eq!(entries[0].summary, "first, second\nline");
    }

    #[test]
    fn test_legacy_comment_entries() {
        let text = "\
<!-- EXECUTION_HISTORY_START -->
<!-- 2024-01-01T10:00:00,gpt-4,7200,1300,0.01,0.01,old format -->
<!-- EXECUTION_HISTORY_END -->
";
        let entries = parse_legacy_comments(text).unwrap();
        assert_eq!(entries.len(), 1);
        assert_eq!(entries[0].summary, "old format");
    }

    #[test]
    fn test_table_row_recovery() {
        let text = "\
| Date | Model | Tokens (Sent/Received) | Cost | Notes |
| ---- | ----- | --------------------- | ---- | ----- |
| 2024-01-01 10:00:00 | gpt-4 | 7.2k / 1.3k | $0.0100 | wrap up |
";
        let entries = parse_table_rows(text).unwrap();

        assert_eq!(entries.len(), 1);
        assert_eq!(entries[0].tokens_sent, 7200);
        assert_eq!(entries[0].tokens_received, 1300);
        assert!((entries[0].session_cost - 0.01).abs() < 1e-9);
        assert_eq!(entries[0].model, "gpt-4");
        assert_eq!(entries[0].summary, "wrap up");
    }

    #[test]
    fn test_strategies_prefer_structured() {
        let text = "\
<!-- EXEC_DATA: 2024-01-01T10:00:00,gpt-4,7200,1300,0.01,0.01,structured -->

| 2024-02-02 11:00:00 | other | 1.0k / 0.5k | $0.5000 | table |
";
        let entries = recover_entries(text);
        assert_eq!(entries.len(), 1);
        assert_eq!(entries[0].summary, "structured");
    }

    #[test]
    fn test_unrecoverable_text_yields_nothing() {
        assert!(recover_entries("just some prose").is_empty());
        assert!(recover_entries("").is_empty());
    }
}
