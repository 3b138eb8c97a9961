//! Append-and-rebuild persistence of execution cost entries.
//!
//! Each plan owns one `<base>_history.md` file holding an authoritative
//! machine-readable comment block and a derived human-readable table,
//! kept permanently in sync by re-rendering the **whole** file on every
//! append. The structured block and the table therefore can never
//! diverge; recovery parsing exists only for files that were hand-edited
//! or written by an earlier format version.
//!
//! Single-writer constraint: each write re-reads the current file state
//! before re-rendering, so entries are never lost to an in-process
//! caller. No file locking is used; concurrent writers from separate
//! processes are out of scope.

use std::fs;
use std::path::{Path, PathBuf};

use crate::error::{IoResultExt, Result};
use crate::models::ExecutionCostData;

mod parse;
mod render;

pub(crate) const HISTORY_START: &str = "<!-- EXECUTION_HISTORY_START -->";
pub(crate) const HISTORY_END: &str = "<!-- EXECUTION_HISTORY_END -->";
pub(crate) const ENTRY_PREFIX: &str = "<!-- EXEC_DATA: ";
pub(crate) const COMMENT_SUFFIX: &str = " -->";
pub(crate) const COLUMNS_COMMENT: &str =
    "<!-- timestamp,model,tokensSent,tokensReceived,messageCost,sessionCost,summary -->";

/// Filename suffix of a plan's history sibling.
pub const HISTORY_SUFFIX: &str = "_history";

/// Aggregate figures over a set of history entries.
#[derive(Debug, Clone, Copy, Default)]
pub struct HistoryTotals {
    /// Sum of per-execution message costs
    pub total_cost: f64,
    /// Sum of tokens sent
    pub tokens_sent: u64,
    /// Sum of tokens received
    pub tokens_received: u64,
    /// Number of recorded executions
    pub executions: usize,
}

/// Computes totals the way the rendered footer reports them.
pub fn totals(entries: &[ExecutionCostData]) -> HistoryTotals {
    let mut acc = HistoryTotals::default();
    for entry in entries {
        acc.total_cost += entry.message_cost;
        acc.tokens_sent += entry.tokens_sent;
        acc.tokens_received += entry.tokens_received;
        acc.executions += 1;
    }
    acc
}

/// Durable, self-healing execution history of one plan.
pub struct HistoryStore {
    path: PathBuf,
    plan_name: String,
}

impl HistoryStore {
    /// Creates the store for the history sibling of `plan_path`.
    pub fn for_plan(plan_path: &Path) -> Self {
        let base = plan_path
            .file_stem()
            .and_then(|s| s.to_str())
            .unwrap_or("plan")
            .to_string();
        let path = plan_path.with_file_name(format!("{base}{HISTORY_SUFFIX}.md"));
        Self {
            path,
            plan_name: base,
        }
    }

    /// Location of the history file.
    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Creates the header/marker skeleton with an empty table if no
    /// history file exists yet.
    pub fn ensure_exists(&self) -> Result<()> {
        if self.path.exists() {
            return Ok(());
        }
        self.persist(&render::render_history(&self.plan_name, &[]))
    }

    /// Reads back every recoverable entry, oldest first. A missing or
    /// unreadable file yields an empty history.
    pub fn entries(&self) -> Vec<ExecutionCostData> {
        if !self.path.exists() {
            return Vec::new();
        }
        match fs::read_to_string(&self.path) {
            Ok(text) => {
                let mut entries = parse::recover_entries(&text);
                entries.sort_by(|a, b| a.timestamp.cmp(&b.timestamp));
                entries
            }
            Err(e) => {
                log::warn!("cannot read history '{}': {e}", self.path.display());
                Vec::new()
            }
        }
    }

    /// Appends one entry: recover everything already recorded, add the
    /// new entry, de-duplicate, and re-render the entire file.
    ///
    /// If recovery or rendering fails, the file is recreated with only
    /// the new entry rather than losing the write entirely.
    pub fn append(&self, entry: &ExecutionCostData) -> Result<()> {
        if let Err(e) = self.try_append(entry) {
            log::error!(
                "history update failed for '{}', recreating with the new entry only: {e}",
                self.path.display()
            );
            return self.persist(&render::render_history(&self.plan_name, &[entry.clone()]));
        }
        Ok(())
    }

    fn try_append(&self, entry: &ExecutionCostData) -> Result<()> {
        let existing = if self.path.exists() {
            fs::read_to_string(&self.path).path_context(&self.path)?
        } else {
            String::new()
        };

        let mut entries = parse::recover_entries(&existing);
        entries.push(entry.clone());
        let mut entries = dedup_entries(entries);
        entries.sort_by(|a, b| a.timestamp.cmp(&b.timestamp));

        self.persist(&render::render_history(&self.plan_name, &entries))
    }

    /// Write-then-rename so an interrupted write never leaves a torn
    /// history file behind.
    fn persist(&self, content: &str) -> Result<()> {
        let tmp = self.path.with_extension("md.tmp");
        fs::write(&tmp, content).path_context(&tmp)?;
        fs::rename(&tmp, &self.path).path_context(&self.path)?;
        Ok(())
    }
}

/// Drops entries whose identity tuple was already seen, keeping the
/// first occurrence.
fn dedup_entries(entries: Vec<ExecutionCostData>) -> Vec<ExecutionCostData> {
    let mut seen = std::collections::HashSet::new();
    entries
        .into_iter()
        .filter(|entry| seen.insert(entry.dedup_key()))
        .collect()
}
