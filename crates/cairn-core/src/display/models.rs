//! Display implementations for domain models.

use std::fmt;

use crate::models::{Plan, PlanSummary};
use crate::parse::render_checklist;

impl fmt::Display for Plan {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "# {} ({})", self.title(), self.id)?;
        writeln!(f)?;

        // Metadata section
        let status = if self.is_complete() { "complete" } else { "open" };
        writeln!(f, "- Status: {status}")?;
        writeln!(
            f,
            "- Progress: {}/{} items",
            self.checked_items(),
            self.total_items()
        )?;
        if let Some(parent) = &self.parent_id {
            writeln!(f, "- Parent plan: {parent}")?;
        }

        if !self.checklist.is_empty() {
            writeln!(f, "\n## Checklist")?;
            writeln!(f)?;
            write!(f, "{}", render_checklist(&self.checklist))?;
        }

        if !self.context_files.is_empty() {
            writeln!(f, "\n## Context Files")?;
            writeln!(f)?;
            for file in &self.context_files {
                let marker = if file.read_only { " (read-only)" } else { "" };
                writeln!(f, "- {}{marker}", file.path)?;
            }
        }

        if !self.child_plans.is_empty() {
            writeln!(f, "\n## Subplans")?;
            writeln!(f)?;
            for child in &self.child_plans {
                write!(f, "{}", PlanSummary::from(child))?;
            }
        }

        Ok(())
    }
}

impl fmt::Display for PlanSummary {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let icon = if self.complete { "✓" } else { "○" };
        writeln!(
            f,
            "{icon} **{}** ({}): {}/{} items",
            self.title, self.id, self.checked_items, self.total_items
        )?;
        if self.child_plans > 0 {
            writeln!(f, "  {} subplan(s)", self.child_plans)?;
        }
        Ok(())
    }
}
