//! Plan model definition and related functionality.

use serde::{Deserialize, Serialize};

use super::{ChecklistItem, FileReference};

/// A plan document paired with its checklist and context manifest,
/// optionally decomposed into ordered subplans.
///
/// Plans form a tree: `child_plans` ownership is exclusive, while
/// `parent_id` is a relation-only back-reference resolved through the
/// repository when ancestor text is needed. It is never followed for
/// lifecycle decisions.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct Plan {
    /// Identifier of the plan: the plan file's base name
    pub id: String,

    /// Full plan text after markdown reference expansion
    pub plan_text: String,

    /// Checklist extracted from the plan and its sibling checklist file
    #[serde(default)]
    pub checklist: Vec<ChecklistItem>,

    /// The plan/checklist/context files that make up this plan on disk
    #[serde(default)]
    pub plan_files: Vec<FileReference>,

    /// Implementation files the plan's context manifest names
    #[serde(default)]
    pub context_files: Vec<FileReference>,

    /// Subplans in filename-lexicographic order
    #[serde(default)]
    pub child_plans: Vec<Plan>,

    /// Identifier of the parent plan, if this is a subplan
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub parent_id: Option<String>,
}

impl Plan {
    /// A plan is complete when every item of its **own** checklist tree is
    /// checked. Subplans keep independent checklists and do not roll up
    /// into the parent's completeness; sequencing across subplans is the
    /// selector's job.
    pub fn is_complete(&self) -> bool {
        self.checklist.iter().all(ChecklistItem::is_complete)
    }

    /// Unchecked items of this plan's checklist tree, depth-first
    /// pre-order. Children of checked parents are included.
    pub fn open_items(&self) -> Vec<&ChecklistItem> {
        let mut out = Vec::new();
        for item in &self.checklist {
            item.collect_open(&mut out);
        }
        out
    }

    /// Total number of checklist items, recursively.
    pub fn total_items(&self) -> usize {
        self.checklist.iter().map(ChecklistItem::count_items).sum()
    }

    /// Number of checked checklist items, recursively.
    pub fn checked_items(&self) -> usize {
        self.checklist
            .iter()
            .map(ChecklistItem::count_checked)
            .sum()
    }

    /// Human-readable title: the first markdown heading of the plan text,
    /// falling back to the plan id.
    pub fn title(&self) -> &str {
        self.plan_text
            .lines()
            .map(str::trim)
            .find(|line| line.starts_with('#'))
            .map(|line| line.trim_start_matches('#').trim())
            .filter(|title| !title.is_empty())
            .unwrap_or(&self.id)
    }

    /// Looks up a plan by id in this subtree, including this node.
    pub fn find(&self, id: &str) -> Option<&Plan> {
        if self.id == id {
            return Some(self);
        }
        self.child_plans.iter().find_map(|child| child.find(id))
    }

    /// Iterates this node and every descendant, pre-order.
    pub fn iter_subtree(&self) -> Vec<&Plan> {
        let mut out = vec![self];
        for child in &self.child_plans {
            out.extend(child.iter_subtree());
        }
        out
    }
}
