//! Checklist item model definition and related functionality.

use serde::{Deserialize, Serialize};

/// One trackable task line of a plan, possibly with nested sub-tasks.
///
/// Items form an immutable tree: a node owns its children exclusively, and
/// a child's original indentation was strictly deeper than its parent's.
/// State transitions are functional; see [`ChecklistItem::with_checked`].
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct ChecklistItem {
    /// Trimmed description text of the task
    pub description: String,

    /// Whether the task has been completed
    pub checked: bool,

    /// Nested sub-tasks, in document order
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub children: Vec<ChecklistItem>,
}

impl ChecklistItem {
    /// Creates a leaf item.
    pub fn new(description: impl Into<String>, checked: bool) -> Self {
        Self {
            description: description.into(),
            checked,
            children: Vec::new(),
        }
    }

    /// Creates an item with nested sub-tasks.
    pub fn with_children(
        description: impl Into<String>,
        checked: bool,
        children: Vec<ChecklistItem>,
    ) -> Self {
        Self {
            description: description.into(),
            checked,
            children,
        }
    }

    /// Returns a copy of this item with its own `checked` flag replaced.
    ///
    /// The children are carried over unchanged; flipping a parent never
    /// flips its sub-tasks.
    pub fn with_checked(&self, checked: bool) -> Self {
        Self {
            description: self.description.clone(),
            checked,
            children: self.children.clone(),
        }
    }

    /// An item is complete when it and every descendant is checked.
    pub fn is_complete(&self) -> bool {
        self.checked && self.children.iter().all(ChecklistItem::is_complete)
    }

    /// Appends every unchecked item of this subtree to `out` in pre-order.
    ///
    /// A checked parent does not hide its unchecked children.
    pub fn collect_open<'a>(&'a self, out: &mut Vec<&'a ChecklistItem>) {
        if !self.checked {
            out.push(self);
        }
        for child in &self.children {
            child.collect_open(out);
        }
    }

    /// Total number of items in this subtree, including this one.
    pub fn count_items(&self) -> usize {
        1 + self
            .children
            .iter()
            .map(ChecklistItem::count_items)
            .sum::<usize>()
    }

    /// Number of checked items in this subtree, including this one.
    pub fn count_checked(&self) -> usize {
        usize::from(self.checked)
            + self
                .children
                .iter()
                .map(ChecklistItem::count_checked)
                .sum::<usize>()
    }
}
