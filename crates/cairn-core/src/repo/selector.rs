//! Subplan execution selector.
//!
//! Stateless and idempotent: every call re-derives its answer from the
//! current plan tree, which is itself rebuilt fresh on each reload. No
//! prior selection is remembered, so checking an item externally and
//! re-invoking the selector always agree.

use crate::models::{FileReference, Plan};

/// Where the next execution step should run.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ExecutionState {
    /// Work directly on the root plan's own checklist
    RootActive,
    /// Work on a specific descendant subplan
    SubplanActive,
    /// Every node is complete; execution falls back to the root for
    /// final wrap-up actions
    AllComplete,
}

impl ExecutionState {
    /// Short human-readable label.
    pub fn as_str(&self) -> &'static str {
        match self {
            ExecutionState::RootActive => "root active",
            ExecutionState::SubplanActive => "subplan active",
            ExecutionState::AllComplete => "all complete",
        }
    }
}

/// Result of a selection: the plan to execute against and why.
#[derive(Debug, Clone, Copy)]
pub struct Selection<'a> {
    pub plan: &'a Plan,
    pub state: ExecutionState,
}

/// Picks the plan node the next execution step should target.
///
/// Depth-first, in-declaration-order walk: the first plan (the root
/// itself or a descendant) whose **own** checklist is incomplete wins.
/// When the whole tree is complete the root is returned with
/// [`ExecutionState::AllComplete`].
pub fn select(root: &Plan) -> Selection<'_> {
    match next_incomplete(root) {
        Some(plan) => Selection {
            plan,
            state: if std::ptr::eq(plan, root) {
                ExecutionState::RootActive
            } else {
                ExecutionState::SubplanActive
            },
        },
        None => Selection {
            plan: root,
            state: ExecutionState::AllComplete,
        },
    }
}

fn next_incomplete(plan: &Plan) -> Option<&Plan> {
    if !plan.is_complete() {
        return Some(plan);
    }
    plan.child_plans.iter().find_map(next_incomplete)
}

/// Number of plans in the tree whose own checklist is still incomplete.
pub fn remaining_plans(root: &Plan) -> usize {
    root.iter_subtree()
        .into_iter()
        .filter(|plan| !plan.is_complete())
        .count()
}

/// Files to hand to an execution step: the root plan's own plan/context
/// files plus the selected node's, path-deduplicated. Files of sibling or
/// not-yet-reached subplans are never included.
pub fn execution_files(root: &Plan, selected: &Plan) -> Vec<FileReference> {
    let mut seen = std::collections::HashSet::new();
    let mut files = Vec::new();

    let sources = [
        &root.plan_files,
        &root.context_files,
        &selected.plan_files,
        &selected.context_files,
    ];
    for source in sources {
        for file in source {
            if seen.insert(file.path.clone()) {
                files.push(file.clone());
            }
        }
    }
    files
}
