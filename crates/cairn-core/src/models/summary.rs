//! Plan summary types and functionality.

use serde::{Deserialize, Serialize};

use super::Plan;

/// Summary information about a plan with checklist statistics.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PlanSummary {
    /// Plan identifier (file base name)
    pub id: String,
    /// Title taken from the plan's first heading
    pub title: String,
    /// Total number of checklist items, recursively
    pub total_items: usize,
    /// Number of checked items
    pub checked_items: usize,
    /// Number of unchecked items
    pub open_items: usize,
    /// Number of direct subplans
    pub child_plans: usize,
    /// Whether the plan's own checklist is fully checked
    pub complete: bool,
}

impl From<&Plan> for PlanSummary {
    fn from(plan: &Plan) -> Self {
        let total_items = plan.total_items();
        let checked_items = plan.checked_items();

        Self {
            id: plan.id.clone(),
            title: plan.title().to_string(),
            total_items,
            checked_items,
            open_items: total_items - checked_items,
            child_plans: plan.child_plans.len(),
            complete: plan.is_complete(),
        }
    }
}
