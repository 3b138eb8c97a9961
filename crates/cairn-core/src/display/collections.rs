//! Collection wrapper types for display formatting.

use std::fmt;

use crate::models::PlanSummary;

/// Newtype wrapper for displaying a list of plan summaries.
pub struct PlanSummaries(pub Vec<PlanSummary>);

impl fmt::Display for PlanSummaries {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.0.is_empty() {
            return writeln!(f, "No plans found.");
        }

        writeln!(f, "# Plans")?;
        writeln!(f)?;
        for summary in &self.0 {
            write!(f, "{summary}")?;
        }
        Ok(())
    }
}
