//! Execution cost record model.

use jiff::civil::DateTime;
use jiff::Zoned;
use serde::{Deserialize, Serialize};

/// Cost/usage metadata of one completed execution step against a plan.
///
/// Records are immutable values: created once, appended to the plan's
/// history, and only ever read back or aggregated afterwards.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct ExecutionCostData {
    /// Local wall-clock time the step finished
    pub timestamp: DateTime,

    /// Tokens sent to the model
    pub tokens_sent: u64,

    /// Tokens received from the model
    pub tokens_received: u64,

    /// Cost of this single message/step
    pub message_cost: f64,

    /// Cumulative session cost reported at this step
    pub session_cost: f64,

    /// Model name announced in the output
    pub model: String,

    /// Free-text summary of what the step did
    pub summary: String,
}

impl ExecutionCostData {
    /// Creates an empty record stamped with the current local time.
    ///
    /// Extraction degrades to this when no pattern matches.
    pub fn empty_now() -> Self {
        Self {
            timestamp: Zoned::now().datetime(),
            tokens_sent: 0,
            tokens_received: 0,
            message_cost: 0.0,
            session_cost: 0.0,
            model: String::new(),
            summary: String::new(),
        }
    }

    /// Identity tuple used to de-duplicate history entries.
    ///
    /// Two records with the same timestamp, model, token counts, and
    /// session cost are the same execution, regardless of how they were
    /// recovered from disk.
    pub fn dedup_key(&self) -> String {
        format!(
            "{}|{}|{}|{}|{:.4}",
            self.timestamp, self.model, self.tokens_sent, self.tokens_received, self.session_cost
        )
    }
}
