//! Core library for the Cairn plan tracking engine.
//!
//! Cairn tracks long-running implementation work as a forest of
//! human-readable plan documents. Each plan is a markdown file paired with
//! an optional checklist file and a context manifest naming the source
//! files relevant to the work, and may be decomposed into ordered subplans
//! linked by a filename convention.
//!
//! This crate provides:
//!
//! - **Parsing** ([`parse`]): the indentation-based checklist parser, the
//!   context manifest parser, and the markdown reference expander that
//!   merges split plan documents before parsing.
//! - **The plan model** ([`models`], [`repo`]): the [`Plan`] tree, loaded
//!   fresh from a directory on every scan, with parent/child links derived
//!   from filenames.
//! - **Execution selection** ([`repo::selector`]): the stateless resolver
//!   that finds the next incomplete plan node to work on.
//! - **Cost tracking** ([`cost`], [`history`]): extraction of token/cost
//!   metadata from raw command output and the self-healing per-plan
//!   history file it is appended to.
//!
//! # Quick Start
//!
//! ```no_run
//! use cairn_core::{PlanRepository, selector};
//!
//! # fn example() -> cairn_core::Result<()> {
//! let repo = PlanRepository::new("docs/plans");
//! let plans = repo.load_plans()?;
//!
//! for plan in &plans {
//!     let selection = selector::select(plan);
//!     println!("{}: next up {}", plan.id, selection.plan.id);
//! }
//! # Ok(())
//! # }
//! ```

pub mod cost;
pub mod display;
pub mod error;
pub mod history;
pub mod models;
pub mod parse;
pub mod repo;

// Re-export commonly used types
pub use display::{PlanSummaries, Tokens};
pub use error::{Result, TrackerError};
pub use history::HistoryStore;
pub use models::{ChecklistItem, ExecutionCostData, FileReference, Plan, PlanSummary};
pub use repo::{selector, PlanRepository};
