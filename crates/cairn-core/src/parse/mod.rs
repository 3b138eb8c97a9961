//! Parsers turning plan/checklist/context documents into domain models.
//!
//! All parsers here are tolerant by contract: malformed input degrades to
//! the best structure that can be recovered (plus a logged warning), never
//! to an error that would block loading the rest of a plan directory.

pub mod checklist;
pub mod context;
pub mod expand;

pub use checklist::{parse_checklist, render_checklist};
pub use context::{load_context_manifest, parse_context_manifest};
pub use expand::expand_references;
