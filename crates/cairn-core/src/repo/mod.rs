//! Plan repository: loads a directory of plan documents into plan trees.
//!
//! A plan lives in `<base>.md` and owns two optional siblings found by
//! naming convention: `<base>_checklist.md` and `<base>_context.yaml`.
//! Subplans extend the parent's base name (`<base>_migration.md`), which
//! is what links them into the tree. Trees are rebuilt fresh on every
//! load; nothing is cached between calls.
//!
//! Failure isolation: one malformed or unreadable plan file is logged and
//! skipped, and never aborts the scan of the remaining directory.

use std::collections::HashSet;
use std::fs;
use std::path::{Path, PathBuf};

use crate::error::{IoResultExt, Result, TrackerError};
use crate::models::{ChecklistItem, FileReference, Plan};
use crate::parse;

pub mod selector;

/// Sentinel line that marks a markdown file as a plan document.
pub const PLAN_MARKER: &str = "[Coding Aider Plan]";

/// Sentinel line that marks a sibling file as a plan checklist.
pub const CHECKLIST_MARKER: &str = "[Coding Aider Plan - Checklist]";

const PLAN_EXTENSION: &str = "md";
const CHECKLIST_SUFFIX: &str = "_checklist";
const CONTEXT_SUFFIX: &str = "_context";
const HISTORY_SUFFIX: &str = "_history";

/// Loader for a single plan directory.
pub struct PlanRepository {
    root: PathBuf,
}

impl PlanRepository {
    /// Creates a repository over the given plan directory.
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self { root: root.into() }
    }

    /// The plan directory this repository scans.
    pub fn root(&self) -> &Path {
        &self.root
    }

    /// Loads every root plan in the directory, with subplans linked in
    /// filename-lexicographic order.
    pub fn load_plans(&self) -> Result<Vec<Plan>> {
        let candidates = self.plan_candidates()?;
        let mut plans = Vec::new();

        for base in root_bases(&candidates) {
            match self.load_plan_tree(base, None, &candidates) {
                Ok(plan) => plans.push(plan),
                Err(TrackerError::NotAPlan { path }) => {
                    log::debug!("skipping '{}': missing plan sentinel", path.display());
                }
                Err(e) => log::error!("skipping plan '{base}': {e}"),
            }
        }

        Ok(plans)
    }

    /// Loads the plan stored at `path` (a `<base>.md` file in this
    /// repository's directory), including its subplans.
    pub fn load_plan(&self, path: &Path) -> Result<Plan> {
        let base = path
            .file_stem()
            .and_then(|s| s.to_str())
            .ok_or_else(|| TrackerError::InvalidInput {
                field: "path".to_string(),
                reason: format!("'{}' has no usable file name", path.display()),
            })?;
        let candidates = self.plan_candidates()?;
        let parent = parent_base(base, &candidates);
        self.load_plan_tree(base, parent, &candidates)
    }

    /// Base names of every main-plan candidate in the directory: `.md`
    /// files whose names are not checklist/context/history siblings.
    fn plan_candidates(&self) -> Result<Vec<String>> {
        let entries = fs::read_dir(&self.root).path_context(&self.root)?;
        let mut bases = Vec::new();

        for entry in entries {
            let path = entry.path_context(&self.root)?.path();
            if !path.is_file() {
                continue;
            }
            let has_plan_ext = path
                .extension()
                .and_then(|e| e.to_str())
                .is_some_and(|e| e.eq_ignore_ascii_case(PLAN_EXTENSION));
            if !has_plan_ext {
                continue;
            }
            let Some(stem) = path.file_stem().and_then(|s| s.to_str()) else {
                continue;
            };
            if stem.ends_with(CHECKLIST_SUFFIX)
                || stem.ends_with(CONTEXT_SUFFIX)
                || stem.ends_with(HISTORY_SUFFIX)
            {
                continue;
            }
            bases.push(stem.to_string());
        }

        bases.sort();
        Ok(bases)
    }

    fn load_plan_tree(
        &self,
        base: &str,
        parent_id: Option<&str>,
        candidates: &[String],
    ) -> Result<Plan> {
        let plan_path = self.root.join(format!("{base}.{PLAN_EXTENSION}"));
        let raw = fs::read_to_string(&plan_path).path_context(&plan_path)?;
        let plan_text = parse::expand_references(&raw, &self.root);

        if !plan_text.trim_start().starts_with(PLAN_MARKER) {
            return Err(TrackerError::NotAPlan { path: plan_path });
        }

        let mut plan_files = vec![FileReference::new(plan_path.display().to_string())];

        // A plan may carry its checklist inline.
        let inline_items = parse::parse_checklist(&plan_text);

        let checklist_path = self
            .root
            .join(format!("{base}{CHECKLIST_SUFFIX}.{PLAN_EXTENSION}"));
        let mut sibling_items = Vec::new();
        if checklist_path.is_file() {
            match fs::read_to_string(&checklist_path) {
                Ok(text) => {
                    let expanded = parse::expand_references(&text, &self.root);
                    if expanded.trim_start().starts_with(CHECKLIST_MARKER) {
                        sibling_items = parse::parse_checklist(&expanded);
                        plan_files.push(FileReference::new(checklist_path.display().to_string()));
                    }
                }
                Err(e) => {
                    log::warn!("cannot read checklist '{}': {e}", checklist_path.display());
                }
            }
        }
        let checklist = merge_checklists(sibling_items, inline_items);

        let context_path = self.root.join(format!("{base}{CONTEXT_SUFFIX}.yaml"));
        let context_files = if context_path.is_file() {
            plan_files.push(FileReference::new(context_path.display().to_string()));
            parse::load_context_manifest(&context_path)
        } else {
            Vec::new()
        };

        let mut child_plans = Vec::new();
        for child_base in direct_children(base, candidates) {
            match self.load_plan_tree(child_base, Some(base), candidates) {
                Ok(child) => child_plans.push(child),
                Err(TrackerError::NotAPlan { path }) => {
                    log::debug!("skipping '{}': missing plan sentinel", path.display());
                }
                Err(e) => log::error!("skipping subplan '{child_base}': {e}"),
            }
        }

        Ok(Plan {
            id: base.to_string(),
            plan_text,
            checklist,
            plan_files,
            context_files,
            child_plans,
            parent_id: parent_id.map(String::from),
        })
    }
}

/// Merges sibling-checklist items with plan-embedded ones. Sibling items
/// come first; embedded items whose trimmed description already appears
/// anywhere in the sibling tree are dropped as duplicates.
fn merge_checklists(sibling: Vec<ChecklistItem>, inline: Vec<ChecklistItem>) -> Vec<ChecklistItem> {
    let mut seen = HashSet::new();
    collect_descriptions(&sibling, &mut seen);

    let mut merged = sibling;
    for item in inline {
        let key = item.description.trim().to_string();
        if seen.insert(key) {
            merged.push(item);
        }
    }
    merged
}

fn collect_descriptions(items: &[ChecklistItem], seen: &mut HashSet<String>) {
    for item in items {
        seen.insert(item.description.trim().to_string());
        collect_descriptions(&item.children, seen);
    }
}

/// Candidates that are not subplans of another candidate.
fn root_bases(candidates: &[String]) -> Vec<&String> {
    candidates
        .iter()
        .filter(|base| parent_base(base, candidates).is_none())
        .collect()
}

/// Longest candidate that `base` extends with the `_` separator, if any.
fn parent_base<'a>(base: &str, candidates: &'a [String]) -> Option<&'a str> {
    candidates
        .iter()
        .filter(|other| other.as_str() != base && base.starts_with(&format!("{other}_")))
        .max_by_key(|other| other.len())
        .map(String::as_str)
}

/// Direct children of `base`: candidates extending `base_` that are not
/// nested under a deeper candidate in between.
fn direct_children<'a>(base: &str, candidates: &'a [String]) -> Vec<&'a String> {
    let prefix = format!("{base}_");
    candidates
        .iter()
        .filter(|c| c.starts_with(&prefix))
        .filter(|c| parent_base(c, candidates) == Some(base))
        .collect()
}
