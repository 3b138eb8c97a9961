//! Markdown reference expander.
//!
//! Plans for large features are split across several markdown files and
//! stitched together with ordinary `[label](target.md)` links. Before a
//! plan is parsed, every reference whose target resolves to an existing
//! markdown file in the plan directory is replaced in-place by the
//! referenced file's content, so checklist extraction and completeness
//! logic operate over the logically-merged document. References to
//! anything else (missing files, non-markdown targets, URLs) are left
//! untouched.
//!
//! Expansion recurses into expanded content, bounded by
//! [`MAX_EXPANSION_DEPTH`] and a stack of visited files so reference
//! cycles terminate with the cyclic link left as literal text.

use std::fs;
use std::path::{Path, PathBuf};

use once_cell::sync::Lazy;
use regex::Regex;

static MD_LINK_RE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"\[([^\]]*)\]\(([^)\s]+)\)").expect("markdown link regex"));

/// Maximum nesting depth for expanded references.
pub const MAX_EXPANSION_DEPTH: usize = 5;

/// Expands markdown references in `text` against the sibling files in
/// `dir`.
pub fn expand_references(text: &str, dir: &Path) -> String {
    let mut stack = Vec::new();
    expand_level(text, dir, 0, &mut stack)
}

fn expand_level(text: &str, dir: &Path, depth: usize, stack: &mut Vec<PathBuf>) -> String {
    if depth >= MAX_EXPANSION_DEPTH {
        return text.to_string();
    }

    let mut out = String::with_capacity(text.len());
    let mut last = 0;

    for caps in MD_LINK_RE.captures_iter(text) {
        let whole = caps.get(0).expect("match 0 always present");
        out.push_str(&text[last..whole.start()]);
        last = whole.end();

        let Some(target) = resolve_markdown_target(dir, &caps[2]) else {
            out.push_str(whole.as_str());
            continue;
        };
        if stack.contains(&target) {
            log::warn!(
                "reference cycle at '{}', leaving link unexpanded",
                target.display()
            );
            out.push_str(whole.as_str());
            continue;
        }

        match fs::read_to_string(&target) {
            Ok(content) => {
                stack.push(target);
                let expanded = expand_level(&content, dir, depth + 1, stack);
                stack.pop();
                // Blank line, the referenced content, trailing blank line.
                out.push_str("\n\n");
                out.push_str(expanded.trim_end());
                out.push_str("\n\n");
            }
            Err(e) => {
                log::warn!("cannot read referenced file '{}': {e}", target.display());
                out.push_str(whole.as_str());
            }
        }
    }

    out.push_str(&text[last..]);
    out
}

/// Resolves a link target to an existing markdown file under `dir`, or
/// `None` if the reference must be left alone.
fn resolve_markdown_target(dir: &Path, raw: &str) -> Option<PathBuf> {
    if raw.contains("://") {
        return None;
    }
    let path = dir.join(raw);
    let is_markdown = path
        .extension()
        .and_then(|ext| ext.to_str())
        .is_some_and(|ext| ext.eq_ignore_ascii_case("md") || ext.eq_ignore_ascii_case("markdown"));
    if !is_markdown || !path.is_file() {
        return None;
    }
    // Canonical form so the cycle stack keys on the real file.
    path.canonicalize().ok()
}
