//! Indentation-based recursive-descent parser for checklist text.
//!
//! Nesting is indicated purely by the leading-whitespace count of each
//! line: an item's children are the checkbox lines that follow it at
//! strictly deeper indentation, consumed contiguously until a line at
//! shallower-or-equal indentation is seen. Non-checkbox prose interleaved
//! with the checklist is consumed and ignored, so the parser can run over
//! a whole plan document.

use once_cell::sync::Lazy;
use regex::Regex;

use crate::models::ChecklistItem;

/// Checkbox grammar: optional leading `-`, a single-char marker in
/// brackets, then the description. `✓` is a legacy checked marker kept
/// for files written by earlier versions.
static CHECKBOX_RE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"^\s*-?\s*\[([ xX✓])\]\s?(.*)$").expect("checkbox regex"));

/// A line that starts like a checkbox but is malformed (unknown marker,
/// missing closing bracket). Kept as an unchecked item, never dropped.
static LOOSE_CHECKBOX_RE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"^\s*-\s*\[").expect("loose checkbox regex"));

/// Parses checklist items out of raw multi-line text.
pub fn parse_checklist(text: &str) -> Vec<ChecklistItem> {
    let lines: Vec<&str> = text.lines().collect();
    let (items, _) = parse_level(&lines, 0, 0);
    items
}

/// Parses one nesting level starting at `start`, returning the items and
/// the index of the first line not consumed by this level.
///
/// A line indented shallower than `parent_indent` ends the level and is
/// left for the caller.
fn parse_level(lines: &[&str], start: usize, parent_indent: usize) -> (Vec<ChecklistItem>, usize) {
    let mut items = Vec::new();
    let mut idx = start;

    while idx < lines.len() {
        let line = lines[idx];
        if line.trim().is_empty() {
            idx += 1;
            continue;
        }

        let indent = indentation(line);
        if indent < parent_indent {
            break;
        }

        if let Some(caps) = CHECKBOX_RE.captures(line) {
            let checked = &caps[1] != " ";
            let description = caps[2].trim().to_string();
            let (children, next) = parse_level(lines, idx + 1, indent + 1);
            idx = next;
            items.push(ChecklistItem::with_children(description, checked, children));
        } else if LOOSE_CHECKBOX_RE.is_match(line) {
            log::warn!("malformed checklist line kept as unchecked item: '{}'", line.trim());
            let (children, next) = parse_level(lines, idx + 1, indent + 1);
            idx = next;
            items.push(ChecklistItem::with_children(
                line.trim().to_string(),
                false,
                children,
            ));
        } else {
            // Prose line: consumed, not structural.
            idx += 1;
        }
    }

    (items, idx)
}

/// Leading-whitespace count of a line. A fully-blank line never reaches
/// this point; it is skipped by the caller.
fn indentation(line: &str) -> usize {
    line.chars().take_while(|c| c.is_whitespace()).count()
}

/// Renders items back to checkbox markdown, two spaces of indentation per
/// nesting level. Inverse of [`parse_checklist`] for well-formed trees.
pub fn render_checklist(items: &[ChecklistItem]) -> String {
    let mut out = String::new();
    for item in items {
        render_item(item, 0, &mut out);
    }
    out
}

fn render_item(item: &ChecklistItem, depth: usize, out: &mut String) {
    let marker = if item.checked { 'x' } else { ' ' };
    out.push_str(&"  ".repeat(depth));
    out.push_str(&format!("- [{marker}] {}\n", item.description));
    for child in &item.children {
        render_item(child, depth + 1, out);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_flat_list() {
        let items = parse_checklist("- [ ] first\n- [x] second\n- [X] third\n");
        assert_eq!(items.len(), 3);
        assert!(!items[0].checked);
        assert!(items[1].checked);
        assert!(items[2].checked);
        assert_eq!(items[0].description, "first");
    }

    #[test]
    fn test_nested_items() {
        let text = "- [ ] parent\n  - [x] child\n    - [ ] grandchild\n- [ ] sibling\n";
        let items = parse_checklist(text);

        assert_eq!(items.len(), 2);
        assert_eq!(items[0].children.len(), 1);
        assert_eq!(items[0].children[0].description, "child");
        assert_eq!(items[0].children[0].children.len(), 1);
        assert_eq!(items[1].description, "sibling");
        assert!(items[1].children.is_empty());
    }

    #[test]
    fn test_dedent_returns_to_parent_level() {
        let text = "- [ ] a\n    - [ ] a1\n  - [ ] a2\n- [ ] b\n";
        let items = parse_checklist(text);

        // a1 and a2 are both strictly deeper than a, so both are children
        // of a even though their own indents differ.
        assert_eq!(items.len(), 2);
        assert_eq!(items[0].children.len(), 2);
    }

    #[test]
    fn test_prose_interleaved_is_skipped() {
        let text = "Intro paragraph.\n- [ ] task\nSome explanation.\n- [x] done\n";
        let items = parse_checklist(text);

        assert_eq!(items.len(), 2);
        assert_eq!(items[0].description, "task");
        assert_eq!(items[1].description, "done");
    }

    #[test]
    fn test_checkbox_without_dash() {
        let items = parse_checklist("[x] no dash\n");
        assert_eq!(items.len(), 1);
        assert!(items[0].checked);
    }

    #[test]
    fn test_legacy_check_marker() {
        let items = parse_checklist("- [✓] migrated from old format\n");
        assert_eq!(items.len(), 1);
        assert!(items[0].checked);
    }

    #[test]
    fn test_malformed_line_kept_as_unchecked() {
        let items = parse_checklist("- [x broken bracket\n- [ ] fine\n");
        assert_eq!(items.len(), 2);
        assert!(!items[0].checked);
        assert_eq!(items[0].description, "- [x broken bracket");
        assert_eq!(items[1].description, "fine");
    }

    #[test]
    fn test_blank_lines_do_not_break_nesting() {
        let text = "- [ ] parent\n\n  - [ ] child\n";
        let items = parse_checklist(text);
        assert_eq!(items.len(), 1);
        assert_eq!(items[0].children.len(), 1);
    }

    #[test]
    fn test_round_trip() {
        let text = "- [ ] parent\n  - [x] child\n    - [ ] deep\n- [x] other\n";
        let items = parse_checklist(text);
        let rendered = render_checklist(&items);
        assert_eq!(parse_checklist(&rendered), items);
        assert_eq!(rendered, text);
    }

    #[test]
    fn test_empty_input() {
        assert!(parse_checklist("").is_empty());
        assert!(parse_checklist("\n\n  \n").is_empty());
    }
}
