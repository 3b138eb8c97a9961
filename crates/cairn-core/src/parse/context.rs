//! Context manifest parser.
//!
//! A context manifest lists the implementation files relevant to a plan:
//!
//! ```yaml
//! ---
//! files:
//!   - path: "src/main.rs"
//!     readOnly: false
//! ```
//!
//! A missing or broken manifest must never block loading the rest of the
//! plan tree, so every failure path here degrades to an empty list with a
//! logged warning.

use std::fs;
use std::path::Path;

use serde::Deserialize;

use crate::models::FileReference;

#[derive(Debug, Deserialize)]
struct ContextManifest {
    #[serde(default)]
    files: Vec<FileReference>,
}

/// Parses manifest text into file references.
///
/// Malformed input yields an empty list plus a warning.
pub fn parse_context_manifest(text: &str) -> Vec<FileReference> {
    if text.trim().is_empty() {
        return Vec::new();
    }
    match serde_yaml::from_str::<ContextManifest>(text) {
        Ok(manifest) => manifest.files,
        Err(e) => {
            log::warn!("ignoring malformed context manifest: {e}");
            Vec::new()
        }
    }
}

/// Reads and parses a manifest file, degrading to an empty list if the
/// file cannot be read.
pub fn load_context_manifest(path: &Path) -> Vec<FileReference> {
    match fs::read_to_string(path) {
        Ok(text) => parse_context_manifest(&text),
        Err(e) => {
            log::warn!("cannot read context manifest '{}': {e}", path.display());
            Vec::new()
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_valid_manifest() {
        let text = "---\nfiles:\n  - path: \"src/lib.rs\"\n    readOnly: false\n  - path: \"docs/api.md\"\n    readOnly: true\n";
        let refs = parse_context_manifest(text);

        assert_eq!(refs.len(), 2);
        assert_eq!(refs[0].path, "src/lib.rs");
        assert!(!refs[0].read_only);
        assert!(refs[1].read_only);
    }

    #[test]
    fn test_read_only_defaults_to_false() {
        let refs = parse_context_manifest("files:\n  - path: \"a.rs\"\n");
        assert_eq!(refs.len(), 1);
        assert!(!refs[0].read_only);
    }

    #[test]
    fn test_invalid_yaml_yields_empty_list() {
        let refs = parse_context_manifest("files:\n  - path: [unclosed\n  ::bad");
        assert!(refs.is_empty());
    }

    #[test]
    fn test_wrong_shape_yields_empty_list() {
        let refs = parse_context_manifest("files: \"not a list\"\n");
        assert!(refs.is_empty());
    }

    #[test]
    fn test_empty_input_yields_empty_list() {
        assert!(parse_context_manifest("").is_empty());
        assert!(parse_context_manifest("   \n").is_empty());
    }

    #[test]
    fn test_missing_file_yields_empty_list() {
        let refs = load_context_manifest(Path::new("/nonexistent/ctx.yaml"));
        assert!(refs.is_empty());
    }
}
