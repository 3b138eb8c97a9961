//! File reference model shared by plans and context manifests.

use serde::{Deserialize, Serialize};

/// One entry of a context manifest, or a plan/checklist/context file itself.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct FileReference {
    /// Relative or absolute path of the referenced file
    pub path: String,

    /// Whether the file is provided for reading only
    #[serde(default)]
    pub read_only: bool,
}

impl FileReference {
    /// Creates a writable file reference.
    pub fn new(path: impl Into<String>) -> Self {
        Self {
            path: path.into(),
            read_only: false,
        }
    }

    /// Creates a read-only file reference.
    pub fn read_only(path: impl Into<String>) -> Self {
        Self {
            path: path.into(),
            read_only: true,
        }
    }
}
