//! Default values for sf-aggregate paths and file names.
//!
//! This module provides the conventional Salesforce DX project layout used
//! across commands. Every directory can be overridden by a CLI flag or by the
//! environment variable named next to it.

use std::path::PathBuf;

/// Directory holding per-label files and the label aggregate (`SF_LABELS_DIR`).
pub const LABELS_DIR: &str = "force-app/main/default/labels";

/// Directory holding workflow folders and workflow aggregates (`SF_WORKFLOWS_DIR`).
pub const WORKFLOWS_DIR: &str = "force-app/main/default/workflows";

/// Deploy manifest (`SF_MANIFEST`).
pub const MANIFEST: &str = "manifest/package.xml";

/// File name of the label aggregate inside [`LABELS_DIR`].
pub const LABELS_FILE: &str = "CustomLabels.labels-meta.xml";

/// Full default path of the label aggregate.
pub const LABELS_PATH: &str = "force-app/main/default/labels/CustomLabels.labels-meta.xml";

/// Suffix of workflow aggregate files, one per parent workflow.
pub const WORKFLOW_SUFFIX: &str = ".workflow-meta.xml";

/// Extension shared by every per-component file.
pub const COMPONENT_EXTENSION: &str = ".xml";

/// Where labels and workflows live for one run.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Layout {
    pub labels_dir: PathBuf,
    pub labels_file: String,
    pub workflows_dir: PathBuf,
}

impl Layout {
    /// Path of the label aggregate file.
    pub fn labels_path(&self) -> PathBuf {
        self.labels_dir.join(&self.labels_file)
    }
}

impl Default for Layout {
    fn default() -> Self {
        Self {
            labels_dir: PathBuf::from(LABELS_DIR),
            labels_file: LABELS_FILE.to_string(),
            workflows_dir: PathBuf::from(WORKFLOWS_DIR),
        }
    }
}
