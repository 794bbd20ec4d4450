//! # Delta Deploy Preparation
//!
//! This is the driver the CI pipeline runs before a delta deployment. It
//! executes the following steps, stopping at the first fatal error:
//!
//! 1.  **Read the manifest**: a manifest that is not well-formed XML stops the
//!     run.
//! 2.  **Filter**: compute the label and workflow names the manifest asks for.
//!     A plural `CustomLabels` entry stops the run here, before any file is
//!     written.
//! 3.  **Combine labels**: when the manifest names labels, write the label
//!     aggregate restricted to them.
//! 4.  **Combine workflows**: when the manifest names workflows, write one
//!     aggregate per listed parent workflow.
//! 5.  **Rewrite the manifest**: when the manifest lists workflow child types,
//!     wildcard entries included, replace them with their parent `Workflow`
//!     members in place. This is the same condition `rewrite-manifest` uses.

use std::path::{Path, PathBuf};

use log::info;

use crate::defaults::Layout;
use crate::document;
use crate::error::Result;
use crate::labels::combine_labels;
use crate::manifest::{filter_sets, FilterSets, Manifest};
use crate::rewrite::rewrite_manifest;
use crate::workflows::combine_workflows;

/// What a preparation run wrote.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct PrepareSummary {
    /// The filter sets derived from the manifest.
    pub sets: FilterSets,
    /// Number of labels in the label aggregate, when labels were combined.
    pub labels: Option<usize>,
    /// Workflow aggregates written.
    pub workflows: Vec<PathBuf>,
    /// Whether the manifest was rewritten in place.
    pub manifest_rewritten: bool,
}

/// Prepare the project at `layout` for deploying `manifest_path`.
///
/// # Errors
///
/// Any error is fatal for the run: an unreadable or malformed manifest, the
/// unsupported `CustomLabels` type, or a failure while combining.
pub fn prepare_deploy(manifest_path: &Path, layout: &Layout) -> Result<PrepareSummary> {
    let manifest = Manifest::read(manifest_path)?;
    let sets = filter_sets(&manifest)?;
    let mut summary = PrepareSummary::default();

    if sets.includes_labels {
        summary.labels = Some(combine_labels(
            &layout.labels_dir,
            &layout.labels_file,
            Some(&sets.labels),
        )?);
    } else {
        info!("No custom labels in {}; skipping labels.", manifest_path.display());
    }

    if sets.includes_workflows {
        summary.workflows = combine_workflows(&layout.workflows_dir, Some(&sets.workflows))?;
    } else {
        info!("No workflows in {}; skipping workflows.", manifest_path.display());
    }

    if manifest.has_workflow_children() {
        let rewritten = rewrite_manifest(&manifest)?;
        document::write(manifest_path, &rewritten.to_element())?;
        info!(
            "Replaced workflow child types in {} with their parent workflows.",
            manifest_path.display()
        );
        summary.manifest_rewritten = true;
    }

    summary.sets = sets;
    Ok(summary)
}
