//! # Manifest Rewriter
//!
//! The deploy API rejects workflow child types (`WorkflowRule`,
//! `WorkflowAlert`, ...) in a delta deployment that ships combined workflow
//! files. Their members must be expressed as members of the parent `Workflow`
//! type instead.
//!
//! The rewrite works in two passes over the original manifest:
//!
//! 1.  **Reclassify**: every entry is sorted into a `type -> members` mapping
//!     using the same rules as the delta filter. Child members collapse into
//!     their parent workflow name under `Workflow`, deduplicated.
//! 2.  **Serialize**: one `<types>` block per type, members then name, then the
//!     original `<version>`.
//!
//! Types keep the order in which they first appear. Entries the engine does not
//! handle pass through untouched. Running the rewrite on its own output changes
//! nothing, since no child types remain after the first pass.

use std::collections::BTreeSet;
use std::path::Path;

use log::{info, warn};

use crate::document;
use crate::error::{Error, Result};
use crate::manifest::{
    contribution, Contribution, Manifest, ManifestEntry, TypeKind, WORKFLOW_TYPE,
};

fn members_for<'a>(
    types: &'a mut Vec<(String, BTreeSet<String>)>,
    name: &str,
) -> &'a mut BTreeSet<String> {
    let index = match types.iter().position(|(existing, _)| existing == name) {
        Some(index) => index,
        None => {
            types.push((name.to_string(), BTreeSet::new()));
            types.len() - 1
        }
    };
    &mut types[index].1
}

/// Rebuild `manifest` with workflow child entries folded into `Workflow`.
///
/// # Errors
///
/// `Error::UnsupportedMetadata` when the manifest uses `CustomLabels`.
pub fn rewrite_manifest(manifest: &Manifest) -> Result<Manifest> {
    let mut types: Vec<(String, BTreeSet<String>)> = Vec::new();

    for entry in &manifest.entries {
        match contribution(entry)? {
            Contribution::Workflows { names, .. } => {
                members_for(&mut types, WORKFLOW_TYPE)
                    .extend(names.into_iter().map(str::to_string));
            }
            Contribution::Wildcard if entry.kind() == TypeKind::WorkflowChild => {
                let error = Error::WildcardNotAllowed {
                    type_name: entry.name.clone(),
                };
                warn!("{}; dropping the entry from the manifest", error);
            }
            Contribution::Labels(_) | Contribution::Wildcard | Contribution::Other => {
                members_for(&mut types, &entry.name).extend(entry.members.iter().cloned());
            }
        }
    }

    let entries = types
        .into_iter()
        .map(|(name, members)| ManifestEntry {
            name,
            members: members.into_iter().collect(),
        })
        .collect();

    Ok(Manifest {
        entries,
        version: manifest.version.clone(),
    })
}

/// Serialize a manifest in the canonical layout.
pub fn render(manifest: &Manifest) -> String {
    document::to_xml_string(&manifest.to_element())
}

/// Rewrite the manifest at `path` in place when it lists workflow child types.
///
/// Returns `true` when the file was rewritten. A manifest without child types
/// is left untouched.
pub fn rewrite_manifest_file(path: &Path) -> Result<bool> {
    let manifest = Manifest::read(path)?;
    if !manifest.has_workflow_children() {
        return Ok(false);
    }

    let rewritten = rewrite_manifest(&manifest)?;
    document::write(path, &rewritten.to_element())?;
    info!(
        "Rewrote {} with workflow child types replaced by their parent Workflow.",
        path.display()
    );
    Ok(true)
}
