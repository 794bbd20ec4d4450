//! # Workflow Aggregator
//!
//! Workflow automation is grouped by parent workflow (usually an object name).
//! The version-control layout nests every component under its parent and type:
//!
//! ```text
//! workflows/
//! ├── Account.workflow-meta.xml                  (aggregate, deploy layout)
//! └── Account/
//!     ├── alerts/Notify_Owner.alerts-meta.xml
//!     └── rules/Escalate.rules-meta.xml
//! ```
//!
//! [`merge_workflows`] builds one `Workflow` document per parent. Inside a
//! group the components are sorted by `(tag, fullName)` because that is the
//! order the platform CLI retrieves them in; any other order shows up as a diff.
//!
//! [`split_workflows`] inverts the merge into the nested layout above, which is
//! exactly what the merge groups by.

use std::collections::{BTreeMap, BTreeSet};
use std::path::{Component as PathComponent, Path, PathBuf};

use log::{debug, info, warn};
use walkdir::WalkDir;

use crate::component::{self, file_name_str, Component, SplitReport};
use crate::defaults::{COMPONENT_EXTENSION, WORKFLOW_SUFFIX};
use crate::document::{self, Element, METADATA_NAMESPACE};
use crate::error::{Error, Result};

/// Root element of every workflow aggregate.
pub const WORKFLOW_ROOT: &str = "Workflow";

struct Member {
    full_name: String,
    element: Element,
}

/// Name of the workflow group that owns `path`: its first directory below
/// `directory`. Files directly inside `directory` belong to no group.
fn parent_name(directory: &Path, path: &Path) -> Option<String> {
    let relative = path.strip_prefix(directory).ok()?;
    let mut components = relative.components();
    let first = match components.next()? {
        PathComponent::Normal(name) => name.to_str()?.to_string(),
        _ => return None,
    };
    components.next().map(|_| first)
}

fn is_component_file(name: &str) -> bool {
    name.ends_with(COMPONENT_EXTENSION) && !name.ends_with(WORKFLOW_SUFFIX)
}

/// Aggregate file name for a parent workflow.
pub fn aggregate_file_name(parent: &str) -> String {
    format!("{}{}", parent, WORKFLOW_SUFFIX)
}

/// Merge the per-component workflow files under `directory` into one
/// `Workflow` document per parent.
///
/// When `filter` is given, groups whose parent is not in it are skipped
/// without being read.
///
/// # Errors
///
/// Fails when the directory is missing or any component file cannot be
/// parsed: a partial aggregate is never produced.
pub fn merge_workflows(
    directory: &Path,
    filter: Option<&BTreeSet<String>>,
) -> Result<BTreeMap<String, Element>> {
    if !directory.is_dir() {
        return Err(Error::NotFound {
            path: directory.to_path_buf(),
        });
    }

    let mut groups: BTreeMap<String, Vec<Member>> = BTreeMap::new();

    for entry in WalkDir::new(directory).min_depth(2).sort_by_file_name() {
        let entry = entry.map_err(|e| Error::Filesystem {
            message: format!("Failed to walk '{}': {}", directory.display(), e),
        })?;
        if !entry.file_type().is_file() {
            continue;
        }
        let path = entry.path();
        if !file_name_str(path).is_some_and(is_component_file) {
            continue;
        }
        let Some(parent) = parent_name(directory, path) else {
            continue;
        };
        if filter.is_some_and(|names| !names.contains(&parent)) {
            continue;
        }

        let mut element = document::read(path)?;
        let full_name = match component::full_name_of(&element) {
            Some(name) => name.to_string(),
            None => {
                warn!(
                    "{} has no fullName; it sorts first within its type",
                    path.display()
                );
                String::new()
            }
        };
        element.assign_namespace(METADATA_NAMESPACE);
        groups.entry(parent).or_default().push(Member { full_name, element });
    }

    let merged = groups
        .into_iter()
        .map(|(parent, mut members)| {
            members.sort_by(|a, b| {
                a.element
                    .name()
                    .cmp(b.element.name())
                    .then_with(|| a.full_name.cmp(&b.full_name))
            });
            let mut root = Element::with_namespace(WORKFLOW_ROOT, METADATA_NAMESPACE);
            for member in members {
                root.push(member.element);
            }
            debug!("Merged {} components for workflow {}", root.children().len(), parent);
            (parent, root)
        })
        .collect();

    Ok(merged)
}

/// Merge the workflows under `directory` and write one aggregate per parent
/// into `directory`. Returns the paths written.
pub fn combine_workflows(
    directory: &Path,
    filter: Option<&BTreeSet<String>>,
) -> Result<Vec<PathBuf>> {
    let merged = merge_workflows(directory, filter)?;
    let mut written = Vec::with_capacity(merged.len());

    for (parent, root) in &merged {
        let path = directory.join(aggregate_file_name(parent));
        document::write(&path, root)?;
        written.push(path);
    }

    match filter {
        Some(names) => {
            let requested: Vec<&str> = names.iter().map(String::as_str).collect();
            info!(
                "The workflows for {} have been compiled for deployments.",
                requested.join(", ")
            );
            for name in names.iter().filter(|name| !merged.contains_key(*name)) {
                warn!("No workflow components found for {}", name);
            }
        }
        None => info!("The workflows have been compiled for deployments."),
    }
    Ok(written)
}

/// Split every workflow aggregate in `directory` into the nested
/// `<parent>/<tag>/<fullName>.<tag>-meta.xml` layout.
///
/// # Errors
///
/// Fails only when `directory` cannot be listed. An aggregate that cannot be
/// parsed is logged and counted, and the next aggregate is processed.
pub fn split_workflows(directory: &Path) -> Result<SplitReport> {
    let mut report = SplitReport::default();

    for path in component::list_files(directory)? {
        let Some(parent) = file_name_str(&path).and_then(|name| name.strip_suffix(WORKFLOW_SUFFIX))
        else {
            continue;
        };

        let root = match document::read(&path) {
            Ok(root) => root,
            Err(e) => {
                report.fail(&e);
                continue;
            }
        };

        let group_dir = directory.join(parent);
        component::split_children(&root, &mut report, |member: &Component| {
            group_dir.join(member.type_tag()).join(format!(
                "{}.{}-meta{}",
                member.full_name(),
                member.type_tag(),
                COMPONENT_EXTENSION
            ))
        });
    }

    info!(
        "Separated {} workflow components in '{}'.",
        report.written.len(),
        directory.display()
    );
    Ok(report)
}
