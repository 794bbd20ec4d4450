//! # Label Aggregator
//!
//! Custom labels are flat components: the aggregate is a `CustomLabels` root
//! holding one `labels` element per label, and the version-control layout is
//! one `<fullName>.xml` file per label next to the aggregate.
//!
//! ## Merge
//!
//! [`merge_labels`] reads every component file in the labels directory in file
//! name order, so the aggregate is byte-identical across platforms, and wraps
//! them under the namespaced root. An optional name filter restricts the merge
//! to the labels named in a delta manifest.
//!
//! ## Split
//!
//! [`split_labels`] discovers the tags present under the aggregate root and
//! writes every element that has a `fullName` to its own file. Elements without
//! one are skipped with a warning; write failures are counted and do not stop
//! the remaining labels.

use std::collections::BTreeSet;
use std::path::{Path, PathBuf};

use log::{debug, info};

use crate::component::{self, file_name_str, Component, SplitReport};
use crate::defaults::COMPONENT_EXTENSION;
use crate::document::{self, Element, METADATA_NAMESPACE};
use crate::error::Result;

/// Root element of the label aggregate.
pub const LABELS_ROOT: &str = "CustomLabels";

/// List the per-label files of `directory`, sorted by file name.
///
/// The aggregate itself and anything that does not end in `.xml` are excluded.
fn component_files(directory: &Path, aggregate_file: &str) -> Result<Vec<PathBuf>> {
    let files = component::list_files(directory)?
        .into_iter()
        .filter(|path| {
            matches!(
                file_name_str(path),
                Some(name) if name != aggregate_file && name.ends_with(COMPONENT_EXTENSION)
            )
        })
        .collect();
    Ok(files)
}

/// The name a label is filtered by: its `fullName`, else its file stem.
fn label_name(element: &Element, path: &Path) -> String {
    component::full_name_of(element)
        .map(str::to_string)
        .or_else(|| {
            file_name_str(path)
                .and_then(|name| name.strip_suffix(COMPONENT_EXTENSION))
                .map(str::to_string)
        })
        .unwrap_or_default()
}

/// Merge the per-label files of `directory` into a label aggregate.
///
/// When `filter` is given, only labels whose name is in it are kept.
///
/// # Errors
///
/// Fails when the directory cannot be listed or any label file cannot be
/// parsed: a partial aggregate is never produced.
pub fn merge_labels(
    directory: &Path,
    aggregate_file: &str,
    filter: Option<&BTreeSet<String>>,
) -> Result<Element> {
    let mut root = Element::with_namespace(LABELS_ROOT, METADATA_NAMESPACE);

    for path in component_files(directory, aggregate_file)? {
        let mut label = document::read(&path)?;
        if let Some(names) = filter {
            let name = label_name(&label, &path);
            if !names.contains(&name) {
                debug!("Skipping label '{}' not listed in the manifest", name);
                continue;
            }
        }
        label.assign_namespace(METADATA_NAMESPACE);
        root.push(label);
    }

    Ok(root)
}

/// Merge the labels of `directory` and write the aggregate next to them.
///
/// Returns the number of labels written into the aggregate.
pub fn combine_labels(
    directory: &Path,
    aggregate_file: &str,
    filter: Option<&BTreeSet<String>>,
) -> Result<usize> {
    let root = merge_labels(directory, aggregate_file, filter)?;
    let count = root.child_elements().count();
    let output = directory.join(aggregate_file);
    document::write(&output, &root)?;

    info!(
        "Combined XML file created with {} labels using individual XML files in '{}'.",
        count,
        output.display()
    );
    Ok(count)
}

/// Split the label aggregate at `aggregate_path` into one file per label in
/// `output_directory`.
///
/// # Errors
///
/// Fails only when the aggregate cannot be read or parsed. Per-label problems
/// are recorded in the returned [`SplitReport`].
pub fn split_labels(aggregate_path: &Path, output_directory: &Path) -> Result<SplitReport> {
    let root = document::read(aggregate_path)?;
    let mut report = SplitReport::default();

    component::split_children(&root, &mut report, |label: &Component| {
        output_directory.join(format!("{}{}", label.full_name(), COMPONENT_EXTENSION))
    });

    info!(
        "Separated {} labels from '{}' into '{}'.",
        report.written.len(),
        aggregate_path.display(),
        output_directory.display()
    );
    Ok(report)
}
