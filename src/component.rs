//! Metadata components and tag discovery.
//!
//! A component is one named metadata fragment: a label, or one workflow alert,
//! field update, rule, task and so on. Its tag is the element name it carries
//! in both layouts, and its `fullName` child identifies it within that tag.
//!
//! Aggregate documents are never matched against a fixed list of tags. The
//! splitters call [`distinct_tags`] and process every tag they find the same
//! way, so new workflow child types need no code change.

use std::collections::BTreeSet;
use std::fs;
use std::io::ErrorKind;
use std::path::{Component as PathComponent, Path, PathBuf};

use log::{debug, warn};

use crate::document::{self, Element};
use crate::error::{Error, Result};

/// The child element that names a component.
pub const FULL_NAME: &str = "fullName";

/// A named metadata fragment extracted from a document.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Component {
    full_name: String,
    element: Element,
}

impl Component {
    /// Wrap `element` as a component.
    ///
    /// # Errors
    ///
    /// Returns `Error::MissingField` when the element has no `fullName` text.
    pub fn from_element(element: Element) -> Result<Self> {
        match full_name_of(&element).map(str::to_string) {
            Some(full_name) => Ok(Self { full_name, element }),
            None => Err(Error::MissingField {
                tag: element.name().to_string(),
                field: FULL_NAME.to_string(),
            }),
        }
    }

    pub fn full_name(&self) -> &str {
        &self.full_name
    }

    /// The component's element name, e.g. `labels`, `alerts`, `rules`.
    pub fn type_tag(&self) -> &str {
        self.element.name()
    }

    /// Leaf fields in document order as `(name, text)` pairs.
    pub fn fields(&self) -> Vec<(&str, &str)> {
        self.element
            .child_elements()
            .filter_map(|child| child.text().map(|text| (child.name(), text)))
            .collect()
    }

    pub fn into_element(self) -> Element {
        self.element
    }
}

/// The trimmed, non-empty `fullName` of an element.
pub fn full_name_of(element: &Element) -> Option<&str> {
    element
        .child_text(FULL_NAME)
        .map(str::trim)
        .filter(|name| !name.is_empty())
}

/// Distinct tags of the root's child elements, in ordinal order.
pub fn distinct_tags(root: &Element) -> BTreeSet<&str> {
    root.child_elements().map(Element::name).collect()
}

/// The root's child elements that carry `tag`, in document order.
pub fn elements_with_tag<'a>(
    root: &'a Element,
    tag: &'a str,
) -> impl Iterator<Item = &'a Element> {
    root.child_elements().filter(move |child| child.name() == tag)
}

/// Outcome of splitting an aggregate into per-component files.
///
/// Splitting never stops at the first bad component: skipped and failed
/// components are counted and logged while their siblings are still written.
#[derive(Debug, Default, Clone, PartialEq, Eq)]
pub struct SplitReport {
    /// Files written, in write order.
    pub written: Vec<PathBuf>,
    /// Components skipped because their `fullName` was missing or unusable.
    pub skipped: usize,
    /// Components or aggregates that could not be read or written.
    pub failed: usize,
}

impl SplitReport {
    /// Write `component` to `path` without its namespace, recording the outcome.
    pub fn write(&mut self, path: PathBuf, component: Component) {
        let tag = component.type_tag().to_string();
        let mut element = component.into_element();
        element.strip_namespace();
        match document::write(&path, &element) {
            Ok(()) => {
                debug!("Saved {} element content to {}", tag, path.display());
                if self.written.contains(&path) {
                    warn!("Duplicate {} overwrote {}", tag, path.display());
                }
                self.written.push(path);
            }
            Err(e) => self.fail(&e),
        }
    }

    /// Record a component skipped with a diagnostic.
    pub fn skip(&mut self, error: &Error) {
        warn!("{}", error);
        self.skipped += 1;
    }

    /// Record a failure that did not stop the batch.
    pub fn fail(&mut self, error: &Error) {
        warn!("{}", error);
        self.failed += 1;
    }

    /// True when every component found was written.
    pub fn is_complete(&self) -> bool {
        self.skipped == 0 && self.failed == 0
    }
}

/// True when `name` is exactly one normal path component, so it cannot
/// address anything outside the directory it is joined to.
pub fn is_plain_file_name(name: &str) -> bool {
    if name.contains(['/', '\\']) {
        return false;
    }
    let mut components = Path::new(name).components();
    matches!(
        (components.next(), components.next()),
        (Some(PathComponent::Normal(_)), None)
    )
}

/// Split every child of `root` into a component, passing those with a
/// usable `fullName` to `target` for their output path.
pub fn split_children(
    root: &Element,
    report: &mut SplitReport,
    target: impl Fn(&Component) -> PathBuf,
) {
    for tag in distinct_tags(root) {
        for element in elements_with_tag(root, tag) {
            match Component::from_element(element.clone()) {
                Ok(component) if !is_plain_file_name(component.full_name()) => {
                    report.skip(&Error::UnsafeName {
                        tag: component.type_tag().to_string(),
                        name: component.full_name().to_string(),
                    });
                }
                Ok(component) => {
                    let path = target(&component);
                    report.write(path, component);
                }
                Err(e) => report.skip(&e),
            }
        }
    }
}

/// Regular files directly inside `directory`, sorted by file name.
///
/// Directory listing order differs between platforms; sorting here keeps every
/// aggregate byte-identical from one run to the next.
pub fn list_files(directory: &Path) -> Result<Vec<PathBuf>> {
    let entries = fs::read_dir(directory).map_err(|e| match e.kind() {
        ErrorKind::NotFound => Error::NotFound {
            path: directory.to_path_buf(),
        },
        _ => Error::Io(e),
    })?;

    let mut files = Vec::new();
    for entry in entries {
        let entry = entry?;
        if entry.file_type()?.is_file() {
            files.push(entry.path());
        }
    }
    files.sort();
    Ok(files)
}

/// The file name of `path` when it is valid UTF-8.
pub fn file_name_str(path: &Path) -> Option<&str> {
    path.file_name().and_then(|name| name.to_str())
}
