//! # Deploy Manifest and Delta Filter
//!
//! A deploy manifest (`package.xml`) lists metadata types and the members of
//! each type to deploy:
//!
//! ```xml
//! <Package xmlns="http://soap.sforce.com/2006/04/metadata">
//!     <types>
//!         <members>Account.Escalate</members>
//!         <name>WorkflowRule</name>
//!     </types>
//!     <version>58.0</version>
//! </Package>
//! ```
//!
//! [`filter_sets`] reads such a manifest and works out which labels and which
//! parent workflows the aggregators must restrict themselves to. Workflow child
//! types (`WorkflowRule`, `WorkflowAlert`, ...) name members as
//! `<ParentWorkflow>.<ChildName>`; the filter maps them to the parent name,
//! truncating at the first dot, because aggregation happens per parent.

use std::collections::BTreeSet;
use std::path::Path;

use log::warn;

use crate::document::{self, Element, METADATA_NAMESPACE};
use crate::error::{Error, Result};

/// Root element of a deploy manifest.
pub const PACKAGE_ROOT: &str = "Package";

/// A single custom label.
pub const LABEL_TYPE: &str = "CustomLabel";

/// The whole label file. Cannot be combined with delta filtering.
pub const LABELS_CONTAINER_TYPE: &str = "CustomLabels";

/// The parent workflow container.
pub const WORKFLOW_TYPE: &str = "Workflow";

/// Types that are deployed as members of their parent `Workflow`.
pub const WORKFLOW_CHILD_TYPES: &[&str] = &[
    "WorkflowAlert",
    "WorkflowFieldUpdate",
    "WorkflowFlowAction",
    "WorkflowKnowledgePublish",
    "WorkflowOutboundMessage",
    "WorkflowRule",
    "WorkflowTask",
];

/// The member that stands for "every component of this type".
pub const WILDCARD: &str = "*";

/// How the aggregation engine treats a manifest type.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TypeKind {
    Label,
    LabelContainer,
    Workflow,
    WorkflowChild,
    Other,
}

impl TypeKind {
    pub fn of(type_name: &str) -> Self {
        match type_name {
            LABEL_TYPE => TypeKind::Label,
            LABELS_CONTAINER_TYPE => TypeKind::LabelContainer,
            WORKFLOW_TYPE => TypeKind::Workflow,
            name if WORKFLOW_CHILD_TYPES.contains(&name) => TypeKind::WorkflowChild,
            _ => TypeKind::Other,
        }
    }
}

/// One `<types>` block.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ManifestEntry {
    pub name: String,
    pub members: Vec<String>,
}

impl ManifestEntry {
    pub fn new(
        name: impl Into<String>,
        members: impl IntoIterator<Item = impl Into<String>>,
    ) -> Self {
        Self {
            name: name.into(),
            members: members.into_iter().map(Into::into).collect(),
        }
    }

    pub fn kind(&self) -> TypeKind {
        TypeKind::of(&self.name)
    }

    pub fn has_wildcard(&self) -> bool {
        self.members.iter().any(|member| member == WILDCARD)
    }
}

/// A parsed deploy manifest.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Manifest {
    pub entries: Vec<ManifestEntry>,
    /// The declared API version, e.g. `58.0`.
    pub version: Option<String>,
}

impl Manifest {
    /// Read the manifest at `path`.
    ///
    /// # Errors
    ///
    /// `Error::NotFound` for a missing file and `Error::Parse` for malformed
    /// XML or a `<types>` block without a `<name>`.
    pub fn read(path: &Path) -> Result<Self> {
        let root = document::read(path)?;
        Self::from_element(&root).map_err(|message| Error::parse(path, message))
    }

    /// Parse manifest XML text.
    pub fn parse_str(xml: &str) -> std::result::Result<Self, String> {
        Self::from_element(&document::parse_str(xml)?)
    }

    fn from_element(root: &Element) -> std::result::Result<Self, String> {
        if root.name() != PACKAGE_ROOT {
            return Err(format!(
                "expected <{}> root element, found <{}>",
                PACKAGE_ROOT,
                root.name()
            ));
        }

        let mut entries = Vec::new();
        for types in root.child_elements().filter(|c| c.name() == "types") {
            let name = types
                .child_text("name")
                .map(str::trim)
                .filter(|name| !name.is_empty())
                .ok_or_else(|| "<types> block without a <name>".to_string())?;
            let members = types
                .child_elements()
                .filter(|c| c.name() == "members")
                .filter_map(Element::text)
                .map(|member| member.trim().to_string())
                .filter(|member| !member.is_empty())
                .collect();
            entries.push(ManifestEntry {
                name: name.to_string(),
                members,
            });
        }

        let version = root
            .child_text("version")
            .map(|version| version.trim().to_string());

        Ok(Self { entries, version })
    }

    /// Build the manifest document: one `<types>` block per entry (members
    /// then name), then `<version>` when present.
    pub fn to_element(&self) -> Element {
        let mut root = Element::with_namespace(PACKAGE_ROOT, METADATA_NAMESPACE);
        for entry in &self.entries {
            let mut types = Element::new("types");
            for member in &entry.members {
                types.push(Element::text_element("members", member));
            }
            types.push(Element::text_element("name", &entry.name));
            root.push(types);
        }
        if let Some(version) = &self.version {
            root.push(Element::text_element("version", version));
        }
        root.assign_namespace(METADATA_NAMESPACE);
        root
    }

    /// True when any entry uses a workflow child type.
    pub fn has_workflow_children(&self) -> bool {
        self.entries
            .iter()
            .any(|entry| entry.kind() == TypeKind::WorkflowChild)
    }
}

/// The parent workflow of a child member: the text before the first `.`.
///
/// `Account.Escalate` maps to `Account`, and so does `Account.Escalate.v2`.
pub fn parent_workflow(member: &str) -> &str {
    member.split_once('.').map_or(member, |(parent, _)| parent)
}

/// What a manifest entry contributes to delta aggregation.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Contribution<'a> {
    /// Label names.
    Labels(&'a [String]),
    /// Parent workflow names, and whether they came from a child type.
    Workflows {
        names: Vec<&'a str>,
        from_children: bool,
    },
    /// A label or workflow entry with a wildcard member; never expanded.
    Wildcard,
    /// A type the aggregation engine does not handle.
    Other,
}

/// Classify one manifest entry.
///
/// # Errors
///
/// `Error::UnsupportedMetadata` for the plural `CustomLabels` type, which
/// requires whole-file deployment and cannot be filtered.
pub fn contribution(entry: &ManifestEntry) -> Result<Contribution<'_>> {
    let kind = entry.kind();
    if kind == TypeKind::LabelContainer {
        return Err(Error::UnsupportedMetadata {
            type_name: entry.name.clone(),
            hint: Some(format!(
                "Replace {} with individual {} members in the manifest",
                LABELS_CONTAINER_TYPE, LABEL_TYPE
            )),
        });
    }
    if kind != TypeKind::Other && entry.has_wildcard() {
        return Ok(Contribution::Wildcard);
    }

    let contribution = match kind {
        TypeKind::Label => Contribution::Labels(&entry.members),
        TypeKind::Workflow => Contribution::Workflows {
            names: entry.members.iter().map(String::as_str).collect(),
            from_children: false,
        },
        TypeKind::WorkflowChild => Contribution::Workflows {
            names: entry
                .members
                .iter()
                .map(|member| parent_workflow(member))
                .collect(),
            from_children: true,
        },
        TypeKind::LabelContainer | TypeKind::Other => Contribution::Other,
    };
    Ok(contribution)
}

/// The name sets a delta deployment restricts aggregation to.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct FilterSets {
    pub labels: BTreeSet<String>,
    pub workflows: BTreeSet<String>,
    /// Workflow names came from child-type members. Whether the manifest must
    /// be rewritten is [`Manifest::has_workflow_children`], which also counts
    /// wildcard child entries.
    pub has_workflow_children: bool,
    /// A label entry was accepted, so labels must be combined.
    pub includes_labels: bool,
    /// A workflow entry was accepted, so workflows must be combined.
    pub includes_workflows: bool,
}

/// Compute the label and workflow names named by `manifest`.
///
/// Wildcard entries are logged and skipped.
///
/// # Errors
///
/// `Error::UnsupportedMetadata` when the manifest uses `CustomLabels`.
pub fn filter_sets(manifest: &Manifest) -> Result<FilterSets> {
    let mut sets = FilterSets::default();

    for entry in &manifest.entries {
        match contribution(entry)? {
            Contribution::Labels(names) => {
                sets.includes_labels = true;
                sets.labels.extend(names.iter().cloned());
            }
            Contribution::Workflows {
                names,
                from_children,
            } => {
                sets.includes_workflows = true;
                sets.has_workflow_children |= from_children;
                sets.workflows.extend(names.into_iter().map(str::to_string));
            }
            Contribution::Wildcard => {
                let error = Error::WildcardNotAllowed {
                    type_name: entry.name.clone(),
                };
                warn!("{}; skipping the entry", error);
            }
            Contribution::Other => {}
        }
    }

    Ok(sets)
}
