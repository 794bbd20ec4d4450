//! # sf-aggregate Library
//!
//! This library reconciles the two layouts Salesforce label and workflow
//! metadata lives in. Version control works best with many small files, one
//! per label or workflow component. The deploy API wants one aggregate file
//! per container. The library converts between the two and can restrict the
//! conversion to the components named in a delta deploy manifest.
//!
//! ## Quick Example
//!
//! ```
//! use sf_aggregate::manifest::{filter_sets, Manifest};
//!
//! let manifest = Manifest::parse_str(r#"
//! <Package xmlns="http://soap.sforce.com/2006/04/metadata">
//!     <types>
//!         <members>Account.Escalate</members>
//!         <name>WorkflowRule</name>
//!     </types>
//!     <version>58.0</version>
//! </Package>"#).unwrap();
//!
//! let sets = filter_sets(&manifest).unwrap();
//! assert!(sets.workflows.contains("Account"));
//! assert!(sets.has_workflow_children);
//! ```
//!
//! ## Core Concepts
//!
//! - **Documents (`document`)**: XML parsing into an owned tree and the
//!   canonical 4-space serialization every generated file uses.
//! - **Components (`component`)**: named fragments identified by `fullName`,
//!   discovered dynamically from whatever tags an aggregate contains.
//! - **Aggregators (`labels`, `workflows`)**: merge per-component files into
//!   aggregates and split aggregates back into per-component files.
//! - **Manifests (`manifest`, `rewrite`)**: the delta filter over a deploy
//!   manifest, and the rewrite that folds workflow child types into their
//!   parent `Workflow`.
//! - **Preparation (`prepare`)**: the driver that runs all of the above for a
//!   delta deployment.

pub mod component;
pub mod defaults;
pub mod document;
pub mod error;
pub mod labels;
pub mod manifest;
pub mod prepare;
pub mod rewrite;
pub mod workflows;

#[cfg(test)]
mod aggregate_proptest;
