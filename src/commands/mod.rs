//! # CLI Command Implementations
//!
//! This module contains the implementation for each subcommand of the
//! `sf-aggregate` command-line tool. Each subcommand is defined in its own file
//! to keep the logic separated and maintainable.
//!
//! ## Structure
//!
//! Each command module typically contains:
//! - An `Args` struct that defines the command-specific arguments and options,
//!   derived using `clap`.
//! - An `execute` function that takes the parsed `Args` and performs the
//!   command's logic.
//!
//! Directory defaults come from `sf_aggregate::defaults` and can be overridden
//! with the `SF_LABELS_DIR`, `SF_WORKFLOWS_DIR` and `SF_MANIFEST` environment
//! variables.

pub mod combine_labels;
pub mod combine_workflows;
pub mod completions;
pub mod prepare;
pub mod rewrite_manifest;
pub mod separate_labels;
pub mod separate_workflows;

use std::collections::BTreeSet;
use std::path::Path;

use anyhow::Result;
use sf_aggregate::error::Error;
use sf_aggregate::manifest::{filter_sets, FilterSets, Manifest};

/// Turn a library error into a message that tells the user what to fix.
pub(crate) fn explain(error: Error) -> anyhow::Error {
    match error {
        Error::Parse { ref path, .. } => anyhow::anyhow!(
            "{}\nConfirm {} is well-formed XML before re-trying.",
            error,
            path.display()
        ),
        Error::NotFound { .. } => anyhow::anyhow!(
            "{}\nCheck that the path exists, or pass --directory, --file or --manifest to point at it.",
            error
        ),
        fatal if fatal.is_fatal() => anyhow::anyhow!(
            "{}\nDelta deployments must list labels individually; fix the manifest and re-run.",
            fatal
        ),
        other => other.into(),
    }
}

/// Read the delta filter of an optional manifest.
pub(crate) fn manifest_filter(manifest: Option<&Path>) -> Result<Option<FilterSets>> {
    let Some(path) = manifest else {
        return Ok(None);
    };
    let manifest = Manifest::read(path).map_err(explain)?;
    Ok(Some(filter_sets(&manifest).map_err(explain)?))
}

/// Describe a filter for command output.
pub(crate) fn describe(names: &BTreeSet<String>) -> String {
    if names.is_empty() {
        "none".to_string()
    } else {
        names.iter().cloned().collect::<Vec<_>>().join(", ")
    }
}
