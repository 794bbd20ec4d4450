//! # Prepare Command Implementation
//!
//! This module implements the `prepare` subcommand, the entry point a CI
//! pipeline runs before a delta deployment. It scans the deploy manifest and:
//!
//! - combines the labels listed under `CustomLabel`;
//! - combines the parent workflows listed under `Workflow` or any workflow
//!   child type;
//! - rewrites the manifest when it lists workflow child types.
//!
//! A manifest that is not well-formed XML, or that lists the plural
//! `CustomLabels` type, stops the command with a non-zero exit code before
//! anything is written.

use anyhow::Result;
use clap::Args;
use std::path::PathBuf;

use sf_aggregate::defaults::{self, Layout};
use sf_aggregate::prepare::prepare_deploy;

use super::{describe, explain};

/// Combine the labels and workflows a deploy manifest lists
#[derive(Args, Debug)]
pub struct PrepareArgs {
    /// Path to the deploy manifest.
    #[arg(
        short,
        long,
        value_name = "FILE",
        env = "SF_MANIFEST",
        default_value = defaults::MANIFEST
    )]
    pub manifest: PathBuf,

    /// Directory holding the per-label files.
    #[arg(long, value_name = "DIR", env = "SF_LABELS_DIR", default_value = defaults::LABELS_DIR)]
    pub labels_dir: PathBuf,

    /// File name of the label aggregate inside the labels directory.
    #[arg(long, value_name = "NAME", default_value = defaults::LABELS_FILE)]
    pub labels_file: String,

    /// Directory holding the workflow folders.
    #[arg(
        long,
        value_name = "DIR",
        env = "SF_WORKFLOWS_DIR",
        default_value = defaults::WORKFLOWS_DIR
    )]
    pub workflows_dir: PathBuf,
}

/// Execute the `prepare` command.
pub fn execute(args: PrepareArgs) -> Result<()> {
    let layout = Layout {
        labels_dir: args.labels_dir,
        labels_file: args.labels_file,
        workflows_dir: args.workflows_dir,
    };
    println!("Scanning {}", args.manifest.display());

    let summary = prepare_deploy(&args.manifest, &layout).map_err(explain)?;

    if let Some(count) = summary.labels {
        println!(
            "Labels: combined {} ({}) into {}",
            count,
            describe(&summary.sets.labels),
            layout.labels_path().display()
        );
    }
    if summary.sets.includes_workflows {
        println!(
            "Workflows: combined {} ({})",
            summary.workflows.len(),
            describe(&summary.sets.workflows)
        );
    }
    if summary.manifest_rewritten {
        println!(
            "Manifest: workflow child types replaced with Workflow in {}",
            args.manifest.display()
        );
    }
    if summary.labels.is_none() && !summary.sets.includes_workflows {
        println!("No labels or workflows to combine");
    }
    Ok(())
}
