//! # Separate Workflows Command Implementation
//!
//! This module implements the `separate-workflows` subcommand, which splits
//! every `*.workflow-meta.xml` aggregate in the workflows directory into the
//! nested `<parent>/<type>/<name>.<type>-meta.xml` layout.
//!
//! An aggregate that cannot be parsed is reported and skipped; the remaining
//! aggregates are still separated.

use anyhow::Result;
use clap::Args;
use std::path::PathBuf;

use sf_aggregate::defaults;
use sf_aggregate::workflows;

use super::explain;

/// Separate workflow aggregates into one file per component
#[derive(Args, Debug)]
pub struct SeparateWorkflowsArgs {
    /// Directory holding the workflow aggregates.
    #[arg(
        short,
        long,
        value_name = "DIR",
        env = "SF_WORKFLOWS_DIR",
        default_value = defaults::WORKFLOWS_DIR
    )]
    pub directory: PathBuf,
}

/// Execute the `separate-workflows` command.
pub fn execute(args: SeparateWorkflowsArgs) -> Result<()> {
    let report = workflows::split_workflows(&args.directory).map_err(explain)?;

    println!(
        "Separated {} workflow components in {}",
        report.written.len(),
        args.directory.display()
    );
    if !report.is_complete() {
        println!(
            "   Skipped: {}, failed: {} (see warnings above)",
            report.skipped, report.failed
        );
    }
    Ok(())
}
