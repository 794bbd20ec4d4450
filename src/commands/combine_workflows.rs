//! # Combine Workflows Command Implementation
//!
//! This module implements the `combine-workflows` subcommand, which merges the
//! per-component workflow files (`<parent>/<type>/<name>.<type>-meta.xml`) into
//! one `<parent>.workflow-meta.xml` aggregate per parent workflow.
//!
//! With `--manifest`, only the parent workflows named in that deploy manifest
//! are combined. Child types such as `WorkflowRule` name their parent through
//! the text before the first dot of each member.

use anyhow::Result;
use clap::Args;
use std::path::PathBuf;

use sf_aggregate::defaults;
use sf_aggregate::workflows;

use super::{describe, explain, manifest_filter};

/// Combine per-component workflow files into one aggregate per workflow
#[derive(Args, Debug)]
pub struct CombineWorkflowsArgs {
    /// Directory holding the workflow folders.
    #[arg(
        short,
        long,
        value_name = "DIR",
        env = "SF_WORKFLOWS_DIR",
        default_value = defaults::WORKFLOWS_DIR
    )]
    pub directory: PathBuf,

    /// Only combine the workflows listed in this deploy manifest.
    #[arg(short, long, value_name = "FILE")]
    pub manifest: Option<PathBuf>,
}

/// Execute the `combine-workflows` command.
pub fn execute(args: CombineWorkflowsArgs) -> Result<()> {
    let filter = manifest_filter(args.manifest.as_deref())?.map(|sets| sets.workflows);
    if let Some(names) = &filter {
        println!("Restricting workflows to: {}", describe(names));
    }

    let written = workflows::combine_workflows(&args.directory, filter.as_ref()).map_err(explain)?;

    println!("Combined {} workflow files:", written.len());
    for path in &written {
        println!("   {}", path.display());
    }
    Ok(())
}
