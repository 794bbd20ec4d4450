//! # Rewrite Manifest Command Implementation
//!
//! This module implements the `rewrite-manifest` subcommand. Delta deployments
//! that ship combined workflow files cannot list workflow child types such as
//! `WorkflowRule`; this command folds them into `Workflow` members of their
//! parent, keeping every other entry and the API version.
//!
//! A manifest without workflow child types is left untouched, so the command
//! is safe to run more than once.

use anyhow::Result;
use clap::Args;
use std::path::PathBuf;

use sf_aggregate::defaults;
use sf_aggregate::rewrite;

use super::explain;

/// Replace workflow child types in a deploy manifest with their parent workflows
#[derive(Args, Debug)]
pub struct RewriteManifestArgs {
    /// Path to the deploy manifest to rewrite in place.
    #[arg(
        short,
        long,
        value_name = "FILE",
        env = "SF_MANIFEST",
        default_value = defaults::MANIFEST
    )]
    pub manifest: PathBuf,
}

/// Execute the `rewrite-manifest` command.
pub fn execute(args: RewriteManifestArgs) -> Result<()> {
    if rewrite::rewrite_manifest_file(&args.manifest).map_err(explain)? {
        println!("Rewrote {}", args.manifest.display());
    } else {
        println!(
            "{} lists no workflow child types; left unchanged",
            args.manifest.display()
        );
    }
    Ok(())
}
