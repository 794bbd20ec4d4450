//! # Combine Labels Command Implementation
//!
//! This module implements the `combine-labels` subcommand, which merges the
//! per-label files of the labels directory into the `CustomLabels` aggregate
//! the deploy API expects.
//!
//! With `--manifest`, only the labels listed under `CustomLabel` in that deploy
//! manifest are combined. A manifest that lists the plural `CustomLabels` type
//! is rejected, because that type deploys the whole file.

use anyhow::Result;
use clap::Args;
use std::path::PathBuf;

use sf_aggregate::defaults;
use sf_aggregate::labels;

use super::{describe, explain, manifest_filter};

/// Combine per-label files into the label aggregate
#[derive(Args, Debug)]
pub struct CombineLabelsArgs {
    /// Directory holding the per-label files.
    #[arg(
        short,
        long,
        value_name = "DIR",
        env = "SF_LABELS_DIR",
        default_value = defaults::LABELS_DIR
    )]
    pub directory: PathBuf,

    /// File name of the aggregate, written inside the directory.
    #[arg(short, long, value_name = "NAME", default_value = defaults::LABELS_FILE)]
    pub file: String,

    /// Only combine the labels listed in this deploy manifest.
    #[arg(short, long, value_name = "FILE")]
    pub manifest: Option<PathBuf>,
}

/// Execute the `combine-labels` command.
pub fn execute(args: CombineLabelsArgs) -> Result<()> {
    let filter = manifest_filter(args.manifest.as_deref())?.map(|sets| sets.labels);
    if let Some(names) = &filter {
        println!("Restricting labels to: {}", describe(names));
    }

    let count = labels::combine_labels(&args.directory, &args.file, filter.as_ref())
        .map_err(explain)?;

    println!(
        "Combined {} labels into {}",
        count,
        args.directory.join(&args.file).display()
    );
    Ok(())
}
